// Volunteer domain model
use super::record::{
    check_name, check_range, Domain, Record, RecordId, RecordSet, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackBand {
    High,
    Medium,
    Low,
}

impl FeedbackBand {
    pub const ALL: [FeedbackBand; 3] = [FeedbackBand::High, FeedbackBand::Medium, FeedbackBand::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackBand::High => "High",
            FeedbackBand::Medium => "Medium",
            FeedbackBand::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: RecordId,
    pub name: String,
    pub interest_area: String,
    /// Average event feedback, 0.0..=5.0.
    pub feedback_score: f64,
    pub last_event: NaiveDate,
    pub events_attended: u32,
    #[serde(default)]
    pub badges: Vec<String>,
}

impl Volunteer {
    pub fn feedback_band(&self) -> FeedbackBand {
        if self.feedback_score >= 4.5 {
            FeedbackBand::High
        } else if self.feedback_score >= 4.0 {
            FeedbackBand::Medium
        } else {
            FeedbackBand::Low
        }
    }
}

impl Record for Volunteer {
    const DOMAIN: Domain = Domain::Volunteers;
    const CATEGORICAL_FIELDS: &'static [&'static str] = &["interest_area", "badge"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category_values(&self, field: &str) -> Vec<&str> {
        match field {
            "interest_area" => vec![self.interest_area.as_str()],
            "badge" => self.badges.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_range("feedback_score", self.feedback_score, 0.0, 5.0)
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Volunteers(records) => Some(records),
            _ => None,
        }
    }
}
