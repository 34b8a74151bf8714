// Tutor domain model
use super::record::{check_name, Domain, Record, RecordId, RecordSet, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TutorStatus {
    Active,
    Inactive,
}

impl TutorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TutorStatus::Active => "Active",
            TutorStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: RecordId,
    pub name: String,
    pub area: String,
    pub sessions: u32,
    pub last_active: NaiveDate,
    pub status: TutorStatus,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl Tutor {
    /// Whole days between `last_active` and `today`; never negative.
    pub fn days_since_active(&self, today: NaiveDate) -> i64 {
        (today - self.last_active).num_days().max(0)
    }

    pub fn is_active(&self) -> bool {
        self.status == TutorStatus::Active
    }
}

impl Record for Tutor {
    const DOMAIN: Domain = Domain::Tutors;
    const CATEGORICAL_FIELDS: &'static [&'static str] = &["area", "status", "subject"];

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
            "area" => vec![self.area.as_str()],
            "status" => vec![self.status.as_str()],
            "subject" => self.subjects.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Tutors(records) => Some(records),
            _ => None,
        }
    }
}
