// Women's economic-empowerment track
use super::record::{
    check_name, check_range, Domain, Record, RecordId, RecordSet, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Program stage, ordered by progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Training,
    Tool,
    Income,
    Business,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Training, Stage::Tool, Stage::Income, Stage::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Training => "Training",
            Stage::Tool => "Tool",
            Stage::Income => "Income",
            Stage::Business => "Business",
        }
    }

    pub fn nominal_progress(self) -> u8 {
        match self {
            Stage::Training => 25,
            Stage::Tool => 50,
            Stage::Income => 75,
            Stage::Business => 100,
        }
    }

    /// Progress values consistent with this stage: above the previous
    /// stage's nominal progress, up to this one's.
    pub fn progress_band(self) -> (u8, u8) {
        let floor = match self {
            Stage::Training => 0,
            Stage::Tool => Stage::Training.nominal_progress() + 1,
            Stage::Income => Stage::Tool.nominal_progress() + 1,
            Stage::Business => Stage::Income.nominal_progress() + 1,
        };
        (floor, self.nominal_progress())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WomanInProgram {
    pub id: RecordId,
    pub name: String,
    pub skill: String,
    pub area: String,
    pub stage: Stage,
    /// Monthly income in rupees; 0 means not yet earning.
    pub income: u32,
    pub progress: u8,
}

impl WomanInProgram {
    /// Income for averaging; `None` when not yet earning.
    pub fn earning(&self) -> Option<f64> {
        (self.income > 0).then(|| f64::from(self.income))
    }
}

impl Record for WomanInProgram {
    const DOMAIN: Domain = Domain::Women;
    const CATEGORICAL_FIELDS: &'static [&'static str] = &["area", "skill", "stage"];

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
            "skill" => vec![self.skill.as_str()],
            "stage" => vec![self.stage.as_str()],
            _ => Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_range("progress", f64::from(self.progress), 0.0, 100.0)?;
        let (low, high) = self.stage.progress_band();
        if (low..=high).contains(&self.progress) {
            Ok(())
        } else {
            Err(ValidationError::StageMismatch {
                stage: self.stage.as_str(),
                progress: self.progress,
            })
        }
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Women(records) => Some(records),
            _ => None,
        }
    }
}
