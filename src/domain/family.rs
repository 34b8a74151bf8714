// Family domain model
use super::record::{check_name, Domain, Record, RecordId, RecordSet, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyTag {
    #[serde(rename = "At-risk")]
    AtRisk,
    #[serde(rename = "High Potential")]
    HighPotential,
    #[serde(rename = "Stable")]
    Stable,
}

impl FamilyTag {
    pub fn as_str(self) -> &'static str {
        match self {
            FamilyTag::AtRisk => "At-risk",
            FamilyTag::HighPotential => "High Potential",
            FamilyTag::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: RecordId,
    pub name: String,
    pub area: String,
    pub tag: FamilyTag,
    pub members: u32,
    pub last_contact: NaiveDate,
}

impl Family {
    pub fn is_at_risk(&self) -> bool {
        self.tag == FamilyTag::AtRisk
    }
}

impl Record for Family {
    const DOMAIN: Domain = Domain::Families;
    const CATEGORICAL_FIELDS: &'static [&'static str] = &["area", "tag"];

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
            "tag" => vec![self.tag.as_str()],
            _ => Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Families(records) => Some(records),
            _ => None,
        }
    }
}
