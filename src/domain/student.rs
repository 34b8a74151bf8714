// Student domain model
use super::record::{
    check_name, check_range, Domain, Record, RecordId, RecordSet, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "7th")]
    Seventh,
    #[serde(rename = "8th")]
    Eighth,
    #[serde(rename = "9th")]
    Ninth,
    #[serde(rename = "10th")]
    Tenth,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Seventh => "7th",
            Grade::Eighth => "8th",
            Grade::Ninth => "9th",
            Grade::Tenth => "10th",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Performance {
    Excellent,
    Good,
    #[serde(rename = "At-risk")]
    AtRisk,
}

impl Performance {
    pub fn as_str(self) -> &'static str {
        match self {
            Performance::Excellent => "Excellent",
            Performance::Good => "Good",
            Performance::AtRisk => "At-risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceBand {
    Strong,
    Fair,
    Poor,
}

impl AttendanceBand {
    pub const ALL: [AttendanceBand; 3] = [AttendanceBand::Strong, AttendanceBand::Fair, AttendanceBand::Poor];

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceBand::Strong => "Strong",
            AttendanceBand::Fair => "Fair",
            AttendanceBand::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub grade: Grade,
    pub area: String,
    /// Percentage of sessions attended, 0..=100.
    pub attendance: u8,
    pub performance: Performance,
    /// Latest score per subject, 0..=100.
    #[serde(default)]
    pub subjects: BTreeMap<String, u8>,
}

impl Student {
    pub fn attendance_band(&self) -> AttendanceBand {
        match self.attendance {
            80.. => AttendanceBand::Strong,
            60..=79 => AttendanceBand::Fair,
            _ => AttendanceBand::Poor,
        }
    }
}

impl Record for Student {
    const DOMAIN: Domain = Domain::Students;
    const CATEGORICAL_FIELDS: &'static [&'static str] = &["area", "grade", "performance"];

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
            "grade" => vec![self.grade.as_str()],
            "performance" => vec![self.performance.as_str()],
            _ => Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_range("attendance", f64::from(self.attendance), 0.0, 100.0)?;
        for score in self.subjects.values() {
            check_range("subject score", f64::from(*score), 0.0, 100.0)?;
        }
        Ok(())
    }

    fn from_set(set: RecordSet) -> Option<Vec<Self>> {
        match set {
            RecordSet::Students(records) => Some(records),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(attendance: u8) -> Student {
        Student {
            id: 1,
            name: "Rahul Sharma".to_string(),
            grade: Grade::Tenth,
            area: "Malviya Nagar".to_string(),
            attendance,
            performance: Performance::Good,
            subjects: BTreeMap::new(),
        }
    }

    #[test]
    fn test_attendance_band() {
        assert_eq!(student(95).attendance_band(), AttendanceBand::Strong);
        assert_eq!(student(80).attendance_band(), AttendanceBand::Strong);
        assert_eq!(student(60).attendance_band(), AttendanceBand::Fair);
        assert_eq!(student(59).attendance_band(), AttendanceBand::Poor);
    }

    #[test]
    fn test_validate_rejects_attendance_over_100() {
        assert!(student(100).validate().is_ok());
        assert!(matches!(
            student(120).validate(),
            Err(ValidationError::OutOfRange {
                field: "attendance",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_subject_score_over_100() {
        let mut s = student(90);
        s.subjects.insert("math".to_string(), 140);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_grade_wire_names() {
        let grade: Grade = serde_json::from_str("\"9th\"").unwrap();
        assert_eq!(grade, Grade::Ninth);
        assert!(Grade::Seventh < Grade::Tenth);
    }
}
