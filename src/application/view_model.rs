// View model inputs shared by every page
use crate::domain::record::{Record, RecordId, ValidationError};
use crate::domain::view::RecordWarning;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    /// Students below this attendance are flagged.
    pub low_attendance: u8,
    /// Tutors idle for more than this many days are flagged.
    pub inactive_days: i64,
    /// Volunteers with at least this many events count as repeat volunteers.
    pub repeat_events: u32,
    pub top_volunteers: usize,
    /// Earning women below this monthly income count as low income growth.
    pub low_income: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_attendance: 60,
            inactive_days: 7,
            repeat_events: 5,
            top_volunteers: 3,
            low_income: 10000,
        }
    }
}

/// Evaluation date and thresholds a page is computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub today: NaiveDate,
    pub thresholds: Thresholds,
}

impl ViewContext {
    pub fn new(today: NaiveDate, thresholds: Thresholds) -> Self {
        Self { today, thresholds }
    }
}

/// Source of "today" for day-count derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => chrono::Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Split a loaded collection into records that pass their invariants and
/// warnings for the rest. A repeated id keeps the first record.
pub fn validated<R: Record>(records: Vec<R>) -> (Vec<R>, Vec<RecordWarning>) {
    let mut seen: HashSet<RecordId> = HashSet::new();
    let mut valid = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();

    for record in records {
        let check = record.validate().and_then(|_| {
            if seen.insert(record.id()) {
                Ok(())
            } else {
                Err(ValidationError::DuplicateId(record.id()))
            }
        });
        match check {
            Ok(()) => valid.push(record),
            Err(e) => {
                tracing::warn!("Skipping {} record {}: {}", R::DOMAIN, record.id(), e);
                warnings.push(RecordWarning {
                    id: record.id(),
                    message: e.to_string(),
                });
            }
        }
    }

    (valid, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fixtures;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        assert_eq!(Clock::Fixed(date).today(), date);
    }

    #[test]
    fn test_validated_keeps_good_records() {
        let (valid, warnings) = validated(fixtures::students());
        assert_eq!(valid.len(), 5);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_validated_warns_per_bad_record() {
        let mut students = fixtures::students();
        students[1].attendance = 130;
        let (valid, warnings) = validated(students);
        assert_eq!(valid.len(), 4);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].id, 2);
        assert!(warnings[0].message.contains("attendance"));
    }

    #[test]
    fn test_validated_duplicate_id_keeps_first() {
        let mut families = fixtures::families();
        let mut dup = families[0].clone();
        dup.name = "Impostor Family".to_string();
        families.push(dup);

        let (valid, warnings) = validated(families);
        assert_eq!(valid.len(), 5);
        assert_eq!(valid[0].name, "Sharma Family");
        assert_eq!(warnings, vec![RecordWarning {
            id: 1,
            message: "duplicate id 1".to_string()
        }]);
    }
}
