// Record abstraction shared by every program domain
use super::family::Family;
use super::student::Student;
use super::tutor::Tutor;
use super::view::RecordWarning;
use super::volunteer::Volunteer;
use super::woman::WomanInProgram;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

pub type RecordId = u32;

/// One collection per domain; each maps to a page and a store path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "families")]
    Families,
    #[serde(rename = "students")]
    Students,
    #[serde(rename = "tutors")]
    Tutors,
    #[serde(rename = "volunteers")]
    Volunteers,
    #[serde(rename = "women-empowerment")]
    Women,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Families,
        Domain::Students,
        Domain::Women,
        Domain::Tutors,
        Domain::Volunteers,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Domain::Families => "families",
            Domain::Students => "students",
            Domain::Tutors => "tutors",
            Domain::Volunteers => "volunteers",
            Domain::Women => "women-empowerment",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
    #[error("progress {progress} does not fit stage {stage}")]
    StageMismatch { stage: &'static str, progress: u8 },
    #[error("name must not be empty")]
    EmptyName,
    #[error("duplicate id {0}")]
    DuplicateId(RecordId),
}

pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

pub(crate) fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(())
    }
}

/// A flat domain entity with a stable id, a searchable name and declared
/// categorical fields.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const DOMAIN: Domain;

    /// Field names accepted by categorical filters, in display order.
    const CATEGORICAL_FIELDS: &'static [&'static str];

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    fn name(&self) -> &str;

    /// Values of a categorical field. Single-valued fields yield one entry,
    /// set-valued fields (subjects, badges) yield every member, and an
    /// undeclared field yields nothing.
    fn category_values(&self, field: &str) -> Vec<&str>;

    fn validate(&self) -> Result<(), ValidationError>;

    fn from_set(set: RecordSet) -> Option<Vec<Self>>;
}

/// An ordered collection as returned by the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordSet {
    Families(Vec<Family>),
    Students(Vec<Student>),
    Tutors(Vec<Tutor>),
    Volunteers(Vec<Volunteer>),
    Women(Vec<WomanInProgram>),
}

impl RecordSet {
    pub fn domain(&self) -> Domain {
        match self {
            RecordSet::Families(_) => Domain::Families,
            RecordSet::Students(_) => Domain::Students,
            RecordSet::Tutors(_) => Domain::Tutors,
            RecordSet::Volunteers(_) => Domain::Volunteers,
            RecordSet::Women(_) => Domain::Women,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordSet::Families(v) => v.len(),
            RecordSet::Students(v) => v.len(),
            RecordSet::Tutors(v) => v.len(),
            RecordSet::Volunteers(v) => v.len(),
            RecordSet::Women(v) => v.len(),
        }
    }

    /// Decode a JSON array into the collection for `domain`. Elements are
    /// decoded one by one; an element that does not fit the record type is
    /// rejected with a warning and the rest are kept.
    pub fn from_json(domain: Domain, value: serde_json::Value) -> serde_json::Result<Listing> {
        let items: Vec<serde_json::Value> = serde_json::from_value(value)?;
        Ok(match domain {
            Domain::Families => decode_each(items, RecordSet::Families),
            Domain::Students => decode_each(items, RecordSet::Students),
            Domain::Tutors => decode_each(items, RecordSet::Tutors),
            Domain::Volunteers => decode_each(items, RecordSet::Volunteers),
            Domain::Women => decode_each(items, RecordSet::Women),
        })
    }
}

/// A collection read from a store, with the elements that failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub records: RecordSet,
    pub rejected: Vec<RecordWarning>,
}

impl From<RecordSet> for Listing {
    fn from(records: RecordSet) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }
}

fn decode_each<R: DeserializeOwned>(
    items: Vec<serde_json::Value>,
    wrap: impl FnOnce(Vec<R>) -> RecordSet,
) -> Listing {
    let mut records = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for item in items {
        let id = item
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .and_then(|id| RecordId::try_from(id).ok())
            .unwrap_or(0);
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => rejected.push(RecordWarning {
                id,
                message: format!("undecodable record: {}", e),
            }),
        }
    }

    Listing {
        records: wrap(records),
        rejected,
    }
}

/// A single record of any domain, used by the write path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyRecord {
    Family(Family),
    Student(Student),
    Tutor(Tutor),
    Volunteer(Volunteer),
    Woman(WomanInProgram),
}

impl AnyRecord {
    pub fn domain(&self) -> Domain {
        match self {
            AnyRecord::Family(_) => Domain::Families,
            AnyRecord::Student(_) => Domain::Students,
            AnyRecord::Tutor(_) => Domain::Tutors,
            AnyRecord::Volunteer(_) => Domain::Volunteers,
            AnyRecord::Woman(_) => Domain::Women,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            AnyRecord::Family(r) => r.id(),
            AnyRecord::Student(r) => r.id(),
            AnyRecord::Tutor(r) => r.id(),
            AnyRecord::Volunteer(r) => r.id(),
            AnyRecord::Woman(r) => r.id(),
        }
    }

    pub fn set_id(&mut self, id: RecordId) {
        match self {
            AnyRecord::Family(r) => r.set_id(id),
            AnyRecord::Student(r) => r.set_id(id),
            AnyRecord::Tutor(r) => r.set_id(id),
            AnyRecord::Volunteer(r) => r.set_id(id),
            AnyRecord::Woman(r) => r.set_id(id),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            AnyRecord::Family(r) => r.validate(),
            AnyRecord::Student(r) => r.validate(),
            AnyRecord::Tutor(r) => r.validate(),
            AnyRecord::Volunteer(r) => r.validate(),
            AnyRecord::Woman(r) => r.validate(),
        }
    }

    /// Decode a JSON object as a record of `domain`. A missing `id` decodes
    /// as 0 so create requests can omit it.
    pub fn from_json(domain: Domain, mut value: serde_json::Value) -> serde_json::Result<Self> {
        if let Some(obj) = value.as_object_mut() {
            obj.entry("id").or_insert(serde_json::Value::from(0));
        }
        Ok(match domain {
            Domain::Families => AnyRecord::Family(serde_json::from_value(value)?),
            Domain::Students => AnyRecord::Student(serde_json::from_value(value)?),
            Domain::Tutors => AnyRecord::Tutor(serde_json::from_value(value)?),
            Domain::Volunteers => AnyRecord::Volunteer(serde_json::from_value(value)?),
            Domain::Women => AnyRecord::Woman(serde_json::from_value(value)?),
        })
    }
}
