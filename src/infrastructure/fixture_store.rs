// In-memory record store seeded from the built-in fixtures
use crate::application::record_store::{FetchError, RecordStore, StoreError};
use crate::domain::family::Family;
use crate::domain::record::{AnyRecord, Domain, Listing, Record, RecordId, RecordSet};
use crate::domain::student::Student;
use crate::domain::tutor::Tutor;
use crate::domain::volunteer::Volunteer;
use crate::domain::woman::WomanInProgram;
use crate::infrastructure::fixtures;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collections {
    families: Vec<Family>,
    students: Vec<Student>,
    tutors: Vec<Tutor>,
    volunteers: Vec<Volunteer>,
    women: Vec<WomanInProgram>,
    flags: HashMap<Domain, BTreeSet<RecordId>>,
}

impl Collections {
    fn contains(&self, domain: Domain, id: RecordId) -> bool {
        match domain {
            Domain::Families => has_id(&self.families, id),
            Domain::Students => has_id(&self.students, id),
            Domain::Tutors => has_id(&self.tutors, id),
            Domain::Volunteers => has_id(&self.volunteers, id),
            Domain::Women => has_id(&self.women, id),
        }
    }
}

#[derive(Debug, Default)]
pub struct FixtureStore {
    inner: RwLock<Collections>,
}

impl FixtureStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            inner: RwLock::new(Collections {
                families: fixtures::families(),
                students: fixtures::students(),
                tutors: fixtures::tutors(),
                volunteers: fixtures::volunteers(),
                women: fixtures::women(),
                flags: HashMap::new(),
            }),
        }
    }

    /// Replace one domain's collection wholesale, records kept as given.
    pub async fn load(&self, set: RecordSet) {
        let mut c = self.inner.write().await;
        match set {
            RecordSet::Families(v) => c.families = v,
            RecordSet::Students(v) => c.students = v,
            RecordSet::Tutors(v) => c.tutors = v,
            RecordSet::Volunteers(v) => c.volunteers = v,
            RecordSet::Women(v) => c.women = v,
        }
    }
}

fn has_id<R: Record>(records: &[R], id: RecordId) -> bool {
    records.iter().any(|r| r.id() == id)
}

fn insert<R: Record>(records: &mut Vec<R>, mut record: R) -> RecordId {
    let id = records.iter().map(Record::id).max().unwrap_or(0) + 1;
    record.set_id(id);
    records.push(record);
    id
}

fn replace<R: Record>(records: &mut [R], record: R) -> Result<(), StoreError> {
    match records.iter_mut().find(|r| r.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            Ok(())
        }
        None => Err(StoreError::NotFound {
            domain: R::DOMAIN,
            id: record.id(),
        }),
    }
}

#[async_trait]
impl RecordStore for FixtureStore {
    async fn list(&self, domain: Domain) -> Result<Listing, FetchError> {
        let c = self.inner.read().await;
        let records = match domain {
            Domain::Families => RecordSet::Families(c.families.clone()),
            Domain::Students => RecordSet::Students(c.students.clone()),
            Domain::Tutors => RecordSet::Tutors(c.tutors.clone()),
            Domain::Volunteers => RecordSet::Volunteers(c.volunteers.clone()),
            Domain::Women => RecordSet::Women(c.women.clone()),
        };
        Ok(records.into())
    }

    async fn flagged(&self, domain: Domain) -> Result<Vec<RecordId>, FetchError> {
        let c = self.inner.read().await;
        Ok(c.flags
            .get(&domain)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn create(&self, record: AnyRecord) -> Result<RecordId, StoreError> {
        record.validate()?;
        let mut c = self.inner.write().await;
        let id = match record {
            AnyRecord::Family(r) => insert(&mut c.families, r),
            AnyRecord::Student(r) => insert(&mut c.students, r),
            AnyRecord::Tutor(r) => insert(&mut c.tutors, r),
            AnyRecord::Volunteer(r) => insert(&mut c.volunteers, r),
            AnyRecord::Woman(r) => insert(&mut c.women, r),
        };
        tracing::debug!("Created record {}", id);
        Ok(id)
    }

    async fn update(&self, record: AnyRecord) -> Result<(), StoreError> {
        record.validate()?;
        let mut c = self.inner.write().await;
        match record {
            AnyRecord::Family(r) => replace(&mut c.families, r),
            AnyRecord::Student(r) => replace(&mut c.students, r),
            AnyRecord::Tutor(r) => replace(&mut c.tutors, r),
            AnyRecord::Volunteer(r) => replace(&mut c.volunteers, r),
            AnyRecord::Woman(r) => replace(&mut c.women, r),
        }
    }

    async fn set_flag(&self, domain: Domain, id: RecordId, flagged: bool) -> Result<(), StoreError> {
        let mut c = self.inner.write().await;
        if !c.contains(domain, id) {
            return Err(StoreError::NotFound { domain, id });
        }
        let ids = c.flags.entry(domain).or_default();
        if flagged {
            ids.insert(id);
        } else {
            ids.remove(&id);
        }
        Ok(())
    }
}
