// Repository trait for program records
use crate::domain::record::{AnyRecord, Domain, Listing, Record, RecordId, ValidationError};
use crate::domain::view::RecordWarning;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("record store unreachable: {0}")]
    Unreachable(String),
    #[error("record store returned status {status} for {domain}")]
    Status { domain: Domain, status: u16 },
    #[error("malformed {domain} data: {reason}")]
    Malformed { domain: Domain, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{domain} record {id} not found")]
    NotFound { domain: Domain, id: RecordId },
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of `domain`, in store order. Records the store could not
    /// decode are listed as rejected instead of failing the read.
    async fn list(&self, domain: Domain) -> Result<Listing, FetchError>;

    /// Ids of `domain` records flagged for follow-up.
    async fn flagged(&self, domain: Domain) -> Result<Vec<RecordId>, FetchError>;

    /// Insert a new record; the store assigns and returns its id.
    async fn create(&self, record: AnyRecord) -> Result<RecordId, StoreError>;

    /// Replace the record with the same id.
    async fn update(&self, record: AnyRecord) -> Result<(), StoreError>;

    async fn set_flag(&self, domain: Domain, id: RecordId, flagged: bool) -> Result<(), StoreError>;
}

/// Records of one domain plus the ones rejected while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<R> {
    pub records: Vec<R>,
    pub rejected: Vec<RecordWarning>,
}

/// Typed read of one domain.
pub async fn fetch<R: Record>(store: &dyn RecordStore) -> Result<Loaded<R>, FetchError> {
    let listing = store.list(R::DOMAIN).await?;
    let returned = listing.records.domain();
    let records = R::from_set(listing.records).ok_or_else(|| FetchError::Malformed {
        domain: R::DOMAIN,
        reason: format!("store answered with {} records", returned),
    })?;
    Ok(Loaded {
        records,
        rejected: listing.rejected,
    })
}
