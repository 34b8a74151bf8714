// Export service - Streams every domain's records as they load
use crate::application::record_store::RecordStore;
use crate::domain::record::{Domain, RecordSet};
use crate::domain::view::RecordWarning;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportMessage {
    Manifest {
        generated_on: NaiveDate,
        domains: Vec<Domain>,
    },
    Section {
        domain: Domain,
        count: usize,
        records: RecordSet,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        rejected: Vec<RecordWarning>,
    },
    Failed {
        domain: Domain,
        error: String,
    },
    Complete {
        sections: usize,
        duration_ms: u64,
    },
}

#[derive(Clone)]
pub struct ExportService {
    store: Arc<dyn RecordStore>,
}

impl ExportService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Manifest first, then one section (or failure) per domain in the order
    /// they finish, then a completion event once every domain has reported.
    pub async fn stream_export(&self, today: NaiveDate) -> mpsc::Receiver<ExportMessage> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let start_time = Instant::now();

        let manifest = ExportMessage::Manifest {
            generated_on: today,
            domains: Domain::ALL.to_vec(),
        };
        let _ = tx.send(manifest).await;

        let mut handles = Vec::with_capacity(Domain::ALL.len());
        for domain in Domain::ALL {
            let tx = tx.clone();
            let store = self.store.clone();

            handles.push(tokio::spawn(async move {
                let msg = match store.list(domain).await {
                    Ok(listing) => ExportMessage::Section {
                        domain,
                        count: listing.records.len(),
                        records: listing.records,
                        rejected: listing.rejected,
                    },
                    Err(e) => {
                        tracing::error!("Export of {} failed: {}", domain, e);
                        ExportMessage::Failed {
                            domain,
                            error: e.to_string(),
                        }
                    }
                };
                let _ = tx.send(msg).await;
            }));
        }

        tokio::spawn(async move {
            let mut sections = 0;
            for handle in handles {
                if handle.await.is_ok() {
                    sections += 1;
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as u64;
            tracing::debug!("Export finished: {} sections in {} ms", sections, duration_ms);
            let _ = tx.send(ExportMessage::Complete { sections, duration_ms }).await;
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::record_store::{FetchError, StoreError};
    use crate::domain::record::{AnyRecord, Listing, RecordId};
    use crate::infrastructure::fixture_store::FixtureStore;
    use async_trait::async_trait;

    async fn collect(mut rx: mpsc::Receiver<ExportMessage>) -> Vec<ExportMessage> {
        let mut out = Vec::new();
        while let Some(msg) = rx.recv().await {
            out.push(msg);
        }
        out
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
    }

    #[tokio::test]
    async fn test_export_order() {
        let svc = ExportService::new(Arc::new(FixtureStore::seeded()));
        let messages = collect(svc.stream_export(today()).await).await;

        assert_eq!(messages.len(), 7);
        assert!(matches!(messages[0], ExportMessage::Manifest { .. }));
        assert!(matches!(
            messages.last(),
            Some(ExportMessage::Complete { sections: 5, .. })
        ));

        let domains: Vec<Domain> = messages[1..6]
            .iter()
            .filter_map(|m| match m {
                ExportMessage::Section { domain, count, .. } => {
                    assert_eq!(*count, 5);
                    Some(*domain)
                }
                _ => None,
            })
            .collect();
        assert_eq!(domains.len(), 5);
    }

    struct HalfStore;

    #[async_trait]
    impl RecordStore for HalfStore {
        async fn list(&self, domain: Domain) -> Result<Listing, FetchError> {
            match domain {
                Domain::Tutors => Err(FetchError::Status { domain, status: 500 }),
                _ => FixtureStore::seeded().list(domain).await,
            }
        }

        async fn flagged(&self, _domain: Domain) -> Result<Vec<RecordId>, FetchError> {
            Ok(Vec::new())
        }

        async fn create(&self, _record: AnyRecord) -> Result<RecordId, StoreError> {
            unreachable!()
        }

        async fn update(&self, _record: AnyRecord) -> Result<(), StoreError> {
            unreachable!()
        }

        async fn set_flag(&self, _domain: Domain, _id: RecordId, _flagged: bool) -> Result<(), StoreError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_failed_domain_is_reported() {
        let svc = ExportService::new(Arc::new(HalfStore));
        let messages = collect(svc.stream_export(today()).await).await;

        let failed: Vec<_> = messages
            .iter()
            .filter(|m| matches!(m, ExportMessage::Failed { domain: Domain::Tutors, .. }))
            .collect();
        assert_eq!(failed.len(), 1);
        assert!(matches!(messages.last(), Some(ExportMessage::Complete { .. })));
    }

    #[test]
    fn test_message_wire_shape() {
        let msg = ExportMessage::Complete {
            sections: 5,
            duration_ms: 12,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            serde_json::json!({ "type": "complete", "sections": 5, "duration_ms": 12 })
        );
    }
}
