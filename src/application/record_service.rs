// Record service - Use case for adding, editing and flagging records
use crate::application::record_store::{RecordStore, StoreError};
use crate::domain::record::{AnyRecord, Domain, RecordId};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("malformed {domain} record: {source}")]
    Decode {
        domain: Domain,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, domain: Domain, body: serde_json::Value) -> Result<RecordId, WriteError> {
        let mut record = decode(domain, body)?;
        record.set_id(0);
        record.validate().map_err(StoreError::from)?;

        let id = self.store.create(record).await?;
        tracing::info!("Added {} record {}", domain, id);
        Ok(id)
    }

    /// Replace record `id`; an id in the body is ignored.
    pub async fn update(
        &self,
        domain: Domain,
        id: RecordId,
        body: serde_json::Value,
    ) -> Result<(), WriteError> {
        let mut record = decode(domain, body)?;
        record.set_id(id);
        record.validate().map_err(StoreError::from)?;

        self.store.update(record).await?;
        tracing::info!("Updated {} record {}", domain, id);
        Ok(())
    }

    pub async fn set_flag(&self, domain: Domain, id: RecordId, flagged: bool) -> Result<(), WriteError> {
        self.store.set_flag(domain, id, flagged).await?;
        tracing::debug!("Set follow-up flag on {} record {} to {}", domain, id, flagged);
        Ok(())
    }
}

fn decode(domain: Domain, body: serde_json::Value) -> Result<AnyRecord, WriteError> {
    AnyRecord::from_json(domain, body).map_err(|source| WriteError::Decode { domain, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::record_store::fetch;
    use crate::domain::tutor::Tutor;
    use crate::infrastructure::fixture_store::FixtureStore;
    use serde_json::json;

    fn tutor_body() -> serde_json::Value {
        json!({
            "name": "Farah Khan",
            "area": "Kalkaji",
            "sessions": 0,
            "last_active": "2024-06-20",
            "status": "Active",
            "subjects": ["Math"]
        })
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let store = Arc::new(FixtureStore::seeded());
        let svc = RecordService::new(store.clone());

        let id = svc.create(Domain::Tutors, tutor_body()).await.unwrap();
        let tutors = fetch::<Tutor>(store.as_ref()).await.unwrap().records;
        let added = tutors.iter().find(|t| t.id == id).unwrap();
        assert_eq!(added.name, "Farah Khan");
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_shape() {
        let svc = RecordService::new(Arc::new(FixtureStore::seeded()));
        let err = svc
            .create(Domain::Tutors, json!({ "name": "Farah Khan" }))
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::Decode { domain: Domain::Tutors, .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_values() {
        let svc = RecordService::new(Arc::new(FixtureStore::seeded()));
        let mut body = tutor_body();
        body["name"] = json!("");
        let err = svc.create(Domain::Tutors, body).await.unwrap_err();
        assert!(matches!(err, WriteError::Store(StoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_update_uses_path_id() {
        let store = Arc::new(FixtureStore::seeded());
        let svc = RecordService::new(store.clone());

        let mut body = tutor_body();
        body["id"] = json!(77);
        svc.update(Domain::Tutors, 1, body).await.unwrap();

        let tutors = fetch::<Tutor>(store.as_ref()).await.unwrap().records;
        assert_eq!(tutors[0].id, 1);
        assert_eq!(tutors[0].name, "Farah Khan");
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let svc = RecordService::new(Arc::new(FixtureStore::seeded()));
        let err = svc.update(Domain::Tutors, 404, tutor_body()).await.unwrap_err();
        assert!(matches!(err, WriteError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_set_flag() {
        let store = Arc::new(FixtureStore::seeded());
        let svc = RecordService::new(store.clone());
        svc.set_flag(Domain::Families, 1, true).await.unwrap();
        assert_eq!(store.flagged(Domain::Families).await.unwrap(), vec![1]);
    }
}
