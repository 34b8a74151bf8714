// HTTP record store - Loads and writes records through a remote JSON service
use crate::application::record_store::{FetchError, RecordStore, StoreError};
use crate::domain::record::{AnyRecord, Domain, Listing, RecordId, RecordSet};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: RecordId,
}

#[derive(Debug, Serialize)]
struct FlagBody {
    flagged: bool,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for record store")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn collection_url(&self, domain: Domain) -> String {
        format!("{}/{}", self.base_url, domain.slug())
    }

    fn record_url(&self, domain: Domain, id: RecordId) -> String {
        format!("{}/{}/{}", self.base_url, domain.slug(), id)
    }

    async fn get_json(&self, domain: Domain, url: &str) -> Result<serde_json::Value, FetchError> {
        tracing::debug!("Fetching {} from {}", domain, url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(domain, response)?;
        response.json().await.map_err(|e| FetchError::Malformed {
            domain,
            reason: e.to_string(),
        })
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    tracing::error!("Record store request failed: {}", e);
    FetchError::Unreachable(e.to_string())
}

fn check_status(domain: Domain, response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::error!("Record store answered {} for {}", status, domain);
        Err(FetchError::Status {
            domain,
            status: status.as_u16(),
        })
    }
}

/// Write responses: 404 means the record is gone, anything else non-2xx is
/// a store failure.
fn check_write(domain: Domain, id: RecordId, response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound { domain, id });
    }
    Ok(check_status(domain, response)?)
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn list(&self, domain: Domain) -> Result<Listing, FetchError> {
        let value = self.get_json(domain, &self.collection_url(domain)).await?;
        let listing = RecordSet::from_json(domain, value).map_err(|e| FetchError::Malformed {
            domain,
            reason: e.to_string(),
        })?;
        for warning in &listing.rejected {
            tracing::warn!("Rejected {} record {}: {}", domain, warning.id, warning.message);
        }
        Ok(listing)
    }

    async fn flagged(&self, domain: Domain) -> Result<Vec<RecordId>, FetchError> {
        let url = format!("{}/flags", self.collection_url(domain));
        let value = self.get_json(domain, &url).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Malformed {
            domain,
            reason: e.to_string(),
        })
    }

    async fn create(&self, record: AnyRecord) -> Result<RecordId, StoreError> {
        record.validate()?;
        let domain = record.domain();
        let response = self
            .client
            .post(self.collection_url(domain))
            .json(&record)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(domain, response)?;
        let created: Created = response.json().await.map_err(|e| FetchError::Malformed {
            domain,
            reason: e.to_string(),
        })?;
        Ok(created.id)
    }

    async fn update(&self, record: AnyRecord) -> Result<(), StoreError> {
        record.validate()?;
        let (domain, id) = (record.domain(), record.id());
        let response = self
            .client
            .put(self.record_url(domain, id))
            .json(&record)
            .send()
            .await
            .map_err(transport_error)?;

        check_write(domain, id, response)?;
        Ok(())
    }

    async fn set_flag(&self, domain: Domain, id: RecordId, flagged: bool) -> Result<(), StoreError> {
        let url = format!("{}/flag", self.record_url(domain, id));
        let response = self
            .client
            .put(url)
            .json(&FlagBody { flagged })
            .send()
            .await
            .map_err(transport_error)?;

        check_write(domain, id, response)?;
        Ok(())
    }
}
