// HTTP request handlers
use crate::application::filter::{DateRange, FilterCriteria};
use crate::application::pages::{reports, DomainPage};
use crate::application::refresh::Latest;
use crate::domain::record::{Record, RecordId};
use crate::infrastructure::chunked_export::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Clients that send this header get last-request-wins per page.
pub const CLIENT_HEADER: &str = "x-dashboard-client";

#[derive(Deserialize)]
pub struct FlagRequest {
    pub flagged: bool,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

async fn respond<T: serde::Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub async fn dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let view = state.page_service.dashboard().await?;
    Ok(respond(StatusCode::OK, &view, &headers).await)
}

/// Filtered table page for one domain; query keys are `search` plus the
/// domain's categorical fields.
pub async fn domain_page<R: DomainPage>(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let criteria = FilterCriteria::for_record::<R>(&params);
    let client = headers.get(CLIENT_HEADER).and_then(|v| v.to_str().ok());

    let view = match client {
        Some(client) => {
            let lease = state.refreshes.lease(client, R::DOMAIN.slug());
            current(state.page_service.view_latest::<R>(&lease, &criteria).await?)?
        }
        None => state.page_service.domain_view::<R>(&criteria).await?,
    };

    Ok(respond(StatusCode::OK, &view, &headers).await)
}

/// Query keys are `area`, `module`, and the `from`/`to` date range.
pub async fn reports_page(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let criteria = FilterCriteria::from_params(&params, reports::FILTER_FIELDS)
        .with_dates(DateRange::from_params(&params));
    let client = headers.get(CLIENT_HEADER).and_then(|v| v.to_str().ok());

    let view = match client {
        Some(client) => {
            let lease = state.refreshes.lease(client, reports::PAGE);
            current(state.page_service.reports_latest(&lease, &criteria).await?)?
        }
        None => state.page_service.reports(&criteria).await?,
    };

    Ok(respond(StatusCode::OK, &view, &headers).await)
}

fn current<T>(latest: Latest<T>) -> Result<T, ApiError> {
    match latest {
        Latest::Current(view) => Ok(view),
        Latest::Superseded => Err(ApiError::Superseded),
    }
}

pub async fn create_record<R: Record>(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let id = state.record_service.create(R::DOMAIN, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

pub async fn update_record<R: Record>(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    state.record_service.update(R::DOMAIN, id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn flag_record<R: Record>(
    Path(id): Path<RecordId>,
    State(state): State<Arc<AppState>>,
    request: Result<Json<FlagRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = request?;
    state
        .record_service
        .set_flag(R::DOMAIN, id, request.flagged)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stream every domain as NDJSON (progressive loading)
pub async fn export(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let today = state.page_service.context().today;
    let rx = state.export_service.stream_export(today).await;
    stream_from_receiver(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::export_service::ExportService;
    use crate::application::page_service::PageService;
    use crate::application::record_service::RecordService;
    use crate::application::record_store::{FetchError, RecordStore, StoreError};
    use crate::application::view_model::{Clock, Thresholds};
    use crate::domain::family::Family;
    use crate::domain::record::{AnyRecord, Domain, Listing};
    use crate::domain::student::Student;
    use crate::domain::tutor::Tutor;
    use crate::infrastructure::fixture_store::FixtureStore;
    use crate::presentation::app_state::Refreshes;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    fn state_with(store: Arc<dyn RecordStore>) -> Arc<AppState> {
        let clock = Clock::Fixed(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        Arc::new(AppState {
            page_service: PageService::new(store.clone(), Thresholds::default(), clock),
            record_service: RecordService::new(store.clone()),
            export_service: ExportService::new(store),
            refreshes: Refreshes::default(),
        })
    }

    fn state() -> Arc<AppState> {
        state_with(Arc::new(FixtureStore::seeded()))
    }

    fn params(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
        Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }

    #[tokio::test]
    async fn test_students_page_with_filters() {
        let response = domain_page::<Student>(
            params(&[("search", "a"), ("grade", "8th")]),
            HeaderMap::new(),
            State(state()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        let rows = value["filtered_rows"].as_array().unwrap();
        assert!(rows.iter().all(|r| r["grade"] == "8th"));
        assert_eq!(value["summary"]["total_students"], rows.len());
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let value = body_json(dashboard(HeaderMap::new(), State(state())).await.unwrap()).await;
        assert_eq!(value["summary"]["total_students"], 5);
        assert_eq!(value["notices"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_reports_page_module_filter() {
        let value = body_json(
            reports_page(params(&[("module", "students")]), HeaderMap::new(), State(state()))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(value["filtered_rows"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_503() {
        struct Down;

        #[async_trait::async_trait]
        impl RecordStore for Down {
            async fn list(&self, _domain: Domain) -> Result<Listing, FetchError> {
                Err(FetchError::Unreachable("refused".to_string()))
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

        let err = domain_page::<Tutor>(params(&[]), HeaderMap::new(), State(state_with(Arc::new(Down))))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "unable to load data");
    }

    #[tokio::test]
    async fn test_create_update_and_flag() {
        let state = state();
        let body = json!({
            "name": "Rao Family",
            "area": "Kalkaji",
            "tag": "Stable",
            "members": 3,
            "last_contact": "2024-06-20"
        });

        let response = create_record::<Family>(State(state.clone()), Ok(Json(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], 6);

        let status = update_record::<Family>(Path(6), State(state.clone()), Ok(Json(body)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let status = flag_record::<Family>(Path(6), State(state.clone()), Ok(Json(FlagRequest { flagged: true })))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let value = body_json(
            domain_page::<Family>(params(&[]), HeaderMap::new(), State(state))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(value["summary"]["flagged_for_follow_up"], 1);
    }

    #[tokio::test]
    async fn test_write_errors_map_to_status() {
        let state = state();
        let invalid = json!({
            "name": "",
            "area": "Kalkaji",
            "tag": "Stable",
            "members": 3,
            "last_contact": "2024-06-20"
        });
        let err = create_record::<Family>(State(state.clone()), Ok(Json(invalid)))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = flag_record::<Family>(Path(99), State(state), Ok(Json(FlagRequest { flagged: true })))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_streams_ndjson() {
        let response = export(State(state())).await.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.first().unwrap()["type"], "manifest");
        assert_eq!(lines.last().unwrap()["type"], "complete");
        assert_eq!(lines.len(), 7);
    }

    /// Holds the first read until released; later reads go straight through.
    #[derive(Default)]
    struct GatedStore {
        inner: FixtureStore,
        held: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn seeded() -> Self {
            Self {
                inner: FixtureStore::seeded(),
                ..Default::default()
            }
        }
    }

    #[async_trait::async_trait]
    impl RecordStore for GatedStore {
        async fn list(&self, domain: Domain) -> Result<Listing, FetchError> {
            if !self.held.swap(true, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.list(domain).await
        }

        async fn flagged(&self, domain: Domain) -> Result<Vec<RecordId>, FetchError> {
            self.inner.flagged(domain).await
        }

        async fn create(&self, record: AnyRecord) -> Result<RecordId, StoreError> {
            self.inner.create(record).await
        }

        async fn update(&self, record: AnyRecord) -> Result<(), StoreError> {
            self.inner.update(record).await
        }

        async fn set_flag(&self, domain: Domain, id: RecordId, flagged: bool) -> Result<(), StoreError> {
            self.inner.set_flag(domain, id, flagged).await
        }
    }

    fn client(name: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_HEADER, name.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_overlapping_page_refreshes_last_wins() {
        let store = Arc::new(GatedStore::seeded());
        let state = state_with(store.clone());

        let first = {
            let state = state.clone();
            tokio::spawn(async move {
                domain_page::<Student>(params(&[("grade", "8th")]), client("tab-1"), State(state)).await
            })
        };
        store.entered.notified().await;

        let second = domain_page::<Student>(params(&[]), client("tab-1"), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(body_json(second).await["filtered_rows"].as_array().unwrap().len(), 5);

        store.release.notify_one();
        let response = first.await.unwrap().unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"], "superseded by a newer request");
        assert_eq!(state.refreshes.tracked(), 0);
    }

    #[tokio::test]
    async fn test_other_clients_are_not_superseded() {
        let store = Arc::new(GatedStore::seeded());
        let state = state_with(store.clone());

        let first = {
            let state = state.clone();
            tokio::spawn(async move {
                domain_page::<Family>(params(&[]), client("tab-1"), State(state)).await
            })
        };
        store.entered.notified().await;

        domain_page::<Family>(params(&[]), client("tab-2"), State(state.clone()))
            .await
            .unwrap();

        store.release.notify_one();
        let response = first.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_overlapping_report_refreshes_last_wins() {
        let store = Arc::new(GatedStore::seeded());
        let state = state_with(store.clone());

        let first = {
            let state = state.clone();
            tokio::spawn(async move {
                reports_page(params(&[("module", "students")]), client("tab-1"), State(state)).await
            })
        };
        store.entered.notified().await;

        let second = reports_page(params(&[("module", "tutors")]), client("tab-1"), State(state.clone()))
            .await
            .unwrap();
        let names: Vec<_> = body_json(second).await["filtered_rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Monthly Impact Report", "Tutor Activity Report"]);

        store.release.notify_one();
        let err = first.await.unwrap().unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reports_date_range_from_query() {
        let value = body_json(
            reports_page(
                params(&[("from", "2024-06-15"), ("to", "2024-06-20")]),
                HeaderMap::new(),
                State(state()),
            )
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(value["summary"]["volunteers"], 4);
        assert_eq!(value["summary"]["at_risk_families"], 0);
    }

    async fn json_body<T: serde::de::DeserializeOwned>(
        content_type: &str,
        body: &'static str,
    ) -> Result<Json<T>, JsonRejection> {
        let request = Request::builder()
            .method("POST")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        Json::<T>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_malformed_body_gets_error_shape() {
        let body = json_body::<serde_json::Value>("application/json", "{\"name\": ").await;
        let err = create_record::<Family>(State(state()), body).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = body_json(response).await;
        assert_eq!(value["error"], "invalid request body");
        assert!(!value["detail"].as_str().unwrap().is_empty());

        let body = json_body::<FlagRequest>("text/plain", "{\"flagged\": true}").await;
        let err = flag_record::<Family>(Path(1), State(state()), body).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
