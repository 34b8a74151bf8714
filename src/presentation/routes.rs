// Route table, navigation and the not-found view
use crate::application::pages::DomainPage;
use crate::domain::family::Family;
use crate::domain::student::Student;
use crate::domain::tutor::Tutor;
use crate::domain::volunteer::Volunteer;
use crate::domain::woman::WomanInProgram;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_record, dashboard, domain_page, export, flag_record, health_check, reports_page,
    update_record,
};
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub path: &'static str,
}

pub const NAVIGATION: &[NavItem] = &[
    NavItem { title: "Dashboard", path: "/dashboard" },
    NavItem { title: "Families", path: "/families" },
    NavItem { title: "Students", path: "/students" },
    NavItem { title: "Women Empowerment", path: "/women-empowerment" },
    NavItem { title: "Tutors", path: "/tutors" },
    NavItem { title: "Volunteers", path: "/volunteers" },
    NavItem { title: "Reports", path: "/reports" },
];

pub async fn navigation() -> Json<&'static [NavItem]> {
    Json(NAVIGATION)
}

#[derive(Debug, Serialize)]
struct NotFoundView {
    status: u16,
    message: &'static str,
    path: String,
    home: &'static str,
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::warn!("404: no route for {}", uri.path());
    let view = NotFoundView {
        status: 404,
        message: "Oops! Page not found",
        path: uri.path().to_string(),
        home: "/",
    };
    (StatusCode::NOT_FOUND, Json(view))
}

/// Page, create, update and flag routes for one domain.
fn domain_routes<R: DomainPage>(router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    let base = format!("/{}", R::DOMAIN.slug());
    router
        .route(&base, get(domain_page::<R>).post(create_record::<R>))
        .route(&format!("{}/:id", base), put(update_record::<R>))
        .route(&format!("{}/:id/flag", base), put(flag_record::<R>))
}

pub fn router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/navigation", get(navigation))
        .route("/", get(dashboard))
        .route("/dashboard", get(dashboard))
        .route("/reports", get(reports_page))
        .route("/export", get(export));

    let router = domain_routes::<Family>(router);
    let router = domain_routes::<Student>(router);
    let router = domain_routes::<WomanInProgram>(router);
    let router = domain_routes::<Tutor>(router);
    let router = domain_routes::<Volunteer>(router);

    router.fallback(not_found).with_state(state)
}
