// Infrastructure layer - External dependencies and adapters
pub mod chunked_export;
pub mod config;
pub mod fixture_store;
pub mod fixtures;
pub mod http_response;
pub mod http_store;
