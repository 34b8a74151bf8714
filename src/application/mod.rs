// Application layer - Use cases and business logic
pub mod aggregate;
pub mod export_service;
pub mod filter;
pub mod page_service;
pub mod pages;
pub mod record_service;
pub mod record_store;
pub mod refresh;
pub mod view_model;
