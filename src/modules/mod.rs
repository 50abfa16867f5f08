//! Feature modules. Each one has the same layout:
//!
//! - `model.rs`: DTOs and entities (re-exported from `classflow-models`)
//! - `service.rs`: database access and business rules
//! - `controller.rs`: axum handlers with OpenAPI annotations
//! - `router.rs`: route table

pub mod attendance;
pub mod classes;
pub mod comments;
pub mod dashboard;
pub mod grades;
pub mod holidays;
pub mod managers;
pub mod sessions;
pub mod students;
pub mod teachers;
