//! # ClassFlow Core
//!
//! Foundational types shared by every ClassFlow crate:
//!
//! - [`errors`]: [`AppError`], the HTTP-aware error returned by services and handlers
//! - [`pagination`]: query parameters and response metadata for list endpoints
//! - [`serde`]: deserialization helpers for request bodies
//!
//! # Example
//!
//! ```ignore
//! use classflow_core::{AppError, PaginationParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Class not found"));
//! let params = PaginationParams::default();
//! assert_eq!(params.limit(), 20);
//! ```

pub mod errors;
pub mod pagination;
pub mod serde;

pub use errors::{AppError, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
