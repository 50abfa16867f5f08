//! # ClassFlow CLI
//!
//! Operational tooling for ClassFlow: schedule previews, session
//! regeneration and database seeding for development.
//!
//! ## Usage
//!
//! ```ignore
//! use classflow_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(8); // 8 classes with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod preview;
pub mod seeder;
