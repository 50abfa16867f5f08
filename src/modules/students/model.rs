pub use classflow_models::students::*;
