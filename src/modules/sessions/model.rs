pub use classflow_models::sessions::*;
