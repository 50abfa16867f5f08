pub use classflow_models::teachers::*;
