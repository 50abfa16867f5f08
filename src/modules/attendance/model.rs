pub use classflow_models::attendance::*;
