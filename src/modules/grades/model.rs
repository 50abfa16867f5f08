pub use classflow_models::grades::*;
