pub use classflow_models::dashboard::*;
