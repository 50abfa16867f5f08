pub use classflow_models::holidays::*;
