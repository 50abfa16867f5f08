pub use classflow_models::classes::*;
