pub use classflow_models::comments::*;
