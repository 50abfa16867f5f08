pub use classflow_models::managers::*;
