pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod types;

pub use config::Config;
pub use error::{Result, StatusError};
pub use lifecycle::{Status, StatusChange, StatusSnapshot};
pub use registry::{OverallStatus, RegistrySnapshot, StatusRegistry};
pub use types::*;
