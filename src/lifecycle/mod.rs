pub mod status;

pub use status::{Status, StatusChange, StatusSnapshot};
