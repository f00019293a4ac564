pub mod config;
pub mod error;

pub use config::WorkbenchConfig;
pub use error::{CoreError, Result};
