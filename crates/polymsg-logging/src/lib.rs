//! polymsg-logging - Tracing subscriber bootstrap
//!
//! This crate provides:
//! - [`init_logging`] to install a stderr subscriber once per process
//! - [`ReloadHandle`] to change the level after installation
//! - [`LogLevel`] shared by the CLI flags and the config file

mod init;
mod level;
mod reload;

pub use init::{LOG_ENV, init_logging};
pub use level::{LogLevel, ParseLevelError};
pub use reload::{LoggingError, LoggingResult, ReloadHandle};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, ReloadHandle, init_logging};
}
