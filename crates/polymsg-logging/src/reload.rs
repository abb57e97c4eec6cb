//! Process-wide handle for switching the level after startup

use crate::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use thiserror::Error;
use tracing_subscriber::Registry;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload;

pub type LoggingResult<T> = Result<T, LoggingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    #[error("reload handle not initialized")]
    NotInitialized,

    #[error("failed to reload filter: {0}")]
    Reload(String),

    #[error("global subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Handle for changing the level filter after the subscriber is installed
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<LevelFilter, Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Handle shared by the whole process
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    /// Stores the handle produced by `init_logging`
    pub fn set_handle(&self, handle: reload::Handle<LevelFilter, Registry>) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Swaps the installed level filter for `level`
    pub fn reload_level(&self, level: LogLevel) -> LoggingResult<()> {
        let guard = self.handle.lock();
        let handle = guard.as_ref().ok_or(LoggingError::NotInitialized)?;
        handle
            .reload(LevelFilter::from(level))
            .map_err(|e| LoggingError::Reload(e.to_string()))
    }

    /// Level currently applied, if the handle is set and its subscriber is alive
    pub fn current_level(&self) -> Option<LevelFilter> {
        let guard = self.handle.lock();
        guard.as_ref().and_then(|handle| handle.clone_current())
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reload/reload_tests.rs"]
mod reload_tests;
