//! Initialize-once settings holder and the process-wide accessor.

use once_cell::sync::OnceCell;

use crate::error::ConfigResult;
use crate::loader::SettingsLoader;
use crate::schema::Settings;

static GLOBAL: SettingsCell = SettingsCell::new();

/// Returns the process-wide settings, loading them on first use.
///
/// Reads `.env` from the working directory and overlays the process
/// environment. Every successful call returns the same instance.
///
/// A failed load is not cached: the next call reads the environment again.
///
/// # Errors
///
/// Propagates the [`crate::ConfigError`] from the first failing load attempt.
pub fn get_settings() -> ConfigResult<&'static Settings> {
    GLOBAL.get_or_load(&SettingsLoader::new())
}

/// Holder that constructs [`Settings`] at most once.
///
/// Concurrent first callers block until the in-flight construction finishes.
/// If construction fails the cell stays empty and a later call may retry.
#[derive(Debug, Default)]
pub struct SettingsCell {
    inner: OnceCell<Settings>,
}

impl SettingsCell {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OnceCell::new(),
        }
    }

    /// Returns the cached settings, if already constructed.
    #[must_use]
    pub fn get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns the cached settings, loading them with `loader` if empty.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; the cell remains empty in that case.
    pub fn get_or_load(&self, loader: &SettingsLoader) -> ConfigResult<&Settings> {
        self.get_or_try_init(|| loader.load())
    }

    /// Returns the cached settings, running `init` if empty.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `init`; the cell remains empty in that case.
    pub fn get_or_try_init<F>(&self, init: F) -> ConfigResult<&Settings>
    where
        F: FnOnce() -> ConfigResult<Settings>,
    {
        self.inner.get_or_try_init(init)
    }
}
