//! Settings management for the XMind assistant.
//!
//! Settings are read from the process environment, with a local `.env` file
//! supplying defaults for anything not set live. [`get_settings`] validates
//! them once and hands out the same instance for the rest of the process.

#![warn(missing_docs, clippy::pedantic)]

mod cell;
mod error;
pub mod loader;
pub mod schema;

/// Process-wide accessor and the initialize-once holder behind it.
pub use cell::{SettingsCell, get_settings};
/// Error type and result alias for settings loading.
pub use error::{ConfigError, ConfigResult, FieldIssue};
/// Source configuration for settings loading.
pub use loader::{SettingsLoader, load_env_file, merge_sources};
/// Validated settings record.
pub use schema::Settings;
