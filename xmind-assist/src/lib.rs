//! XMind assistant service SDK facade.
//!
//! Bundles the workspace crates behind feature flags so downstream users can
//! enable only the components they need.

#![warn(missing_docs, clippy::pedantic)]

/// Settings management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use xmind_config as config;

/// Process-wide settings accessor (enabled by `config` feature).
#[cfg(feature = "config")]
pub use xmind_config::get_settings;

/// AI assistance boundary (enabled by `ai` feature).
#[cfg(feature = "ai")]
pub use xmind_ai as ai;

/// The node-editing agent trait (enabled by `ai` feature).
#[cfg(feature = "ai")]
pub use xmind_ai::XMindAgent;
