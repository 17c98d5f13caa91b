//! AI assistance for XMind node editing.
//!
//! Only the capability boundary lives here: the [`XMindAgent`] trait and the
//! types it exchanges. Concrete agents are provided elsewhere.

#![warn(missing_docs, clippy::pedantic)]

pub mod agent;

pub use agent::{
    AgentError, AgentMetadata, AgentResult, NodeContext, Suggestion, SuggestionKind, XMindAgent,
};
