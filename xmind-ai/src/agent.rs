//! Agent trait and the data it exchanges with callers.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by agent implementations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Error type shared by agent implementations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The supplied editing context cannot be used.
    #[error("invalid node context: {reason}")]
    InvalidContext {
        /// Reason describing why the context was rejected.
        reason: String,
    },

    /// Agent is misconfigured or missing credentials.
    #[error("agent not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The backing service could not produce suggestions.
    #[error("agent unavailable: {reason}")]
    Unavailable {
        /// Additional context for the failure.
        reason: String,
    },
}

impl AgentError {
    /// Convenience constructor for invalid contexts.
    #[must_use]
    pub fn invalid_context(reason: impl Into<String>) -> Self {
        Self::InvalidContext {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for unavailable backends.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing an agent instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentMetadata {
    provider: &'static str,
    model: String,
}

impl AgentMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// The mind-map node being edited.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NodeContext {
    topic: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ancestors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    siblings: Vec<String>,
}

impl NodeContext {
    /// Creates a context for the node with the given topic text.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidContext`] if the topic is blank.
    pub fn new(topic: impl Into<String>) -> AgentResult<Self> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(AgentError::invalid_context("node topic must not be empty"));
        }

        Ok(Self {
            topic,
            ancestors: Vec::new(),
            siblings: Vec::new(),
        })
    }

    /// Sets the topic path from the root down to the node's parent.
    #[must_use]
    pub fn with_ancestors(mut self, ancestors: Vec<String>) -> Self {
        self.ancestors = ancestors;
        self
    }

    /// Sets the topics of the node's siblings.
    #[must_use]
    pub fn with_siblings(mut self, siblings: Vec<String>) -> Self {
        self.siblings = siblings;
        self
    }

    /// Returns the node topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the ancestor topics, root first.
    #[must_use]
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Returns the sibling topics.
    #[must_use]
    pub fn siblings(&self) -> &[String] {
        &self.siblings
    }
}

/// Where a suggestion applies relative to the edited node.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// A new child topic.
    Child,
    /// A new sibling topic.
    Sibling,
    /// Replacement text for the node itself.
    Rewrite,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Child => "child",
            Self::Sibling => "sibling",
            Self::Rewrite => "rewrite",
        })
    }
}

/// A single AI-assisted suggestion.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Suggestion {
    kind: SuggestionKind,
    text: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(kind: SuggestionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Returns the suggestion kind.
    #[must_use]
    pub const fn kind(&self) -> SuggestionKind {
        self.kind
    }

    /// Returns the suggested topic text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// AI assistance for XMind node editing.
///
/// Implementations live outside this workspace; this trait is the boundary
/// the rest of the service programs against.
#[async_trait]
pub trait XMindAgent: Send + Sync {
    /// Returns basic metadata describing the agent instance.
    fn metadata(&self) -> &AgentMetadata;

    /// Produces suggestions for the node described by `context`.
    async fn suggest(&self, context: &NodeContext) -> AgentResult<Vec<Suggestion>>;
}
