//! Knowledge base configuration.

use serde::{Deserialize, Serialize};

use crate::error::KbError;

/// Which items a retraction cascade may remove once their support is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetractionPolicy {
    /// Asserted facts and asserted rules both survive losing their support.
    #[default]
    ProtectAsserted,

    /// Unsupported facts are removed even when asserted; asserted rules
    /// survive. Kept for compatibility with knowledge bases built around
    /// that behaviour.
    CascadeFacts,
}

impl RetractionPolicy {
    /// Whether an unsupported fact with the given flag should be removed.
    pub fn removes_fact(&self, asserted: bool) -> bool {
        match self {
            RetractionPolicy::ProtectAsserted => !asserted,
            RetractionPolicy::CascadeFacts => true,
        }
    }

    /// Whether an unsupported rule with the given flag should be removed.
    pub fn removes_rule(&self, asserted: bool) -> bool {
        !asserted
    }
}

/// Configuration for a [`KnowledgeBase`](crate::KnowledgeBase).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KbConfig {
    pub retraction_policy: RetractionPolicy,

    /// Audit the justification graph after every assert and retract.
    pub verify_graph: bool,
}

impl KbConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    ///
    /// ```toml
    /// retraction-policy = "protect-asserted"
    /// verify-graph = true
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, KbError> {
        Ok(toml::from_str(source)?)
    }

    /// Default configuration with graph auditing switched on.
    pub fn verified() -> Self {
        Self {
            verify_graph: true,
            ..Self::default()
        }
    }

    pub fn with_retraction_policy(mut self, policy: RetractionPolicy) -> Self {
        self.retraction_policy = policy;
        self
    }
}
