//! Admission policy: which RPC methods may be relayed.

use std::collections::HashSet;

use crate::config::schema::AdmissionConfig;

/// Allow/deny decision applied to a method name before relaying.
///
/// Implementations must be pure: same method, same answer, no side
/// effects and no per-request state.
pub trait AdmissionPolicy: Send + Sync {
    /// Returns true if a request naming `method` may be forwarded.
    fn should_relay(&self, method: &str) -> bool;
}

/// Config-driven admission rules.
///
/// The deny list always wins. An empty allow list admits every method
/// not explicitly denied; a non-empty allow list admits only its members.
#[derive(Debug, Clone, Default)]
pub struct MethodRules {
    allowed: HashSet<String>,
    denied: HashSet<String>,
}

impl MethodRules {
    /// Build rules from the admission section of the config.
    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self {
            allowed: config.allowed_methods.iter().cloned().collect(),
            denied: config.denied_methods.iter().cloned().collect(),
        }
    }
}

impl AdmissionPolicy for MethodRules {
    fn should_relay(&self, method: &str) -> bool {
        if self.denied.contains(method) {
            return false;
        }
        self.allowed.is_empty() || self.allowed.contains(method)
    }
}
