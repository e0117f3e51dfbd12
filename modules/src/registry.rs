//! Module registry — the lookup table from module key to verifier.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use badge_naming::Module;

use crate::builtin::builtin_modules;
use crate::error::ModuleError;
use crate::ghstar::GitHubStarsVerifier;
use crate::remote::RemoteVerifier;
use crate::verifier::CredentialVerifier;

/// Built once at start-up, read-only afterwards.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    verifiers: BTreeMap<String, Arc<dyn CredentialVerifier>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalogue. GitHub Stars is checked in-process; every
    /// other module is checked by the validation service at `validation_base_url`.
    pub fn builtin(validation_base_url: &str, timeout: Duration) -> Self {
        let mut registry = Self::new();
        for module in builtin_modules() {
            let verifier: Arc<dyn CredentialVerifier> = if module.key.as_str() == "ghstar" {
                Arc::new(GitHubStarsVerifier::new(module, timeout))
            } else {
                Arc::new(RemoteVerifier::new(module, validation_base_url, timeout))
            };
            registry.register(verifier);
        }
        registry
    }

    /// Register a verifier under its module's key, replacing any previous one.
    pub fn register(&mut self, verifier: Arc<dyn CredentialVerifier>) {
        let key = verifier.module().key.to_string();
        self.verifiers.insert(key, verifier);
    }

    pub fn get(&self, key: &str) -> Result<Arc<dyn CredentialVerifier>, ModuleError> {
        self.verifiers
            .get(key)
            .cloned()
            .ok_or_else(|| ModuleError::UnknownModule(key.to_string()))
    }

    pub fn module(&self, key: &str) -> Result<&Module, ModuleError> {
        self.verifiers
            .get(key)
            .map(|v| v.module())
            .ok_or_else(|| ModuleError::UnknownModule(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.verifiers.contains_key(key)
    }

    /// Registered module keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.verifiers.keys().cloned().collect()
    }

    pub fn modules(&self) -> Vec<&Module> {
        self.verifiers.values().map(|v| v.module()).collect()
    }

    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }
}
