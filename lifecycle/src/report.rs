//! Results of probation updates and status queries, in the wire shape the
//! reconciliation caller expects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    None,
    /// At least one module membership was removed.
    PartialRemoval,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResult {
    pub module_key: String,
    pub is_valid: bool,
    pub failure_count: u32,
    pub removed: bool,
    pub message_sent: bool,
    pub message_success: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub bsky_handle: String,
    pub module_results: BTreeMap<String, ModuleResult>,
    pub action: Action,
}

impl ValidationResult {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            bsky_handle: handle.into(),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, result: ModuleResult) {
        if result.removed {
            self.action = Action::PartialRemoval;
        }
        self.module_results.insert(result.module_key.clone(), result);
    }
}

/// Outcome counts of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub checked: usize,
    pub valid: usize,
    pub failed: usize,
    pub warned: usize,
    pub removed: usize,
    pub errors: usize,
}
