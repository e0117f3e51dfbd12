//! Nullable credential verifier — scripted answers per verification ID.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use badge_modules::{CredentialVerifier, ModuleError, Verdict};
use badge_naming::Module;
use badge_types::Handle;

#[derive(Clone, Debug)]
enum Scripted {
    Verdict(Verdict),
    Unreachable,
}

/// Unknown IDs are rejected. Answers can be changed between calls to
/// simulate a credential lapsing.
pub struct NullVerifier {
    module: Module,
    answers: Mutex<HashMap<String, Scripted>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl NullVerifier {
    pub fn new(module: Module) -> Self {
        Self {
            module,
            answers: Mutex::new(HashMap::new()),
            delay: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn verified(self, id: &str) -> Self {
        self.set_verified(id);
        self
    }

    pub fn set_verified(&self, id: &str) {
        self.answers
            .lock()
            .unwrap()
            .insert(id.to_string(), Scripted::Verdict(Verdict::Verified));
    }

    pub fn set_rejected(&self, id: &str, reason: &str) {
        self.answers.lock().unwrap().insert(
            id.to_string(),
            Scripted::Verdict(Verdict::Rejected(reason.to_string())),
        );
    }

    /// The credential source cannot be reached for `id`.
    pub fn set_unreachable(&self, id: &str) {
        self.answers
            .lock()
            .unwrap()
            .insert(id.to_string(), Scripted::Unreachable);
    }

    /// Every answer arrives after `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for NullVerifier {
    fn module(&self) -> &Module {
        &self.module
    }

    async fn verify(&self, verification_id: &str, _handle: &Handle) -> Result<Verdict, ModuleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let answer = self.answers.lock().unwrap().get(verification_id).cloned();
        match answer {
            Some(Scripted::Verdict(verdict)) => Ok(verdict),
            Some(Scripted::Unreachable) => Err(ModuleError::Unreachable(format!(
                "{}: scripted outage",
                self.module.key
            ))),
            None => Ok(Verdict::Rejected(format!(
                "unknown verification ID: {verification_id}"
            ))),
        }
    }
}
