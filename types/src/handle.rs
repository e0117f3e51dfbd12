//! Social-network handles and verified identities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A network-qualified handle such as `alice.bsky.social`.
///
/// Handles are always stored trimmed and lower-cased, so two spellings of the
/// same handle compare equal and map to the same storage keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Normalize and validate a raw handle.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidHandle(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Handle> for String {
    fn from(h: Handle) -> Self {
        h.0
    }
}

/// A verified identity: the handle plus the stable DID it resolves to.
///
/// Created from a successful credential verification and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub handle: Handle,
    pub did: String,
}

impl Identity {
    pub fn new(handle: Handle, did: impl Into<String>) -> Self {
        Self {
            handle,
            did: did.into(),
        }
    }

    /// Whether a list entry carrying this handle or DID refers to this identity.
    pub fn matches(&self, handle: &str, did: &str) -> bool {
        (!did.is_empty() && did == self.did) || handle.eq_ignore_ascii_case(self.handle.as_str())
    }
}
