//! Module key type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Identifies a verification module, e.g. `mvp` or `ghstar`.
///
/// Keys are lower-case ASCII alphanumerics. They never contain `-`, because
/// membership records are keyed `"{module}-{verificationId}"` and split on the
/// first dash.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleKey(String);

impl ModuleKey {
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let key = raw.trim().to_ascii_lowercase();
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(TypesError::InvalidModuleKey(raw.to_string()));
        }
        Ok(Self(key))
    }

    /// For keys compiled into the binary. Built-in keys are known valid.
    pub fn from_static(key: &'static str) -> Self {
        debug_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ModuleKey {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ModuleKey> for String {
    fn from(k: ModuleKey) -> Self {
        k.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_keys() {
        assert_eq!(ModuleKey::parse("MVP").unwrap().as_str(), "mvp");
        assert_eq!(ModuleKey::parse("ghstar").unwrap().as_str(), "ghstar");
    }

    #[test]
    fn rejects_dashes_and_empty() {
        assert!(ModuleKey::parse("ms-mvp").is_err());
        assert!(ModuleKey::parse("").is_err());
        assert!(ModuleKey::parse("a b").is_err());
    }
}
