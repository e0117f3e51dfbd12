//! Cached operator session.

use std::sync::Arc;

use crate::kv::{KvStore, ACCESS_JWT_KEY, ENDPOINT_KEY};
use crate::StoreError;

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_jwt: String,
    /// Personal data server the operator account lives on.
    pub endpoint: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_jwt", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// The reserved keys of the `default` namespace.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Both keys must be present for a session to count.
    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        let jwt = self.kv.get(ACCESS_JWT_KEY)?;
        let endpoint = self.kv.get(ENDPOINT_KEY)?;
        match (jwt, endpoint) {
            (Some(jwt), Some(endpoint)) if !jwt.is_empty() && !endpoint.is_empty() => {
                Ok(Some(Session {
                    access_jwt: String::from_utf8_lossy(&jwt).into_owned(),
                    endpoint: String::from_utf8_lossy(&endpoint).into_owned(),
                }))
            }
            _ => Ok(None),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.kv.put(ACCESS_JWT_KEY, session.access_jwt.as_bytes())?;
        self.kv.put(ENDPOINT_KEY, session.endpoint.as_bytes())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.kv.delete(ACCESS_JWT_KEY)?;
        self.kv.delete(ENDPOINT_KEY)
    }
}
