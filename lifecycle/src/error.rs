use badge_groups::GroupError;
use badge_modules::ModuleError;
use badge_naming::NamingError;
use badge_store::StoreError;
use badge_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error("handle is excluded from verification: {0}")]
    Blacklisted(String),

    /// The credential source answered and the answer was no.
    #[error("verification failed: {0}")]
    Rejected(String),

    #[error("verification record does not belong to {0}")]
    NotOwner(String),

    #[error("credential check timed out after {0} seconds")]
    Timeout(u64),

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Groups(#[from] GroupError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LifecycleError {
    /// Whether the caller, rather than the service or its collaborators, is
    /// at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::Types(_)
                | Self::Blacklisted(_)
                | Self::Rejected(_)
                | Self::NotOwner(_)
                | Self::Module(ModuleError::UnknownModule(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_and_server_errors() {
        assert!(LifecycleError::Rejected("no".into()).is_client_error());
        assert!(LifecycleError::Module(ModuleError::UnknownModule("x".into())).is_client_error());
        assert!(!LifecycleError::Module(ModuleError::Unreachable("x".into())).is_client_error());
        assert!(!LifecycleError::Groups(GroupError::ListNotFound("t".into())).is_client_error());
        assert!(!LifecycleError::Store(StoreError::Backend("io".into())).is_client_error());
        assert!(!LifecycleError::Timeout(10).is_client_error());
    }
}
