//! Unified error type for the darkgrid engine.

use darkgrid_protocol::ProtocolError;
use darkgrid_session::{RegistryError, SessionError};

/// Top-level error that wraps all crate-specific errors.
///
/// When embedding the `darkgrid` meta-crate, callers deal with this
/// single type; the `#[from]` attributes let `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DarkgridError {
    /// A parse error on client input.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (phase, role, target, join violations).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A registry-level error (unknown or colliding game code).
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkgrid_protocol::GameCode;

    #[test]
    fn test_from_protocol_error() {
        let err: DarkgridError = ProtocolError::MalformedCommand.into();
        assert!(matches!(err, DarkgridError::Protocol(_)));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_from_session_error() {
        let err: DarkgridError = SessionError::NotAuthorized.into();
        assert!(matches!(err, DarkgridError::Session(_)));
    }

    #[test]
    fn test_from_registry_error() {
        let err: DarkgridError =
            RegistryError::NotFound(GameCode::from("g1")).into();
        assert!(matches!(err, DarkgridError::Registry(_)));
        assert!(err.to_string().contains("g1"));
    }
}
