//! Error types for the protocol layer.

/// Errors from parsing client input.
///
/// Both variants are recoverable: the session turns them into an in-band
/// system notice to the issuing player, never a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A command line did not split into a name and exactly one argument.
    #[error("malformed command: expected a command name and one argument")]
    MalformedCommand,

    /// The command name is not recognized.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
