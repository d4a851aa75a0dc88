//! Chat-command parsing.
//!
//! A chat line starting with `/` is a command. A command must parse into
//! exactly a name and one argument token; the argument is an alias, which
//! the session resolves to a player. Recognized commands map one-to-one
//! onto night action kinds.

use crate::{ActionKind, ProtocolError};

/// The marker character that turns a chat line into a command.
pub const COMMAND_MARKER: char = '/';

/// Returns `true` if a chat line should be parsed as a command.
pub fn is_command(text: &str) -> bool {
    text.starts_with(COMMAND_MARKER)
}

/// A parsed chat command: an action kind and its alias argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: ActionKind,
    /// The target's alias as typed by the player.
    pub alias: String,
}

/// Parses a command line (including the leading marker).
///
/// # Errors
/// - [`ProtocolError::MalformedCommand`] unless the line splits into
///   exactly a command name and one argument.
/// - [`ProtocolError::UnknownCommand`] for an unrecognized name.
pub fn parse_command(text: &str) -> Result<Command, ProtocolError> {
    let mut tokens = text.split_whitespace();
    let name = tokens.next().ok_or(ProtocolError::MalformedCommand)?;
    let alias = tokens.next().ok_or(ProtocolError::MalformedCommand)?;
    if tokens.next().is_some() {
        return Err(ProtocolError::MalformedCommand);
    }

    let kind = match name {
        "/target" => ActionKind::Target,
        "/protect" => ActionKind::Protect,
        "/scan" => ActionKind::Scan,
        other => return Err(ProtocolError::UnknownCommand(other.to_string())),
    };

    Ok(Command {
        kind,
        alias: alias.to_string(),
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_recognizes_all_three() {
        assert_eq!(
            parse_command("/target bob").unwrap(),
            Command {
                kind: ActionKind::Target,
                alias: "bob".into()
            }
        );
        assert_eq!(
            parse_command("/protect b0b").unwrap().kind,
            ActionKind::Protect
        );
        assert_eq!(parse_command("/scan al1ce").unwrap().kind, ActionKind::Scan);
    }

    #[test]
    fn test_parse_command_requires_exactly_one_argument() {
        assert_eq!(
            parse_command("/target"),
            Err(ProtocolError::MalformedCommand)
        );
        assert_eq!(
            parse_command("/target bob carol"),
            Err(ProtocolError::MalformedCommand)
        );
        assert_eq!(parse_command(""), Err(ProtocolError::MalformedCommand));
    }

    #[test]
    fn test_parse_command_rejects_unknown_names() {
        assert_eq!(
            parse_command("/hack bob"),
            Err(ProtocolError::UnknownCommand("/hack".into()))
        );
    }

    #[test]
    fn test_parse_command_tolerates_extra_whitespace() {
        let cmd = parse_command("/scan    al1ce ").unwrap();
        assert_eq!(cmd.alias, "al1ce");
    }

    #[test]
    fn test_is_command_checks_leading_marker() {
        assert!(is_command("/scan al1ce"));
        assert!(!is_command("scan al1ce"));
        assert!(!is_command(" /scan al1ce"));
    }
}
