//! Engine error types.

use derive_more::{Display, Error};

/// The two ways an engine call can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// Caller misuse: bad index, bad count, bad deck.
    #[display("invalid argument")]
    InvalidArgument,
    /// Well-formed request that the rules (or the game's phase) do not allow.
    #[display("illegal move")]
    IllegalMove,
}

/// Engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {} at {}:{}", kind, message, file, line)]
pub struct KlondikeError {
    pub kind: ErrorKind,
    /// Human-readable reason, suitable for showing to the player.
    pub message: String,
    pub line: u32,
    pub file: &'static str,
}

impl KlondikeError {
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    #[track_caller]
    pub fn illegal_move(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalMove, message)
    }

    pub fn is_illegal_move(&self) -> bool {
        self.kind == ErrorKind::IllegalMove
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind == ErrorKind::InvalidArgument
    }
}

pub type Result<T, E = KlondikeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_message_and_location() {
        let err = KlondikeError::illegal_move("Only kings can be moved to empty cascade piles.");
        let text = err.to_string();
        assert!(text.starts_with("illegal move: Only kings"));
        assert!(text.contains("error.rs:"));
        assert!(err.is_illegal_move());
        assert!(!err.is_invalid_argument());
    }
}
