//! The single error kind this crate produces: a decode failure.
//!
//! Encoding does not fail for values that were constructed in memory, except
//! for the one case described by [`DecodeError::uninitialized_optional`].

use alloc::borrow::Cow;

/// A JSON decode (or, rarely, encode) failure.
///
/// Carries a human-readable message and the byte offset into the input at
/// which the failure was detected. Exact wording is not part of the wire
/// contract, but the messages produced by the constructors below are exact
/// and covered by tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct DecodeError {
    message: Cow<'static, str>,
    /// Byte offset into the input at which the failure was detected.
    pub offset: usize,
}

impl DecodeError {
    /// Construct an error with an arbitrary message, for scalar codecs that
    /// need a message not already distinguished below.
    #[must_use]
    pub fn new(message: impl Into<Cow<'static, str>>, offset: usize) -> Self {
        let message = message.into();
        log::trace!("decode failed: {message} at byte {offset}");
        Self { message, offset }
    }

    /// The message alone, without the offset suffix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn unexpected_end_of_input(offset: usize) -> Self {
        Self::new("Unexpected end of input", offset)
    }

    pub(crate) fn unexpected_input(offset: usize) -> Self {
        Self::new("Unexpected input", offset)
    }

    pub(crate) fn unterminated_string(offset: usize) -> Self {
        Self::new("Unterminated string", offset)
    }

    pub(crate) fn invalid_escape_character(offset: usize) -> Self {
        Self::new("Invalid escape character", offset)
    }

    pub(crate) fn invalid_unicode_escape(offset: usize) -> Self {
        Self::new(r"\u must be followed by 4 hex digits", offset)
    }

    pub(crate) fn missing_required_fields(offset: usize) -> Self {
        Self::new("Missing required field(s)", offset)
    }

    pub(crate) fn number_out_of_range(offset: usize) -> Self {
        Self::new("Number out of range", offset)
    }

    /// The one distinguished encode failure: an optional-like wrapper was
    /// asked to encode a value it considers absent.
    #[must_use]
    pub fn uninitialized_optional() -> Self {
        Self::new("Cannot encode uninitialized optional", 0)
    }
}
