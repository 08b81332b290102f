//! Error taxonomy.
//!
//! Grammars fail with [`GrammarError`]; the parser converts every grammar
//! failure exactly once into the most specific [`Error`] category, so
//! callers can tell malformed data ([`Error::Syntax`]) apart from a missing
//! directory ([`Error::UnsupportedDirectory`]) or a sink that gave up
//! ([`Error::Sink`]).

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

use crate::span::Location;

/// Errors surfaced by [`EdifactParser::parse`](crate::EdifactParser::parse).
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing leading tag, truncated preamble, unknown
    /// encoding. Raised before the first event.
    #[error("not a valid EDIFACT stream: {0}")]
    StreamFormat(String),

    /// The envelope or a directory grammar could not match the input.
    #[error("syntax error at {location}: {message}")]
    Syntax { message: String, location: Location },

    /// No grammar is registered for the directory a message header names.
    #[error("unsupported EDIFACT directory `{0}`")]
    UnsupportedDirectory(String),

    /// The downstream sink rejected an event.
    #[error(transparent)]
    Sink(SinkError),

    /// A primitive was invoked that has no meaning on the normalized stream.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Parser options could not be read.
    #[error("invalid parser options: {0}")]
    InvalidOptions(String),
}

impl Error {
    pub(crate) fn stream_format(message: impl Into<String>) -> Self {
        Self::StreamFormat(message.into())
    }

    pub(crate) fn syntax(message: impl Into<String>, location: Location) -> Self {
        Self::Syntax {
            message: message.into(),
            location,
        }
    }
}

impl From<GrammarError> for Error {
    fn from(error: GrammarError) -> Self {
        match error {
            GrammarError::Syntax { message, location } => Self::Syntax { message, location },
            GrammarError::Sink(source) => Self::Sink(source),
            GrammarError::Io(source) => Self::Io(source),
        }
    }
}

impl From<SinkError> for Error {
    fn from(error: SinkError) -> Self {
        Self::Sink(error)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of an envelope or directory grammar.
///
/// A syntax failure carries its location; the other variants wrap the
/// lower-level cause that interrupted the grammar.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("{message} at {location}")]
    Syntax { message: String, location: Location },

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl GrammarError {
    pub fn syntax(message: impl Into<String>, location: Location) -> Self {
        Self::Syntax {
            message: message.into(),
            location,
        }
    }
}

/// Error raised by an [`EventSink`](crate::EventSink).
///
/// Sinks wrap whatever stopped them; the parser propagates it unchanged.
pub struct SinkError(Box<dyn StdError + Send + Sync>);

impl SinkError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(source.into())
    }

    /// The wrapped error.
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    /// Unwrap the boxed error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
        self.0
    }
}

impl fmt::Debug for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SinkError").field(&self.0).finish()
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event sink failed: {}", self.0)
    }
}

impl StdError for SinkError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_syntax_keeps_location() {
        let err: Error = GrammarError::syntax("unexpected segment", Location::new(4, 2)).into();
        match err {
            Error::Syntax { message, location } => {
                assert_eq!(message, "unexpected segment");
                assert_eq!(location, Location::new(4, 2));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_grammar_sink_is_unwrapped() {
        let err: Error = GrammarError::Sink(SinkError::new("disk full")).into();
        match err {
            Error::Sink(inner) => assert_eq!(inner.get_ref().to_string(), "disk full"),
            other => panic!("expected sink error, got {:?}", other),
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::UnsupportedDirectory("D99Z".into()).to_string(),
            "unsupported EDIFACT directory `D99Z`"
        );
        assert_eq!(
            Error::stream_format("got XYZ").to_string(),
            "not a valid EDIFACT stream: got XYZ"
        );
    }
}
