//! Parser configuration.
//!
//! ```toml
//! lookahead_limit = 512
//! listener_type = "captured"
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::transcoder::DEFAULT_LOOKAHEAD;

/// Which header's message type is reported to a
/// [`MessageListener`](crate::MessageListener) for interactive messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerTypeSource {
    /// The type captured from the message's own header.
    #[default]
    Captured,
    /// Always the batch (UNH) record's type, which is empty in a purely
    /// interactive interchange. Kept for consumers that relied on it.
    BatchHeader,
}

/// Options for [`EdifactParser`](crate::EdifactParser).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Maximum number of leading whitespace characters skipped before the
    /// first segment tag.
    pub lookahead_limit: usize,
    pub listener_type: ListenerTypeSource,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            lookahead_limit: DEFAULT_LOOKAHEAD,
            listener_type: ListenerTypeSource::default(),
        }
    }
}

impl ParserOptions {
    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::InvalidOptions(e.to_string()))
    }

    pub fn with_lookahead_limit(mut self, limit: usize) -> Self {
        self.lookahead_limit = limit;
        self
    }

    pub fn with_listener_type(mut self, source: ListenerTypeSource) -> Self {
        self.listener_type = source;
        self
    }
}
