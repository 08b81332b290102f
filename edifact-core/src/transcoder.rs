//! Character-level transcoder.
//!
//! Turns raw interchange text into a canonical [`Symbol`] stream in which
//! the service characters always carry their standard meaning:
//!
//! - Declared separators become separator symbols, whatever characters the
//!   UNA preamble chose for them.
//! - Raw line breaks are dropped; one [`Symbol::LineBreak`] follows every
//!   segment terminator, so each segment sits on its own line.
//! - A release character followed by a declared service character decodes
//!   to that character as a literal. A release character followed by
//!   anything else is passed through with the next character.
//!
//! # Initialization
//!
//! The leading tag is inspected once, eagerly:
//!
//! ```text
//! <ws>* UNA c d n r p t ...   custom or standard delimiters, delta 9
//! <ws>* UNB|UIB|UNH|UIH ...   rewind, standard delimiters
//! <ws>* anything else         stream format error
//! ```
//!
//! # Classification order
//!
//! When a preamble declares the same character twice, the first match wins:
//! component, data, segment terminator, repetition, release. Declared
//! characters are matched before raw line breaks are dropped.

use std::collections::VecDeque;
use std::io;

use tracing::debug;

use crate::delimiters::{
    is_line_break, is_standard_control, Delimiters, COMPONENT_SEPARATOR, DATA_SEPARATOR,
    ESCAPE, REPETITION_SEPARATOR, SEGMENT_TERMINATOR,
};
use crate::error::{Error, Result};
use crate::source::CharSource;

/// Default number of whitespace characters tolerated before the leading tag.
pub const DEFAULT_LOOKAHEAD: usize = 256;

/// Structural offset recorded when the stream starts with a UNA preamble.
pub const PREAMBLE_DELTA: usize = 9;

/// One unit of canonical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Ordinary data character.
    Char(char),
    /// A standard service character appearing as literal data.
    Escaped(char),
    ComponentSeparator,
    DataSeparator,
    RepetitionSeparator,
    SegmentTerminator,
    /// Synthesized after every segment terminator.
    LineBreak,
}

impl Symbol {
    /// Append the symbol's standard-syntax rendering.
    ///
    /// Literal service characters are written with the standard release
    /// character in front, so the rendering reads back to the same symbols.
    pub fn push_canonical(self, out: &mut String) {
        match self {
            Symbol::Char(c) => out.push(c),
            Symbol::Escaped(c) => {
                out.push(ESCAPE);
                out.push(c);
            }
            Symbol::ComponentSeparator => out.push(COMPONENT_SEPARATOR),
            Symbol::DataSeparator => out.push(DATA_SEPARATOR),
            Symbol::RepetitionSeparator => out.push(REPETITION_SEPARATOR),
            Symbol::SegmentTerminator => out.push(SEGMENT_TERMINATOR),
            Symbol::LineBreak => out.push('\n'),
        }
    }

    /// The literal character carried by a data symbol.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        match self {
            Symbol::Char(c) | Symbol::Escaped(c) => Some(c),
            _ => None,
        }
    }
}

/// Stateful transcoder over a decoded character source.
pub struct Transcoder<'r> {
    source: CharSource<'r>,
    delimiters: Delimiters,
    standard: bool,
    queued: VecDeque<Symbol>,
    delta: usize,
}

impl<'r> Transcoder<'r> {
    /// Inspect the leading tag and set up the delimiter set.
    ///
    /// Fails with [`Error::StreamFormat`] when no tag follows at most
    /// `lookahead` whitespace characters, when the tag is not one of
    /// UNA/UNB/UIB/UNH/UIH, or when the preamble is truncated.
    pub fn new(mut source: CharSource<'r>, lookahead: usize) -> Result<Self> {
        let mut consumed = Vec::new();
        let mut skipped = 0;
        let first = loop {
            let c = source.next_char()?.ok_or_else(|| {
                Error::stream_format("end of input, expected UNA, UNB, UIB, UNH or UIH")
            })?;
            consumed.push(c);
            if !c.is_whitespace() {
                break c;
            }
            skipped += 1;
            if skipped > lookahead {
                return Err(Error::stream_format(format!(
                    "no tag within the first {} characters, expected UNA, UNB, UIB, UNH or UIH",
                    lookahead
                )));
            }
        };

        let mut tag = String::with_capacity(3);
        tag.push(first);
        for _ in 0..2 {
            let c = source
                .next_char()?
                .ok_or_else(|| Error::stream_format(format!("truncated leading tag `{}`", tag)))?;
            consumed.push(c);
            tag.push(c);
        }

        let mut transcoder = Self {
            source,
            delimiters: Delimiters::STANDARD,
            standard: true,
            queued: VecDeque::new(),
            delta: 0,
        };

        match tag.as_str() {
            "UNA" => {
                let mut chars = [' '; 6];
                for (i, slot) in chars.iter_mut().enumerate() {
                    *slot = transcoder.source.next_char()?.ok_or_else(|| {
                        Error::stream_format(format!(
                            "truncated UNA preamble, got {} of 6 service characters",
                            i
                        ))
                    })?;
                }
                transcoder.delimiters = Delimiters::from_una(chars);
                transcoder.standard = transcoder.delimiters.is_standard();
                transcoder.delta = PREAMBLE_DELTA;
            }
            "UNB" | "UIB" | "UNH" | "UIH" => {
                transcoder.source.unread(&consumed);
            }
            other => {
                return Err(Error::stream_format(format!(
                    "got `{}`, expected UNA, UNB, UIB, UNH or UIH",
                    other
                )));
            }
        }

        debug!(
            tag = %tag,
            standard = transcoder.standard,
            delta = transcoder.delta,
            "transcoder initialized"
        );
        Ok(transcoder)
    }

    /// The delimiter set in force for this interchange.
    #[inline]
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// True when the input is read without remapping.
    #[inline]
    pub fn is_standard(&self) -> bool {
        self.standard
    }

    /// Line offset to add to stream positions (9 after a UNA preamble).
    #[inline]
    pub fn delta(&self) -> usize {
        self.delta
    }

    /// Read the next normalized symbol, `None` at end of input.
    pub fn read(&mut self) -> io::Result<Option<Symbol>> {
        if let Some(symbol) = self.queued.pop_front() {
            return Ok(Some(symbol));
        }
        while let Some(c) = self.source.next_char()? {
            let symbol = if self.standard {
                self.classify_standard(c)?
            } else {
                self.classify_custom(c)?
            };
            if symbol.is_some() {
                return Ok(symbol);
            }
        }
        Ok(None)
    }

    /// Fill `buf` with symbols. Returns the number written; 0 means end of
    /// input.
    pub fn read_block(&mut self, buf: &mut [Symbol]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.read()? {
                Some(symbol) => {
                    buf[n] = symbol;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    /// Lines are synthesized, not read: line reads are not supported.
    pub fn read_line(&mut self) -> Result<String> {
        Err(Error::UnsupportedOperation(
            "line reads are meaningless on a transcoded EDIFACT stream",
        ))
    }

    /// Drain the rest of the stream into its standard-syntax rendering.
    pub fn canonical_text(mut self) -> io::Result<String> {
        let mut out = String::new();
        while let Some(symbol) = self.read()? {
            symbol.push_canonical(&mut out);
        }
        Ok(out)
    }

    fn classify_standard(&mut self, c: char) -> io::Result<Option<Symbol>> {
        let symbol = match c {
            COMPONENT_SEPARATOR => Symbol::ComponentSeparator,
            DATA_SEPARATOR => Symbol::DataSeparator,
            SEGMENT_TERMINATOR => self.terminate(),
            REPETITION_SEPARATOR if self.delimiters.repetition.is_some() => {
                Symbol::RepetitionSeparator
            }
            ESCAPE => return self.release(c).map(Some),
            '\n' | '\r' | '\u{0c}' => return Ok(None),
            _ => Symbol::Char(c),
        };
        Ok(Some(symbol))
    }

    fn classify_custom(&mut self, c: char) -> io::Result<Option<Symbol>> {
        let d = self.delimiters;
        let symbol = if c == d.component {
            Symbol::ComponentSeparator
        } else if c == d.data {
            Symbol::DataSeparator
        } else if c == d.segment {
            self.terminate()
        } else if d.repetition == Some(c) {
            Symbol::RepetitionSeparator
        } else if d.escape == Some(c) {
            return self.release(c).map(Some);
        } else if is_line_break(c) {
            return Ok(None);
        } else if is_standard_control(c) {
            // a standard service character that this dialect uses as data
            Symbol::Escaped(c)
        } else {
            Symbol::Char(c)
        };
        Ok(Some(symbol))
    }

    fn terminate(&mut self) -> Symbol {
        self.queued.push_back(Symbol::LineBreak);
        Symbol::SegmentTerminator
    }

    /// Decode the character after a release. Raw line breaks between the
    /// two are dropped, as everywhere else.
    fn release(&mut self, escape: char) -> io::Result<Symbol> {
        let next = loop {
            match self.source.next_char()? {
                Some(c) if is_line_break(c) && !self.delimiters.is_escapable(c) => continue,
                other => break other,
            }
        };
        match next {
            Some(next) if self.delimiters.is_escapable(next) => {
                if is_standard_control(next) {
                    Ok(Symbol::Escaped(next))
                } else {
                    Ok(Symbol::Char(next))
                }
            }
            Some(next) => {
                self.source.unread(&[next]);
                Ok(Symbol::Char(escape))
            }
            None => Ok(Symbol::Char(escape)),
        }
    }
}

impl Iterator for Transcoder<'_> {
    type Item = io::Result<Symbol>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}
