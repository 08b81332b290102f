//! The shared segment stream.
//!
//! Every grammar reads from the same [`SegmentStream`]: the envelope grammar
//! reads service segments, hands over to a directory grammar for a message
//! body, and resumes exactly where the body parse stopped. The stream splits
//! the transcoder's symbols into segments one at a time and tracks the
//! position reported by the [`Locator`].

use std::cell::Cell;
use std::rc::Rc;

use crate::error::GrammarError;
use crate::span::{Location, Locator};
use crate::transcoder::{Symbol, Transcoder};

/// One data element: its occurrences (split by the repetition separator),
/// each a list of components (split by the component separator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataElement {
    pub occurrences: Vec<Vec<String>>,
}

impl DataElement {
    /// True when every component of every occurrence is empty.
    pub fn is_empty(&self) -> bool {
        self.occurrences
            .iter()
            .all(|components| components.iter().all(String::is_empty))
    }
}

/// A parsed segment: tag plus data elements, nothing interpreted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: String,
    pub elements: Vec<DataElement>,
    pub location: Location,
}

/// Position-tracking reader of whole segments.
pub struct SegmentStream<'r> {
    transcoder: Transcoder<'r>,
    position: Rc<Cell<Location>>,
    cursor: Rc<Cell<Location>>,
}

impl<'r> SegmentStream<'r> {
    pub fn new(transcoder: Transcoder<'r>) -> Self {
        Self {
            transcoder,
            position: Rc::new(Cell::new(Location::start())),
            cursor: Rc::new(Cell::new(Location::start())),
        }
    }

    /// Locator tracking the segment most recently read and the read
    /// position.
    pub fn locator(&self) -> Locator {
        Locator::new(
            Rc::clone(&self.position),
            Rc::clone(&self.cursor),
            self.transcoder.delta(),
        )
    }

    /// Start of the segment most recently read.
    #[inline]
    pub fn location(&self) -> Location {
        self.position.get()
    }

    /// Position of the next unread symbol.
    #[inline]
    pub fn cursor(&self) -> Location {
        self.cursor.get()
    }

    #[inline]
    pub fn transcoder(&self) -> &Transcoder<'r> {
        &self.transcoder
    }

    /// Read the next segment, `None` when only whitespace remains.
    pub fn read_segment(&mut self) -> Result<Option<Segment>, GrammarError> {
        let first = loop {
            let at = self.cursor.get();
            match self.next_symbol()? {
                None => return Ok(None),
                Some(Symbol::LineBreak) => continue,
                Some(Symbol::Char(c)) if c.is_whitespace() => continue,
                Some(symbol) => break (symbol, at),
            }
        };
        let (mut symbol, location) = first;
        self.position.set(location);

        let mut tag = String::with_capacity(3);
        loop {
            match symbol {
                Symbol::Char(c) if c.is_ascii_alphanumeric() => tag.push(c),
                Symbol::DataSeparator | Symbol::SegmentTerminator => break,
                _ => {
                    return Err(GrammarError::syntax(
                        format!("invalid character in segment tag `{}`", tag),
                        self.cursor.get(),
                    ))
                }
            }
            symbol = self.expect_symbol(&tag)?;
        }
        if tag.len() != 3 {
            return Err(GrammarError::syntax(
                format!("invalid segment tag `{}`", tag),
                location,
            ));
        }

        let mut segment = Segment {
            tag,
            elements: Vec::new(),
            location,
        };
        if symbol == Symbol::SegmentTerminator {
            return Ok(Some(segment));
        }

        let mut element = DataElement::default();
        let mut components = Vec::new();
        let mut text = String::new();
        loop {
            match self.expect_symbol(&segment.tag)? {
                Symbol::Char(c) | Symbol::Escaped(c) => text.push(c),
                Symbol::ComponentSeparator => components.push(std::mem::take(&mut text)),
                Symbol::RepetitionSeparator => {
                    components.push(std::mem::take(&mut text));
                    element.occurrences.push(std::mem::take(&mut components));
                }
                Symbol::DataSeparator => {
                    components.push(std::mem::take(&mut text));
                    element.occurrences.push(std::mem::take(&mut components));
                    segment.elements.push(std::mem::take(&mut element));
                }
                Symbol::SegmentTerminator => {
                    components.push(text);
                    element.occurrences.push(components);
                    segment.elements.push(element);
                    return Ok(Some(segment));
                }
                Symbol::LineBreak => {}
            }
        }
    }

    fn expect_symbol(&mut self, tag: &str) -> Result<Symbol, GrammarError> {
        self.next_symbol()?.ok_or_else(|| {
            GrammarError::syntax(
                format!("unexpected end of input inside segment `{}`", tag),
                self.cursor.get(),
            )
        })
    }

    fn next_symbol(&mut self) -> Result<Option<Symbol>, GrammarError> {
        let symbol = self.transcoder.read()?;
        let mut cursor = self.cursor.get();
        match symbol {
            Some(Symbol::LineBreak) => {
                cursor.line += 1;
                cursor.column = 1;
            }
            Some(Symbol::Escaped(_)) => cursor.column += 2,
            Some(_) => cursor.column += 1,
            None => {}
        }
        self.cursor.set(cursor);
        Ok(symbol)
    }
}
