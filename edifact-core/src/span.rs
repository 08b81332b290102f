//! Source positions and the document locator handed to event sinks.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A 1-based line/column position in the transcoded stream.
///
/// Lines count segments: the transcoder elides raw line breaks and
/// synthesizes exactly one after every segment terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Create a new location.
    #[inline]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first symbol of a stream.
    #[inline]
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Reports where the parse currently is.
///
/// The locator shares the segment stream's position cells, so a sink can
/// keep it across callbacks and query it from inside any event. The line is
/// that of the segment currently being turned into events, corrected by the
/// transcoder's structural offset (9 when the stream starts with a UNA
/// preamble). The column is the read position within that line, which
/// during a segment's events is just past its terminator.
#[derive(Debug, Clone)]
pub struct Locator {
    position: Rc<Cell<Location>>,
    cursor: Rc<Cell<Location>>,
    delta: usize,
}

impl Locator {
    pub(crate) fn new(
        position: Rc<Cell<Location>>,
        cursor: Rc<Cell<Location>>,
        delta: usize,
    ) -> Self {
        Self {
            position,
            cursor,
            delta,
        }
    }

    /// Current line, including the preamble offset.
    #[inline]
    pub fn line(&self) -> usize {
        self.position.get().line + self.delta
    }

    /// Current read column.
    #[inline]
    pub fn column(&self) -> usize {
        self.cursor.get().column
    }

    /// Start of the current segment in the transcoded stream, without the
    /// preamble offset.
    pub(crate) fn segment_location(&self) -> Location {
        self.position.get()
    }

    /// Current position as a [`Location`], including the preamble offset.
    pub fn location(&self) -> Location {
        Location::new(self.line(), self.column())
    }
}
