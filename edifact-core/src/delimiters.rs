//! Service characters of an interchange.
//!
//! EDIFACT reserves six characters. The standard set is `: + . ? * '`; a UNA
//! preamble may replace it for the whole interchange. A space in the
//! repetition or release position of UNA means the character is not used.

/// Standard component data element separator.
pub const COMPONENT_SEPARATOR: char = ':';
/// Standard data element separator.
pub const DATA_SEPARATOR: char = '+';
/// Standard decimal mark.
pub const DECIMAL_MARK: char = '.';
/// Standard release (escape) character.
pub const ESCAPE: char = '?';
/// Standard repetition separator.
pub const REPETITION_SEPARATOR: char = '*';
/// Standard segment terminator.
pub const SEGMENT_TERMINATOR: char = '\'';

/// Raw line-break characters dropped from the input.
pub const LINE_BREAKS: [char; 3] = ['\n', '\r', '\u{0c}'];

/// Whether `c` is one of the standard characters a release character may
/// precede.
#[inline]
pub fn is_standard_control(c: char) -> bool {
    matches!(
        c,
        COMPONENT_SEPARATOR | DATA_SEPARATOR | SEGMENT_TERMINATOR | REPETITION_SEPARATOR | ESCAPE
    )
}

#[inline]
pub fn is_line_break(c: char) -> bool {
    LINE_BREAKS.contains(&c)
}

/// The delimiter set of one interchange. Read once, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub component: char,
    pub data: char,
    pub decimal: char,
    pub escape: Option<char>,
    pub repetition: Option<char>,
    pub segment: char,
}

impl Delimiters {
    /// The standard set.
    pub const STANDARD: Delimiters = Delimiters {
        component: COMPONENT_SEPARATOR,
        data: DATA_SEPARATOR,
        decimal: DECIMAL_MARK,
        escape: Some(ESCAPE),
        repetition: Some(REPETITION_SEPARATOR),
        segment: SEGMENT_TERMINATOR,
    };

    /// Build from the six characters following a UNA tag, in their
    /// positional order: component, data, decimal, release, repetition,
    /// terminator.
    pub fn from_una(chars: [char; 6]) -> Self {
        let [component, data, decimal, escape, repetition, segment] = chars;
        Self {
            component,
            data,
            decimal,
            escape: (escape != ' ').then_some(escape),
            repetition: (repetition != ' ').then_some(repetition),
            segment,
        }
    }

    /// True when every structural character has its standard value, so the
    /// stream can be read without remapping. An unused repetition separator
    /// still counts as standard.
    pub fn is_standard(&self) -> bool {
        self.component == COMPONENT_SEPARATOR
            && self.data == DATA_SEPARATOR
            && self.decimal == DECIMAL_MARK
            && self.escape == Some(ESCAPE)
            && matches!(self.repetition, None | Some(REPETITION_SEPARATOR))
            && self.segment == SEGMENT_TERMINATOR
    }

    /// Whether `c` is a declared control character that a release character
    /// may escape.
    pub fn is_escapable(&self, c: char) -> bool {
        c == self.component
            || c == self.data
            || c == self.segment
            || self.repetition == Some(c)
            || self.escape == Some(c)
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::STANDARD
    }
}
