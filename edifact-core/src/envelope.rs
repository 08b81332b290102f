//! Envelope grammar: the service segments around and between messages.
//!
//! The envelope grammar is driven one service segment at a time by the
//! parser. It never parses a message body: when it has emitted a message
//! header (UNH or UIH) it returns, and the parser hands the stream to the
//! directory grammar named by that header.
//!
//! ```text
//! [UNB] ([UNG] (UNH body UNT)* [UNE])* [UNZ]      batch
//! [UIB] (UIH body UIT)* [UIZ]                     interactive
//! ```

use phf::phf_map;

use crate::error::GrammarError;
use crate::event::EventSink;
use crate::layout::{c, composite_c, composite_m, m, simple, SegmentLayout};
use crate::segment::SegmentStream;

/// Parses the interchange envelope.
pub trait EnvelopeGrammar {
    /// Parse one service segment and emit its events into `sink`.
    ///
    /// Returns `true` once the interchange has ended. A step that emits a
    /// message header must end with that header's closing event.
    fn parse_service_segment(
        &mut self,
        stream: &mut SegmentStream<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<bool, GrammarError>;
}

/// Service segment layouts, syntax version 4 names.
pub static SERVICE_SEGMENTS: phf::Map<&'static str, SegmentLayout> = phf_map! {
    "UNB" => SegmentLayout {
        tag: "UNB",
        name: "S_UNB",
        elements: &[
            composite_m("C_S001", &[m("D_0001"), m("D_0002"), c("D_0080"), c("D_0133")]),
            composite_m("C_S002", &[m("D_0004"), c("D_0007"), c("D_0008"), c("D_0042")]),
            composite_m("C_S003", &[m("D_0010"), c("D_0007"), c("D_0014"), c("D_0046")]),
            composite_m("C_S004", &[m("D_0017"), m("D_0019")]),
            simple(m("D_0020")),
            composite_c("C_S005", &[m("D_0022"), c("D_0025")]),
            simple(c("D_0026")),
            simple(c("D_0029")),
            simple(c("D_0031")),
            simple(c("D_0032")),
            simple(c("D_0035")),
        ],
    },
    "UNG" => SegmentLayout {
        tag: "UNG",
        name: "S_UNG",
        elements: &[
            simple(c("D_0038")),
            composite_c("C_S006", &[m("D_0040"), c("D_0007")]),
            composite_c("C_S007", &[m("D_0044"), c("D_0007")]),
            composite_c("C_S004", &[m("D_0017"), m("D_0019")]),
            simple(m("D_0048")),
            simple(c("D_0051")),
            composite_c("C_S008", &[m("D_0052"), m("D_0054"), c("D_0057")]),
            simple(c("D_0058")),
        ],
    },
    "UNE" => SegmentLayout {
        tag: "UNE",
        name: "S_UNE",
        elements: &[simple(m("D_0060")), simple(m("D_0048"))],
    },
    "UNZ" => SegmentLayout {
        tag: "UNZ",
        name: "S_UNZ",
        elements: &[simple(m("D_0036")), simple(m("D_0020"))],
    },
    "UNH" => SegmentLayout {
        tag: "UNH",
        name: "S_UNH",
        elements: &[
            simple(m("D_0062")),
            composite_m("C_S009", &[
                m("D_0065"), m("D_0052"), m("D_0054"), m("D_0051"),
                c("D_0057"), c("D_0110"), c("D_0113"),
            ]),
            simple(c("D_0068")),
            composite_c("C_S010", &[m("D_0070"), c("D_0073")]),
            composite_c("C_S016", &[m("D_0115"), c("D_0116"), c("D_0118"), c("D_0051")]),
            composite_c("C_S017", &[m("D_0121"), c("D_0122"), c("D_0124"), c("D_0051")]),
            composite_c("C_S018", &[m("D_0127"), c("D_0128"), c("D_0130"), c("D_0051")]),
        ],
    },
    "UNT" => SegmentLayout {
        tag: "UNT",
        name: "S_UNT",
        elements: &[simple(m("D_0074")), simple(m("D_0062"))],
    },
    "UIB" => SegmentLayout {
        tag: "UIB",
        name: "S_UIB",
        elements: &[
            composite_m("C_S001", &[m("D_0001"), m("D_0002"), c("D_0080"), c("D_0133")]),
            composite_c("C_S302", &[m("D_0300"), c("D_0303"), c("D_0051"), c("D_0304")]),
            composite_c("C_S301", &[m("D_0300"), c("D_0303"), c("D_0051")]),
            composite_c("C_S306", &[m("D_0065"), m("D_0052"), m("D_0054")]),
            composite_c("C_S002", &[m("D_0004"), c("D_0007"), c("D_0008"), c("D_0042")]),
            composite_c("C_S003", &[m("D_0010"), c("D_0007"), c("D_0014"), c("D_0046")]),
            simple(c("D_0020")),
            composite_c("C_S300", &[c("D_0338"), c("D_0314"), c("D_0336")]),
        ],
    },
    "UIZ" => SegmentLayout {
        tag: "UIZ",
        name: "S_UIZ",
        elements: &[
            composite_c("C_S302", &[m("D_0300"), c("D_0303"), c("D_0051"), c("D_0304")]),
            simple(c("D_0036")),
            simple(c("D_0020")),
        ],
    },
    "UIH" => SegmentLayout {
        tag: "UIH",
        name: "S_UIH",
        elements: &[
            composite_m("C_S306", &[m("D_0065"), m("D_0052"), m("D_0054"), c("D_0057")]),
            simple(c("D_0340")),
            composite_c("C_S302", &[m("D_0300"), c("D_0303"), c("D_0051"), c("D_0304")]),
            composite_c("C_S301", &[m("D_0300"), c("D_0303"), c("D_0051")]),
            composite_c("C_S300", &[c("D_0338"), c("D_0314"), c("D_0336")]),
        ],
    },
    "UIT" => SegmentLayout {
        tag: "UIT",
        name: "S_UIT",
        elements: &[simple(c("D_0340")), simple(c("D_0074"))],
    },
};

/// Layout of a service segment by tag.
pub fn service_segment(tag: &str) -> Option<&'static SegmentLayout> {
    SERVICE_SEGMENTS.get(tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Closed,
}

/// Table-driven envelope grammar over [`SERVICE_SEGMENTS`].
#[derive(Debug)]
pub struct ServiceGrammar {
    phase: Phase,
}

impl ServiceGrammar {
    pub fn new() -> Self {
        Self { phase: Phase::Open }
    }
}

impl Default for ServiceGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeGrammar for ServiceGrammar {
    fn parse_service_segment(
        &mut self,
        stream: &mut SegmentStream<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<bool, GrammarError> {
        let Some(segment) = stream.read_segment()? else {
            return Ok(true);
        };
        if self.phase == Phase::Closed {
            return Err(GrammarError::syntax(
                format!("segment {} after the interchange trailer", segment.tag),
                segment.location,
            ));
        }
        let layout = match segment.tag.as_str() {
            "UNT" | "UIT" => None,
            tag => service_segment(tag),
        }
        .ok_or_else(|| {
            GrammarError::syntax(
                format!("unexpected segment {} outside a message", segment.tag),
                segment.location,
            )
        })?;
        layout.emit(&segment, sink)?;
        if matches!(layout.tag, "UNZ" | "UIZ") {
            self.phase = Phase::Closed;
        }
        Ok(false)
    }
}
