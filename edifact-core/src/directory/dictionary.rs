//! Table-driven directory grammar.
//!
//! A [`Directory`] lists the message types it defines and the layouts of its
//! segments. [`DictionaryGrammar`] parses a message body as a flat run of
//! those segments closed by the message trailer (UNT or UIT), which it
//! emits as well. Segment groups are not modelled: the event stream is the
//! same flat sequence of `S_` elements either way.

use phf::phf_map;

use super::segments::{D01B_SEGMENTS, D93A_SEGMENTS, D96A_SEGMENTS};
use super::{DirectoryGrammar, GrammarConstructor};
use crate::envelope::service_segment;
use crate::error::GrammarError;
use crate::event::EventSink;
use crate::layout::SegmentLayout;
use crate::segment::SegmentStream;

/// Static description of one directory.
#[derive(Debug)]
pub struct Directory {
    /// Directory key, version + release.
    pub key: &'static str,
    /// Message types defined by the directory.
    pub messages: &'static [&'static str],
    pub segments: &'static phf::Map<&'static str, SegmentLayout>,
}

impl Directory {
    pub fn defines_message(&self, message_type: &str) -> bool {
        self.messages.contains(&message_type)
    }

    pub fn segment(&self, tag: &str) -> Option<&'static SegmentLayout> {
        self.segments.get(tag)
    }
}

pub static D93A: Directory = Directory {
    key: "D93A",
    messages: &["ORDERS", "INVOIC"],
    segments: &D93A_SEGMENTS,
};

pub static D96A: Directory = Directory {
    key: "D96A",
    messages: &["ORDERS", "ORDRSP", "INVOIC", "DESADV"],
    segments: &D96A_SEGMENTS,
};

pub static D01B: Directory = Directory {
    key: "D01B",
    messages: &["ORDERS", "INVOIC", "DESADV", "IFTMIN", "IFTSTA"],
    segments: &D01B_SEGMENTS,
};

fn d93a() -> Box<dyn DirectoryGrammar> {
    Box::new(DictionaryGrammar::new(&D93A))
}

fn d96a() -> Box<dyn DirectoryGrammar> {
    Box::new(DictionaryGrammar::new(&D96A))
}

fn d01b() -> Box<dyn DirectoryGrammar> {
    Box::new(DictionaryGrammar::new(&D01B))
}

/// Compiled-in directories by key.
pub static BUILTIN_DIRECTORIES: phf::Map<&'static str, GrammarConstructor> = phf_map! {
    "D93A" => d93a as GrammarConstructor,
    "D96A" => d96a as GrammarConstructor,
    "D01B" => d01b as GrammarConstructor,
};

/// Directory grammar driven by a [`Directory`] table.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryGrammar {
    directory: &'static Directory,
}

impl DictionaryGrammar {
    pub fn new(directory: &'static Directory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &'static Directory {
        self.directory
    }
}

impl DirectoryGrammar for DictionaryGrammar {
    fn parse_message_body(
        &mut self,
        message_type: &str,
        stream: &mut SegmentStream<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<(), GrammarError> {
        if !self.directory.defines_message(message_type) {
            return Err(GrammarError::syntax(
                format!(
                    "message {} is not defined in directory {}",
                    message_type, self.directory.key
                ),
                stream.location(),
            ));
        }

        loop {
            let Some(segment) = stream.read_segment()? else {
                return Err(GrammarError::syntax(
                    format!("unexpected end of input inside message {}", message_type),
                    stream.cursor(),
                ));
            };
            let trailer = matches!(segment.tag.as_str(), "UNT" | "UIT");
            let layout = if trailer {
                service_segment(&segment.tag)
            } else {
                self.directory.segment(&segment.tag)
            }
            .ok_or_else(|| {
                GrammarError::syntax(
                    format!(
                        "segment {} is not defined in directory {}",
                        segment.tag, self.directory.key
                    ),
                    segment.location,
                )
            })?;
            layout.emit(&segment, sink)?;
            if trailer {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventRecorder;
    use crate::source::Source;
    use crate::transcoder::{Transcoder, DEFAULT_LOOKAHEAD};

    /// Stream positioned after the message header, the way the parser
    /// hands it over.
    fn after_header(input: &str) -> SegmentStream<'_> {
        let source = Source::from(input).open().unwrap();
        let mut stream = SegmentStream::new(Transcoder::new(source, DEFAULT_LOOKAHEAD).unwrap());
        stream.read_segment().unwrap();
        stream
    }

    fn body(
        directory: &'static Directory,
        message_type: &str,
        input: &str,
    ) -> Result<EventRecorder, GrammarError> {
        let mut stream = after_header(input);
        let mut rec = EventRecorder::new();
        DictionaryGrammar::new(directory).parse_message_body(message_type, &mut stream, &mut rec)?;
        Ok(rec)
    }

    #[test]
    fn test_body_through_trailer() {
        let rec = body(
            &D96A,
            "ORDERS",
            "UNH+1+ORDERS:D:96A:UN'BGM+220+4711+9'QTY+21:48'UNT+3+1'",
        )
        .unwrap();
        assert_eq!(rec.texts_of("D_1004"), vec!["4711"]);
        assert_eq!(rec.texts_of("D_6060"), vec!["48"]);
        assert_eq!(rec.texts_of("D_0074"), vec!["3"]);
    }

    #[test]
    fn test_stops_after_trailer() {
        let mut stream = after_header("UNH+1+ORDERS:D:96A:UN'BGM+220'UNT+2+1'UNZ+1+1'");
        let mut rec = EventRecorder::new();
        DictionaryGrammar::new(&D96A)
            .parse_message_body("ORDERS", &mut stream, &mut rec)
            .unwrap();
        assert_eq!(stream.read_segment().unwrap().unwrap().tag, "UNZ");
    }

    #[test]
    fn test_unknown_segment() {
        let err = body(&D96A, "ORDERS", "UNH+1+ORDERS:D:96A:UN'TSR+1'UNT+2+1'").unwrap_err();
        assert!(err.to_string().contains("segment TSR is not defined in directory D96A"));
    }

    #[test]
    fn test_unknown_message_type() {
        let err = body(&D93A, "IFTMIN", "UNH+1+IFTMIN:D:93A:UN'UNT+1+1'").unwrap_err();
        assert!(err.to_string().contains("message IFTMIN is not defined in directory D93A"));
    }

    #[test]
    fn test_missing_trailer() {
        let err = body(&D01B, "IFTMIN", "UIH+IFTMIN:D:01B'BGM+610'").unwrap_err();
        assert!(err.to_string().contains("unexpected end of input inside message IFTMIN"));
    }

    #[test]
    fn test_interactive_trailer() {
        let rec = body(&D01B, "IFTMIN", "UIH+IFTMIN:D:01B'BGM+610+:9+ABC'UIT+1+3'").unwrap();
        assert_eq!(rec.texts_of("D_1056"), vec!["9"]);
        assert_eq!(rec.texts_of("D_1225"), vec!["ABC"]);
        assert_eq!(rec.texts_of("D_0074"), vec!["3"]);
    }

    #[test]
    fn test_builtin_table() {
        assert_eq!(BUILTIN_DIRECTORIES.len(), 3);
        assert!(BUILTIN_DIRECTORIES.contains_key("D96A"));
    }
}
