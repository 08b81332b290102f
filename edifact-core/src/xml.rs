//! XML output.
//!
//! [`XmlSink`] serializes the event stream as an XML document, which is the
//! usual way to hand an interchange to XML tooling.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::Writer;

use crate::error::SinkError;
use crate::event::{Attribute, EventSink, Name};

/// Event sink writing XML to any [`Write`].
pub struct XmlSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlSink<W> {
    /// Compact output, no whitespace between elements.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
        }
    }

    /// Output indented by `width` spaces per level.
    pub fn indented(inner: W, width: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', width),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, event: XmlEvent<'_>) -> Result<(), SinkError> {
        self.writer.write_event(event).map_err(SinkError::new)
    }
}

impl<W: Write> EventSink for XmlSink<W> {
    fn start_document(&mut self) -> Result<(), SinkError> {
        self.write(XmlEvent::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        self.writer.get_mut().flush().map_err(SinkError::new)
    }

    fn start_element(&mut self, name: Name<'_>, attributes: &[Attribute]) -> Result<(), SinkError> {
        let mut start = BytesStart::new(name.qualified_name);
        for attribute in attributes {
            start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
        }
        self.write(XmlEvent::Start(start))
    }

    fn end_element(&mut self, name: Name<'_>) -> Result<(), SinkError> {
        self.write(XmlEvent::End(BytesEnd::new(name.qualified_name)))
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        self.write(XmlEvent::Text(BytesText::new(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EdifactParser;

    fn to_xml(input: &str) -> String {
        let mut sink = XmlSink::new(Vec::new());
        EdifactParser::new().parse(input, &mut sink).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_message_document() {
        let xml = to_xml("UNH+1+ORDERS:D:96A:UN'BGM+220+4711'UNT+3+1'");
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(
            "<INTERCHANGE><M_ORDERS><S_UNH><D_0062>1</D_0062><C_S009><D_0065>ORDERS</D_0065>"
        ));
        assert!(xml.ends_with("</S_UNT></M_ORDERS></INTERCHANGE>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = to_xml("UNH+1+ORDERS:D:96A:UN'FTX+AAI+++A&B <C>'UNT+3+1'");
        assert!(xml.contains("<D_4440>A&amp;B &lt;C&gt;</D_4440>"));
    }

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_stops_parse() {
        let mut sink = XmlSink::new(Failing);
        let err = EdifactParser::new()
            .parse("UNH+1+ORDERS:D:96A:UN'UNT+2+1'", &mut sink)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Sink(_)));
    }
}
