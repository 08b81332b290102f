//! Document events - the output of the parser.
//!
//! This is a SAX-style event model: events are pushed into an [`EventSink`]
//! as segments are parsed, with no accumulation. Structure is represented by
//! start/end pairs.
//!
//! ## Event Sequences
//!
//! A batch message `UNH+1+ORDERS:D:96A:UN'BGM+220+4711'UNT+3+1'` emits:
//! ```text
//! ElementStart M_ORDERS
//! ElementStart S_UNH
//! ElementStart D_0062, Characters "1", ElementEnd D_0062
//! ElementStart C_S009
//! ElementStart D_0065, Characters "ORDERS", ElementEnd D_0065
//! ...
//! ElementEnd C_S009
//! ElementEnd S_UNH
//! ElementStart S_BGM ... ElementEnd S_BGM
//! ElementStart S_UNT ... ElementEnd S_UNT
//! ElementEnd M_ORDERS
//! ```
//!
//! Names follow the EDIFACT XML convention: `S_` segments, `C_` composites,
//! `D_` simple data elements, `M_` messages.

use crate::error::SinkError;
use crate::span::Locator;

/// Root element wrapping every interchange.
pub const ROOT_ELEMENT: &str = "INTERCHANGE";

/// Element name. EDIFACT names live in no namespace and carry no prefix,
/// so the local and qualified names coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name<'a> {
    pub namespace: &'a str,
    pub local_name: &'a str,
    pub qualified_name: &'a str,
}

impl<'a> Name<'a> {
    /// A name in no namespace.
    #[inline]
    pub const fn plain(name: &'a str) -> Self {
        Self {
            namespace: "",
            local_name: name,
            qualified_name: name,
        }
    }
}

/// Element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Receives the merged event stream.
///
/// Every callback may reject the event; the parser stops at the first
/// rejection and returns it as [`Error::Sink`](crate::Error::Sink).
pub trait EventSink {
    /// Called once before `start_document` with a locator that stays valid
    /// for the whole parse.
    fn set_document_locator(&mut self, _locator: Locator) {}

    fn start_document(&mut self) -> Result<(), SinkError>;

    fn end_document(&mut self) -> Result<(), SinkError>;

    fn start_element(&mut self, name: Name<'_>, attributes: &[Attribute]) -> Result<(), SinkError>;

    fn end_element(&mut self, name: Name<'_>) -> Result<(), SinkError>;

    /// Character data of the innermost open element. May arrive in more
    /// than one call.
    fn characters(&mut self, text: &str) -> Result<(), SinkError>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn set_document_locator(&mut self, locator: Locator) {
        (**self).set_document_locator(locator)
    }

    fn start_document(&mut self) -> Result<(), SinkError> {
        (**self).start_document()
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        (**self).end_document()
    }

    fn start_element(&mut self, name: Name<'_>, attributes: &[Attribute]) -> Result<(), SinkError> {
        (**self).start_element(name, attributes)
    }

    fn end_element(&mut self, name: Name<'_>) -> Result<(), SinkError> {
        (**self).end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).characters(text)
    }
}

/// Emit `<name>text</name>`, skipping the character event for empty text.
pub fn emit_leaf(sink: &mut dyn EventSink, name: &str, text: &str) -> Result<(), SinkError> {
    sink.start_element(Name::plain(name), &[])?;
    if !text.is_empty() {
        sink.characters(text)?;
    }
    sink.end_element(Name::plain(name))
}

/// Owned event, as recorded by [`EventRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DocumentStart,
    DocumentEnd,
    ElementStart {
        name: String,
        attributes: Vec<Attribute>,
    },
    ElementEnd {
        name: String,
    },
    Characters(String),
}

impl Event {
    /// Check if this is a structure start event (has matching end).
    pub fn is_structure_start(&self) -> bool {
        matches!(self, Event::DocumentStart | Event::ElementStart { .. })
    }

    /// Element name for start/end events.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Event::ElementStart { name, .. } | Event::ElementEnd { name } => Some(name),
            _ => None,
        }
    }
}

/// Sink that keeps every event in memory.
///
/// Adjacent character events are merged so the recorded stream does not
/// depend on how a grammar chunks its text.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<Event>,
    locator: Option<Locator>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Locator received from the parser, if any.
    pub fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    /// Character data of every element with the given name, in order.
    pub fn texts_of(&self, element: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut inside = false;
        for event in &self.events {
            match event {
                Event::ElementStart { name, .. } => inside = name == element,
                Event::Characters(text) if inside => out.push(text.as_str()),
                Event::ElementEnd { .. } => inside = false,
                _ => {}
            }
        }
        out
    }
}

impl EventSink for EventRecorder {
    fn set_document_locator(&mut self, locator: Locator) {
        self.locator = Some(locator);
    }

    fn start_document(&mut self) -> Result<(), SinkError> {
        self.events.push(Event::DocumentStart);
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        self.events.push(Event::DocumentEnd);
        Ok(())
    }

    fn start_element(&mut self, name: Name<'_>, attributes: &[Attribute]) -> Result<(), SinkError> {
        self.events.push(Event::ElementStart {
            name: name.qualified_name.to_string(),
            attributes: attributes.to_vec(),
        });
        Ok(())
    }

    fn end_element(&mut self, name: Name<'_>) -> Result<(), SinkError> {
        self.events.push(Event::ElementEnd {
            name: name.qualified_name.to_string(),
        });
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), SinkError> {
        if let Some(Event::Characters(previous)) = self.events.last_mut() {
            previous.push_str(text);
        } else {
            self.events.push(Event::Characters(text.to_string()));
        }
        Ok(())
    }
}
