//! The interchange parser.
//!
//! [`EdifactParser`] drives the envelope grammar one service segment at a
//! time over a shared [`SegmentStream`], watches the events it emits for
//! message headers, and hands each message body to the grammar of the
//! directory the header names. The sink sees a single well-nested stream:
//!
//! ```text
//! <INTERCHANGE>
//!   <S_UNB>...</S_UNB>
//!   <M_ORDERS>
//!     <S_UNH>...</S_UNH>        replayed header
//!     <S_BGM>...</S_BGM> ...    directory grammar
//!     <S_UNT>...</S_UNT>
//!   </M_ORDERS>
//!   <S_UNZ>...</S_UNZ>
//! </INTERCHANGE>
//! ```

use tracing::{debug, trace};

use crate::capture::{End, HeaderCapture, HeaderKind, Start};
use crate::directory::{DirectoryRegistry, DirectoryTable};
use crate::envelope::{EnvelopeGrammar, ServiceGrammar};
use crate::error::{Error, Result, SinkError};
use crate::event::{emit_leaf, Attribute, Event, EventRecorder, EventSink, Name, ROOT_ELEMENT};
use crate::options::{ListenerTypeSource, ParserOptions};
use crate::segment::SegmentStream;
use crate::source::Source;
use crate::span::Locator;
use crate::transcoder::Transcoder;

/// Notified around every message of an interchange.
pub trait MessageListener {
    /// A message header has been read; its events follow.
    fn message_started(&mut self, message_type: &str);

    /// The message element has been closed.
    fn message_ended(&mut self, message_type: &str);
}

type EnvelopeFactory = Box<dyn Fn() -> Box<dyn EnvelopeGrammar>>;

/// Streaming EDIFACT parser.
///
/// A parser can be reused for several interchanges; directory grammars are
/// created on first use and kept for the parser's lifetime.
pub struct EdifactParser {
    registry: DirectoryRegistry,
    options: ParserOptions,
    listener: Option<Box<dyn MessageListener>>,
    envelope: EnvelopeFactory,
    capture: HeaderCapture,
}

impl EdifactParser {
    /// Parser over the compiled-in directories.
    pub fn new() -> Self {
        Self::with_directories(DirectoryTable::builtin())
    }

    pub fn with_directories(table: DirectoryTable) -> Self {
        Self {
            registry: DirectoryRegistry::new(table),
            options: ParserOptions::default(),
            listener: None,
            envelope: Box::new(|| Box::new(ServiceGrammar::new())),
            capture: HeaderCapture::new(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the envelope grammar. A fresh instance is made per parse.
    pub fn with_envelope<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn EnvelopeGrammar> + 'static,
    {
        self.envelope = Box::new(factory);
        self
    }

    pub fn set_listener(&mut self, listener: impl MessageListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn MessageListener>> {
        self.listener.take()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn registry(&self) -> &DirectoryRegistry {
        &self.registry
    }

    /// Header fields captured so far. Empty outside a message, and always
    /// empty once `parse` has returned.
    pub fn headers(&self) -> &HeaderCapture {
        &self.capture
    }

    /// Parse one interchange into `sink`.
    ///
    /// The first failure aborts the parse. Events already delivered stay
    /// delivered; no closing events are synthesized for them.
    pub fn parse<'r>(&mut self, source: impl Into<Source<'r>>, sink: &mut dyn EventSink) -> Result<()> {
        let transcoder = Transcoder::new(source.into().open()?, self.options.lookahead_limit)?;
        debug!(
            standard = transcoder.is_standard(),
            delta = transcoder.delta(),
            "interchange opened"
        );
        let mut stream = SegmentStream::new(transcoder);
        let mut envelope = (self.envelope)();

        let result = self.drive(&mut stream, envelope.as_mut(), sink);
        self.capture.clear();
        result
    }

    /// Parse into an [`EventRecorder`] and return its events.
    pub fn parse_to_events<'r>(&mut self, source: impl Into<Source<'r>>) -> Result<Vec<Event>> {
        let mut recorder = EventRecorder::new();
        self.parse(source, &mut recorder)?;
        Ok(recorder.into_events())
    }

    fn drive(
        &mut self,
        stream: &mut SegmentStream<'_>,
        envelope: &mut dyn EnvelopeGrammar,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        let locator = stream.locator();
        sink.set_document_locator(locator.clone());
        sink.start_document()?;
        sink.start_element(Name::plain(ROOT_ELEMENT), &[])?;

        loop {
            let mut relay = HeaderRelay {
                capture: &mut self.capture,
                sink: &mut *sink,
                listener: self.listener.as_deref_mut(),
                listener_type: self.options.listener_type,
                locator: &locator,
                pending: None,
                fault: None,
            };
            let step = envelope.parse_service_segment(stream, &mut relay);
            let HeaderRelay { pending, fault, .. } = relay;
            if let Some(fault) = fault {
                return Err(fault);
            }
            let done = step?;
            if let Some(kind) = pending {
                self.dispatch(kind, stream, sink)?;
            }
            if done {
                break;
            }
        }

        sink.end_element(Name::plain(ROOT_ELEMENT))?;
        sink.end_document()?;
        debug!(directories = self.registry.len(), "interchange closed");
        Ok(())
    }

    /// Parse the body of the message whose header just closed, then close
    /// the message element.
    fn dispatch(
        &mut self,
        kind: HeaderKind,
        stream: &mut SegmentStream<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<()> {
        let key = self.capture.directory_key(kind);
        let message_type = self.capture.message_type(kind).to_string();
        let reported = self
            .capture
            .reported_type(kind, self.options.listener_type)
            .to_string();
        debug!(directory = %key, message = %message_type, ?kind, "dispatching message body");

        let grammar = self.registry.get(&key)?;
        grammar.parse_message_body(&message_type, stream, sink)?;

        sink.end_element(Name::plain(&message_element(&message_type)))?;
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.message_ended(&reported);
        }
        self.capture.clear();
        Ok(())
    }
}

impl Default for EdifactParser {
    fn default() -> Self {
        Self::new()
    }
}

fn message_element(message_type: &str) -> String {
    format!("M_{}", message_type)
}

/// The envelope grammar's sink for one step.
///
/// Forwards everything outside message headers, captures header fields and
/// replays them, and records the header close that triggers dispatch.
/// Failures of its own are kept in `fault`; the grammar only sees an opaque
/// sink error that stops it.
struct HeaderRelay<'a> {
    capture: &'a mut HeaderCapture,
    sink: &'a mut dyn EventSink,
    listener: Option<&'a mut (dyn MessageListener + 'static)>,
    listener_type: ListenerTypeSource,
    locator: &'a Locator,
    pending: Option<HeaderKind>,
    fault: Option<Error>,
}

impl HeaderRelay<'_> {
    fn interrupt(&mut self, error: Error) -> SinkError {
        self.fault = Some(error);
        SinkError::new("message header interrupted")
    }

    /// Nothing may follow the header close within the step that closed it.
    fn check_pending(&mut self, event: &str) -> std::result::Result<(), SinkError> {
        match self.pending {
            Some(kind) => {
                let message = format!("{} after the {} header closed", event, kind.segment_name());
                let location = self.locator.segment_location();
                Err(self.interrupt(Error::syntax(message, location)))
            }
            None => Ok(()),
        }
    }

    /// Emit the message element and the captured header, leaving the header
    /// segment and its composite open for the envelope to close.
    fn replay(&mut self, kind: HeaderKind) -> std::result::Result<(), SinkError> {
        let capture = &*self.capture;
        let sink = &mut *self.sink;
        let message_type = capture.message_type(kind);
        trace!(message = %message_type, ?kind, "message header captured");
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.message_started(capture.reported_type(kind, self.listener_type));
        }

        sink.start_element(Name::plain(&message_element(message_type)), &[])?;
        sink.start_element(Name::plain(kind.segment_name()), &[])?;
        match kind {
            HeaderKind::Batch => {
                let header = capture.batch();
                emit_leaf(sink, "D_0062", &header.reference)?;
                sink.start_element(Name::plain("C_S009"), &[])?;
                emit_leaf(sink, "D_0065", &header.message_type)?;
                emit_leaf(sink, "D_0052", &header.version)?;
                emit_leaf(sink, "D_0054", &header.release)?;
                emit_leaf(sink, "D_0051", &header.agency)?;
            }
            HeaderKind::Interactive => {
                let header = capture.interactive();
                sink.start_element(Name::plain("C_S306"), &[])?;
                emit_leaf(sink, "D_0065", &header.message_type)?;
                emit_leaf(sink, "D_0052", &header.version)?;
                emit_leaf(sink, "D_0054", &header.release)?;
            }
        }
        Ok(())
    }
}

impl EventSink for HeaderRelay<'_> {
    fn set_document_locator(&mut self, locator: Locator) {
        self.sink.set_document_locator(locator)
    }

    fn start_document(&mut self) -> std::result::Result<(), SinkError> {
        self.check_pending("document start")?;
        self.sink.start_document()
    }

    fn end_document(&mut self) -> std::result::Result<(), SinkError> {
        self.check_pending("document end")?;
        self.sink.end_document()
    }

    fn start_element(
        &mut self,
        name: Name<'_>,
        attributes: &[Attribute],
    ) -> std::result::Result<(), SinkError> {
        self.check_pending(name.qualified_name)?;
        match self.capture.on_start(name.qualified_name) {
            Start::Forward => self.sink.start_element(name, attributes),
            Start::Began(kind) => {
                trace!(?kind, "capturing message header");
                Ok(())
            }
            Start::Swallowed => Ok(()),
        }
    }

    fn end_element(&mut self, name: Name<'_>) -> std::result::Result<(), SinkError> {
        self.check_pending(name.qualified_name)?;
        match self.capture.on_end(name.qualified_name) {
            End::Forward => self.sink.end_element(name),
            End::Swallowed => Ok(()),
            End::Completed(kind) => self.replay(kind),
            End::Closed(kind) => {
                self.sink.end_element(name)?;
                self.pending = Some(kind);
                Ok(())
            }
            End::Incomplete(kind) => {
                let message = format!(
                    "message header {} ended before {}",
                    kind.segment_name(),
                    kind.last_field()
                );
                let location = self.locator.segment_location();
                Err(self.interrupt(Error::syntax(message, location)))
            }
        }
    }

    fn characters(&mut self, text: &str) -> std::result::Result<(), SinkError> {
        self.check_pending("character data")?;
        if self.capture.on_characters(text) {
            Ok(())
        } else {
            self.sink.characters(text)
        }
    }
}
