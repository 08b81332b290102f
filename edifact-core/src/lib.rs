//! EDIFACT Core Parser
//!
//! Streaming, event-based parser for UN/EDIFACT interchanges. Emits a
//! SAX-style element stream without building a document tree.
//!
//! # Architecture
//!
//! - **source.rs** - Input sources and incremental decoding
//! - **transcoder.rs** - UNA handling, delimiter normalization, escapes
//! - **segment.rs** - Shared segment stream with position tracking
//! - **envelope.rs** - Service segment (interchange envelope) grammar
//! - **directory/** - Per-directory body grammars and their registry
//! - **capture.rs** - Message header capture state machine
//! - **parser.rs** - Orchestration: header relay, dispatch, re-synthesis
//! - **event.rs** - Event sink trait, owned events, recorder
//! - **xml.rs** - XML writer sink
//!
//! # Example
//!
//! ```
//! use edifact_core::{EdifactParser, XmlSink};
//!
//! let input = "UNH+1+ORDERS:D:96A:UN'BGM+220+4711'UNT+3+1'";
//! let mut sink = XmlSink::new(Vec::new());
//! EdifactParser::new().parse(input, &mut sink).unwrap();
//! let xml = String::from_utf8(sink.into_inner()).unwrap();
//! assert!(xml.contains("<M_ORDERS><S_UNH>"));
//! ```

pub mod capture;
pub mod delimiters;
pub mod directory;
pub mod envelope;
pub mod error;
pub mod event;
pub mod layout;
pub mod options;
pub mod parser;
pub mod segment;
pub mod source;
pub mod span;
pub mod transcoder;
pub mod xml;

pub use capture::{BatchHeader, HeaderCapture, HeaderKind, InteractiveHeader};
pub use delimiters::Delimiters;
pub use directory::{DictionaryGrammar, DirectoryGrammar, DirectoryRegistry, DirectoryTable};
pub use envelope::{EnvelopeGrammar, ServiceGrammar};
pub use error::{Error, GrammarError, Result, SinkError};
pub use event::{Attribute, Event, EventRecorder, EventSink, Name, ROOT_ELEMENT};
pub use options::{ListenerTypeSource, ParserOptions};
pub use parser::{EdifactParser, MessageListener};
pub use segment::{DataElement, Segment, SegmentStream};
pub use source::Source;
pub use span::{Location, Locator};
pub use transcoder::{Symbol, Transcoder};
pub use xml::XmlSink;
