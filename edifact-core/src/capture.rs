//! Message header capture.
//!
//! While the envelope grammar emits a message header (`S_UNH` or `S_UIH`)
//! the parser does not forward it. It records the routing fields instead and
//! replays them once the last routing field has closed, wrapped in the
//! message element that the header itself does not carry:
//!
//! ```text
//! envelope emits                     sink receives
//! <S_UNH>                            (swallowed)
//!   <D_0062>1</D_0062>               (captured)
//!   <C_S009>                         (swallowed)
//!     <D_0065>ORDERS</D_0065> ...    (captured)
//!     <D_0051>UN</D_0051>            capture ends:
//!                                    <M_ORDERS><S_UNH><D_0062>1</D_0062>
//!                                    <C_S009><D_0065>ORDERS</D_0065>...
//!                                    <D_0051>UN</D_0051>
//!   </C_S009>                        </C_S009>
//! </S_UNH>                           </S_UNH>  -> body dispatch
//! ```

use phf::phf_map;

use crate::directory::normalize_key;
use crate::options::ListenerTypeSource;

/// Routing fields of a batch message header (UNH).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchHeader {
    pub reference: String,
    pub message_type: String,
    pub version: String,
    pub release: String,
    pub agency: String,
}

impl BatchHeader {
    /// Directory key, version + release upper-cased.
    pub fn directory_key(&self) -> String {
        normalize_key(&format!("{}{}", self.version, self.release))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        self.reference.clear();
        self.message_type.clear();
        self.version.clear();
        self.release.clear();
        self.agency.clear();
    }
}

/// Routing fields of an interactive message header (UIH).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractiveHeader {
    pub message_type: String,
    pub version: String,
    pub release: String,
}

impl InteractiveHeader {
    pub fn directory_key(&self) -> String {
        normalize_key(&format!("{}{}", self.version, self.release))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        self.message_type.clear();
        self.version.clear();
        self.release.clear();
    }
}

/// Which header dialect is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Batch,
    Interactive,
}

impl HeaderKind {
    pub fn from_segment(name: &str) -> Option<Self> {
        match name {
            "S_UNH" => Some(HeaderKind::Batch),
            "S_UIH" => Some(HeaderKind::Interactive),
            _ => None,
        }
    }

    /// Event name of the header segment.
    pub fn segment_name(self) -> &'static str {
        match self {
            HeaderKind::Batch => "S_UNH",
            HeaderKind::Interactive => "S_UIH",
        }
    }

    /// The field whose end terminates capture.
    pub fn last_field(self) -> &'static str {
        match self {
            HeaderKind::Batch => "D_0051",
            HeaderKind::Interactive => "D_0054",
        }
    }

    fn field(self, element: &str) -> Option<HeaderField> {
        match self {
            HeaderKind::Batch => BATCH_FIELDS.get(element).copied(),
            HeaderKind::Interactive => INTERACTIVE_FIELDS.get(element).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    Reference,
    MessageType,
    Version,
    Release,
    Agency,
}

static BATCH_FIELDS: phf::Map<&'static str, HeaderField> = phf_map! {
    "D_0062" => HeaderField::Reference,
    "D_0065" => HeaderField::MessageType,
    "D_0052" => HeaderField::Version,
    "D_0054" => HeaderField::Release,
    "D_0051" => HeaderField::Agency,
};

static INTERACTIVE_FIELDS: phf::Map<&'static str, HeaderField> = phf_map! {
    "D_0065" => HeaderField::MessageType,
    "D_0052" => HeaderField::Version,
    "D_0054" => HeaderField::Release,
};

/// Outcome of an element start seen by [`HeaderCapture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    Forward,
    /// Swallowed; a header segment opened and capture began.
    Began(HeaderKind),
    Swallowed,
}

/// Outcome of an element end seen by [`HeaderCapture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Forward,
    Swallowed,
    /// Swallowed; the last routing field closed and capture is over.
    Completed(HeaderKind),
    /// The replayed header segment closed; its body follows.
    Closed(HeaderKind),
    /// The header segment closed before its last routing field.
    Incomplete(HeaderKind),
}

/// Capture state machine over the envelope's event stream.
#[derive(Debug, Default)]
pub struct HeaderCapture {
    capturing: Option<HeaderKind>,
    /// Header replayed but not yet closed by the envelope.
    replayed: Option<HeaderKind>,
    field: Option<HeaderField>,
    batch: BatchHeader,
    interactive: InteractiveHeader,
}

impl HeaderCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The header being captured, if any.
    pub fn capturing(&self) -> Option<HeaderKind> {
        self.capturing
    }

    pub fn batch(&self) -> &BatchHeader {
        &self.batch
    }

    pub fn interactive(&self) -> &InteractiveHeader {
        &self.interactive
    }

    /// Captured message type of the given header.
    pub fn message_type(&self, kind: HeaderKind) -> &str {
        match kind {
            HeaderKind::Batch => &self.batch.message_type,
            HeaderKind::Interactive => &self.interactive.message_type,
        }
    }

    /// Message type reported to listeners.
    pub fn reported_type(&self, kind: HeaderKind, source: ListenerTypeSource) -> &str {
        match source {
            ListenerTypeSource::Captured => self.message_type(kind),
            ListenerTypeSource::BatchHeader => &self.batch.message_type,
        }
    }

    pub fn directory_key(&self, kind: HeaderKind) -> String {
        match kind {
            HeaderKind::Batch => self.batch.directory_key(),
            HeaderKind::Interactive => self.interactive.directory_key(),
        }
    }

    pub fn on_start(&mut self, name: &str) -> Start {
        match self.capturing {
            Some(kind) => {
                self.field = kind.field(name);
                Start::Swallowed
            }
            None => match HeaderKind::from_segment(name) {
                Some(kind) => {
                    self.capturing = Some(kind);
                    self.field = None;
                    Start::Began(kind)
                }
                None => Start::Forward,
            },
        }
    }

    /// Returns `true` when the text was captured rather than forwarded.
    pub fn on_characters(&mut self, text: &str) -> bool {
        if self.capturing.is_none() {
            return false;
        }
        if let Some(field) = self.field {
            self.slot(field).push_str(text);
        }
        true
    }

    pub fn on_end(&mut self, name: &str) -> End {
        let Some(kind) = self.capturing else {
            return match self.replayed {
                Some(kind) if name == kind.segment_name() => {
                    self.replayed = None;
                    End::Closed(kind)
                }
                _ => End::Forward,
            };
        };
        self.field = None;
        if name == kind.last_field() {
            self.capturing = None;
            self.replayed = Some(kind);
            End::Completed(kind)
        } else if name == kind.segment_name() {
            self.capturing = None;
            End::Incomplete(kind)
        } else {
            End::Swallowed
        }
    }

    /// Forget every captured field and any capture in progress.
    pub fn clear(&mut self) {
        self.capturing = None;
        self.replayed = None;
        self.field = None;
        self.batch.clear();
        self.interactive.clear();
    }

    fn slot(&mut self, field: HeaderField) -> &mut String {
        match (self.capturing, field) {
            (Some(HeaderKind::Interactive), HeaderField::MessageType) => {
                &mut self.interactive.message_type
            }
            (Some(HeaderKind::Interactive), HeaderField::Version) => &mut self.interactive.version,
            (Some(HeaderKind::Interactive), HeaderField::Release) => &mut self.interactive.release,
            (_, HeaderField::Reference) => &mut self.batch.reference,
            (_, HeaderField::MessageType) => &mut self.batch.message_type,
            (_, HeaderField::Version) => &mut self.batch.version,
            (_, HeaderField::Release) => &mut self.batch.release,
            (_, HeaderField::Agency) => &mut self.batch.agency,
        }
    }
}
