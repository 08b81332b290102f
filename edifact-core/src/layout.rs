//! Static segment layouts.
//!
//! A layout names the data elements of one segment type by position, which
//! is all a grammar needs to turn a raw [`Segment`] into named events:
//!
//! ```text
//! UNH+1+ORDERS:D:96A:UN'
//!
//! S_UNH
//!   D_0062 "1"
//!   C_S009
//!     D_0065 "ORDERS"  D_0052 "D"  D_0054 "96A"  D_0051 "UN"
//! ```
//!
//! Empty elements and components produce no events. A mandatory element or
//! component that is absent is a syntax error; so is data beyond the last
//! position the layout declares.

use crate::error::GrammarError;
use crate::event::{emit_leaf, EventSink, Name};
use crate::segment::{DataElement, Segment};

/// A simple data element or a component of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub mandatory: bool,
}

/// One data element position of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementLayout {
    Simple(Field),
    Composite {
        name: &'static str,
        mandatory: bool,
        components: &'static [Field],
    },
}

/// Mandatory simple element or component.
pub const fn m(name: &'static str) -> Field {
    Field { name, mandatory: true }
}

/// Conditional simple element or component.
pub const fn c(name: &'static str) -> Field {
    Field { name, mandatory: false }
}

/// Simple data element position.
pub const fn simple(field: Field) -> ElementLayout {
    ElementLayout::Simple(field)
}

/// Mandatory composite position.
pub const fn composite_m(name: &'static str, components: &'static [Field]) -> ElementLayout {
    ElementLayout::Composite {
        name,
        mandatory: true,
        components,
    }
}

/// Conditional composite position.
pub const fn composite_c(name: &'static str, components: &'static [Field]) -> ElementLayout {
    ElementLayout::Composite {
        name,
        mandatory: false,
        components,
    }
}

impl ElementLayout {
    pub fn name(&self) -> &'static str {
        match self {
            ElementLayout::Simple(field) => field.name,
            ElementLayout::Composite { name, .. } => name,
        }
    }

    pub fn is_mandatory(&self) -> bool {
        match self {
            ElementLayout::Simple(field) => field.mandatory,
            ElementLayout::Composite { mandatory, .. } => *mandatory,
        }
    }
}

/// Layout of one segment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    pub tag: &'static str,
    /// Event name, `S_` + tag.
    pub name: &'static str,
    pub elements: &'static [ElementLayout],
}

impl SegmentLayout {
    /// Emit the segment as a `S_` element with its named contents.
    pub fn emit(&self, segment: &Segment, sink: &mut dyn EventSink) -> Result<(), GrammarError> {
        if segment.elements.len() > self.elements.len() {
            return Err(GrammarError::syntax(
                format!(
                    "segment {} has {} data elements, at most {} allowed",
                    self.tag,
                    segment.elements.len(),
                    self.elements.len()
                ),
                segment.location,
            ));
        }

        sink.start_element(Name::plain(self.name), &[])?;
        for (position, layout) in self.elements.iter().enumerate() {
            match segment.elements.get(position).filter(|e| !e.is_empty()) {
                Some(element) => self.emit_element(layout, element, segment, sink)?,
                None if layout.is_mandatory() => {
                    return Err(GrammarError::syntax(
                        format!("segment {} is missing mandatory {}", self.tag, layout.name()),
                        segment.location,
                    ));
                }
                None => {}
            }
        }
        sink.end_element(Name::plain(self.name))?;
        Ok(())
    }

    fn emit_element(
        &self,
        layout: &ElementLayout,
        element: &DataElement,
        segment: &Segment,
        sink: &mut dyn EventSink,
    ) -> Result<(), GrammarError> {
        for occurrence in &element.occurrences {
            match layout {
                ElementLayout::Simple(field) => {
                    if occurrence.iter().skip(1).any(|c| !c.is_empty()) {
                        return Err(GrammarError::syntax(
                            format!("{} in segment {} takes no components", field.name, self.tag),
                            segment.location,
                        ));
                    }
                    let value = occurrence.first().map(String::as_str).unwrap_or("");
                    if !value.is_empty() {
                        emit_leaf(sink, field.name, value)?;
                    }
                }
                ElementLayout::Composite {
                    name, components, ..
                } => {
                    if occurrence.len() > components.len() {
                        return Err(GrammarError::syntax(
                            format!(
                                "{} in segment {} has {} components, at most {} allowed",
                                name,
                                self.tag,
                                occurrence.len(),
                                components.len()
                            ),
                            segment.location,
                        ));
                    }
                    sink.start_element(Name::plain(name), &[])?;
                    for (field, value) in components.iter().zip(
                        occurrence
                            .iter()
                            .map(String::as_str)
                            .chain(std::iter::repeat("")),
                    ) {
                        if !value.is_empty() {
                            emit_leaf(sink, field.name, value)?;
                        } else if field.mandatory {
                            return Err(GrammarError::syntax(
                                format!(
                                    "{} in segment {} is missing mandatory {}",
                                    name, self.tag, field.name
                                ),
                                segment.location,
                            ));
                        }
                    }
                    sink.end_element(Name::plain(name))?;
                }
            }
        }
        Ok(())
    }
}
