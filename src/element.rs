//! Top-level sequence steps: events, repeats and name-tag jumps.
//!
//! All three render as `SequenceElements` distinguished by `xsi:type`.
//! Reference tags are free-form; see [`crate::validate`] for the opt-in check.

use crate::device::DeviceSequence;
use crate::markup::Element;

/// `Name` attribute the sequencer gives every name-tag element.
pub const NAME_TAG_ELEMENT_NAME: &str = "Name Tag";

/// One step of a motion program.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceElement {
    /// Device sequences executed together.
    Event {
        /// Label other elements can jump to.
        name: String,
        /// One entry per participating device.
        sequences: Vec<DeviceSequence>,
    },
    /// Jump back to `tag` `count` times.
    Repeat {
        /// Label of this element.
        name: String,
        /// Target label.
        tag: String,
        /// Number of repetitions.
        count: u32,
    },
    /// Unconditional jump to `tag`.
    Goto {
        /// Target label.
        tag: String,
    },
}

impl SequenceElement {
    /// Event running `sequences` side by side.
    pub fn event(name: impl Into<String>, sequences: impl IntoIterator<Item = DeviceSequence>) -> Self {
        SequenceElement::Event {
            name: name.into(),
            sequences: sequences.into_iter().collect(),
        }
    }

    /// Repeat block jumping back to `tag` `count` times.
    pub fn repeat(name: impl Into<String>, tag: impl Into<String>, count: u32) -> Self {
        SequenceElement::Repeat {
            name: name.into(),
            tag: tag.into(),
            count,
        }
    }

    /// Jump to `tag`. The element itself is always named [`NAME_TAG_ELEMENT_NAME`].
    pub fn goto(tag: impl Into<String>) -> Self {
        SequenceElement::Goto { tag: tag.into() }
    }

    /// Value of the `xsi:type` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            SequenceElement::Event { .. } => "Event",
            SequenceElement::Repeat { .. } => "Repeat",
            SequenceElement::Goto { .. } => "NameTag",
        }
    }

    /// Value of the `Name` attribute.
    pub fn name(&self) -> &str {
        match self {
            SequenceElement::Event { name, .. } | SequenceElement::Repeat { name, .. } => name.as_str(),
            SequenceElement::Goto { .. } => NAME_TAG_ELEMENT_NAME,
        }
    }

    /// Tag this element jumps to, if any.
    pub fn reference_tag(&self) -> Option<&str> {
        match self {
            SequenceElement::Event { .. } => None,
            SequenceElement::Repeat { tag, .. } | SequenceElement::Goto { tag } => Some(tag.as_str()),
        }
    }

    /// `SequenceElements` node for the event collection.
    pub fn to_element(&self) -> Element {
        let element = Element::new("SequenceElements")
            .attr("xsi:type", self.kind())
            .attr("Name", self.name())
            .child(Element::new("Description"));

        match self {
            SequenceElement::Event { sequences, .. } => element.child(
                Element::new("DeviceSequences")
                    .children(sequences.iter().map(DeviceSequence::to_element)),
            ),
            SequenceElement::Repeat { tag, count, .. } => element
                .child(Element::with_text("NameTag", tag.as_str()))
                .child(Element::with_text("RepeatCount", count.to_string())),
            SequenceElement::Goto { tag } => {
                element.child(Element::with_text("NameTag", tag.as_str()))
            }
        }
    }

    /// Compact fragment, ready to splice between [`crate::begin`] and [`crate::end`].
    pub fn to_xml(&self) -> String {
        self.to_element().to_compact()
    }
}
