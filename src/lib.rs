//! Builder for Thorlabs Kinesis motion-sequence documents.
//!
//! This library turns device declarations, device actions (waits, trigger
//! pulses, relative and absolute moves) and sequence control (events, repeats,
//! name-tag jumps) into the markup document the Kinesis sequencer loads. It
//! only produces text; talking to hardware and reading or writing files is
//! left to the caller.
//!
//! # Example
//!
//! ```
//! use kinesis_sequence::{Action, Device, DeviceSequence, Document, SequenceElement};
//!
//! # fn main() -> kinesis_sequence::AppResult<()> {
//! let document = Document::builder()
//!     .device(Device::new("X", "Brushless Motor Controller", "73", "73867454-1", "MLS203 X Axis"))
//!     .element(SequenceElement::event(
//!         "Start",
//!         [DeviceSequence::new("X")
//!             .action(Action::move_by(-2.5)?)
//!             .action(Action::wait(0.5)?)],
//!     ))
//!     .element(SequenceElement::repeat("Loop", "Start", 3))
//!     .log_path("C:\\sequences\\run.log")
//!     .build();
//!
//! document.check_references()?;
//! let text = document.to_xml();
//! let pretty = kinesis_sequence::format(&text)?;
//! assert_eq!(pretty, document.to_pretty_xml(2));
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod device;
pub mod document;
pub mod element;
pub mod encode;
pub mod error;
pub mod format;
pub mod logging;
pub mod markup;
pub mod validate;

pub use action::{Action, Parameter, SignalState, TriggerPort, Value};
pub use config::{ConfigError, SequenceConfig};
pub use device::{Device, DeviceSequence};
pub use document::{begin, end, Document, DocumentBuilder, RunSettings};
pub use element::SequenceElement;
pub use encode::{encode_bool, encode_direction, encode_duration_ms, Direction};
pub use error::{AppResult, ReferenceIssue, SequenceError};
pub use format::{format, Formatter};
