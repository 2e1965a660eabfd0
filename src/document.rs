//! Document assembly for Kinesis sequence files.
//!
//! A document is a header listing the devices, the ordered sequence elements,
//! and a trailer of run settings:
//!
//! ```text
//! <?xml version="1.0"?>
//! <Sequence xmlns:xsd=".." xmlns:xsi=".." Version="3">
//!    │
//!    ├── Devices ── DeviceDefinition (1 per device)
//!    │
//!    ├── SequenceEventCollection ── SequenceElements (Event | Repeat | NameTag)
//!    │
//!    └── RepeatCount, RepeatContinuously, RepeatRun, SequenceLogPath
//! ```
//!
//! The text can be produced in two halves with [`begin`] and [`end`], letting
//! callers splice in element fragments themselves, or in one pass from a
//! [`Document`]. Both give byte-identical compact output.

use crate::device::Device;
use crate::element::SequenceElement;
use crate::encode;
use crate::error::AppResult;
use crate::markup::{self, Element};
use crate::validate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Schema version written on the root element.
pub const FORMAT_VERSION: &str = "3";
/// Namespace bound to the `xsd` prefix.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
/// Namespace bound to the `xsi` prefix.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

const COLLECTION: &str = "SequenceEventCollection";

/// Trailing metadata of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// How many times the whole sequence runs.
    pub repeat_count: u32,
    /// Loop the sequence until stopped.
    pub repeat_continuously: bool,
    /// Repeat the run as a unit.
    pub repeat_run: bool,
    /// Where the sequencer writes its log.
    pub log_path: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            repeat_count: 1,
            repeat_continuously: false,
            repeat_run: false,
            log_path: String::new(),
        }
    }
}

impl RunSettings {
    /// Default settings with the given log path.
    pub fn with_log_path(log_path: impl Into<String>) -> Self {
        Self {
            log_path: log_path.into(),
            ..Self::default()
        }
    }

    fn elements(&self) -> [Element; 4] {
        [
            Element::with_text("RepeatCount", self.repeat_count.to_string()),
            Element::with_text(
                "RepeatContinuously",
                encode::encode_bool(self.repeat_continuously),
            ),
            Element::with_text("RepeatRun", encode::encode_bool(self.repeat_run)),
            Element::with_text("SequenceLogPath", self.log_path.as_str()),
        ]
    }
}

fn root_element() -> Element {
    Element::new("Sequence")
        .attr("xmlns:xsd", XSD_NAMESPACE)
        .attr("xmlns:xsi", XSI_NAMESPACE)
        .attr("Version", FORMAT_VERSION)
}

fn devices_element(devices: &[Device]) -> Element {
    Element::new("Devices").children(devices.iter().map(Device::to_element))
}

fn write_header(devices: &[Device], out: &mut String) {
    out.push_str(markup::XML_DECLARATION);
    root_element().write_open_tag(out);
    devices_element(devices).write_compact(out);
    out.push('<');
    out.push_str(COLLECTION);
    out.push('>');
}

fn write_footer(settings: &RunSettings, out: &mut String) {
    out.push_str("</");
    out.push_str(COLLECTION);
    out.push('>');
    for element in settings.elements() {
        element.write_compact(out);
    }
    root_element().write_close_tag(out);
}

/// Document prefix: declaration, root tag, device list, and the opened
/// element collection.
pub fn begin(devices: &[Device]) -> String {
    let mut out = String::with_capacity(256 + devices.len() * 256);
    write_header(devices, &mut out);
    out
}

/// Document suffix with the fixed run settings (1, false, false) and `log_path`.
pub fn end(log_path: &str) -> String {
    let mut out = String::with_capacity(256);
    write_footer(&RunSettings::with_log_path(log_path), &mut out);
    out
}

/// A complete sequence document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Devices listed in the header, in order.
    pub devices: Vec<Device>,
    /// Sequence steps, in execution order.
    pub elements: Vec<SequenceElement>,
    /// Trailing run settings.
    pub settings: RunSettings,
}

impl Document {
    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Compact text, identical to `begin(devices) + elements + end(..)`.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(1024);
        write_header(&self.devices, &mut out);
        for element in &self.elements {
            element.to_element().write_compact(&mut out);
        }
        write_footer(&self.settings, &mut out);
        debug!(
            devices = self.devices.len(),
            elements = self.elements.len(),
            bytes = out.len(),
            "assembled sequence document"
        );
        out
    }

    /// Whole document as a markup tree.
    pub fn to_element(&self) -> Element {
        root_element()
            .child(devices_element(&self.devices))
            .child(
                Element::new(COLLECTION)
                    .children(self.elements.iter().map(SequenceElement::to_element)),
            )
            .children(self.settings.elements())
    }

    /// Indented text rendered straight from the tree.
    pub fn to_pretty_xml(&self, indent: usize) -> String {
        markup::render_pretty(&self.to_element(), indent)
    }

    /// Check that every `Repeat`/`Goto` tag names an earlier element.
    pub fn check_references(&self) -> AppResult<()> {
        validate::check_references(&self.elements)
    }
}

/// A builder for constructing `Document` instances.
#[derive(Default)]
pub struct DocumentBuilder {
    inner: Document,
}

impl DocumentBuilder {
    /// Empty builder with default run settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one device.
    pub fn device(mut self, device: Device) -> Self {
        self.inner.devices.push(device);
        self
    }

    /// Append several devices.
    pub fn devices(mut self, devices: impl IntoIterator<Item = Device>) -> Self {
        self.inner.devices.extend(devices);
        self
    }

    /// Append a sequence element.
    pub fn element(mut self, element: SequenceElement) -> Self {
        self.inner.elements.push(element);
        self
    }

    /// Replace the run settings.
    pub fn settings(mut self, settings: RunSettings) -> Self {
        self.inner.settings = settings;
        self
    }

    /// Set only the log path.
    pub fn log_path(mut self, log_path: &str) -> Self {
        self.inner.settings.log_path = log_path.to_string();
        self
    }

    /// Finish building.
    pub fn build(self) -> Document {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::device::DeviceSequence;

    fn device(alias: &str, serial: &str) -> Device {
        Device::new(alias, "Brushless Motor Controller", "73", serial, "MLS203")
    }

    #[test]
    fn test_begin_header() {
        let header = begin(&[device("X", "1")]);
        assert_eq!(
            header,
            "<?xml version=\"1.0\"?>\
<Sequence xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" Version=\"3\">\
<Devices><DeviceDefinition DeviceAlias=\"X\" RestoreParameters=\"true\">\
<DeviceName>Brushless Motor Controller</DeviceName><DevicePrefix>73</DevicePrefix>\
<SerialNo>1</SerialNo><Actuator>MLS203</Actuator></DeviceDefinition></Devices>\
<SequenceEventCollection>"
        );
    }

    #[test]
    fn test_end_footer() {
        assert_eq!(
            end("C:\\logs\\run.log"),
            "</SequenceEventCollection><RepeatCount>1</RepeatCount>\
<RepeatContinuously>false</RepeatContinuously><RepeatRun>false</RepeatRun>\
<SequenceLogPath>C:\\logs\\run.log</SequenceLogPath></Sequence>"
        );
    }

    #[test]
    fn test_end_escapes_log_path() {
        assert!(end("a<b>&c").contains("<SequenceLogPath>a&lt;b&gt;&amp;c</SequenceLogPath>"));
    }

    #[test]
    fn test_document_matches_halves() {
        let devices = vec![device("A", "26001245"), device("B", "26001240")];
        let elements = vec![
            SequenceElement::event(
                "Start",
                [DeviceSequence::new("A").action(Action::wait(0.5).unwrap())],
            ),
            SequenceElement::repeat("Loop", "Start", 3),
        ];

        let spliced = begin(&devices)
            + &elements.iter().map(SequenceElement::to_xml).collect::<String>()
            + &end("log.txt");

        let document = Document::builder()
            .devices(devices)
            .element(elements[0].clone())
            .element(elements[1].clone())
            .log_path("log.txt")
            .build();

        assert_eq!(document.to_xml(), spliced);
    }

    #[test]
    fn test_begin_without_devices() {
        let header = begin(&[]);
        assert!(header.ends_with("Version=\"3\"><Devices /><SequenceEventCollection>"));
        let text = header + &end("");
        assert!(roxmltree::Document::parse(&text).is_ok());
    }

    #[test]
    fn test_device_order_preserved() {
        let xml = begin(&[device("A", "1"), device("B", "2")]);
        assert!(xml.find("DeviceAlias=\"A\"").unwrap() < xml.find("DeviceAlias=\"B\"").unwrap());
    }

    #[test]
    fn test_custom_settings() {
        let document = Document::builder()
            .settings(RunSettings {
                repeat_count: 4,
                repeat_continuously: true,
                repeat_run: false,
                log_path: "x".into(),
            })
            .build();
        let xml = document.to_xml();
        assert!(xml.contains("<RepeatCount>4</RepeatCount><RepeatContinuously>true</RepeatContinuously>"));
        assert!(xml.contains("<Devices />"));
    }

    #[test]
    fn test_pretty_layout() {
        let document = Document::builder()
            .device(device("X", "1"))
            .element(SequenceElement::goto("Start"))
            .log_path("log.txt")
            .build();
        let pretty = document.to_pretty_xml(2);
        let lines: Vec<&str> = pretty.lines().collect();
        assert_eq!(lines[0], "<?xml version=\"1.0\"?>");
        assert!(lines[1].starts_with("<Sequence xmlns:xsd="));
        assert_eq!(lines[2], "  <Devices>");
        assert_eq!(
            lines[3],
            "    <DeviceDefinition DeviceAlias=\"X\" RestoreParameters=\"true\">"
        );
        assert!(pretty.contains("\n      <NameTag>Start</NameTag>\n"));
        assert!(pretty.ends_with("  <SequenceLogPath>log.txt</SequenceLogPath>\n</Sequence>\n"));
    }
}
