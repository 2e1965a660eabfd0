//! Device declarations and per-device action lists.
//!
//! A [`Device`] is listed once in the document header. A [`DeviceSequence`]
//! names the device by alias and carries the actions it performs inside one
//! event.
//!
//! ## Configuration Example
//!
//! ```toml
//! [[devices]]
//! alias = "Device001"
//! device_name = "Benchtop Brushless Motor Controller"
//! device_prefix = "73"
//! serial_no = "73867454-1"
//! actuator = "MLS203 X Axis"
//! ```

use crate::action::Action;
use crate::markup::Element;
use serde::{Deserialize, Serialize};

/// A controller the sequence drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Display name; actions refer to the device by this alias.
    pub alias: String,
    /// Controller type, e.g. "Benchtop Brushless Motor Controller".
    pub device_name: String,
    /// Serial-number prefix identifying the controller family, e.g. "73".
    pub device_prefix: String,
    /// Hardware serial number, kept as an opaque string.
    pub serial_no: String,
    /// Stage or actuator attached to the controller.
    pub actuator: String,
}

impl Device {
    /// Declare a device. All fields are written as given, escaped.
    pub fn new(
        alias: impl Into<String>,
        device_name: impl Into<String>,
        device_prefix: impl Into<String>,
        serial_no: impl Into<String>,
        actuator: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            device_name: device_name.into(),
            device_prefix: device_prefix.into(),
            serial_no: serial_no.into(),
            actuator: actuator.into(),
        }
    }

    /// `DeviceDefinition` entry for the `Devices` list.
    pub fn to_element(&self) -> Element {
        Element::new("DeviceDefinition")
            .attr("DeviceAlias", self.alias.as_str())
            .attr("RestoreParameters", "true")
            .child(Element::with_text("DeviceName", self.device_name.as_str()))
            .child(Element::with_text("DevicePrefix", self.device_prefix.as_str()))
            .child(Element::with_text("SerialNo", self.serial_no.as_str()))
            .child(Element::with_text("Actuator", self.actuator.as_str()))
    }

    /// Compact `DeviceDefinition` fragment.
    pub fn to_xml(&self) -> String {
        self.to_element().to_compact()
    }
}

/// Ordered actions for one device within an event.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSequence {
    /// Alias of the device performing the actions.
    pub device: String,
    /// Actions in execution order.
    pub actions: Vec<Action>,
}

impl DeviceSequence {
    /// Start an empty action list for the device with alias `device`.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            actions: Vec::new(),
        }
    }

    /// Build from an existing action list, preserving its order.
    pub fn with_actions(device: impl Into<String>, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            device: device.into(),
            actions: actions.into_iter().collect(),
        }
    }

    /// Append an action.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// `Device` node holding the `DeviceActions` list.
    pub fn to_element(&self) -> Element {
        Element::new("Device")
            .attr("DeviceName", self.device.as_str())
            .child(Element::new("DeviceActions").children(self.actions.iter().map(Action::to_element)))
    }

    /// Compact fragment.
    pub fn to_xml(&self) -> String {
        self.to_element().to_compact()
    }
}
