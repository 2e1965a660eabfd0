//! Device actions and their typed parameter lists.
//!
//! Each action renders as
//!
//! ```text
//! <Action FunctionName="MoveRelative">
//!   <Parameters>
//!     <NameValuePairOfObject Name="Step">
//!       <Value xsi:type="xsd:decimal">2.5</Value>
//!     </NameValuePairOfObject>
//!     ...
//!   </Parameters>
//! </Action>
//! ```
//!
//! Parameter names, their order, and their `xsi:type` tags are fixed per
//! function and must match what the Kinesis sequencer expects. Physical limits
//! (velocity, acceleration, travel) are not checked here.

use crate::encode::{self, Direction};
use crate::error::{AppResult, SequenceError};
use crate::markup::Element;
use std::fmt;

/// Output port on a KST101-style controller ("trig 1" / "trig 2").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPort {
    /// Port 1.
    One,
    /// Port 2.
    Two,
}

impl TriggerPort {
    /// Value of the `OutputPort` parameter.
    pub fn number(self) -> i64 {
        match self {
            TriggerPort::One => 1,
            TriggerPort::Two => 2,
        }
    }
}

impl TryFrom<u8> for TriggerPort {
    type Error = SequenceError;

    fn try_from(port: u8) -> AppResult<Self> {
        match port {
            1 => Ok(TriggerPort::One),
            2 => Ok(TriggerPort::Two),
            other => Err(SequenceError::invalid(
                "pulse.port",
                format!("expected 1 or 2, got {}", other),
            )),
        }
    }
}

/// Level driven onto a trigger port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    /// Low, written as `0`.
    Off,
    /// High, written as `1`.
    On,
}

impl SignalState {
    /// Value of the `OutputPortState` parameter.
    pub fn number(self) -> i64 {
        match self {
            SignalState::Off => 0,
            SignalState::On => 1,
        }
    }
}

impl TryFrom<u8> for SignalState {
    type Error = SequenceError;

    fn try_from(state: u8) -> AppResult<Self> {
        match state {
            0 => Ok(SignalState::Off),
            1 => Ok(SignalState::On),
            other => Err(SequenceError::invalid(
                "pulse.state",
                format!("expected 0 or 1, got {}", other),
            )),
        }
    }
}

impl From<bool> for SignalState {
    fn from(on: bool) -> Self {
        if on {
            SignalState::On
        } else {
            SignalState::Off
        }
    }
}

/// A parameter value tagged with its schema type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// `xsd:int`
    Int(i64),
    /// `xsd:decimal`
    Decimal(f64),
    /// `xsd:boolean`
    Boolean(bool),
}

impl Value {
    /// The `xsi:type` attribute value.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Int(_) => "xsd:int",
            Value::Decimal(_) => "xsd:decimal",
            Value::Boolean(_) => "xsd:boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Decimal(v) => f.write_str(&encode::encode_decimal(*v)),
            Value::Boolean(v) => f.write_str(encode::encode_bool(*v)),
        }
    }
}

/// Named parameter of an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    /// `Name` attribute of the pair.
    pub name: &'static str,
    /// Typed value.
    pub value: Value,
}

impl Parameter {
    fn new(name: &'static str, value: Value) -> Self {
        Self { name, value }
    }

    /// `NameValuePairOfObject` node.
    pub fn to_element(&self) -> Element {
        Element::new("NameValuePairOfObject")
            .attr("Name", self.name)
            .child(
                Element::new("Value")
                    .attr("xsi:type", self.value.type_tag())
                    .text(self.value.to_string()),
            )
    }
}

/// One command given to a device.
///
/// Values are already encoded: constructors validate their input and store
/// what will be written, so an `Action` is always renderable.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `Wait`: pause before the next action.
    Wait {
        /// Duration in whole milliseconds, at most [`encode::MAX_DURATION_MS`].
        millis: i64,
    },
    /// `DigitalOutput`: set a trigger output.
    Pulse {
        /// Output driven.
        port: TriggerPort,
        /// Level written to it.
        state: SignalState,
    },
    /// `MoveRelative` with the controller's current motion parameters.
    MoveRelative {
        /// Distance, always non-negative.
        step: f64,
        /// Sign of the original displacement.
        direction: Direction,
    },
    /// `MoveRelativeAt` with explicit motion parameters.
    MoveRelativeAt {
        /// Distance, always non-negative.
        step: f64,
        /// Sign of the original displacement.
        direction: Direction,
        /// Velocity limit for this move.
        max_velocity: f64,
        /// Acceleration for this move.
        acceleration: f64,
    },
    /// `MoveTo`: absolute move.
    MoveAbsolute {
        /// Target position.
        position: f64,
    },
}

impl Action {
    /// Pause for `seconds`, truncated to whole milliseconds.
    ///
    /// # Errors
    /// Fails on negative or non-finite input, and on pauses too long for `xsd:int`.
    pub fn wait(seconds: f64) -> AppResult<Self> {
        let millis = encode::encode_duration_ms(seconds)?;
        Ok(Action::Wait { millis })
    }

    /// Drive a trigger output to `state`.
    pub fn pulse(port: TriggerPort, state: SignalState) -> Self {
        Action::Pulse { port, state }
    }

    /// Relative move; the sign of `displacement` picks the direction.
    pub fn move_by(displacement: f64) -> AppResult<Self> {
        let (step, direction) = encode::encode_direction(displacement)?;
        Ok(Action::MoveRelative { step, direction })
    }

    /// Relative move with its own velocity and acceleration.
    ///
    /// The controller restores its previous motion parameters afterwards.
    pub fn move_by_at(displacement: f64, max_velocity: f64, acceleration: f64) -> AppResult<Self> {
        let (step, direction) = encode::encode_direction(displacement)?;
        Ok(Action::MoveRelativeAt {
            step,
            direction,
            max_velocity: encode::ensure_finite("max_velocity", max_velocity)?,
            acceleration: encode::ensure_finite("acceleration", acceleration)?,
        })
    }

    /// Absolute move to `position`.
    pub fn move_to(position: f64) -> AppResult<Self> {
        Ok(Action::MoveAbsolute {
            position: encode::ensure_finite("position", position)?,
        })
    }

    /// Value of the `FunctionName` attribute.
    pub fn function_name(&self) -> &'static str {
        match self {
            Action::Wait { .. } => "Wait",
            Action::Pulse { .. } => "DigitalOutput",
            Action::MoveRelative { .. } => "MoveRelative",
            Action::MoveRelativeAt { .. } => "MoveRelativeAt",
            Action::MoveAbsolute { .. } => "MoveTo",
        }
    }

    /// Parameters in the order the sequencer reads them.
    pub fn parameters(&self) -> Vec<Parameter> {
        match *self {
            Action::Wait { millis } => vec![Parameter::new("Time", Value::Int(millis))],
            Action::Pulse { port, state } => vec![
                Parameter::new("OutputPort", Value::Int(port.number())),
                Parameter::new("OutputPortState", Value::Int(state.number())),
            ],
            Action::MoveRelative { step, direction } => vec![
                Parameter::new("Step", Value::Decimal(step)),
                Parameter::new("Direction", Value::Int(direction.code())),
            ],
            Action::MoveRelativeAt {
                step,
                direction,
                max_velocity,
                acceleration,
            } => vec![
                Parameter::new("MaxVelocity", Value::Decimal(max_velocity)),
                Parameter::new("Acceleration", Value::Decimal(acceleration)),
                Parameter::new("Step", Value::Decimal(step)),
                Parameter::new("Direction", Value::Int(direction.code())),
                Parameter::new("RestoreParams", Value::Boolean(true)),
            ],
            Action::MoveAbsolute { position } => {
                vec![Parameter::new("MoveTo", Value::Decimal(position))]
            }
        }
    }

    /// `Action` node with its parameter list.
    pub fn to_element(&self) -> Element {
        Element::new("Action")
            .attr("FunctionName", self.function_name())
            .child(
                Element::new("Parameters")
                    .children(self.parameters().iter().map(Parameter::to_element)),
            )
    }

    /// Compact markup fragment for this action.
    pub fn to_xml(&self) -> String {
        self.to_element().to_compact()
    }
}
