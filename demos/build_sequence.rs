//! Build a two-axis raster sequence and print it.
//!
//! Run with:
//! ```bash
//! cargo run --example build_sequence
//! ```
//!
//! Devices and run settings can come from a config file:
//! ```bash
//! cargo run --example build_sequence -- sequence.toml
//! RUST_LOG=kinesis_sequence=debug cargo run --example build_sequence
//! ```

use kinesis_sequence::{
    logging, Action, Device, DeviceSequence, SequenceConfig, SequenceElement, SignalState,
    TriggerPort,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SequenceConfig::load_from(path)?,
        None => {
            let mut config = SequenceConfig::from_env()?;
            if config.devices.is_empty() {
                config.devices = vec![
                    Device::new("X", "Benchtop Brushless Motor Controller", "73", "73867454-1", "MLS203 X Axis"),
                    Device::new("Y", "Benchtop Brushless Motor Controller", "73", "73867454-2", "MLS203 Y Axis"),
                ];
            }
            config
        }
    };
    logging::init_from_config(&config);

    let x = &config.devices.first().ok_or("no devices configured")?.alias;
    let y = &config.devices.last().ok_or("no devices configured")?.alias;
    info!(x = %x, y = %y, "building raster sequence");

    let trigger = DeviceSequence::new(x.as_str())
        .action(Action::pulse(TriggerPort::One, SignalState::On))
        .action(Action::wait(0.005)?)
        .action(Action::pulse(TriggerPort::One, SignalState::Off));

    let document = config
        .builder()
        .element(SequenceElement::event(
            "Home",
            [
                DeviceSequence::new(x.as_str()).action(Action::move_to(0.0)?),
                DeviceSequence::new(y.as_str()).action(Action::move_to(0.0)?),
            ],
        ))
        .element(SequenceElement::event(
            "Line",
            [
                DeviceSequence::new(x.as_str()).action(Action::move_by_at(10.0, 5.0, 20.0)?),
                trigger,
            ],
        ))
        .element(SequenceElement::event(
            "Return",
            [
                DeviceSequence::new(x.as_str()).action(Action::move_by(-10.0)?),
                DeviceSequence::new(y.as_str()).action(Action::move_by(0.5)?),
            ],
        ))
        .element(SequenceElement::repeat("Rows", "Line", 20))
        .build();

    document.check_references()?;
    let text = config.formatter().format(&document.to_xml())?;
    print!("{}", text);
    Ok(())
}
