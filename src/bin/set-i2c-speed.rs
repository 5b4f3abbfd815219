use std::error::Error;

use bpaf::Bpaf;
use cp2112::{clock_speed_hz, Cp2112, Cp2112Error};

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Set the I2C clock speed on the CP2112 USB-to-SMBus bridge
struct Args {
    /// Requested clock speed in kHz, between 10 and 400
    #[bpaf(positional("KHZ"))]
    khz: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let args = args().run();

    // range check happens before the device is touched
    let speed = clock_speed_hz(args.khz)?;

    let bridge = Cp2112::open()?;

    let mut config = bridge.smbus_configuration()?;
    println!("previous configuration: {config:?}");

    config.clock_speed = speed;
    bridge.write_smbus_configuration(&config)?;

    let updated = bridge.smbus_configuration()?;
    println!("current configuration: {updated:?}");

    if updated.clock_speed != speed {
        return Err(Cp2112Error::ClockSpeedMismatch {
            requested: speed,
            actual: updated.clock_speed,
        }
        .into());
    }
    Ok(())
}
