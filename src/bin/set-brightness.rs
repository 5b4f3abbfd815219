use std::error::Error;

use bpaf::Bpaf;
use glow_tools::devices::GeigerBoard;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Set the brightness of the geiger board's magic eye tube
struct Args {
    /// I2C bus the geiger board is connected to
    #[bpaf(long, fallback(4), display_fallback)]
    bus: u8,
    /// Brightness value, handed to the device uninterpreted
    #[bpaf(positional("LEVEL"))]
    level: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = args().run();

    println!("Brightness: {}", args.level);

    GeigerBoard::open(args.bus)?.set_brightness(args.level)?;
    Ok(())
}
