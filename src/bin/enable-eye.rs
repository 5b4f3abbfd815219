use std::error::Error;

use bpaf::Bpaf;
use glow_tools::devices::GeigerBoard;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Switch the geiger board's magic eye tube on or off
struct Args {
    /// I2C bus the geiger board is connected to
    #[bpaf(long, fallback(1), display_fallback)]
    bus: u8,
    /// "1" switches the eye on, anything else switches it off
    #[bpaf(positional("0/1"))]
    state: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = args().run();

    let enable = args.state == "1";
    println!("Enable: {}", enable as u8);

    GeigerBoard::open(args.bus)?.set_eye_enabled(enable)?;
    Ok(())
}
