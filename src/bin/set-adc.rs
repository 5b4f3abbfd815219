use std::error::Error;

use bpaf::Bpaf;
use glow_tools::devices::Adc;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Set the ADC output word on the power board
struct Args {
    /// I2C bus the ADC module is connected to
    #[bpaf(long, fallback(4), display_fallback)]
    bus: u8,
    /// Output value
    #[bpaf(positional("VALUE"))]
    value: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = args().run();

    println!("ADC: {}", args.value);

    Adc::open(args.bus)?.set_value(args.value)?;
    Ok(())
}
