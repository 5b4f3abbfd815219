use std::error::Error;
use std::io;

use bpaf::Bpaf;
use glow_tools::gpio::GpioPin;
use glow_tools::listener;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Supervisor event listener mirroring a process's run state on a GPIO pin
struct Args {
    /// Name of the supervised process to track
    #[bpaf(positional("PROCESS"))]
    process_name: String,
    /// GPIO pin to drive
    #[bpaf(positional("GPIO"))]
    gpio: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    // stdout belongs to the protocol, so diagnostics go through the logger
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = args().run();

    let pin = GpioPin::new(args.gpio);
    pin.export()?;
    pin.set_output()?;

    log::info!(
        "gpio event listener started for process {} and gpio {}",
        args.process_name,
        args.gpio
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    listener::run(stdin.lock(), stdout.lock(), &args.process_name, &mut |high| {
        pin.set(high)
    })?;
    Ok(())
}
