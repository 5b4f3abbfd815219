use std::error::Error;

use bpaf::Bpaf;
use glow_tools::devices::ClockDisplay;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Read the current weather report from the clock display
struct Args {
    /// I2C bus the clock display is connected to
    #[bpaf(long, fallback(1), display_fallback)]
    bus: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = args().run();

    let mut display = ClockDisplay::open(args.bus)?;
    let report = display.weather_report()?;

    println!("Temperature: {:.1} °C", report.temperature);
    println!("Humidity: {}%", report.humidity);
    println!("Weak battery: {}", report.weak_battery as u8);
    Ok(())
}
