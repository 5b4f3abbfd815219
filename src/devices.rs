//! Register maps for the clock's I2C peripherals.

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors from the I2C peripheral transactions
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("i2c transfer failed: {0}")]
    I2c(#[from] LinuxI2CError),
    #[error("device returned {actual} bytes, expected {expected}")]
    UnexpectedLength { expected: usize, actual: usize },
}

fn open_bus(bus: u8, address: u16) -> Result<LinuxI2CDevice> {
    Ok(LinuxI2CDevice::new(format!("/dev/i2c-{bus}"), address)?)
}

/// Weather report relayed by the clock display from its remote sensor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherReport {
    /// Degrees Celsius, 0.1 degree resolution
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: u8,
    pub weak_battery: bool,
}

impl WeatherReport {
    /// Decode the raw register block [tempLo, tempHi, humidity, battery]
    pub fn from_bytes(raw: [u8; 4]) -> Self {
        let [lo, hi, humidity, battery] = raw;
        Self {
            temperature: (256.0 * hi as f32 + lo as f32) / 10.0,
            humidity,
            weak_battery: battery != 0,
        }
    }
}

/// VFD clock display board, carries the radio receiver for the outdoor sensor
pub struct ClockDisplay {
    device: LinuxI2CDevice,
}

impl ClockDisplay {
    pub const ADDRESS: u16 = 0x10;
    const WEATHER_REPORT: u8 = 4;

    pub fn open(bus: u8) -> Result<Self> {
        Ok(Self {
            device: open_bus(bus, Self::ADDRESS)?,
        })
    }

    /// Read the most recent weather report
    pub fn weather_report(&mut self) -> Result<WeatherReport> {
        let raw = self.device.smbus_read_block_data(Self::WEATHER_REPORT)?;
        let block: [u8; 4] = raw
            .as_slice()
            .try_into()
            .map_err(|_| DeviceError::UnexpectedLength {
                expected: 4,
                actual: raw.len(),
            })?;
        Ok(WeatherReport::from_bytes(block))
    }
}

/// Geiger counter board with the magic eye tube
pub struct GeigerBoard {
    device: LinuxI2CDevice,
}

impl GeigerBoard {
    pub const ADDRESS: u16 = 0x12;
    const EYE_ENABLED: u8 = 5;
    const EYE_BRIGHTNESS: u8 = 7;

    pub fn open(bus: u8) -> Result<Self> {
        Ok(Self {
            device: open_bus(bus, Self::ADDRESS)?,
        })
    }

    /// Switch the eye tube on or off. Mode byte 3 keeps the stock animation.
    pub fn set_eye_enabled(&mut self, enabled: bool) -> Result<()> {
        self.device
            .smbus_write_block_data(Self::EYE_ENABLED, &[enabled as u8, 3, 0])?;
        Ok(())
    }

    /// Set the eye tube brightness. The value is handed to the device as-is.
    pub fn set_brightness(&mut self, level: u8) -> Result<()> {
        self.device
            .smbus_write_block_data(Self::EYE_BRIGHTNESS, &[level])?;
        Ok(())
    }
}

/// ADC module on the power board
pub struct Adc {
    device: LinuxI2CDevice,
}

impl Adc {
    pub const ADDRESS: u16 = 0x4f;
    const VALUE: u8 = 0x12;

    pub fn open(bus: u8) -> Result<Self> {
        Ok(Self {
            device: open_bus(bus, Self::ADDRESS)?,
        })
    }

    /// Set the output word; only the low byte is meaningful to the device
    pub fn set_value(&mut self, value: u8) -> Result<()> {
        self.device.smbus_write_block_data(Self::VALUE, &[value, 0])?;
        Ok(())
    }
}
