//! Userspace driver for the CP2112 USB-to-SMBus bridge configuration
//! interface.
//!
//! The bridge is an HID-class device; its SMBus configuration lives in
//! feature report 0x06, reached through class-specific control transfers on
//! interface 0. Opening the device detaches a bound kernel driver when one is
//! active and reattaches it when the handle is dropped, on the error paths
//! included.

use std::time::Duration;

use rusb::{DeviceHandle, Direction, GlobalContext, Recipient, RequestType};

pub mod config;

pub use config::SmbusConfig;

pub mod consts {
    pub const VENDOR_ID: u16 = 0x10c4;
    pub const PRODUCT_ID: u16 = 0xea90;
    /// Interface carrying the SMBus configuration reports
    pub const SMBUS_INTERFACE: u8 = 0;
}

/// HID class GET_REPORT request
const GET_REPORT: u8 = 1;
/// HID class SET_REPORT request
const SET_REPORT: u8 = 9;
/// Feature report type (3) in the high byte, report id in the low byte
const REPORT_VALUE: u16 = (0x3 << 8) | config::REPORT_ID as u16;

/// Timeout for all usb transactions.
const TIMEOUT: Duration = Duration::from_millis(500);

/// Lowest clock speed the bridge accepts, in Hz
pub const MIN_CLOCK_SPEED: u32 = 10_000;
/// Highest clock speed the bridge accepts, in Hz
pub const MAX_CLOCK_SPEED: u32 = 400_000;

pub type Result<T> = std::result::Result<T, Cp2112Error>;

#[derive(thiserror::Error)]
pub enum Cp2112Error {
    #[error("failed to find device")]
    DeviceNotFound,
    #[error("clock speed {0} kHz is outside the supported 10-400 kHz range")]
    ClockSpeedOutOfRange(u32),
    #[error("device returned {actual} bytes, expected {expected}")]
    ReportLength { expected: usize, actual: usize },
    #[error("device returned report id {0:#04x}, expected 0x06")]
    ReportId(u8),
    #[error("device reports clock speed {actual} Hz after writing {requested} Hz")]
    ClockSpeedMismatch { requested: u32, actual: u32 },
    #[error("{0}")]
    Usb(#[from] rusb::Error),
}

impl std::fmt::Debug for Cp2112Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Convert a user-facing kHz value into the device's Hz unit, enforcing the
/// supported range before any device I/O happens.
pub fn clock_speed_hz(khz: u32) -> Result<u32> {
    khz.checked_mul(1000)
        .filter(|hz| (MIN_CLOCK_SPEED..=MAX_CLOCK_SPEED).contains(hz))
        .ok_or(Cp2112Error::ClockSpeedOutOfRange(khz))
}

/// Open handle to the bridge's configuration interface
pub struct Cp2112 {
    handle: DeviceHandle<GlobalContext>,
    reattach: bool,
}

impl Cp2112 {
    /// Find and open the bridge, detaching a bound kernel driver if needed
    pub fn open() -> Result<Self> {
        let mut handle = rusb::open_device_with_vid_pid(consts::VENDOR_ID, consts::PRODUCT_ID)
            .ok_or(Cp2112Error::DeviceNotFound)?;
        let reattach = handle.kernel_driver_active(consts::SMBUS_INTERFACE)?;
        if reattach {
            handle.detach_kernel_driver(consts::SMBUS_INTERFACE)?;
        }
        Ok(Self { handle, reattach })
    }

    /// Read the current SMBus configuration report
    pub fn smbus_configuration(&self) -> Result<SmbusConfig> {
        let mut raw = [0u8; 64];
        let len = self.handle.read_control(
            rusb::request_type(Direction::In, RequestType::Class, Recipient::Interface),
            GET_REPORT,
            REPORT_VALUE,
            0,
            &mut raw,
            TIMEOUT,
        )?;
        SmbusConfig::decode(&raw[..len])
    }

    /// Write a full SMBus configuration report
    pub fn write_smbus_configuration(&self, config: &SmbusConfig) -> Result<()> {
        self.handle.write_control(
            rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface),
            SET_REPORT,
            REPORT_VALUE,
            0,
            &config.encode(),
            TIMEOUT,
        )?;
        Ok(())
    }
}

impl Drop for Cp2112 {
    fn drop(&mut self) {
        if self.reattach {
            if let Err(e) = self.handle.attach_kernel_driver(consts::SMBUS_INTERFACE) {
                log::warn!("failed to reattach kernel driver: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_speed_khz_to_hz() {
        assert_eq!(clock_speed_hz(100).unwrap(), 100_000);
        assert_eq!(clock_speed_hz(10).unwrap(), MIN_CLOCK_SPEED);
        assert_eq!(clock_speed_hz(400).unwrap(), MAX_CLOCK_SPEED);
    }

    #[test]
    fn clock_speed_range_enforced() {
        assert!(matches!(
            clock_speed_hz(9),
            Err(Cp2112Error::ClockSpeedOutOfRange(9))
        ));
        assert!(matches!(
            clock_speed_hz(401),
            Err(Cp2112Error::ClockSpeedOutOfRange(401))
        ));
        // multiplication overflow maps to the same range error
        assert!(matches!(
            clock_speed_hz(u32::MAX),
            Err(Cp2112Error::ClockSpeedOutOfRange(_))
        ));
    }
}
