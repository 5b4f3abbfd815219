//! SMBus configuration report of the bridge.
//!
//! Wire form (14 bytes, multi-byte fields big-endian):
//! - Byte 0: report id (0x06)
//! - Bytes 1-4: clock speed in Hz
//! - Byte 5: device (slave) address
//! - Byte 6: auto send read flag
//! - Bytes 7-8: write timeout in ms
//! - Bytes 9-10: read timeout in ms
//! - Byte 11: SCL low timeout flag
//! - Bytes 12-13: retry time

use crate::{Cp2112Error, Result};

/// Report id of the SMBus configuration feature report
pub const REPORT_ID: u8 = 0x06;
/// Encoded size of the configuration report
pub const REPORT_LEN: usize = 14;

/// Decoded SMBus configuration of the bridge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmbusConfig {
    /// Bus clock in Hz
    pub clock_speed: u32,
    pub device_address: u8,
    pub auto_send_read: bool,
    /// In milliseconds, 0 disables the timeout
    pub write_timeout: u16,
    /// In milliseconds, 0 disables the timeout
    pub read_timeout: u16,
    pub scl_low_timeout: bool,
    pub retry_time: u16,
}

impl SmbusConfig {
    /// Encode into the wire form, forcing the leading report id
    pub fn encode(&self) -> [u8; REPORT_LEN] {
        let mut raw = [0u8; REPORT_LEN];
        raw[0] = REPORT_ID;
        raw[1..5].copy_from_slice(&self.clock_speed.to_be_bytes());
        raw[5] = self.device_address;
        raw[6] = self.auto_send_read as u8;
        raw[7..9].copy_from_slice(&self.write_timeout.to_be_bytes());
        raw[9..11].copy_from_slice(&self.read_timeout.to_be_bytes());
        raw[11] = self.scl_low_timeout as u8;
        raw[12..14].copy_from_slice(&self.retry_time.to_be_bytes());
        raw
    }

    /// Decode a configuration report read back from the device
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() != REPORT_LEN {
            return Err(Cp2112Error::ReportLength {
                expected: REPORT_LEN,
                actual: raw.len(),
            });
        }
        if raw[0] != REPORT_ID {
            return Err(Cp2112Error::ReportId(raw[0]));
        }
        Ok(Self {
            clock_speed: u32::from_be_bytes(raw[1..5].try_into().unwrap()),
            device_address: raw[5],
            auto_send_read: raw[6] != 0,
            write_timeout: u16::from_be_bytes(raw[7..9].try_into().unwrap()),
            read_timeout: u16::from_be_bytes(raw[9..11].try_into().unwrap()),
            scl_low_timeout: raw[11] != 0,
            retry_time: u16::from_be_bytes(raw[12..14].try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: [u8; REPORT_LEN] = [
        0x06, // report id
        0x00, 0x01, 0x86, 0xA0, // 100 kHz
        0x02, // device address
        0x00, // auto send read off
        0x00, 0x64, // write timeout 100 ms
        0x00, 0x64, // read timeout 100 ms
        0x01, // scl low timeout on
        0x00, 0x0A, // retry time 10
    ];

    #[test]
    fn decodes_known_report() {
        assert_eq!(
            SmbusConfig::decode(&RAW).unwrap(),
            SmbusConfig {
                clock_speed: 100_000,
                device_address: 0x02,
                auto_send_read: false,
                write_timeout: 100,
                read_timeout: 100,
                scl_low_timeout: true,
                retry_time: 10,
            }
        );
    }

    #[test]
    fn bytes_roundtrip() {
        assert_eq!(SmbusConfig::decode(&RAW).unwrap().encode(), RAW);
    }

    #[test]
    fn fields_roundtrip() {
        let config = SmbusConfig {
            clock_speed: 400_000,
            device_address: 0x55,
            auto_send_read: true,
            write_timeout: 0,
            read_timeout: 1000,
            scl_low_timeout: false,
            retry_time: 3,
        };
        assert_eq!(SmbusConfig::decode(&config.encode()).unwrap(), config);
    }

    #[test]
    fn rejects_short_report() {
        assert!(matches!(
            SmbusConfig::decode(&RAW[..13]),
            Err(Cp2112Error::ReportLength {
                expected: REPORT_LEN,
                actual: 13
            })
        ));
    }

    #[test]
    fn rejects_wrong_report_id() {
        let mut raw = RAW;
        raw[0] = 0x07;
        assert!(matches!(
            SmbusConfig::decode(&raw),
            Err(Cp2112Error::ReportId(0x07))
        ));
    }
}
