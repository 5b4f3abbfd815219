//! Sysfs-style GPIO pin handle.

use std::io;
use std::path::PathBuf;

/// Single GPIO pin driven through the sysfs control files
pub struct GpioPin {
    base: PathBuf,
    number: u32,
}

impl GpioPin {
    pub const SYSFS_BASE: &'static str = "/sys/class/gpio";

    pub fn new(number: u32) -> Self {
        Self::with_base(Self::SYSFS_BASE, number)
    }

    /// Pin rooted at an alternative control directory
    pub fn with_base(base: impl Into<PathBuf>, number: u32) -> Self {
        Self {
            base: base.into(),
            number,
        }
    }

    fn control_dir(&self) -> PathBuf {
        self.base.join(format!("gpio{}", self.number))
    }

    fn write(&self, path: PathBuf, content: &str) -> io::Result<()> {
        log::debug!("writing {} to {}", content, path.display());
        std::fs::write(path, format!("{content}\n"))
    }

    /// Request export of the pin unless its control directory already exists
    pub fn export(&self) -> io::Result<()> {
        if self.control_dir().is_dir() {
            return Ok(());
        }
        self.write(self.base.join("export"), &self.number.to_string())
    }

    /// Configure the pin as an output
    pub fn set_output(&self) -> io::Result<()> {
        self.write(self.control_dir().join("direction"), "out")
    }

    /// Drive the pin high or low
    pub fn set(&self, high: bool) -> io::Result<()> {
        self.write(self.control_dir().join("value"), if high { "1" } else { "0" })
    }
}
