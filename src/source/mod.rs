//! Device sources
//!
//! A [`DeviceSource`] supplies the flat list of devices that a
//! [`Manager`](crate::manager::Manager) turns into its device tree.
//!
//! - [`SysfsSource`] walks a live (or copied) `/sys/devices` hierarchy
//! - [`FixtureSource`] reads a declarative KDL description of a machine,
//!   used by the test suite and for offline inspection
//! - a plain `Vec<DeviceRecord>` is a source too

pub mod fixture;
pub mod sysfs;

pub use fixture::FixtureSource;
pub use sysfs::SysfsSource;

use crate::device::DeviceType;
use crate::error::Result;

/// One device as reported by a source, before tree construction
///
/// Records reference their parent by path. The list must be ordered so
/// that siblings appear in the order they should be traversed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceRecord {
    pub path: String,
    pub parent: Option<String>,
    pub name: String,
    pub vendor: Option<String>,
    pub vendor_id: u32,
    pub product_id: u32,
    pub device_type: DeviceType,
    pub modalias: Option<String>,
    pub driver: Option<String>,
}

impl DeviceRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn with_ids(mut self, vendor_id: u32, product_id: u32) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    pub fn with_modalias(mut self, modalias: impl Into<String>) -> Self {
        self.modalias = Some(modalias.into());
        self
    }
}

/// Anything that can produce a device snapshot
///
/// A failing snapshot must be reported as
/// [`LdmError::Backend`](crate::error::LdmError::Backend).
pub trait DeviceSource: Send + Sync {
    fn snapshot(&self) -> Result<Vec<DeviceRecord>>;
}

impl DeviceSource for Vec<DeviceRecord> {
    fn snapshot(&self) -> Result<Vec<DeviceRecord>> {
        Ok(self.clone())
    }
}

/// Parse a hexadecimal id such as `10de` or `0x10DE`
pub(crate) fn parse_hex_id(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).ok()
}
