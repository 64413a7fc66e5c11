//! Device Model
//!
//! A snapshot of the hardware present on the machine, stored as an arena
//! ([`DeviceTree`]) of [`Device`] values addressed by [`DeviceId`].
//!
//! Each device carries a [`DeviceType`] flag set. A device can belong to
//! several categories at once: a keyboard attached over USB is both
//! `HID` and `USB`, a discrete graphics card is both `PCI` and `GPU`.

pub mod tree;

pub use tree::DeviceTree;

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
    /// Device categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceType: u32 {
        const AUDIO = 1 << 0;
        const BLUETOOTH = 1 << 1;
        const GPU = 1 << 2;
        const HID = 1 << 3;
        const IMAGE = 1 << 4;
        const PCI = 1 << 5;
        const PLATFORM = 1 << 6;
        const USB = 1 << 7;
        const WIRELESS = 1 << 8;
    }
}

impl DeviceType {
    /// Lowercase names of every category in this set
    pub fn names(&self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_lowercase())
            .collect()
    }

    /// Parse a list of category names separated by whitespace, commas or `|`
    ///
    /// `any` and `all` expand to every category.
    pub fn parse_list(input: &str) -> Result<Self, String> {
        input
            .split(|c: char| c.is_whitespace() || c == ',' || c == '|')
            .filter(|token| !token.is_empty())
            .try_fold(DeviceType::empty(), |acc, token| {
                Ok(acc | token.parse::<DeviceType>()?)
            })
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "any" || lower == "all" {
            return Ok(DeviceType::all());
        }
        DeviceType::from_name(&lower.to_uppercase())
            .ok_or_else(|| format!("Unknown device type: '{}'", s.trim()))
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join("|"))
    }
}

impl Serialize for DeviceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Stable index of a device inside its [`DeviceTree`]
///
/// Ids are assigned in pre-order, so comparing two ids of the same tree
/// compares their traversal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceId(pub(crate) usize);

impl DeviceId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One hardware device in a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub(crate) id: DeviceId,
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) vendor: Option<String>,
    pub(crate) vendor_id: u32,
    pub(crate) product_id: u32,
    pub(crate) device_type: DeviceType,
    pub(crate) modalias: Option<String>,
    pub(crate) driver: Option<String>,
    pub(crate) parent: Option<DeviceId>,
    pub(crate) children: Vec<DeviceId>,
}

impl Device {
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Sysfs path (or the fixture's equivalent)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn product_id(&self) -> u32 {
        self.product_id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// True if this device belongs to any category in `mask`
    pub fn has_type(&self, mask: DeviceType) -> bool {
        self.device_type.intersects(mask)
    }

    pub fn modalias(&self) -> Option<&str> {
        self.modalias.as_deref()
    }

    /// Kernel driver currently bound to the device, if known
    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    pub fn parent(&self) -> Option<DeviceId> {
        self.parent
    }

    pub fn children(&self) -> &[DeviceId] {
        &self.children
    }
}
