//! Live device enumeration through sysfs
//!
//! Walks `<root>/devices` depth-first. Every directory holding a `uevent`
//! file is a device; its parent is the closest ancestor directory that is
//! also a device. Symlinks (`subsystem`, `driver`, `port`, ...) are never
//! followed, so the walk is a tree walk.

use super::{DeviceRecord, DeviceSource, parse_hex_id};
use crate::constants::DEFAULT_SYSFS_ROOT;
use crate::device::DeviceType;
use crate::error::{LdmError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// PCI base classes used for classification
const PCI_CLASS_DISPLAY: u32 = 0x03;
const PCI_CLASS_MULTIMEDIA: u32 = 0x04;
const PCI_SUBCLASS_NETWORK_WIRELESS: u32 = 0x0280;

#[derive(Debug, Clone)]
pub struct SysfsSource {
    root: PathBuf,
}

impl SysfsSource {
    /// `root` is the sysfs mount point, normally `/sys`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for SysfsSource {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl DeviceSource for SysfsSource {
    fn snapshot(&self) -> Result<Vec<DeviceRecord>> {
        let devices_dir = self.root.join("devices");
        if !devices_dir.is_dir() {
            return Err(LdmError::Backend(format!(
                "sysfs device directory not found: {}",
                devices_dir.display()
            )));
        }

        let mut records = Vec::new();
        walk(&devices_dir, None, false, &mut records)?;
        Ok(records)
    }
}

fn walk(
    dir: &Path,
    parent: Option<&str>,
    under_usb: bool,
    records: &mut Vec<DeviceRecord>,
) -> Result<()> {
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| LdmError::Backend(format!("Failed to read {}: {}", dir.display(), e)))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    subdirs.sort();

    for sub in subdirs {
        if sub.join("uevent").is_file() {
            let record = read_device(&sub, parent, under_usb);
            let path = record.path.clone();
            let usb_below = under_usb || record.device_type.contains(DeviceType::USB);
            records.push(record);
            walk(&sub, Some(&path), usb_below, records)?;
        } else {
            walk(&sub, parent, under_usb, records)?;
        }
    }

    Ok(())
}

fn read_device(dir: &Path, parent: Option<&str>, under_usb: bool) -> DeviceRecord {
    let uevent = read_attr(dir, "uevent")
        .map(|content| parse_uevent(&content))
        .unwrap_or_default();
    let subsystem = link_name(dir, "subsystem");

    let mut record = DeviceRecord::new(dir.to_string_lossy());
    record.parent = parent.map(str::to_string);
    record.name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    record.modalias = read_attr(dir, "modalias").or_else(|| uevent.get("MODALIAS").cloned());
    record.driver = uevent
        .get("DRIVER")
        .cloned()
        .or_else(|| link_name(dir, "driver"));

    match subsystem.as_deref() {
        Some("pci") => classify_pci(dir, &uevent, &mut record),
        Some("usb") if uevent.get("DEVTYPE").map(String::as_str) == Some("usb_device") => {
            record.device_type = DeviceType::USB;
            record.vendor_id = read_hex_attr(dir, "idVendor").unwrap_or(0);
            record.product_id = read_hex_attr(dir, "idProduct").unwrap_or(0);
            record.vendor = read_attr(dir, "manufacturer");
            if let Some(product) = read_attr(dir, "product") {
                record.name = product;
            }
        }
        Some("hid") => {
            record.device_type = DeviceType::HID;
            if under_usb {
                record.device_type |= DeviceType::USB;
            }
            // HID_ID=0003:00001532:0000021E
            if let Some(id) = uevent.get("HID_ID") {
                let mut parts = id.split(':').skip(1);
                record.vendor_id = parts.next().and_then(parse_hex_id).unwrap_or(0);
                record.product_id = parts.next().and_then(parse_hex_id).unwrap_or(0);
            }
            if let Some(name) = uevent.get("HID_NAME") {
                record.name = name.clone();
            }
        }
        Some("platform") => record.device_type = DeviceType::PLATFORM,
        Some("bluetooth") => record.device_type = DeviceType::BLUETOOTH,
        _ => {}
    }

    record
}

fn classify_pci(dir: &Path, uevent: &HashMap<String, String>, record: &mut DeviceRecord) {
    record.device_type = DeviceType::PCI;

    let class = read_hex_attr(dir, "class")
        .or_else(|| uevent.get("PCI_CLASS").and_then(|c| parse_hex_id(c)))
        .unwrap_or(0);
    match class >> 16 {
        PCI_CLASS_DISPLAY => record.device_type |= DeviceType::GPU,
        PCI_CLASS_MULTIMEDIA => record.device_type |= DeviceType::AUDIO,
        _ if class >> 8 == PCI_SUBCLASS_NETWORK_WIRELESS => {
            record.device_type |= DeviceType::WIRELESS
        }
        _ => {}
    }

    // PCI_ID=10DE:1C03
    let (uevent_vendor, uevent_product) = uevent
        .get("PCI_ID")
        .and_then(|id| id.split_once(':'))
        .map(|(v, p)| (parse_hex_id(v), parse_hex_id(p)))
        .unwrap_or((None, None));
    record.vendor_id = read_hex_attr(dir, "vendor").or(uevent_vendor).unwrap_or(0);
    record.product_id = read_hex_attr(dir, "device").or(uevent_product).unwrap_or(0);
}

fn parse_uevent(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_hex_attr(dir: &Path, name: &str) -> Option<u32> {
    read_attr(dir, name).and_then(|v| parse_hex_id(&v))
}

fn link_name(dir: &Path, name: &str) -> Option<String> {
    fs::read_link(dir.join(name))
        .ok()
        .and_then(|target| target.file_name().map(|n| n.to_string_lossy().into_owned()))
}
