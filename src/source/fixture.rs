//! Declarative device fixtures
//!
//! Describes a machine as nested KDL `device` nodes:
//!
//! ```kdl
//! device "/sys/devices/pci0000:00" name="Host bridge" {
//!     device "/sys/devices/pci0000:00/0000:00:02.0" name="HD Graphics 4600" \
//!         types="pci gpu" vendor="8086" product="0416" driver="i915" \
//!         modalias="pci:v00008086d00000416sv000017AAsd00002210bc03sc00i00"
//! }
//! ```
//!
//! Nesting defines the parent links. `vendor` and `product` are hex
//! strings, `types` is a list of category names.

use super::{DeviceRecord, DeviceSource, parse_hex_id};
use crate::device::DeviceType;
use crate::error::{LdmError, Result};
use kdl::{KdlDocument, KdlNode};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FixtureSource {
    origin: PathBuf,
    content: String,
}

impl FixtureSource {
    /// Read a fixture file; parsing happens at snapshot time
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LdmError::Backend(format!("Failed to read fixture '{}': {}", path.display(), e))
        })?;
        Ok(Self {
            origin: path.to_path_buf(),
            content,
        })
    }

    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            origin: PathBuf::from("<inline>"),
            content: content.into(),
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }
}

impl DeviceSource for FixtureSource {
    fn snapshot(&self) -> Result<Vec<DeviceRecord>> {
        let doc = KdlDocument::parse(&self.content).map_err(|e| {
            LdmError::Backend(format!(
                "Failed to parse fixture '{}': {}",
                self.origin.display(),
                e
            ))
        })?;

        let mut records = Vec::new();
        collect_devices(&doc, None, &mut records)?;
        Ok(records)
    }
}

fn collect_devices(
    doc: &KdlDocument,
    parent: Option<&str>,
    records: &mut Vec<DeviceRecord>,
) -> Result<()> {
    for node in doc.nodes() {
        match node.name().value() {
            "device" => {
                let record = parse_device_node(node, parent)?;
                let path = record.path.clone();
                records.push(record);
                if let Some(children) = node.children() {
                    collect_devices(children, Some(&path), records)?;
                }
            }
            other => {
                return Err(LdmError::Backend(format!(
                    "Unexpected fixture node '{}' (expected 'device')",
                    other
                )));
            }
        }
    }
    Ok(())
}

fn parse_device_node(node: &KdlNode, parent: Option<&str>) -> Result<DeviceRecord> {
    let path = node
        .entries()
        .iter()
        .find(|entry| entry.name().is_none())
        .and_then(|entry| entry.value().as_string())
        .ok_or_else(|| LdmError::Backend("Fixture device is missing its path".to_string()))?;

    let mut record = DeviceRecord::new(path);
    record.parent = parent.map(str::to_string);

    for entry in node.entries() {
        let Some(key) = entry.name() else {
            continue;
        };
        let key = key.value();
        let value = entry.value().as_string().ok_or_else(|| {
            LdmError::Backend(format!(
                "Fixture device '{}': property '{}' must be a string",
                path, key
            ))
        })?;

        match key {
            "name" => record.name = value.to_string(),
            "vendor-name" => record.vendor = Some(value.to_string()),
            "vendor" => record.vendor_id = parse_id(path, key, value)?,
            "product" => record.product_id = parse_id(path, key, value)?,
            "types" => {
                record.device_type = DeviceType::parse_list(value)
                    .map_err(|e| LdmError::Backend(format!("Fixture device '{}': {}", path, e)))?;
            }
            "modalias" => record.modalias = Some(value.to_string()),
            "driver" => record.driver = Some(value.to_string()),
            _ => {
                return Err(LdmError::Backend(format!(
                    "Fixture device '{}': unknown property '{}'",
                    path, key
                )));
            }
        }
    }

    if record.name.is_empty() {
        record.name = path.rsplit('/').next().unwrap_or(path).to_string();
    }

    Ok(record)
}

fn parse_id(path: &str, key: &str, value: &str) -> Result<u32> {
    parse_hex_id(value).ok_or_else(|| {
        LdmError::Backend(format!(
            "Fixture device '{}': '{}' is not a hex id: {}",
            path, key, value
        ))
    })
}
