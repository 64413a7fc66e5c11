//! Arena-backed device tree
//!
//! Devices are stored in pre-order: a device's id is always greater than
//! its parent's, and iterating the arena front to back is a depth-first
//! walk of the hierarchy. Top-level devices (no parent) are kept in the
//! order the source reported them.

use super::{Device, DeviceId, DeviceType};
use crate::error::{LdmError, Result};
use crate::source::DeviceRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct DeviceTree {
    devices: Vec<Device>,
    roots: Vec<DeviceId>,
    by_path: HashMap<String, DeviceId>,
}

impl DeviceTree {
    /// Build a tree from a flat source listing
    ///
    /// Fails without producing a tree if a path is empty or repeated, a
    /// parent path is unknown, or the parent links form a cycle.
    pub fn from_records(records: Vec<DeviceRecord>) -> Result<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if record.path.is_empty() {
                return Err(LdmError::Backend(format!(
                    "Device record {} has an empty path",
                    i
                )));
            }
            if index.insert(record.path.as_str(), i).is_some() {
                return Err(LdmError::Backend(format!(
                    "Duplicate device path: {}",
                    record.path
                )));
            }
        }

        let mut child_slots: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut parent_slots: Vec<Option<usize>> = vec![None; records.len()];
        let mut root_slots = Vec::new();
        for (i, record) in records.iter().enumerate() {
            match &record.parent {
                None => root_slots.push(i),
                Some(parent) => {
                    let parent_slot = *index.get(parent.as_str()).ok_or_else(|| {
                        LdmError::Backend(format!(
                            "Device '{}' references unknown parent '{}'",
                            record.path, parent
                        ))
                    })?;
                    if parent_slot == i {
                        return Err(LdmError::Backend(format!(
                            "Device '{}' is its own parent",
                            record.path
                        )));
                    }
                    child_slots[parent_slot].push(i);
                    parent_slots[i] = Some(parent_slot);
                }
            }
        }

        // Pre-order walk assigning arena ids
        let mut order = Vec::with_capacity(records.len());
        let mut stack: Vec<usize> = root_slots.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            order.push(slot);
            stack.extend(child_slots[slot].iter().rev().copied());
        }

        if order.len() != records.len() {
            return Err(LdmError::Backend(format!(
                "Device hierarchy contains a cycle ({} of {} devices unreachable from a root)",
                records.len() - order.len(),
                records.len()
            )));
        }

        let mut id_of = vec![DeviceId(0); records.len()];
        for (position, &slot) in order.iter().enumerate() {
            id_of[slot] = DeviceId(position);
        }

        drop(index);
        let mut slots: Vec<Option<DeviceRecord>> = records.into_iter().map(Some).collect();
        let mut devices = Vec::with_capacity(order.len());
        let mut by_path = HashMap::with_capacity(order.len());

        for &slot in &order {
            let record = slots[slot]
                .take()
                .ok_or_else(|| LdmError::Backend("Device visited twice".to_string()))?;
            let id = id_of[slot];
            let parent = parent_slots[slot].map(|p| id_of[p]);
            let children = child_slots[slot].iter().map(|&c| id_of[c]).collect();

            by_path.insert(record.path.clone(), id);
            devices.push(Device {
                id,
                path: record.path,
                name: record.name,
                vendor: record.vendor,
                vendor_id: record.vendor_id,
                product_id: record.product_id,
                device_type: record.device_type,
                modalias: record.modalias.filter(|m| !m.is_empty()),
                driver: record.driver,
                parent,
                children,
            });
        }

        let roots = root_slots.iter().map(|&r| id_of[r]).collect();

        Ok(Self {
            devices,
            roots,
            by_path,
        })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// All devices in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id.0)
    }

    pub fn device_by_path(&self, path: &str) -> Option<&Device> {
        self.by_path.get(path).and_then(|&id| self.device(id))
    }

    pub fn roots(&self) -> impl Iterator<Item = &Device> {
        self.roots.iter().filter_map(|&id| self.device(id))
    }

    pub fn parent(&self, id: DeviceId) -> Option<&Device> {
        self.device(id)
            .and_then(|d| d.parent)
            .and_then(|p| self.device(p))
    }

    pub fn children(&self, id: DeviceId) -> impl Iterator<Item = &Device> {
        self.device(id)
            .map(|d| d.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&c| self.device(c))
    }

    /// Devices whose categories intersect `mask`, in pre-order
    pub fn devices_matching(&self, mask: DeviceType) -> Vec<&Device> {
        self.devices.iter().filter(|d| d.has_type(mask)).collect()
    }
}
