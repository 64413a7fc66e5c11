//! GPU configuration
//!
//! Narrows a [`Manager`] down to its graphics devices. The primary GPU is
//! the first GPU in tree pre-order, which follows the firmware's boot
//! display ordering. Provider ranking is left entirely to the manager.

use crate::constants::{PCI_VENDOR_AMD, PCI_VENDOR_INTEL, PCI_VENDOR_NVIDIA};
use crate::device::{Device, DeviceType};
use crate::error::{LdmError, Result};
use crate::manager::Manager;
use crate::plugin::Provider;
use serde::Serialize;
use std::fmt;

/// Shape of the graphics setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GpuKind {
    /// A single GPU
    Simple,
    /// Intel integrated graphics paired with an NVIDIA GPU
    Optimus,
    /// Intel integrated graphics paired with an AMD GPU
    AmdHybrid,
    /// Any other multi-GPU combination
    Hybrid,
}

impl fmt::Display for GpuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Optimus => write!(f, "optimus"),
            Self::AmdHybrid => write!(f, "amd-hybrid"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GpuConfig<'a> {
    manager: &'a Manager,
    primary: &'a Device,
    gpus: Vec<&'a Device>,
}

impl<'a> GpuConfig<'a> {
    /// Fails with [`LdmError::NoGpu`] when the manager has no GPU devices
    pub fn new(manager: &'a Manager) -> Result<Self> {
        let gpus = manager.get_devices(DeviceType::GPU);
        let Some(&primary) = gpus.first() else {
            return Err(LdmError::NoGpu);
        };

        Ok(Self {
            manager,
            primary,
            gpus,
        })
    }

    /// All GPUs in pre-order
    pub fn gpu_devices(&self) -> &[&'a Device] {
        &self.gpus
    }

    pub fn count(&self) -> usize {
        self.gpus.len()
    }

    pub fn primary_device(&self) -> &'a Device {
        self.primary
    }

    /// The next GPU after the primary one, on multi-GPU systems
    pub fn secondary_device(&self) -> Option<&'a Device> {
        self.gpus.get(1).copied()
    }

    pub fn is_hybrid(&self) -> bool {
        self.gpus.len() > 1
    }

    pub fn kind(&self) -> GpuKind {
        if !self.is_hybrid() {
            return GpuKind::Simple;
        }

        let has_vendor = |vendor: u32| self.gpus.iter().any(|d| d.vendor_id() == vendor);
        if has_vendor(PCI_VENDOR_INTEL) && has_vendor(PCI_VENDOR_NVIDIA) {
            GpuKind::Optimus
        } else if has_vendor(PCI_VENDOR_INTEL) && has_vendor(PCI_VENDOR_AMD) {
            GpuKind::AmdHybrid
        } else {
            GpuKind::Hybrid
        }
    }

    /// Ranked providers for the primary GPU
    pub fn get_providers(&self) -> Vec<Provider> {
        self.manager.get_providers(self.primary)
    }
}
