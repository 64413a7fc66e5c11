//! PCI vendor ids of the GPU vendors ldm knows how to pair up
//! in hybrid graphics setups.

pub const PCI_VENDOR_INTEL: u32 = 0x8086;
pub const PCI_VENDOR_NVIDIA: u32 = 0x10DE;
pub const PCI_VENDOR_AMD: u32 = 0x1002;
