pub mod common;
pub mod vendors;

pub use common::{
    DEFAULT_MODALIAS_DIR, DEFAULT_SYSFS_ROOT, MODALIAS_RULE_KEYWORD, PROJECT_NAME, PROJECT_ORG,
    PROJECT_QUALIFIER, SETTINGS_FILE_NAME,
};
pub use vendors::{PCI_VENDOR_AMD, PCI_VENDOR_INTEL, PCI_VENDOR_NVIDIA};
