// Common constants used throughout the codebase

/// Project name
pub const PROJECT_NAME: &str = "ldm";

/// Project organization (reverse domain notation)
pub const PROJECT_QUALIFIER: &str = "org";
pub const PROJECT_ORG: &str = "linux-driver-management";

/// Settings file name inside the config directory
pub const SETTINGS_FILE_NAME: &str = "settings.kdl";

/// Where distributions install modalias databases
pub const DEFAULT_MODALIAS_DIR: &str = "/usr/share/linux-driver-management/modaliases";

/// sysfs mount point
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";

/// First token of every modalias rule line
pub const MODALIAS_RULE_KEYWORD: &str = "alias";
