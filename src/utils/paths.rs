use crate::constants::{PROJECT_NAME, PROJECT_ORG, PROJECT_QUALIFIER, SETTINGS_FILE_NAME};
use crate::error::{LdmError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub fn config_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORG, PROJECT_NAME)
        .ok_or_else(|| LdmError::Config("Could not determine config directory".to_string()))?;
    Ok(proj.config_dir().to_path_buf())
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests;
