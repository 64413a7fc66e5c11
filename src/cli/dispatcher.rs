//! Command dispatcher
//!
//! Loads settings, builds the [`Manager`] and routes to command handlers.

use crate::cli::args::{Cli, Command, GlobalFlags};
use crate::commands;
use crate::config::Settings;
use crate::error::Result;
use crate::manager::{Manager, ManagerFlags};
use crate::source::{FixtureSource, SysfsSource};
use crate::ui as output;
use std::path::PathBuf;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    let settings = match &args.global.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    output::set_color_mode(settings.color());
    output::verbose(&format!(
        "Settings: {}",
        settings.settings_file().display()
    ));

    let format = resolve_format(&args.global, &settings);
    let manager = build_manager(&args.global, &settings)?;

    match &args.command {
        Command::Devices { device_type } => commands::devices::run(&manager, *device_type, &format),
        Command::Providers { device_type } => {
            commands::providers::run(&manager, *device_type, &format)
        }
        Command::Gpu => commands::gpu::run(&manager, &format),
    }
}

/// `--format` wins over the `format` setting
fn resolve_format(global: &GlobalFlags, settings: &Settings) -> String {
    global
        .format
        .clone()
        .unwrap_or_else(|| settings.format().to_string())
}

fn resolve_modalias_dir(global: &GlobalFlags, settings: &Settings) -> PathBuf {
    global
        .modalias_dir
        .clone()
        .unwrap_or_else(|| settings.modalias_dir())
}

fn build_manager(global: &GlobalFlags, settings: &Settings) -> Result<Manager> {
    let mut manager = match &global.fixture {
        Some(path) => {
            output::verbose(&format!("Reading devices from {}", path.display()));
            Manager::with_source(&FixtureSource::from_path(path)?, ManagerFlags::NO_MONITOR)?
        }
        None => {
            let source = SysfsSource::new(settings.sysfs_root());
            output::verbose(&format!("Scanning {}", source.root().display()));
            Manager::with_source(&source, ManagerFlags::NO_MONITOR)?
        }
    };
    output::verbose(&format!("Found {} devices", manager.tree().len()));

    let dir = resolve_modalias_dir(global, settings);
    if dir.is_dir() {
        let added = manager.add_plugins_for_directory(&dir)?;
        output::verbose(&format!(
            "Loaded {} modalias databases from {}",
            added,
            dir.display()
        ));
    } else {
        output::warning(&format!(
            "Modalias directory not found: {} (no providers available)",
            dir.display()
        ));
    }

    Ok(manager)
}

#[cfg(test)]
mod tests;
