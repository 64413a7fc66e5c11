//! Linux driver management
//!
//! Builds a tree of the hardware present on a machine and matches each
//! device against modalias databases to find the driver packages that
//! support it.
//!
//! ```no_run
//! use ldm::{DeviceType, Manager, ManagerFlags};
//!
//! let mut manager = Manager::new(ManagerFlags::NO_MONITOR)?;
//! manager.add_plugins_for_directory("/usr/share/linux-driver-management/modaliases")?;
//!
//! for device in manager.get_devices(DeviceType::GPU) {
//!     for provider in manager.get_providers(device) {
//!         println!("{} -> {}", device.name(), provider.package());
//!     }
//! }
//! # Ok::<(), ldm::LdmError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod gpu;
pub mod manager;
pub mod plugin;
pub mod source;
pub mod ui;
pub mod utils;

pub use device::{Device, DeviceId, DeviceTree, DeviceType};
pub use error::{LdmError, Result};
pub use gpu::{GpuConfig, GpuKind};
pub use manager::{Manager, ManagerFlags};
pub use plugin::{ModaliasPlugin, Plugin, Provider};
pub use source::{DeviceRecord, DeviceSource, FixtureSource, SysfsSource};

use clap::Parser;
use std::process::exit;

/// Run ldm CLI entrypoint.
pub fn run_cli() {
    // Color settings must be initialized before any output
    ui::init_colors();

    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}
