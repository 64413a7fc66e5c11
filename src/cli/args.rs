use crate::device::DeviceType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ldm",
    about = "Linux driver management",
    long_about = "Detect hardware and find the driver packages that support it",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Read devices from a KDL fixture instead of sysfs
    #[arg(long, value_name = "FILE", global = true)]
    pub fixture: Option<PathBuf>,

    /// Directory of modalias databases
    #[arg(long, value_name = "DIR", global = true)]
    pub modalias_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_parser = ["table", "json"], global = true)]
    pub format: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List detected devices
    Devices {
        /// Device types to include, e.g. "gpu" or "usb,hid"
        #[arg(long = "type", value_name = "TYPES", value_parser = DeviceType::parse_list)]
        device_type: Option<DeviceType>,
    },

    /// Show driver packages available for detected devices
    Providers {
        /// Device types to include, e.g. "gpu" or "usb,hid"
        #[arg(long = "type", value_name = "TYPES", value_parser = DeviceType::parse_list)]
        device_type: Option<DeviceType>,
    },

    /// Describe the graphics configuration
    Gpu,
}

#[cfg(test)]
mod tests;
