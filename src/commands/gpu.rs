use crate::commands::{display_device, display_provider};
use crate::device::Device;
use crate::error::Result;
use crate::gpu::{GpuConfig, GpuKind};
use crate::manager::Manager;
use crate::plugin::Provider;
use crate::ui as output;
use crate::utils::machine_output;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct GpuReport<'a> {
    kind: GpuKind,
    count: usize,
    primary: &'a Device,
    secondary: Option<&'a Device>,
    providers: Vec<Provider>,
}

pub fn run(manager: &Manager, format: &str) -> Result<()> {
    let config = GpuConfig::new(manager)?;
    let report = GpuReport {
        kind: config.kind(),
        count: config.count(),
        primary: config.primary_device(),
        secondary: config.secondary_device(),
        providers: config.get_providers(),
    };

    match format {
        "json" => machine_output::emit_v1("gpu", report, Vec::new(), Vec::new()),
        _ => {
            display_report(&report);
            Ok(())
        }
    }
}

fn display_report(report: &GpuReport) {
    output::header("GPU configuration");
    output::keyval("Kind", &report.kind.to_string());
    output::keyval("GPUs", &report.count.to_string());

    output::keyval("Primary", "");
    display_device(report.primary, 1);
    if let Some(secondary) = report.secondary {
        output::keyval("Secondary", "");
        display_device(secondary, 1);
    }

    if report.providers.is_empty() {
        output::info("No driver packages found for the primary GPU");
        return;
    }
    output::keyval("Providers", "");
    for provider in &report.providers {
        display_provider(provider, 1);
    }
}
