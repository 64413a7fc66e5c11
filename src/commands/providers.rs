use crate::commands::{display_device, display_provider};
use crate::device::{Device, DeviceType};
use crate::error::Result;
use crate::manager::Manager;
use crate::plugin::Provider;
use crate::ui as output;
use crate::utils::machine_output;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DeviceProviders<'a> {
    device: &'a Device,
    providers: Vec<Provider>,
}

pub fn run(manager: &Manager, device_type: Option<DeviceType>, format: &str) -> Result<()> {
    let mask = device_type.unwrap_or_else(DeviceType::all);
    let matches = manager.get_all_providers(mask);
    output::verbose(&format!(
        "{} plugins registered, {} devices have providers",
        manager.plugins().len(),
        matches.len()
    ));

    match format {
        "json" => {
            let data: Vec<DeviceProviders> = matches
                .into_iter()
                .map(|(device, providers)| DeviceProviders { device, providers })
                .collect();
            machine_output::emit_v1("providers", data, Vec::new(), Vec::new())
        }
        _ => {
            if matches.is_empty() {
                output::info("No providers found for matching devices");
                return Ok(());
            }

            output::header("Providers");
            for (device, providers) in &matches {
                display_device(device, 0);
                for provider in providers {
                    display_provider(provider, 2);
                }
            }
            Ok(())
        }
    }
}
