use crate::commands::display_device;
use crate::device::{Device, DeviceType};
use crate::error::Result;
use crate::manager::Manager;
use crate::ui as output;
use crate::utils::machine_output;

pub fn run(manager: &Manager, device_type: Option<DeviceType>, format: &str) -> Result<()> {
    let mask = device_type.unwrap_or_else(DeviceType::all);
    let devices = manager.get_devices(mask);
    output::verbose(&format!("{} of {} devices match '{}'", devices.len(), manager.tree().len(), mask));

    match format {
        "json" => machine_output::emit_v1("devices", &devices, Vec::new(), Vec::new()),
        _ => {
            display_devices(&devices);
            Ok(())
        }
    }
}

fn display_devices(devices: &[&Device]) {
    if devices.is_empty() {
        output::info("No matching devices");
        return;
    }

    output::header(&format!("Devices ({})", devices.len()));
    for device in devices {
        display_device(device, 0);
    }
}
