pub mod devices;
pub mod gpu;
pub mod providers;

use crate::device::Device;
use crate::plugin::Provider;
use crate::ui as output;
use colored::Colorize;

/// One-line device summary followed by its identity details
pub(crate) fn display_device(device: &Device, level: usize) {
    output::indent(
        &format!(
            "{} {} {}",
            device.name().bold(),
            format!("[{}]", device.device_type()).cyan(),
            format!("{:04x}:{:04x}", device.vendor_id(), device.product_id()).dimmed()
        ),
        level,
    );
    output::indent(&format!("path: {}", device.path()), level + 1);
    if let Some(vendor) = device.vendor() {
        output::indent(&format!("vendor: {}", vendor), level + 1);
    }
    if let Some(modalias) = device.modalias() {
        output::indent(&format!("modalias: {}", modalias), level + 1);
    }
    if let Some(driver) = device.driver() {
        output::indent(&format!("driver: {}", driver), level + 1);
    }
}

pub(crate) fn display_provider(provider: &Provider, level: usize) {
    let driver = provider.driver().unwrap_or("-");
    output::indent(
        &format!(
            "{} {}",
            provider.package().green().bold(),
            format!(
                "(priority {}, plugin {}, driver {})",
                provider.priority(),
                provider.plugin(),
                driver
            )
            .dimmed()
        ),
        level,
    );
}
