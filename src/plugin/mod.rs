//! # Plugins and Providers
//!
//! A [`Plugin`] maps a [`Device`] to the driver packages that could serve
//! it. Each candidate is a [`Provider`].
//!
//! ## Contract
//!
//! - `resolve` is a pure function of the plugin's loaded data and the
//!   device. All I/O happens when the plugin is loaded.
//! - A plugin that does not recognise a device returns an empty list,
//!   never an error.
//! - Within one plugin, at most one provider is returned per package.
//!
//! ## Adding a New Plugin Kind
//!
//! 1. Create `src/plugin/<kind>.rs` with a loader and a `resolve` method
//! 2. Add a `Plugin::<Kind>` variant
//! 3. Extend the `match` arms in `Plugin::name()` and `Plugin::resolve()`

pub mod modalias;

pub use modalias::{ModaliasPlugin, ModaliasRule};

use crate::device::{Device, DeviceId};
use serde::Serialize;

/// One candidate driver package for a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    package: String,
    plugin: String,
    priority: i32,
    driver: Option<String>,
    device: DeviceId,
}

impl Provider {
    pub fn new(
        package: impl Into<String>,
        plugin: impl Into<String>,
        priority: i32,
        driver: Option<String>,
        device: DeviceId,
    ) -> Self {
        Self {
            package: package.into(),
            plugin: plugin.into(),
            priority,
            driver,
            device,
        }
    }

    /// Package to install
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Name of the plugin that produced this provider
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Ranking key, higher is preferred
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Kernel driver named by the matching rule
    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    /// The device this provider was detected for
    pub fn device(&self) -> DeviceId {
        self.device
    }
}

/// Every kind of plugin a [`Manager`](crate::manager::Manager) can hold
#[derive(Debug, Clone)]
pub enum Plugin {
    Modalias(ModaliasPlugin),
}

impl Plugin {
    /// Unique name of the plugin within a manager
    pub fn name(&self) -> &str {
        match self {
            Plugin::Modalias(plugin) => plugin.name(),
        }
    }

    /// Candidate providers for `device`
    pub fn resolve(&self, device: &Device) -> Vec<Provider> {
        match self {
            Plugin::Modalias(plugin) => plugin.resolve(device),
        }
    }
}

impl From<ModaliasPlugin> for Plugin {
    fn from(plugin: ModaliasPlugin) -> Self {
        Plugin::Modalias(plugin)
    }
}
