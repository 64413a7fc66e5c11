//! # Manager
//!
//! Owns one device snapshot and an ordered set of plugins, and answers the
//! two central queries: which devices match a type filter, and which
//! providers apply to a device.
//!
//! ## Provider ordering
//!
//! `get_providers` concatenates the results of every plugin and sorts them
//! by:
//! 1. priority, highest first
//! 2. registration index of the owning plugin, earliest first
//! 3. package name
//!
//! The order is total, so the same manager state always yields the same
//! list for the same device.
//!
//! ## Mutation
//!
//! Registration methods take `&mut self` and are all-or-nothing: a failed
//! call leaves the registered plugins exactly as they were. Queries take
//! `&self`, so a fully registered manager can be shared between threads.

use crate::device::{Device, DeviceId, DeviceTree, DeviceType};
use crate::error::{LdmError, Result};
use crate::plugin::{ModaliasPlugin, Plugin, Provider};
use crate::source::{DeviceSource, SysfsSource};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

bitflags::bitflags! {
    /// Backend behaviour switches for [`Manager::new`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ManagerFlags: u32 {
        /// Do not watch for hotplug events. Snapshots are never monitored,
        /// so this is accepted for compatibility and changes nothing.
        const NO_MONITOR = 1 << 0;
    }
}

impl From<u32> for ManagerFlags {
    /// Unknown bits are dropped
    fn from(bits: u32) -> Self {
        ManagerFlags::from_bits_truncate(bits)
    }
}

#[derive(Debug)]
pub struct Manager {
    flags: ManagerFlags,
    tree: DeviceTree,
    plugins: Vec<Plugin>,
}

impl Manager {
    /// Snapshot the live system through sysfs
    pub fn new(flags: impl Into<ManagerFlags>) -> Result<Self> {
        Self::with_source(&SysfsSource::default(), flags)
    }

    /// Snapshot devices from `source`
    pub fn with_source<S>(source: &S, flags: impl Into<ManagerFlags>) -> Result<Self>
    where
        S: DeviceSource + ?Sized,
    {
        let tree = DeviceTree::from_records(source.snapshot()?)?;
        Ok(Self {
            flags: flags.into(),
            tree,
            plugins: Vec::new(),
        })
    }

    pub fn flags(&self) -> ManagerFlags {
        self.flags
    }

    pub fn tree(&self) -> &DeviceTree {
        &self.tree
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.tree.device(id)
    }

    /// Registered plugins; a plugin's position is its registration index
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn plugin(&self, name: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// Register an already loaded plugin at the next index
    pub fn add_plugin(&mut self, plugin: impl Into<Plugin>) -> Result<()> {
        let plugin = plugin.into();
        if self.plugin(plugin.name()).is_some() {
            return Err(LdmError::PluginExists(plugin.name().to_string()));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Load one modalias database and register it
    pub fn add_plugin_for_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let plugin = ModaliasPlugin::load(path)?;
        self.add_plugin(plugin)
    }

    /// Load every database file in `dir`, in file name order
    ///
    /// Hidden files and subdirectories are skipped. Either every file is
    /// registered or none is. Returns the number of plugins added.
    pub fn add_plugins_for_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| LdmError::io(dir, e))?
            .map(|entry| entry.map(|e| e.path()).map_err(|e| LdmError::io(dir, e)))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|path| path.is_file() && !is_hidden(path))
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let loaded: Vec<Result<ModaliasPlugin>> =
            files.par_iter().map(|path| ModaliasPlugin::load(path)).collect();

        let mut batch = Vec::with_capacity(loaded.len());
        let mut names: HashSet<String> = HashSet::new();
        for plugin in loaded {
            let plugin = plugin?;
            if self.plugin(plugin.name()).is_some() || !names.insert(plugin.name().to_string()) {
                return Err(LdmError::PluginExists(plugin.name().to_string()));
            }
            batch.push(Plugin::from(plugin));
        }

        let added = batch.len();
        self.plugins.extend(batch);
        Ok(added)
    }

    /// Devices whose categories intersect `mask`, in tree pre-order
    pub fn get_devices(&self, mask: DeviceType) -> Vec<&Device> {
        self.tree.devices_matching(mask)
    }

    /// Ranked providers for `device` across all plugins
    pub fn get_providers(&self, device: &Device) -> Vec<Provider> {
        let mut ranked: Vec<(usize, Provider)> = self
            .plugins
            .iter()
            .enumerate()
            .flat_map(|(index, plugin)| {
                plugin
                    .resolve(device)
                    .into_iter()
                    .map(move |provider| (index, provider))
            })
            .collect();

        ranked.sort_by(|(index_a, a), (index_b, b)| {
            b.priority()
                .cmp(&a.priority())
                .then(index_a.cmp(index_b))
                .then_with(|| a.package().cmp(b.package()))
        });

        ranked.into_iter().map(|(_, provider)| provider).collect()
    }

    /// Every device matching `mask` that has at least one provider
    pub fn get_all_providers(&self, mask: DeviceType) -> Vec<(&Device, Vec<Provider>)> {
        self.get_devices(mask)
            .into_iter()
            .map(|device| (device, self.get_providers(device)))
            .filter(|(_, providers)| !providers.is_empty())
            .collect()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests;
