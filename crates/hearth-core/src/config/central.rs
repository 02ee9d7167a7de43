//! The central registry of hearths and devices

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hearth_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// A storage device that can hold hearth sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub mountpoint: PathBuf,
}

/// A tracked hearth: one logical directory kept in several places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearthInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Key into `sources` of the location treated as master
    pub primary_source: String,
    pub sources: BTreeMap<String, PathBuf>,
}

impl HearthInfo {
    /// Source paths with the primary first, then the rest by source name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSource`] if `primary_source` names no source.
    pub fn locations(&self) -> Result<Vec<PathBuf>> {
        let primary = self
            .sources
            .get(&self.primary_source)
            .ok_or_else(|| Error::UnknownSource {
                hearth: self.name.clone(),
                name: self.primary_source.clone(),
            })?;

        let mut locations = vec![primary.clone()];
        locations.extend(
            self.sources
                .iter()
                .filter(|(name, _)| **name != self.primary_source)
                .map(|(_, path)| path.clone()),
        );
        Ok(locations)
    }
}

/// Persisted registry, stored as TOML (or JSON/YAML by extension).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Central {
    #[serde(skip)]
    path: PathBuf,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
    #[serde(default)]
    pub devices: BTreeMap<String, Device>,
    #[serde(default)]
    pub hearths: BTreeMap<String, HearthInfo>,
}

impl Central {
    pub const DEFAULT_FILE_NAME: &'static str = ".hearth-central.toml";

    /// `~/.hearth-central.toml`, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(Self::DEFAULT_FILE_NAME))
    }

    /// An empty registry that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_modified: Utc::now(),
            last_synced: None,
            devices: BTreeMap::new(),
            hearths: BTreeMap::new(),
        }
    }

    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] when nothing exists at `path`; parse errors
    /// come through as [`Error::Fs`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut central: Central = ConfigStore::new().load(path)?;
        central.path = path.to_path_buf();
        debug!(
            path = %path.display(),
            hearths = central.hearths.len(),
            devices = central.devices.len(),
            "Loaded central registry"
        );
        Ok(central)
    }

    /// Write the registry back and bump `last_modified`.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] if the file is gone and `create_if_missing`
    /// is false.
    pub fn save(&mut self, create_if_missing: bool) -> Result<()> {
        if !create_if_missing && !self.path.is_file() {
            return Err(Error::ConfigNotFound {
                path: self.path.clone(),
            });
        }
        self.last_modified = Utc::now();
        ConfigStore::new().save(&self.path, self)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    ///
    /// [`Error::UnknownHearth`] if nothing is tracked under `name`.
    pub fn hearth(&self, name: &str) -> Result<&HearthInfo> {
        self.hearths.get(name).ok_or_else(|| Error::UnknownHearth {
            name: name.to_string(),
        })
    }

    /// Register `info`, replacing and returning any hearth of the same name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSource`] if the primary source is not among the
    /// sources.
    pub fn track(&mut self, info: HearthInfo) -> Result<Option<HearthInfo>> {
        info.locations()?;
        Ok(self.hearths.insert(info.name.clone(), info))
    }

    pub fn add_device(&mut self, device: Device) {
        self.devices.insert(device.name.clone(), device);
    }

    pub fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.last_synced = Some(at);
    }
}
