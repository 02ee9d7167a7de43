//! Format-agnostic loading and saving of settings files

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Loads and saves any serde type as TOML, JSON or YAML.
///
/// The format comes from the file extension. Saves are atomic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a value from `path`.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = Format::detect(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let parsed = match format {
            Format::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.label().into(),
            message,
        })
    }

    /// Save a value to `path`, creating parent directories as needed.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let format = Format::detect(path)?;

        let content = match format {
            Format::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
        .map_err(|message| Error::ConfigSerialize {
            path: path.to_path_buf(),
            format: format.label().into(),
            message,
        })?;

        io::write_atomic(path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        sources: Vec<String>,
    }

    fn sample() -> Sample {
        Sample {
            name: "music".into(),
            sources: vec!["/mnt/a".into(), "/mnt/b".into()],
        }
    }

    #[test]
    fn saves_and_loads_each_format() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new();
        for file in ["c.toml", "c.json", "c.yaml"] {
            let path = dir.path().join(file);
            store.save(&path, &sample()).unwrap();
            let loaded: Sample = store.load(&path).unwrap();
            assert_eq!(loaded, sample());
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let err = ConfigStore::new()
            .save(&dir.path().join("c.ini"), &sample())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn parse_error_names_the_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "name = [").unwrap();

        let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
