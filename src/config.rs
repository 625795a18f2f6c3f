use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
    pub callout: CalloutConfig,
    pub numbered: NumberedConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub system: bool,
}

impl FontConfig {
    /// The configured body font, if one was named.
    pub fn family(&self) -> Option<&str> {
        let family = self.family.trim();
        (!family.is_empty()).then_some(family)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalloutConfig {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: String,
}

impl Default for CalloutConfig {
    fn default() -> Self {
        Self {
            fill: "#eef4ff".to_string(),
            stroke: "#3b82f6".to_string(),
            stroke_width: "3pt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NumberedConfig {
    pub badge: String,
}

impl Default for NumberedConfig {
    fn default() -> Self {
        Self {
            badge: "#dbeafe".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub spacer: String,
    pub keep_list_together: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacer: "0.4em".to_string(),
            keep_list_together: 5,
        }
    }
}

impl Config {
    /// The config embedded in the binary from `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|_| Self::compiled_default()),
            Err(_) => Self::compiled_default(),
        }
    }

    /// Load config from a TOML file, reporting unreadable or invalid files.
    pub fn try_load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
