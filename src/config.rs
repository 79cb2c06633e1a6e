//! User configuration (`~/.contribgrid/config.json`)

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{GridError, LevelThresholds, Result};

/// Directory under the home directory holding config and logs
const APP_DIR: &str = ".contribgrid";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Minimum counts for levels 1-4
    pub thresholds: LevelThresholds,
    /// Level palette overrides (hex like "#7DC28E" or color names)
    pub colors: ColorOverrides,
    /// Terminal color scheme
    pub theme: ThemeChoice,
    /// Square drawing strategy
    pub renderer: RendererChoice,
    pub show_header: bool,
    pub show_legend: bool,
    /// Columns per square
    pub square_width: u16,
    /// Blank columns between week columns
    pub square_spacing: u16,
    /// Entry files or glob patterns used when none are given on the command line
    pub data: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: LevelThresholds::default(),
            colors: ColorOverrides::default(),
            theme: ThemeChoice::Auto,
            renderer: RendererChoice::Default,
            show_header: true,
            show_legend: true,
            square_width: 2,
            square_spacing: 1,
            data: Vec::new(),
        }
    }
}

/// Per-level color overrides; unset levels keep the theme default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorOverrides {
    pub padding: Option<String>,
    pub empty: Option<String>,
    pub level1: Option<String>,
    pub level2: Option<String>,
    pub level3: Option<String>,
    pub level4: Option<String>,
    pub selected_border: Option<String>,
}

/// Terminal color scheme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Square drawing strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererChoice {
    /// Colored squares
    #[default]
    Default,
    /// Distinct shade glyph per level, readable without color
    Blocks,
}

impl Config {
    /// Load configuration.
    ///
    /// With `path`, the file must exist. Without it, the default location is
    /// used and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                return Err(GridError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::from_json(&content)
            .map_err(|e| GridError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration JSON
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Save configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| GridError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// `~/.contribgrid`
    pub fn app_dir() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(APP_DIR))
    }

    /// `~/.contribgrid/config.json`
    pub fn default_path() -> Option<PathBuf> {
        Self::app_dir().map(|d| d.join("config.json"))
    }

    /// `~/.contribgrid/contribgrid.log`, where the TUI writes logs
    pub fn log_path() -> Option<PathBuf> {
        Self::app_dir().map(|d| d.join("contribgrid.log"))
    }
}
