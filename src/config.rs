use crate::error::{Result, ResultExt as _, StocklensError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TOP_MATERIALS: usize = 5;
pub const DEFAULT_TOP_LOCATIONS: usize = 10;

/// Persistent dashboard settings, stored as JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Inventory results workbook (primary table)
    pub inventory_path: PathBuf,
    /// Consumption workbook (secondary table)
    pub consumption_path: PathBuf,
    /// Worksheet of the inventory workbook; the first sheet when unset
    pub inventory_sheet: Option<String>,
    /// Worksheet of the consumption workbook; the first sheet when unset
    pub consumption_sheet: Option<String>,
    pub top_materials: usize,
    pub top_locations: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from("data/updated_inventory_results.xlsx"),
            consumption_path: PathBuf::from("data/consumption.xlsx"),
            inventory_sheet: None,
            consumption_sheet: None,
            top_materials: DEFAULT_TOP_MATERIALS,
            top_locations: DEFAULT_TOP_LOCATIONS,
        }
    }
}

impl AppConfig {
    /// Ranking limits, validated.
    ///
    /// # Errors
    ///
    /// Returns [`StocklensError::Config`] when either limit is zero.
    pub fn limits(&self) -> Result<Limits> {
        Limits::new(self.top_materials, self.top_locations)
    }

    pub fn sources(&self) -> DataSources {
        DataSources {
            inventory: self.inventory_path.clone(),
            consumption: self.consumption_path.clone(),
            inventory_sheet: self.inventory_sheet.clone(),
            consumption_sheet: self.consumption_sheet.clone(),
        }
    }
}

/// How many bars each chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub top_materials: usize,
    pub top_locations: usize,
}

impl Limits {
    /// # Errors
    ///
    /// Returns [`StocklensError::Config`] when either limit is zero.
    pub fn new(top_materials: usize, top_locations: usize) -> Result<Self> {
        if top_materials == 0 || top_locations == 0 {
            return Err(StocklensError::Config(format!(
                "chart limits must be positive (top_materials={top_materials}, top_locations={top_locations})"
            )));
        }
        Ok(Self {
            top_materials,
            top_locations,
        })
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            top_materials: DEFAULT_TOP_MATERIALS,
            top_locations: DEFAULT_TOP_LOCATIONS,
        }
    }
}

/// Where the two tables are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub inventory: PathBuf,
    pub consumption: PathBuf,
    pub inventory_sheet: Option<String>,
    pub consumption_sheet: Option<String>,
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stocklens")
        .join("config.json")
}

/// Loads the config from the default location, falling back to defaults when
/// the file is absent or unreadable.
pub fn load_app_config() -> AppConfig {
    let path = get_config_path();
    if path.exists() {
        match load_config_from(&path) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Ignoring config at {}: {e}", path.display()),
        }
    }
    AppConfig::default()
}

/// Loads a config file that the user asked for explicitly.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid JSON.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// # Errors
///
/// Returns error if the parent directory or file cannot be written.
pub fn save_app_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
