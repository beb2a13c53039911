//! Application settings management
//!
//! Stores non-sensitive configuration in a plain JSON file. The publishing
//! token never lives here; it comes from the command line or environment.

use directories::ProjectDirs;
use field_schema::{DEFAULT_EXAMPLE_SECTIONS, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DocsError, DocsResult};

/// Notion publishing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotionSettings {
    /// Database that receives generated pages
    pub database_id: Option<String>,
    /// API base URL
    pub api_base_url: String,
    /// Value of the `Notion-Version` header
    pub api_version: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            database_id: None,
            api_base_url: "https://api.notion.com".to_string(),
            api_version: "2022-06-28".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Field parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserSettings {
    /// Maximum field nesting depth
    pub max_depth: usize,
    /// Sections that get a synthesized example payload
    pub example_sections: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            example_sections: DEFAULT_EXAMPLE_SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Document rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSettings {
    /// Maximum characters per code block segment
    pub code_chunk_size: usize,
    /// Page title used when none is given
    pub default_title: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            code_chunk_size: 2000,
            default_title: "JSON Schema Documentation".to_string(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    pub notion: NotionSettings,
    pub parser: ParserSettings,
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            notion: NotionSettings::default(),
            parser: ParserSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from the given file, falling back to defaults when it
    /// does not exist
    pub fn load(settings_file: PathBuf) -> DocsResult<Self> {
        let settings = Self::load_from_file(&settings_file)?;
        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Load settings from the platform config directory
    pub fn load_default() -> DocsResult<Self> {
        Self::load(Self::default_path()?)
    }

    /// Default settings file location
    pub fn default_path() -> DocsResult<PathBuf> {
        ProjectDirs::from("com", "symbia-labs", "schema-docs")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| {
                DocsError::MissingConfig("Could not determine config directory".to_string())
            })
    }

    fn load_from_file(path: &Path) -> DocsResult<Settings> {
        if !path.exists() {
            debug!("No settings file found at {:?}, using defaults", path);
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> DocsResult<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(dir) = self.settings_file.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_file
    }
}
