use log::LevelFilter;
use pdf_loader::{FileUpload, LoaderError, Result, ViewerOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Application settings, read from an optional JSON file and overridden by
/// command-line flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub viewer: ViewerOptions,
    /// Directory containing the pdfium shared library
    pub pdfium_dir: Option<PathBuf>,
    pub log_level: String,
    pub max_log_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewer: ViewerOptions::default(),
            pdfium_dir: None,
            log_level: "info".to_string(),
            max_log_entries: 500,
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub width: Option<f32>,
    pub scale: Option<f32>,
    pub pdfium_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LoaderError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load `path` if given, apply overrides and validate
    pub async fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(width) = overrides.width {
            self.viewer.width = width;
        }
        if let Some(scale) = overrides.scale {
            self.viewer.scale = scale;
        }
        if overrides.pdfium_dir.is_some() {
            self.pdfium_dir = overrides.pdfium_dir;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.viewer.validate()?;
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| LoaderError::Config(format!("Unknown log level: {}", self.log_level)))
    }
}

/// A source named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialSource {
    Url(String),
    File(FileUpload),
}

impl InitialSource {
    pub fn from_arg(arg: &str) -> Self {
        let lower = arg.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            InitialSource::Url(arg.to_string())
        } else {
            InitialSource::File(FileUpload::from_path(arg))
        }
    }
}
