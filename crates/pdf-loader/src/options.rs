use crate::types::{LoaderError, Result};

/// Display width of the page column in pixels
pub const DEFAULT_WIDTH: f32 = 800.0;

/// Zoom factor applied when rasterising each page
pub const DEFAULT_SCALE: f32 = 1.5;

/// Presentation options for [`crate::PdfViewer`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewerOptions {
    pub width: f32,
    pub scale: f32,
    /// Styling hook; the GUI uses it to salt the widget ids of the page column
    pub class_name: Option<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            scale: DEFAULT_SCALE,
            class_name: None,
        }
    }
}

impl ViewerOptions {
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LoaderError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LoaderError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(LoaderError::Config(format!(
                "Width must be a positive number, got {}",
                self.width
            )));
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(LoaderError::Config(format!(
                "Scale must be a positive number, got {}",
                self.scale
            )));
        }

        Ok(())
    }
}
