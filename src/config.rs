use cardpress_layout::InteractionConfig;
use cardpress_traits::CaptureOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CARDPRESS_CONFIG";
const ENV_PREFIX: &str = "CARDPRESS";
const DEFAULT_CONFIG_NAME: &str = "cardpress";

/// Engine tunables. Every field has a default, so an empty config is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Center-snap distance in points.
    pub snap_threshold: f32,
    /// Upper bound of the preview scale factor.
    pub scale_cap: f32,
    /// Space kept free around the page in the preview viewport, in pixels.
    pub viewport_padding: f32,
    /// Raster export supersampling factor.
    pub supersample: f32,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    pub pdf_filename: String,
    pub archive_filename: String,
    /// Path or URL of the font embedded into PDFs and used by the preview.
    pub font: Option<String>,
    /// Ask before starting a raster batch.
    pub confirm_raster_batches: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 10.0,
            scale_cap: 1.0,
            viewport_padding: 40.0,
            supersample: 2.0,
            line_height: 1.4,
            pdf_filename: "wordbook.pdf".to_string(),
            archive_filename: "wordbook_images.zip".to_string(),
            font: None,
            confirm_raster_batches: true,
        }
    }
}

impl EngineConfig {
    /// Loads defaults, then the file named by `CARDPRESS_CONFIG` (or
    /// `cardpress.toml` in the working directory, if present), then
    /// `CARDPRESS_*` environment variables (`__` separates nested keys).
    pub fn load() -> Result<Self, config::ConfigError> {
        let explicit = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self::load_from(explicit.as_deref(), true)
    }

    /// Loads from an optional explicit file, optionally layering the environment on top.
    pub fn load_from(file: Option<&Path>, with_env: bool) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = match file {
            Some(path) => {
                log::debug!("Reading configuration from {}", path.display());
                builder.add_source(config::File::from(path))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let positive = [
            ("scale_cap", self.scale_cap),
            ("supersample", self.supersample),
            ("line_height", self.line_height),
        ];
        for (key, value) in positive {
            if !(value > 0.0) {
                return Err(config::ConfigError::Message(format!(
                    "{} must be greater than zero, got {}",
                    key, value
                )));
            }
        }
        if self.snap_threshold < 0.0 || self.viewport_padding < 0.0 {
            return Err(config::ConfigError::Message(
                "snap_threshold and viewport_padding cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn interaction(&self) -> InteractionConfig {
        InteractionConfig {
            snap_threshold: self.snap_threshold,
        }
    }

    /// Capture settings for raster export: supersampled, transparent, overlays hidden.
    pub fn export_capture(&self) -> CaptureOptions {
        CaptureOptions {
            scale: self.supersample,
            transparent_background: true,
            hide_overlays: true,
        }
    }
}
