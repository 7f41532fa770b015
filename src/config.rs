use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    overlay::{OverlayLayout, Variant, VariantRegistry},
    text::FontResolver,
};

/// Main configuration for brand-compositor
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra or replacement overlay variants
    pub variants: Vec<Variant>,

    /// Filesystem locations
    pub paths: PathsConfig,

    /// Overlay geometry shared by every variant
    pub overlay: OverlayLayout,

    /// Output encoding settings
    pub output: OutputConfig,

    /// Image-model API settings
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.overlay.validate()?;
        self.output.validate()?;
        self.api.validate()?;
        Ok(())
    }

    /// Font resolver over the configured font directory and system fallbacks
    pub fn font_resolver(&self) -> FontResolver {
        FontResolver::new(&self.paths.font_dir, self.paths.system_fonts.clone())
    }

    /// Built-in variants with the configured ones registered on top
    pub fn variant_registry(&self) -> VariantRegistry {
        let mut registry = VariantRegistry::new();
        for variant in &self.variants {
            registry.register(variant.clone());
        }
        registry
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory searched first for named fonts
    pub font_dir: PathBuf,

    /// Fonts tried in order when a named font is missing
    pub system_fonts: Vec<PathBuf>,

    /// Logo pasted onto every overlay
    pub logo: PathBuf,

    /// Directory holding variant sources and outputs
    pub marketing_dir: PathBuf,

    /// Directory generated images are written to
    pub images_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from("fonts"),
            system_fonts: default_system_fonts(),
            logo: PathBuf::from("assets/daily-bag-icon-transparent.png"),
            marketing_dir: PathBuf::from("."),
            images_dir: PathBuf::from("images"),
        }
    }
}

fn default_system_fonts() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Output encoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::InvalidValue {
                key: "output.quality".to_string(),
                value: self.quality.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Image-model API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,

    /// Sent as the `HTTP-Referer` header on generation requests
    pub referer: String,

    /// Environment variable holding the bearer credential
    pub api_key_env: String,

    /// Generation models, tried in order until one returns an image
    pub models: Vec<String>,

    /// Substrings that mark a listed model as image-capable
    pub image_keywords: Vec<String>,

    pub request_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            referer: "https://chore-checklist.app".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            models: vec![
                "google/gemini-2.5-flash-image".to_string(),
                "google/gemini-3-pro-image-preview".to_string(),
            ],
            image_keywords: ["image", "flux", "imagen", "recraft", "dall", "stable", "sdxl", "midjourney"]
                .into_iter()
                .map(String::from)
                .collect(),
            request_timeout_secs: 180,
            download_timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "api.models".to_string(),
                value: "[]".to_string(),
            }
            .into());
        }

        if self.request_timeout_secs == 0 || self.download_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "api.timeouts".to_string(),
                value: format!("{}/{}", self.request_timeout_secs, self.download_timeout_secs),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("brand.toml");

        let mut original = Config::default();
        original.overlay.band_height = 120;
        original.variants.push(Variant {
            name: "holiday".to_string(),
            headline: "SLEIGH YOUR CHORES".to_string(),
            subtitle: "Seasonal challenges".to_string(),
            source: PathBuf::from("holiday.png"),
            output: PathBuf::from("holiday_branded.jpg"),
            logo: None,
        });

        original.save_to_file(&file_path).unwrap();
        let loaded = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded.overlay, original.overlay);
        assert_eq!(loaded.variants, original.variants);
        assert_eq!(loaded.api.models, original.api.models);
        assert_eq!(loaded.paths.font_dir, original.paths.font_dir);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            font_dir = "/opt/brand/fonts"

            [overlay]
            band_opacity = 0.75
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.font_dir, PathBuf::from("/opt/brand/fonts"));
        assert_eq!(config.overlay.band_opacity, 0.75);
        assert_eq!(config.overlay.band_height, 140);
        assert_eq!(config.output.quality, 95);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/no/such/brand.toml").unwrap_err();
        assert!(matches!(
            err,
            crate::error::CompositorError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_quality() {
        let mut config = Config::default();
        config.output.quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_list_rejected() {
        let mut config = Config::default();
        config.api.models.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_variant_registry_merges_config() {
        let mut config = Config::default();
        let mut rewards = config.variant_registry().get("rewards").unwrap().clone();
        rewards.subtitle = "Cash out weekly".to_string();
        config.variants.push(rewards);

        let registry = config.variant_registry();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("rewards").unwrap().subtitle, "Cash out weekly");
    }
}
