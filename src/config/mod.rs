//! Application Configuration
//!
//! User settings stored in TOML format. Every section has defaults, so a
//! missing file or a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR engine settings
    pub engine: EngineConfig,
    /// Preprocessing settings
    pub preprocessing: PreprocessingConfig,
    /// GUI preview settings
    pub preview: PreviewConfig,
    /// Test image generator settings
    pub samples: SampleConfig,
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tesseract executable (bare name is looked up on PATH)
    pub tesseract_path: PathBuf,
    /// Override for the tessdata directory
    pub tessdata_dir: Option<PathBuf>,
    /// Tesseract page segmentation mode (--psm)
    pub page_segmentation_mode: Option<u8>,
    /// Language used when none is given
    pub default_language: String,
    /// Languages offered in the GUI
    pub languages: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tesseract_path: PathBuf::from("tesseract"),
            tessdata_dir: None,
            page_segmentation_mode: None,
            default_language: "eng".to_string(),
            languages: ["eng", "deu", "fra", "spa"].map(String::from).to_vec(),
        }
    }
}

/// Preprocessing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Run grayscale/blur/Otsu before OCR by default
    pub enabled: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// GUI preview settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Maximum preview width in pixels
    pub max_width: u32,
    /// Maximum preview height in pixels
    pub max_height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: 500,
            max_height: 400,
        }
    }
}

/// Test image generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Font file; common system fonts are tried when unset
    pub font_path: Option<PathBuf>,
    /// Font size in pixels
    pub font_size: f32,
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Standard deviation of the added noise
    pub noise_sigma: f64,
    /// Sigma of the blur applied after the noise
    pub blur_sigma: f32,
    /// Noise seed
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: 32.0,
            width: 800,
            height: 400,
            noise_sigma: 20.0,
            blur_sigma: 0.8,
            seed: 42,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load from `path` if it exists, otherwise use defaults
pub fn load_or_default(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let config = load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    } else {
        info!("No config at {:?}, using defaults", path);
        Ok(AppConfig::default())
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "textgrab", "TextGrab")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Default location of `config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.engine.tesseract_path, PathBuf::from("tesseract"));
        assert!(config.engine.tessdata_dir.is_none());
        assert_eq!(config.engine.default_language, "eng");
        assert_eq!(config.engine.languages, vec!["eng", "deu", "fra", "spa"]);

        assert!(config.preprocessing.enabled);

        assert_eq!(config.preview.max_width, 500);
        assert_eq!(config.preview.max_height, 400);

        assert!(config.samples.font_path.is_none());
        assert!((config.samples.font_size - 32.0).abs() < 0.01);
        assert_eq!((config.samples.width, config.samples.height), (800, 400));
        assert!((config.samples.noise_sigma - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.engine.tesseract_path = PathBuf::from("C:\\Tesseract-OCR\\tesseract.exe");
        config.engine.page_segmentation_mode = Some(6);
        config.preprocessing.enabled = false;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            parsed.engine.tesseract_path,
            PathBuf::from("C:\\Tesseract-OCR\\tesseract.exe")
        );
        assert_eq!(parsed.engine.page_segmentation_mode, Some(6));
        assert!(!parsed.preprocessing.enabled);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [engine]
            default_language = "deu"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.engine.default_language, "deu");
        assert_eq!(parsed.engine.tesseract_path, PathBuf::from("tesseract"));
        assert!(parsed.preprocessing.enabled);
        assert_eq!(parsed.preview.max_width, 500);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.samples.seed = 7;
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.samples.seed, 7);
        assert_eq!(loaded.engine.languages, config.engine.languages);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.engine.default_language, "eng");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        assert!(load_config(temp_file.path()).is_err());
        assert!(load_or_default(temp_file.path()).is_err());
    }
}
