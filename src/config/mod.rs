use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::form::{clamp_size, Color, FormState, SIZE_DEFAULT};
use crate::qr::export::DEFAULT_FILE_NAME;
use crate::qr::{ErrorCorrection, RenderOptions, MAX_MARGIN};

/// Optional palette overrides for the UI, as hex colors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial foreground (module) color
    #[serde(default = "default_fg")]
    pub fg_color: Color,

    /// Initial background color
    #[serde(default = "default_bg")]
    pub bg_color: Color,

    /// Initial size in pixels (clamped to 100..=400)
    #[serde(default = "default_size")]
    pub size: u32,

    #[serde(default)]
    pub error_correction: ErrorCorrection,

    /// Quiet zone in modules, capped at `MAX_MARGIN`
    #[serde(default)]
    pub margin: u32,

    /// Where downloads go (falls back to the user's download dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Show a desktop notification after a download
    #[serde(default)]
    pub notifications: bool,

    /// Play the entrance effect on startup
    #[serde(default = "default_true")]
    pub animation: bool,

    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_fg() -> Color {
    Color::BLACK
}

fn default_bg() -> Color {
    Color::WHITE
}

fn default_size() -> u32 {
    SIZE_DEFAULT
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fg_color: default_fg(),
            bg_color: default_bg(),
            size: default_size(),
            error_correction: ErrorCorrection::default(),
            margin: 0,
            download_dir: None,
            file_name: default_file_name(),
            notifications: false,
            animation: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("qrsmith");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep the broken file for the user to fix
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::debug!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.size = clamp_size(config.size);
        config.margin = config.margin.min(MAX_MARGIN);
        if config.file_name.trim().is_empty() {
            config.file_name = default_file_name();
        }
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Form the app starts with
    pub fn initial_form(&self) -> FormState {
        FormState {
            text: String::new(),
            fg_color: self.fg_color,
            bg_color: self.bg_color,
            size: clamp_size(self.size),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            error_correction: self.error_correction,
            margin: self.margin,
        }
    }

    /// Configured download dir, else the user's download dir, else cwd
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            fg_color: Color::from_hex("#112233").unwrap(),
            bg_color: Color::from_hex("#fafafa").unwrap(),
            size: 320,
            error_correction: ErrorCorrection::Quartile,
            margin: 2,
            download_dir: Some(PathBuf::from("/tmp/codes")),
            file_name: "code.png".to_string(),
            notifications: true,
            animation: false,
            theme: ThemeConfig {
                accent: Some(Color::rgb(255, 193, 7)),
                ..ThemeConfig::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        assert!(serialized.contains("fg_color = \"#112233\""));
        assert!(serialized.contains("error_correction = \"quartile\""));

        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.animation);
        assert_eq!(config.file_name, "qrcode.png");
    }

    #[test]
    fn test_parse_clamps_and_fills() {
        let config = AppConfig::parse("size = 5000\nfile_name = \"  \"\n").unwrap();
        assert_eq!(config.size, 400);
        assert_eq!(config.file_name, "qrcode.png");

        let form = config.initial_form();
        assert!(form.text.is_empty());
        assert_eq!(form.size, 400);
    }

    #[test]
    fn test_huge_margin_is_clamped() {
        let config = AppConfig::parse("margin = 4294967295\n").unwrap();
        assert_eq!(config.margin, MAX_MARGIN);

        let mut form = config.initial_form();
        form.set_text("hi");
        let surface = crate::qr::render(&form, &config.render_options()).unwrap().unwrap();
        assert_eq!(surface.width(), form.size);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        assert!(AppConfig::parse("fg_color = \"#12\"").is_err());
        assert!(AppConfig::parse("[theme]\naccent = \"blue\"").is_err());
    }

    #[test]
    fn test_download_dir_prefers_config() {
        let config = AppConfig {
            download_dir: Some(PathBuf::from("/srv/out")),
            ..AppConfig::default()
        };
        assert_eq!(config.download_dir(), PathBuf::from("/srv/out"));
    }
}
