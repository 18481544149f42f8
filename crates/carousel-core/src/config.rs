use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Behaviour of the carousel controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Rotate slides on a timer (wraps back to the first slide)
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    /// Auto-advance period in milliseconds
    #[serde(default = "default_auto_advance_interval")]
    pub auto_advance_interval_ms: u64,
    /// Horizontal distance a swipe must exceed, in pixels
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold_px: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_advance: default_true(),
            auto_advance_interval_ms: default_auto_advance_interval(),
            swipe_threshold_px: default_swipe_threshold(),
        }
    }
}

impl CarouselConfig {
    pub fn auto_advance_interval(&self) -> Duration {
        Duration::from_millis(self.auto_advance_interval_ms)
    }
}

/// Row markers recognised by the slide extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// First-cell text of the "next" navigation row
    #[serde(default = "default_next_marker")]
    pub next_marker: String,
    /// First-cell text of the "previous" navigation row
    #[serde(default = "default_previous_marker")]
    pub previous_marker: String,
    /// Any first cell containing this caption is a header row
    #[serde(default = "default_header_caption")]
    pub header_caption: String,
    /// Tag of the media element picked from the first cell
    #[serde(default = "default_media_tag")]
    pub media_tag: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            next_marker: default_next_marker(),
            previous_marker: default_previous_marker(),
            header_caption: default_header_caption(),
            media_tag: default_media_tag(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Pixels per terminal column, used to turn mouse drags into swipes
    #[serde(default = "default_cell_width")]
    pub cell_width_px: u16,
    /// Show the status bar
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            cell_width_px: default_cell_width(),
            show_status_bar: default_true(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "h", "<C-c>" (Ctrl+c), "<Left>", "<Esc>"
///
/// The arrow keys always map to previous/next in addition to these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Show the previous slide
    #[serde(default = "default_key_previous")]
    pub previous: String,
    /// Show the next slide
    #[serde(default = "default_key_next")]
    pub next: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            previous: default_key_previous(),
            next: default_key_next(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_previous() -> String { "h".to_string() }
fn default_key_next() -> String { "l".to_string() }

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_auto_advance_interval() -> u64 {
    5000
}

fn default_swipe_threshold() -> f64 {
    50.0
}

fn default_next_marker() -> String {
    ">>".to_string()
}

fn default_previous_marker() -> String {
    "<<".to_string()
}

fn default_header_caption() -> String {
    "Carousel".to_string()
}

fn default_media_tag() -> String {
    "img".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

fn default_cell_width() -> u16 {
    8
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(expand_tilde(path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.carousel.auto_advance_interval_ms == 0 {
            return Err(crate::Error::Config(
                "carousel.auto_advance_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !self.carousel.swipe_threshold_px.is_finite() || self.carousel.swipe_threshold_px < 0.0 {
            return Err(crate::Error::Config(
                "carousel.swipe_threshold_px must be a non-negative number".to_string(),
            ));
        }
        if self.ui.cell_width_px == 0 {
            return Err(crate::Error::Config(
                "ui.cell_width_px must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/carousel/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("carousel")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.carousel.auto_advance);
        assert_eq!(config.carousel.auto_advance_interval(), Duration::from_millis(5000));
        assert_eq!(config.carousel.swipe_threshold_px, 50.0);
        assert_eq!(config.extract.next_marker, ">>");
        assert_eq!(config.extract.previous_marker, "<<");
        assert_eq!(config.extract.header_caption, "Carousel");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [carousel]
            auto_advance_interval_ms = 3000

            [keymap]
            next = "n"
            "#,
        )
        .unwrap();

        assert_eq!(config.carousel.auto_advance_interval_ms, 3000);
        assert!(config.carousel.auto_advance);
        assert_eq!(config.keymap.next, "n");
        assert_eq!(config.keymap.previous, "h");
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = AppConfig::from_toml("[carousel]\nauto_advance_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
