//! Shell configuration.
//!
//! Defaults cover a standard page. A page can override any field with an
//! inline JSON block:
//!
//! ```html
//! <script type="application/json" id="shell-config">{"redraw_interval_ms": 50}</script>
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::canvas::DEFAULT_REDRAW_INTERVAL_MS;
use crate::dom::document;
use crate::theme::ThemeKind;

pub const CONFIG_ELEMENT_ID: &str = "shell-config";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid shell config: {0}")]
    Parse(String),
    #[error("redraw_interval_ms must be greater than zero")]
    ZeroRedrawInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level(self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Warn => log::Level::Warn,
            Self::Info => log::Level::Info,
            Self::Debug => log::Level::Debug,
            Self::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Element that receives forwarded backend events
    pub graph_state_holder_id: String,
    /// Period of the idle redraw notification per canvas
    pub redraw_interval_ms: u32,
    /// Checkboxes mirroring the dark-theme state
    pub theme_toggle_selector: String,
    /// Theme used when neither the host nor the cache reports one
    pub default_theme: ThemeKind,
    pub log_level: LogLevel,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            graph_state_holder_id: "graph_state_holder".to_string(),
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
            theme_toggle_selector: ".theme-switch input".to_string(),
            default_theme: ThemeKind::Dark,
            log_level: LogLevel::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.redraw_interval_ms == 0 {
            return Err(ConfigError::ZeroRedrawInterval);
        }
        Ok(config)
    }

    /// Read the inline config block, falling back to defaults when it is
    /// missing or invalid.
    pub fn load() -> Self {
        let Some(text) = document()
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|element| element.text_content())
        else {
            return Self::default();
        };

        match Self::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }
}

static SHELL_CONFIG: OnceLock<ShellConfig> = OnceLock::new();

/// Process-wide config, loaded on first use.
pub fn shell_config() -> &'static ShellConfig {
    SHELL_CONFIG.get_or_init(ShellConfig::load)
}
