//! Fixed tuning constants and the page-level debug setting.

use serde::{Deserialize, Serialize};

/// How long a stationary touch must be held before it becomes a context click.
pub const LONG_PRESS_MS: u32 = 1000;
/// Scales finger-separation change (as a fraction of screen width) into wheel delta.
pub const ZOOM_SENSITIVITY: f64 = 10_000.0;
/// `id` of the canvas that receives all synthesized events.
pub const CANVAS_ID: &str = "canvas";
/// localStorage key holding the console log level ("error" .. "trace").
pub const LOG_LEVEL_KEY: &str = "tmb_log_level";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    pub long_press_ms: u32,
    pub zoom_sensitivity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            zoom_sensitivity: ZOOM_SENSITIVITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub canvas_id: String,
    pub gesture: GestureConfig,
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            canvas_id: CANVAS_ID.to_string(),
            gesture: GestureConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Defaults, with the log level overridden from localStorage when the page
    /// has one set.
    pub fn from_page() -> Self {
        let mut config = Self::default();
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(v)) = store.get_item(LOG_LEVEL_KEY) {
                    config.log_level = v;
                }
            }
        }
        config
    }

    /// Parsed log level; unknown strings fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}
