//! User settings and preferences for Markpane
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// The two color themes the editor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// View Mode Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes are visible.
///
/// - `Split`: editor on the left, preview on the right
/// - `Editor`: source editor only
/// - `Preview`: rendered preview only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Split,
    Editor,
    Preview,
}

impl ViewMode {
    /// Cycle Split -> Editor -> Preview -> Split.
    pub fn cycle(&self) -> Self {
        match self {
            ViewMode::Split => ViewMode::Editor,
            ViewMode::Editor => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Split,
        }
    }

    /// Get a display label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Split => "Split",
            ViewMode::Editor => "Editor",
            ViewMode::Preview => "Preview",
        }
    }

    pub fn shows_editor(&self) -> bool {
        matches!(self, ViewMode::Split | ViewMode::Editor)
    }

    pub fn shows_preview(&self) -> bool {
        matches!(self, ViewMode::Split | ViewMode::Preview)
    }

    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Split, ViewMode::Editor, ViewMode::Preview]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light or dark)
    pub theme: Theme,

    /// Which panes are shown
    pub view_mode: ViewMode,

    /// Whether to show line numbers in the editor
    pub show_line_numbers: bool,

    /// Font size for the editor and preview body text (in points)
    pub font_size: f32,

    /// Whether to enable word wrap in the editor
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,

    /// Fraction of the window width given to the editor pane
    pub split_ratio: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Sync Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether the preview follows the editor (and vice versa)
    pub sync_scroll_enabled: bool,

    /// Fallback settle window for a programmatic scroll, in milliseconds.
    /// Only used when the pane never reports reaching the applied offset.
    pub sync_settle_timeout_ms: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Mode Observation
    // ─────────────────────────────────────────────────────────────────────────
    /// Polling interval for mode sources that cannot push changes.
    /// This is the worst-case staleness of the mode label.
    pub mode_poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            show_line_numbers: true,
            font_size: 14.0,
            word_wrap: true,

            // Layout
            window_size: WindowSize::default(),
            split_ratio: 0.5,

            // Sync Scrolling
            sync_scroll_enabled: true,
            sync_settle_timeout_ms: 100,

            // Mode Observation
            mode_poll_interval_ms: 100,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Narrowest share of the window either pane may take.
    pub const MIN_SPLIT_RATIO: f32 = 0.15;
    /// Widest share of the window the editor pane may take.
    pub const MAX_SPLIT_RATIO: f32 = 0.85;
    /// Settle timeout bounds (milliseconds).
    pub const MIN_SETTLE_TIMEOUT_MS: u64 = 16;
    pub const MAX_SETTLE_TIMEOUT_MS: u64 = 1000;
    /// Mode polling bounds (milliseconds).
    pub const MIN_MODE_POLL_MS: u64 = 16;
    pub const MAX_MODE_POLL_MS: u64 = 2000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.font_size = if self.font_size.is_finite() {
            self.font_size
                .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE)
        } else {
            Settings::default().font_size
        };

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.split_ratio = if self.split_ratio.is_finite() {
            self.split_ratio
                .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO)
        } else {
            0.5
        };

        self.sync_settle_timeout_ms = self
            .sync_settle_timeout_ms
            .clamp(Self::MIN_SETTLE_TIMEOUT_MS, Self::MAX_SETTLE_TIMEOUT_MS);

        self.mode_poll_interval_ms = self
            .mode_poll_interval_ms
            .clamp(Self::MIN_MODE_POLL_MS, Self::MAX_MODE_POLL_MS);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.view_mode, ViewMode::Split);
        assert!(settings.show_line_numbers);
        assert!(settings.sync_scroll_enabled);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.split_ratio, 0.5);
        assert_eq!(settings.sync_settle_timeout_ms, 100);
        assert_eq!(settings.mode_poll_interval_ms, 100);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"dark\"").unwrap(),
            Theme::Dark
        );
    }

    #[test]
    fn test_theme_rejects_unknown_variant() {
        assert!(serde_json::from_str::<Theme>("\"system\"").is_err());
    }

    #[test]
    fn test_theme_toggled() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::Light.is_dark());
    }

    #[test]
    fn test_view_mode_cycle() {
        assert_eq!(ViewMode::Split.cycle(), ViewMode::Editor);
        assert_eq!(ViewMode::Editor.cycle(), ViewMode::Preview);
        assert_eq!(ViewMode::Preview.cycle(), ViewMode::Split);
    }

    #[test]
    fn test_view_mode_visibility() {
        assert!(ViewMode::Split.shows_editor() && ViewMode::Split.shows_preview());
        assert!(ViewMode::Editor.shows_editor() && !ViewMode::Editor.shows_preview());
        assert!(!ViewMode::Preview.shows_editor() && ViewMode::Preview.shows_preview());
    }

    #[test]
    fn test_view_mode_serialization() {
        assert_eq!(serde_json::to_string(&ViewMode::Split).unwrap(), "\"split\"");
        assert_eq!(
            serde_json::to_string(&ViewMode::Preview).unwrap(),
            "\"preview\""
        );
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings {
            theme: Theme::Dark,
            split_ratio: 0.3,
            sync_scroll_enabled: false,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.view_mode, ViewMode::Split);
        assert_eq!(settings.font_size, 14.0);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sanitization tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_sanitize_font_size() {
        let mut settings = Settings::default();
        settings.font_size = 4.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);

        settings.font_size = f32::NAN;
        settings.sanitize();
        assert_eq!(settings.font_size, 14.0);
    }

    #[test]
    fn test_sanitize_split_ratio() {
        let mut settings = Settings::default();
        settings.split_ratio = -0.5;
        settings.sanitize();
        assert_eq!(settings.split_ratio, Settings::MIN_SPLIT_RATIO);

        settings.split_ratio = 1.5;
        settings.sanitize();
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);
    }

    #[test]
    fn test_sanitize_timing_values() {
        let mut settings = Settings::default();
        settings.sync_settle_timeout_ms = 0;
        settings.mode_poll_interval_ms = 60_000;
        settings.sanitize();
        assert_eq!(
            settings.sync_settle_timeout_ms,
            Settings::MIN_SETTLE_TIMEOUT_MS
        );
        assert_eq!(settings.mode_poll_interval_ms, Settings::MAX_MODE_POLL_MS);
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"font_size": 4.0, "split_ratio": 2.0}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);
    }
}
