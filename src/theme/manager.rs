//! Theme Manager for Markpane
//!
//! Tracks the active theme and pushes its visuals into the egui context only
//! when they changed since the last frame.
//!
//! ```ignore
//! let mut manager = ThemeManager::new(settings.theme);
//! manager.apply_if_needed(ctx);   // every frame
//! manager.toggle();               // from the toolbar
//! ```

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::{dark, light, ThemeColors};
use crate::config::Theme;

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    cached_visuals: Option<Visuals>,
    needs_apply: bool,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {}", theme.label());
        Self {
            current_theme: theme,
            cached_visuals: None,
            needs_apply: true,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Switch to `theme`. No-op when it is already active.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!(
                "Theme changed from {} to {}",
                self.current_theme.label(),
                theme.label()
            );
            self.current_theme = theme;
            self.cached_visuals = None;
            self.needs_apply = true;
        }
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current_theme.toggled();
        self.set_theme(next);
        next
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the theme to `ctx` if it changed. Returns `true` when applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if !self.needs_apply {
            return false;
        }
        ctx.set_visuals(self.visuals());
        self.needs_apply = false;
        debug!("Applied theme: {}", self.current_theme.label());
        true
    }

    fn visuals(&mut self) -> Visuals {
        let theme = self.current_theme;
        self.cached_visuals
            .get_or_insert_with(|| match theme {
                Theme::Light => light::create_light_visuals(),
                Theme::Dark => dark::create_dark_visuals(),
            })
            .clone()
    }

    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_theme(self.current_theme)
    }

    /// Toolbar glyph for the *current* theme.
    pub fn icon(&self) -> &'static str {
        match self.current_theme {
            Theme::Light => "☀",
            Theme::Dark => "🌙",
        }
    }

    pub fn tooltip(&self) -> String {
        format!(
            "{} theme (Ctrl+Shift+T for {})",
            self.current_theme.label(),
            self.current_theme.toggled().label().to_lowercase()
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
