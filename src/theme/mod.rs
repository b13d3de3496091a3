//! Theme System for Markpane
//!
//! The application has exactly two palettes, light and dark, selected by
//! `config::Theme`. `ThemeColors` carries every color the panes paint with;
//! `light.rs` and `dark.rs` turn a palette into egui `Visuals`.
//!
//! ```ignore
//! let colors = ThemeColors::from_theme(Theme::Dark);
//! ui.label(RichText::new("Hello").color(colors.text.primary));
//! ctx.set_visuals(colors.to_visuals());
//! ```

pub mod dark;
pub mod light;
pub mod manager;

pub use manager::ThemeManager;

use crate::config::Theme;
use eframe::egui::{Color32, Rounding, Stroke, Visuals};

/// Corner radius shared by widgets and code blocks.
pub const WIDGET_ROUNDING: f32 = 4.0;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// All colors for one theme variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub base: BaseColors,
    pub text: TextColors,
    pub preview: PreviewColors,
    pub ui: UiColors,
}

impl ThemeColors {
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            base: BaseColors {
                background: Color32::from_rgb(255, 255, 255),
                background_secondary: Color32::from_rgb(248, 248, 248),
                border: Color32::from_rgb(205, 205, 205),
                border_subtle: Color32::from_rgb(228, 228, 228),
                hover: Color32::from_rgb(238, 238, 238),
                selected: Color32::from_rgb(222, 236, 255),
            },
            text: TextColors {
                primary: Color32::from_rgb(28, 28, 28),
                secondary: Color32::from_rgb(84, 84, 84),
                muted: Color32::from_rgb(125, 125, 125),
                link: Color32::from_rgb(0, 98, 180),
            },
            preview: PreviewColors {
                heading: Color32::from_rgb(20, 60, 120),
                quote_bar: Color32::from_rgb(200, 200, 200),
                quote_text: Color32::from_rgb(100, 100, 100),
                code_bg: Color32::from_rgb(240, 242, 245),
                inline_code: Color32::from_rgb(170, 40, 80),
                rule: Color32::from_rgb(210, 210, 210),
                list_marker: Color32::from_rgb(110, 110, 110),
                table_border: Color32::from_rgb(205, 210, 215),
            },
            ui: UiColors {
                accent: Color32::from_rgb(0, 120, 212),
                success: Color32::from_rgb(40, 160, 70),
                warning: Color32::from_rgb(230, 160, 0),
                error: Color32::from_rgb(210, 50, 60),
            },
        }
    }

    pub fn dark() -> Self {
        Self {
            base: BaseColors {
                background: Color32::from_rgb(28, 29, 32),
                background_secondary: Color32::from_rgb(36, 37, 41),
                border: Color32::from_rgb(62, 64, 70),
                border_subtle: Color32::from_rgb(48, 50, 55),
                hover: Color32::from_rgb(50, 52, 58),
                selected: Color32::from_rgb(40, 62, 88),
            },
            text: TextColors {
                primary: Color32::from_rgb(222, 222, 222),
                secondary: Color32::from_rgb(178, 178, 178),
                muted: Color32::from_rgb(135, 135, 135),
                link: Color32::from_rgb(110, 180, 255),
            },
            preview: PreviewColors {
                heading: Color32::from_rgb(130, 190, 255),
                quote_bar: Color32::from_rgb(85, 88, 95),
                quote_text: Color32::from_rgb(175, 175, 175),
                code_bg: Color32::from_rgb(40, 44, 52),
                inline_code: Color32::from_rgb(230, 150, 120),
                rule: Color32::from_rgb(80, 82, 88),
                list_marker: Color32::from_rgb(150, 150, 150),
                table_border: Color32::from_rgb(65, 68, 76),
            },
            ui: UiColors {
                accent: Color32::from_rgb(100, 175, 255),
                success: Color32::from_rgb(80, 205, 110),
                warning: Color32::from_rgb(250, 200, 60),
                error: Color32::from_rgb(250, 100, 100),
            },
        }
    }

    pub fn is_dark(&self) -> bool {
        self.base.background.r() < 128
    }

    /// egui visuals for this palette.
    pub fn to_visuals(&self) -> Visuals {
        if self.is_dark() {
            dark::create_dark_visuals()
        } else {
            light::create_light_visuals()
        }
    }
}

/// Backgrounds and borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseColors {
    pub background: Color32,
    /// Panels, gutter, toolbar
    pub background_secondary: Color32,
    pub border: Color32,
    pub border_subtle: Color32,
    pub hover: Color32,
    pub selected: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    pub primary: Color32,
    pub secondary: Color32,
    pub muted: Color32,
    pub link: Color32,
}

/// Colors used when drawing rendered markdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewColors {
    pub heading: Color32,
    pub quote_bar: Color32,
    pub quote_text: Color32,
    pub code_bg: Color32,
    pub inline_code: Color32,
    pub rule: Color32,
    pub list_marker: Color32,
    pub table_border: Color32,
}

/// Accent and feedback colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiColors {
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Visuals
// ─────────────────────────────────────────────────────────────────────────────

/// Paint `colors` over egui's stock `visuals`.
fn apply_palette(mut visuals: Visuals, colors: &ThemeColors) -> Visuals {
    let rounding = Rounding::same(WIDGET_ROUNDING);

    visuals.panel_fill = colors.base.background;
    visuals.window_fill = colors.base.background;
    visuals.faint_bg_color = colors.base.background_secondary;
    visuals.extreme_bg_color = colors.base.background;
    visuals.code_bg_color = colors.preview.code_bg;

    visuals.override_text_color = None;
    visuals.hyperlink_color = colors.text.link;
    visuals.warn_fg_color = colors.ui.warning;
    visuals.error_fg_color = colors.ui.error;

    visuals.selection.bg_fill = colors.base.selected;
    visuals.selection.stroke = Stroke::new(1.0, colors.ui.accent);

    let widgets = &mut visuals.widgets;

    widgets.noninteractive.bg_fill = colors.base.background_secondary;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.base.border_subtle);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text.primary);

    widgets.inactive.bg_fill = colors.base.background_secondary;
    widgets.inactive.weak_bg_fill = colors.base.background_secondary;
    widgets.inactive.bg_stroke = Stroke::new(1.0, colors.base.border);
    widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text.secondary);

    widgets.hovered.bg_fill = colors.base.hover;
    widgets.hovered.weak_bg_fill = colors.base.hover;
    widgets.hovered.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.hovered.fg_stroke = Stroke::new(1.5, colors.text.primary);

    widgets.active.bg_fill = colors.ui.accent;
    widgets.active.weak_bg_fill = colors.base.selected;
    widgets.active.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.active.fg_stroke = Stroke::new(2.0, colors.text.primary);

    for state in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        state.rounding = rounding;
    }

    visuals.window_rounding = Rounding::same(WIDGET_ROUNDING * 2.0);
    visuals.window_stroke = Stroke::new(1.0, colors.base.border);
    visuals.resize_corner_size = 10.0;
    visuals.clip_rect_margin = 3.0;

    visuals
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
