//! Light theme visuals

use eframe::egui::{self, Color32, Visuals};

use super::{apply_palette, ThemeColors};

/// egui visuals for the light palette.
pub fn create_light_visuals() -> Visuals {
    let mut visuals = apply_palette(Visuals::light(), &ThemeColors::light());

    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 2.0),
        blur: 10.0,
        spread: 0.0,
        color: Color32::from_black_alpha(30),
    };
    visuals.popup_shadow = visuals.window_shadow;
    visuals.striped = true;

    visuals
}
