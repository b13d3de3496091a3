//! Dark theme visuals

use eframe::egui::{self, Color32, Visuals};

use super::{apply_palette, ThemeColors};

/// egui visuals for the dark palette.
pub fn create_dark_visuals() -> Visuals {
    let mut visuals = apply_palette(Visuals::dark(), &ThemeColors::dark());

    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 16.0,
        spread: 0.0,
        color: Color32::from_black_alpha(90),
    };
    visuals.popup_shadow = visuals.window_shadow;
    visuals.striped = true;

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_visuals() {
        let visuals = create_dark_visuals();
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, ThemeColors::dark().base.background);
    }
}
