//! Status bar at the bottom of the window
//!
//! Pure display: word count, cursor position, editing mode, scroll sync
//! indicator and the current toast message, if any.

use crate::editor::{CursorPosition, EditingMode, TextStats};
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Ui};

/// Everything the status bar shows for one frame.
#[derive(Debug, Clone)]
pub struct StatusInfo<'a> {
    pub stats: TextStats,
    pub cursor: CursorPosition,
    pub mode: EditingMode,
    pub sync_enabled: bool,
    pub toast: Option<&'a str>,
}

impl StatusInfo<'_> {
    pub fn sync_label(&self) -> &'static str {
        if self.sync_enabled {
            "Sync on"
        } else {
            "Sync off"
        }
    }

    /// Right-aligned segments, left to right.
    pub fn segments(&self) -> [String; 3] {
        [
            self.stats.words_label(),
            self.cursor.label(),
            self.sync_label().to_string(),
        ]
    }
}

pub struct StatusBar;

impl StatusBar {
    pub fn show(ui: &mut Ui, info: &StatusInfo<'_>, colors: &ThemeColors) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(info.mode.label())
                    .monospace()
                    .strong()
                    .color(mode_color(info.mode, colors)),
            );

            if let Some(toast) = info.toast {
                ui.with_layout(
                    egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                    |ui| {
                        ui.label(RichText::new(toast).italics());
                    },
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Right-to-left, so the last segment goes first
                let [words, cursor, sync] = info.segments();
                let sync_color = if info.sync_enabled {
                    colors.ui.success
                } else {
                    colors.text.muted
                };
                ui.label(RichText::new(sync).color(sync_color))
                    .on_hover_text("Ctrl+Shift+S to toggle");
                ui.separator();
                ui.label(cursor);
                ui.separator();
                ui.label(words)
                    .on_hover_text(info.stats.format_compact());
            });
        });
    }
}

fn mode_color(mode: EditingMode, colors: &ThemeColors) -> egui::Color32 {
    match mode {
        EditingMode::Normal => colors.text.muted,
        EditingMode::Insert => colors.ui.accent,
        EditingMode::Visual => colors.ui.warning,
    }
}
