//! Source editor widget for Markpane
//!
//! Wraps egui's multiline `TextEdit` in a vertical `ScrollArea` with an
//! optional line-number gutter. Besides editing the document in place, every
//! frame it reports what the rest of the application needs: the pane's scroll
//! geometry, the cursor position and the derived editing mode.

use super::line_numbers::{count_lines, gutter_width, paint_gutter, GutterColors};
use super::mode::{EditingMode, ModeNotifier};
use crate::preview::ScrollMetrics;
use crate::state::Document;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, FontId, ScrollArea, TextEdit, Ui};
use log::debug;
use std::sync::Arc;

/// Stable egui id of the editor's `TextEdit`.
pub fn editor_text_id() -> egui::Id {
    egui::Id::new("markpane_editor")
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor Position
// ─────────────────────────────────────────────────────────────────────────────

/// 1-based line and column of the text cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl CursorPosition {
    /// Position of the character index `char_index` in `text`.
    ///
    /// Indices past the end resolve to the position after the last character.
    pub fn from_char_index(text: &str, char_index: usize) -> Self {
        let mut position = Self::default();
        for ch in text.chars().take(char_index) {
            if ch == '\n' {
                position.line += 1;
                position.column = 1;
            } else {
                position.column += 1;
            }
        }
        position
    }

    /// Status bar label, e.g. `Ln 3, Col 7`.
    pub fn label(&self) -> String {
        format!("Ln {}, Col {}", self.line, self.column)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Result of showing the editor widget.
#[derive(Debug, Clone, Copy)]
pub struct EditorOutput {
    /// Whether the content was modified this frame
    pub changed: bool,
    /// Scroll geometry of the editor pane
    pub scroll: ScrollMetrics,
    pub cursor: CursorPosition,
    pub mode: EditingMode,
}

/// A source editor bound to the application's [`Document`].
///
/// # Example
///
/// ```ignore
/// let output = EditorWidget::new(state.document_mut())
///     .font_size(settings.font_size)
///     .show_line_numbers(true)
///     .scroll_to(pending_offset)
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    document: &'a mut Document,
    font_size: f32,
    word_wrap: bool,
    show_line_numbers: bool,
    theme_colors: Option<ThemeColors>,
    /// Offset to jump to this frame (from scroll sync)
    scroll_to: Option<f32>,
    mode_notifier: Option<&'a mut ModeNotifier>,
}

impl<'a> EditorWidget<'a> {
    pub fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            font_size: 14.0,
            word_wrap: true,
            show_line_numbers: true,
            theme_colors: None,
            scroll_to: None,
            mode_notifier: None,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    #[must_use]
    pub fn show_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    /// Set theme colors for styling (used for line numbers).
    #[must_use]
    pub fn theme_colors(mut self, colors: ThemeColors) -> Self {
        self.theme_colors = Some(colors);
        self
    }

    /// Scroll to `offset` this frame.
    #[must_use]
    pub fn scroll_to(mut self, offset: Option<f32>) -> Self {
        self.scroll_to = offset;
        self
    }

    /// Push mode changes through `notifier`.
    #[must_use]
    pub fn mode_notifier(mut self, notifier: &'a mut ModeNotifier) -> Self {
        self.mode_notifier = Some(notifier);
        self
    }

    /// Show the editor widget and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = editor_text_id();
        let font_size = self.font_size;
        let word_wrap = self.word_wrap;

        let needs_focus = std::mem::take(&mut self.document.needs_focus);
        let gutter = self.show_line_numbers.then(|| {
            let lines = count_lines(&self.document.content);
            (lines, gutter_width(lines, font_size))
        });
        let gutter_colors = self
            .theme_colors
            .as_ref()
            .map(|c| GutterColors {
                number: c.text.muted,
                background: c.base.background_secondary,
                separator: c.base.border_subtle,
            })
            .unwrap_or(GutterColors {
                number: Color32::from_rgb(120, 120, 120),
                background: Color32::from_rgb(245, 245, 245),
                separator: Color32::from_rgb(200, 200, 200),
            });

        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let font_id = FontId::monospace(font_size);
            let color = ui.visuals().text_color();
            let job = if word_wrap {
                egui::text::LayoutJob::simple(text.to_owned(), font_id, color, wrap_width)
            } else {
                egui::text::LayoutJob::simple_singleline(text.to_owned(), font_id, color)
            };
            ui.fonts(|f| f.layout_job(job))
        };

        let mut scroll_area = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false]);
        if let Some(offset) = self.scroll_to {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let version_before = self.document.version();
        let content = &mut self.document.content;
        let original_len = content.len();

        let scroll_output = scroll_area.show(ui, |ui| {
            ui.horizontal_top(|ui| {
                let gutter_rect = gutter.map(|(lines, width)| {
                    let row_height = ui.fonts(|f| f.row_height(&FontId::monospace(font_size)));
                    let height = (lines as f32 * row_height).max(ui.available_height());
                    ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover())
                        .0
                });

                let text_output = TextEdit::multiline(content)
                    .id(id)
                    .frame(false)
                    .font(FontId::monospace(font_size))
                    .desired_width(f32::INFINITY)
                    .layouter(&mut layouter)
                    .show(ui);

                if needs_focus {
                    text_output.response.request_focus();
                }

                if let Some(rect) = gutter_rect {
                    paint_gutter(
                        ui.painter(),
                        rect,
                        &text_output.galley,
                        text_output.galley_pos,
                        font_size,
                        gutter_colors,
                    );
                }

                text_output
            })
            .inner
        });

        let text_output = &scroll_output.inner;
        let changed = text_output.response.changed()
            || self.document.content.len() != original_len;
        if changed {
            self.document.record_edit();
            debug!(
                "Editor content changed (version {} -> {})",
                version_before,
                self.document.version()
            );
        }

        let (cursor, has_selection) = match text_output.cursor_range {
            Some(range) => (
                CursorPosition::from_char_index(
                    &self.document.content,
                    range.primary.ccursor.index,
                ),
                range.primary.ccursor.index != range.secondary.ccursor.index,
            ),
            None => (self.document.cursor, false),
        };
        let mode = EditingMode::derive(text_output.response.has_focus(), has_selection);

        if let Some(notifier) = self.mode_notifier {
            notifier.notify(mode);
        }

        EditorOutput {
            changed,
            scroll: ScrollMetrics::new(
                scroll_output.state.offset.y,
                scroll_output.content_size.y,
                scroll_output.inner_rect.height(),
            ),
            cursor,
            mode,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_position_start() {
        assert_eq!(
            CursorPosition::from_char_index("", 0),
            CursorPosition { line: 1, column: 1 }
        );
    }

    #[test]
    fn test_cursor_position_single_line() {
        let text = "Hello, World!";
        assert_eq!(CursorPosition::from_char_index(text, 5).column, 6);
        assert_eq!(CursorPosition::from_char_index(text, 13).column, 14);
    }

    #[test]
    fn test_cursor_position_multiline() {
        let text = "Hello\nWorld\n!";
        assert_eq!(
            CursorPosition::from_char_index(text, 6),
            CursorPosition { line: 2, column: 1 }
        );
        assert_eq!(
            CursorPosition::from_char_index(text, 12),
            CursorPosition { line: 3, column: 1 }
        );
        // The newline itself belongs to the line it ends
        assert_eq!(
            CursorPosition::from_char_index(text, 5),
            CursorPosition { line: 1, column: 6 }
        );
    }

    #[test]
    fn test_cursor_position_counts_chars_not_bytes() {
        let text = "héllo\nwörld";
        assert_eq!(
            CursorPosition::from_char_index(text, 9),
            CursorPosition { line: 2, column: 4 }
        );
    }

    #[test]
    fn test_cursor_position_past_end() {
        assert_eq!(
            CursorPosition::from_char_index("ab", 50),
            CursorPosition { line: 1, column: 3 }
        );
    }

    #[test]
    fn test_cursor_label() {
        assert_eq!(CursorPosition { line: 3, column: 7 }.label(), "Ln 3, Col 7");
    }

    #[test]
    fn test_editor_reports_geometry_and_mode() {
        let ctx = egui::Context::default();
        let mut document = Document::new("line\n".repeat(200));
        document.needs_focus = false;

        let mut output = None;
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                output = Some(EditorWidget::new(&mut document).show(ui));
            });
        });

        let output = output.unwrap();
        assert!(!output.changed);
        assert_eq!(output.mode, EditingMode::Normal);
        assert!(output.scroll.content_extent > output.scroll.viewport_extent);
        assert_eq!(output.scroll.offset, 0.0);
    }
}
