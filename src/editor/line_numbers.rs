//! Line-number gutter for the source editor

use eframe::egui::{self, Color32, FontId, Galley, Painter, Pos2, Rect};

/// Right padding between the numbers and the separator.
const GUTTER_PADDING: f32 = 12.0;

/// Count the number of lines in the given text.
///
/// Returns at least 1 for empty text (representing a single empty line).
pub fn count_lines(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Width needed to show numbers up to `line_count` at `font_size`.
pub fn gutter_width(line_count: usize, font_size: f32) -> f32 {
    let digits = line_count.max(1).to_string().len();
    let char_width = font_size * 0.6;
    (char_width * digits as f32 + 20.0).max(30.0)
}

/// Colors used to paint the gutter.
#[derive(Debug, Clone, Copy)]
pub struct GutterColors {
    pub number: Color32,
    pub background: Color32,
    pub separator: Color32,
}

/// Paint line numbers next to `galley`, one per logical line.
///
/// Wrapped rows share the number of the line they continue.
pub fn paint_gutter(
    painter: &Painter,
    rect: Rect,
    galley: &Galley,
    galley_pos: Pos2,
    font_size: f32,
    colors: GutterColors,
) {
    painter.rect_filled(rect, 0.0, colors.background);
    painter.line_segment(
        [
            rect.right_top() + egui::vec2(-1.0, 0.0),
            rect.right_bottom() + egui::vec2(-1.0, 0.0),
        ],
        egui::Stroke::new(1.0, colors.separator),
    );

    let font_id = FontId::monospace(font_size);
    let x = rect.right() - GUTTER_PADDING;

    if galley.rows.is_empty() {
        painter.text(
            egui::pos2(x, galley_pos.y),
            egui::Align2::RIGHT_TOP,
            "1",
            font_id,
            colors.number,
        );
        return;
    }

    let mut line = 1usize;
    let mut at_line_start = true;
    for row in &galley.rows {
        if at_line_start {
            painter.text(
                egui::pos2(x, galley_pos.y + row.min_y()),
                egui::Align2::RIGHT_TOP,
                line.to_string(),
                font_id.clone(),
                colors.number,
            );
        }
        at_line_start = row.ends_with_newline;
        if row.ends_with_newline {
            line += 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
