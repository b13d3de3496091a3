//! Rendered preview pane
//!
//! Keeps the last rendered form of the document and draws it inside a
//! vertical `ScrollArea`. Rendering is expensive relative to a frame, so the
//! pane only re-renders when a `ContentChanged` event arrives from
//! [`AppState`](crate::state::AppState).

use super::render::{
    render_or_placeholder, ComrakRenderer, InlineSpan, ListMarker, MarkdownRenderer,
    PreviewBlock, RenderedDocument,
};
use super::sync_scroll::ScrollMetrics;
use super::syntax::{highlighter, layout_code, CodeSpan};
use crate::config::Theme;
use crate::state::{Document, StateEvent};
use crate::theme::{ThemeColors, WIDGET_ROUNDING};
use eframe::egui::{self, RichText, ScrollArea, Ui, Vec2};
use log::debug;
use std::collections::HashMap;
use std::sync::mpsc::Receiver;

/// Indentation per nesting level of lists and quotes.
const INDENT: f32 = 18.0;

pub struct PreviewPane {
    renderer: Box<dyn MarkdownRenderer>,
    rendered: RenderedDocument,
    /// Document version `rendered` was produced from
    rendered_version: Option<u64>,
    events: Option<Receiver<StateEvent>>,
    /// Highlighted code blocks by block index
    highlighted: HashMap<usize, Vec<Vec<CodeSpan>>>,
    highlight_theme: Option<Theme>,
}

impl Default for PreviewPane {
    fn default() -> Self {
        Self::new(Box::new(ComrakRenderer::new()))
    }
}

impl PreviewPane {
    pub fn new(renderer: Box<dyn MarkdownRenderer>) -> Self {
        Self {
            renderer,
            rendered: RenderedDocument {
                html: String::new(),
                blocks: Vec::new(),
            },
            rendered_version: None,
            events: None,
            highlighted: HashMap::new(),
            highlight_theme: None,
        }
    }

    /// Listen for state events on `events`.
    pub fn attach(&mut self, events: Receiver<StateEvent>) {
        self.events = Some(events);
    }

    pub fn rendered(&self) -> &RenderedDocument {
        &self.rendered
    }

    /// Sanitized HTML of the last render.
    pub fn html(&self) -> &str {
        &self.rendered.html
    }

    pub fn rendered_version(&self) -> Option<u64> {
        self.rendered_version
    }

    /// Render `content` unless `version` is already on screen.
    ///
    /// Returns `true` when a render happened.
    pub fn refresh(&mut self, content: &str, version: u64) -> bool {
        if self.rendered_version == Some(version) {
            return false;
        }
        self.rendered = render_or_placeholder(self.renderer.as_ref(), content);
        self.rendered_version = Some(version);
        self.highlighted.clear();
        debug!(
            "Preview rendered version {} ({} blocks)",
            version,
            self.rendered.blocks.len()
        );
        true
    }

    /// Drain pending state events and re-render if the content changed.
    ///
    /// The first call always renders.
    pub fn sync(&mut self, document: &Document) -> bool {
        let mut content_changed = self.rendered_version.is_none();
        if let Some(events) = &self.events {
            for event in events.try_iter() {
                if matches!(event, StateEvent::ContentChanged { .. }) {
                    content_changed = true;
                }
            }
        }
        if content_changed {
            self.refresh(document.content(), document.version())
        } else {
            false
        }
    }

    /// Draw the preview and return its scroll geometry.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        colors: &ThemeColors,
        theme: Theme,
        font_size: f32,
        scroll_to: Option<f32>,
    ) -> ScrollMetrics {
        if self.highlight_theme != Some(theme) {
            self.highlighted.clear();
            self.highlight_theme = Some(theme);
        }

        let mut scroll_area = ScrollArea::vertical()
            .id_source("markpane_preview_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = scroll_to {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let blocks = &self.rendered.blocks;
        let highlighted = &mut self.highlighted;
        let output = scroll_area.show(ui, |ui| {
            egui::Frame::none().inner_margin(12.0).show(ui, |ui| {
                for (index, block) in blocks.iter().enumerate() {
                    match block {
                        PreviewBlock::CodeBlock { language, code } => {
                            let lines = highlighted.entry(index).or_insert_with(|| {
                                highlighter().highlight(code, language, theme)
                            });
                            render_code_block(ui, lines, colors, theme, font_size);
                        }
                        other => render_block(ui, other, colors, font_size),
                    }
                }
            });
        });

        ScrollMetrics::new(
            output.state.offset.y,
            output.content_size.y,
            output.inner_rect.height(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn heading_size(level: u8, base: f32) -> f32 {
    match level {
        1 => base * 1.8,
        2 => base * 1.5,
        3 => base * 1.3,
        4 => base * 1.15,
        5 => base * 1.05,
        _ => base,
    }
}

fn render_block(ui: &mut Ui, block: &PreviewBlock, colors: &ThemeColors, font_size: f32) {
    match block {
        PreviewBlock::Heading { level, spans } => {
            ui.add_space(if *level <= 2 { 8.0 } else { 4.0 });
            let size = heading_size(*level, font_size);
            render_spans(ui, spans, colors, size, Some(colors.preview.heading), true);
            if *level <= 2 {
                render_rule(ui, colors.preview.rule);
            }
            ui.add_space(4.0);
        }
        PreviewBlock::Paragraph(spans) => {
            render_spans(ui, spans, colors, font_size, None, false);
            ui.add_space(6.0);
        }
        PreviewBlock::ListItem {
            depth,
            marker,
            spans,
        } => {
            ui.horizontal_top(|ui| {
                ui.add_space(INDENT * (*depth as f32 + 1.0));
                let marker_text = match marker {
                    ListMarker::Bullet => "•".to_string(),
                    ListMarker::Ordered(n) => format!("{}.", n),
                    ListMarker::Task { checked: true } => "☑".to_string(),
                    ListMarker::Task { checked: false } => "☐".to_string(),
                };
                ui.label(
                    RichText::new(marker_text)
                        .size(font_size)
                        .color(colors.preview.list_marker),
                );
                render_spans(ui, spans, colors, font_size, None, false);
            });
            ui.add_space(2.0);
        }
        PreviewBlock::Quote { depth, spans } => {
            ui.horizontal_top(|ui| {
                for _ in 0..(*depth).max(1) {
                    let (rect, _) = ui.allocate_exact_size(
                        Vec2::new(4.0, font_size * 1.4),
                        egui::Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 0.0, colors.preview.quote_bar);
                    ui.add_space(8.0);
                }
                render_spans(
                    ui,
                    spans,
                    colors,
                    font_size,
                    Some(colors.preview.quote_text),
                    false,
                );
            });
            ui.add_space(6.0);
        }
        PreviewBlock::Table { header, rows } => {
            render_table(ui, header, rows, colors, font_size);
            ui.add_space(6.0);
        }
        PreviewBlock::Rule => {
            ui.add_space(4.0);
            render_rule(ui, colors.preview.rule);
            ui.add_space(4.0);
        }
        // Drawn by the caller with cached highlighting
        PreviewBlock::CodeBlock { .. } => {}
    }
}

fn render_rule(ui: &mut Ui, color: egui::Color32) {
    let (rect, _) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 0.0, color);
}

fn render_code_block(
    ui: &mut Ui,
    lines: &[Vec<CodeSpan>],
    colors: &ThemeColors,
    theme: Theme,
    font_size: f32,
) {
    let fill = highlighter()
        .background(theme)
        .unwrap_or(colors.preview.code_bg);
    egui::Frame::none()
        .fill(fill)
        .inner_margin(8.0)
        .rounding(WIDGET_ROUNDING)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(layout_code(lines, font_size * 0.9));
        });
    ui.add_space(6.0);
}

fn render_table(
    ui: &mut Ui,
    header: &[Vec<InlineSpan>],
    rows: &[Vec<Vec<InlineSpan>>],
    colors: &ThemeColors,
    font_size: f32,
) {
    egui::Frame::none()
        .stroke(egui::Stroke::new(1.0, colors.preview.table_border))
        .inner_margin(6.0)
        .show(ui, |ui| {
            let id = ui.next_auto_id();
            egui::Grid::new(id)
                .striped(true)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for cell in header {
                        render_spans(ui, cell, colors, font_size, None, true);
                    }
                    ui.end_row();
                    for row in rows {
                        for cell in row {
                            render_spans(ui, cell, colors, font_size, None, false);
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Draw a run of inline spans, wrapping at the available width.
fn render_spans(
    ui: &mut Ui,
    spans: &[InlineSpan],
    colors: &ThemeColors,
    font_size: f32,
    color: Option<egui::Color32>,
    strong: bool,
) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            let mut text = RichText::new(&span.text).size(font_size);
            let style = &span.style;
            if style.code {
                text = text
                    .monospace()
                    .color(colors.preview.inline_code)
                    .background_color(colors.preview.code_bg);
            } else if let Some(color) = color {
                text = text.color(color);
            }
            if strong || style.strong {
                text = text.strong();
            }
            if style.emphasis {
                text = text.italics();
            }
            if style.strikethrough {
                text = text.strikethrough();
            }
            match &style.link {
                Some(url) => {
                    ui.hyperlink_to(text.color(colors.text.link), url);
                }
                None => {
                    ui.label(text);
                }
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
