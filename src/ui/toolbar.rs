//! Toolbar UI Component for Markpane
//!
//! A single row of icon buttons above the panes. The toolbar never mutates
//! application state itself; it reports what was clicked as a
//! [`ToolbarAction`] and the app dispatches it.

use crate::config::ViewMode;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the toolbar row.
pub const TOOLBAR_HEIGHT: f32 = 34.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(30.0, 26.0);

/// Actions that can be triggered from the toolbar or a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Flip between light and dark
    ToggleTheme,
    /// Enable or disable scroll sync
    ToggleSync,
    /// Switch to a specific layout
    SetViewMode(ViewMode),
    /// Advance to the next layout
    CycleViewMode,
    /// Replace the document with an empty one
    NewDocument,
    /// Copy the rendered document as HTML
    CopyHtml,
}

impl ToolbarAction {
    /// Keyboard shortcut bound to this action, if any.
    pub fn shortcut(&self) -> Option<&'static str> {
        match self {
            ToolbarAction::ToggleTheme => Some("Ctrl+Shift+T"),
            ToolbarAction::ToggleSync => Some("Ctrl+Shift+S"),
            ToolbarAction::CycleViewMode => Some("Ctrl+E"),
            ToolbarAction::CopyHtml => Some("Ctrl+Shift+C"),
            ToolbarAction::SetViewMode(_) | ToolbarAction::NewDocument => None,
        }
    }

    fn tooltip(&self, base: &str) -> String {
        match self.shortcut() {
            Some(keys) => format!("{} ({})", base, keys),
            None => base.to_string(),
        }
    }
}

/// What the toolbar needs to know to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState<'a> {
    pub colors: &'a ThemeColors,
    pub theme_icon: &'static str,
    pub view_mode: ViewMode,
    pub sync_enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }

    /// Render the toolbar and return any triggered action.
    pub fn show(&self, ui: &mut Ui, state: ToolbarState<'_>) -> Option<ToolbarAction> {
        let mut action = None;
        let colors = state.colors;

        ui.painter().rect_filled(
            ui.available_rect_before_wrap(),
            0.0,
            colors.base.background_secondary,
        );

        ui.horizontal(|ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════
            // Document
            // ═══════════════════════════════════════════════════════════════
            let new_doc = ToolbarAction::NewDocument;
            if icon_button(ui, "📄", &new_doc.tooltip("New document"), colors).clicked() {
                action = Some(new_doc);
            }

            let copy = ToolbarAction::CopyHtml;
            if icon_button(ui, "📋", &copy.tooltip("Copy as HTML"), colors).clicked() {
                action = Some(copy);
            }

            ui.add_space(4.0);
            vertical_separator(ui, colors.base.border, TOOLBAR_HEIGHT - 10.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════
            // View
            // ═══════════════════════════════════════════════════════════════
            for &mode in ViewMode::all() {
                let selected = mode == state.view_mode;
                let text = RichText::new(mode.label()).size(12.0);
                let response = ui
                    .selectable_label(selected, text)
                    .on_hover_text(ToolbarAction::CycleViewMode.tooltip("Cycle layout"));
                if response.clicked() && !selected {
                    action = Some(ToolbarAction::SetViewMode(mode));
                }
            }

            ui.add_space(4.0);
            vertical_separator(ui, colors.base.border, TOOLBAR_HEIGHT - 10.0);
            ui.add_space(4.0);

            let sync = ToolbarAction::ToggleSync;
            let sync_tooltip = if state.sync_enabled {
                sync.tooltip("Scroll sync on")
            } else {
                sync.tooltip("Scroll sync off")
            };
            if toggle_button(ui, "⇅", &sync_tooltip, state.sync_enabled, colors).clicked() {
                action = Some(sync);
            }

            // Theme toggle sits at the far right
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(4.0);
                let theme = ToolbarAction::ToggleTheme;
                if icon_button(ui, state.theme_icon, &theme.tooltip("Toggle theme"), colors)
                    .clicked()
                {
                    action = Some(theme);
                }
            });
        });

        action
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Button Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Frameless button with a centered glyph and a hover highlight.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, colors: &ThemeColors) -> Response {
    let btn = ui.add(
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), colors.base.hover);
    }

    ui.painter().text(
        btn.rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        colors.text.primary,
    );

    btn.on_hover_text(tooltip)
}

/// Icon button drawn with an accent background while `active`.
fn toggle_button(
    ui: &mut Ui,
    icon: &str,
    tooltip: &str,
    active: bool,
    colors: &ThemeColors,
) -> Response {
    let btn = ui.add(
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    let fill = if active {
        Some(colors.base.selected)
    } else if btn.hovered() {
        Some(colors.base.hover)
    } else {
        None
    };
    if let Some(fill) = fill {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), fill);
    }

    let text_color: Color32 = if active {
        colors.ui.accent
    } else {
        colors.text.muted
    };
    ui.painter().text(
        btn.rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

/// Draw a vertical separator line.
fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}
