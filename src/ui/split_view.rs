//! Split pane layout
//!
//! The editor lives in a resizable left side panel and the preview fills the
//! remaining central area. The user-facing quantity is `split_ratio`, the
//! share of the window width given to the left pane; egui works in pixels,
//! so the conversion happens here.

use crate::config::Settings;
use eframe::egui::{self, Ui};

/// Width of the left pane for `ratio` of `total_width`.
pub fn ratio_to_width(ratio: f32, total_width: f32) -> f32 {
    let ratio = if ratio.is_finite() {
        ratio.clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO)
    } else {
        0.5
    };
    ratio * total_width.max(0.0)
}

/// Split ratio for a left pane of `width` out of `total_width`.
pub fn width_to_ratio(width: f32, total_width: f32) -> f32 {
    if total_width <= 0.0 || !width.is_finite() {
        return 0.5;
    }
    (width / total_width).clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO)
}

/// Results of both panes plus the ratio after any drag.
pub struct SplitOutput<L, R> {
    pub left: L,
    pub right: R,
    pub ratio: f32,
}

/// Resizable two-pane layout.
pub struct SplitView {
    id: egui::Id,
    ratio: f32,
}

impl SplitView {
    pub fn new(id_source: impl std::hash::Hash, ratio: f32) -> Self {
        Self {
            id: egui::Id::new(id_source),
            ratio,
        }
    }

    /// Lay out both panes. Must be called before any `CentralPanel`.
    ///
    /// The returned `ratio` follows the width the left pane actually used, so
    /// the left content must fill its panel for the ratio to hold.
    pub fn show<L, R>(
        self,
        ctx: &egui::Context,
        left: impl FnOnce(&mut Ui) -> L,
        right: impl FnOnce(&mut Ui) -> R,
    ) -> SplitOutput<L, R> {
        let total = ctx.available_rect().width();
        let min = ratio_to_width(Settings::MIN_SPLIT_RATIO, total);
        let max = ratio_to_width(Settings::MAX_SPLIT_RATIO, total);

        let left_panel = egui::SidePanel::left(self.id)
            .resizable(true)
            .default_width(ratio_to_width(self.ratio, total))
            .width_range(min..=max)
            .frame(egui::Frame::none())
            .show(ctx, left);

        let ratio = width_to_ratio(left_panel.response.rect.width(), total);

        let right_panel = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, right);

        SplitOutput {
            left: left_panel.inner,
            right: right_panel.inner,
            ratio,
        }
    }
}
