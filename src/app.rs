//! Main application module for Markpane
//!
//! Implements `eframe::App`: lays out the toolbar, the editor and preview
//! panes and the status bar every frame, and routes what the panes report
//! (edits, scroll offsets, cursor, mode) back into [`AppState`] and the
//! scroll synchronizer.

use crate::config::{Settings, ViewMode, WindowSize};
use crate::editor::{
    editor_text_id, EditorOutput, EditorWidget, ModeNotifier, ModeWatcher, TextEditProbe,
    TextStats,
};
use crate::export::copy_document_html;
use crate::preview::{
    Pane, PreviewPane, ScrollMetrics, ScrollSynchronizer, ScrollTracker, SyncScrollConfig,
};
use crate::state::AppState;
use crate::theme::ThemeManager;
use crate::ui::{
    detect_shortcut, SplitView, StatusBar, StatusInfo, Toolbar, ToolbarAction, ToolbarState,
};
use eframe::egui;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Link
// ─────────────────────────────────────────────────────────────────────────────

/// Connects per-frame pane reports to the [`ScrollSynchronizer`].
///
/// Each frame the panes report their geometry; the trackers decide whether
/// that counts as a scroll, the synchronizer decides whether to forward it,
/// and forwarded offsets wait here until the peer is drawn next frame.
#[derive(Debug)]
struct ScrollLink {
    sync: ScrollSynchronizer,
    source_tracker: ScrollTracker,
    preview_tracker: ScrollTracker,
    pending_source: Option<f32>,
    pending_preview: Option<f32>,
}

impl ScrollLink {
    fn new(enabled: bool, settle_timeout: Duration) -> Self {
        let config = SyncScrollConfig {
            settle_timeout,
            ..SyncScrollConfig::default()
        };
        let min_delta = config.min_scroll_delta;
        let mut sync = ScrollSynchronizer::with_config(config);
        sync.set_enabled(enabled);
        Self {
            sync,
            source_tracker: ScrollTracker::new(min_delta),
            preview_tracker: ScrollTracker::new(min_delta),
            pending_source: None,
            pending_preview: None,
        }
    }

    /// Mount the panes `view_mode` shows and unmount the others.
    fn set_visible(&mut self, view_mode: ViewMode) {
        for (pane, visible) in [
            (Pane::Source, view_mode.shows_editor()),
            (Pane::Preview, view_mode.shows_preview()),
        ] {
            if visible {
                self.sync.mount(pane);
            } else if self.sync.is_mounted(pane) {
                self.sync.unmount(pane);
                self.tracker_mut(pane).reset();
                *self.pending_mut(pane) = None;
            }
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.sync.is_enabled() != enabled {
            self.toggle();
        }
    }

    /// Flip synchronization and return the new state.
    fn toggle(&mut self) -> bool {
        let enabled = self.sync.toggle();
        if !enabled {
            self.pending_source = None;
            self.pending_preview = None;
        }
        enabled
    }

    /// Offset to apply to `pane` this frame, if one is queued.
    fn take_target(&mut self, pane: Pane) -> Option<f32> {
        self.pending_mut(pane).take()
    }

    /// Process one frame of pane reports.
    ///
    /// Returns `true` when an offset was queued for a peer.
    fn report_frame(&mut self, reports: &[(Pane, ScrollMetrics)], now: Instant) -> bool {
        for &(pane, metrics) in reports {
            self.sync.update_geometry(pane, metrics);
        }

        let mut queued = false;
        for &(pane, metrics) in reports {
            if !self.tracker_mut(pane).observe(metrics.offset) {
                continue;
            }
            if let Some((peer, offset)) = self.sync.propagate(pane, metrics, now) {
                *self.pending_mut(peer) = Some(offset);
                queued = true;
            }
        }
        queued
    }

    /// Release guards whose fallback deadline passed; returns the time until
    /// the next one.
    fn settle(&mut self, now: Instant) -> Option<Duration> {
        self.sync.poll_settle(now);
        self.sync.next_settle_deadline(now)
    }

    /// Forget scroll baselines after the document was replaced.
    fn reset_trackers(&mut self) {
        self.source_tracker.reset();
        self.preview_tracker.reset();
        self.pending_source = None;
        self.pending_preview = None;
    }

    fn tracker_mut(&mut self, pane: Pane) -> &mut ScrollTracker {
        match pane {
            Pane::Source => &mut self.source_tracker,
            Pane::Preview => &mut self.preview_tracker,
        }
    }

    fn pending_mut(&mut self, pane: Pane) -> &mut Option<f32> {
        match pane {
            Pane::Source => &mut self.pending_source,
            Pane::Preview => &mut self.pending_preview,
        }
    }
}

/// Empty the document and focus the editor.
///
/// Returns `true` when there was content to clear. An already-empty document
/// keeps its version and nothing is published.
fn clear_document(state: &mut AppState, scroll: &mut ScrollLink) -> bool {
    let cleared = state.replace_content_if_changed("");
    if cleared {
        scroll.reset_trackers();
    }
    state.document_mut().needs_focus = true;
    cleared
}

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

/// The main application struct that holds all state and implements eframe::App.
pub struct MarkpaneApp {
    /// Central application state
    state: AppState,
    theme_manager: ThemeManager,
    toolbar: Toolbar,
    preview: PreviewPane,
    scroll: ScrollLink,
    /// Mode reports pushed by the editor widget while it is visible
    mode_watcher: ModeWatcher,
    mode_notifier: ModeNotifier,
    /// Polls the editor's egui state while the editor is hidden
    mode_probe: ModeWatcher,
    /// Word statistics keyed by document version
    cached_stats: (u64, TextStats),
    last_window_size: Option<egui::Vec2>,
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl MarkpaneApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing Markpane");

        let mut state = AppState::with_settings(settings);
        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply_if_needed(&cc.egui_ctx);

        let mut preview = PreviewPane::default();
        preview.attach(state.subscribe());

        let mut scroll = ScrollLink::new(
            state.settings.sync_scroll_enabled,
            Duration::from_millis(state.settings.sync_settle_timeout_ms),
        );
        scroll.set_visible(state.settings.view_mode);

        let (mode_watcher, mode_notifier) = ModeWatcher::push();
        let mode_probe = ModeWatcher::polling(
            Box::new(TextEditProbe::new(cc.egui_ctx.clone(), editor_text_id())),
            Duration::from_millis(state.settings.mode_poll_interval_ms),
        );

        let cached_stats = (
            state.document().version(),
            TextStats::from_text(state.document().content()),
        );

        Self {
            state,
            theme_manager,
            toolbar: Toolbar::new(),
            preview,
            scroll,
            mode_watcher,
            mode_notifier,
            mode_probe,
            cached_stats,
            last_window_size: None,
            last_window_pos: None,
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn toast(&mut self, message: impl Into<String>, duration: f64) {
        let time = self.get_app_time();
        self.state.show_toast(message, time, duration);
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let size = rect.size();
        let pos = rect.min;

        let size_changed = self
            .last_window_size
            .map_or(true, |s| (s - size).length() > 1.0);
        let pos_changed = self
            .last_window_pos
            .map_or(true, |p| (p - pos).length() > 1.0);
        if !size_changed && !pos_changed {
            return;
        }

        let first_report = self.last_window_size.is_none();
        self.last_window_size = Some(size);
        self.last_window_pos = Some(pos);
        if first_report {
            return;
        }

        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        self.state.update_settings(|s| {
            s.window_size = WindowSize {
                width: size.x,
                height: size.y,
                x: Some(pos.x),
                y: Some(pos.y),
                maximized,
            };
        });
        debug!(
            "Window state updated: {}x{} at ({}, {}), maximized: {}",
            size.x, size.y, pos.x, pos.y, maximized
        );
    }

    fn text_stats(&mut self) -> TextStats {
        let version = self.state.document().version();
        if self.cached_stats.0 != version {
            self.cached_stats = (version, TextStats::from_text(self.state.document().content()));
        }
        self.cached_stats.1
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_action(&mut self, action: ToolbarAction) {
        debug!("Handling action: {:?}", action);
        match action {
            ToolbarAction::ToggleTheme => {
                let theme = self.state.toggle_theme();
                self.theme_manager.set_theme(theme);
            }
            ToolbarAction::ToggleSync => {
                let enabled = self.scroll.toggle();
                self.state.set_sync_enabled(enabled);
                let label = if enabled { "Scroll sync on" } else { "Scroll sync off" };
                self.toast(label, 1.5);
            }
            ToolbarAction::SetViewMode(mode) => self.set_view_mode(mode),
            ToolbarAction::CycleViewMode => {
                let mode = self.state.settings.view_mode.cycle();
                self.set_view_mode(mode);
            }
            ToolbarAction::NewDocument => {
                clear_document(&mut self.state, &mut self.scroll);
            }
            ToolbarAction::CopyHtml => self.handle_copy_as_html(),
        }
    }

    fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.set_view_mode(mode);
        self.scroll.set_visible(mode);
        info!("View mode: {}", mode.label());
    }

    fn handle_copy_as_html(&mut self) {
        // Pick up edits made since the preview last rendered
        self.preview.sync(self.state.document());
        match copy_document_html(self.preview.rendered()) {
            Ok(()) => self.toast("HTML copied to clipboard", 2.0),
            Err(e) => {
                warn!("Failed to copy HTML to clipboard: {}", e);
                self.toast(format!("Copy failed: {}", e), 3.0);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panes
    // ─────────────────────────────────────────────────────────────────────────

    /// Draw the editor and/or preview; returns what they reported.
    fn render_panes(&mut self, ctx: &egui::Context) -> (Option<EditorOutput>, Option<ScrollMetrics>) {
        let settings = &self.state.settings;
        let view_mode = settings.view_mode;
        let font_size = settings.font_size;
        let word_wrap = settings.word_wrap;
        let show_line_numbers = settings.show_line_numbers;
        let split_ratio = settings.split_ratio;
        let theme = self.theme_manager.current_theme();
        let colors = self.theme_manager.colors();

        let source_target = self.scroll.take_target(Pane::Source);
        let preview_target = self.scroll.take_target(Pane::Preview);

        let document = self.state.document_mut();
        let notifier = &mut self.mode_notifier;
        let preview = &mut self.preview;

        let editor_colors = colors.clone();
        let show_editor = |ui: &mut egui::Ui| {
            EditorWidget::new(document)
                .font_size(font_size)
                .word_wrap(word_wrap)
                .show_line_numbers(show_line_numbers)
                .theme_colors(editor_colors)
                .scroll_to(source_target)
                .mode_notifier(notifier)
                .show(ui)
        };
        let show_preview = |ui: &mut egui::Ui| {
            preview.show(ui, &colors, theme, font_size, preview_target)
        };

        match view_mode {
            ViewMode::Split => {
                let output = SplitView::new("markpane_split", split_ratio).show(
                    ctx,
                    show_editor,
                    show_preview,
                );
                self.state.set_split_ratio(output.ratio);
                (Some(output.left), Some(output.right))
            }
            ViewMode::Editor => {
                let output = egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, show_editor);
                (Some(output.inner), None)
            }
            ViewMode::Preview => {
                let output = egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, show_preview);
                (None, Some(output.inner))
            }
        }
    }

    /// Feed pane reports into state, mode tracking and scroll sync.
    fn process_pane_output(
        &mut self,
        ctx: &egui::Context,
        editor: Option<EditorOutput>,
        preview: Option<ScrollMetrics>,
        now: Instant,
    ) {
        let mut reports = Vec::with_capacity(2);

        match editor {
            Some(output) => {
                if output.changed {
                    self.state.content_edited();
                    // The preview picks the edit up on the next frame
                    ctx.request_repaint();
                }
                self.state.set_cursor(output.cursor);
                self.mode_watcher.observe(now);
                self.state.set_mode(self.mode_watcher.current());
                reports.push((Pane::Source, output.scroll));
            }
            None => {
                self.mode_probe.observe(now);
                self.state.set_mode(self.mode_probe.current());
            }
        }

        if let Some(metrics) = preview {
            reports.push((Pane::Preview, metrics));
        }

        if self.scroll.report_frame(&reports, now) {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for MarkpaneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.theme_manager.apply_if_needed(ctx);

        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        self.update_window_state(ctx);

        if let Some(action) = detect_shortcut(ctx) {
            self.handle_action(action);
        }

        if let Some(wait) = self.scroll.settle(now) {
            ctx.request_repaint_after(wait);
        }

        self.preview.sync(self.state.document());

        let colors = self.theme_manager.colors();

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.toolbar.show(
                    ui,
                    ToolbarState {
                        colors: &colors,
                        theme_icon: self.theme_manager.icon(),
                        view_mode: self.state.settings.view_mode,
                        sync_enabled: self.state.settings.sync_scroll_enabled,
                    },
                )
            })
            .inner;

        let stats = self.text_stats();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let document = self.state.document();
            let info = StatusInfo {
                stats,
                cursor: document.cursor,
                mode: document.mode,
                sync_enabled: self.state.settings.sync_scroll_enabled,
                toast: self.state.ui.toast_message.as_deref(),
            };
            StatusBar::show(ui, &info, &colors);
        });

        let (editor, preview) = self.render_panes(ctx);
        self.process_pane_output(ctx, editor, preview, now);

        if let Some(action) = toolbar_action {
            self.handle_action(action);
        }

        if self.state.ui.toast_expires_at.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.save_settings_if_dirty();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(30)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateEvent;

    const SETTLE: Duration = Duration::from_millis(100);

    fn source(offset: f32) -> (Pane, ScrollMetrics) {
        (Pane::Source, ScrollMetrics::new(offset, 2000.0, 500.0))
    }

    fn preview(offset: f32) -> (Pane, ScrollMetrics) {
        (Pane::Preview, ScrollMetrics::new(offset, 1000.0, 500.0))
    }

    fn split_link() -> ScrollLink {
        let mut link = ScrollLink::new(true, SETTLE);
        link.set_visible(ViewMode::Split);
        link
    }

    #[test]
    fn test_first_frame_is_baseline_only() {
        let mut link = split_link();
        assert!(!link.report_frame(&[source(0.0), preview(0.0)], Instant::now()));
        assert_eq!(link.take_target(Pane::Preview), None);
    }

    #[test]
    fn test_source_scroll_queues_preview_offset() {
        let mut link = split_link();
        let now = Instant::now();
        link.report_frame(&[source(0.0), preview(0.0)], now);

        assert!(link.report_frame(&[source(750.0), preview(0.0)], now));
        assert_eq!(link.take_target(Pane::Preview), Some(250.0));
        // Taken once
        assert_eq!(link.take_target(Pane::Preview), None);
        assert_eq!(link.take_target(Pane::Source), None);
    }

    #[test]
    fn test_echo_is_not_forwarded_back() {
        let mut link = split_link();
        let now = Instant::now();
        link.report_frame(&[source(0.0), preview(0.0)], now);
        link.report_frame(&[source(750.0), preview(0.0)], now);
        let target = link.take_target(Pane::Preview).unwrap();

        // Next frame the preview arrives at the target
        let later = now + Duration::from_millis(16);
        assert!(!link.report_frame(&[source(750.0), preview(target)], later));
        assert_eq!(link.take_target(Pane::Source), None);

        // After settling, a user scroll of the preview is forwarded again
        let user = later + Duration::from_millis(16);
        assert!(link.report_frame(&[source(750.0), preview(500.0)], user));
        assert_eq!(link.take_target(Pane::Source), Some(1500.0));
    }

    #[test]
    fn test_toggle_drops_pending_targets() {
        let mut link = split_link();
        let now = Instant::now();
        link.report_frame(&[source(0.0), preview(0.0)], now);
        link.report_frame(&[source(750.0), preview(0.0)], now);

        assert!(!link.toggle());
        assert_eq!(link.take_target(Pane::Preview), None);
        assert!(link.toggle());
    }

    #[test]
    fn test_clear_document_only_publishes_real_change() {
        let mut state = AppState::with_settings(Settings::default());
        let mut link = split_link();
        let rx = state.subscribe();

        assert!(clear_document(&mut state, &mut link));
        let version = state.document().version();
        assert!(state.document().content().is_empty());

        assert!(!clear_document(&mut state, &mut link));
        assert_eq!(state.document().version(), version);
        assert!(state.document().needs_focus);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![StateEvent::ContentChanged { version }]);
    }

    #[test]
    fn test_disabled_link_never_queues() {
        let mut link = split_link();
        link.set_enabled(false);
        let now = Instant::now();
        link.report_frame(&[source(0.0), preview(0.0)], now);
        for offset in [100.0, 400.0, 1200.0] {
            assert!(!link.report_frame(&[source(offset), preview(0.0)], now));
        }
        assert_eq!(link.take_target(Pane::Preview), None);
    }

    #[test]
    fn test_hidden_peer_receives_nothing() {
        let mut link = ScrollLink::new(true, SETTLE);
        link.set_visible(ViewMode::Editor);
        let now = Instant::now();
        link.report_frame(&[source(0.0)], now);
        assert!(!link.report_frame(&[source(600.0)], now));
        assert_eq!(link.take_target(Pane::Preview), None);
    }

    #[test]
    fn test_hiding_pane_drops_its_pending_target() {
        let mut link = split_link();
        let now = Instant::now();
        link.report_frame(&[source(0.0), preview(0.0)], now);
        link.report_frame(&[source(750.0), preview(0.0)], now);

        link.set_visible(ViewMode::Editor);
        assert_eq!(link.take_target(Pane::Preview), None);
    }

    #[test]
    fn test_settle_reports_pending_deadline() {
        let mut link = split_link();
        let now = Instant::now();
        link.report_frame(&[source(0.0), preview(0.0)], now);
        link.report_frame(&[source(750.0), preview(0.0)], now);

        assert_eq!(link.settle(now), Some(SETTLE));
        // Echo never arrived; the timeout releases the guard
        assert_eq!(link.settle(now + SETTLE), None);
    }

    #[test]
    fn test_preview_without_overflow_ignores_targets() {
        let mut link = split_link();
        let now = Instant::now();
        let short_preview = (Pane::Preview, ScrollMetrics::new(0.0, 400.0, 600.0));
        link.report_frame(&[source(0.0), short_preview], now);
        assert!(!link.report_frame(&[source(900.0), short_preview], now));
        assert_eq!(link.take_target(Pane::Preview), None);
    }
}
