//! Application state management for Markpane
//!
//! `AppState` is the single owner of everything that outlives a frame: the
//! user settings, the document being edited, and transient UI state such as
//! toasts. Readers that need to react to changes call
//! [`AppState::subscribe`] and drain the returned channel.

use crate::config::{save_config_silent, save_config_to, Settings, Theme, ViewMode};
use crate::editor::{CursorPosition, EditingMode};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

/// Content shown on first launch.
pub const WELCOME_DOCUMENT: &str = "# Welcome to Markpane\n\n\
Type markdown on the left and the rendered preview follows on the right.\n\n\
- Scroll either pane and the other one keeps up\n\
- `Ctrl+Shift+T` toggles the theme\n\
- `Ctrl+Shift+S` toggles scroll sync\n\
- `Ctrl+E` cycles the view mode\n";

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The markdown document being edited.
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw markdown. Edited in place by the editor widget.
    pub content: String,
    /// Bumped on every content change
    version: u64,
    /// Cursor position reported by the editor
    pub cursor: CursorPosition,
    /// Mode label reported by the editor
    pub mode: EditingMode,
    /// Whether the editor should request focus on the next frame
    pub needs_focus: bool,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            version: 0,
            cursor: CursorPosition::default(),
            mode: EditingMode::default(),
            needs_focus: true,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record that `content` was modified in place. Returns the new version.
    pub fn record_edit(&mut self) -> u64 {
        self.version = self.version.wrapping_add(1);
        self.version
    }

    /// Replace the whole text from outside the editor.
    fn replace(&mut self, content: String) -> u64 {
        self.content = content;
        self.cursor = CursorPosition::default();
        self.record_edit()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(WELCOME_DOCUMENT)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Change notifications published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEvent {
    ThemeChanged(Theme),
    ContentChanged { version: u64 },
    CursorMoved(CursorPosition),
    ModeChanged(EditingMode),
    SyncToggled(bool),
    ViewModeChanged(ViewMode),
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Transient UI state, never persisted.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Temporary toast message (shown in the status bar)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Root coordinator for settings, document and UI state.
///
/// # Example
///
/// ```ignore
/// let mut state = AppState::with_settings(Settings::default());
/// let events = state.subscribe();
/// state.set_content("# Hello".to_string());
/// assert!(matches!(events.try_recv(), Ok(StateEvent::ContentChanged { .. })));
/// ```
#[derive(Debug)]
pub struct AppState {
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    document: Document,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    subscribers: Vec<Sender<StateEvent>>,
    /// Overrides the platform config directory when set
    config_dir: Option<PathBuf>,
}

impl AppState {
    /// Create state from already-loaded settings with the welcome document.
    pub fn with_settings(settings: Settings) -> Self {
        info!("AppState initialized with settings");
        debug!(
            "Theme: {}, View mode: {}, Sync: {}",
            settings.theme.label(),
            settings.view_mode.label(),
            settings.sync_scroll_enabled
        );
        Self {
            settings,
            ui: UiState::default(),
            document: Document::default(),
            settings_dirty: false,
            subscribers: Vec::new(),
            config_dir: None,
        }
    }

    /// Persist settings into `dir` instead of the platform config directory.
    pub fn with_config_dir(mut self, dir: PathBuf) -> Self {
        self.config_dir = Some(dir);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a reader. Every later change is delivered to the receiver.
    pub fn subscribe(&mut self) -> Receiver<StateEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, event: StateEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            debug!("Pruned {} closed subscriber(s)", pruned);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for the editor widget, which edits `content` in place.
    ///
    /// Call [`content_edited`](Self::content_edited) afterwards when the
    /// widget reports a change.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Publish an in-place edit already recorded on the document.
    pub fn content_edited(&mut self) {
        let version = self.document.version();
        self.publish(StateEvent::ContentChanged { version });
    }

    /// Replace the document text and notify subscribers.
    pub fn set_content(&mut self, content: String) {
        let version = self.document.replace(content);
        debug!("Document content replaced (version {})", version);
        self.publish(StateEvent::ContentChanged { version });
    }

    /// Replace the document text only when it differs from the current one.
    ///
    /// Returns `true` when the content changed.
    pub fn replace_content_if_changed(&mut self, content: &str) -> bool {
        if self.document.content == content {
            return false;
        }
        self.set_content(content.to_string());
        true
    }

    pub fn set_cursor(&mut self, cursor: CursorPosition) {
        if self.document.cursor != cursor {
            self.document.cursor = cursor;
            self.publish(StateEvent::CursorMoved(cursor));
        }
    }

    pub fn set_mode(&mut self, mode: EditingMode) {
        if self.document.mode != mode {
            self.document.mode = mode;
            self.publish(StateEvent::ModeChanged(mode));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Flip between light and dark, returning the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.settings.theme.toggled();
        self.settings.theme = theme;
        self.settings_dirty = true;
        info!("Theme set to {}", theme.label());
        self.publish(StateEvent::ThemeChanged(theme));
        theme
    }

    pub fn set_sync_enabled(&mut self, enabled: bool) {
        if self.settings.sync_scroll_enabled != enabled {
            self.settings.sync_scroll_enabled = enabled;
            self.settings_dirty = true;
            self.publish(StateEvent::SyncToggled(enabled));
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.settings.view_mode != mode {
            self.settings.view_mode = mode;
            self.settings_dirty = true;
            self.publish(StateEvent::ViewModeChanged(mode));
        }
    }

    /// Store a new split ratio, clamped to the allowed range.
    pub fn set_split_ratio(&mut self, ratio: f32) {
        let ratio = ratio.clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO);
        if (self.settings.split_ratio - ratio).abs() > f32::EPSILON {
            self.settings.split_ratio = ratio;
            self.settings_dirty = true;
        }
    }

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings.sanitize();
        self.settings_dirty = true;
    }

    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to the config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }

        let saved = match &self.config_dir {
            Some(dir) => match save_config_to(dir, &self.settings) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to save configuration: {}", e);
                    false
                }
            },
            None => save_config_silent(&self.settings),
        };

        if saved {
            self.settings_dirty = false;
            info!("Settings saved");
        }
        saved
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toasts
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    /// `duration` is how long to show the message in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Clear the toast once it has expired. Call every frame.
    pub fn update_toast(&mut self, current_time: f64) {
        if self
            .ui
            .toast_expires_at
            .is_some_and(|expires_at| current_time >= expires_at)
        {
            self.ui.toast_message = None;
            self.ui.toast_expires_at = None;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from;
    use tempfile::TempDir;

    fn state() -> AppState {
        AppState::with_settings(Settings::default())
    }

    fn drain(rx: &Receiver<StateEvent>) -> Vec<StateEvent> {
        rx.try_iter().collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_initial_document() {
        let state = state();
        assert_eq!(state.document().content(), WELCOME_DOCUMENT);
        assert_eq!(state.document().version(), 0);
        assert_eq!(state.document().mode, EditingMode::Normal);
        assert_eq!(state.document().cursor, CursorPosition::default());
    }

    #[test]
    fn test_set_content_publishes_version() {
        let mut state = state();
        let rx = state.subscribe();

        state.set_content("# One".to_string());
        state.set_content("# Two".to_string());

        assert_eq!(
            drain(&rx),
            vec![
                StateEvent::ContentChanged { version: 1 },
                StateEvent::ContentChanged { version: 2 },
            ]
        );
        assert_eq!(state.document().content(), "# Two");
    }

    #[test]
    fn test_replace_content_if_changed() {
        let mut state = state();
        let rx = state.subscribe();

        assert!(!state.replace_content_if_changed(WELCOME_DOCUMENT));
        assert!(drain(&rx).is_empty());

        assert!(state.replace_content_if_changed("new"));
        assert_eq!(drain(&rx), vec![StateEvent::ContentChanged { version: 1 }]);
        assert!(!state.replace_content_if_changed("new"));
    }

    #[test]
    fn test_in_place_edit_publishes() {
        let mut state = state();
        let rx = state.subscribe();

        let doc = state.document_mut();
        doc.content.push_str("more");
        doc.record_edit();
        state.content_edited();

        assert!(state.document().content().ends_with("more"));
        assert_eq!(drain(&rx), vec![StateEvent::ContentChanged { version: 1 }]);
    }

    #[test]
    fn test_cursor_and_mode_publish_only_changes() {
        let mut state = state();
        let rx = state.subscribe();
        let cursor = CursorPosition { line: 3, column: 7 };

        state.set_cursor(cursor);
        state.set_cursor(cursor);
        state.set_mode(EditingMode::Insert);
        state.set_mode(EditingMode::Insert);

        assert_eq!(
            drain(&rx),
            vec![
                StateEvent::CursorMoved(cursor),
                StateEvent::ModeChanged(EditingMode::Insert),
            ]
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_every_subscriber_receives_events() {
        let mut state = state();
        let a = state.subscribe();
        let b = state.subscribe();

        state.toggle_theme();

        assert_eq!(drain(&a), vec![StateEvent::ThemeChanged(Theme::Dark)]);
        assert_eq!(drain(&b), vec![StateEvent::ThemeChanged(Theme::Dark)]);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut state = state();
        let kept = state.subscribe();
        drop(state.subscribe());
        assert_eq!(state.subscriber_count(), 2);

        state.set_sync_enabled(false);

        assert_eq!(state.subscriber_count(), 1);
        assert_eq!(drain(&kept), vec![StateEvent::SyncToggled(false)]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toggle_theme_marks_dirty() {
        let mut state = state();
        assert!(!state.is_settings_dirty());
        assert_eq!(state.toggle_theme(), Theme::Dark);
        assert!(state.is_settings_dirty());
        assert_eq!(state.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_set_view_mode_noop_when_unchanged() {
        let mut state = state();
        let rx = state.subscribe();

        state.set_view_mode(ViewMode::Split);
        assert!(drain(&rx).is_empty());
        assert!(!state.is_settings_dirty());

        state.set_view_mode(ViewMode::Preview);
        assert_eq!(drain(&rx), vec![StateEvent::ViewModeChanged(ViewMode::Preview)]);
    }

    #[test]
    fn test_set_split_ratio_clamps() {
        let mut state = state();
        state.set_split_ratio(0.99);
        assert_eq!(state.settings.split_ratio, Settings::MAX_SPLIT_RATIO);
        state.set_split_ratio(0.0);
        assert_eq!(state.settings.split_ratio, Settings::MIN_SPLIT_RATIO);
    }

    #[test]
    fn test_update_settings_sanitizes() {
        let mut state = state();
        state.update_settings(|s| s.font_size = 1000.0);
        assert_eq!(state.settings.font_size, Settings::MAX_FONT_SIZE);
        assert!(state.is_settings_dirty());
    }

    #[test]
    fn test_save_settings_if_dirty() {
        let temp = TempDir::new().unwrap();
        let mut state = state().with_config_dir(temp.path().to_path_buf());

        assert!(!state.save_settings_if_dirty());

        state.toggle_theme();
        assert!(state.save_settings_if_dirty());
        assert!(!state.is_settings_dirty());
        assert!(!state.save_settings_if_dirty());

        let saved = load_config_from(temp.path()).unwrap();
        assert_eq!(saved.theme, Theme::Dark);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toasts
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toast_expires() {
        let mut state = state();
        state.show_toast("Copied", 10.0, 2.0);

        state.update_toast(11.0);
        assert_eq!(state.ui.toast_message.as_deref(), Some("Copied"));

        state.update_toast(12.0);
        assert!(state.ui.toast_message.is_none());
        assert!(state.ui.toast_expires_at.is_none());
    }
}
