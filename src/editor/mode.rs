//! Editing-mode observation
//!
//! The status bar shows a mode label (`NORMAL`, `INSERT`, `VISUAL`) derived
//! from the editor widget's focus and selection. Nothing here implements
//! modal editing; the label is observed, never enforced.
//!
//! Two delivery strategies are supported:
//!
//! - **Push**: the editor widget owns a [`ModeNotifier`] and sends a message
//!   whenever the derived mode changes. Zero staleness.
//! - **Polling**: a [`ModeSource`] is queried every `interval`. The interval is
//!   the staleness bound of the displayed label.

use eframe::egui;
use log::debug;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Editing Mode
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditingMode {
    /// Editor is not focused
    #[default]
    Normal,
    /// Editor is focused with a collapsed cursor
    Insert,
    /// Editor is focused with a non-empty selection
    Visual,
}

impl EditingMode {
    pub fn derive(focused: bool, has_selection: bool) -> Self {
        match (focused, has_selection) {
            (false, _) => EditingMode::Normal,
            (true, false) => EditingMode::Insert,
            (true, true) => EditingMode::Visual,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditingMode::Normal => "NORMAL",
            EditingMode::Insert => "INSERT",
            EditingMode::Visual => "VISUAL",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Push Strategy
// ─────────────────────────────────────────────────────────────────────────────

/// Sending half of the push strategy, held by the editor widget's owner.
#[derive(Debug)]
pub struct ModeNotifier {
    tx: Sender<EditingMode>,
    last: Option<EditingMode>,
}

impl ModeNotifier {
    /// Report the current mode. Only changes are sent.
    pub fn notify(&mut self, mode: EditingMode) {
        if self.last == Some(mode) {
            return;
        }
        self.last = Some(mode);
        if self.tx.send(mode).is_err() {
            debug!("Mode watcher dropped, notification discarded");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polling Strategy
// ─────────────────────────────────────────────────────────────────────────────

/// Something that can report the editor's current mode on demand.
pub trait ModeSource {
    fn current_mode(&self) -> EditingMode;
}

/// Reads the mode of a `TextEdit` straight out of egui memory.
pub struct TextEditProbe {
    ctx: egui::Context,
    id: egui::Id,
}

impl TextEditProbe {
    pub fn new(ctx: egui::Context, id: egui::Id) -> Self {
        Self { ctx, id }
    }
}

impl ModeSource for TextEditProbe {
    fn current_mode(&self) -> EditingMode {
        let focused = self.ctx.memory(|m| m.has_focus(self.id));
        let has_selection = egui::text_edit::TextEditState::load(&self.ctx, self.id)
            .and_then(|state| state.cursor.char_range())
            .map(|range| range.primary.index != range.secondary.index)
            .unwrap_or(false);
        EditingMode::derive(focused, has_selection)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode Watcher
// ─────────────────────────────────────────────────────────────────────────────

enum Strategy {
    Push(Receiver<EditingMode>),
    Poll {
        source: Box<dyn ModeSource>,
        interval: Duration,
        last_poll: Option<Instant>,
    },
}

/// Tracks the editor's mode with either delivery strategy.
pub struct ModeWatcher {
    strategy: Strategy,
    current: EditingMode,
}

impl ModeWatcher {
    /// Create a push-driven watcher and the notifier that feeds it.
    pub fn push() -> (Self, ModeNotifier) {
        let (tx, rx) = mpsc::channel();
        let watcher = Self {
            strategy: Strategy::Push(rx),
            current: EditingMode::default(),
        };
        (watcher, ModeNotifier { tx, last: None })
    }

    /// Create a watcher that queries `source` at most once per `interval`.
    pub fn polling(source: Box<dyn ModeSource>, interval: Duration) -> Self {
        Self {
            strategy: Strategy::Poll {
                source,
                interval,
                last_poll: None,
            },
            current: EditingMode::default(),
        }
    }

    pub fn current(&self) -> EditingMode {
        self.current
    }

    /// Longest time the reported mode can lag behind the editor.
    pub fn staleness_bound(&self) -> Duration {
        match &self.strategy {
            Strategy::Push(_) => Duration::ZERO,
            Strategy::Poll { interval, .. } => *interval,
        }
    }

    /// Drain pending notifications or poll if due.
    ///
    /// Returns the new mode when it differs from the last observed one.
    pub fn observe(&mut self, now: Instant) -> Option<EditingMode> {
        let latest = match &mut self.strategy {
            Strategy::Push(rx) => {
                let mut latest = None;
                loop {
                    match rx.try_recv() {
                        Ok(mode) => latest = Some(mode),
                        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                    }
                }
                latest
            }
            Strategy::Poll {
                source,
                interval,
                last_poll,
            } => {
                let due = last_poll.map_or(true, |last| now.duration_since(last) >= *interval);
                if due {
                    *last_poll = Some(now);
                    Some(source.current_mode())
                } else {
                    None
                }
            }
        }?;

        if latest == self.current {
            return None;
        }
        debug!("Editing mode {} -> {}", self.current.label(), latest.label());
        self.current = latest;
        Some(latest)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
