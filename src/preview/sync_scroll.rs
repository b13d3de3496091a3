//! Bidirectional Sync Scrolling for the Editor and Preview panes
//!
//! The editor and the rendered preview almost never have the same pixel
//! height, so positions are exchanged as a normalized [`ScrollPercentage`]:
//! the scrolled pane reports `offset / (content - viewport)` and the peer
//! turns that fraction back into an offset within its own extent.
//!
//! # Feedback loops
//!
//! Applying a target offset to a pane makes that pane report a scroll of its
//! own one frame later (the "echo"). Forwarding the echo would bounce the
//! position back and forth forever, so each pane owns a guard:
//!
//! ```text
//! Idle --(local scroll)--------------> Idle         forwards percentage
//! Idle --(target received)-----------> Propagating  guard set, offset mutated
//! Propagating --(settle / timeout)---> Idle         guard cleared
//! ```
//!
//! The guard clears on a deterministic settle signal, the pane reporting an
//! offset within `settle_tolerance` of the applied target. When that report
//! never arrives (egui clamped the offset because the content shrank, or the
//! offset did not actually move) the guard falls back to `settle_timeout`.
//!
//! # Usage
//!
//! ```ignore
//! let mut sync = ScrollSynchronizer::new();
//! sync.mount(Pane::Source);
//! sync.mount(Pane::Preview);
//!
//! // Editor reported a scroll this frame
//! if let Some((peer, offset)) = sync.propagate(Pane::Source, editor_metrics, Instant::now()) {
//!     pending_offsets.set(peer, offset);
//! }
//! ```

use log::debug;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for sync scrolling behavior.
#[derive(Debug, Clone)]
pub struct SyncScrollConfig {
    /// How long a guard stays up when the settle signal never arrives
    pub settle_timeout: Duration,
    /// Distance (pixels) at which a reported offset counts as the applied target
    pub settle_tolerance: f32,
    /// Minimum offset change (pixels) that counts as a scroll notification
    pub min_scroll_delta: f32,
}

impl Default for SyncScrollConfig {
    fn default() -> Self {
        Self {
            settle_timeout: Duration::from_millis(100),
            settle_tolerance: 1.0,
            min_scroll_delta: 0.5,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Panes
// ─────────────────────────────────────────────────────────────────────────────

/// One side of the synchronized pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// The markdown source editor
    Source,
    /// The rendered preview
    Preview,
}

impl Pane {
    /// The other pane of the pair.
    pub fn peer(self) -> Pane {
        match self {
            Pane::Source => Pane::Preview,
            Pane::Preview => Pane::Source,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pane::Source => "source",
            Pane::Preview => "preview",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Percentage
// ─────────────────────────────────────────────────────────────────────────────

/// Fractional scroll progress, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ScrollPercentage(f32);

impl ScrollPercentage {
    /// Fully scrolled to the start.
    pub const START: ScrollPercentage = ScrollPercentage(0.0);
    /// Fully scrolled to the end.
    pub const END: ScrollPercentage = ScrollPercentage(1.0);

    /// Clamp `value` into range. NaN and infinities map to the start.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self::START
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Metrics
// ─────────────────────────────────────────────────────────────────────────────

/// Raw geometry of a scrollable surface, as reported by the pane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top
    pub offset: f32,
    /// Total height of the scrolled content
    pub content_extent: f32,
    /// Height of the visible viewport
    pub viewport_extent: f32,
}

impl ScrollMetrics {
    pub fn new(offset: f32, content_extent: f32, viewport_extent: f32) -> Self {
        Self {
            offset,
            content_extent,
            viewport_extent,
        }
    }

    /// Largest reachable offset; zero when the content fits the viewport.
    pub fn max_offset(&self) -> f32 {
        let overflow = self.content_extent - self.viewport_extent;
        if overflow.is_finite() && overflow > 0.0 {
            overflow
        } else {
            0.0
        }
    }

    /// Whether the surface can scroll at all.
    pub fn has_overflow(&self) -> bool {
        self.max_offset() > 0.0
    }

    /// `offset / max(1, content - viewport)`, clamped; `0.0` without overflow.
    pub fn percentage(&self) -> ScrollPercentage {
        if !self.has_overflow() {
            return ScrollPercentage::START;
        }
        ScrollPercentage::new(self.offset / self.max_offset().max(1.0))
    }

    /// Offset that puts this surface at `percentage`, never negative.
    pub fn offset_for(&self, percentage: ScrollPercentage) -> f32 {
        (percentage.value() * self.max_offset()).max(0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Tracker
// ─────────────────────────────────────────────────────────────────────────────

/// Turns a per-frame offset stream into scroll notifications.
///
/// egui reports every pane's offset on every frame; a notification is only
/// emitted when the offset moved by at least `min_delta` since the last one.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    last_offset: Option<f32>,
    min_delta: f32,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(SyncScrollConfig::default().min_scroll_delta)
    }
}

impl ScrollTracker {
    pub fn new(min_delta: f32) -> Self {
        Self {
            last_offset: None,
            min_delta,
        }
    }

    /// Record this frame's offset. Returns `true` when the pane scrolled.
    ///
    /// The first observation after creation or [`reset`](Self::reset) only
    /// establishes a baseline.
    pub fn observe(&mut self, offset: f32) -> bool {
        match self.last_offset {
            None => {
                self.last_offset = Some(offset);
                false
            }
            Some(last) if (offset - last).abs() >= self.min_delta => {
                self.last_offset = Some(offset);
                true
            }
            Some(_) => false,
        }
    }

    /// Forget the baseline (call when the pane is unmounted).
    pub fn reset(&mut self) {
        self.last_offset = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pane Guard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum GuardState {
    Idle,
    Propagating { target_offset: f32, deadline: Instant },
}

/// Per-pane feedback guard plus the pane's last reported geometry.
#[derive(Debug)]
struct PaneGuard {
    state: GuardState,
    geometry: Option<ScrollMetrics>,
}

impl PaneGuard {
    fn new() -> Self {
        Self {
            state: GuardState::Idle,
            geometry: None,
        }
    }

    fn is_suppressed(&self) -> bool {
        matches!(self.state, GuardState::Propagating { .. })
    }

    fn engage(&mut self, target_offset: f32, deadline: Instant) {
        self.state = GuardState::Propagating {
            target_offset,
            deadline,
        };
    }

    fn release(&mut self) {
        self.state = GuardState::Idle;
    }

    fn deadline(&self) -> Option<Instant> {
        match self.state {
            GuardState::Propagating { deadline, .. } => Some(deadline),
            GuardState::Idle => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll Synchronizer
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a scroll notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOutcome {
    /// The pane's normalized position at the time of the notification
    pub percentage: ScrollPercentage,
    /// The peer that should receive `percentage`, if any
    pub forward_to: Option<Pane>,
}

/// Keeps the source and preview panes of one document aligned.
#[derive(Debug)]
pub struct ScrollSynchronizer {
    enabled: bool,
    config: SyncScrollConfig,
    source: Option<PaneGuard>,
    preview: Option<PaneGuard>,
}

impl Default for ScrollSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSynchronizer {
    /// Create an enabled synchronizer with no panes mounted.
    pub fn new() -> Self {
        Self::with_config(SyncScrollConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: SyncScrollConfig) -> Self {
        Self {
            enabled: true,
            config,
            source: None,
            preview: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Enablement
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn synchronization on or off. Turning it off drops open guards.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!("Sync scrolling {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        if !enabled {
            self.release_all();
        }
    }

    /// Toggle sync scrolling on/off, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mounting
    // ─────────────────────────────────────────────────────────────────────────

    /// Create the guard for `pane`. Mounting an already mounted pane is a no-op.
    pub fn mount(&mut self, pane: Pane) {
        let slot = self.slot_mut(pane);
        if slot.is_none() {
            *slot = Some(PaneGuard::new());
            debug!("Mounted {} pane", pane.label());
        }
    }

    /// Destroy the guard for `pane`, dropping any pending settle deadline.
    pub fn unmount(&mut self, pane: Pane) {
        if self.slot_mut(pane).take().is_some() {
            debug!("Unmounted {} pane", pane.label());
        }
    }

    pub fn is_mounted(&self, pane: Pane) -> bool {
        self.slot(pane).is_some()
    }

    /// Whether `pane` is currently absorbing the echo of a programmatic scroll.
    pub fn is_suppressed(&self, pane: Pane) -> bool {
        self.slot(pane)
            .as_ref()
            .map(PaneGuard::is_suppressed)
            .unwrap_or(false)
    }

    /// Record a pane's geometry without treating it as a scroll.
    ///
    /// Panes call this every frame so that an incoming target percentage is
    /// converted against current extents.
    pub fn update_geometry(&mut self, pane: Pane, metrics: ScrollMetrics) {
        if let Some(guard) = self.slot_mut(pane) {
            guard.geometry = Some(metrics);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Propagation
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a scroll notification from `pane`.
    ///
    /// Always returns the pane's percentage. `forward_to` names the peer only
    /// when sync is enabled, the peer is mounted, and this pane is not
    /// absorbing the echo of a target it was just given.
    pub fn on_scroll(&mut self, pane: Pane, metrics: ScrollMetrics, now: Instant) -> ScrollOutcome {
        let percentage = metrics.percentage();
        let silent = ScrollOutcome {
            percentage,
            forward_to: None,
        };

        let forwarding = self.enabled && self.is_mounted(pane.peer());
        let tolerance = self.config.settle_tolerance;

        let Some(guard) = self.slot_mut(pane) else {
            return silent;
        };
        guard.geometry = Some(metrics);

        if let GuardState::Propagating {
            target_offset,
            deadline,
        } = guard.state
        {
            if (metrics.offset - target_offset).abs() <= tolerance {
                guard.release();
                debug!(
                    "{} pane settled at offset {:.1}",
                    pane.label(),
                    metrics.offset
                );
                return silent;
            }
            if now < deadline {
                debug!("Suppressed {} pane echo scroll", pane.label());
                return silent;
            }
            guard.release();
            debug!("{} pane settle timed out", pane.label());
        }

        if !forwarding {
            return silent;
        }

        ScrollOutcome {
            percentage,
            forward_to: Some(pane.peer()),
        }
    }

    /// Move `pane` to `percentage` of its scrollable extent.
    ///
    /// Returns the offset the host must apply, after raising the pane's guard.
    /// Returns `None` when nothing should change: the pane is not mounted, it
    /// has no scrollable overflow, or it already sits at the target.
    pub fn apply_target(
        &mut self,
        pane: Pane,
        metrics: ScrollMetrics,
        percentage: ScrollPercentage,
        now: Instant,
    ) -> Option<f32> {
        let timeout = self.config.settle_timeout;
        let tolerance = self.config.settle_tolerance;

        let Some(guard) = self.slot_mut(pane) else {
            debug!("Ignoring scroll target for unmounted {} pane", pane.label());
            return None;
        };
        guard.geometry = Some(metrics);

        if !metrics.has_overflow() {
            return None;
        }

        let target = metrics.offset_for(percentage);
        if (metrics.offset - target).abs() <= tolerance {
            return None;
        }

        guard.engage(target, now + timeout);
        Some(target)
    }

    /// Forward a scroll of `pane` to its peer in one step.
    ///
    /// Combines [`on_scroll`](Self::on_scroll) with
    /// [`apply_target`](Self::apply_target) against the peer's last reported
    /// geometry. Returns the peer and the offset it must scroll to.
    pub fn propagate(
        &mut self,
        pane: Pane,
        metrics: ScrollMetrics,
        now: Instant,
    ) -> Option<(Pane, f32)> {
        let outcome = self.on_scroll(pane, metrics, now);
        let peer = outcome.forward_to?;
        let peer_metrics = self.slot(peer).as_ref()?.geometry?;
        let offset = self.apply_target(peer, peer_metrics, outcome.percentage, now)?;
        debug!(
            "Sync {} -> {}: {:.3} -> offset {:.1}",
            pane.label(),
            peer.label(),
            outcome.percentage.value(),
            offset
        );
        Some((peer, offset))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settling
    // ─────────────────────────────────────────────────────────────────────────

    /// Release every guard whose fallback deadline has passed.
    ///
    /// Returns the number of guards released.
    pub fn poll_settle(&mut self, now: Instant) -> usize {
        let mut released = 0;
        for pane in [Pane::Source, Pane::Preview] {
            if let Some(guard) = self.slot_mut(pane) {
                if guard.deadline().is_some_and(|deadline| now >= deadline) {
                    guard.release();
                    released += 1;
                    debug!("{} pane guard released by timeout", pane.label());
                }
            }
        }
        released
    }

    /// Time until the earliest pending fallback deadline.
    pub fn next_settle_deadline(&self, now: Instant) -> Option<Duration> {
        [&self.source, &self.preview]
            .into_iter()
            .filter_map(|slot| slot.as_ref().and_then(PaneGuard::deadline))
            .min()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn release_all(&mut self) {
        for guard in [&mut self.source, &mut self.preview].into_iter().flatten() {
            guard.release();
        }
    }

    fn slot(&self, pane: Pane) -> &Option<PaneGuard> {
        match pane {
            Pane::Source => &self.source,
            Pane::Preview => &self.preview,
        }
    }

    fn slot_mut(&mut self, pane: Pane) -> &mut Option<PaneGuard> {
        match pane {
            Pane::Source => &mut self.source,
            Pane::Preview => &mut self.preview,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> ScrollSynchronizer {
        let mut sync = ScrollSynchronizer::new();
        sync.mount(Pane::Source);
        sync.mount(Pane::Preview);
        sync
    }

    /// A host surface that echoes programmatic scrolls the way egui does:
    /// the applied offset is clamped and reported back as a scroll.
    struct Surface {
        metrics: ScrollMetrics,
    }

    impl Surface {
        fn new(content: f32, viewport: f32) -> Self {
            Self {
                metrics: ScrollMetrics::new(0.0, content, viewport),
            }
        }

        fn set_offset(&mut self, offset: f32) -> ScrollMetrics {
            self.metrics.offset = offset.clamp(0.0, self.metrics.max_offset()).round();
            self.metrics
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Percentage
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(ScrollPercentage::new(-0.5), ScrollPercentage::START);
        assert_eq!(ScrollPercentage::new(1.7), ScrollPercentage::END);
        assert_eq!(ScrollPercentage::new(f32::NAN), ScrollPercentage::START);
        assert_eq!(ScrollPercentage::new(0.25).value(), 0.25);
    }

    #[test]
    fn test_percentage_always_in_range() {
        let samples = [
            (0.0, 2000.0, 500.0),
            (1500.0, 2000.0, 500.0),
            (9000.0, 2000.0, 500.0),
            (-40.0, 2000.0, 500.0),
            (10.0, 500.4, 500.0),
            (f32::INFINITY, 800.0, 100.0),
        ];
        for (offset, content, viewport) in samples {
            let pct = ScrollMetrics::new(offset, content, viewport).percentage();
            assert!((0.0..=1.0).contains(&pct.value()), "{:?}", pct);
        }
    }

    #[test]
    fn test_percentage_without_overflow_is_zero() {
        for offset in [0.0, 50.0, 400.0] {
            let metrics = ScrollMetrics::new(offset, 400.0, 600.0);
            assert_eq!(metrics.percentage(), ScrollPercentage::START);
        }
        assert_eq!(
            ScrollMetrics::new(30.0, 600.0, 600.0).percentage(),
            ScrollPercentage::START
        );
    }

    #[test]
    fn test_percentage_scenario() {
        let source = ScrollMetrics::new(750.0, 2000.0, 500.0);
        assert_eq!(source.percentage().value(), 0.5);

        let peer = ScrollMetrics::new(0.0, 1000.0, 500.0);
        assert_eq!(peer.offset_for(source.percentage()), 250.0);
    }

    #[test]
    fn test_offset_for_never_negative() {
        let metrics = ScrollMetrics::new(0.0, 400.0, 600.0);
        assert_eq!(metrics.offset_for(ScrollPercentage::END), 0.0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tracker
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_tracker_baseline_then_changes() {
        let mut tracker = ScrollTracker::new(0.5);
        assert!(!tracker.observe(100.0));
        assert!(!tracker.observe(100.2));
        assert!(tracker.observe(101.0));
        assert!(!tracker.observe(101.0));

        tracker.reset();
        assert!(!tracker.observe(300.0));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Forwarding
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_on_scroll_forwards_to_peer() {
        let mut sync = mounted();
        let outcome = sync.on_scroll(
            Pane::Source,
            ScrollMetrics::new(750.0, 2000.0, 500.0),
            Instant::now(),
        );
        assert_eq!(outcome.percentage.value(), 0.5);
        assert_eq!(outcome.forward_to, Some(Pane::Preview));

        let outcome = sync.on_scroll(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            Instant::now(),
        );
        assert_eq!(outcome.forward_to, Some(Pane::Source));
    }

    #[test]
    fn test_apply_target_scenario() {
        let mut sync = mounted();
        let now = Instant::now();
        let offset = sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            ScrollPercentage::new(0.5),
            now,
        );
        assert_eq!(offset, Some(250.0));
        assert!(sync.is_suppressed(Pane::Preview));
        assert!(!sync.is_suppressed(Pane::Source));
    }

    #[test]
    fn test_apply_target_without_overflow_is_ignored() {
        let mut sync = mounted();
        let metrics = ScrollMetrics::new(0.0, 400.0, 600.0);
        for pct in [0.0, 0.3, 1.0] {
            let offset =
                sync.apply_target(Pane::Preview, metrics, ScrollPercentage::new(pct), Instant::now());
            assert_eq!(offset, None);
        }
        assert!(!sync.is_suppressed(Pane::Preview));
        assert_eq!(
            sync.on_scroll(Pane::Preview, metrics, Instant::now()).percentage,
            ScrollPercentage::START
        );
    }

    #[test]
    fn test_apply_target_at_current_offset_does_not_guard() {
        let mut sync = mounted();
        let offset = sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(250.0, 1000.0, 500.0),
            ScrollPercentage::new(0.5),
            Instant::now(),
        );
        assert_eq!(offset, None);
        assert!(!sync.is_suppressed(Pane::Preview));
    }

    #[test]
    fn test_round_trip_within_pixel_tolerance() {
        let mut sync = mounted();
        let mut surface = Surface::new(1337.0, 421.0);

        for pct in [0.0, 0.1, 0.333, 0.5, 0.77, 1.0] {
            let target = ScrollPercentage::new(pct);
            let now = Instant::now();
            if let Some(offset) = sync.apply_target(Pane::Preview, surface.metrics, target, now) {
                let echoed = surface.set_offset(offset);
                sync.on_scroll(Pane::Preview, echoed, now);
            }
            let read_back = surface.metrics.percentage().value();
            let one_pixel = 1.0 / surface.metrics.max_offset();
            assert!(
                (read_back - pct).abs() <= one_pixel,
                "pct {} read back as {}",
                pct,
                read_back
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Feedback suppression
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_echo_is_not_forwarded() {
        let mut sync = mounted();
        let mut source = Surface::new(2000.0, 500.0);
        let mut preview = Surface::new(1000.0, 500.0);
        sync.update_geometry(Pane::Preview, preview.metrics);
        let now = Instant::now();

        let (peer, offset) = sync
            .propagate(Pane::Source, source.set_offset(750.0), now)
            .expect("source scroll should reach the preview");
        assert_eq!(peer, Pane::Preview);
        assert_eq!(offset, 250.0);

        // The preview reports the programmatic scroll back
        let echo = preview.set_offset(offset);
        assert_eq!(sync.propagate(Pane::Preview, echo, now), None);

        // The source stays where the user left it
        assert_eq!(source.metrics.offset, 750.0);
        assert!(!sync.is_suppressed(Pane::Preview));
    }

    #[test]
    fn test_intermediate_echo_suppressed_until_deadline() {
        let mut sync = mounted();
        let start = Instant::now();
        let target = sync
            .apply_target(
                Pane::Preview,
                ScrollMetrics::new(0.0, 1000.0, 500.0),
                ScrollPercentage::new(0.8),
                start,
            )
            .unwrap();
        assert_eq!(target, 400.0);

        // A partial move (smooth scroll) inside the settle window
        let partial = ScrollMetrics::new(120.0, 1000.0, 500.0);
        let outcome = sync.on_scroll(Pane::Preview, partial, start + Duration::from_millis(10));
        assert_eq!(outcome.forward_to, None);
        assert!(sync.is_suppressed(Pane::Preview));
    }

    #[test]
    fn test_scroll_after_timeout_is_forwarded() {
        let mut sync = mounted();
        let start = Instant::now();
        sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            ScrollPercentage::new(0.8),
            start,
        );

        // Content shrank, egui clamped the offset, the target is never reached
        let later = start + Duration::from_millis(150);
        let outcome = sync.on_scroll(Pane::Preview, ScrollMetrics::new(300.0, 800.0, 500.0), later);
        assert_eq!(outcome.forward_to, Some(Pane::Source));
        assert!(!sync.is_suppressed(Pane::Preview));
    }

    #[test]
    fn test_poll_settle_releases_expired_guards() {
        let mut sync = mounted();
        let start = Instant::now();
        sync.apply_target(
            Pane::Source,
            ScrollMetrics::new(0.0, 2000.0, 500.0),
            ScrollPercentage::new(0.5),
            start,
        );

        assert_eq!(sync.poll_settle(start + Duration::from_millis(50)), 0);
        assert!(sync.is_suppressed(Pane::Source));

        let remaining = sync.next_settle_deadline(start + Duration::from_millis(50));
        assert_eq!(remaining, Some(Duration::from_millis(50)));

        assert_eq!(sync.poll_settle(start + Duration::from_millis(100)), 1);
        assert!(!sync.is_suppressed(Pane::Source));
        assert_eq!(sync.next_settle_deadline(start), None);
    }

    #[test]
    fn test_guards_are_independent() {
        let mut sync = mounted();
        let now = Instant::now();
        sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            ScrollPercentage::new(0.5),
            now,
        );

        // The user keeps scrolling the source while the preview settles
        let outcome = sync.on_scroll(Pane::Source, ScrollMetrics::new(900.0, 2000.0, 500.0), now);
        assert_eq!(outcome.forward_to, Some(Pane::Preview));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Enablement and mounting
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_disabled_never_forwards() {
        let mut sync = mounted();
        sync.set_enabled(false);
        assert!(!sync.is_enabled());
        let now = Instant::now();

        for step in 0..200 {
            let metrics = ScrollMetrics::new(step as f32 * 7.0, 2000.0, 500.0);
            assert_eq!(sync.on_scroll(Pane::Source, metrics, now).forward_to, None);
            assert_eq!(sync.propagate(Pane::Preview, metrics, now), None);
        }
    }

    #[test]
    fn test_disabling_drops_open_guards() {
        let mut sync = mounted();
        sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            ScrollPercentage::new(0.5),
            Instant::now(),
        );
        assert!(!sync.toggle());
        assert!(!sync.is_enabled());
        assert!(!sync.is_suppressed(Pane::Preview));
        assert!(sync.toggle());
        assert!(sync.is_enabled());
    }

    #[test]
    fn test_unmounted_peer_is_silent_noop() {
        let mut sync = mounted();
        sync.unmount(Pane::Preview);
        let now = Instant::now();

        let outcome = sync.on_scroll(Pane::Source, ScrollMetrics::new(750.0, 2000.0, 500.0), now);
        assert_eq!(outcome.percentage.value(), 0.5);
        assert_eq!(outcome.forward_to, None);

        let offset = sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            ScrollPercentage::END,
            now,
        );
        assert_eq!(offset, None);
    }

    #[test]
    fn test_unmount_clears_pending_deadline() {
        let mut sync = mounted();
        let now = Instant::now();
        sync.apply_target(
            Pane::Preview,
            ScrollMetrics::new(0.0, 1000.0, 500.0),
            ScrollPercentage::new(0.5),
            now,
        );
        sync.unmount(Pane::Preview);
        assert_eq!(sync.next_settle_deadline(now), None);

        sync.mount(Pane::Preview);
        assert!(!sync.is_suppressed(Pane::Preview));
    }

    #[test]
    fn test_propagate_needs_peer_geometry() {
        let mut sync = mounted();
        // Preview has never reported its extents
        let result = sync.propagate(
            Pane::Source,
            ScrollMetrics::new(750.0, 2000.0, 500.0),
            Instant::now(),
        );
        assert_eq!(result, None);
    }
}
