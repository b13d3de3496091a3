//! Preview module for Markpane
//!
//! Markdown rendering, the preview pane that draws the result, and the
//! synchronized scrolling that keeps the preview aligned with the editor.

mod pane;
mod render;
mod sync_scroll;
mod syntax;

pub use pane::PreviewPane;
pub use render::{spans_text, InlineSpan, ListMarker, PreviewBlock, RenderedDocument};
pub use sync_scroll::{Pane, ScrollMetrics, ScrollSynchronizer, ScrollTracker, SyncScrollConfig};
