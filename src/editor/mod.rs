//! Editor module for Markpane
//!
//! The source editor widget plus the small pieces the status bar reads from
//! it: text statistics, cursor position and editing mode.

mod line_numbers;
mod mode;
mod stats;
mod widget;

pub use line_numbers::count_lines;
pub use mode::{EditingMode, ModeNotifier, ModeWatcher, TextEditProbe};
pub use stats::TextStats;
pub use widget::{editor_text_id, CursorPosition, EditorOutput, EditorWidget};
