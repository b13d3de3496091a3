//! UI components for Markpane
//!
//! Toolbar, status bar, split layout and keyboard shortcuts. Components
//! return what the user did and leave state changes to the app.

mod shortcuts;
mod split_view;
mod status_bar;
mod toolbar;

pub use shortcuts::detect_shortcut;
pub use split_view::SplitView;
pub use status_bar::{StatusBar, StatusInfo};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarState};
