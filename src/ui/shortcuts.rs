//! Keyboard shortcuts
//!
//! | Keys           | Action               |
//! |----------------|----------------------|
//! | `Ctrl+Shift+T` | Toggle theme         |
//! | `Ctrl+Shift+S` | Toggle scroll sync   |
//! | `Ctrl+E`       | Cycle view mode      |
//! | `Ctrl+Shift+C` | Copy document as HTML |

use super::toolbar::ToolbarAction;
use eframe::egui::{self, Key, Modifiers};
use log::debug;

const BOUND_KEYS: [Key; 4] = [Key::T, Key::S, Key::E, Key::C];

/// Map a key press to its action.
pub fn match_shortcut(modifiers: Modifiers, key: Key) -> Option<ToolbarAction> {
    if !modifiers.ctrl || modifiers.alt {
        return None;
    }
    match (modifiers.shift, key) {
        (true, Key::T) => Some(ToolbarAction::ToggleTheme),
        (true, Key::S) => Some(ToolbarAction::ToggleSync),
        (true, Key::C) => Some(ToolbarAction::CopyHtml),
        (false, Key::E) => Some(ToolbarAction::CycleViewMode),
        _ => None,
    }
}

/// Check this frame's input for a bound shortcut.
pub fn detect_shortcut(ctx: &egui::Context) -> Option<ToolbarAction> {
    let action = ctx.input(|i| {
        BOUND_KEYS
            .iter()
            .filter(|&&key| i.key_pressed(key))
            .find_map(|&key| match_shortcut(i.modifiers, key))
    });
    if let Some(action) = action {
        debug!("Keyboard shortcut: {:?}", action);
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_shift() -> Modifiers {
        Modifiers {
            ctrl: true,
            shift: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_bound_shortcuts() {
        assert_eq!(
            match_shortcut(ctrl_shift(), Key::T),
            Some(ToolbarAction::ToggleTheme)
        );
        assert_eq!(
            match_shortcut(ctrl_shift(), Key::S),
            Some(ToolbarAction::ToggleSync)
        );
        assert_eq!(
            match_shortcut(ctrl_shift(), Key::C),
            Some(ToolbarAction::CopyHtml)
        );
        assert_eq!(
            match_shortcut(Modifiers::CTRL, Key::E),
            Some(ToolbarAction::CycleViewMode)
        );
    }

    #[test]
    fn test_plain_ctrl_c_is_not_bound() {
        // Plain Ctrl+C stays with the text editor's copy
        assert_eq!(match_shortcut(Modifiers::CTRL, Key::C), None);
        assert_eq!(match_shortcut(Modifiers::CTRL, Key::T), None);
    }

    #[test]
    fn test_requires_ctrl() {
        assert_eq!(match_shortcut(Modifiers::SHIFT, Key::T), None);
        assert_eq!(match_shortcut(Modifiers::NONE, Key::E), None);
        assert_eq!(match_shortcut(ctrl_shift(), Key::E), None);
    }

    #[test]
    fn test_alt_disables_shortcuts() {
        let modifiers = Modifiers {
            alt: true,
            ..ctrl_shift()
        };
        assert_eq!(match_shortcut(modifiers, Key::T), None);
    }
}
