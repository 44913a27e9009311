//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, so every host
//! shares one binding table.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Save,
    Undo,
    Redo,
    Copy,
    Paste,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`). Nothing fires
    /// while `in_text_field` is set, so typing in a form keeps its native
    /// undo and clipboard. Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        meta: bool,
        in_text_field: bool,
    ) -> Option<ShortcutAction> {
        if in_text_field || !(ctrl || meta) {
            return None;
        }

        match key.to_ascii_lowercase().as_str() {
            "s" => Some(ShortcutAction::Save),
            "z" if shift => Some(ShortcutAction::Redo),
            "z" => Some(ShortcutAction::Undo),
            "y" => Some(ShortcutAction::Redo),
            "c" => Some(ShortcutAction::Copy),
            "v" => Some(ShortcutAction::Paste),
            _ => None,
        }
    }
}
