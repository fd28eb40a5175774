use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Enter,
    Escape,
    Z,
    Y,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: KeyCode,
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers {
                ctrl: false,
                shift: false,
            },
        }
    }

    pub const fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers {
                ctrl: true,
                shift: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    FinalizeText,
    CancelText,
}

/// Maps a key press to a command. While a text entry is open only Enter
/// (without Shift) and Escape are interpreted; everything else belongs to the
/// text editor.
pub fn map_key_event_to_command(text_entry_open: bool, event: KeyEvent) -> Option<KeyCommand> {
    if text_entry_open {
        return match (event.key, event.modifiers) {
            (KeyCode::Enter, KeyModifiers { shift: false, .. }) => Some(KeyCommand::FinalizeText),
            (KeyCode::Escape, _) => Some(KeyCommand::CancelText),
            _ => None,
        };
    }

    match (event.key, event.modifiers) {
        (KeyCode::Z, KeyModifiers { ctrl: true, shift: false }) => Some(KeyCommand::Undo),
        (KeyCode::Z, KeyModifiers { ctrl: true, shift: true }) => Some(KeyCommand::Redo),
        (KeyCode::Y, KeyModifiers { ctrl: true, .. }) => Some(KeyCommand::Redo),
        _ => None,
    }
}
