use iced::keyboard;
use std::path::PathBuf;

use inkpad_core::Command;
use inkpad_doc::Selection;

#[derive(Debug, Clone)]
pub enum Message {
    // Toolbar buttons and hotkeys
    Command(Command),

    // Keyboard
    KeyPressed(keyboard::Key, keyboard::Modifiers),
    ModifiersChanged(keyboard::Modifiers),
    Paste,

    // Ceiling input
    CeilingInputChanged(String),

    // Image URL prompt
    UrlPromptChanged(String),
    UrlPromptSubmit,
    UrlPromptCancel,

    // Image files
    FilesPicked(Vec<PathBuf>),
    FileDropped(PathBuf),
    ImageLoaded {
        name: String,
        target: Option<Selection>,
        result: Result<String, String>,
    },

    // Document area
    BlockClicked(usize),
    BlockHovered(usize),
    BlockExited(usize),

    // View
    ZoomIn,
    ZoomOut,
    ZoomReset,
}
