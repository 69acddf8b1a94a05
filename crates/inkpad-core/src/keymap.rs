//! Keyboard mapping.
//!
//! Bindings are written as strings like `"mod+shift+z"`. `mod` is the
//! platform's primary modifier: Cmd on macOS, Ctrl elsewhere.

use crate::command::Command;
use crate::config::Config;
use inkpad_doc::Mark;
use std::collections::HashMap;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool, // Cmd on macOS, Win on Windows
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// The primary modifier.
    #[cfg(target_os = "macos")]
    pub const MOD: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    /// The primary modifier.
    #[cfg(not(target_os = "macos"))]
    pub const MOD: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Returns these modifiers with shift added.
    pub const fn with_shift(self) -> Self {
        Modifiers {
            shift: true,
            ..self
        }
    }

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Adds a single modifier name. Returns false for unknown names.
    fn add(&mut self, name: &str) -> bool {
        match name {
            "mod" => {
                let primary = Modifiers::MOD;
                self.ctrl |= primary.ctrl;
                self.meta |= primary.meta;
            }
            "ctrl" | "control" => self.ctrl = true,
            "alt" | "option" => self.alt = true,
            "shift" => self.shift = true,
            "meta" | "cmd" | "command" | "win" => self.meta = true,
            _ => return false,
        }
        true
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            #[cfg(target_os = "macos")]
            parts.push("Cmd");
            #[cfg(not(target_os = "macos"))]
            parts.push("Win");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Space,
}

impl Key {
    /// Parses a key from a string. Letters are case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" | "bs" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "space" => Some(Key::Space),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Space => write!(f, "Space"),
        }
    }
}

/// A key press event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press. Character keys are lowercased so that
    /// `shift+z` matches however the platform reports the letter.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_lowercase().next().unwrap_or(c)),
            other => other,
        };
        Self { key, modifiers }
    }

    /// Parses a binding string like `"mod+b"` or `` "mod+`" ``.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        // The key itself may be "+", so split off the last segment by hand
        let (mods, key) = match s.rsplit_once('+') {
            Some((mods, "")) => (mods.strip_suffix('+')?, "+"),
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };

        let mut modifiers = Modifiers::NONE;
        for name in mods.split('+').filter(|name| !name.is_empty()) {
            if !modifiers.add(&name.trim().to_lowercase()) {
                return None;
            }
        }
        Some(Self::new(Key::parse(key)?, modifiers))
    }
}

impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// A key binding maps a key press to a command.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyPress,
    pub command: Command,
}

/// Hotkey lookup.
pub struct Keymap {
    bindings: HashMap<KeyPress, Command>,
}

impl Keymap {
    /// Creates a keymap with the default bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap
    }

    /// Creates a keymap from configuration. User bindings override defaults.
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        for (key_str, cmd_str) in &config.keyboard.bindings {
            match (KeyPress::parse(key_str), Command::parse(cmd_str)) {
                (Some(key), Some(command)) => {
                    keymap.bindings.insert(key, command);
                }
                _ => tracing::warn!("Ignoring invalid key binding {:?} = {:?}", key_str, cmd_str),
            }
        }

        keymap
    }

    fn add_default_bindings(&mut self) {
        let primary = Modifiers::MOD;
        let bindings = [
            (Key::Char('b'), primary, Command::ToggleMark(Mark::Bold)),
            (Key::Char('i'), primary, Command::ToggleMark(Mark::Italic)),
            (Key::Char('u'), primary, Command::ToggleMark(Mark::Underlined)),
            (Key::Char('`'), primary, Command::ToggleMark(Mark::Code)),
            (Key::Char('z'), primary, Command::Undo),
            (Key::Char('z'), primary.with_shift(), Command::Redo),
            (Key::Char('y'), primary, Command::Redo),
            (Key::Char('s'), primary, Command::Save),
        ];

        for (key, modifiers, command) in bindings {
            self.bindings.insert(KeyPress::new(key, modifiers), command);
        }
    }

    /// Returns the command bound to a key press.
    pub fn process(&self, key: &KeyPress) -> Option<Command> {
        self.bindings.get(key).cloned()
    }

    /// Returns all bindings.
    pub fn bindings(&self) -> Vec<KeyBinding> {
        self.bindings
            .iter()
            .map(|(key, command)| KeyBinding {
                key: key.clone(),
                command: command.clone(),
            })
            .collect()
    }

    /// Adds or replaces a binding.
    pub fn add_binding(&mut self, binding: KeyBinding) {
        self.bindings.insert(binding.key, binding.command);
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
