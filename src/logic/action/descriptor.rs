//! Action Descriptors
//!
//! What a profile maps a motion label to. Parsed from the same strings a
//! user types into a profile file: `"space"`, `"left_click"`, `"a"`,
//! `"hello world"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logic::error::MotionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Shift,
    Control,
    Alt,
    Command,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

impl NamedKey {
    fn parse(s: &str) -> Option<Self> {
        let key = match s {
            "space" => NamedKey::Space,
            "enter" | "return" => NamedKey::Enter,
            "tab" => NamedKey::Tab,
            "backspace" => NamedKey::Backspace,
            "delete" => NamedKey::Delete,
            "esc" | "escape" => NamedKey::Escape,
            "shift" => NamedKey::Shift,
            "ctrl" | "control" => NamedKey::Control,
            "alt" => NamedKey::Alt,
            "cmd" | "command" => NamedKey::Command,
            "up" => NamedKey::Up,
            "down" => NamedKey::Down,
            "left" => NamedKey::Left,
            "right" => NamedKey::Right,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "page_up" | "pageup" => NamedKey::PageUp,
            "page_down" | "pagedown" => NamedKey::PageDown,
            _ => return None,
        };
        Some(key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamedKey::Space => "space",
            NamedKey::Enter => "enter",
            NamedKey::Tab => "tab",
            NamedKey::Backspace => "backspace",
            NamedKey::Delete => "delete",
            NamedKey::Escape => "esc",
            NamedKey::Shift => "shift",
            NamedKey::Control => "ctrl",
            NamedKey::Alt => "alt",
            NamedKey::Command => "cmd",
            NamedKey::Up => "up",
            NamedKey::Down => "down",
            NamedKey::Left => "left",
            NamedKey::Right => "right",
            NamedKey::Home => "home",
            NamedKey::End => "end",
            NamedKey::PageUp => "page_up",
            NamedKey::PageDown => "page_down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left_click",
            MouseButton::Right => "right_click",
            MouseButton::Middle => "middle_click",
        }
    }
}

/// A resolved action for the input-injection collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionDescriptor {
    /// Press and release a named key
    Key(NamedKey),
    /// Press and release a single character key
    Char(char),
    /// Click a mouse button
    Mouse(MouseButton),
    /// Type literal text
    Text(String),
}

impl FromStr for ActionDescriptor {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MotionError::InvalidAction(s.to_string()));
        }

        let lower = s.to_lowercase();
        let action = match lower.as_str() {
            "left_click" => ActionDescriptor::Mouse(MouseButton::Left),
            "right_click" => ActionDescriptor::Mouse(MouseButton::Right),
            "middle_click" => ActionDescriptor::Mouse(MouseButton::Middle),
            other => match NamedKey::parse(other) {
                Some(key) => ActionDescriptor::Key(key),
                None => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => ActionDescriptor::Char(c),
                        _ => ActionDescriptor::Text(s.to_string()),
                    }
                }
            },
        };
        Ok(action)
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionDescriptor::Key(key) => f.write_str(key.as_str()),
            ActionDescriptor::Char(c) => write!(f, "{}", c),
            ActionDescriptor::Mouse(button) => f.write_str(button.as_str()),
            ActionDescriptor::Text(text) => f.write_str(text),
        }
    }
}

impl TryFrom<String> for ActionDescriptor {
    type Error = MotionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ActionDescriptor> for String {
    fn from(action: ActionDescriptor) -> Self {
        action.to_string()
    }
}
