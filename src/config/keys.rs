//! Parsing of keybinding strings such as `q`, `space` or `ctrl+e`.

use std::fmt;

/// A key without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character; case is significant (`f` and `F` differ)
    Char(char),
    Space,
    Enter,
    Tab,
    Esc,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    F(u8),
}

/// A key plus modifiers, as written in `[keybindings]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyBinding {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
        }
    }

    /// Parse a binding string. Modifier and named-key tokens are
    /// case-insensitive; single characters are not.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        // A lone "+" is the plus key, not a separator.
        if s == "+" {
            return Some(Self::plain(Key::Char('+')));
        }

        let mut parts: Vec<&str> = s.split('+').collect();
        let key_token = parts.pop()?;
        let mut binding = Self::plain(parse_key(key_token)?);

        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => binding.ctrl = true,
                "alt" | "meta" => binding.alt = true,
                _ => return None,
            }
        }
        Some(binding)
    }
}

fn parse_key(token: &str) -> Option<Key> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(if c == ' ' { Key::Space } else { Key::Char(c) });
    }

    let lower = token.to_ascii_lowercase();
    let key = match lower.as_str() {
        "space" => Key::Space,
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "esc" | "escape" => Key::Esc,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        _ => {
            let n: u8 = lower.strip_prefix('f')?.parse().ok()?;
            if (1..=12).contains(&n) {
                Key::F(n)
            } else {
                return None;
            }
        }
    };
    Some(key)
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c),
            Key::Space => write!(f, "Space"),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Esc => write!(f, "Esc"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Del"),
            Key::Up => write!(f, "↑"),
            Key::Down => write!(f, "↓"),
            Key::Left => write!(f, "←"),
            Key::Right => write!(f, "→"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::F(n) => write!(f, "F{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_chars_are_case_sensitive() {
        assert_eq!(KeyBinding::parse("f"), Some(KeyBinding::plain(Key::Char('f'))));
        assert_eq!(KeyBinding::parse("F"), Some(KeyBinding::plain(Key::Char('F'))));
        assert_ne!(KeyBinding::parse("f"), KeyBinding::parse("F"));
    }

    #[test]
    fn test_parse_named_keys_and_modifiers() {
        assert_eq!(KeyBinding::parse("space"), Some(KeyBinding::plain(Key::Space)));
        assert_eq!(KeyBinding::parse("Enter"), Some(KeyBinding::plain(Key::Enter)));
        assert_eq!(KeyBinding::parse("F5"), Some(KeyBinding::plain(Key::F(5))));

        let combo = KeyBinding::parse("ctrl+s").unwrap();
        assert!(combo.ctrl);
        assert!(!combo.alt);
        assert_eq!(combo.key, Key::Char('s'));
        assert_eq!(combo.to_string(), "Ctrl+s");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(KeyBinding::parse(""), None);
        assert_eq!(KeyBinding::parse("hyper+x"), None);
        assert_eq!(KeyBinding::parse("banana"), None);
        assert_eq!(KeyBinding::parse("f13"), None);
        assert_eq!(KeyBinding::parse("+"), Some(KeyBinding::plain(Key::Char('+'))));
    }
}
