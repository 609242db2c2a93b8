//! Synthetic key event types.
//!
//! Events carry the same fields a DOM `KeyboardEvent` would: the key itself,
//! its `Key*` code and the legacy `which` char code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single printable key that a finger can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeySymbol(char);

impl KeySymbol {
    /// Create a key symbol from a printable, non-whitespace character.
    pub fn new(c: char) -> Result<Self, KeySymbolError> {
        if c.is_control() || c.is_whitespace() {
            return Err(KeySymbolError::NotPrintable(c));
        }
        Ok(Self(c))
    }

    /// Build a symbol from a character already known to be printable.
    pub(crate) const fn literal(c: char) -> Self {
        Self(c)
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// DOM-style code, e.g. `KeyA` for `a`.
    pub fn code(&self) -> String {
        let upper: String = self.0.to_uppercase().collect();
        format!("Key{upper}")
    }

    /// Legacy `which` value: the character's code point.
    pub fn which(&self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for KeySymbol {
    type Error = KeySymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeySymbol::new(c),
            _ => Err(KeySymbolError::NotSingleChar(value)),
        }
    }
}

impl From<KeySymbol> for String {
    fn from(key: KeySymbol) -> Self {
        key.0.to_string()
    }
}

/// Errors raised when parsing a key symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeySymbolError {
    #[error("key symbol must be exactly one character, got {0:?}")]
    NotSingleChar(String),
    #[error("key symbol {0:?} is not printable")]
    NotPrintable(char),
}

/// Whether an event is a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEventKind {
    #[serde(rename = "keydown")]
    Down,
    #[serde(rename = "keyup")]
    Up,
}

/// A synthetic key event delivered to an [`InputSink`](crate::input::InputSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: KeySymbol,
    pub code: String,
    pub which: u32,
    /// Set only on key-downs re-emitted by a repeat timer.
    pub repeat: bool,
    pub timestamp: DateTime<Utc>,
}

impl KeyEvent {
    pub fn down(key: KeySymbol) -> Self {
        Self::new(KeyEventKind::Down, key, false)
    }

    pub fn up(key: KeySymbol) -> Self {
        Self::new(KeyEventKind::Up, key, false)
    }

    /// A repeat of this event, stamped now.
    pub fn repeated(&self) -> Self {
        Self {
            repeat: true,
            timestamp: Utc::now(),
            ..self.clone()
        }
    }

    pub fn is_down(&self) -> bool {
        self.kind == KeyEventKind::Down
    }

    fn new(kind: KeyEventKind, key: KeySymbol, repeat: bool) -> Self {
        Self {
            kind,
            key,
            code: key.code(),
            which: key.which(),
            repeat,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_symbol_codes() {
        let a = KeySymbol::new('a').unwrap();
        assert_eq!(a.code(), "KeyA");
        assert_eq!(a.which(), 97);
        assert_eq!(a.to_string(), "a");
    }

    #[test]
    fn test_key_symbol_parsing() {
        assert!(KeySymbol::try_from("w".to_string()).is_ok());
        assert!(matches!(
            KeySymbol::try_from("ww".to_string()),
            Err(KeySymbolError::NotSingleChar(_))
        ));
        assert!(matches!(
            KeySymbol::try_from(String::new()),
            Err(KeySymbolError::NotSingleChar(_))
        ));
        assert!(matches!(
            KeySymbol::new(' '),
            Err(KeySymbolError::NotPrintable(' '))
        ));
    }

    #[test]
    fn test_key_symbol_serde() {
        let key: KeySymbol = serde_json::from_str("\"d\"").unwrap();
        assert_eq!(key.as_char(), 'd');
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"d\"");
        assert!(serde_json::from_str::<KeySymbol>("\"dd\"").is_err());
    }

    #[test]
    fn test_repeated_event_keeps_key() {
        let down = KeyEvent::down(KeySymbol::new('s').unwrap());
        assert!(!down.repeat);
        let again = down.repeated();
        assert!(again.repeat);
        assert!(again.is_down());
        assert_eq!(again.code, "KeyS");
    }
}
