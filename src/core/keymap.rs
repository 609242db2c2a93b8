//! Finger-to-key mapping.

use crate::input::KeySymbol;
use crate::landmarks::Finger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which key each finger presses. Fingers absent from the map press nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Finger, KeySymbol>", into = "BTreeMap<Finger, KeySymbol>")]
pub struct FingerKeyMap {
    keys: BTreeMap<Finger, KeySymbol>,
}

impl FingerKeyMap {
    /// Build a map, rejecting two fingers bound to the same key.
    pub fn new(keys: BTreeMap<Finger, KeySymbol>) -> Result<Self, KeyMapError> {
        let mut seen: BTreeMap<KeySymbol, Finger> = BTreeMap::new();
        for (&finger, &key) in &keys {
            if let Some(&first) = seen.get(&key) {
                return Err(KeyMapError::DuplicateKey {
                    key,
                    first,
                    second: finger,
                });
            }
            seen.insert(key, finger);
        }
        Ok(Self { keys })
    }

    pub fn key_for(&self, finger: Finger) -> Option<KeySymbol> {
        self.keys.get(&finger).copied()
    }

    /// Mapped fingers, index through pinky.
    pub fn iter(&self) -> impl Iterator<Item = (Finger, KeySymbol)> + '_ {
        self.keys.iter().map(|(&finger, &key)| (finger, key))
    }

    /// Every mapped key.
    pub fn keys(&self) -> impl Iterator<Item = KeySymbol> + '_ {
        self.keys.values().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for FingerKeyMap {
    /// index→a, middle→w, ring→s, pinky→d
    fn default() -> Self {
        let keys = BTreeMap::from([
            (Finger::Index, KeySymbol::literal('a')),
            (Finger::Middle, KeySymbol::literal('w')),
            (Finger::Ring, KeySymbol::literal('s')),
            (Finger::Pinky, KeySymbol::literal('d')),
        ]);
        Self { keys }
    }
}

impl TryFrom<BTreeMap<Finger, KeySymbol>> for FingerKeyMap {
    type Error = KeyMapError;

    fn try_from(keys: BTreeMap<Finger, KeySymbol>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<FingerKeyMap> for BTreeMap<Finger, KeySymbol> {
    fn from(map: FingerKeyMap) -> Self {
        map.keys
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyMapError {
    #[error("key {key} is mapped to both {} and {}", .first.name(), .second.name())]
    DuplicateKey {
        key: KeySymbol,
        first: Finger,
        second: Finger,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let map = FingerKeyMap::default();
        let pairs: Vec<(Finger, char)> = map.iter().map(|(f, k)| (f, k.as_char())).collect();
        assert_eq!(
            pairs,
            vec![
                (Finger::Index, 'a'),
                (Finger::Middle, 'w'),
                (Finger::Ring, 's'),
                (Finger::Pinky, 'd'),
            ]
        );
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let a = KeySymbol::new('a').unwrap();
        let result = FingerKeyMap::new(BTreeMap::from([(Finger::Index, a), (Finger::Ring, a)]));
        assert!(matches!(result, Err(KeyMapError::DuplicateKey { .. })));
    }

    #[test]
    fn test_serde_uses_finger_names() {
        let json = serde_json::to_string(&FingerKeyMap::default()).unwrap();
        assert!(json.contains("\"IndexFinger\":\"a\""));

        let partial: FingerKeyMap = serde_json::from_str(r#"{"PinkyFinger": "q"}"#).unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial.key_for(Finger::Index), None);
        assert_eq!(partial.key_for(Finger::Pinky).map(|k| k.as_char()), Some('q'));

        assert!(serde_json::from_str::<FingerKeyMap>(r#"{"IndexFinger": "x", "RingFinger": "x"}"#).is_err());
    }
}
