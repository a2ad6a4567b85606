use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::{Action, Control};

/// A keyboard key, identified by its lowercase character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(char);

impl Key {
    pub const W: Key = Key('w');
    pub const A: Key = Key('a');
    pub const S: Key = Key('s');
    pub const D: Key = Key('d');
    pub const Q: Key = Key('q');
    pub const E: Key = Key('e');
    pub const C: Key = Key('c');
    pub const P: Key = Key('p');

    pub fn new(c: char) -> Self {
        Self(c.to_ascii_lowercase())
    }

    /// Parse a single-character key name.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Self::new(c)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

/// Key to control table.
///
/// Serialized as a map from key character to control name. Keys are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Key, Control>", into = "BTreeMap<Key, Control>")]
pub struct KeyBindings {
    bindings: BTreeMap<Key, Control>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from(BTreeMap::from([
            (Key::W, Control::MoveForward),
            (Key::A, Control::TurnLeft),
            (Key::D, Control::TurnRight),
            (Key::Q, Control::ZoomIn),
            (Key::E, Control::ZoomOut),
            (Key::S, Control::ToggleCameraLock),
            (Key::C, Control::CycleShader),
            (Key::P, Control::CycleSpawn),
        ]))
    }
}

impl From<BTreeMap<Key, Control>> for KeyBindings {
    fn from(raw: BTreeMap<Key, Control>) -> Self {
        Self {
            bindings: raw
                .into_iter()
                .map(|(k, c)| (Key::new(k.as_char()), c))
                .collect(),
        }
    }
}

impl From<KeyBindings> for BTreeMap<Key, Control> {
    fn from(kb: KeyBindings) -> Self {
        kb.bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: Key, control: Control) -> Option<Control> {
        self.bindings.insert(Key::new(key.as_char()), control)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Control> {
        self.bindings.remove(&Key::new(key.as_char()))
    }

    pub fn control(&self, key: Key) -> Option<Control> {
        self.bindings.get(&Key::new(key.as_char())).copied()
    }

    /// First key bound to `control`, in key order.
    pub fn key_for(&self, control: Control) -> Option<Key> {
        self.bindings
            .iter()
            .find_map(|(k, c)| (*c == control).then_some(*k))
    }

    /// Translate a key edge into an action.
    pub fn map(&self, key: Key, pressed: bool) -> Action {
        match self.control(key) {
            Some(control) => control.action(pressed),
            None => {
                tracing::trace!(key = %key.as_char(), pressed, "unbound key");
                Action::Noop
            }
        }
    }
}
