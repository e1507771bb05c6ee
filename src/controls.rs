use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RemapError;

/// Discrete commands the player can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    TurnLeft,
    TurnRight,
    OpenMap,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Forward,
        Action::TurnLeft,
        Action::TurnRight,
        Action::OpenMap,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Forward => write!(f, "Move forward"),
            Action::TurnLeft => write!(f, "Turn left"),
            Action::TurnRight => write!(f, "Turn right"),
            Action::OpenMap => write!(f, "Open map"),
        }
    }
}

/// A key that can be bound to an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// An ASCII letter or digit, letters stored upper case.
    Char(char),
    Space,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Builds a key from a typed character. Letters are case-folded.
    pub fn from_char(c: char) -> Result<Key, RemapError> {
        match c {
            ' ' => Ok(Key::Space),
            c if c.is_ascii_alphanumeric() => Ok(Key::Char(c.to_ascii_uppercase())),
            _ => Err(RemapError::InvalidKey),
        }
    }

    fn is_valid(self) -> bool {
        match self {
            Key::Char(c) => c.is_ascii_digit() || c.is_ascii_uppercase(),
            _ => true,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Space => write!(f, "Space"),
            Key::Up => write!(f, "↑"),
            Key::Down => write!(f, "↓"),
            Key::Left => write!(f, "←"),
            Key::Right => write!(f, "→"),
        }
    }
}

/// Which key triggers each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMap {
    forward: Key,
    turn_left: Key,
    turn_right: Key,
    open_map: Key,
}

impl Default for ControlMap {
    fn default() -> Self {
        Self {
            forward: Key::Char('W'),
            turn_left: Key::Char('A'),
            turn_right: Key::Char('D'),
            open_map: Key::Char('M'),
        }
    }
}

impl ControlMap {
    pub fn key_for(&self, action: Action) -> Key {
        match action {
            Action::Forward => self.forward,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
            Action::OpenMap => self.open_map,
        }
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|&action| self.key_for(action) == key)
    }

    /// Bind `key` to `action`.
    ///
    /// Fails with [`RemapError::KeyTaken`] when any action, including `action`
    /// itself, already uses the key, and with [`RemapError::InvalidKey`] for a
    /// character key outside letters and digits.
    pub fn remap(&mut self, action: Action, key: Key) -> Result<(), RemapError> {
        if !key.is_valid() {
            return Err(RemapError::InvalidKey);
        }
        if let Some(taken_by) = self.action_for(key) {
            return Err(RemapError::KeyTaken { action: taken_by });
        }
        let slot = match action {
            Action::Forward => &mut self.forward,
            Action::TurnLeft => &mut self.turn_left,
            Action::TurnRight => &mut self.turn_right,
            Action::OpenMap => &mut self.open_map,
        };
        *slot = key;
        tracing::info!("[controls] {} remapped to {}", action, key);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = ControlMap::default();
    }

    /// True when every key is valid and no key is bound twice.
    pub fn is_consistent(&self) -> bool {
        Action::ALL.iter().enumerate().all(|(i, &a)| {
            self.key_for(a).is_valid()
                && Action::ALL[i + 1..]
                    .iter()
                    .all(|&b| self.key_for(a) != self.key_for(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let controls = ControlMap::default();
        assert_eq!(controls.action_for(Key::Char('W')), Some(Action::Forward));
        assert_eq!(controls.action_for(Key::Char('A')), Some(Action::TurnLeft));
        assert_eq!(controls.action_for(Key::Char('D')), Some(Action::TurnRight));
        assert_eq!(controls.action_for(Key::Char('M')), Some(Action::OpenMap));
        assert_eq!(controls.action_for(Key::Space), None);
        assert!(controls.is_consistent());
    }

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char('w'), Ok(Key::Char('W')));
        assert_eq!(Key::from_char('7'), Ok(Key::Char('7')));
        assert_eq!(Key::from_char(' '), Ok(Key::Space));
        assert_eq!(Key::from_char('%'), Err(RemapError::InvalidKey));
        assert_eq!(Key::from_char('é'), Err(RemapError::InvalidKey));
    }

    #[test]
    fn test_remap() {
        let mut controls = ControlMap::default();
        assert_eq!(controls.remap(Action::Forward, Key::Up), Ok(()));
        assert_eq!(controls.key_for(Action::Forward), Key::Up);
        assert_eq!(controls.action_for(Key::Char('W')), None);
        assert!(controls.is_consistent());
    }

    #[test]
    fn test_remap_to_taken_key_is_rejected() {
        let mut controls = ControlMap::default();
        assert_eq!(
            controls.remap(Action::Forward, Key::Char('A')),
            Err(RemapError::KeyTaken {
                action: Action::TurnLeft
            })
        );
        // Rebinding an action to its own key counts as taken too
        assert_eq!(
            controls.remap(Action::OpenMap, Key::Char('M')),
            Err(RemapError::KeyTaken {
                action: Action::OpenMap
            })
        );
        assert_eq!(controls, ControlMap::default());
    }

    #[test]
    fn test_remap_rejects_lowercase_char() {
        let mut controls = ControlMap::default();
        assert_eq!(
            controls.remap(Action::Forward, Key::Char('q')),
            Err(RemapError::InvalidKey)
        );
    }

    #[test]
    fn test_reset() {
        let mut controls = ControlMap::default();
        controls.remap(Action::TurnLeft, Key::Left).unwrap();
        controls.reset();
        assert_eq!(controls, ControlMap::default());
    }
}
