//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every tick the key
//!   is physically down. Movement, jump and balloon lift read this.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only until the
//!   next `end_frame()`. The driver calls `end_frame()` after a tick has
//!   consumed the edges, so a press that lands between ticks is not lost.
//!
//! There is no queueing: two presses of the same key before a tick collapse
//! into one edge.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    W,
    A,
    S,
    D,
}

/// Logical controls derived from physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
    Confirm,
}

impl Control {
    pub fn keys(self) -> &'static [Key] {
        match self {
            Self::MoveLeft => &[Key::Left, Key::A],
            Self::MoveRight => &[Key::Right, Key::D],
            Self::Jump => &[Key::Up, Key::W, Key::Space],
            Self::Confirm => &[Key::Space, Key::Enter],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Replace the held set wholesale, generating edges for every key that
    /// changed. Replays use this to feed one snapshot per tick.
    pub fn set_held<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = Key>,
    {
        let next: HashSet<Key> = keys.into_iter().collect();
        let released: Vec<Key> = self.held.difference(&next).copied().collect();
        for key in released {
            self.key_up(key);
        }
        for key in next {
            self.key_down(key);
        }
    }

    /// Release every held key without producing release edges.
    pub fn clear(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn control_held(&self, control: Control) -> bool {
        control.keys().iter().any(|key| self.is_held(*key))
    }

    pub fn control_just_pressed(&self, control: Control) -> bool {
        control.keys().iter().any(|key| self.is_just_pressed(*key))
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
    }

    #[test]
    fn test_key_down_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        // Auto-repeat while held must not produce a fresh edge.
        input.key_down(Key::Space);
        assert!(input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::A);
        assert!(!input.is_just_released(Key::A));
        assert!(!input.is_held(Key::A));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::Space);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_just_pressed(Key::Space));
        assert!(input.is_held(Key::A));
        assert!(input.is_held(Key::Space));
    }

    #[test]
    fn test_controls_map_alternate_keys() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        assert!(input.control_held(Control::MoveRight));
        assert!(!input.control_held(Control::MoveLeft));

        input.key_down(Key::W);
        assert!(input.control_held(Control::Jump));
        assert!(!input.control_just_pressed(Control::Confirm));

        input.key_down(Key::Enter);
        assert!(input.control_just_pressed(Control::Confirm));
    }

    #[test]
    fn test_set_held_generates_edges_for_changes_only() {
        let mut input = InputState::new();
        input.set_held([Key::Right]);
        assert!(input.is_just_pressed(Key::Right));
        input.end_frame();

        input.set_held([Key::Right, Key::Space]);
        assert!(!input.is_just_pressed(Key::Right));
        assert!(input.is_just_pressed(Key::Space));
        input.end_frame();

        input.set_held([Key::Space]);
        assert!(input.is_just_released(Key::Right));
        assert!(!input.is_held(Key::Right));
        assert!(input.is_held(Key::Space));
    }

    #[test]
    fn test_clear_drops_everything_silently() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.clear();
        assert!(!input.is_held(Key::Left));
        assert!(!input.is_just_pressed(Key::Left));
        assert!(!input.is_just_released(Key::Left));
    }
}
