//! Keyboard state and bindings
//!
//! The platform layer reports which keys are held and which went down this
//! frame. Bindings turn that into a `TickInput` for the simulation: movement
//! and firing follow held keys, start/restart/quit fire once per press.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    R,
    Q,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    FireUp,
    FireDown,
    FireLeft,
    FireRight,
    Start,
    Restart,
    Quit,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::FireUp,
        Action::FireDown,
        Action::FireLeft,
        Action::FireRight,
        Action::Start,
        Action::Restart,
        Action::Quit,
    ];

    /// Held actions repeat every frame; the rest trigger on the press edge
    pub const fn is_held(self) -> bool {
        !matches!(self, Action::Start | Action::Restart | Action::Quit)
    }
}

/// Keyboard snapshot for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    held: BTreeSet<Key>,
    pressed: BTreeSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with keys held since an earlier frame (no press edges)
    pub fn holding(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            held: keys.into_iter().collect(),
            pressed: BTreeSet::new(),
        }
    }

    /// Key went down this frame
    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
        self.pressed.remove(&key);
    }

    /// Forget press edges; call once the frame has been consumed
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

/// Keys bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_up: Vec<Key>,
    pub move_down: Vec<Key>,
    pub move_left: Vec<Key>,
    pub move_right: Vec<Key>,
    pub fire_up: Vec<Key>,
    pub fire_down: Vec<Key>,
    pub fire_left: Vec<Key>,
    pub fire_right: Vec<Key>,
    pub start: Vec<Key>,
    pub restart: Vec<Key>,
    pub quit: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: vec![Key::W],
            move_down: vec![Key::S],
            move_left: vec![Key::A],
            move_right: vec![Key::D],
            fire_up: vec![Key::Up],
            fire_down: vec![Key::Down],
            fire_left: vec![Key::Left],
            fire_right: vec![Key::Right],
            start: vec![Key::Space],
            restart: vec![Key::R],
            quit: vec![Key::Q, Key::Escape],
        }
    }
}

/// Two actions share a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingConflict {
    pub key: Key,
    pub first: Action,
    pub second: Action,
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[Key] {
        match action {
            Action::MoveUp => &self.move_up,
            Action::MoveDown => &self.move_down,
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::FireUp => &self.fire_up,
            Action::FireDown => &self.fire_down,
            Action::FireLeft => &self.fire_left,
            Action::FireRight => &self.fire_right,
            Action::Start => &self.start,
            Action::Restart => &self.restart,
            Action::Quit => &self.quit,
        }
    }

    /// Each key may drive at most one action
    pub fn validate(&self) -> Result<(), BindingConflict> {
        let mut seen: Vec<(Key, Action)> = Vec::new();
        for action in Action::ALL {
            for &key in self.keys_for(action) {
                if let Some(&(_, first)) = seen.iter().find(|(k, a)| *k == key && *a != action) {
                    return Err(BindingConflict {
                        key,
                        first,
                        second: action,
                    });
                }
                seen.push((key, action));
            }
        }
        Ok(())
    }

    /// Whether the action is active this frame
    pub fn active(&self, action: Action, keys: &KeyState) -> bool {
        self.keys_for(action).iter().any(|&key| {
            if action.is_held() {
                keys.is_held(key)
            } else {
                keys.was_pressed(key)
            }
        })
    }

    pub fn tick_input(&self, keys: &KeyState) -> TickInput {
        TickInput {
            up: self.active(Action::MoveUp, keys),
            down: self.active(Action::MoveDown, keys),
            left: self.active(Action::MoveLeft, keys),
            right: self.active(Action::MoveRight, keys),
            fire_up: self.active(Action::FireUp, keys),
            fire_down: self.active(Action::FireDown, keys),
            fire_left: self.active(Action::FireLeft, keys),
            fire_right: self.active(Action::FireRight, keys),
            start: self.active(Action::Start, keys),
            restart: self.active(Action::Restart, keys),
            quit: self.active(Action::Quit, keys),
        }
    }
}
