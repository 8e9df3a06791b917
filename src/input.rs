use std::collections::BTreeSet;

use tabletop_core::TabletopRules;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MovementKey {
    Up,
    Down,
    Left,
    Right,
}

impl MovementKey {
    /// WASD, case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(MovementKey::Up),
            "s" => Some(MovementKey::Down),
            "a" => Some(MovementKey::Left),
            "d" => Some(MovementKey::Right),
            _ => None,
        }
    }
}

/// Held movement keys. The host keeps requesting animation frames while
/// `is_active` is true and stops once the last key is released.
#[derive(Clone, Debug, Default)]
pub struct MovementLoop {
    held: BTreeSet<MovementKey>,
}

impl MovementLoop {
    pub fn key_down(&mut self, key: MovementKey) -> bool {
        self.held.insert(key)
    }

    pub fn key_up(&mut self, key: MovementKey) -> bool {
        self.held.remove(&key)
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn is_held(&self, key: MovementKey) -> bool {
        self.held.contains(&key)
    }

    /// Target for one frame of held-key movement, clamped to the canvas.
    pub fn step(&self, pos: (f32, f32), rules: &TabletopRules) -> (f32, f32) {
        let speed = rules.move_speed;
        let (mut x, mut y) = pos;
        if self.is_held(MovementKey::Up) {
            y -= speed;
        }
        if self.is_held(MovementKey::Down) {
            y += speed;
        }
        if self.is_held(MovementKey::Left) {
            x -= speed;
        }
        if self.is_held(MovementKey::Right) {
            x += speed;
        }
        clamp_to_canvas(x, y, rules)
    }
}

/// Keeps avatars a margin away from the canvas edges.
pub fn clamp_to_canvas(x: f32, y: f32, rules: &TabletopRules) -> (f32, f32) {
    let margin = rules.avatar_margin;
    let max_x = (rules.canvas_width - margin).max(margin);
    let max_y = (rules.canvas_height - margin).max(margin);
    (x.clamp(margin, max_x), y.clamp(margin, max_y))
}
