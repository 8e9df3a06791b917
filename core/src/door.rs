use crate::element::Door;

/// Observable door states. A door is never open while locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    ClosedLocked,
    ClosedUnlocked,
    OpenUnlocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorInteraction {
    LockToggled { locked: bool },
    Knocked { added: bool },
    OpenToggled { open: bool },
}

impl Door {
    pub fn state(&self) -> DoorState {
        match (self.is_locked, self.is_open) {
            (true, _) => DoorState::ClosedLocked,
            (false, false) => DoorState::ClosedUnlocked,
            (false, true) => DoorState::OpenUnlocked,
        }
    }

    /// Admin lock switch. Locking closes the door; unlocking leaves it closed.
    pub fn toggle_lock(&mut self) -> bool {
        self.is_locked = !self.is_locked;
        self.is_open = false;
        self.is_locked
    }

    /// Records a knock once per player. Returns whether the player was newly added.
    pub fn knock(&mut self, player_id: &str) -> bool {
        if self.knock_requests.iter().any(|id| id == player_id) {
            return false;
        }
        self.knock_requests.push(player_id.to_string());
        true
    }

    /// Non-admin open/close on an unlocked door. Locked doors stay untouched.
    pub fn toggle_open(&mut self) -> Option<bool> {
        if self.is_locked {
            return None;
        }
        self.is_open = !self.is_open;
        Some(self.is_open)
    }

    pub fn let_in(&mut self) {
        self.is_locked = false;
        self.is_open = true;
        self.knock_requests.clear();
    }

    pub fn dismiss_knocks(&mut self) {
        self.knock_requests.clear();
    }

    /// Click on a door: admins flip the lock, everyone else knocks on a locked
    /// door or opens/closes an unlocked one.
    pub fn interact(&mut self, player_id: &str, is_admin: bool) -> DoorInteraction {
        if is_admin {
            return DoorInteraction::LockToggled {
                locked: self.toggle_lock(),
            };
        }
        match self.toggle_open() {
            Some(open) => DoorInteraction::OpenToggled { open },
            None => DoorInteraction::Knocked {
                added: self.knock(player_id),
            },
        }
    }
}
