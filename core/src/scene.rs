use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::assignment::{build_layout, RoomLayout};
use crate::element::RoomElement;
use crate::error::TabletopError;
use crate::player::Player;
use crate::rules::TabletopRules;

/// A floorplan plus the players standing on it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub rules: TabletopRules,
    #[serde(default)]
    pub elements: Vec<RoomElement>,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Scene {
    pub fn validate(&self) -> Result<(), TabletopError> {
        self.rules.validate()?;
        let mut seen = HashSet::new();
        for element in &self.elements {
            if !seen.insert(element.id()) {
                return Err(TabletopError::DuplicateElementId(element.id().to_string()));
            }
        }
        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(player.id.as_str()) {
                return Err(TabletopError::DuplicatePlayerId(player.id.clone()));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> RoomLayout {
        build_layout(&self.elements, &self.players, &self.rules)
    }
}
