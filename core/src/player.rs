use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub username: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default)]
    pub is_deafened: bool,
    #[serde(default)]
    pub is_speaking: bool,
}

impl Player {
    pub fn new(id: impl Into<String>, username: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            x,
            y,
            is_muted: false,
            is_deafened: false,
            is_speaking: false,
        }
    }

    pub fn pos(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

pub fn player_by_id<'a>(players: &'a [Player], id: &str) -> Option<&'a Player> {
    players.iter().find(|player| player.id == id)
}
