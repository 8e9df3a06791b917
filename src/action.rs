use tabletop_core::{Player, RoomElement};

use crate::builder::BuildTool;

#[derive(Clone, Debug)]
pub enum TabletopAction {
    SelectTool {
        tool: Option<BuildTool>,
    },
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    CanvasClick {
        x: f32,
        y: f32,
    },
    ElementClick {
        element_id: String,
    },
    LetIn {
        door_id: String,
    },
    DismissKnocks {
        door_id: String,
    },
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    Frame,
    /// Window blur or teardown: drop every held key.
    Blur,
    Remote(RemoteAction),
    SetProximityRange {
        range: f32,
    },
}

/// Updates that arrive from the signaling layer rather than local input.
#[derive(Clone, Debug)]
pub enum RemoteAction {
    PlayerJoined { player: Player },
    PlayerLeft { player_id: String },
    PlayerMoved { player_id: String, x: f32, y: f32 },
    ElementsReplaced { elements: Vec<RoomElement> },
}
