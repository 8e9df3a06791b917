pub mod assignment;
pub mod door;
pub mod element;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod grid;
pub mod partition;
pub mod player;
pub mod rules;
pub mod scene;

pub use assignment::{assign_players, build_layout, resolve_room, RoomDetector, RoomLayout};
pub use door::{DoorInteraction, DoorState};
pub use element::{Door, DoorOrientation, RoomElement, Wall};
pub use error::TabletopError;
pub use gate::{
    audio_links, check_move, players_in_range, proximity_gain, AudioLink, MoveBlock, MoveOutcome,
};
pub use geometry::{boxes_overlap, segments_intersect, Bounds};
pub use grid::{rasterize, Cell, OccupancyGrid};
pub use partition::{detect_rooms, detect_rooms_with_rules, Room, OUTSIDE_ROOM_ID};
pub use player::Player;
pub use rules::TabletopRules;
pub use scene::Scene;
