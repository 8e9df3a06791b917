use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::element::RoomElement;
use crate::partition::{detect_rooms_with_rules, Room};
use crate::player::Player;
use crate::rules::TabletopRules;

/// Rooms with their members resolved. Every player sits in exactly one room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomLayout {
    pub rooms: Vec<Room>,
    membership: HashMap<String, usize>,
}

impl RoomLayout {
    pub fn room_of(&self, player_id: &str) -> Option<&Room> {
        self.membership
            .get(player_id)
            .and_then(|idx| self.rooms.get(*idx))
    }

    pub fn room_id_of(&self, player_id: &str) -> Option<&str> {
        self.room_of(player_id).map(|room| room.id.as_str())
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }
}

/// Lookup order for a position: enclosed rooms whose bounds contain it, the
/// smallest first with ties in discovery order, then `room-outside`.
pub fn resolve_room_index(rooms: &[Room], x: f32, y: f32) -> Option<usize> {
    let enclosed = rooms
        .iter()
        .enumerate()
        .filter(|(_, room)| !room.is_outside() && room.bounds.contains(x, y))
        .min_by(|(ia, a), (ib, b)| {
            a.bounds
                .area()
                .total_cmp(&b.bounds.area())
                .then(ia.cmp(ib))
        })
        .map(|(idx, _)| idx);
    enclosed.or_else(|| rooms.iter().position(|room| room.is_outside()))
}

pub fn resolve_room(rooms: &[Room], x: f32, y: f32) -> Option<&Room> {
    resolve_room_index(rooms, x, y).and_then(|idx| rooms.get(idx))
}

pub fn assign_players(mut rooms: Vec<Room>, players: &[Player]) -> RoomLayout {
    for room in &mut rooms {
        room.players.clear();
    }
    let mut membership = HashMap::with_capacity(players.len());
    for player in players {
        if let Some(idx) = resolve_room_index(&rooms, player.x, player.y) {
            rooms[idx].players.push(player.id.clone());
            membership.insert(player.id.clone(), idx);
        }
    }
    RoomLayout { rooms, membership }
}

pub fn build_layout(
    elements: &[RoomElement],
    players: &[Player],
    rules: &TabletopRules,
) -> RoomLayout {
    assign_players(detect_rooms_with_rules(elements, rules), players)
}

/// Recomputes the partition only when elements or rules change, and the
/// assignment only when players change as well.
#[derive(Debug, Default)]
pub struct RoomDetector {
    partition_key: Option<u64>,
    partition: Vec<Room>,
    layout_key: Option<u64>,
    layout: RoomLayout,
}

impl RoomDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(
        &mut self,
        elements: &[RoomElement],
        players: &[Player],
        rules: &TabletopRules,
    ) -> &RoomLayout {
        let partition_key = partition_key(elements, rules);
        if self.partition_key != Some(partition_key) {
            self.partition = detect_rooms_with_rules(elements, rules);
            self.partition_key = Some(partition_key);
            self.layout_key = None;
        }
        let layout_key = layout_key(partition_key, players);
        if self.layout_key != Some(layout_key) {
            trace!(players = players.len(), "reassigning players to rooms");
            self.layout = assign_players(self.partition.clone(), players);
            self.layout_key = Some(layout_key);
        }
        &self.layout
    }
}

fn partition_key(elements: &[RoomElement], rules: &TabletopRules) -> u64 {
    let mut hasher = DefaultHasher::new();
    rules.canvas_width.to_bits().hash(&mut hasher);
    rules.canvas_height.to_bits().hash(&mut hasher);
    rules.cell_size.to_bits().hash(&mut hasher);
    rules.min_room_cells.hash(&mut hasher);
    elements.len().hash(&mut hasher);
    for element in elements {
        match element {
            RoomElement::Wall(wall) => {
                0u8.hash(&mut hasher);
                wall.id.hash(&mut hasher);
                for value in [wall.x1, wall.y1, wall.x2, wall.y2] {
                    value.to_bits().hash(&mut hasher);
                }
            }
            RoomElement::Door(door) => {
                1u8.hash(&mut hasher);
                door.id.hash(&mut hasher);
                for value in [door.x, door.y, door.width, door.height] {
                    value.to_bits().hash(&mut hasher);
                }
                door.is_locked.hash(&mut hasher);
                door.is_open.hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

fn layout_key(partition_key: u64, players: &[Player]) -> u64 {
    let mut hasher = DefaultHasher::new();
    partition_key.hash(&mut hasher);
    players.len().hash(&mut hasher);
    for player in players {
        player.id.hash(&mut hasher);
        player.x.to_bits().hash(&mut hasher);
        player.y.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}
