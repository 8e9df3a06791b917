use serde::Serialize;
use tracing::debug;

use crate::assignment::RoomLayout;
use crate::element::{doors, walls, RoomElement};
use crate::geometry::{boxes_overlap, distance, segments_intersect, Bounds};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveBlock {
    Wall,
    Door,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub allowed: bool,
    pub x: f32,
    pub y: f32,
    pub blocked_by: Option<(MoveBlock, String)>,
}

impl MoveOutcome {
    fn allow(to: (f32, f32)) -> Self {
        Self {
            allowed: true,
            x: to.0,
            y: to.1,
            blocked_by: None,
        }
    }

    fn deny(from: (f32, f32), block: MoveBlock, id: &str) -> Self {
        Self {
            allowed: false,
            x: from.0,
            y: from.1,
            blocked_by: Some((block, id.to_string())),
        }
    }
}

/// All-or-nothing move check. Door crossings are detected by overlapping the
/// path's bounding box with the door rectangle.
pub fn check_move(from: (f32, f32), to: (f32, f32), elements: &[RoomElement]) -> MoveOutcome {
    let crossed_wall =
        walls(elements).find(|wall| segments_intersect(from, to, wall.start(), wall.end()));
    if let Some(wall) = crossed_wall {
        debug!(wall = %wall.id, ?from, ?to, "move blocked by wall");
        return MoveOutcome::deny(from, MoveBlock::Wall, &wall.id);
    }

    let path = Bounds::from_corners(from, to);
    let blocking_door = doors(elements)
        .find(|door| door.blocks_movement() && boxes_overlap(&path, &door.bounds()));
    if let Some(door) = blocking_door {
        debug!(door = %door.id, ?from, ?to, "move blocked by door");
        return MoveOutcome::deny(from, MoveBlock::Door, &door.id);
    }

    MoveOutcome::allow(to)
}

pub fn can_player_move_to(
    player: &Player,
    x: f32,
    y: f32,
    elements: &[RoomElement],
) -> MoveOutcome {
    check_move(player.pos(), (x, y), elements)
}

/// Linear falloff inside the range, zero at and beyond it.
pub fn distance_gain(distance: f32, range: f32) -> f32 {
    if !(range > 0.0) || !(distance < range) {
        return 0.0;
    }
    (1.0 - distance / range).max(0.0)
}

/// Gain between two players. Players in different rooms never hear each other.
pub fn proximity_gain(a: &Player, b: &Player, layout: &RoomLayout, range: f32) -> f32 {
    match (layout.room_id_of(&a.id), layout.room_id_of(&b.id)) {
        (Some(room_a), Some(room_b)) if room_a == room_b => {
            distance_gain(distance(a.pos(), b.pos()), range)
        }
        _ => 0.0,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLink {
    pub a: String,
    pub b: String,
    pub gain: f32,
}

/// Every unordered pair with a non-zero gain, in player order.
pub fn audio_links(players: &[Player], layout: &RoomLayout, range: f32) -> Vec<AudioLink> {
    let mut links = Vec::new();
    for (idx, a) in players.iter().enumerate() {
        for b in &players[idx + 1..] {
            let gain = proximity_gain(a, b, layout, range);
            if gain > 0.0 {
                links.push(AudioLink {
                    a: a.id.clone(),
                    b: b.id.clone(),
                    gain,
                });
            }
        }
    }
    links
}

/// Other players audible to `player_id`, loudest first.
pub fn players_in_range<'a>(
    player_id: &str,
    players: &'a [Player],
    layout: &RoomLayout,
    range: f32,
) -> Vec<(&'a Player, f32)> {
    let Some(me) = players.iter().find(|player| player.id == player_id) else {
        return Vec::new();
    };
    let mut nearby: Vec<(&Player, f32)> = players
        .iter()
        .filter(|other| other.id != player_id)
        .map(|other| (other, proximity_gain(me, other, layout, range)))
        .filter(|(_, gain)| *gain > 0.0)
        .collect();
    nearby.sort_by(|a, b| b.1.total_cmp(&a.1));
    nearby
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Door, Wall};
    use assert_matches::assert_matches;

    fn wall() -> RoomElement {
        RoomElement::Wall(Wall::new("w", 200.0, 0.0, 200.0, 600.0))
    }

    #[test]
    fn crossing_a_wall_is_rejected_in_full() {
        let outcome = check_move((100.0, 100.0), (300.0, 100.0), &[wall()]);
        assert!(!outcome.allowed);
        assert_eq!((outcome.x, outcome.y), (100.0, 100.0));
        assert_matches!(outcome.blocked_by, Some((MoveBlock::Wall, ref id)) if id == "w");
    }

    #[test]
    fn move_succeeds_after_wall_is_removed() {
        let outcome = check_move((100.0, 100.0), (300.0, 100.0), &[]);
        assert!(outcome.allowed);
        assert_eq!((outcome.x, outcome.y), (300.0, 100.0));
    }

    #[test]
    fn door_blocks_until_unlocked_and_opened() {
        let mut door = Door::new("d", 190.0, 80.0, 25.0, 50.0);
        let elements = [RoomElement::Door(door.clone())];
        let outcome = check_move((100.0, 100.0), (300.0, 100.0), &elements);
        assert_matches!(outcome.blocked_by, Some((MoveBlock::Door, _)));

        door.toggle_open();
        let elements = [RoomElement::Door(door.clone())];
        let outcome = check_move((100.0, 100.0), (300.0, 100.0), &elements);
        assert!(outcome.allowed);

        door.toggle_lock();
        let outcome = check_move((100.0, 100.0), (300.0, 100.0), &[RoomElement::Door(door)]);
        assert!(!outcome.allowed);
    }

    #[test]
    fn diagonal_bbox_touching_a_closed_door_is_rejected() {
        // The path passes well below the door, but its bounding box reaches it.
        let door = Door::new("d", 100.0, 0.0, 25.0, 25.0);
        let outcome = check_move((100.0, 200.0), (300.0, 10.0), &[RoomElement::Door(door)]);
        assert!(!outcome.allowed);
    }

    #[test]
    fn gain_is_linear_and_zero_at_range() {
        assert!((distance_gain(100.0, 150.0) - (1.0 - 100.0 / 150.0)).abs() < 1e-6);
        assert_eq!(distance_gain(150.0, 150.0), 0.0);
        assert_eq!(distance_gain(400.0, 150.0), 0.0);
        assert_eq!(distance_gain(0.0, 150.0), 1.0);
        assert_eq!(distance_gain(10.0, 0.0), 0.0);
    }
}
