use serde::{Deserialize, Serialize};

use crate::geometry::{segments_intersect, Bounds};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Wall {
    pub fn new(id: impl Into<String>, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            id: id.into(),
            x1,
            y1,
            x2,
            y2,
        }
    }

    pub fn start(&self) -> (f32, f32) {
        (self.x1, self.y1)
    }

    pub fn end(&self) -> (f32, f32) {
        (self.x2, self.y2)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(self.start(), self.end())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorOrientation {
    Horizontal,
    Vertical,
}

impl DoorOrientation {
    pub fn from_size(width: f32, height: f32) -> Self {
        if width > height {
            DoorOrientation::Horizontal
        } else {
            DoorOrientation::Vertical
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub orientation: DoorOrientation,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub knock_requests: Vec<String>,
}

impl Door {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            orientation: DoorOrientation::from_size(width, height),
            is_locked: false,
            is_open: false,
            knock_requests: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether the partitioner treats the door as a gap in the wall line.
    pub fn is_passable(&self) -> bool {
        !self.is_locked || self.is_open
    }

    /// Whether the movement gate stops paths that cross the door.
    pub fn blocks_movement(&self) -> bool {
        self.is_locked || !self.is_open
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RoomElement {
    Wall(Wall),
    Door(Door),
}

impl RoomElement {
    pub fn id(&self) -> &str {
        match self {
            RoomElement::Wall(wall) => &wall.id,
            RoomElement::Door(door) => &door.id,
        }
    }

    pub fn as_door(&self) -> Option<&Door> {
        match self {
            RoomElement::Door(door) => Some(door),
            RoomElement::Wall(_) => None,
        }
    }

    pub fn as_door_mut(&mut self) -> Option<&mut Door> {
        match self {
            RoomElement::Door(door) => Some(door),
            RoomElement::Wall(_) => None,
        }
    }
}

pub fn walls(elements: &[RoomElement]) -> impl Iterator<Item = &Wall> {
    elements.iter().filter_map(|element| match element {
        RoomElement::Wall(wall) => Some(wall),
        RoomElement::Door(_) => None,
    })
}

pub fn doors(elements: &[RoomElement]) -> impl Iterator<Item = &Door> {
    elements.iter().filter_map(RoomElement::as_door)
}

pub fn door_mut<'a>(elements: &'a mut [RoomElement], id: &str) -> Option<&'a mut Door> {
    elements
        .iter_mut()
        .filter_map(RoomElement::as_door_mut)
        .find(|door| door.id == id)
}

pub fn remove_element(elements: &mut Vec<RoomElement>, id: &str) -> bool {
    let before = elements.len();
    elements.retain(|element| element.id() != id);
    elements.len() != before
}

pub fn snap_to_grid(value: f32, snap: f32) -> f32 {
    if snap <= 0.0 {
        return value;
    }
    (value / snap).round() * snap
}

/// Four walls outlining the dragged rectangle, or `None` for a click without drag.
pub fn room_walls_from_drag(prefix: &str, start: (f32, f32), end: (f32, f32)) -> Option<[Wall; 4]> {
    if start == end {
        return None;
    }
    let left = start.0.min(end.0);
    let top = start.1.min(end.1);
    let right = start.0.max(end.0);
    let bottom = start.1.max(end.1);
    Some([
        Wall::new(format!("{prefix}-top"), left, top, right, top),
        Wall::new(format!("{prefix}-right"), right, top, right, bottom),
        Wall::new(format!("{prefix}-bottom"), right, bottom, left, bottom),
        Wall::new(format!("{prefix}-left"), left, bottom, left, top),
    ])
}

/// Door anchored at the drag's top-left corner, sized in whole snap cells.
/// Drags shorter than one cell on both axes produce nothing.
pub fn door_from_drag(id: &str, start: (f32, f32), end: (f32, f32), snap: f32) -> Option<Door> {
    if snap <= 0.0 {
        return None;
    }
    let width = snap_to_grid((end.0 - start.0).abs(), snap);
    let height = snap_to_grid((end.1 - start.1).abs(), snap);
    if width < snap && height < snap {
        return None;
    }
    let left = start.0.min(end.0);
    let top = start.1.min(end.1);
    Some(Door::new(id, left, top, width.max(snap), height.max(snap)))
}

/// Adds the door, trimming every wall that runs through its rectangle. A wall
/// along the door's top or left edge counts; one along its bottom or right
/// edge only touches it.
/// Axis-aligned walls keep the parts outside the door span; diagonal walls are dropped.
pub fn place_door(elements: &mut Vec<RoomElement>, door: Door) {
    let rect = door.bounds();
    let mut next = Vec::with_capacity(elements.len() + 2);
    for element in elements.drain(..) {
        match element {
            RoomElement::Wall(wall) if wall_crosses_rect(&wall, &rect) => {
                next.extend(cut_wall(&wall, &rect).into_iter().map(RoomElement::Wall));
            }
            other => next.push(other),
        }
    }
    next.push(RoomElement::Door(door));
    *elements = next;
}

fn wall_crosses_rect(wall: &Wall, rect: &Bounds) -> bool {
    if wall.y1 == wall.y2 {
        let span = wall.bounds();
        return wall.y1 >= rect.min_y
            && wall.y1 < rect.max_y
            && span.max_x > rect.min_x
            && span.min_x < rect.max_x;
    }
    if wall.x1 == wall.x2 {
        let span = wall.bounds();
        return wall.x1 >= rect.min_x
            && wall.x1 < rect.max_x
            && span.max_y > rect.min_y
            && span.min_y < rect.max_y;
    }
    if rect.contains(wall.x1, wall.y1) || rect.contains(wall.x2, wall.y2) {
        return true;
    }
    let corners = [
        (rect.min_x, rect.min_y),
        (rect.max_x, rect.min_y),
        (rect.max_x, rect.max_y),
        (rect.min_x, rect.max_y),
    ];
    (0..4).any(|idx| {
        segments_intersect(wall.start(), wall.end(), corners[idx], corners[(idx + 1) % 4])
    })
}

fn cut_wall(wall: &Wall, rect: &Bounds) -> Vec<Wall> {
    let span = wall.bounds();
    let mut pieces = Vec::new();
    if wall.y1 == wall.y2 {
        if span.min_x < rect.min_x {
            let id = format!("{}-a", wall.id);
            pieces.push(Wall::new(id, span.min_x, wall.y1, rect.min_x, wall.y1));
        }
        if rect.max_x < span.max_x {
            let id = format!("{}-b", wall.id);
            pieces.push(Wall::new(id, rect.max_x, wall.y1, span.max_x, wall.y1));
        }
    } else if wall.x1 == wall.x2 {
        if span.min_y < rect.min_y {
            let id = format!("{}-a", wall.id);
            pieces.push(Wall::new(id, wall.x1, span.min_y, wall.x1, rect.min_y));
        }
        if rect.max_y < span.max_y {
            let id = format!("{}-b", wall.id);
            pieces.push(Wall::new(id, wall.x1, rect.max_y, wall.x1, span.max_y));
        }
    }
    pieces
}
