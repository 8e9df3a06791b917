use serde::Serialize;
use tracing::debug;

use crate::element::RoomElement;
use crate::geometry::Bounds;
use crate::grid::{rasterize, OccupancyGrid};
use crate::rules::TabletopRules;

pub const OUTSIDE_ROOM_ID: &str = "room-outside";
pub const FIRST_ROOM_LABEL: u32 = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub bounds: Bounds,
    pub cell_count: usize,
    pub players: Vec<String>,
}

impl Room {
    pub fn outside(width: f32, height: f32) -> Self {
        Self {
            id: OUTSIDE_ROOM_ID.to_string(),
            bounds: Bounds::new(0.0, 0.0, width, height),
            cell_count: 0,
            players: Vec::new(),
        }
    }

    pub fn is_outside(&self) -> bool {
        self.id == OUTSIDE_ROOM_ID
    }
}

#[derive(Clone, Debug)]
struct Region {
    label: u32,
    cells: usize,
    min_col: usize,
    max_col: usize,
    min_row: usize,
    max_row: usize,
    touches_edge: bool,
}

pub fn detect_rooms_with_rules(elements: &[RoomElement], rules: &TabletopRules) -> Vec<Room> {
    detect_rooms(
        elements,
        rules.canvas_width,
        rules.canvas_height,
        rules.cell_size,
        rules.min_room_cells,
    )
}

/// Enclosed rooms in discovery order, preceded by `room-outside`.
pub fn detect_rooms(
    elements: &[RoomElement],
    width: f32,
    height: f32,
    cell_size: f32,
    min_cells: usize,
) -> Vec<Room> {
    let grid = rasterize(elements, width, height, cell_size);
    let regions = flood_regions(&grid);
    let mut rooms = vec![Room::outside(width, height)];
    let mut discarded = 0usize;
    for region in &regions {
        if region.touches_edge || region.cells < min_cells {
            discarded += 1;
            continue;
        }
        let size = grid.cell_size;
        rooms.push(Room {
            id: format!("room-{}", region.label),
            bounds: Bounds::new(
                region.min_col as f32 * size,
                region.min_row as f32 * size,
                region.max_col as f32 * size + size,
                region.max_row as f32 * size + size,
            ),
            cell_count: region.cells,
            players: Vec::new(),
        });
    }
    debug!(
        elements = elements.len(),
        regions = regions.len(),
        discarded,
        rooms = rooms.len() - 1,
        "room partition rebuilt"
    );
    rooms
}

fn flood_regions(grid: &OccupancyGrid) -> Vec<Region> {
    let total = grid.cols * grid.rows;
    let mut labels = vec![0u32; total];
    let mut next_label = FIRST_ROOM_LABEL;
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            if labels[row * grid.cols + col] != 0 || !grid.is_empty_at(col, row) {
                continue;
            }
            let label = next_label;
            next_label += 1;
            let mut region = Region {
                label,
                cells: 0,
                min_col: col,
                max_col: col,
                min_row: row,
                max_row: row,
                touches_edge: false,
            };
            labels[row * grid.cols + col] = label;
            stack.push((col, row));

            while let Some((c, r)) = stack.pop() {
                region.cells += 1;
                region.min_col = region.min_col.min(c);
                region.max_col = region.max_col.max(c);
                region.min_row = region.min_row.min(r);
                region.max_row = region.max_row.max(r);
                if c == 0 || r == 0 || c + 1 == grid.cols || r + 1 == grid.rows {
                    region.touches_edge = true;
                }
                for (nc, nr) in neighbors(c, r, grid.cols, grid.rows) {
                    let idx = nr * grid.cols + nc;
                    if labels[idx] == 0 && grid.is_empty_at(nc, nr) {
                        labels[idx] = label;
                        stack.push((nc, nr));
                    }
                }
            }
            regions.push(region);
        }
    }
    regions
}

fn neighbors(
    col: usize,
    row: usize,
    cols: usize,
    rows: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let up = (row > 0).then(|| (col, row - 1));
    let right = (col + 1 < cols).then(|| (col + 1, row));
    let down = (row + 1 < rows).then(|| (col, row + 1));
    let left = (col > 0).then(|| (col - 1, row));
    [up, right, down, left].into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{room_walls_from_drag, Wall};

    fn rect(prefix: &str, a: (f32, f32), b: (f32, f32)) -> Vec<RoomElement> {
        room_walls_from_drag(prefix, a, b)
            .expect("walls")
            .into_iter()
            .map(RoomElement::Wall)
            .collect()
    }

    #[test]
    fn empty_canvas_is_only_outside() {
        let rooms = detect_rooms(&[], 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, OUTSIDE_ROOM_ID);
        assert_eq!(rooms[0].bounds, Bounds::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn rectangle_of_walls_yields_one_enclosed_room() {
        let elements = rect("r", (100.0, 100.0), (300.0, 300.0));
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 2);
        assert!(rooms[0].is_outside());
        assert_eq!(rooms[1].id, "room-3");
        assert_eq!(rooms[1].bounds, Bounds::new(125.0, 125.0, 300.0, 300.0));
        assert_eq!(rooms[1].cell_count, 49);
    }

    #[test]
    fn tiny_enclosures_are_discarded() {
        // 2x2 interior cells
        let elements = rect("r", (100.0, 100.0), (175.0, 175.0));
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 1);
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 4);
        assert_eq!(rooms.len(), 2);
    }

    #[test]
    fn room_threshold_is_inclusive() {
        // 1x11 corridor
        let elements = rect("c", (100.0, 100.0), (400.0, 150.0));
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[1].cell_count, 11);
        // 1x10 corridor
        let elements = rect("c", (100.0, 100.0), (375.0, 150.0));
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn rooms_flush_with_any_canvas_edge_are_kept() {
        for (a, b) in [
            ((0.0, 0.0), (200.0, 200.0)),
            ((600.0, 400.0), (800.0, 600.0)),
            ((600.0, 0.0), (800.0, 200.0)),
            ((0.0, 400.0), (200.0, 600.0)),
        ] {
            let rooms = detect_rooms(&rect("r", a, b), 800.0, 600.0, 25.0, 11);
            assert_eq!(rooms.len(), 2, "room {a:?}-{b:?}");
            assert!(rooms[1].bounds.contains((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0));
        }
    }

    #[test]
    fn open_side_merges_with_outside() {
        let mut elements = rect("r", (100.0, 100.0), (300.0, 300.0));
        elements.retain(|element| element.id() != "r-left");
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn two_rooms_are_discovered_top_to_bottom() {
        let mut elements = rect("a", (100.0, 300.0), (300.0, 500.0));
        elements.extend(rect("b", (400.0, 50.0), (600.0, 250.0)));
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms[1].bounds.min_y, 75.0);
        assert_eq!(rooms[2].bounds.min_y, 325.0);
    }

    #[test]
    fn walls_spanning_the_canvas_split_it_without_enclosing() {
        let elements = vec![RoomElement::Wall(Wall::new("w", 400.0, 0.0, 400.0, 600.0))];
        let rooms = detect_rooms(&elements, 800.0, 600.0, 25.0, 11);
        assert_eq!(rooms.len(), 1);
    }
}
