use crate::element::{doors, walls, RoomElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyGrid {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: f32,
    cells: Vec<Cell>,
}

impl OccupancyGrid {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = axis_cells(width, cell_size);
        let rows = axis_cells(height, cell_size);
        Self {
            cols,
            rows,
            cell_size,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    pub fn set(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = cell;
    }

    pub fn is_empty_at(&self, col: usize, row: usize) -> bool {
        self.get(col, row) == Some(Cell::Empty)
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == Cell::Wall).count()
    }

    pub fn cell_index(&self, value: f32) -> i64 {
        (value / self.cell_size).floor() as i64
    }
}

fn axis_cells(extent: f32, cell_size: f32) -> usize {
    if !(extent > 0.0) {
        return 0;
    }
    (extent / cell_size).ceil() as usize
}

/// Marks wall samples, then reopens the cells under every passable door.
/// Walls are clipped to the canvas first; a wall lying on the right or bottom
/// edge lands in the last column or row.
pub fn rasterize(
    elements: &[RoomElement],
    width: f32,
    height: f32,
    cell_size: f32,
) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(width, height, cell_size);
    if grid.cols == 0 || grid.rows == 0 {
        return grid;
    }
    let last_col = grid.cols as i64 - 1;
    let last_row = grid.rows as i64 - 1;

    for wall in walls(elements) {
        let Some(((x1, y1), (x2, y2))) = clip_segment(wall.start(), wall.end(), width, height)
        else {
            continue;
        };
        let dx = x2 - x1;
        let dy = y2 - y1;
        let steps = dx.abs().max(dy.abs());
        let samples = steps.floor() as usize;
        for i in 0..=samples {
            let t = if steps > 0.0 { i as f32 / steps } else { 0.0 };
            let col = grid.cell_index(x1 + dx * t).min(last_col);
            let row = grid.cell_index(y1 + dy * t).min(last_row);
            grid.set(col, row, Cell::Wall);
        }
    }

    for door in doors(elements).filter(|door| door.is_passable()) {
        let start_col = grid.cell_index(door.x).max(0);
        let start_row = grid.cell_index(door.y).max(0);
        let end_col = grid.cell_index(door.x + door.width).min(last_col);
        let end_row = grid.cell_index(door.y + door.height).min(last_row);
        for row in start_row..=end_row {
            for col in start_col..=end_col {
                grid.set(col, row, Cell::Empty);
            }
        }
    }

    grid
}

/// Liang-Barsky clip of a segment against `[0, width] x [0, height]`.
fn clip_segment(
    start: (f32, f32),
    end: (f32, f32),
    width: f32,
    height: f32,
) -> Option<((f32, f32), (f32, f32))> {
    if ![start.0, start.1, end.0, end.1].iter().all(|value| value.is_finite()) {
        return None;
    }
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let edges = [
        (-dx, start.0),
        (dx, width - start.0),
        (-dy, start.1),
        (dy, height - start.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let lerp = |t: f32| {
        let x = (start.0 + dx * t).clamp(0.0, width);
        let y = (start.1 + dy * t).clamp(0.0, height);
        (x, y)
    };
    let first = if t0 > 0.0 { lerp(t0) } else { start };
    let last = if t1 < 1.0 { lerp(t1) } else { end };
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Door, Wall};

    #[test]
    fn grid_size_rounds_up() {
        let grid = OccupancyGrid::new(810.0, 600.0, 25.0);
        assert_eq!((grid.cols, grid.rows), (33, 24));
    }

    #[test]
    fn horizontal_wall_marks_a_continuous_row() {
        let elements = vec![RoomElement::Wall(Wall::new("w", 100.0, 100.0, 300.0, 100.0))];
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        for col in 4..=12 {
            assert_eq!(grid.get(col, 4), Some(Cell::Wall), "col {col}");
        }
        assert_eq!(grid.get(3, 4), Some(Cell::Empty));
        assert_eq!(grid.get(13, 4), Some(Cell::Empty));
        assert_eq!(grid.wall_count(), 9);
    }

    #[test]
    fn walls_outside_the_canvas_are_skipped() {
        let elements = vec![RoomElement::Wall(Wall::new("w", -50.0, 10.0, 900.0, 10.0))];
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        assert_eq!(grid.wall_count(), 32);
    }

    #[test]
    fn walls_on_the_far_edges_use_the_last_cells() {
        let elements = vec![
            RoomElement::Wall(Wall::new("right", 800.0, 0.0, 800.0, 600.0)),
            RoomElement::Wall(Wall::new("bottom", 0.0, 600.0, 800.0, 600.0)),
        ];
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        assert_eq!(grid.get(31, 10), Some(Cell::Wall));
        assert_eq!(grid.get(10, 23), Some(Cell::Wall));
        assert_eq!(grid.wall_count(), 24 + 32 - 1);
    }

    #[test]
    fn huge_elements_are_clipped_to_the_grid() {
        let elements = vec![
            RoomElement::Wall(Wall::new("w", -1.0e5, 10.0, 1.0e5, 10.0)),
            RoomElement::Wall(Wall::new("far", -1.0e9, -1.0e9, -1.0e9, 1.0e9)),
        ];
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        assert_eq!(grid.wall_count(), 32);

        let mut elements = elements;
        elements.push(RoomElement::Door(Door::new("d", -1.0e7, -1.0e7, 2.0e7, 2.0e7)));
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn zero_length_wall_marks_one_cell() {
        let elements = vec![RoomElement::Wall(Wall::new("w", 60.0, 60.0, 60.0, 60.0))];
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        assert_eq!(grid.wall_count(), 1);
        assert_eq!(grid.get(2, 2), Some(Cell::Wall));
    }

    #[test]
    fn passable_door_reopens_wall_cells() {
        let wall = RoomElement::Wall(Wall::new("w", 100.0, 100.0, 300.0, 100.0));
        let mut door = Door::new("d", 175.0, 100.0, 50.0, 25.0);
        let elements = [wall.clone(), RoomElement::Door(door.clone())];
        let grid = rasterize(&elements, 800.0, 600.0, 25.0);
        for col in 7..=9 {
            assert_eq!(grid.get(col, 4), Some(Cell::Empty));
        }

        door.toggle_lock();
        let grid = rasterize(&[wall, RoomElement::Door(door)], 800.0, 600.0, 25.0);
        for col in 7..=9 {
            assert_eq!(grid.get(col, 4), Some(Cell::Wall));
        }
    }
}
