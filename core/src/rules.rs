use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TabletopError;

pub const CANVAS_WIDTH_DEFAULT: f32 = 800.0;
pub const CANVAS_HEIGHT_DEFAULT: f32 = 600.0;

pub const CELL_SIZE_DEFAULT: f32 = 25.0;
pub const CELL_SIZE_MIN: f32 = 1.0;

pub const MIN_ROOM_CELLS_DEFAULT: usize = 11;

pub const PROXIMITY_RANGE_DEFAULT: f32 = 150.0;
pub const PROXIMITY_RANGE_MIN: f32 = 50.0;
pub const PROXIMITY_RANGE_MAX: f32 = 300.0;
pub const PROXIMITY_RANGE_STEP: f32 = 25.0;

pub const SNAP_GRID_DEFAULT: f32 = 25.0;
pub const MOVE_SPEED_DEFAULT: f32 = 3.0;
pub const AVATAR_MARGIN_DEFAULT: f32 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabletopRules {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_min_room_cells")]
    pub min_room_cells: usize,
    #[serde(
        default = "default_proximity_range",
        deserialize_with = "deserialize_proximity_range"
    )]
    pub proximity_range: f32,
    #[serde(default = "default_snap_grid")]
    pub snap_grid: f32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_avatar_margin")]
    pub avatar_margin: f32,
}

impl Default for TabletopRules {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH_DEFAULT,
            canvas_height: CANVAS_HEIGHT_DEFAULT,
            cell_size: CELL_SIZE_DEFAULT,
            min_room_cells: MIN_ROOM_CELLS_DEFAULT,
            proximity_range: PROXIMITY_RANGE_DEFAULT,
            snap_grid: SNAP_GRID_DEFAULT,
            move_speed: MOVE_SPEED_DEFAULT,
            avatar_margin: AVATAR_MARGIN_DEFAULT,
        }
    }
}

impl TabletopRules {
    pub fn validate(&self) -> Result<(), TabletopError> {
        if !(self.canvas_width > 0.0) || !(self.canvas_height > 0.0) {
            return Err(TabletopError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if !(self.cell_size >= CELL_SIZE_MIN) {
            return Err(TabletopError::InvalidCellSize(self.cell_size));
        }
        if !(self.snap_grid > 0.0) {
            return Err(TabletopError::InvalidSnapGrid(self.snap_grid));
        }
        Ok(())
    }

    pub fn set_proximity_range(&mut self, value: f32) {
        self.proximity_range = clamp_proximity_range(value);
    }
}

/// Snaps to the slider step and keeps the range inside the supported window.
pub fn clamp_proximity_range(value: f32) -> f32 {
    if !value.is_finite() {
        return PROXIMITY_RANGE_DEFAULT;
    }
    let stepped = (value / PROXIMITY_RANGE_STEP).round() * PROXIMITY_RANGE_STEP;
    stepped.clamp(PROXIMITY_RANGE_MIN, PROXIMITY_RANGE_MAX)
}

fn deserialize_proximity_range<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_proximity_range)
}

fn default_canvas_width() -> f32 {
    CANVAS_WIDTH_DEFAULT
}

fn default_canvas_height() -> f32 {
    CANVAS_HEIGHT_DEFAULT
}

fn default_cell_size() -> f32 {
    CELL_SIZE_DEFAULT
}

fn default_min_room_cells() -> usize {
    MIN_ROOM_CELLS_DEFAULT
}

fn default_proximity_range() -> f32 {
    PROXIMITY_RANGE_DEFAULT
}

fn default_snap_grid() -> f32 {
    SNAP_GRID_DEFAULT
}

fn default_move_speed() -> f32 {
    MOVE_SPEED_DEFAULT
}

fn default_avatar_margin() -> f32 {
    AVATAR_MARGIN_DEFAULT
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn proximity_range_snaps_and_clamps() {
        assert_eq!(clamp_proximity_range(10.0), PROXIMITY_RANGE_MIN);
        assert_eq!(clamp_proximity_range(162.0), 150.0);
        assert_eq!(clamp_proximity_range(990.0), PROXIMITY_RANGE_MAX);
        assert_eq!(clamp_proximity_range(f32::NAN), PROXIMITY_RANGE_DEFAULT);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let rules: TabletopRules =
            serde_json::from_str(r#"{"proximityRange": 200, "cellSize": 20}"#).expect("rules");
        assert_eq!(rules.proximity_range, 200.0);
        assert_eq!(rules.cell_size, 20.0);
        assert_eq!(rules.canvas_width, CANVAS_WIDTH_DEFAULT);
        assert_eq!(rules.min_room_cells, MIN_ROOM_CELLS_DEFAULT);
    }

    #[test]
    fn loaded_proximity_range_is_clamped() {
        let rules: TabletopRules =
            serde_json::from_str(r#"{"proximityRange": 1000}"#).expect("rules");
        assert_eq!(rules.proximity_range, PROXIMITY_RANGE_MAX);
        let rules: TabletopRules =
            serde_json::from_str(r#"{"proximityRange": 10}"#).expect("rules");
        assert_eq!(rules.proximity_range, PROXIMITY_RANGE_MIN);
    }

    #[test]
    fn validate_rejects_degenerate_canvas() {
        let mut rules = TabletopRules::default();
        assert!(rules.validate().is_ok());
        rules.canvas_height = 0.0;
        assert_matches!(rules.validate(), Err(TabletopError::InvalidCanvas { .. }));
        rules.canvas_height = 600.0;
        rules.cell_size = 0.5;
        assert_matches!(rules.validate(), Err(TabletopError::InvalidCellSize(_)));
    }
}
