use tabletop_core::element::{door_from_drag, room_walls_from_drag, snap_to_grid};
use tabletop_core::{Bounds, Door, Wall};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildTool {
    Wall,
    Door,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragGesture {
    start: (f32, f32),
    current: (f32, f32),
}

#[derive(Clone, Debug, PartialEq)]
pub enum BuildResult {
    Room { room_id: String, walls: [Wall; 4] },
    Door(Door),
}

/// Admin build tool and the drag in progress, if any.
#[derive(Clone, Debug, Default)]
pub struct BuildState {
    tool: Option<BuildTool>,
    drag: Option<DragGesture>,
}

impl BuildState {
    pub fn tool(&self) -> Option<BuildTool> {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Option<BuildTool>) {
        self.tool = tool;
        self.drag = None;
    }

    pub fn is_building(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drawing_tool(&self) -> Option<BuildTool> {
        self.tool.filter(|tool| *tool != BuildTool::Delete)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, snap: f32) -> bool {
        if self.drawing_tool().is_none() {
            return false;
        }
        let point = (snap_to_grid(x, snap), snap_to_grid(y, snap));
        self.drag = Some(DragGesture {
            start: point,
            current: point,
        });
        true
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, snap: f32) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.current = (snap_to_grid(x, snap), snap_to_grid(y, snap));
                true
            }
            None => false,
        }
    }

    /// Finishes the drag. `seq` keeps generated ids unique within the session.
    /// The tool stays selected so several rooms can be drawn in a row.
    pub fn pointer_up(&mut self, x: f32, y: f32, snap: f32, seq: u64) -> Option<BuildResult> {
        let drag = self.drag.take()?;
        let end = (snap_to_grid(x, snap), snap_to_grid(y, snap));
        match self.drawing_tool()? {
            BuildTool::Wall => {
                let room_id = format!("room-{seq}");
                room_walls_from_drag(&room_id, drag.start, end)
                    .map(|walls| BuildResult::Room { room_id, walls })
            }
            BuildTool::Door => {
                door_from_drag(&format!("door-{seq}"), drag.start, end, snap).map(BuildResult::Door)
            }
            BuildTool::Delete => None,
        }
    }

    /// Outline shown while dragging, at least one snap cell on each axis.
    pub fn preview(&self, snap: f32) -> Option<Bounds> {
        self.drawing_tool()?;
        let drag = self.drag?;
        let width = snap_to_grid((drag.current.0 - drag.start.0).abs(), snap).max(snap);
        let height = snap_to_grid((drag.current.1 - drag.start.1).abs(), snap).max(snap);
        let left = drag.start.0.min(drag.current.0);
        let top = drag.start.1.min(drag.current.1);
        Some(Bounds::new(left, top, left + width, top + height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pointer_is_ignored_without_a_drawing_tool() {
        let mut state = BuildState::default();
        assert!(!state.pointer_down(100.0, 100.0, 25.0));
        state.set_tool(Some(BuildTool::Delete));
        assert!(!state.pointer_down(100.0, 100.0, 25.0));
        assert!(state.pointer_up(200.0, 200.0, 25.0, 1).is_none());
    }

    #[test]
    fn wall_drag_snaps_and_builds_a_room() {
        let mut state = BuildState::default();
        state.set_tool(Some(BuildTool::Wall));
        assert!(state.pointer_down(103.0, 98.0, 25.0));
        assert!(state.pointer_move(240.0, 240.0, 25.0));
        assert_eq!(state.preview(25.0), Some(Bounds::new(100.0, 100.0, 250.0, 250.0)));
        let result = state.pointer_up(296.0, 305.0, 25.0, 7);
        assert_matches!(
            result,
            Some(BuildResult::Room { ref room_id, ref walls })
                if room_id == "room-7" && walls[0].x2 == 300.0
        );
        assert!(!state.is_building());
        assert_eq!(state.tool(), Some(BuildTool::Wall));
    }

    #[test]
    fn click_in_place_builds_nothing() {
        let mut state = BuildState::default();
        state.set_tool(Some(BuildTool::Wall));
        state.pointer_down(100.0, 100.0, 25.0);
        assert!(state.pointer_up(104.0, 96.0, 25.0, 1).is_none());
    }

    #[test]
    fn door_drag_builds_door() {
        let mut state = BuildState::default();
        state.set_tool(Some(BuildTool::Door));
        state.pointer_down(175.0, 100.0, 25.0);
        let result = state.pointer_up(225.0, 100.0, 25.0, 3);
        assert_matches!(
            result,
            Some(BuildResult::Door(ref door)) if door.id == "door-3" && door.width == 50.0
        );
    }
}
