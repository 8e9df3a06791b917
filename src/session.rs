use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use tabletop_core::element::{door_mut, place_door, remove_element};
use tabletop_core::gate::{audio_links, check_move, players_in_range};
use tabletop_core::player::player_by_id;
use tabletop_core::rules::clamp_proximity_range;
use tabletop_core::{
    Bounds, Door, DoorInteraction, MoveOutcome, Player, RoomDetector, RoomElement, RoomLayout,
    TabletopRules,
};

use crate::action::{RemoteAction, TabletopAction};
use crate::audio::AudioMixer;
use crate::builder::{BuildResult, BuildState, BuildTool};
use crate::input::{clamp_to_canvas, MovementKey, MovementLoop};

pub type SessionSubscriber = Rc<dyn Fn()>;

/// Outbound calls to the collaborators this crate does not implement.
#[derive(Clone)]
pub struct TabletopHooks {
    pub on_elements_changed: Rc<dyn Fn(&[RoomElement])>,
    pub on_player_moved: Rc<dyn Fn(&str, f32, f32)>,
    pub on_audio_link: Rc<dyn Fn(&str, &str, f32)>,
    pub on_knock: Rc<dyn Fn(&str, &str)>,
}

impl TabletopHooks {
    pub fn empty() -> Self {
        Self {
            on_elements_changed: Rc::new(|_| {}),
            on_player_moved: Rc::new(|_, _, _| {}),
            on_audio_link: Rc::new(|_, _, _| {}),
            on_knock: Rc::new(|_, _| {}),
        }
    }
}

/// Local view of one tabletop: the floorplan, the players on it and the
/// local player's input state.
pub struct TabletopSession {
    rules: TabletopRules,
    local_player_id: String,
    is_admin: bool,
    elements: Vec<RoomElement>,
    players: Vec<Player>,
    detector: RoomDetector,
    builder: BuildState,
    movement: MovementLoop,
    mixer: AudioMixer,
    hooks: TabletopHooks,
    subscribers: Rc<RefCell<Vec<SessionSubscriber>>>,
    next_seq: u64,
}

impl TabletopSession {
    pub fn new(local_player: Player, is_admin: bool, rules: TabletopRules) -> Self {
        Self {
            rules,
            local_player_id: local_player.id.clone(),
            is_admin,
            elements: Vec::new(),
            players: vec![local_player],
            detector: RoomDetector::new(),
            builder: BuildState::default(),
            movement: MovementLoop::default(),
            mixer: AudioMixer::default(),
            hooks: TabletopHooks::empty(),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_seq: 1,
        }
    }

    pub fn set_hooks(&mut self, hooks: TabletopHooks) {
        self.hooks = hooks;
    }

    pub fn subscribe(&self, subscriber: SessionSubscriber) -> SessionSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        SessionSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub fn rules(&self) -> &TabletopRules {
        &self.rules
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn elements(&self) -> &[RoomElement] {
        &self.elements
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn local_player(&self) -> Option<&Player> {
        player_by_id(&self.players, &self.local_player_id)
    }

    pub fn tool(&self) -> Option<BuildTool> {
        self.builder.tool()
    }

    /// Outline of the room or door being dragged, snapped to the build grid.
    pub fn preview(&self) -> Option<Bounds> {
        self.builder.preview(self.rules.snap_grid)
    }

    /// Whether the host should schedule another animation frame.
    pub fn wants_frame(&self) -> bool {
        self.movement.is_active()
    }

    pub fn layout(&mut self) -> &RoomLayout {
        self.detector.layout(&self.elements, &self.players, &self.rules)
    }

    pub fn current_room_id(&mut self) -> Option<String> {
        let local = self.local_player_id.clone();
        self.layout().room_id_of(&local).map(str::to_string)
    }

    /// Players the local player can hear, loudest first.
    pub fn nearby(&mut self) -> Vec<(String, f32)> {
        let layout = self.detector.layout(&self.elements, &self.players, &self.rules);
        players_in_range(&self.local_player_id, &self.players, layout, self.rules.proximity_range)
            .into_iter()
            .map(|(player, gain)| (player.id.clone(), gain))
            .collect()
    }

    /// Applies one input or remote event. Returns whether anything visible changed.
    pub fn apply_action(&mut self, action: TabletopAction) -> bool {
        let changed = match action {
            TabletopAction::SelectTool { tool } => self.select_tool(tool),
            TabletopAction::PointerDown { x, y } => {
                self.is_admin && self.builder.pointer_down(x, y, self.rules.snap_grid)
            }
            TabletopAction::PointerMove { x, y } => {
                self.is_admin && self.builder.pointer_move(x, y, self.rules.snap_grid)
            }
            TabletopAction::PointerUp { x, y } => self.finish_build(x, y),
            TabletopAction::CanvasClick { x, y } => self.click_to_move(x, y),
            TabletopAction::ElementClick { element_id } => self.click_element(&element_id),
            TabletopAction::LetIn { door_id } => self.admin_door_edit(&door_id, Door::let_in),
            TabletopAction::DismissKnocks { door_id } => {
                self.admin_door_edit(&door_id, Door::dismiss_knocks)
            }
            TabletopAction::KeyDown { key } => match MovementKey::from_key(&key) {
                Some(key) => self.movement.key_down(key),
                None => false,
            },
            TabletopAction::KeyUp { key } => match MovementKey::from_key(&key) {
                Some(key) => self.movement.key_up(key),
                None => false,
            },
            TabletopAction::Frame => self.frame(),
            TabletopAction::Blur => {
                let was_active = self.movement.is_active();
                self.movement.release_all();
                was_active
            }
            TabletopAction::Remote(remote) => self.apply_remote(remote),
            TabletopAction::SetProximityRange { range } => {
                let range = clamp_proximity_range(range);
                let changed = range != self.rules.proximity_range;
                self.rules.proximity_range = range;
                if changed {
                    self.refresh_audio();
                }
                changed
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// One tick of held-key movement.
    fn frame(&mut self) -> bool {
        if !self.movement.is_active() {
            return false;
        }
        let Some(pos) = self.local_player().map(Player::pos) else {
            return false;
        };
        let target = self.movement.step(pos, &self.rules);
        if target == pos {
            return false;
        }
        trace!(?pos, ?target, "movement frame");
        self.move_local_to(target).allowed
    }

    fn click_to_move(&mut self, x: f32, y: f32) -> bool {
        if self.builder.drawing_tool().is_some() {
            return false;
        }
        let Some(pos) = self.local_player().map(Player::pos) else {
            return false;
        };
        let target = clamp_to_canvas(x, y, &self.rules);
        if target == pos {
            return false;
        }
        self.move_local_to(target).allowed
    }

    fn move_local_to(&mut self, target: (f32, f32)) -> MoveOutcome {
        let Some(pos) = self.local_player().map(Player::pos) else {
            return MoveOutcome {
                allowed: false,
                x: target.0,
                y: target.1,
                blocked_by: None,
            };
        };
        let outcome = check_move(pos, target, &self.elements);
        if outcome.allowed {
            let local = self.local_player_id.clone();
            self.set_player_pos(&local, outcome.x, outcome.y);
            (self.hooks.on_player_moved)(&self.local_player_id, outcome.x, outcome.y);
            self.refresh_audio();
        }
        outcome
    }

    fn set_player_pos(&mut self, player_id: &str, x: f32, y: f32) -> bool {
        match self.players.iter_mut().find(|player| player.id == player_id) {
            Some(player) => {
                player.x = x;
                player.y = y;
                true
            }
            None => false,
        }
    }

    fn select_tool(&mut self, tool: Option<BuildTool>) -> bool {
        if !self.is_admin || self.builder.tool() == tool {
            return false;
        }
        self.builder.set_tool(tool);
        true
    }

    fn finish_build(&mut self, x: f32, y: f32) -> bool {
        if !self.is_admin || !self.builder.is_building() {
            return false;
        }
        let seq = self.next_seq;
        match self.builder.pointer_up(x, y, self.rules.snap_grid, seq) {
            Some(BuildResult::Room { room_id, walls }) => {
                self.next_seq += 1;
                debug!(%room_id, "room walls built");
                self.elements.extend(walls.into_iter().map(RoomElement::Wall));
            }
            Some(BuildResult::Door(door)) => {
                self.next_seq += 1;
                debug!(door = %door.id, "door placed");
                place_door(&mut self.elements, door);
            }
            // The drag preview still needs clearing.
            None => return true,
        }
        self.elements_changed();
        true
    }

    fn click_element(&mut self, element_id: &str) -> bool {
        if self.is_admin && self.builder.tool() == Some(BuildTool::Delete) {
            if !remove_element(&mut self.elements, element_id) {
                return false;
            }
            debug!(element = element_id, "element deleted");
            self.elements_changed();
            return true;
        }
        let player_id = self.local_player_id.clone();
        let Some(door) = door_mut(&mut self.elements, element_id) else {
            return false;
        };
        let interaction = door.interact(&player_id, self.is_admin);
        debug!(door = element_id, ?interaction, "door clicked");
        match interaction {
            DoorInteraction::Knocked { added: false } => return false,
            DoorInteraction::Knocked { added: true } => {
                (self.hooks.on_knock)(element_id, &player_id)
            }
            DoorInteraction::LockToggled { .. } | DoorInteraction::OpenToggled { .. } => {}
        }
        self.elements_changed();
        true
    }

    fn admin_door_edit<F>(&mut self, door_id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Door),
    {
        if !self.is_admin {
            return false;
        }
        let Some(door) = door_mut(&mut self.elements, door_id) else {
            return false;
        };
        edit(door);
        self.elements_changed();
        true
    }

    fn apply_remote(&mut self, remote: RemoteAction) -> bool {
        match remote {
            RemoteAction::PlayerJoined { player } => {
                if player.id == self.local_player_id {
                    return false;
                }
                match self.players.iter_mut().find(|existing| existing.id == player.id) {
                    Some(existing) => *existing = player,
                    None => self.players.push(player),
                }
            }
            RemoteAction::PlayerLeft { player_id } => {
                if player_id == self.local_player_id {
                    return false;
                }
                let before = self.players.len();
                self.players.retain(|player| player.id != player_id);
                if self.players.len() == before {
                    return false;
                }
            }
            RemoteAction::PlayerMoved { player_id, x, y } => {
                if player_id == self.local_player_id || !self.set_player_pos(&player_id, x, y) {
                    return false;
                }
            }
            RemoteAction::ElementsReplaced { elements } => {
                self.elements = elements;
            }
        }
        self.refresh_audio();
        true
    }

    fn elements_changed(&mut self) {
        (self.hooks.on_elements_changed)(&self.elements);
        self.refresh_audio();
    }

    fn refresh_audio(&mut self) {
        let layout = self.detector.layout(&self.elements, &self.players, &self.rules);
        let local = self.local_player_id.as_str();
        let links = audio_links(&self.players, layout, self.rules.proximity_range)
            .into_iter()
            .filter(|link| link.a == local || link.b == local)
            .collect();
        for change in self.mixer.sync(links) {
            (self.hooks.on_audio_link)(&change.a, &change.b, change.gain);
        }
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }
}

pub struct SessionSubscription {
    subscriber: SessionSubscriber,
    subscribers: Rc<RefCell<Vec<SessionSubscriber>>>,
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
