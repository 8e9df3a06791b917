use proptest::prelude::*;
use tabletop_core::gate::distance_gain;
use tabletop_core::{build_layout, proximity_gain, Player, TabletopRules, OUTSIDE_ROOM_ID};

proptest! {
    #[test]
    fn gain_stays_in_unit_interval(distance in 0.0f32..1000.0, range in 1.0f32..500.0) {
        let gain = distance_gain(distance, range);
        prop_assert!((0.0..=1.0).contains(&gain));
        if distance >= range {
            prop_assert_eq!(gain, 0.0);
        }
    }

    #[test]
    fn open_canvas_keeps_every_player_outside(
        positions in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..12)
    ) {
        let rules = TabletopRules::default();
        let players: Vec<Player> = positions
            .iter()
            .enumerate()
            .map(|(idx, (x, y))| Player::new(format!("p{idx}"), format!("P{idx}"), *x, *y))
            .collect();
        let layout = build_layout(&[], &players, &rules);
        prop_assert_eq!(layout.rooms.len(), 1);
        prop_assert_eq!(layout.rooms[0].players.len(), players.len());
        for player in &players {
            prop_assert_eq!(layout.room_id_of(&player.id), Some(OUTSIDE_ROOM_ID));
        }
        let last = &players[players.len() - 1];
        let gain = proximity_gain(&players[0], last, &layout, rules.proximity_range);
        prop_assert!((0.0..=1.0).contains(&gain));
    }
}
