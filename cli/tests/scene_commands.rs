use std::process::Command;

use serde_json::Value;

fn scene_path() -> String {
    format!("{}/../demos/scene.json", env!("CARGO_MANIFEST_DIR"))
}

fn run(args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_tabletop-cli"))
        .arg("--scene")
        .arg(scene_path())
        .args(args)
        .env_remove("TABLETOP_PROXIMITY_RANGE")
        .output()
        .expect("run tabletop-cli");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn rooms_lists_outside_first() {
    let rooms = run(&["rooms"]);
    let rooms = rooms.as_array().expect("room list");
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["id"], "room-outside");
    assert_eq!(rooms[0]["players"], serde_json::json!(["p3"]));
    assert_eq!(rooms[1]["players"], serde_json::json!(["p1", "p2"]));
}

#[test]
fn move_through_wall_is_refused() {
    let outcome = run(&["move", "--player", "p1", "--x", "400", "--y", "200"]);
    assert_eq!(outcome["allowed"], false);
    assert_eq!(outcome["x"], 200.0);
}

#[test]
fn gain_is_zero_across_rooms() {
    let gain = run(&["gain", "--a", "p2", "--b", "p3"]);
    assert_eq!(gain["sameRoom"], false);
    assert_eq!(gain["gain"], 0.0);
}

#[test]
fn range_flag_changes_links() {
    let links = run(&["links"]);
    assert_eq!(links.as_array().map(Vec::len), Some(1));
    let links = run(&["links", "--proximity-range", "50"]);
    assert_eq!(links.as_array().map(Vec::len), Some(0));
}

#[test]
fn unknown_player_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_tabletop-cli"))
        .arg("--scene")
        .arg(scene_path())
        .args(["gain", "--a", "p1", "--b", "nobody"])
        .output()
        .expect("run tabletop-cli");
    assert!(!output.status.success());
}
