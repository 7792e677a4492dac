use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

/// Command with a small, fully populated grid: every cell in the 2x2 window
/// around the player hosts a cache.
fn geocoin(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("geocoin"));
    cmd.env_remove("RUST_LOG")
        .arg("--root")
        .arg(root)
        .arg("--tile-width")
        .arg("1")
        .arg("--radius")
        .arg("1")
        .arg("--spawn-probability")
        .arg("1")
        .arg("--max-coins")
        .arg("100");
    cmd
}

fn run(root: &Path, args: &[&str]) -> Vec<Value> {
    let assert = geocoin(root).args(args).assert().success();
    parse_jsonl(&assert.get_output().stdout)
}

fn of_kind<'a>(items: &'a [Value], kind: &str) -> Vec<&'a Value> {
    items.iter().filter(|v| v["kind"] == kind).collect()
}

fn coins(item: &Value) -> Vec<String> {
    item.get("coins")
        .and_then(|c| c.as_array())
        .map(|a| {
            a.iter()
                .map(|c| c.as_str().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn player(items: &[Value]) -> &Value {
    of_kind(items, "player")[0]
}

/// Key of some visible cache that holds at least one coin
fn cache_with_coins(items: &[Value]) -> String {
    of_kind(items, "cache")
        .into_iter()
        .find(|c| !coins(c).is_empty())
        .and_then(|c| c["key"].as_str())
        .expect("a visible cache with coins")
        .to_string()
}

fn coins_in_world(items: &[Value]) -> u64 {
    of_kind(items, "session")[0]["data"]["coins_in_world"]
        .as_u64()
        .unwrap()
}

#[test]
fn look_lists_player_then_visible_caches() {
    let temp = tempdir().unwrap();
    let items = run(temp.path(), &["look"]);

    assert_eq!(items[0]["kind"], "player");
    let keys: Vec<_> = of_kind(&items, "cache")
        .iter()
        .map(|c| c["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["35,-124", "35,-123", "36,-124", "36,-123"]);
    assert!(temp.path().join(".geocoin").join("cache_snapshots.json").exists());
}

#[test]
fn caches_are_stable_across_sessions() {
    let temp = tempdir().unwrap();
    let first = run(temp.path(), &["look"]);
    let second = run(temp.path(), &["look"]);

    assert_eq!(of_kind(&first, "cache"), of_kind(&second, "cache"));
}

#[test]
fn withdraw_persists_into_next_session() {
    let temp = tempdir().unwrap();
    let key = cache_with_coins(&run(temp.path(), &["look"]));

    let items = run(temp.path(), &["withdraw", &key]);
    let transfer = of_kind(&items, "transfer")[0];
    let taken = coins(transfer);
    assert_eq!(taken.len(), 1);

    let status = run(temp.path(), &["status"]);
    assert_eq!(coins(player(&status)), taken);
}

#[test]
fn deposit_returns_last_withdrawn_coin() {
    let temp = tempdir().unwrap();
    let look = run(temp.path(), &["look"]);
    let key = cache_with_coins(&look);
    let original = of_kind(&look, "cache")
        .into_iter()
        .find(|c| c["key"] == key.as_str())
        .map(coins)
        .unwrap();

    run(temp.path(), &["withdraw", &key]);
    let items = run(temp.path(), &["deposit", &key]);

    let cache = of_kind(&items, "cache")[0];
    assert_eq!(coins(cache), original);
    assert!(coins(player(&items)).is_empty());
}

#[test]
fn transfers_conserve_coins() {
    let temp = tempdir().unwrap();
    let before = coins_in_world(&run(temp.path(), &["status"]));

    let key = cache_with_coins(&run(temp.path(), &["look"]));
    run(temp.path(), &["withdraw", &key, "--count", "3"]);
    let after = coins_in_world(&run(temp.path(), &["status"]));

    assert_eq!(after, before);
}

#[test]
fn withdraw_from_empty_cache_moves_nothing() {
    let temp = tempdir().unwrap();
    let key = cache_with_coins(&run(temp.path(), &["look"]));

    let items = run(temp.path(), &["withdraw", &key, "--count", "1000"]);
    let transfers = of_kind(&items, "transfer");
    let last = transfers.last().unwrap();
    assert_eq!(last["message"], "withdrew nothing");
    assert!(coins(of_kind(&items, "cache")[0]).is_empty());

    let again = run(temp.path(), &["withdraw", &key]);
    assert_eq!(of_kind(&again, "transfer")[0]["message"], "withdrew nothing");
    assert_eq!(coins(player(&again)).len(), transfers.len() - 1);
}

#[test]
fn deposit_with_empty_inventory_moves_nothing() {
    let temp = tempdir().unwrap();
    let items = run(temp.path(), &["deposit", "36,-123"]);

    assert_eq!(of_kind(&items, "transfer")[0]["message"], "deposited nothing");
    assert!(coins(player(&items)).is_empty());
}

#[test]
fn move_records_trail_and_shifts_view() {
    let temp = tempdir().unwrap();
    let items = run(temp.path(), &["move", "north", "--steps", "2"]);

    let keys: Vec<_> = of_kind(&items, "cache")
        .iter()
        .map(|c| c["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["37,-124", "37,-123", "38,-124", "38,-123"]);
    assert_eq!(player(&items)["data"]["trail"], 2);
}

#[test]
fn goto_accepts_negative_coordinates() {
    let temp = tempdir().unwrap();
    let items = run(temp.path(), &["goto", "-0.5", "-0.5"]);

    let position = &player(&items)["position"];
    assert_eq!(position["lat"], -0.5);
    assert_eq!(position["lng"], -0.5);
    let keys: Vec<_> = of_kind(&items, "cache")
        .iter()
        .map(|c| c["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["-2,-2", "-2,-1", "-1,-2", "-1,-1"]);
}

#[test]
fn goto_infinity_reports_error_and_stays_put() {
    let temp = tempdir().unwrap();
    let before = run(temp.path(), &["look"]);
    let items = run(temp.path(), &["goto", "inf", "0"]);

    assert_eq!(items[0]["kind"], "error");
    assert_eq!(items[0]["errors"][0]["code"], "INVALID_POSITION");
    assert_eq!(player(&items)["position"], player(&before)["position"]);
    assert_eq!(of_kind(&items, "cache"), of_kind(&before, "cache"));

    let status = run(temp.path(), &["status"]);
    assert_eq!(player(&status)["data"]["trail"], 0);
}

#[test]
fn move_rejects_huge_step_count() {
    let temp = tempdir().unwrap();
    geocoin(temp.path())
        .args(["move", "north", "--steps", "4000000000"])
        .assert()
        .failure();
}

#[test]
fn withdraw_out_of_view_reports_error() {
    let temp = tempdir().unwrap();
    let items = run(temp.path(), &["withdraw", "0,0"]);

    let errors = of_kind(&items, "error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["errors"][0]["code"], "UNKNOWN_CACHE");
}

#[test]
fn withdraw_with_bad_key_reports_error() {
    let temp = tempdir().unwrap();
    let items = run(temp.path(), &["withdraw", "north"]);

    assert_eq!(of_kind(&items, "error")[0]["errors"][0]["code"], "INVALID_CELL_KEY");
}

#[test]
fn corrupt_field_falls_back_to_default() {
    let temp = tempdir().unwrap();
    let key = cache_with_coins(&run(temp.path(), &["look"]));
    run(temp.path(), &["withdraw", &key]);
    run(temp.path(), &["move", "east"]);

    let dir = temp.path().join(".geocoin");
    fs::write(dir.join("player_position.json"), "{\"lat\":").unwrap();

    let items = run(temp.path(), &["status"]);
    let p = player(&items);
    assert_eq!(p["position"]["lat"], 36.98949379578401);
    assert_eq!(coins(p).len(), 1);
    assert_eq!(p["data"]["trail"], 1);
}

#[test]
fn reset_starts_over() {
    let temp = tempdir().unwrap();
    let key = cache_with_coins(&run(temp.path(), &["look"]));
    run(temp.path(), &["withdraw", &key]);
    run(temp.path(), &["move", "south"]);

    let items = run(temp.path(), &["reset"]);
    assert_eq!(items[0]["kind"], "session");

    let status = run(temp.path(), &["status"]);
    let p = player(&status);
    assert!(coins(p).is_empty());
    assert_eq!(p["data"]["trail"], 0);
    assert_eq!(of_kind(&status, "session")[0]["data"]["dormant_caches"], 0);
}

#[test]
fn markdown_output() {
    let temp = tempdir().unwrap();
    geocoin(temp.path())
        .args(["--format", "md", "look"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Player"))
        .stdout(predicate::str::contains("## Caches"));
}

#[test]
fn invalid_config_fails() {
    let temp = tempdir().unwrap();
    Command::new(assert_cmd::cargo::cargo_bin!("geocoin"))
        .arg("--root")
        .arg(temp.path())
        .args(["--spawn-probability", "2", "look"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spawn probability"));
}
