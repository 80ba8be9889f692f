//! End-to-end battles over the bundled content.

use std::fs;

use battle_content::{ContentFactory, TeamLoader, builtin};
use battle_core::{
    Arc4Rng, BattleEngine, BattleEnv, BattleFailure, BattleLog, BattleOptions, GameError, Outcome,
    Side, Team, ValidationError, prepare_battle, replay_and_verify, run_battle,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn gotchi(id: u64, speed: i64, special: Value) -> Value {
    json!({
        "id": id,
        "name": format!("gotchi-{id}"),
        "speed": speed,
        "attack": 110,
        "defense": 95,
        "criticalRate": 12.0,
        "criticalDamage": 25.0,
        "resist": 10,
        "focus": 15,
        "health": 900,
        "specialExpanded": special
    })
}

fn cleave() -> Value {
    json!({
        "code": "cleave",
        "initialCooldown": 2,
        "cooldown": 3,
        "actionType": "attack",
        "actionMultiplier": 1.2,
        "target": "enemy_row_largest",
        "effects": [
            { "effectType": "status", "status": "bleed", "target": "same_as_attack", "chance": 0.5 }
        ]
    })
}

fn mend() -> Value {
    json!({
        "code": "mend",
        "initialCooldown": 1,
        "cooldown": 2,
        "actionType": "heal",
        "actionMultiplier": 0.2,
        "target": "all_allies",
        "effects": [
            { "effectType": "remove_all_debuffs", "target": "same_as_attack" }
        ]
    })
}

fn daze() -> Value {
    json!({
        "code": "daze",
        "initialCooldown": 3,
        "cooldown": 4,
        "actionType": "none",
        "target": "enemy_random",
        "effects": [
            { "effectType": "status", "status": "stun", "target": "same_as_attack", "chance": 0.7 },
            { "effectType": "repeat_attack", "chance": 0.2 }
        ]
    })
}

fn team(name: &str, first_id: u64, leader_status: &str) -> Value {
    let mut leader = gotchi(first_id, 105, cleave());
    leader["leaderSkillExpanded"] = json!({
        "code": "rally",
        "statuses": [{ "status": leader_status, "stackCount": 1 }]
    });
    leader["item"] = json!({ "code": "blade", "stat": "attack", "statValue": 10 });
    json!({
        "name": name,
        "owner": "0x0",
        "leader": first_id,
        "formation": {
            "front": [leader, gotchi(first_id + 1, 95, daze()), null, null, null],
            "back": [null, gotchi(first_id + 2, 100, mend()), null, null, null]
        }
    })
}

/// Writes a data directory holding the bundled content and two teams.
fn data_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("ruleset.toml"), include_str!("../data/ruleset.toml")).expect("write ruleset");
    fs::write(dir.path().join("statuses.ron"), include_str!("../data/statuses.ron")).expect("write statuses");
    fs::create_dir(dir.path().join("teams")).expect("teams dir");
    for (name, first_id, status) in [("frens", 1, "atk_up"), ("rivals", 11, "def_up")] {
        let body = serde_json::to_string_pretty(&team(name, first_id, status)).expect("team json");
        fs::write(dir.path().join("teams").join(format!("{name}.json")), body).expect("write team");
    }
    dir
}

fn load_teams(factory: &ContentFactory) -> (Team, Team) {
    (
        factory.load_team("frens").expect("frens loads"),
        factory.load_team("rivals").expect("rivals loads"),
    )
}

fn options() -> BattleOptions {
    BattleOptions::new().with_timestamp("2024-06-01T12:00:00Z")
}

#[test]
fn battle_runs_to_a_winner() {
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());
    let config = factory.load_ruleset().expect("ruleset loads");
    let registry = factory.load_statuses().expect("statuses load");
    let env = BattleEnv::new(&registry, &config);
    let (frens, rivals) = load_teams(&factory);

    let log = run_battle(frens, rivals, "full-battle", &options(), env).expect("battle finishes");

    let result = log.result.as_ref().expect("result written");
    assert!(result.winner == 1 || result.winner == 2);
    assert_eq!(result.stats.num_of_turns as usize, log.turns.len());
    assert!(result.winning_team.iter().any(|unit| unit.health > 0));
    assert_eq!(log.gotchis.len(), 6);
    assert_eq!(log.layout.teams.len(), 2);

    for (index, turn) in log.turns.iter().enumerate() {
        assert_eq!(turn.index as usize, index);
        assert_eq!(turn.special_bars.len(), 6);
        assert!(turn.special_bars.iter().all(|bar| bar.val <= 100));
        assert!(turn.action.action_effects.iter().all(|e| e.outcome != Outcome::Counter));
    }

    // leader skill landed on every ally before the first turn
    let leader = log.gotchis.iter().find(|unit| unit.id == 1).expect("leader logged");
    assert_eq!(leader.statuses, vec!["atk_up".to_string()]);
    assert_eq!(leader.base.attack, 120);
}

#[test]
fn same_seed_gives_the_same_log() {
    let config = builtin::ruleset().expect("bundled ruleset");
    let registry = builtin::statuses().expect("bundled statuses");
    let env = BattleEnv::new(&registry, &config);
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());

    let run = |seed: &str| -> BattleLog {
        let (frens, rivals) = load_teams(&factory);
        run_battle(frens, rivals, seed, &options(), env).expect("battle finishes")
    };

    let first = run("determinism");
    let second = run("determinism");
    assert_eq!(first.turns, second.turns);
    assert_eq!(first.result, second.result);
    assert_eq!(first.digest().ok(), second.digest().ok());
    assert_eq!(
        first.to_json().expect("serializes"),
        second.to_json().expect("serializes")
    );
}

#[test]
fn logged_battle_replays_from_json() {
    let config = builtin::ruleset().expect("bundled ruleset");
    let registry = builtin::statuses().expect("bundled statuses");
    let env = BattleEnv::new(&registry, &config);
    let dir = data_dir();
    let (frens, rivals) = load_teams(&ContentFactory::new(dir.path()));

    let log = run_battle(frens, rivals, "replay", &options(), env).expect("battle finishes");
    let stored = log.to_json_pretty().expect("serializes");
    let restored = BattleLog::from_json(&stored).expect("deserializes");

    let replayed = replay_and_verify(&restored, env).expect("replay matches");
    assert_eq!(replayed.turns, log.turns);
    assert_eq!(replayed.meta.timestamp, "2024-06-01T12:00:00Z");
}

#[test]
fn invalid_input_is_rejected_before_simulation() {
    let config = builtin::ruleset().expect("bundled ruleset");
    let registry = builtin::statuses().expect("bundled statuses");
    let env = BattleEnv::new(&registry, &config);
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());

    let (frens, rivals) = load_teams(&factory);
    let failure = run_battle(frens, rivals, "", &options(), env).expect_err("empty seed");
    assert!(failure.partial_log().is_none());
    assert!(matches!(failure, BattleFailure::Rejected(ValidationError::EmptySeed)));

    let (mut frens, rivals) = load_teams(&factory);
    frens.leader = 99;
    let failure = run_battle(frens, rivals, "seed", &options(), env).expect_err("missing leader");
    let BattleFailure::Rejected(error) = failure else {
        panic!("expected a rejection");
    };
    assert_eq!(error.error_code(), "VALIDATION_LEADER_NOT_FOUND");
}

#[test]
fn turn_ceiling_returns_the_partial_log() {
    let mut config = builtin::ruleset().expect("bundled ruleset");
    config.max_turns = 3;
    let registry = builtin::statuses().expect("bundled statuses");
    let env = BattleEnv::new(&registry, &config);
    let dir = data_dir();
    let (frens, rivals) = load_teams(&ContentFactory::new(dir.path()));

    let failure = run_battle(frens, rivals, "short", &options(), env).expect_err("ceiling reached");
    let partial = failure.partial_log().expect("simulation failure carries a log");
    assert_eq!(partial.turns.len(), 3);
    assert!(partial.result.is_none());
    assert_eq!(failure_code(&failure), Some("TURN_LIMIT_EXCEEDED"));
}

/// A one-on-one fight where only target and crit draws are consumed.
fn duelist(id: u64, speed: i64, attack: i64, health: i64) -> Team {
    let unit = json!({
        "id": id,
        "name": format!("duelist-{id}"),
        "speed": speed,
        "attack": attack,
        "defense": 100,
        "criticalRate": 40.0,
        "criticalDamage": 50.0,
        "resist": 0,
        "focus": 0,
        "health": health,
        "specialExpanded": {
            "code": "brace",
            "initialCooldown": 6,
            "cooldown": 6,
            "actionType": "none"
        }
    });
    let team = json!({
        "name": format!("side-{id}"),
        "owner": "0x0",
        "leader": id,
        "formation": {
            "front": [unit, null, null, null, null],
            "back": [null, null, null, null, null]
        }
    });
    TeamLoader::parse(&team.to_string()).expect("duelist team parses")
}

#[test]
fn seeded_duel_matches_the_recorded_outcome() {
    let config = builtin::ruleset().expect("bundled ruleset");
    let registry = builtin::statuses().expect("bundled statuses");
    let env = BattleEnv::new(&registry, &config);

    let log = run_battle(
        duelist(1, 100, 120, 500),
        duelist(2, 80, 110, 450),
        "golden-v2",
        &options(),
        env,
    )
    .expect("battle finishes");

    let result = log.result.as_ref().expect("result written");
    assert_eq!(result.winner, 1);
    assert_eq!(log.num_of_turns(), Some(7));

    let strikes: Vec<(u64, Option<i64>, Outcome)> = log
        .turns
        .iter()
        .map(|turn| {
            let record = &turn.action.action_effects[0];
            (turn.action.user, record.damage, record.outcome)
        })
        .collect();
    assert_eq!(
        strikes,
        vec![
            (1, Some(102), Outcome::Success),
            (2, Some(140), Outcome::Critical),
            (1, Some(102), Outcome::Success),
            (2, Some(140), Outcome::Critical),
            (1, Some(102), Outcome::Success),
            (2, Some(94), Outcome::Success),
            (1, Some(153), Outcome::Critical),
        ]
    );

    assert_eq!(result.winning_team.len(), 1);
    assert_eq!(result.winning_team[0].health, 126);
    assert_eq!(result.stats.team1.totals.dmg_given, 459);
    assert_eq!(result.stats.team1.totals.crits, 1);
    assert_eq!(result.stats.team2.totals.dmg_given, 374);
    assert_eq!(result.stats.team2.totals.crits, 2);
    let last = log.turns.last().expect("turns logged");
    assert_eq!(last.special_bars[0].val, 68);
    assert_eq!(last.special_bars[1].val, 51);

    let digest = log.digest().expect("digest");
    assert_eq!(digest.len(), 64);
    let replayed = replay_and_verify(&log, env).expect("replay agrees");
    assert_eq!(replayed.digest().ok(), Some(digest));
}

#[test]
fn health_stays_within_bounds_every_turn() {
    let config = builtin::ruleset().expect("bundled ruleset");
    let registry = builtin::statuses().expect("bundled statuses");
    let env = BattleEnv::new(&registry, &config);
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());

    for seed in ["bounds-1", "bounds-2", "bounds-3", "bounds-4"] {
        let (frens, rivals) = load_teams(&factory);
        let state = prepare_battle(frens, rivals, seed, env, &mut rand::thread_rng()).expect("valid teams");
        let mut engine = BattleEngine::new(state, env, Arc4Rng::from_seed(seed));

        let mut turns = 0;
        while !engine.is_over() {
            engine.next_turn().expect("turn resolves");
            turns += 1;
            for side in Side::BOTH {
                for (_, _, unit) in engine.state().team(side).units() {
                    assert!(
                        (0..=unit.full_health).contains(&unit.health),
                        "unit {} at {} of {} after turn {turns} with seed {seed}",
                        unit.id,
                        unit.health,
                        unit.full_health,
                    );
                }
            }
        }

        let (frens, rivals) = load_teams(&factory);
        let log = run_battle(frens, rivals, seed, &options(), env).expect("battle finishes");
        assert_eq!(log.num_of_turns(), Some(turns));
    }
}

fn failure_code(failure: &BattleFailure) -> Option<&'static str> {
    match failure {
        BattleFailure::Simulation(simulation) => Some(simulation.error.error_code()),
        BattleFailure::Rejected(_) => None,
    }
}
