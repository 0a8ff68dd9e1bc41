use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use switchback::input::demo::demo_level;
use switchback::input::level::*;
use switchback::input::level::NodeKind::*;
use switchback::railway::geometry::Point;
use switchback::{LossReason, Phase, Session, SessionConfig, SimEvent};

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn immediate() -> SessionConfig {
    SessionConfig { planning_time: Some(0.0), ..Default::default() }
}

fn run_out(session: &mut Session, dt: f64) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..10_000 {
        if session.is_over() {
            break;
        }
        events.extend(session.update(dt));
    }
    events
}

fn straight(length: f64, speed: f64) -> LevelDescriptor {
    LevelDescriptor {
        nodes: vec![node("a", (0.0, 0.0), Start), node("b", (length, -length), Finish)],
        edges: vec![edge("ab", "a", "b")],
        trains: vec![train("t", "a", None, speed)],
        ..Default::default()
    }
}

#[test]
fn demo_is_lost_without_switching() {
    let mut s = Session::start(demo_level(), immediate(), &mut rng());
    assert!(s.diagnostics().is_empty());
    let events = run_out(&mut s, 0.05);
    assert_eq!(s.phase(), Phase::Lost(LossReason::DeadEnd));
    assert!(events.iter().any(|e| e.name() == "edge_broken"));
    assert_eq!(s.trains_completed(), 1);
}

#[test]
fn demo_is_won_with_switch_set() {
    let mut s = Session::start(demo_level(), SessionConfig::default(), &mut rng());
    assert!(s.toggle_switch("j"));
    assert_eq!(s.simulation().switches().current_target("j"), Some("north"));
    let events = run_out(&mut s, 0.05);
    assert_eq!(s.phase(), Phase::Won { stars: 2 });
    assert_eq!(s.trains_completed(), 2);
    assert_eq!(events.iter().filter(|e| e.name() == "bonus").count(), 1);
    assert!(s.update(0.05).is_empty());
}

#[test]
fn planning_counts_down_without_moving() {
    let mut s = Session::start(straight(4.0, 1.0), SessionConfig::default(), &mut rng());
    assert_eq!(s.phase(), Phase::Planning { remaining: 10.0 });
    s.update(4.0);
    s.update(4.0);
    assert_eq!(s.phase(), Phase::Planning { remaining: 2.0 });
    s.update(4.0);
    assert_eq!(s.phase(), Phase::Running { elapsed: 0.0 });
    let t = &s.simulation().trains()[0];
    assert_eq!(t.world_position(s.simulation().network()), Some(Point::new(0.0, 0.0)));
    s.update(0.5);
    assert_eq!(s.phase(), Phase::Running { elapsed: 0.5 });
}

#[test]
fn planning_override_and_early_start() {
    let config = SessionConfig { planning_time: Some(1.5), ..Default::default() };
    let mut s = Session::start(straight(4.0, 1.0), config, &mut rng());
    assert_eq!(s.phase(), Phase::Planning { remaining: 1.5 });
    s.begin_running();
    assert_eq!(s.phase(), Phase::Running { elapsed: 0.0 });
    s.update(0.25);
    s.begin_running();
    assert_eq!(s.phase(), Phase::Running { elapsed: 0.25 });
}

#[test]
fn finish_proximity_completes_train() {
    let mut s = Session::start(straight(4.0, 1.0), immediate(), &mut rng());
    for _ in 0..6 {
        s.update(0.5);
    }
    assert_eq!(s.trains_completed(), 0);
    let events = s.update(0.5);
    assert_eq!(events, vec![SimEvent::TrainReachedGoal { train: 0, node: 1 }]);
    assert_eq!(s.phase(), Phase::Won { stars: 0 });
}

#[test]
fn simulation_speed_scales_movement() {
    let level = LevelDescriptor { simulation_speed: 2.0, ..straight(8.0, 1.0) };
    let mut s = Session::start(level, immediate(), &mut rng());
    s.update(1.0);
    let t = &s.simulation().trains()[0];
    assert_eq!(t.world_position(s.simulation().network()), Some(Point::new(2.0, 0.0)));
}

#[test]
fn run_times_out() {
    let config = SessionConfig { max_run_duration: 1.0, ..immediate() };
    let mut s = Session::start(straight(100.0, 1.0), config, &mut rng());
    s.update(0.5);
    assert_eq!(s.phase(), Phase::Running { elapsed: 0.5 });
    assert!(s.update(0.5).is_empty());
    assert_eq!(s.phase(), Phase::Lost(LossReason::Timeout));
}

#[test]
fn level_without_trains_cannot_be_won() {
    let level = LevelDescriptor { trains: vec![], ..straight(4.0, 1.0) };
    let config = SessionConfig { max_run_duration: 5.0, ..immediate() };
    let mut s = Session::start(level, config, &mut rng());
    run_out(&mut s, 1.0);
    assert_eq!(s.phase(), Phase::Lost(LossReason::Timeout));
}

#[test]
fn collision_loses() {
    let level = LevelDescriptor {
        nodes: vec![node("a", (2.0, 0.0), Start), node("b", (0.0, 2.0), Start),
                    node("m", (2.0, 2.0), Generic), node("f", (8.0, 8.0), Finish)],
        edges: vec![edge("mf", "m", "f"), edge("am", "a", "m"), edge("bm", "b", "m")],
        trains: vec![train("t1", "a", Some("m"), 1.0), train("t2", "b", Some("m"), 1.0)],
        ..Default::default()
    };
    let mut s = Session::start(level, immediate(), &mut rng());
    run_out(&mut s, 0.1);
    assert_eq!(s.phase(), Phase::Lost(LossReason::Collision));
}

#[test]
fn wrong_switch_entry_loses() {
    let level = LevelDescriptor {
        nodes: vec![node("p", (0.0, 0.0), Start), node("y", (2.0, -2.0), Generic),
                    node("q", (2.0, 0.0), Generic), node("j", (4.0, -4.0), Generic),
                    node("x", (6.0, -6.0), Finish), node("z", (4.0, -8.0), Finish)],
        edges: vec![edge("yj", "y", "j"), edge("py", "p", "y"), edge("yq", "y", "q"),
                    edge("jx", "j", "x"), edge("jz", "j", "z")],
        switches: vec![switch("j", &["x", "z"])],
        trains: vec![train("t", "p", Some("y"), 1.0)],
        ..Default::default()
    };
    let mut s = Session::start(level, immediate(), &mut rng());
    let events = run_out(&mut s, 0.1);
    assert_eq!(s.phase(), Phase::Lost(LossReason::Derailed));
    assert_eq!(events.last().map(|e| e.name()), Some("wrong_switch"));
}

#[test]
fn switch_picking_by_position() {
    let mut s = Session::start(demo_level(), SessionConfig::default(), &mut rng());
    assert_eq!(s.toggle_switch_near(Point::new(20.0, 20.0)), None);
    assert_eq!(s.toggle_switch_near(Point::new(4.2, 0.1)), Some("j".to_string()));
    assert_eq!(s.simulation().switches().current_target("j"), Some("north"));
    assert!(!s.toggle_switch("depot"));
}

#[test]
fn ended_session_ignores_input() {
    let mut s = Session::start(demo_level(), immediate(), &mut rng());
    run_out(&mut s, 0.05);
    assert!(s.is_over());
    assert!(!s.toggle_switch("j"));
    assert_eq!(s.toggle_switch_near(Point::new(4.0, 0.0)), None);
    assert_eq!(s.simulation().switches().current_target("j"), Some("spur"));
}

#[test]
fn restart_rebuilds_level() {
    let mut s = Session::start(demo_level(), immediate(), &mut rng());
    run_out(&mut s, 0.05);
    assert_eq!(s.phase(), Phase::Lost(LossReason::DeadEnd));
    assert!(s.simulation().network().edge_by_id("bridge").map_or(false, |e| e.is_broken()));

    s.restart(&mut rng());
    assert_eq!(s.phase(), Phase::Running { elapsed: 0.0 });
    assert_eq!(s.trains_completed(), 0);
    assert_eq!(s.stars(), 0);
    assert!(s.simulation().network().edge_by_id("bridge").map_or(false, |e| !e.is_broken()));
    assert!(s.simulation().trains().iter().all(|t| !t.is_finished()));
}

#[test]
fn randomized_switches_follow_seed() {
    let config = SessionConfig { randomize_switches: true, ..Default::default() };
    let target = |seed| {
        let mut r = ChaCha8Rng::seed_from_u64(seed);
        let s = Session::start(demo_level(), config, &mut r);
        s.simulation().switches().current_target("j").map(|t| t.to_string())
    };
    for seed in 0..5 {
        assert_eq!(target(seed), target(seed));
    }
}

#[test]
fn build_problems_are_kept() {
    let mut level = straight(4.0, 1.0);
    level.trains.push(train("ghost", "nowhere", None, 1.0));
    let s = Session::start(level, immediate(), &mut rng());
    assert_eq!(s.diagnostics().len(), 1);
    assert_eq!(s.simulation().trains().len(), 1);
}
