//! Tests for the simulation engine: clock, session control, commands,
//! weapons, drones, selection and the mission lifecycle.

use threatsim_core::commands::PlayerCommand;
use threatsim_core::components::PowerUp;
use threatsim_core::enums::*;
use threatsim_core::error::{ConfigError, Rejection};
use threatsim_core::types::{Position, Velocity};

use crate::config::{SimConfig, SpawnBounds};
use crate::engine::{PointerAction, SimulationEngine};
use crate::session::SessionSlot;
use crate::world_setup;

fn engine(config: SimConfig) -> SimulationEngine {
    SimulationEngine::with_slot(config, &SessionSlot::new()).unwrap()
}

fn scripted() -> SimConfig {
    SimConfig {
        auto_spawn: false,
        ..Default::default()
    }
}

/// Scripted engine, started, with the clock at zero.
fn active(config: SimConfig) -> SimulationEngine {
    let mut e = engine(config);
    e.start_mission().unwrap();
    e.tick(0.0);
    e
}

fn hover(e: &mut SimulationEngine, kind: ThreatKind, x: f64, y: f64) -> u32 {
    e.spawn_threat_at(kind, Position::new(x, y, 100.0), Velocity::default())
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = engine(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartMission);
    engine_b.queue_command(PlayerCommand::StartMission);

    for i in 0..600 {
        let now = i as f64 * 16.0;
        let snap_a = engine_a.tick(now);
        let snap_b = engine_b.tick(now);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = engine(SimConfig {
        seed: 222,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartMission);
    engine_b.queue_command(PlayerCommand::StartMission);

    let mut diverged = false;
    for i in 0..300 {
        let now = i as f64 * 16.0;
        let json_a = serde_json::to_string(&engine_a.tick(now)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(now)).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Construction ----

#[test]
fn test_one_session_per_slot() {
    let slot = SessionSlot::new();
    let first = SimulationEngine::with_slot(SimConfig::default(), &slot).unwrap();
    assert!(matches!(
        SimulationEngine::with_slot(SimConfig::default(), &slot),
        Err(ConfigError::SessionActive)
    ));
    drop(first);
    assert!(!slot.is_held());
    assert!(SimulationEngine::with_slot(SimConfig::default(), &slot).is_ok());
}

#[test]
fn test_invalid_config_fails_fast() {
    let slot = SessionSlot::new();
    let bad_bounds = SimConfig {
        spawn: SpawnBounds {
            min_radius: 900.0,
            max_radius: 800.0,
            speed_jitter: 0.1,
        },
        ..Default::default()
    };
    assert!(matches!(
        SimulationEngine::with_slot(bad_bounds, &slot),
        Err(ConfigError::InvalidSpawnBounds { .. })
    ));

    let bad_loadout = SimConfig {
        initial_loadout: vec!["kinetic".into(), "plasma".into()],
        ..Default::default()
    };
    assert!(matches!(
        SimulationEngine::with_slot(bad_loadout, &slot),
        Err(ConfigError::UnknownEffector(name)) if name == "plasma"
    ));

    // A failed construction never holds the slot.
    assert!(!slot.is_held());
}

// ---- Tick timing ----

#[test]
fn test_clock_follows_host_deltas() {
    let mut e = engine(scripted());
    e.start_mission().unwrap();

    let snap = e.tick(1_000.0);
    assert_eq!(snap.time.now_ms, 0.0, "first active tick advances nothing");
    assert_eq!(e.tick(1_016.0).time.now_ms, 16.0);

    // A long frame moves the clock fully but clamps the integration step.
    let snap = e.tick(1_516.0);
    assert_eq!(snap.time.now_ms, 516.0);
    assert!((snap.time.dt_secs - 0.1).abs() < 1e-12);
    assert_eq!(snap.time.tick, 3);
}

// ---- Pause/Resume ----

#[test]
fn test_pause_excludes_time() {
    let mut e = engine(scripted());
    e.start_mission().unwrap();
    e.tick(0.0);
    e.tick(500.0);

    e.pause().unwrap();
    assert_eq!(e.tick(5_000.0).time.now_ms, 500.0);
    assert_eq!(e.fire(0.0, 100.0), Err(Rejection::NotActive));

    e.resume().unwrap();
    assert_eq!(e.tick(6_000.0).time.now_ms, 500.0);
    assert_eq!(e.tick(6_100.0).time.now_ms, 600.0);
}

// ---- Phase gating ----

#[test]
fn test_phase_gating() {
    let mut e = engine(scripted());
    assert_eq!(e.phase(), GamePhase::Standby);
    assert_eq!(e.pause(), Err(Rejection::WrongPhase(GamePhase::Standby)));
    assert_eq!(e.resume(), Err(Rejection::WrongPhase(GamePhase::Standby)));

    e.start_mission().unwrap();
    assert_eq!(e.start_mission(), Err(Rejection::WrongPhase(GamePhase::Active)));

    e.reset();
    assert_eq!(e.phase(), GamePhase::Standby);
    assert!(e.start_mission().is_ok());
}

#[test]
fn test_queued_commands_report_outcomes() {
    let mut e = engine(scripted());
    e.queue_commands([PlayerCommand::StartMission, PlayerCommand::Pause, PlayerCommand::Pause]);
    let snap = e.tick(0.0);

    assert_eq!(snap.outcomes.len(), 3);
    assert!(snap.outcomes[0].accepted);
    assert!(snap.outcomes[1].accepted);
    assert!(!snap.outcomes[2].accepted);
    assert_eq!(snap.outcomes[2].command, "Pause");
    assert_eq!(snap.phase, GamePhase::Paused);

    // Outcomes are reported once.
    assert!(e.tick(16.0).outcomes.is_empty());
}

// ---- Weapons ----

#[test]
fn test_fire_at_neutralizes_and_scores() {
    let mut e = active(scripted());
    let id = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);
    e.switch_weapon(WeaponKind::Electronic).unwrap();

    let report = e.fire_at(id).unwrap();
    assert_eq!(report.hits, vec![id]);
    assert_eq!(report.neutralized, vec![id]);
    assert_eq!(e.score().points, 100);
    assert_eq!(e.score().threats_neutralized, 1);
    assert_eq!(e.score().shots_fired, 1);

    // The wreck cannot be targeted again, and is gone once faded.
    e.switch_weapon(WeaponKind::Kinetic).unwrap();
    assert_eq!(e.fire_at(id), Err(Rejection::NotTargetable(id)));
    e.tick(3_500.0);
    assert_eq!(e.fire_at(id), Err(Rejection::UnknownThreat(id)));
}

#[test]
fn test_fire_rejections_leave_ledger_untouched() {
    let mut e = active(scripted());
    let energy = e.ledger().energy.current();

    assert!(matches!(e.fire(0.0, 900.0), Err(Rejection::OutOfRange { .. })));
    assert_eq!(e.fire_at(77), Err(Rejection::UnknownThreat(77)));
    assert_eq!(e.ledger().energy.current(), energy);
    assert_eq!(e.score().shots_fired, 0);

    assert!(e.fire(0.0, 100.0).is_ok());
    assert!(matches!(e.fire(0.0, 100.0), Err(Rejection::CoolingDown { .. })));
    assert_eq!(e.score().shots_fired, 1);
}

#[test]
fn test_hidden_stealth_rejects_direct_fire_but_not_point_fire() {
    let mut e = active(scripted());
    let id = e.spawn_threat_at(ThreatKind::Stealth, Position::new(0.0, 600.0, 200.0), Velocity::default());

    assert_eq!(e.fire_at(id), Err(Rejection::NotTargetable(id)));
    assert_eq!(e.select_threat(id, false), Err(Rejection::NotTargetable(id)));

    e.switch_weapon(WeaponKind::Laser).unwrap();
    let report = e.fire(0.0, 600.0).unwrap();
    assert_eq!(report.hits, vec![id]);
    assert!(report.neutralized.is_empty());
}

#[test]
fn test_loadout_changes_toggle_synergies() {
    let mut e = engine(scripted());
    // Kinetic + laser ship together by default.
    assert_eq!(e.active_synergies().len(), 1);
    assert_eq!(e.bonus().damage, Some(0.3));

    e.unequip_weapon(WeaponKind::Laser).unwrap();
    assert!(e.active_synergies().is_empty());
    assert_eq!(e.bonus().damage, None);

    e.equip_weapon(WeaponKind::Laser).unwrap();
    assert_eq!(e.active_synergies().len(), 1);

    let messages: Vec<String> = e.feed().entries().into_iter().map(|f| f.message).collect();
    assert!(messages[0].starts_with("Synergy online"));
    assert!(messages[1].starts_with("Synergy lost"));
}

#[test]
fn test_unequip_selected_falls_back() {
    let mut e = engine(scripted());
    e.unequip_weapon(WeaponKind::Kinetic).unwrap();
    assert_eq!(e.armory().selected(), WeaponKind::Electronic);
    assert_eq!(e.switch_weapon(WeaponKind::Kinetic), Err(Rejection::WeaponNotEquipped(WeaponKind::Kinetic)));
    e.equip_weapon(WeaponKind::Net).unwrap();
    e.equip_weapon(WeaponKind::Hpm).unwrap();
    assert_eq!(e.equip_weapon(WeaponKind::Chaff), Err(Rejection::LoadoutFull(4)));
}

#[test]
fn test_auto_targeting_fires_on_tick() {
    let mut e = active(scripted());
    let id = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);
    e.set_auto_targeting(true);

    let snap = e.tick(16.0);
    assert_eq!(snap.score.shots_fired, 1);
    let threat = snap.threats.iter().find(|t| t.id == id).unwrap();
    assert!(threat.health < threat.max_health);
}

// ---- Drones ----

#[test]
fn test_deploy_limits_and_recall() {
    let mut e = active(scripted());
    for _ in 0..4 {
        e.deploy_drone(DroneRole::Guard, 0.0, 200.0).unwrap();
    }
    assert_eq!(
        e.deploy_drone(DroneRole::Guard, 0.0, 200.0),
        Err(Rejection::DroneLimitReached {
            role: DroneRole::Guard,
            limit: 4
        })
    );
    assert_eq!(e.ledger().energy.current(), 60.0);

    assert!(matches!(
        e.deploy_drone(DroneRole::Recon, 0.0, 800.0),
        Err(Rejection::OutOfRange { .. })
    ));
    assert_eq!(e.ledger().energy.current(), 60.0);

    let snap = e.snapshot();
    assert_eq!(snap.drones.len(), 4);
    assert_eq!(snap.bays.iter().map(|b| b.occupied).sum::<u32>(), 4);
    assert_eq!(snap.bays[0].occupied, 3, "north bay fills first");

    e.recall_drone(1).unwrap();
    assert_eq!(e.recall_drone(1), Err(Rejection::DroneNotRecallable(1)));
    assert_eq!(e.recall_drone(99), Err(Rejection::UnknownDrone(99)));
}

#[test]
fn test_recalled_drone_lands_and_frees_bay() {
    let mut e = active(scripted());
    let id = e.deploy_drone(DroneRole::Recon, 0.0, 300.0).unwrap();
    let mut now = 0.0;
    for _ in 0..20 {
        now += 50.0;
        e.tick(now);
    }
    e.recall_drone(id).unwrap();
    for _ in 0..200 {
        now += 50.0;
        e.tick(now);
    }
    let snap = e.snapshot();
    assert!(snap.drones.is_empty());
    assert!(snap.bays.iter().all(|b| b.occupied == 0));
    assert!(snap.feed.iter().any(|f| f.message.contains("recovered")));
}

// ---- Selection ----

#[test]
fn test_click_fires_by_default() {
    let mut e = active(scripted());
    let id = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);
    e.pointer_down(0.0, 300.0, false);
    match e.pointer_up(2.0, 301.0).unwrap() {
        PointerAction::Fired(report) => assert_eq!(report.hits, vec![id]),
        other => panic!("expected a shot, got {other:?}"),
    }
}

#[test]
fn test_modifier_click_toggles() {
    let mut e = active(scripted());
    let id = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);

    e.pointer_down(5.0, 300.0, true);
    assert_eq!(e.pointer_up(5.0, 300.0), Ok(PointerAction::Toggled(id)));
    assert!(e.selection().is_selected(id));

    e.pointer_down(5.0, 300.0, true);
    e.pointer_up(5.0, 300.0).unwrap();
    assert!(!e.selection().is_selected(id));
    assert_eq!(e.score().shots_fired, 0);

    e.pointer_down(300.0, 0.0, true);
    assert_eq!(e.pointer_up(300.0, 0.0), Ok(PointerAction::Nothing));
}

#[test]
fn test_drag_box_selects_contained() {
    let mut e = active(scripted());
    let a = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);
    let b = hover(&mut e, ThreatKind::SingleDrone, 50.0, 300.0);
    hover(&mut e, ThreatKind::SingleDrone, 400.0, 0.0);

    e.pointer_down(-20.0, 280.0, false);
    e.pointer_move(60.0, 320.0);
    let snap = e.snapshot();
    assert!(snap.selection.drag_box.is_some());
    assert_eq!(snap.selection.preview, vec![a, b]);

    assert_eq!(e.pointer_up(60.0, 320.0), Ok(PointerAction::BoxCommitted(2)));
    let snap = e.snapshot();
    assert!(snap.selection.drag_box.is_none());
    assert_eq!(snap.selection.selected, vec![a, b]);

    assert_eq!(e.pointer_up(0.0, 0.0), Err(Rejection::NoActiveGesture));
}

#[test]
fn test_select_on_click_mode() {
    let mut e = active(SimConfig {
        click_mode: ClickMode::SelectOnClick,
        ..scripted()
    });
    let id = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);

    e.pointer_down(0.0, 300.0, false);
    assert_eq!(e.pointer_up(0.0, 300.0), Ok(PointerAction::Selected(id)));
    e.pointer_down(200.0, 0.0, false);
    assert_eq!(e.pointer_up(200.0, 0.0), Ok(PointerAction::Cleared));
    assert!(e.selection().selected().is_empty());
}

#[test]
fn test_selection_pruned_after_neutralization() {
    let mut e = active(scripted());
    let id = hover(&mut e, ThreatKind::SingleDrone, 0.0, 300.0);
    e.select_threat(id, false).unwrap();
    e.set_priority(id, PriorityLevel::High).unwrap();

    e.switch_weapon(WeaponKind::Electronic).unwrap();
    e.fire_at(id).unwrap();
    let snap = e.tick(16.0);
    assert!(snap.selection.selected.is_empty());
    assert!(snap.selection.priorities.is_empty());
    // The wreck is still on screen, fading.
    assert!(snap.threats.iter().any(|t| t.id == id && t.status == ThreatStatus::Neutralized));
}

// ---- Power-ups ----

#[test]
fn test_damage_boost_pickup() {
    let mut e = active(scripted());
    world_setup::spawn_power_up(
        e.world_mut(),
        PowerUp {
            id: 500,
            kind: PowerUpKind::DamageBoost,
            spawned_at_ms: 0.0,
            expires_at_ms: 10_000.0,
        },
        Position::planar(200.0, 0.0),
    );
    let base = e.snapshot().weapons[0].effective_damage;

    e.pointer_down(200.0, 0.0, false);
    assert_eq!(e.pointer_up(200.0, 0.0), Ok(PointerAction::Collected(PowerUpKind::DamageBoost)));
    let snap = e.snapshot();
    assert!(snap.power_ups.is_empty());
    assert_eq!(snap.damage_boost_remaining_ms, 8_000.0);
    assert!((snap.weapons[0].effective_damage - base * 1.5).abs() < 1e-9);

    assert_eq!(e.collect_power_up(500), Err(Rejection::UnknownPowerUp(500)));
    e.tick(8_000.0);
    assert_eq!(e.snapshot().damage_boost_remaining_ms, 0.0);
}

// ---- Mission lifecycle ----

#[test]
fn test_impacts_defeat_and_restart() {
    let mut e = active(scripted());
    for (x, y) in [(0.0, 100.0), (100.0, 0.0), (0.0, -100.0), (-100.0, 0.0)] {
        e.spawn_threat_at(ThreatKind::Kamikaze, Position::new(x, y, 50.0), Velocity::default());
    }

    let mut now = 0.0;
    while e.phase() == GamePhase::Active && now < 10_000.0 {
        now += 16.0;
        e.tick(now);
    }
    assert_eq!(e.phase(), GamePhase::Defeated);
    assert_eq!(e.score().impacts, 4);
    assert_eq!(e.score().base_integrity, 0.0);
    assert!(e.snapshot().threats.is_empty(), "craters are removed");

    e.start_mission().unwrap();
    assert_eq!(e.phase(), GamePhase::Active);
    assert_eq!(e.score().base_integrity, 100.0);
    assert_eq!(e.time().now_ms, 0.0);
}

#[test]
fn test_waves_spawn_when_enabled() {
    let mut e = engine(SimConfig::default());
    e.start_mission().unwrap();
    let snap = e.tick(0.0);
    assert_eq!(snap.wave.number, 1);
    assert!(!snap.threats.is_empty());
    assert_eq!(snap.score.threats_spawned as usize, snap.threats.len());
}

#[test]
fn test_snapshot_size_reasonable() {
    let mut e = engine(SimConfig::default());
    e.start_mission().unwrap();
    let mut now = 0.0;
    for _ in 0..300 {
        now += 16.0;
        e.tick(now);
    }
    let json = serde_json::to_string(&e.snapshot()).unwrap();
    assert!(json.len() < 100_000, "snapshot is {} bytes", json.len());
}

#[test]
fn test_host_error_lands_in_feed_without_side_effects() {
    let mut e = engine(scripted());
    let before = e.snapshot();
    e.report_host_error("renderer asset missing");

    let entry = &e.feed().entries()[0];
    assert_eq!(entry.severity, Severity::Error);
    assert_eq!(entry.message, "renderer asset missing");
    let after = e.snapshot();
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.resources.energy, before.resources.energy);
}
