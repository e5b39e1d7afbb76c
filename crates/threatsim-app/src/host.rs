//! Host boundary functions.
//!
//! These are what a UI shell calls. They bridge requests to the game loop
//! thread and report failures as plain strings.

use std::fs;
use std::path::Path;

use threatsim_core::commands::PlayerCommand;
use threatsim_core::state::GameStateSnapshot;
use threatsim_radar::{RadarProjection, RadarScene};
use threatsim_sim::{SimConfig, SimulationEngine};

use crate::game_loop::{self, SnapshotSink, FRAME_DURATION};
use crate::state::{AppState, GameLoopCommand};

/// Read a `SimConfig` from a JSON file. Missing fields take defaults.
pub fn load_config(path: &Path) -> Result<SimConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    SimConfig::from_json_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

/// Start the simulation. Fails if it is already running or the config is
/// invalid.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    sink: Box<dyn SnapshotSink>,
) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;

    if *running {
        return Err("Simulation already running".into());
    }

    let engine = SimulationEngine::new(config).map_err(|e| e.to_string())?;
    let (cmd_tx, handle) = game_loop::spawn_game_loop(
        engine,
        sink,
        state.latest_snapshot.clone(),
        FRAME_DURATION,
    )
    .map_err(|e| format!("Failed to spawn game loop: {e}"))?;

    *state.command_tx.lock().map_err(|e| e.to_string())? = Some(cmd_tx);
    *state.loop_handle.lock().map_err(|e| e.to_string())? = Some(handle);
    *running = true;

    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), String> {
    let tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|e| format!("Failed to send command: {}", e)),
        None => Err("Simulation not started".into()),
    }
}

/// Report a host failure into the running simulation's event feed.
pub fn report_error(state: &AppState, message: impl Into<String>) -> Result<(), String> {
    let tx_lock = state.command_tx.lock().map_err(|e| e.to_string())?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::HostError(message.into()))
            .map_err(|e| format!("Failed to send error report: {}", e)),
        None => Err("Simulation not started".into()),
    }
}

/// Latest snapshot, if the loop has produced one.
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, String> {
    let lock = state.latest_snapshot.lock().map_err(|e| e.to_string())?;
    Ok(lock.clone())
}

/// Latest snapshot mapped onto a `width × height` radar display.
pub fn get_radar_scene(state: &AppState, width: f64, height: f64) -> Result<Option<RadarScene>, String> {
    let projection = RadarProjection::fit(width, height);
    Ok(get_snapshot(state)?.map(|snap| RadarScene::from_snapshot(&snap, &projection)))
}

/// Stop the loop and wait for it. The engine's session is released.
pub fn stop_simulation(state: &AppState) -> Result<(), String> {
    let mut running = state.running.lock().map_err(|e| e.to_string())?;
    if !*running {
        return Err("Simulation not started".into());
    }

    if let Some(tx) = state.command_tx.lock().map_err(|e| e.to_string())?.take() {
        // The loop may already be gone; joining below covers both cases.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    if let Some(handle) = state.loop_handle.lock().map_err(|e| e.to_string())?.take() {
        handle
            .join()
            .map_err(|_| "Game loop thread panicked".to_string())?;
    }
    *running = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use threatsim_core::enums::{GamePhase, Severity};

    use super::*;
    use crate::game_loop::NullSink;

    fn wait_for(state: &AppState, pred: impl Fn(&GameStateSnapshot) -> bool) -> GameStateSnapshot {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(snap) = get_snapshot(state).unwrap() {
                if pred(&snap) || Instant::now() > deadline {
                    return snap;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    // Single test: the engine registers against the process-wide session slot.
    #[test]
    fn test_host_lifecycle() {
        let state = AppState::new();
        assert!(send_command(&state, PlayerCommand::StartMission).is_err());
        assert!(get_snapshot(&state).unwrap().is_none());
        assert!(get_radar_scene(&state, 400.0, 400.0).unwrap().is_none());
        assert!(stop_simulation(&state).is_err());
        assert!(report_error(&state, "renderer gone").is_err());

        let bad = SimConfig {
            loadout_slots: 0,
            ..SimConfig::default()
        };
        assert!(start_simulation(&state, bad, Box::new(NullSink)).is_err());
        assert!(!*state.running.lock().unwrap());

        start_simulation(&state, SimConfig::default(), Box::new(NullSink)).unwrap();
        assert_eq!(
            start_simulation(&state, SimConfig::default(), Box::new(NullSink)),
            Err("Simulation already running".to_string())
        );

        send_command(&state, PlayerCommand::StartMission).unwrap();
        let snap = wait_for(&state, |s| s.phase == GamePhase::Active);
        assert_eq!(snap.phase, GamePhase::Active);
        let scene = get_radar_scene(&state, 400.0, 400.0).unwrap().unwrap();
        assert_eq!(scene.center.x, 200.0);
        assert_eq!(scene.bays.len(), snap.bays.len());

        report_error(&state, "renderer gone").unwrap();
        let snap = wait_for(&state, |s| s.feed.iter().any(|f| f.severity == Severity::Error));
        let entry = snap.feed.iter().find(|f| f.severity == Severity::Error).unwrap();
        assert_eq!(entry.message, "renderer gone");
        assert_eq!(snap.phase, GamePhase::Active);

        stop_simulation(&state).unwrap();
        assert!(send_command(&state, PlayerCommand::Pause).is_err());

        // The session was released, so a new one can start.
        start_simulation(&state, SimConfig::default(), Box::new(NullSink)).unwrap();
        stop_simulation(&state).unwrap();
    }

    #[test]
    fn test_load_config_reports_path() {
        let missing = Path::new("/nonexistent/threatsim.json");
        let err = load_config(missing).unwrap_err();
        assert!(err.contains("threatsim.json"));

        let path = std::env::temp_dir().join(format!("threatsim-{}-config.json", std::process::id()));
        fs::write(&path, r#"{"seed": 7, "auto_spawn": false}"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert!(!config.auto_spawn);
        fs::remove_file(path).unwrap();
    }
}
