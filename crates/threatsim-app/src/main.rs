//! Headless threat simulator.
//!
//! Starts a mission with auto-targeting and a guard drone, runs it for a
//! number of frames, and prints a summary. With `--realtime` the game loop
//! thread paces frames on the wall clock; otherwise frames are stepped on a
//! synthetic clock as fast as possible.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use threatsim_app::game_loop::{self, JsonLinesSink, NullSink, SnapshotSink};
use threatsim_app::state::AppState;
use threatsim_app::manifest::{self, RendererStatus};
use threatsim_app::{host, logging};
use threatsim_core::commands::PlayerCommand;
use threatsim_core::enums::DroneRole;
use threatsim_core::state::GameStateSnapshot;
use threatsim_radar::{RadarProjection, RadarScene};
use threatsim_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Parser)]
#[command(name = "threatsim", version, about = "Headless threat simulation")]
struct Cli {
    /// RNG seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to run.
    #[arg(long, default_value_t = 1800)]
    frames: u64,
    /// Host frame interval in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    interval_ms: f64,
    /// JSON `SimConfig` file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Renderer manifest to probe.
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Pace frames on the wall clock via the game loop thread.
    #[arg(long)]
    realtime: bool,
    /// Write every snapshot to stdout as JSON lines.
    #[arg(long)]
    jsonl: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn opening_moves() -> Vec<PlayerCommand> {
    vec![
        PlayerCommand::StartMission,
        PlayerCommand::SetAutoTargeting { enabled: true },
        PlayerCommand::DeployDrone {
            role: DroneRole::Guard,
            x: 0.0,
            y: 250.0,
        },
    ]
}

fn sink(jsonl: bool) -> Box<dyn SnapshotSink> {
    if jsonl {
        Box::new(JsonLinesSink::new(io::stdout()))
    } else {
        Box::new(NullSink)
    }
}

/// Feed message for a renderer that failed its check.
fn renderer_failure(status: &RendererStatus) -> Option<String> {
    match status {
        RendererStatus::Unavailable { reason } => Some(format!("Renderer unavailable: {reason}")),
        _ => None,
    }
}

fn run_stepped(config: SimConfig, cli: &Cli, renderer: &RendererStatus) -> Result<GameStateSnapshot> {
    let mut engine = SimulationEngine::new(config).context("invalid simulation config")?;
    if let Some(message) = renderer_failure(renderer) {
        engine.report_host_error(message);
    }
    engine.queue_commands(opening_moves());
    let mut out = sink(cli.jsonl);
    let (snapshot, _) = game_loop::run_headless(&mut engine, out.as_mut(), cli.frames, cli.interval_ms, 0.0)
        .context("snapshot sink failed")?;
    Ok(snapshot)
}

fn run_realtime(config: SimConfig, cli: &Cli, renderer: &RendererStatus) -> Result<GameStateSnapshot> {
    let state = AppState::new();
    host::start_simulation(&state, config, sink(cli.jsonl)).map_err(|e| anyhow!(e))?;
    if let Some(message) = renderer_failure(renderer) {
        host::report_error(&state, message).map_err(|e| anyhow!(e))?;
    }
    for cmd in opening_moves() {
        host::send_command(&state, cmd).map_err(|e| anyhow!(e))?;
    }
    std::thread::sleep(Duration::from_secs_f64(
        cli.frames as f64 * game_loop::FRAME_DURATION.as_secs_f64(),
    ));
    let snapshot = host::get_snapshot(&state).map_err(|e| anyhow!(e))?;
    host::stop_simulation(&state).map_err(|e| anyhow!(e))?;
    snapshot.ok_or_else(|| anyhow!("game loop produced no snapshot"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => host::load_config(path).map_err(|e| anyhow!(e))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let renderer = manifest::probe(cli.manifest.as_deref());
    log::debug!("Renderer: {renderer:?}");

    let snapshot = if cli.realtime {
        run_realtime(config, &cli, &renderer)?
    } else {
        run_stepped(config, &cli, &renderer)?
    };

    let scene = RadarScene::from_snapshot(&snapshot, &RadarProjection::fit(800.0, 800.0));
    log::debug!(
        "Radar: {} contacts, {} drones, {} pickups",
        scene.blips.len(),
        scene.drones.len(),
        scene.power_ups.len()
    );

    let score = &snapshot.score;
    log::info!(
        "{:?} after {:.1}s: wave {}, {} points, {}/{} neutralized, {} impacts, integrity {:.0}",
        snapshot.phase,
        score.mission_time_secs,
        snapshot.wave.number,
        score.points,
        score.threats_neutralized,
        score.threats_spawned,
        score.impacts,
        score.base_integrity,
    );
    Ok(())
}
