//! Game loop thread: ticks the engine at a fixed frame rate and hands each
//! snapshot to a sink.
//!
//! The engine is built (and validated) by the caller, then moved into the
//! thread. Commands arrive via `mpsc`. The host clock is the elapsed wall
//! time since the loop started, so the engine sees real frame deltas.

use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use threatsim_core::constants::TICK_RATE;
use threatsim_core::state::GameStateSnapshot;
use threatsim_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal frame duration.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Destination for per-frame snapshots.
pub trait SnapshotSink: Send {
    fn emit(&mut self, snapshot: &GameStateSnapshot) -> io::Result<()>;
}

/// Discards snapshots.
#[derive(Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn emit(&mut self, _snapshot: &GameStateSnapshot) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one JSON document per line.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SnapshotSink for JsonLinesSink<W> {
    fn emit(&mut self, snapshot: &GameStateSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    sink: Box<dyn SnapshotSink>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    frame: Duration,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("threatsim-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, sink, cmd_rx, &latest_snapshot, frame);
        })?;

    Ok((cmd_tx, handle))
}

/// Runs until `Shutdown` or until every sender is dropped.
fn run_game_loop(
    mut engine: SimulationEngine,
    mut sink: Box<dyn SnapshotSink>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    frame: Duration,
) {
    let started = Instant::now();
    let mut next_frame = started;
    let mut sink_ok = true;
    log::info!("Game loop started ({:?} per frame)", frame);

    loop {
        // 1. Drain pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::HostError(message)) => engine.report_host_error(message),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::info!("Game loop stopped after {} ticks", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance to the current host time
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        let snapshot = engine.tick(now_ms);

        // 3. Emit. A failing sink is dropped, the simulation keeps going.
        if sink_ok {
            if let Err(e) = sink.emit(&snapshot) {
                log::warn!("Snapshot sink failed, disabling it: {e}");
                sink_ok = false;
            }
        }

        // 4. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next frame
        next_frame += frame;
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        } else if now - next_frame > frame * 2 {
            // Too far behind; skip ahead rather than spiral.
            next_frame = now;
        }
    }
}

/// Steps the engine on a synthetic clock, without sleeping.
///
/// `frames` ticks are taken at `interval_ms` spacing starting after
/// `start_ms`. Returns the last snapshot and the final host time.
pub fn run_headless(
    engine: &mut SimulationEngine,
    sink: &mut dyn SnapshotSink,
    frames: u64,
    interval_ms: f64,
    start_ms: f64,
) -> io::Result<(GameStateSnapshot, f64)> {
    let mut now_ms = start_ms;
    let mut snapshot = engine.snapshot();
    for _ in 0..frames {
        now_ms += interval_ms;
        snapshot = engine.tick(now_ms);
        sink.emit(&snapshot)?;
    }
    Ok((snapshot, now_ms))
}
