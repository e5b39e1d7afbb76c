//! Host state shared between the boundary functions and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use threatsim_core::commands::PlayerCommand;
use threatsim_core::state::GameStateSnapshot;

/// Messages for the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Forward to the engine's command queue.
    PlayerCommand(PlayerCommand),
    /// Surface a host failure in the event feed.
    HostError(String),
    /// Stop the loop and release the session.
    Shutdown,
}

/// Everything a host keeps between calls.
///
/// The sender sits behind a `Mutex` because `mpsc::Sender` is not `Sync`.
/// Fields that only exist once the simulation is started are `Option`s.
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, written by the loop after every frame.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    pub loop_handle: Mutex<Option<JoinHandle<()>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_handle: Mutex::new(None),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
