//! Session registration: at most one live engine per slot.
//!
//! The host registers against `SessionSlot::global()`, which makes the engine
//! a per-process singleton. Tests and embedders may create private slots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use threatsim_core::error::ConfigError;

/// A registration point that admits one session at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionSlot {
    held: Arc<AtomicBool>,
}

/// Proof of registration. Releases the slot when dropped.
#[derive(Debug)]
pub struct SessionLease {
    held: Arc<AtomicBool>,
}

static GLOBAL_SLOT: OnceLock<SessionSlot> = OnceLock::new();

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide slot.
    pub fn global() -> &'static SessionSlot {
        GLOBAL_SLOT.get_or_init(SessionSlot::new)
    }

    /// Register a session. Fails if one is already live on this slot.
    pub fn acquire(&self) -> Result<SessionLease, ConfigError> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ConfigError::SessionActive)?;
        Ok(SessionLease {
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
