//! Wave spawning system: escalating waves separated by intermissions.
//!
//! Wave N spawns `WAVE_BASE_THREATS + WAVE_THREATS_PER_LEVEL × (N − 1)` threats
//! at a shrinking interval. The next intermission starts once the wave is fully
//! spawned and no active threats remain.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use threatsim_core::components::ThreatInfo;
use threatsim_core::constants::*;
use threatsim_core::enums::ThreatKind;
use threatsim_core::state::WaveView;
use threatsim_core::types::ThreatId;

use crate::config::SpawnBounds;
use crate::world_setup::{self, IdAllocator};

#[derive(Debug, Clone)]
pub struct WaveState {
    pub number: u32,
    pub remaining: u32,
    pub interval_ms: f64,
    pub next_spawn_ms: f64,
    /// Sim time the next wave starts, while in intermission.
    pub intermission_until: Option<f64>,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            number: 0,
            remaining: 0,
            interval_ms: WAVE_BASE_SPAWN_INTERVAL_MS,
            next_spawn_ms: 0.0,
            intermission_until: Some(0.0),
        }
    }
}

impl WaveState {
    pub fn view(&self) -> WaveView {
        WaveView {
            number: self.number,
            remaining_to_spawn: self.remaining,
            in_intermission: self.intermission_until.is_some(),
        }
    }
}

/// Threat count for a wave.
pub fn wave_size(number: u32) -> u32 {
    WAVE_BASE_THREATS + WAVE_THREATS_PER_LEVEL * number.saturating_sub(1)
}

/// Spawn interval for a wave.
pub fn wave_interval_ms(number: u32) -> f64 {
    (WAVE_BASE_SPAWN_INTERVAL_MS - WAVE_SPAWN_INTERVAL_STEP_MS * number.saturating_sub(1) as f64)
        .max(WAVE_MIN_SPAWN_INTERVAL_MS)
}

/// Weighted kind roll. Harder kinds unlock in later waves.
pub fn choose_kind(rng: &mut ChaCha8Rng, wave: u32) -> ThreatKind {
    let mut table: Vec<(ThreatKind, u32)> = vec![(ThreatKind::SingleDrone, 4), (ThreatKind::SwarmMember, 3)];
    if wave >= KAMIKAZE_FIRST_WAVE {
        table.push((ThreatKind::Kamikaze, 2));
    }
    if wave >= STEALTH_FIRST_WAVE {
        table.push((ThreatKind::Stealth, 1));
    }
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (kind, weight) in &table {
        if roll < *weight {
            return *kind;
        }
        roll -= *weight;
    }
    ThreatKind::SingleDrone
}

/// What happened this tick.
#[derive(Debug, Default)]
pub struct WaveTick {
    pub wave_started: Option<u32>,
    pub wave_cleared: Option<u32>,
    pub spawned: Vec<ThreatId>,
}

/// Advance the wave schedule and spawn any due threats.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    waves: &mut WaveState,
    bounds: &SpawnBounds,
    trail_capacity: usize,
    now_ms: f64,
) -> WaveTick {
    let mut tick = WaveTick::default();

    if let Some(start) = waves.intermission_until {
        if now_ms < start {
            return tick;
        }
        waves.number += 1;
        waves.remaining = wave_size(waves.number);
        waves.interval_ms = wave_interval_ms(waves.number);
        waves.next_spawn_ms = now_ms;
        waves.intermission_until = None;
        tick.wave_started = Some(waves.number);
    }

    while waves.remaining > 0 && now_ms >= waves.next_spawn_ms {
        match choose_kind(rng, waves.number) {
            ThreatKind::SwarmMember => {
                let count = waves.remaining.min(SWARM_GROUP_SIZE);
                let group = world_setup::spawn_swarm(world, rng, ids, count, bounds, now_ms, trail_capacity);
                waves.remaining -= count;
                tick.spawned.extend(group);
            }
            kind => {
                let id = ids.threat();
                world_setup::spawn_threat(world, rng, id, kind, bounds, now_ms, trail_capacity);
                waves.remaining -= 1;
                tick.spawned.push(id);
            }
        }
        waves.next_spawn_ms += waves.interval_ms;
    }

    if waves.remaining == 0 && tick.spawned.is_empty() {
        let active = world
            .query::<&ThreatInfo>()
            .iter()
            .filter(|(_, info)| info.is_active())
            .count();
        if active == 0 {
            waves.intermission_until = Some(now_ms + WAVE_INTERMISSION_MS);
            tick.wave_cleared = Some(waves.number);
        }
    }

    tick
}
