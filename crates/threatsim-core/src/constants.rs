//! Simulation constants and tuning parameters.
//!
//! World units are meters on a flat plane centered on the defended asset.
//! All durations are in milliseconds unless the name says otherwise.

/// Nominal host frame rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Largest integration step a single frame may apply (ms).
/// Timers are not clamped, only motion.
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

// --- World bounds ---

/// Radius of the simulated area. Anything beyond is culled.
pub const WORLD_RADIUS: f64 = 1_000.0;

/// Horizontal range at which an inbound threat counts as hitting its target.
pub const IMPACT_RANGE: f64 = 25.0;

/// Default radar display range.
pub const RADAR_MAX_RANGE: f64 = 950.0;

// --- Threat lifecycle ---

/// Time from neutralization to removal.
pub const FADE_DURATION_MS: f64 = 3_000.0;

/// Number of trail points kept per threat.
pub const TRAIL_CAPACITY: usize = 16;

/// Default spawn ring.
pub const SPAWN_MIN_RADIUS: f64 = 800.0;
pub const SPAWN_MAX_RADIUS: f64 = 950.0;

/// Fractional speed jitter applied at spawn (0.2 = ±20%).
pub const SPAWN_SPEED_JITTER: f64 = 0.2;

/// Maximum heading error at spawn (radians).
pub const SPAWN_HEADING_JITTER: f64 = 0.15;

/// Stealth contacts stay hidden beyond this horizontal range.
pub const STEALTH_REVEAL_RANGE: f64 = 400.0;

// --- Resources ---

pub const ENERGY_MAX: f64 = 100.0;
pub const ENERGY_REGEN_PER_SEC: f64 = 10.0;
pub const COOLING_MAX: f64 = 100.0;
pub const COOLING_REGEN_PER_SEC: f64 = 15.0;

// --- Weapons ---

/// Floor for a synergy-reduced cooldown.
pub const MIN_EFFECTIVE_COOLDOWN_MS: f64 = 50.0;

/// Effector slots in the loadout.
pub const LOADOUT_SLOTS: usize = 4;

// --- Defended asset ---

pub const BASE_MAX_INTEGRITY: f64 = 100.0;

// --- Input ---

/// Drag diagonals shorter than this are treated as clicks (world units).
pub const CLICK_DRAG_THRESHOLD: f64 = 8.0;

/// Pick radius for clicking on a threat or power-up (world units).
pub const CLICK_PICK_RADIUS: f64 = 20.0;

// --- Event feed ---

pub const FEED_CAPACITY: usize = 50;

// --- Waves ---

pub const WAVE_BASE_THREATS: u32 = 4;
pub const WAVE_THREATS_PER_LEVEL: u32 = 2;
pub const WAVE_BASE_SPAWN_INTERVAL_MS: f64 = 1_500.0;
pub const WAVE_SPAWN_INTERVAL_STEP_MS: f64 = 100.0;
pub const WAVE_MIN_SPAWN_INTERVAL_MS: f64 = 400.0;
pub const WAVE_INTERMISSION_MS: f64 = 4_000.0;
/// Swarm members arrive in groups of this size.
pub const SWARM_GROUP_SIZE: u32 = 4;
/// Lateral spacing between swarm members at spawn.
pub const SWARM_SPACING: f64 = 30.0;
/// First wave in which stealth contacts appear.
pub const STEALTH_FIRST_WAVE: u32 = 3;
/// First wave in which kamikaze contacts appear.
pub const KAMIKAZE_FIRST_WAVE: u32 = 2;

// --- Drones ---

pub const DRONE_SPEED: f64 = 60.0;
/// Distance at which a drone counts as arrived at its station or bay.
pub const DRONE_ARRIVAL_RADIUS: f64 = 5.0;
/// A threat closer than this to a drone disables it.
pub const DRONE_COLLISION_RADIUS: f64 = 12.0;
/// Damage a colliding drone inflicts on the threat.
pub const DRONE_COLLISION_DAMAGE: f64 = 20.0;
/// Drones may not be stationed beyond this range.
pub const DRONE_MAX_DEPLOY_RANGE: f64 = 700.0;
/// Deployment altitude.
pub const DRONE_ALTITUDE: f64 = 60.0;

pub const BAY_COUNT: u32 = 4;
pub const BAY_RADIUS: f64 = 60.0;
pub const BAY_CAPACITY: u32 = 3;

// --- Power-ups ---

pub const POWER_UP_DROP_CHANCE: f64 = 0.15;
pub const POWER_UP_LIFETIME_MS: f64 = 10_000.0;
pub const ENERGY_CELL_AMOUNT: f64 = 30.0;
pub const COOLANT_FLUSH_AMOUNT: f64 = 40.0;
pub const DAMAGE_BOOST_MULTIPLIER: f64 = 1.5;
pub const DAMAGE_BOOST_DURATION_MS: f64 = 8_000.0;
