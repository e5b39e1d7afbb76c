//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the resource ledger, the
//! armory, selection and score. It applies player commands, runs all systems
//! once per `tick(now)`, and produces `GameStateSnapshot`s. Completely
//! headless, enabling deterministic testing.
//!
//! Every entry point is synchronous and reports success or a [`Rejection`];
//! a rejected command leaves the state untouched.

use std::collections::{BTreeSet, VecDeque};

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use threatsim_core::catalog::{drone_spec, weapon_spec};
use threatsim_core::commands::PlayerCommand;
use threatsim_core::components::{DeploymentBay, DroneUnit, ThreatInfo};
use threatsim_core::constants::*;
use threatsim_core::enums::*;
use threatsim_core::error::{ConfigError, Rejection};
use threatsim_core::events::CommandOutcome;
use threatsim_core::state::{GameStateSnapshot, SynergyView};
use threatsim_core::synergy::{SynergyBonus, SynergyEffect};
use threatsim_core::types::{DroneId, Position, PowerUpId, Rect, SimTime, ThreatId, Velocity};

use threatsim_threat_ai::profiles::get_profile;

use crate::config::SimConfig;
use crate::feed::EventFeed;
use crate::ledger::ResourceLedger;
use crate::score::ScoreState;
use crate::selection::SelectionState;
use crate::session::{SessionLease, SessionSlot};
use crate::synergy::{compute_synergies, total_bonus, SynergyTable};
use crate::systems;
use crate::systems::lifecycle::{self, Neutralization};
use crate::systems::threat_ai::Impact;
use crate::systems::wave_spawner::WaveState;
use crate::weapons::{effective_stats, is_ready, Armory, EffectiveStats};
use crate::world_setup::{self, IdAllocator};

/// Result of an accepted shot.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotReport {
    pub weapon: WeaponKind,
    /// Threats that took damage.
    pub hits: Vec<ThreatId>,
    /// Threats this shot finished.
    pub neutralized: Vec<ThreatId>,
}

/// What a completed pointer gesture did.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerAction {
    Fired(ShotReport),
    Toggled(ThreatId),
    Selected(ThreatId),
    Cleared,
    /// Drag box committed; carries the new selection size.
    BoxCommitted(usize),
    Collected(PowerUpKind),
    /// Modifier-click on empty space.
    Nothing,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    command_queue: VecDeque<PlayerCommand>,
    outcomes: Vec<CommandOutcome>,
    despawn_buffer: Vec<Entity>,
    /// Host clock at the previous active tick. `None` right after start or
    /// resume, so the first active tick advances nothing.
    last_host_ms: Option<f64>,

    ledger: ResourceLedger,
    initial_ledger: ResourceLedger,
    initial_loadout: Vec<WeaponKind>,
    armory: Armory,
    synergy_table: SynergyTable,
    active_synergies: Vec<SynergyEffect>,
    bonus: SynergyBonus,
    selection: SelectionState,
    waves: WaveState,
    bays: Vec<DeploymentBay>,
    feed: EventFeed,
    score: ScoreState,
    auto_targeting: bool,
    boost_until_ms: Option<f64>,

    _lease: SessionLease,
}

impl SimulationEngine {
    /// Create the process-wide engine. Fails on invalid configuration or if
    /// another engine is already registered.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_slot(config, SessionSlot::global())
    }

    /// Create an engine registered against a specific slot.
    pub fn with_slot(config: SimConfig, slot: &SessionSlot) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial_loadout = config.resolve_loadout()?;
        let synergy_table = config.synergy_table()?;
        let ledger = ResourceLedger::new(&config.energy, config.cooling.as_ref())?;
        let lease = slot.acquire()?;

        let armory = Armory::new(initial_loadout.clone(), config.loadout_slots);
        let active_synergies = compute_synergies(&synergy_table, &armory.equipped_set());
        let bonus = total_bonus(&active_synergies);

        log::info!(
            "simulation session registered (seed {}, loadout {:?})",
            config.seed,
            initial_loadout
        );

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ids: IdAllocator::default(),
            command_queue: VecDeque::new(),
            outcomes: Vec::new(),
            despawn_buffer: Vec::new(),
            last_host_ms: None,
            initial_ledger: ledger.clone(),
            ledger,
            initial_loadout,
            armory,
            synergy_table,
            active_synergies,
            bonus,
            selection: SelectionState::default(),
            waves: WaveState::default(),
            bays: world_setup::build_bays(),
            feed: EventFeed::new(config.feed_capacity),
            score: ScoreState::default(),
            auto_targeting: false,
            boost_until_ms: None,
            config,
            _lease: lease,
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation to host time `now_ms` and return the snapshot.
    ///
    /// While Active the sim clock first advances by the host delta, so queued
    /// commands are checked and stamped at this frame's time. Commands apply
    /// before any system runs. Paused time is never counted.
    pub fn tick(&mut self, now_ms: f64) -> GameStateSnapshot {
        let advanced = self.phase == GamePhase::Active;
        if advanced {
            self.advance_clock(now_ms);
        }

        self.process_commands();

        if self.phase == GamePhase::Active {
            // Started, resumed or reset by a queued command: re-anchor at now.
            if !advanced || self.last_host_ms.is_none() {
                self.advance_clock(now_ms);
            }
            self.run_systems();
        }

        let outcomes = std::mem::take(&mut self.outcomes);
        self.build_snapshot(outcomes)
    }

    /// Current state without advancing. Prunes stale selection ids.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        self.build_snapshot(Vec::new())
    }

    /// Apply one command now and report the outcome.
    pub fn apply(&mut self, command: PlayerCommand) -> CommandOutcome {
        let name = command.name();
        let result: Result<String, Rejection> = match command {
            PlayerCommand::StartMission => self.start_mission().map(|_| "mission started".into()),
            PlayerCommand::Pause => self.pause().map(|_| "paused".into()),
            PlayerCommand::Resume => self.resume().map(|_| "resumed".into()),
            PlayerCommand::Reset => {
                self.reset();
                Ok("reset to standby".into())
            }
            PlayerCommand::Fire { x, y } => self.fire(x, y).map(|r| describe_shot(&r)),
            PlayerCommand::FireAt { threat_id } => self.fire_at(threat_id).map(|r| describe_shot(&r)),
            PlayerCommand::SwitchWeapon { kind } => {
                self.switch_weapon(kind).map(|_| format!("{} selected", kind.label()))
            }
            PlayerCommand::EquipWeapon { kind } => {
                self.equip_weapon(kind).map(|_| format!("{} equipped", kind.label()))
            }
            PlayerCommand::UnequipWeapon { kind } => {
                self.unequip_weapon(kind).map(|_| format!("{} unequipped", kind.label()))
            }
            PlayerCommand::SetAutoTargeting { enabled } => {
                self.set_auto_targeting(enabled);
                Ok(format!("auto-targeting {}", if enabled { "on" } else { "off" }))
            }
            PlayerCommand::DeployDrone { role, x, y } => {
                self.deploy_drone(role, x, y).map(|id| format!("drone #{id} launched"))
            }
            PlayerCommand::RecallDrone { drone_id } => {
                self.recall_drone(drone_id).map(|_| format!("drone #{drone_id} returning"))
            }
            PlayerCommand::SelectThreat { threat_id, additive } => self
                .select_threat(threat_id, additive)
                .map(|_| format!("{} selected", self.selection.selected().len())),
            PlayerCommand::SetSelectionBox { rect } => self
                .set_selection_box(rect)
                .map(|n| format!("{n} in box")),
            PlayerCommand::SetPriority { threat_id, level } => self
                .set_priority(threat_id, level)
                .map(|_| format!("threat #{threat_id} priority {level:?}")),
            PlayerCommand::ClearSelection => {
                self.clear_selection();
                Ok("selection cleared".into())
            }
            PlayerCommand::PointerDown { x, y, modifier } => {
                self.pointer_down(x, y, modifier);
                Ok("pressed".into())
            }
            PlayerCommand::PointerMove { x, y } => {
                self.pointer_move(x, y);
                Ok("moved".into())
            }
            PlayerCommand::PointerUp { x, y } => self.pointer_up(x, y).map(|a| format!("{a:?}")),
            PlayerCommand::CollectPowerUp { power_up_id } => self
                .collect_power_up(power_up_id)
                .map(|kind| format!("{kind:?} collected")),
        };

        match result {
            Ok(detail) => CommandOutcome {
                command: name.to_string(),
                accepted: true,
                detail,
            },
            Err(reason) => {
                log::debug!("{name} rejected: {reason}");
                CommandOutcome {
                    command: name.to_string(),
                    accepted: false,
                    detail: reason.to_string(),
                }
            }
        }
    }

    // ---- Session control ----

    /// Standby or Defeated -> Active. A defeated session is reset first.
    pub fn start_mission(&mut self) -> Result<(), Rejection> {
        match self.phase {
            GamePhase::Standby => {}
            GamePhase::Defeated => self.reset(),
            other => return Err(Rejection::WrongPhase(other)),
        }
        self.phase = GamePhase::Active;
        self.last_host_ms = None;
        self.feed.push(self.time.now_ms, Severity::Info, "Mission started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), Rejection> {
        if self.phase != GamePhase::Active {
            return Err(Rejection::WrongPhase(self.phase));
        }
        self.phase = GamePhase::Paused;
        self.feed.push(self.time.now_ms, Severity::Info, "Simulation paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), Rejection> {
        if self.phase != GamePhase::Paused {
            return Err(Rejection::WrongPhase(self.phase));
        }
        self.phase = GamePhase::Active;
        self.last_host_ms = None;
        self.feed.push(self.time.now_ms, Severity::Info, "Simulation resumed");
        Ok(())
    }

    /// Fresh world and state from the same configuration. Keeps the session
    /// registration and reseeds the RNG.
    pub fn reset(&mut self) {
        self.world = World::new();
        self.time = SimTime::default();
        self.phase = GamePhase::Standby;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.ids = IdAllocator::default();
        self.command_queue.clear();
        self.despawn_buffer.clear();
        self.last_host_ms = None;
        self.ledger = self.initial_ledger.clone();
        self.armory = Armory::new(self.initial_loadout.clone(), self.config.loadout_slots);
        self.active_synergies = compute_synergies(&self.synergy_table, &self.armory.equipped_set());
        self.bonus = total_bonus(&self.active_synergies);
        self.selection = SelectionState::default();
        self.waves = WaveState::default();
        self.bays = world_setup::build_bays();
        self.feed = EventFeed::new(self.config.feed_capacity);
        self.score = ScoreState::default();
        self.auto_targeting = false;
        self.boost_until_ms = None;
        log::info!("simulation reset");
    }

    // ---- Weapons ----

    /// Fire the selected weapon at a ground point. Every active threat inside
    /// the effect radius is hit, hidden stealth contacts included.
    pub fn fire(&mut self, x: f64, y: f64) -> Result<ShotReport, Rejection> {
        self.require_active()?;
        let kind = self.armory.selected();
        let stats = self.stats(kind);
        let now = self.time.now_ms;
        self.armory.check_ready(kind, now, stats.cooldown_ms)?;

        let aim = Position::planar(x, y);
        let distance = aim.range_from_origin();
        if distance > stats.range {
            return Err(Rejection::OutOfRange {
                distance,
                range: stats.range,
            });
        }
        self.ledger.try_debit(stats.energy_cost, stats.heat)?;
        self.armory.record_shot(kind, now);
        self.score.shots_fired += 1;

        let targets: Vec<(Entity, ThreatId)> = self
            .world
            .query::<(&ThreatInfo, &Position)>()
            .iter()
            .filter(|(_, (info, pos))| info.is_active() && pos.horizontal_range_to(&aim) <= stats.effect_radius)
            .map(|(entity, (info, _))| (entity, info.id))
            .collect();
        Ok(self.resolve_hits(kind, targets, stats.damage))
    }

    /// Fire the selected weapon at one threat.
    pub fn fire_at(&mut self, threat_id: ThreatId) -> Result<ShotReport, Rejection> {
        self.require_active()?;
        let kind = self.armory.selected();
        let stats = self.stats(kind);
        let now = self.time.now_ms;
        self.armory.check_ready(kind, now, stats.cooldown_ms)?;

        let entity = lifecycle::find_threat(&self.world, threat_id).ok_or(Rejection::UnknownThreat(threat_id))?;
        let (targetable, distance) = {
            let mut query = self
                .world
                .query_one::<(&ThreatInfo, &Position)>(entity)
                .map_err(|_| Rejection::UnknownThreat(threat_id))?;
            let (info, pos) = query.get().ok_or(Rejection::UnknownThreat(threat_id))?;
            (info.is_targetable(), pos.range_from_origin())
        };
        if !targetable {
            return Err(Rejection::NotTargetable(threat_id));
        }
        if distance > stats.range {
            return Err(Rejection::OutOfRange {
                distance,
                range: stats.range,
            });
        }
        self.ledger.try_debit(stats.energy_cost, stats.heat)?;
        self.armory.record_shot(kind, now);
        self.score.shots_fired += 1;
        Ok(self.resolve_hits(kind, vec![(entity, threat_id)], stats.damage))
    }

    /// Make an equipped weapon the active one. Cooldown clocks are untouched.
    pub fn switch_weapon(&mut self, kind: WeaponKind) -> Result<(), Rejection> {
        self.armory.switch_to(kind)
    }

    pub fn equip_weapon(&mut self, kind: WeaponKind) -> Result<(), Rejection> {
        self.armory.equip(kind)?;
        self.refresh_synergies();
        Ok(())
    }

    pub fn unequip_weapon(&mut self, kind: WeaponKind) -> Result<(), Rejection> {
        self.armory.unequip(kind)?;
        self.refresh_synergies();
        Ok(())
    }

    pub fn set_auto_targeting(&mut self, enabled: bool) {
        self.auto_targeting = enabled;
    }

    // ---- Drones ----

    /// Launch a drone of `role` toward station `(x, y)` from the nearest bay
    /// with a free slot.
    pub fn deploy_drone(&mut self, role: DroneRole, x: f64, y: f64) -> Result<DroneId, Rejection> {
        self.require_active()?;
        let spec = drone_spec(role);
        if systems::drones::count_airborne(&self.world, role) >= spec.max_concurrent {
            return Err(Rejection::DroneLimitReached {
                role,
                limit: spec.max_concurrent,
            });
        }
        let station = Position::new(x, y, DRONE_ALTITUDE);
        let distance = station.range_from_origin();
        if distance > DRONE_MAX_DEPLOY_RANGE {
            return Err(Rejection::OutOfRange {
                distance,
                range: DRONE_MAX_DEPLOY_RANGE,
            });
        }
        let bay_index = systems::drones::nearest_free_bay(&self.bays, &station).ok_or(Rejection::NoBayAvailable)?;
        self.ledger.debit_energy(spec.deploy_cost)?;

        let id = self.ids.drone();
        let bay = &mut self.bays[bay_index];
        bay.occupied += 1;
        let drone = DroneUnit::new(id, role, spec.max_energy, station, bay.id, self.time.now_ms);
        world_setup::spawn_drone(&mut self.world, drone, bay.position);
        self.score.drones_deployed += 1;
        self.feed.push(
            self.time.now_ms,
            Severity::Info,
            format!("{} drone #{id} launched from bay {}", role.as_str(), bay.id),
        );
        Ok(id)
    }

    /// Send a drone back to its bay.
    pub fn recall_drone(&mut self, drone_id: DroneId) -> Result<(), Rejection> {
        self.require_active()?;
        let drone = self
            .world
            .query_mut::<&mut DroneUnit>()
            .into_iter()
            .map(|(_, drone)| drone)
            .find(|drone| drone.id == drone_id)
            .ok_or(Rejection::UnknownDrone(drone_id))?;
        if matches!(drone.status, DroneStatus::Returning | DroneStatus::Disabled) {
            return Err(Rejection::DroneNotRecallable(drone_id));
        }
        drone.status = DroneStatus::Returning;
        Ok(())
    }

    // ---- Selection ----

    /// Select a live threat, or toggle it when `additive`.
    pub fn select_threat(&mut self, threat_id: ThreatId, additive: bool) -> Result<(), Rejection> {
        self.require_targetable(threat_id)?;
        self.selection.select(threat_id, additive);
        Ok(())
    }

    /// Update the drag box (`Some`) or commit and clear it (`None`).
    /// Returns the number of threats in the box, or selected after a commit.
    pub fn set_selection_box(&mut self, rect: Option<Rect>) -> Result<usize, Rejection> {
        let candidates = self.targetable_positions();
        self.selection.set_box(rect, &candidates);
        Ok(match rect {
            Some(_) => self.selection.view().preview.len(),
            None => self.selection.selected().len(),
        })
    }

    pub fn set_priority(&mut self, threat_id: ThreatId, level: PriorityLevel) -> Result<(), Rejection> {
        self.require_targetable(threat_id)?;
        self.selection.set_priority(threat_id, level);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, modifier: bool) {
        self.selection.begin_gesture(x, y, modifier);
    }

    /// Opens or updates the drag box once the pointer has travelled far enough.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some(gesture) = self.selection.gesture() else {
            return;
        };
        let rect = Rect::new(gesture.start_x, gesture.start_y, x, y);
        if rect.diagonal() >= CLICK_DRAG_THRESHOLD || self.selection.drag_box().is_some() {
            let candidates = self.targetable_positions();
            self.selection.set_box(Some(rect), &candidates);
        }
    }

    /// Finish a gesture: commit a drag box, or resolve a click.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<PointerAction, Rejection> {
        let gesture = self.selection.end_gesture().ok_or(Rejection::NoActiveGesture)?;
        let rect = Rect::new(gesture.start_x, gesture.start_y, x, y);

        if rect.diagonal() >= CLICK_DRAG_THRESHOLD || self.selection.drag_box().is_some() {
            let candidates = self.targetable_positions();
            self.selection.set_box(Some(rect), &candidates);
            self.selection.set_box(None, &[]);
            return Ok(PointerAction::BoxCommitted(self.selection.selected().len()));
        }

        let at = Position::planar(x, y);
        if self.phase == GamePhase::Active {
            if let Some(id) = systems::power_ups::nearest(&self.world, &at, CLICK_PICK_RADIUS, self.time.now_ms) {
                return self.collect_power_up(id).map(PointerAction::Collected);
            }
        }

        let under_pointer = self.nearest_targetable(&at, CLICK_PICK_RADIUS);
        if gesture.modifier {
            return Ok(match under_pointer {
                Some(id) => {
                    self.selection.select(id, true);
                    PointerAction::Toggled(id)
                }
                None => PointerAction::Nothing,
            });
        }

        match self.config.click_mode {
            ClickMode::FireOnClick => self.fire(x, y).map(PointerAction::Fired),
            ClickMode::SelectOnClick => Ok(match under_pointer {
                Some(id) => {
                    self.selection.select(id, false);
                    PointerAction::Selected(id)
                }
                None => {
                    self.selection.clear();
                    PointerAction::Cleared
                }
            }),
        }
    }

    // ---- Pickups ----

    pub fn collect_power_up(&mut self, power_up_id: PowerUpId) -> Result<PowerUpKind, Rejection> {
        self.require_active()?;
        let now = self.time.now_ms;
        let (entity, kind) =
            systems::power_ups::find(&self.world, power_up_id, now).ok_or(Rejection::UnknownPowerUp(power_up_id))?;
        let _ = self.world.despawn(entity);
        match kind {
            PowerUpKind::EnergyCell => self.ledger.credit_energy(ENERGY_CELL_AMOUNT),
            PowerUpKind::CoolantFlush => self.ledger.credit_cooling(COOLANT_FLUSH_AMOUNT),
            PowerUpKind::DamageBoost => self.boost_until_ms = Some(now + DAMAGE_BOOST_DURATION_MS),
        }
        self.feed.push(now, Severity::Success, format!("{kind:?} collected"));
        Ok(kind)
    }

    // ---- Scenario hooks ----

    /// Place a threat with explicit kinematics. For scripted scenarios.
    pub fn spawn_threat_at(&mut self, kind: ThreatKind, position: Position, velocity: Velocity) -> ThreatId {
        let id = self.ids.threat();
        world_setup::spawn_threat_at(
            &mut self.world,
            id,
            kind,
            position,
            velocity,
            self.time.now_ms,
            self.config.trail_capacity,
            0.0,
        );
        self.score.threats_spawned += 1;
        id
    }

    // ---- Host diagnostics ----

    /// Put a host-side failure in front of the operator. Engine state is untouched.
    pub fn report_host_error(&mut self, message: impl Into<String>) {
        self.feed.push(self.time.now_ms, Severity::Error, message);
    }

    // ---- Accessors ----

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }

    pub fn active_synergies(&self) -> &[SynergyEffect] {
        &self.active_synergies
    }

    pub fn bonus(&self) -> SynergyBonus {
        self.bonus
    }

    /// Mutable world access for tests that need to plant entities directly.
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // ---- Internals ----

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            let outcome = self.apply(command);
            self.outcomes.push(outcome);
        }
    }

    /// Move the sim clock by the host delta since the last active tick.
    fn advance_clock(&mut self, now_ms: f64) {
        let delta = self.last_host_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_host_ms = Some(now_ms);
        self.time.advance_to(self.time.now_ms + delta);
    }

    fn require_active(&self) -> Result<(), Rejection> {
        if self.phase == GamePhase::Active {
            Ok(())
        } else {
            Err(Rejection::NotActive)
        }
    }

    fn require_targetable(&self, threat_id: ThreatId) -> Result<(), Rejection> {
        let entity = lifecycle::find_threat(&self.world, threat_id).ok_or(Rejection::UnknownThreat(threat_id))?;
        let targetable = self
            .world
            .get::<&ThreatInfo>(entity)
            .map(|info| info.is_targetable())
            .unwrap_or(false);
        if targetable {
            Ok(())
        } else {
            Err(Rejection::NotTargetable(threat_id))
        }
    }

    fn damage_multiplier(&self) -> f64 {
        match self.boost_until_ms {
            Some(until) if self.time.now_ms < until => DAMAGE_BOOST_MULTIPLIER,
            _ => 1.0,
        }
    }

    fn stats(&self, kind: WeaponKind) -> EffectiveStats {
        effective_stats(&weapon_spec(kind), &self.bonus, self.damage_multiplier())
    }

    fn targetable_positions(&self) -> Vec<(ThreatId, Position)> {
        self.world
            .query::<(&ThreatInfo, &Position)>()
            .iter()
            .filter(|(_, (info, _))| info.is_targetable())
            .map(|(_, (info, pos))| (info.id, *pos))
            .collect()
    }

    fn nearest_targetable(&self, at: &Position, radius: f64) -> Option<ThreatId> {
        self.targetable_positions()
            .into_iter()
            .map(|(id, pos)| (id, pos.horizontal_range_to(at)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    fn resolve_hits(&mut self, weapon: WeaponKind, targets: Vec<(Entity, ThreatId)>, damage: f64) -> ShotReport {
        let now = self.time.now_ms;
        let mut report = ShotReport {
            weapon,
            hits: Vec::with_capacity(targets.len()),
            neutralized: Vec::new(),
        };
        for (entity, id) in targets {
            report.hits.push(id);
            if let Some(n) = lifecycle::apply_damage(&mut self.world, entity, damage, now) {
                report.neutralized.push(n.id);
                self.on_neutralized(n);
            }
        }
        log::debug!("{} fired: {} hit, {} down", weapon.label(), report.hits.len(), report.neutralized.len());
        report
    }

    fn on_neutralized(&mut self, n: Neutralization) {
        let now = self.time.now_ms;
        let points = get_profile(n.kind).points;
        self.score.points += points;
        self.score.threats_neutralized += 1;
        self.feed.push(
            now,
            Severity::Success,
            format!("{} #{} neutralized (+{points})", n.kind.as_str(), n.id),
        );
        if let Some((id, kind)) =
            systems::power_ups::roll_drop(&mut self.world, &mut self.rng, &mut self.ids, n.position, now)
        {
            self.feed.push(now, Severity::Info, format!("{kind:?} #{id} dropped"));
        }
    }

    fn on_impact(&mut self, impact: Impact) {
        let now = self.time.now_ms;
        if impact.target.horizontal_range_to(&Position::default()) > IMPACT_RANGE {
            let message = match systems::drones::disable_decoy_near(&mut self.world, &impact.target, IMPACT_RANGE) {
                Some(drone) => format!("{} #{} struck decoy drone #{drone}", impact.kind.as_str(), impact.id),
                None => format!("{} #{} expended on a decoy", impact.kind.as_str(), impact.id),
            };
            self.feed.push(now, Severity::Warning, message);
            return;
        }

        let damage = get_profile(impact.kind).impact_damage;
        self.score.impacts += 1;
        self.score.base_integrity = (self.score.base_integrity - damage).max(0.0);
        self.feed.push(
            now,
            Severity::Critical,
            format!(
                "{} #{} impacted the asset ({:.0} integrity left)",
                impact.kind.as_str(),
                impact.id,
                self.score.base_integrity
            ),
        );
        if self.score.base_integrity <= 0.0 && self.phase == GamePhase::Active {
            self.phase = GamePhase::Defeated;
            self.feed.push(now, Severity::Critical, "Asset destroyed, mission failed");
        }
    }

    /// Recompute synergies after a loadout change and announce transitions.
    fn refresh_synergies(&mut self) {
        let next = compute_synergies(&self.synergy_table, &self.armory.equipped_set());
        let before: BTreeSet<&str> = self.active_synergies.iter().map(|s| s.id.as_str()).collect();
        let after: BTreeSet<&str> = next.iter().map(|s| s.id.as_str()).collect();
        let now = self.time.now_ms;
        let mut messages = Vec::new();
        for s in &next {
            if !before.contains(s.id.as_str()) {
                messages.push((Severity::Success, format!("Synergy online: {}", s.name)));
            }
        }
        for s in &self.active_synergies {
            if !after.contains(s.id.as_str()) {
                messages.push((Severity::Warning, format!("Synergy lost: {}", s.name)));
            }
        }
        for (severity, message) in messages {
            self.feed.push(now, severity, message);
        }
        self.bonus = total_bonus(&next);
        self.active_synergies = next;
    }

    fn auto_fire(&mut self) {
        let kind = self.armory.selected();
        let stats = self.stats(kind);
        if !is_ready(self.time.now_ms, self.armory.last_fired(kind), stats.cooldown_ms) {
            return;
        }
        if let Some(target) = systems::auto_target::pick_target(&self.world, &self.selection, stats.range) {
            if let Err(reason) = self.fire_at(target) {
                log::debug!("auto-target on #{target} held: {reason}");
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.now_ms;
        let dt = self.time.dt_secs;

        // 1. Wave spawning
        if self.config.auto_spawn {
            let waves = systems::wave_spawner::run(
                &mut self.world,
                &mut self.rng,
                &mut self.ids,
                &mut self.waves,
                &self.config.spawn,
                self.config.trail_capacity,
                now,
            );
            if let Some(n) = waves.wave_started {
                self.feed.push(now, Severity::Warning, format!("Wave {n} inbound"));
            }
            if let Some(n) = waves.wave_cleared {
                self.feed.push(now, Severity::Success, format!("Wave {n} cleared"));
            }
            self.score.threats_spawned += waves.spawned.len() as u32;
        }

        // 2. Auto-targeting
        if self.auto_targeting {
            self.auto_fire();
        }

        // 3. Drones (flight, effects, collisions, recovery, decoy retarget)
        let drones = systems::drones::run(&mut self.world, &mut self.bays, dt);
        for (entity, damage) in drones.strikes.iter().chain(drones.collisions.iter()) {
            if let Some(n) = lifecycle::apply_damage(&mut self.world, *entity, *damage, now) {
                self.on_neutralized(n);
            }
        }
        for (id, role) in &drones.disabled {
            self.feed
                .push(now, Severity::Warning, format!("{} drone #{id} lost in collision", role.as_str()));
        }
        for (id, role) in &drones.depleted {
            self.feed
                .push(now, Severity::Info, format!("{} drone #{id} out of energy, returning", role.as_str()));
        }
        for (id, role) in &drones.returned {
            self.feed
                .push(now, Severity::Info, format!("{} drone #{id} recovered", role.as_str()));
        }

        // 4. Threat AI (steering, phase changes, impacts)
        for impact in systems::threat_ai::run(&mut self.world, now) {
            self.on_impact(impact);
        }

        // 5. Movement integration and trails
        systems::movement::run(&mut self.world, dt, &drones.effects.slow_zones);
        systems::movement::update_history(&mut self.world);

        // 6. Stealth reveal
        for id in lifecycle::reveal(&mut self.world, &drones.effects.reveal_zones) {
            self.feed
                .push(now, Severity::Warning, format!("Stealth contact #{id} revealed"));
        }

        // 7. Cleanup (craters, faded wrecks, strays, expired pickups)
        let strays = systems::cleanup::run(
            &mut self.world,
            &mut self.despawn_buffer,
            now,
            self.config.fade_duration_ms,
        );
        if !strays.is_empty() {
            log::debug!("culled out-of-bounds threats {strays:?}");
        }

        // 8. Passive regeneration
        self.ledger.tick(
            dt,
            drones.effects.energy_regen_bonus,
            drones.effects.cooling_regen_bonus,
        );

        // 9. Timed effects and weapon phases
        if matches!(self.boost_until_ms, Some(until) if now >= until) {
            self.boost_until_ms = None;
            self.feed.push(now, Severity::Info, "Damage boost expired");
        }
        self.armory.refresh(now, &self.bonus);
    }

    fn build_snapshot(&mut self, outcomes: Vec<CommandOutcome>) -> GameStateSnapshot {
        let live: BTreeSet<ThreatId> = self.targetable_positions().into_iter().map(|(id, _)| id).collect();
        self.selection.prune(|id| live.contains(&id));

        let now = self.time.now_ms;
        let multiplier = self.damage_multiplier();
        GameStateSnapshot {
            time: self.time,
            phase: self.phase,
            wave: self.waves.view(),
            threats: systems::snapshot::build_threats(&self.world, &self.selection, now, self.config.fade_duration_ms),
            drones: systems::snapshot::build_drones(&self.world),
            bays: systems::snapshot::build_bays(&self.bays),
            weapons: self.armory.views(now, &self.bonus, multiplier),
            selected_weapon: Some(self.armory.selected()),
            equipped: self.armory.loadout().to_vec(),
            synergies: self
                .active_synergies
                .iter()
                .map(|s| SynergyView {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    description: s.description.clone(),
                    visual_effect: s.visual_effect.clone(),
                    color: s.color.clone(),
                })
                .collect(),
            bonuses: self.bonus,
            resources: self.ledger.view(),
            selection: self.selection.view(),
            power_ups: systems::snapshot::build_power_ups(&self.world, now),
            score: self.score.view(now / 1000.0),
            feed: self.feed.entries(),
            outcomes,
            auto_targeting: self.auto_targeting,
            damage_boost_remaining_ms: self.boost_until_ms.map_or(0.0, |until| (until - now).max(0.0)),
        }
    }
}

fn describe_shot(report: &ShotReport) -> String {
    format!(
        "{} fired: {} hit, {} neutralized",
        report.weapon.label(),
        report.hits.len(),
        report.neutralized.len()
    )
}
