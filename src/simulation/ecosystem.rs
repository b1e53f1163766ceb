//! The simulation context that owns every piece of game state.
//!
//! The ecosystem ties the modules together:
//! - Turn and phase lifecycle, including breeding at the end of each run
//! - Wave spawning, fish movement and goal detection
//! - Dam and tower resolution against the active fish
//! - Deferred removal through the event queue, applied once per tick
//!
//! Collaborators observe it through [`GameEvent`]s and read-only queries.

use std::collections::HashSet;
use std::path::Path;

use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use super::context::SingletonSlot;
use super::error::{Result, SimError};
use super::event_log::{EventKind, EventLog};
use super::events::{self, EventQueue, SimulationEvent};
use super::field::NavigationField;
use super::fish::FishId;
use super::gating::regulation::RegulationEffect;
use super::gating::{
    Dam, DamLadder, DeviceId, DeviceKind, FishingTower, Gate, GateOutcome, GatingDevice,
    RegulationTower,
};
use super::genome::{Genome, GenomeCensus, Sex};
use super::geometric_utils::Region;
use super::lifecycle::{EndReason, Phase, RunSummary, TurnState};
use super::observer::{EventBus, GameEvent, SubscriptionId};
use super::params::Params;
use super::placement::{PlacementMap, SiteKind};
use super::reproduction::{breed_generation, found_generation};
use super::school::{DeathCause, PopulationCounts, School};
use super::spatial::SpatialIndex;
use super::spawner::WaveSpawner;
use super::time::{GameSpeed, TimeControl};

/// Fraction of a cell kept between clamped fish and the far grid edge.
const EDGE_MARGIN: f32 = 1e-3;

/// The main simulation context.
#[derive(Debug)]
pub struct Ecosystem {
    params: Params,
    rng: StdRng,
    field: SingletonSlot<NavigationField>,
    school: School,
    spawner: Option<WaveSpawner>,
    devices: Vec<Option<GatingDevice>>,
    placement: PlacementMap,
    state: TurnState,
    time: TimeControl,
    bus: EventBus,
    log: EventLog,
    summary: Option<RunSummary>,
}

impl Ecosystem {
    /// Creates a context in the `Intro` phase.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the parameters do not validate.
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            rng,
            field: SingletonSlot::new("navigation field"),
            school: School::new(),
            spawner: None,
            devices: Vec::new(),
            placement: PlacementMap::from_params(&params),
            state: TurnState::default(),
            time: TimeControl::new(&params.time),
            log: EventLog::new(params.event_log_size),
            bus: EventBus::new(),
            summary: None,
            params,
        })
    }

    // ---- collaborators -------------------------------------------------

    /// Installs the navigation field.
    ///
    /// A field built for a different grid is replaced by the default field.
    ///
    /// # Returns
    ///
    /// `false` if a field was already installed; the new one is dropped.
    pub fn register_field(&mut self, field: NavigationField) -> bool {
        let field = if field.matches(&self.params.grid) {
            field
        } else {
            warn!(
                width = field.width(),
                height = field.height(),
                "navigation field does not match the grid, using default"
            );
            NavigationField::new(&self.params.grid)
        };
        self.field.register(field)
    }

    /// Loads and installs a saved navigation field, falling back to the
    /// default field if it cannot be used.
    pub fn load_field(&mut self, path: impl AsRef<Path>) -> bool {
        let field = NavigationField::load_or_default(path, &self.params.grid);
        self.register_field(field)
    }

    fn ensure_field(&mut self) {
        if !self.field.is_registered() {
            self.field.register(NavigationField::new(&self.params.grid));
        }
    }

    /// Adds an event listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(listener)
    }

    /// Removes an event listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn emit(&mut self, event: GameEvent) {
        self.bus.emit(&event);
    }

    fn emit_population(&mut self) {
        let event = GameEvent::PopulationChanged {
            active: self.school.active_genomes(),
            successful: self.school.successful_genomes(),
            dead: self.school.dead_genomes(),
        };
        self.emit(event);
    }

    // ---- lifecycle -----------------------------------------------------

    fn require_phase(&self, expected: Phase, to: Phase) -> Result<()> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(SimError::InvalidTransition {
                from: self.state.phase,
                to,
            })
        }
    }

    fn set_phase(&mut self, next: Phase) -> Result<()> {
        let current = self.state.phase;
        if !current.can_transition_to(&next) {
            return Err(SimError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        self.state.phase = next;
        match next {
            Phase::Place | Phase::Run => self.time.reset(),
            Phase::End(_) => self.time.set_speed(GameSpeed::Paused),
            Phase::Intro | Phase::PostRunSummary => {}
        }
        info!(from = current.name(), to = next.name(), turn = self.state.turn, "phase changed");

        self.emit(GameEvent::PhaseChanged(next));
        if let Phase::End(reason) = next {
            info!(?reason, turn = self.state.turn, "game ended");
            self.emit(GameEvent::GameEnded(reason));
        }
        Ok(())
    }

    /// Founds the first generation and opens the first placement phase.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the game is in `Intro`.
    pub fn start(&mut self) -> Result<()> {
        self.require_phase(Phase::Intro, Phase::Place)?;
        let founders = found_generation(self.params.school.initial_num_fish, &mut self.rng);
        self.start_with(founders)
    }

    /// Like [`Ecosystem::start`], with an explicit founding generation.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the game is in `Intro`.
    pub fn start_with(&mut self, founders: Vec<Genome>) -> Result<()> {
        self.require_phase(Phase::Intro, Phase::Place)?;
        self.ensure_field();
        info!(size = founders.len(), "founded generation");

        self.state.turn = 1;
        self.state.parents = None;
        self.state.pending = founders.clone();
        self.emit(GameEvent::TurnChanged(1));
        self.emit(GameEvent::NewGeneration {
            parents: None,
            offspring: founders,
        });
        self.set_phase(Phase::Place)
    }

    /// Starts a run with the pending generation.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the game is in `Place`.
    pub fn begin_run(&mut self) -> Result<()> {
        self.set_phase(Phase::Run)?;
        self.ensure_field();

        self.school.clear();
        for device in self.devices.iter_mut().flatten() {
            device.cancel_pending();
        }
        self.spawner = Some(WaveSpawner::new(
            self.state.pending.clone(),
            self.params.school.fish_per_wave,
            self.params.school.time_between_waves,
        ));

        info!(turn = self.state.turn, fish = self.state.pending.len(), "run started");
        self.emit(GameEvent::RunStarted);
        self.emit_population();
        Ok(())
    }

    /// Resolves every active fish as aborted and ends the run.
    ///
    /// Genomes that were not spawned yet are dropped.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless a run is in progress.
    pub fn abort_run(&mut self) -> Result<()> {
        self.require_phase(Phase::Run, Phase::Place)?;

        self.spawner = None;
        let aborted = self.school.kill_all_active(DeathCause::Aborted);
        info!(aborted, "run aborted");
        self.emit_population();
        self.finish_run()
    }

    fn finish_run(&mut self) -> Result<()> {
        self.spawner = None;
        for device in self.devices.iter_mut().flatten() {
            device.cancel_pending();
        }

        self.state.turn += 1;
        self.emit(GameEvent::TurnChanged(self.state.turn));

        let parents = self.school.successful_genomes();
        let offspring = breed_generation(
            &parents,
            self.params.school.min_offspring,
            self.params.school.max_offspring,
            &mut self.rng,
        );
        let extinct = offspring.is_empty();

        let counts = self.school.counts();
        self.summary = Some(RunSummary {
            turn: self.state.turn - 1,
            parents: GenomeCensus::count(&parents),
            offspring: GenomeCensus::count(&offspring),
            survived: counts.successful,
            died: counts.dead,
            caught: self.school.deaths_by(DeathCause::Caught),
            extinct,
        });
        info!(
            parents = parents.len(),
            offspring = offspring.len(),
            extinct,
            "bred next generation"
        );

        self.state.pending = offspring.clone();
        self.state.parents = Some(parents.clone());
        self.emit(GameEvent::NewGeneration {
            parents: Some(parents),
            offspring,
        });
        self.emit(GameEvent::RunEnded);

        if self.params.show_summary {
            self.set_phase(Phase::PostRunSummary)
        } else if extinct {
            self.set_phase(Phase::End(EndReason::NoOffspring))
        } else {
            self.set_phase(Phase::Place)
        }
    }

    /// Leaves the post-run summary.
    ///
    /// Goes to `Place`, or to `End(NoOffspring)` after an extinction.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside `PostRunSummary`.
    pub fn advance(&mut self) -> Result<()> {
        self.require_phase(Phase::PostRunSummary, Phase::Place)?;
        if self.summary.is_some_and(|summary| summary.extinct) {
            self.set_phase(Phase::End(EndReason::NoOffspring))
        } else {
            self.set_phase(Phase::Place)
        }
    }

    /// Ends the game at the player's request.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if the game already ended.
    pub fn quit(&mut self) -> Result<()> {
        if self.state.phase == Phase::Run {
            self.spawner = None;
            for device in self.devices.iter_mut().flatten() {
                device.cancel_pending();
            }
        }
        self.set_phase(Phase::End(EndReason::ManualQuit))
    }

    /// Changes the game speed.
    ///
    /// Pausing and the faster speeds are only available during a run.
    ///
    /// # Returns
    ///
    /// `false` if the request was ignored.
    pub fn set_speed(&mut self, speed: GameSpeed) -> bool {
        if speed != GameSpeed::Normal && self.state.phase != Phase::Run {
            debug!(?speed, phase = self.state.phase.name(), "speed change ignored");
            return false;
        }
        self.time.set_speed(speed);
        true
    }

    // ---- placement -----------------------------------------------------

    /// Returns true if `kind` could be placed at `point` right now.
    pub fn placement_valid(&self, kind: DeviceKind, point: &Array1<f32>) -> bool {
        self.state.phase == Phase::Place && self.placement.placement_valid(kind, point)
    }

    /// Builds a device on the site under `point`.
    ///
    /// # Returns
    ///
    /// Handle of the new device, or of the dam a ladder was attached to.
    ///
    /// # Errors
    ///
    /// `InvalidPlacement` outside the `Place` phase or when no suitable site
    /// is under the point. Nothing changes then.
    pub fn place(&mut self, kind: DeviceKind, point: &Array1<f32>) -> Result<DeviceId> {
        if self.state.phase != Phase::Place {
            return Err(SimError::InvalidPlacement(format!(
                "devices can only be placed in the Place phase, not {}",
                self.state.phase.name()
            )));
        }

        let site_id = self.placement.target_site(kind, point)?;
        let site = self
            .placement
            .site(site_id)
            .ok_or_else(|| SimError::InvalidPlacement(format!("unknown site {}", site_id.0)))?;
        let site_center = site.area.center();
        let site_kind = site.kind.clone();
        let occupant = site.occupant();

        let device = match (kind, site_kind) {
            (DeviceKind::Dam, SiteKind::DamSite(site_params)) => {
                let mut dam = Dam::new(site_id, &site_params, &self.params.dam);
                dam.activate();
                GatingDevice::Dam(dam)
            }
            (DeviceKind::DamLadder, SiteKind::DamSite(_)) => {
                let Some(id) = occupant else {
                    return Err(SimError::InvalidPlacement("no dam to attach to".into()));
                };
                let Some(Some(GatingDevice::Dam(dam))) = self.devices.get_mut(id.0) else {
                    return Err(SimError::InvalidPlacement(format!(
                        "device {} is not a dam",
                        id.0
                    )));
                };
                dam.attach_ladder(DamLadder {
                    rates: self.params.dam.ladder_rates,
                });
                self.placement.add_ladder(site_id);
                info!(device = id.0, site = site_id.0, "ladder attached");
                return Ok(id);
            }
            (DeviceKind::FishingTower, SiteKind::TowerPad) => {
                let mut tower =
                    FishingTower::new(site_id, site_center, &self.params.fishing_tower);
                tower.activate();
                GatingDevice::FishingTower(tower)
            }
            (DeviceKind::RegulationTower, SiteKind::TowerPad) => {
                let mut tower =
                    RegulationTower::new(site_id, site_center, &self.params.regulation_tower);
                tower.activate();
                GatingDevice::RegulationTower(tower)
            }
            (kind, _) => {
                return Err(SimError::InvalidPlacement(format!(
                    "{kind:?} does not fit site {}",
                    site_id.0
                )));
            }
        };

        let id = DeviceId(self.devices.len());
        self.devices.push(Some(device));
        self.placement.occupy(site_id, id);
        info!(?kind, device = id.0, site = site_id.0, "device placed");
        Ok(id)
    }

    pub(crate) fn remove_device(&mut self, id: DeviceId) {
        if let Some(device) = self.devices.get_mut(id.0).and_then(Option::take) {
            self.placement.release(device.site());
            info!(device = id.0, "device removed");
        }
    }

    // ---- simulation ----------------------------------------------------

    /// Advances a run by one frame.
    ///
    /// Does nothing outside `Run` or while paused. Each tick spawns due
    /// waves, culls exhausted fish, moves and gates the rest, fires towers,
    /// applies deferred removals and finally ends the run once every genome
    /// was spawned and no fish is left swimming.
    ///
    /// # Errors
    ///
    /// Propagates spatial index failures.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if self.state.phase != Phase::Run || self.time.is_paused() {
            return Ok(());
        }
        let dt = self.time.advance(dt);
        if dt <= 0.0 {
            return Ok(());
        }
        let now = self.time.elapsed();

        let spawned = self.spawn_due_wave(dt, now);

        let mut queue = EventQueue::new();
        let mut resolved = HashSet::new();

        // cull before moving
        for fish in self.school.active() {
            if fish.out_of_energy() {
                queue.push(SimulationEvent::FishDied {
                    fish: fish.id,
                    cause: DeathCause::Exhausted,
                });
                resolved.insert(fish.id);
            }
        }

        self.move_fish(dt, now, &mut queue, &mut resolved);
        self.update_towers(dt, now, &mut queue, &mut resolved)?;

        let population_changed = events::apply_events(self, queue);
        if spawned || population_changed {
            self.emit_population();
        }

        let spawner_done = self.spawner.as_ref().is_none_or(WaveSpawner::is_done);
        if spawner_done && self.school.counts().active == 0 {
            self.finish_run()?;
        }
        Ok(())
    }

    fn spawn_due_wave(&mut self, dt: f32, now: f32) -> bool {
        let Some(spawner) = self.spawner.as_mut() else {
            return false;
        };
        let released = spawner.tick(dt);
        if released.is_empty() {
            return false;
        }

        let count = released.len();
        for genome in released {
            let pos = self.params.spawn_area.random_point(&mut self.rng);
            self.school.spawn(genome, pos, &self.params.fish);
        }
        debug!(count, "wave released");
        self.log
            .log(now, format!("{count} fish released"), EventKind::Spawn);
        true
    }

    fn play_area(&self) -> Region {
        let grid = &self.params.grid;
        let margin = grid.cell_size * EDGE_MARGIN;
        Region::new(
            grid.origin,
            [
                grid.origin[0] + grid.width as f32 * grid.cell_size - margin,
                grid.origin[1] + grid.height as f32 * grid.cell_size - margin,
            ],
        )
    }

    fn move_fish(
        &mut self,
        dt: f32,
        now: f32,
        queue: &mut EventQueue,
        resolved: &mut HashSet<FishId>,
    ) {
        let play_area = self.play_area();
        let goal = self.params.goal.region;
        let nesting_sites = self.params.goal.nesting_sites;
        let cell_size = self.params.grid.cell_size;
        let mut arrivals = [0_usize; 2];

        let Some(field) = self.field.get() else {
            return;
        };

        for id in self.school.active_ids() {
            if resolved.contains(&id) {
                continue;
            }
            let Some(fish) = self.school.fish_mut(id) else {
                continue;
            };

            let vector = match field.vector_at(&fish.pos) {
                Ok(vector) => vector,
                Err(err) => {
                    lose_fish(id, &err, queue, resolved);
                    continue;
                }
            };

            fish.swim(&vector, &self.params.fish, cell_size, dt, &mut self.rng);
            play_area.clamp_mut(&mut fish.pos);
            // clamping cannot repair a non-finite position
            if let Err(err) = field.cell_of(&fish.pos) {
                lose_fish(id, &err, queue, resolved);
                continue;
            }

            for device in self.devices.iter_mut().flatten() {
                let GatingDevice::Dam(dam) = device else {
                    continue;
                };
                if !dam.in_contact(fish) {
                    continue;
                }
                match dam.try_gate(fish, &mut self.rng) {
                    GateOutcome::Pass => {
                        self.log
                            .log(now, format!("fish {} crossed a dam", id.0), EventKind::Crossing);
                    }
                    GateOutcome::Fail => {
                        self.log
                            .log(now, format!("fish {} is stuck at a dam", id.0), EventKind::Stuck);
                        fish.hold_back();
                    }
                    GateOutcome::NoOp => fish.hold_back(),
                }
                break;
            }

            if !goal.contains(&fish.pos) {
                continue;
            }
            let sex = fish.sex();
            let slot = usize::from(sex == Sex::Male);
            let has_room = nesting_sites
                .is_none_or(|sites| self.school.successful_of_sex(sex) + arrivals[slot] < sites);
            if has_room {
                arrivals[slot] += 1;
                queue.push(SimulationEvent::FishSucceeded { fish: id });
                resolved.insert(id);
                self.log
                    .log(now, format!("fish {} reached the spawning grounds", id.0), EventKind::Goal);
            }
        }
    }

    fn update_towers(
        &mut self,
        dt: f32,
        now: f32,
        queue: &mut EventQueue,
        resolved: &mut HashSet<FishId>,
    ) -> Result<()> {
        let index = SpatialIndex::build(&self.school, &self.devices)?;

        for slot in 0..self.devices.len() {
            let Some(mut device) = self.devices[slot].take() else {
                continue;
            };
            match &mut device {
                GatingDevice::FishingTower(tower) => {
                    self.update_fishing_tower(tower, dt, now, &index, queue, resolved);
                }
                GatingDevice::RegulationTower(tower) => {
                    self.update_regulation_tower(tower, dt, now, &index, queue);
                }
                GatingDevice::Dam(_) => {}
            }
            self.devices[slot] = Some(device);
        }
        Ok(())
    }

    fn update_fishing_tower(
        &mut self,
        tower: &mut FishingTower,
        dt: f32,
        now: f32,
        index: &SpatialIndex,
        queue: &mut EventQueue,
        resolved: &mut HashSet<FishId>,
    ) {
        let tick = tower.tick(dt);

        if let Some(attempt) = tick.completed.filter(|attempt| attempt.success) {
            let target = attempt.target;
            if self.school.is_active(target) && resolved.insert(target) {
                tower.record_catch();
                queue.push(SimulationEvent::FishDied {
                    fish: target,
                    cause: DeathCause::Caught,
                });
                self.log
                    .log(now, format!("fish {} was caught", target.0), EventKind::Catch);
            }
        }

        if !tick.fire {
            return;
        }
        let candidates: Vec<FishId> = index
            .query_fish(&tower.pos, tower.effect_radius)
            .into_iter()
            .map(|(_, id)| id)
            .filter(|id| {
                !resolved.contains(id)
                    && self
                        .school
                        .fish(*id)
                        .is_some_and(|fish| !fish.is_being_caught())
            })
            .collect();
        let Some(&target) = candidates.choose(&mut self.rng) else {
            return;
        };
        if let Some(fish) = self.school.fish_mut(target) {
            tower.try_gate(fish, &mut self.rng);
        }
    }

    fn update_regulation_tower(
        &mut self,
        tower: &mut RegulationTower,
        dt: f32,
        now: f32,
        index: &SpatialIndex,
        queue: &mut EventQueue,
    ) {
        let tick = tower.tick(dt);

        if let Some(attempt) = tick.completed.filter(|attempt| attempt.success) {
            self.apply_regulation(tower, attempt.target, now, queue);
        }

        if !tick.fire {
            return;
        }
        let candidates: Vec<DeviceId> = index
            .query_fishing_towers(&tower.pos, tower.effect_radius)
            .into_iter()
            .map(|(_, id)| id)
            .filter(|id| {
                matches!(
                    self.devices.get(id.0),
                    Some(Some(GatingDevice::FishingTower(target))) if tower.can_target(target)
                )
            })
            .collect();
        let Some(&target_id) = candidates.choose(&mut self.rng) else {
            return;
        };
        if let Some(Some(GatingDevice::FishingTower(target))) = self.devices.get_mut(target_id.0) {
            tower.try_regulate(target_id, target, &mut self.rng);
        }
    }

    fn apply_regulation(
        &mut self,
        tower: &mut RegulationTower,
        target_id: DeviceId,
        now: f32,
        queue: &mut EventQueue,
    ) {
        let Some(Some(GatingDevice::FishingTower(target))) = self.devices.get_mut(target_id.0)
        else {
            return;
        };
        let interrupted = target.pending_target();
        match tower.apply_effect(target) {
            RegulationEffect::Disabled => {
                if let Some(fish) = interrupted.and_then(|id| self.school.fish_mut(id)) {
                    fish.cancel_catch();
                }
                queue.push(SimulationEvent::TowerDisabled { device: target_id });
                self.log.log(
                    now,
                    format!("fishing tower {} was shut down", target_id.0),
                    EventKind::Regulation,
                );
            }
            RegulationEffect::Slowed => {
                self.log.log(
                    now,
                    format!("fishing tower {} was slowed", target_id.0),
                    EventKind::Regulation,
                );
            }
        }
    }

    pub(crate) fn resolve_success(&mut self, id: FishId) -> bool {
        self.school.mark_successful(id)
    }

    pub(crate) fn resolve_death(&mut self, id: FishId, cause: DeathCause) -> bool {
        let changed = self.school.mark_dead(id, cause);
        if changed && cause != DeathCause::Caught {
            let now = self.time.elapsed();
            self.log
                .log(now, format!("fish {} died ({cause:?})", id.0), EventKind::Death);
        }
        changed
    }

    // ---- queries -------------------------------------------------------

    /// Current turn, starting at 1 once the game has started.
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Name of the current phase.
    pub fn phase_name(&self) -> &'static str {
        self.state.phase.name()
    }

    /// Genome of a fish spawned this turn.
    pub fn genome_of(&self, id: FishId) -> Option<Genome> {
        self.school.fish(id).map(|fish| *fish.genome())
    }

    /// Current set sizes.
    pub fn population(&self) -> PopulationCounts {
        self.school.counts()
    }

    /// Summary of the most recent run.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Genomes waiting for the next run.
    pub fn pending_generation(&self) -> &[Genome] {
        &self.state.pending
    }

    /// Parents of the pending generation.
    pub fn parents(&self) -> Option<&[Genome]> {
        self.state.parents.as_deref()
    }

    /// This turn's fish.
    pub fn school(&self) -> &School {
        &self.school
    }

    /// Placed devices with their handles.
    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &GatingDevice)> + '_ {
        self.devices
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|device| (DeviceId(index), device)))
    }

    /// Device by handle.
    pub fn device(&self, id: DeviceId) -> Option<&GatingDevice> {
        self.devices.get(id.0).and_then(Option::as_ref)
    }

    /// Placement sites.
    pub fn placement(&self) -> &PlacementMap {
        &self.placement
    }

    /// The navigation field, once installed.
    pub fn field(&self) -> Option<&NavigationField> {
        self.field.get()
    }

    /// The navigation field for editing.
    pub fn field_mut(&mut self) -> Option<&mut NavigationField> {
        self.field.get_mut()
    }

    /// Recent events, newest first.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Speed and elapsed time.
    pub fn time(&self) -> &TimeControl {
        &self.time
    }

    /// Parameters the context was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Genomes still waiting in the spawner.
    pub fn unspawned(&self) -> usize {
        self.spawner.as_ref().map_or(0, WaveSpawner::remaining)
    }
}

fn lose_fish(id: FishId, err: &SimError, queue: &mut EventQueue, resolved: &mut HashSet<FishId>) {
    debug!(fish = id.0, "fish lost: {err}");
    queue.push(SimulationEvent::FishDied {
        fish: id,
        cause: DeathCause::Lost,
    });
    resolved.insert(id);
}
