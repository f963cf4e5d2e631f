#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bloon Defence.
//!
//! The world owns every entity and is mutated only through [`apply`]. A
//! `Command::Tick` runs one simulation step (two under fast-forward) in a
//! fixed phase order: spawning, projectile movement, bloon movement, tower
//! attacks, collision with immediate pops, the pop sweep, and finally the
//! round and game-over checks.

mod bloons;
mod collision;
#[cfg(test)]
mod fixtures;
pub mod grid;
pub mod list;
mod spawn_queue;
mod towers;

use std::mem;

use bloon_defence_core::{
    Abilities, Angle, BloonKind, Catalog, Command, ConfigError, DamageType, Difficulty, Event,
    FireMode, FixedPosition, LoadError, Modifiers, Path, PlacementError, Position, RoundError,
    SavedGame, SimulationConfig, SpawnError, TargetPolicy, TowerError, TowerId, TowerKind,
    UpgradeError, UpgradeLevels, UpgradePath, SAVE_VERSION,
};
use bloon_defence_system_movement::{BloonStep, Movement, ProjectileMotion, ProjectileStep};
use bloon_defence_system_spawning::{round_groups, ScriptedSpawn, Spawning};
use bloon_defence_system_tower_combat::{Payload, TowerCombat};
use bloon_defence_system_tower_targeting::{Candidate, Seeker, TowerTargeting};
use bloon_defence_system_upgrades::{invested, levels_valid, next_upgrade};
use tracing::{debug, info, warn};

use crate::{
    bloons::{Bloon, BloonSeed, Projectile},
    grid::SpatialGrid,
    list::NodeHandle,
    spawn_queue::SpawnQueue,
    towers::{
        check_site, inside_playfield, tower_handle, tower_id, TowerList, TowerState, TOWER_SLOTS,
    },
};

/// Coins paid for every popped bloon.
const POP_REWARD: u32 = 1;
/// Base coins paid for finishing a round, before adding the round index.
const ROUND_BONUS: u32 = 100;

/// Represents the authoritative Bloon Defence world state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    catalog: Catalog,
    path: Path,
    bloons: SpatialGrid<Bloon>,
    projectiles: SpatialGrid<Projectile>,
    towers: TowerList,
    deferred: SpawnQueue,
    spawning: Spawning,
    movement: Movement,
    targeting: TowerTargeting<NodeHandle>,
    combat: TowerCombat,
    scratch: Scratch,
    difficulty: Difficulty,
    sandbox: bool,
    lives: u32,
    coins: u32,
    round: u32,
    max_round: u32,
    round_active: bool,
    game_over: bool,
    fast_forward: bool,
    tick_index: u64,
}

#[derive(Debug, Default)]
struct Scratch {
    handles: Vec<NodeHandle>,
    towers: Vec<NodeHandle>,
    cells: Vec<usize>,
    candidates: Vec<Candidate<NodeHandle>>,
    affected: Vec<Candidate<NodeHandle>>,
    splashed: Vec<NodeHandle>,
    knocked: Vec<(NodeHandle, usize)>,
    spawns: Vec<ScriptedSpawn>,
}

impl World {
    /// Creates a world running the standard game on the standard track.
    #[must_use]
    pub fn new() -> Self {
        Self::build(
            SimulationConfig::default(),
            Catalog::standard(),
            Path::standard(),
        )
    }

    /// Creates a world with custom limits on the standard game data.
    pub fn with_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, Catalog::standard(), Path::standard())
    }

    /// Creates a world from custom limits, balance tables and track.
    pub fn with_parts(
        config: SimulationConfig,
        catalog: Catalog,
        path: Path,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, catalog, path))
    }

    fn build(config: SimulationConfig, catalog: Catalog, path: Path) -> Self {
        let difficulty = Difficulty::default();
        Self {
            bloons: SpatialGrid::new(&config, config.bloon_slots),
            projectiles: SpatialGrid::new(&config, config.projectile_slots),
            towers: TowerList::new(TOWER_SLOTS),
            deferred: SpawnQueue::new(config.deferred_capacity),
            spawning: Spawning::idle(),
            movement: Movement::new(&config),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(&config),
            scratch: Scratch::default(),
            difficulty,
            sandbox: false,
            lives: difficulty.starting_lives(),
            coins: difficulty.starting_coins(),
            round: 0,
            max_round: 0,
            round_active: false,
            game_over: false,
            fast_forward: false,
            tick_index: 0,
            config,
            catalog,
            path,
        }
    }

    fn reset(&mut self, difficulty: Difficulty, sandbox: bool) {
        self.bloons = SpatialGrid::new(&self.config, self.config.bloon_slots);
        self.projectiles = SpatialGrid::new(&self.config, self.config.projectile_slots);
        self.towers = TowerList::new(TOWER_SLOTS);
        self.deferred.clear();
        self.spawning = Spawning::idle();
        self.difficulty = difficulty;
        self.sandbox = sandbox;
        self.lives = difficulty.starting_lives();
        self.coins = difficulty.starting_coins();
        self.round = 0;
        self.max_round = 0;
        self.round_active = false;
        self.game_over = false;
        self.fast_forward = false;
        self.tick_index = 0;
    }

    fn price(&self, base: u32) -> u32 {
        if self.sandbox {
            0
        } else {
            self.difficulty.scale_cost(base)
        }
    }

    fn headroom(&self) -> usize {
        self.config
            .max_live_bloons
            .saturating_sub(self.bloons.total())
    }

    fn place_tower(&mut self, kind: TowerKind, position: Position, out_events: &mut Vec<Event>) {
        let placed = self.check_placement(kind, position).and_then(|cost| {
            let state = TowerState::new(
                &self.catalog,
                kind,
                position,
                UpgradeLevels::default(),
                TargetPolicy::default(),
                cost,
            );
            let handle = self
                .towers
                .insert_tail(state)
                .ok_or(PlacementError::Occupied)?;
            Ok((handle, cost))
        });

        match placed {
            Ok((handle, cost)) => {
                self.coins -= cost;
                out_events.push(Event::TowerPlaced {
                    tower: tower_id(handle),
                    kind,
                    position,
                    cost,
                });
            }
            Err(reason) => {
                debug!(?kind, ?position, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        }
    }

    fn check_placement(&self, kind: TowerKind, position: Position) -> Result<u32, PlacementError> {
        if self.game_over {
            return Err(PlacementError::GameOver);
        }
        check_site(&self.config, &self.path, &self.towers, position)?;

        let cost = self.price(self.catalog.tower(kind).base.cost);
        if cost > self.coins {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(cost)
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.remove(tower_handle(tower)) else {
            out_events.push(Event::TowerCommandRejected {
                tower,
                reason: TowerError::MissingTower,
            });
            return;
        };

        let refund = state.invested.saturating_mul(self.config.sell_refund_percent) / 100;
        self.coins = self.coins.saturating_add(refund);
        out_events.push(Event::TowerSold { tower, refund });
    }

    fn upgrade_tower(&mut self, tower: TowerId, path: UpgradePath, out_events: &mut Vec<Event>) {
        match self.try_upgrade(tower, path) {
            Ok((level, cost)) => out_events.push(Event::TowerUpgraded {
                tower,
                path,
                level,
                cost,
            }),
            Err(reason) => {
                debug!(?tower, ?path, %reason, "upgrade rejected");
                out_events.push(Event::UpgradeRejected {
                    tower,
                    path,
                    reason,
                });
            }
        }
    }

    fn try_upgrade(&mut self, tower: TowerId, path: UpgradePath) -> Result<(u8, u32), UpgradeError> {
        let handle = tower_handle(tower);
        let state = self.towers.get(handle).ok_or(UpgradeError::MissingTower)?;
        let delta = next_upgrade(self.catalog.tower(state.kind), state.levels, path)?;
        let cost = self.price(delta.cost);
        if cost > self.coins {
            return Err(UpgradeError::InsufficientFunds);
        }

        self.coins -= cost;
        let catalog = &self.catalog;
        let state = self
            .towers
            .get_mut(handle)
            .ok_or(UpgradeError::MissingTower)?;
        state.levels = state.levels.incremented(path);
        state.invested = state.invested.saturating_add(cost);
        state.refresh(catalog);
        Ok((state.levels.get(path), cost))
    }

    fn set_target_policy(
        &mut self,
        tower: TowerId,
        policy: TargetPolicy,
        out_events: &mut Vec<Event>,
    ) {
        match self.towers.get_mut(tower_handle(tower)) {
            Some(state) => {
                state.policy = policy;
                out_events.push(Event::TargetPolicyChanged { tower, policy });
            }
            None => out_events.push(Event::TowerCommandRejected {
                tower,
                reason: TowerError::MissingTower,
            }),
        }
    }

    fn start_round(&mut self, out_events: &mut Vec<Event>) {
        let rejection = if self.game_over {
            Some(RoundError::GameOver)
        } else if self.round_active {
            Some(RoundError::InProgress)
        } else {
            None
        };
        if let Some(reason) = rejection {
            debug!(%reason, "round start rejected");
            out_events.push(Event::RoundStartRejected { reason });
            return;
        }

        self.spawning.begin(round_groups(&self.catalog, self.round));
        self.round_active = true;
        info!(round = self.round, "round started");
        out_events.push(Event::RoundStarted { round: self.round });
    }

    fn spawn_requested(
        &mut self,
        kind: BloonKind,
        modifiers: Modifiers,
        out_events: &mut Vec<Event>,
    ) {
        let seed = BloonSeed::at_entrance(
            &self.path,
            kind,
            modifiers,
            self.movement.regrow_interval(),
        );
        match self.spawn_seed(seed) {
            Ok(()) => out_events.push(Event::BloonSpawned { kind, modifiers }),
            Err(reason) => out_events.push(Event::BloonSpawnRejected { kind, reason }),
        }
    }

    fn spawn_seed(&mut self, seed: BloonSeed) -> Result<(), SpawnError> {
        let stats = self
            .catalog
            .bloon(seed.kind)
            .ok_or(SpawnError::UnknownKind)?;
        if self.bloons.total() >= self.config.max_live_bloons {
            return Err(SpawnError::PopulationCap);
        }

        let bloon = Bloon::from_seed(seed, stats);
        self.bloons
            .insert(seed.motion.position, bloon)
            .map(|_| ())
            .ok_or(SpawnError::SlotsExhausted)
    }

    fn load(&mut self, save: SavedGame, out_events: &mut Vec<Event>) {
        let kinds = match self.validate_save(&save) {
            Ok(kinds) => kinds,
            Err(reason) => {
                warn!(%reason, "saved game rejected");
                out_events.push(Event::LoadRejected { reason });
                return;
            }
        };

        self.reset(save.difficulty, save.sandbox);
        for (saved, kind) in save.towers.iter().zip(kinds) {
            let paid = self.price(invested(self.catalog.tower(kind), saved.upgrades));
            let state = TowerState::new(
                &self.catalog,
                kind,
                saved.position,
                saved.upgrades,
                saved.policy,
                paid,
            );
            let inserted = self.towers.insert_tail(state);
            debug_assert!(inserted.is_some(), "validated save exceeded tower slots");
        }
        self.lives = save.lives;
        self.coins = save.coins;
        self.round = save.round;
        self.max_round = save.max_round.max(save.round);

        info!(round = save.round, towers = self.towers.len(), "saved game loaded");
        out_events.push(Event::GameLoaded {
            round: save.round,
            towers: self.towers.len(),
        });
    }

    fn validate_save(&self, save: &SavedGame) -> Result<Vec<TowerKind>, LoadError> {
        if save.version != SAVE_VERSION {
            return Err(LoadError::VersionMismatch {
                found: save.version,
                expected: SAVE_VERSION,
            });
        }
        if save.towers.len() > TOWER_SLOTS {
            return Err(LoadError::TooManyTowers);
        }

        save.towers
            .iter()
            .enumerate()
            .map(|(index, tower)| {
                let kind = tower.tower_kind().ok_or(LoadError::UnknownTowerKind {
                    index,
                    kind: tower.kind,
                })?;
                if !levels_valid(tower.upgrades) {
                    return Err(LoadError::InvalidUpgradeLevels { index });
                }
                if !inside_playfield(&self.config, tower.position) {
                    return Err(LoadError::OutOfBounds { index });
                }
                Ok(kind)
            })
            .collect()
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.spawn_phase(out_events);
        self.projectile_phase();
        self.bloon_phase(out_events);
        self.tower_phase(out_events);
        self.resolve_collisions(out_events);
        self.pop_sweep(out_events);
        self.round_phase(out_events);
    }

    fn spawn_phase(&mut self, out_events: &mut Vec<Event>) {
        let mut drained = 0;
        while drained < self.config.deferred_drain_per_tick && self.headroom() > 0 {
            let Some(seed) = self.deferred.pop() else {
                break;
            };
            drained += 1;
            match self.spawn_seed(seed) {
                Ok(()) => out_events.push(Event::BloonSpawned {
                    kind: seed.kind,
                    modifiers: seed.modifiers,
                }),
                Err(reason) => {
                    debug!(kind = seed.kind.get(), %reason, "deferred child lost");
                    out_events.push(Event::ChildDropped { kind: seed.kind });
                }
            }
        }

        if !self.round_active {
            return;
        }

        let mut spawns = mem::take(&mut self.scratch.spawns);
        spawns.clear();
        self.spawning.handle(self.headroom(), &mut spawns);
        for spawn in spawns.drain(..) {
            let seed = BloonSeed::at_entrance(
                &self.path,
                spawn.kind,
                spawn.modifiers,
                self.movement.regrow_interval(),
            );
            match self.spawn_seed(seed) {
                Ok(()) => out_events.push(Event::BloonSpawned {
                    kind: spawn.kind,
                    modifiers: spawn.modifiers,
                }),
                Err(reason) => out_events.push(Event::BloonSpawnRejected {
                    kind: spawn.kind,
                    reason,
                }),
            }
        }
        self.scratch.spawns = spawns;
    }

    fn projectile_phase(&mut self) {
        let mut handles = mem::take(&mut self.scratch.handles);
        self.projectiles.handles_into(&mut handles);

        for &handle in &handles {
            let Some(mut projectile) = self.projectiles.get(handle).copied() else {
                continue;
            };
            let old_position = projectile.position();
            let old_cell = self.projectiles.cell_of(old_position);

            if projectile.payload.is_homing() {
                self.steer(&mut projectile);
            }

            match self.movement.step_projectile(&mut projectile.motion) {
                ProjectileStep::Moved => {
                    if let Some(slot) = self.projectiles.get_mut(handle) {
                        *slot = projectile;
                    }
                    let _ = self
                        .projectiles
                        .fix(old_cell, handle, projectile.position());
                }
                ProjectileStep::Expired | ProjectileStep::OutOfBounds => {
                    let _ = self.projectiles.remove(old_position, handle);
                }
            }
        }

        self.scratch.handles = handles;
    }

    fn steer(&mut self, projectile: &mut Projectile) {
        let position = projectile.position();
        let seeker = Seeker {
            position,
            range: self.config.homing_radius,
            camo_vision: projectile.payload.camo_vision,
        };
        self.bloons.neighborhood(position, 1, &mut self.scratch.cells);

        let (bloons, catalog) = (&self.bloons, &self.catalog);
        let candidates = self
            .scratch
            .cells
            .iter()
            .flat_map(|&cell| bloons.bucket(cell))
            .filter(|(_, bloon)| bloon.is_alive())
            .map(|(handle, bloon)| candidate(catalog, handle, bloon));

        if let Some(target) = self.targeting.nearest(&seeker, candidates) {
            projectile.motion.steer_toward(target.position);
        }
    }

    fn bloon_phase(&mut self, out_events: &mut Vec<Event>) {
        let mut handles = mem::take(&mut self.scratch.handles);
        self.bloons.handles_into(&mut handles);

        for &handle in &handles {
            let Some(mut bloon) = self.bloons.get(handle).copied() else {
                continue;
            };
            if !bloon.is_alive() {
                continue;
            }
            let old_position = bloon.position();
            let old_cell = self.bloons.cell_of(old_position);

            let pulse = bloon.dot.tick();
            if pulse > 0 {
                bloon.damage(pulse, bloon.dot.tower);
            }

            if let Some(regrowth) = bloon.regrowth.as_mut() {
                let frozen = bloon.motion.is_frozen();
                let grown = self
                    .movement
                    .regrow(bloon.kind, bloon.modifiers, frozen, regrowth);
                let catalog = &self.catalog;
                if let Some((kind, stats)) =
                    grown.and_then(|kind| catalog.bloon(kind).map(|stats| (kind, stats)))
                {
                    bloon.kind = kind;
                    bloon.health = i32::from(stats.health);
                }
            }

            let speed = self.catalog.bloon(bloon.kind).map_or(0, |stats| stats.speed);
            let step = if bloon.is_alive() {
                self.movement.step_bloon(&self.path, &mut bloon.motion, speed)
            } else {
                BloonStep::Held
            };

            if step == BloonStep::Leaked {
                let _ = self.bloons.remove(old_position, handle);
                self.leak(bloon.kind, out_events);
                continue;
            }

            if let Some(slot) = self.bloons.get_mut(handle) {
                *slot = bloon;
            }
            let _ = self.bloons.fix(old_cell, handle, bloon.position());
        }

        self.scratch.handles = handles;
    }

    fn leak(&mut self, kind: BloonKind, out_events: &mut Vec<Event>) {
        let rbe = self.catalog.bloon(kind).map_or(1, |stats| stats.rbe);
        let lives_lost = if self.sandbox { 0 } else { rbe.min(self.lives) };
        self.lives -= lives_lost;
        out_events.push(Event::BloonLeaked { kind, lives_lost });
    }

    fn tower_phase(&mut self, out_events: &mut Vec<Event>) {
        let mut towers = mem::take(&mut self.scratch.towers);
        self.towers.handles_into(&mut towers);

        for &handle in &towers {
            let Some(tower) = self.towers.get(handle).cloned() else {
                continue;
            };
            let id = tower_id(handle);

            if tower.stats.abilities.contains(Abilities::AURA) {
                self.chill(&tower);
            }

            let mut cooldown = tower.cooldown;
            if cooldown.tick() && self.attack(id, &tower, out_events) {
                cooldown.rearm(&tower.stats);
            }
            if let Some(state) = self.towers.get_mut(handle) {
                state.cooldown = cooldown;
            }
        }

        self.scratch.towers = towers;
        self.fix_knocked();
    }

    fn seeker(tower: &TowerState) -> Seeker {
        Seeker {
            position: tower.position,
            range: i32::from(tower.stats.range),
            camo_vision: tower.stats.camo_vision,
        }
    }

    fn gather(&mut self, seeker: &Seeker) {
        self.bloons
            .buckets_in_range(seeker.position, seeker.range, &mut self.scratch.cells);
        self.scratch.candidates.clear();
        for &cell in &self.scratch.cells {
            for (handle, bloon) in self.bloons.bucket(cell) {
                if bloon.is_alive() {
                    self.scratch
                        .candidates
                        .push(candidate(&self.catalog, handle, bloon));
                }
            }
        }
    }

    fn gather_in_range(&mut self, seeker: &Seeker) {
        self.gather(seeker);
        self.targeting.in_range(
            seeker,
            self.scratch.candidates.iter().copied(),
            &mut self.scratch.affected,
        );
    }

    fn chill(&mut self, tower: &TowerState) {
        self.gather_in_range(&Self::seeker(tower));
        let slow = self.config.aura_slow_ticks;
        for target in &self.scratch.affected {
            let Some(bloon) = self.bloons.get_mut(target.key) else {
                continue;
            };
            let immune = self
                .catalog
                .bloon(bloon.kind)
                .map_or(true, |stats| stats.immunity.blocks(DamageType::FREEZE));
            if !immune {
                bloon.motion.slow = bloon.motion.slow.max(slow);
            }
        }
    }

    fn attack(&mut self, id: TowerId, tower: &TowerState, out_events: &mut Vec<Event>) -> bool {
        let seeker = Self::seeker(tower);
        if tower.stats.mode == FireMode::Area {
            return self.freeze_area(id, tower, &seeker, out_events);
        }

        self.gather(&seeker);
        let Some(target) = self.targeting.select(
            &seeker,
            tower.policy,
            self.scratch.candidates.iter().copied(),
        ) else {
            return false;
        };

        let payload = Payload::from_stats(&tower.stats, id);
        if tower.stats.mode == FireMode::Hitscan {
            let angle = self.combat.aim(tower.position, target.position);
            self.strike(target.key, &payload);
            out_events.push(Event::TowerFired { tower: id, angle });
            return true;
        }

        let (next_waypoint, speed) = self
            .bloons
            .get(target.key)
            .map_or((target.position, 0), |bloon| {
                let waypoint = self
                    .path
                    .segment(bloon.motion.segment)
                    .map_or(target.position, |segment| segment.to);
                let speed = self.catalog.bloon(bloon.kind).map_or(0, |stats| stats.speed);
                (waypoint, speed)
            });
        let predicted = self.combat.lead(target.position, next_waypoint, speed);
        let base = self.combat.aim(tower.position, predicted);

        let count = tower.stats.projectile_count;
        let headings = if tower.stats.mode == FireMode::Radial {
            self.combat.radial(base, count)
        } else {
            self.combat.fan(base, count)
        };
        for &angle in headings {
            let projectile = Projectile {
                motion: ProjectileMotion {
                    position: FixedPosition::from_position(tower.position),
                    angle,
                    speed: tower.stats.projectile_speed,
                    lifetime: self.config.projectile_lifetime,
                },
                payload,
                size: self.config.projectile_size,
                last_hit: None,
            };
            if self.projectiles.insert(tower.position, projectile).is_none() {
                debug!(tower = ?id, "projectile slots exhausted");
                break;
            }
        }

        out_events.push(Event::TowerFired {
            tower: id,
            angle: base,
        });
        true
    }

    fn freeze_area(
        &mut self,
        id: TowerId,
        tower: &TowerState,
        seeker: &Seeker,
        out_events: &mut Vec<Event>,
    ) -> bool {
        self.gather_in_range(seeker);
        let limit = usize::from(tower.stats.pierce.max(1));
        let permafrost = tower.stats.abilities.contains(Abilities::PERMAFROST);
        let payload = Payload::from_stats(&tower.stats, id);

        let mut frozen = 0;
        for target in &self.scratch.affected {
            if frozen == limit {
                break;
            }
            let Some(bloon) = self.bloons.get_mut(target.key) else {
                continue;
            };
            let Some(stats) = self.catalog.bloon(bloon.kind) else {
                continue;
            };
            if stats.moab_class || stats.immunity.blocks(DamageType::FREEZE) {
                continue;
            }

            bloon.motion.freeze = self.config.freeze_ticks;
            if permafrost {
                bloon.motion.pending_slow = self.movement.permafrost_slow();
            }
            if payload.damage > 0 && !stats.immunity.blocks(payload.damage_type) {
                bloon.damage(payload.damage_against(false), payload.tower);
            }
            frozen += 1;
        }

        if frozen == 0 {
            return false;
        }
        out_events.push(Event::TowerFired {
            tower: id,
            angle: Angle::EAST,
        });
        true
    }

    fn round_phase(&mut self, out_events: &mut Vec<Event>) {
        if !self.sandbox && self.lives == 0 {
            if !self.game_over {
                self.game_over = true;
                self.round_active = false;
                info!(round = self.round, "game over");
                out_events.push(Event::GameOver { round: self.round });
            }
            return;
        }

        let finished = self.spawning.is_exhausted()
            && self.bloons.total() == 0
            && self.deferred.is_empty();
        if !self.round_active || !finished {
            return;
        }

        let bonus = ROUND_BONUS.saturating_add(self.round);
        self.coins = self.coins.saturating_add(bonus);
        info!(round = self.round, bonus, "round completed");
        out_events.push(Event::RoundCompleted {
            round: self.round,
            bonus,
        });
        self.round = self.round.saturating_add(1);
        self.max_round = self.max_round.max(self.round);
        self.round_active = false;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate(catalog: &Catalog, handle: NodeHandle, bloon: &Bloon) -> Candidate<NodeHandle> {
    Candidate {
        key: handle,
        position: bloon.position(),
        progress: bloon.motion.travelled,
        rbe: catalog.bloon(bloon.kind).map_or(0, |stats| stats.rbe),
        camo: bloon.modifiers.is_camo(),
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame {
            difficulty,
            sandbox,
        } => {
            world.reset(difficulty, sandbox);
            info!(?difficulty, sandbox, "new game started");
            out_events.push(Event::NewGameStarted {
                difficulty,
                sandbox,
            });
        }
        Command::PlaceTower { kind, position } => world.place_tower(kind, position, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::UpgradeTower { tower, path } => world.upgrade_tower(tower, path, out_events),
        Command::SetTargetPolicy { tower, policy } => {
            world.set_target_policy(tower, policy, out_events);
        }
        Command::StartRound => world.start_round(out_events),
        Command::SetFastForward { enabled } => {
            world.fast_forward = enabled;
            out_events.push(Event::FastForwardChanged { enabled });
        }
        Command::SpawnBloon { kind, modifiers } => {
            world.spawn_requested(kind, modifiers, out_events);
        }
        Command::Tick => {
            let steps = if world.fast_forward { 2 } else { 1 };
            for _ in 0..steps {
                if world.game_over {
                    break;
                }
                world.step(out_events);
            }
        }
        Command::LoadGame { save } => world.load(save, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bloon_defence_core::{
        Angle, BloonKind, Catalog, DamageType, Difficulty, Modifiers, Path, Position, SavedGame,
        SavedTower, SimulationConfig, TargetPolicy, TowerId, TowerKind, TowerStats,
        UpgradeLevels, SAVE_VERSION,
    };

    use super::{towers::tower_id, World};
    use crate::grid::SpatialGrid;

    /// Limits the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Balance tables the world was built with.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Track travelled by bloons.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Currency available to spend.
    #[must_use]
    pub fn coins(world: &World) -> u32 {
        world.coins
    }

    /// Zero-based index of the current or next round.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Difficulty of the current game.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Reports whether sandbox rules apply.
    #[must_use]
    pub fn is_sandbox(world: &World) -> bool {
        world.sandbox
    }

    /// Reports whether lives ran out.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Reports whether two steps run per tick.
    #[must_use]
    pub fn is_fast_forward(world: &World) -> bool {
        world.fast_forward
    }

    /// Steps simulated since the game began.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether a round's script is running or its bloons are still live.
    #[must_use]
    pub fn is_round_active(world: &World) -> bool {
        world.round_active
    }

    /// Reports whether the spawn script is exhausted and no bloon remains.
    #[must_use]
    pub fn is_round_finished(world: &World) -> bool {
        world.spawning.is_exhausted() && world.bloons.total() == 0 && world.deferred.is_empty()
    }

    /// Bloons currently stored in the grid.
    #[must_use]
    pub fn live_bloons(world: &World) -> usize {
        world.bloons.total()
    }

    /// Children waiting for headroom.
    #[must_use]
    pub fn deferred_len(world: &World) -> usize {
        world.deferred.len()
    }

    /// Bucket index a position maps to.
    #[must_use]
    pub fn cell_of(world: &World, position: Position) -> usize {
        world.bloons.cell_of(position)
    }

    /// Captures every bloon, enumerated through the active buckets.
    #[must_use]
    pub fn bloon_view(world: &World) -> BloonView {
        let snapshots = world
            .bloons
            .iter()
            .map(|(_, bloon)| BloonSnapshot {
                kind: bloon.kind,
                modifiers: bloon.modifiers,
                position: bloon.position(),
                health: bloon.health,
                progress: bloon.motion.travelled,
                frozen: bloon.motion.freeze > 0,
                slowed: bloon.motion.slow > 0,
                stunned: bloon.motion.stun > 0,
            })
            .collect();
        BloonView { snapshots }
    }

    /// Captures every projectile, enumerated through the active buckets.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .projectiles
            .iter()
            .map(|(_, projectile)| ProjectileSnapshot {
                position: projectile.position(),
                angle: projectile.motion.angle,
                pierce: projectile.payload.pierce,
                lifetime: projectile.motion.lifetime,
                damage_type: projectile.payload.damage_type,
                homing: projectile.payload.is_homing(),
                tower: projectile.payload.tower,
            })
            .collect();
        ProjectileView { snapshots }
    }

    /// Captures every tower in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots = world
            .towers
            .iter()
            .map(|(handle, tower)| TowerSnapshot {
                id: tower_id(handle),
                kind: tower.kind,
                position: tower.position,
                levels: tower.levels,
                policy: tower.policy,
                stats: tower.stats,
                invested: tower.invested,
                pops: tower.pops,
                cooldown: tower.cooldown.remaining(),
            })
            .collect();
        TowerView { snapshots }
    }

    /// Bloon positions grouped by active bucket, with the grid's running total.
    #[must_use]
    pub fn bloon_buckets(world: &World) -> BucketView {
        bucket_view(&world.bloons, |bloon| bloon.position())
    }

    /// Projectile positions grouped by active bucket, with the grid's running total.
    #[must_use]
    pub fn projectile_buckets(world: &World) -> BucketView {
        bucket_view(&world.projectiles, |projectile| projectile.position())
    }

    fn bucket_view<T>(grid: &SpatialGrid<T>, position: impl Fn(&T) -> Position) -> BucketView {
        let buckets = grid
            .active_buckets()
            .iter()
            .map(|&cell| BucketSnapshot {
                cell,
                positions: grid.bucket(cell).map(|(_, value)| position(value)).collect(),
            })
            .collect();
        BucketView {
            buckets,
            total: grid.total(),
        }
    }

    /// Player-owned state sufficient to rebuild the game between rounds.
    #[must_use]
    pub fn saved_game(world: &World) -> SavedGame {
        SavedGame {
            version: SAVE_VERSION,
            round: world.round,
            max_round: world.max_round,
            difficulty: world.difficulty,
            lives: world.lives,
            coins: world.coins,
            sandbox: world.sandbox,
            towers: world
                .towers
                .iter()
                .map(|(_, tower)| {
                    SavedTower::new(tower.position, tower.kind, tower.levels, tower.policy)
                })
                .collect(),
        }
    }

    /// Read-only snapshot describing all live bloons.
    #[derive(Clone, Debug)]
    pub struct BloonView {
        snapshots: Vec<BloonSnapshot>,
    }

    impl BloonView {
        /// Iterator over the captured bloons in bucket order.
        pub fn iter(&self) -> impl Iterator<Item = &BloonSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<BloonSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single bloon.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BloonSnapshot {
        /// Current kind.
        pub kind: BloonKind,
        /// Current modifiers.
        pub modifiers: Modifiers,
        /// Pixel position.
        pub position: Position,
        /// Remaining hit points.
        pub health: i32,
        /// Fixed-point distance travelled along the path.
        pub progress: i64,
        /// Whether a freeze holds the bloon.
        pub frozen: bool,
        /// Whether the bloon moves at half speed.
        pub slowed: bool,
        /// Whether a stun holds the bloon.
        pub stunned: bool,
    }

    /// Read-only snapshot describing all projectiles in flight.
    #[derive(Clone, Debug)]
    pub struct ProjectileView {
        snapshots: Vec<ProjectileSnapshot>,
    }

    impl ProjectileView {
        /// Iterator over the captured projectiles in bucket order.
        pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single projectile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ProjectileSnapshot {
        /// Pixel position.
        pub position: Position,
        /// Heading.
        pub angle: Angle,
        /// Hits remaining.
        pub pierce: u16,
        /// Ticks before expiry.
        pub lifetime: u16,
        /// Damage type carried.
        pub damage_type: DamageType,
        /// Whether the projectile steers toward bloons.
        pub homing: bool,
        /// Tower credited with its pops.
        pub tower: Option<TowerId>,
    }

    /// Read-only snapshot describing all towers.
    #[derive(Clone, Debug)]
    pub struct TowerView {
        snapshots: Vec<TowerSnapshot>,
    }

    impl TowerView {
        /// Iterator over the captured towers in placement order.
        pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<TowerSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single tower.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TowerSnapshot {
        /// Identifier assigned at placement.
        pub id: TowerId,
        /// Tower kind.
        pub kind: TowerKind,
        /// Footprint centre.
        pub position: Position,
        /// Purchased upgrade levels.
        pub levels: UpgradeLevels,
        /// Target selection policy.
        pub policy: TargetPolicy,
        /// Effective statistics.
        pub stats: TowerStats,
        /// Currency spent on the tower.
        pub invested: u32,
        /// Bloons popped by the tower.
        pub pops: u32,
        /// Ticks until the tower may attack again.
        pub cooldown: u16,
    }

    /// Entity positions grouped by grid bucket.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BucketView {
        /// Active buckets in creation order.
        pub buckets: Vec<BucketSnapshot>,
        /// Running total maintained by the grid.
        pub total: usize,
    }

    /// Positions of the entities stored in one bucket.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BucketSnapshot {
        /// Bucket index.
        pub cell: usize,
        /// Entity positions, head to tail.
        pub positions: Vec<Position>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(config: SimulationConfig) -> World {
        World::with_config(config).expect("valid config")
    }

    fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command, &mut events);
        }
        events
    }

    fn ticks(count: usize) -> impl Iterator<Item = Command> {
        std::iter::repeat(Command::Tick).take(count)
    }

    #[test]
    fn new_world_starts_on_medium() {
        let world = World::new();
        assert_eq!(query::lives(&world), 150);
        assert_eq!(query::coins(&world), 650);
        assert_eq!(query::round(&world), 0);
        assert!(query::is_round_finished(&world));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = SimulationConfig {
            width: 0,
            ..SimulationConfig::default()
        };
        assert!(World::with_config(config).is_err());
    }

    #[test]
    fn placement_charges_scaled_cost() {
        let mut world = World::new();
        let events = apply_all(
            &mut world,
            [
                Command::NewGame {
                    difficulty: Difficulty::Hard,
                    sandbox: false,
                },
                Command::PlaceTower {
                    kind: TowerKind::Dart,
                    position: Position::new(100, 100),
                },
            ],
        );
        assert!(events.iter().any(|event| matches!(
            event,
            Event::TowerPlaced { cost: 216, .. }
        )));
        assert_eq!(query::coins(&world), 600 - 216);
    }

    #[test]
    fn sandbox_placement_is_free() {
        let mut world = World::new();
        let _ = apply_all(
            &mut world,
            [
                Command::NewGame {
                    difficulty: Difficulty::Medium,
                    sandbox: true,
                },
                Command::PlaceTower {
                    kind: TowerKind::Sniper,
                    position: Position::new(100, 100),
                },
            ],
        );
        assert_eq!(query::coins(&world), 650);
        assert_eq!(query::tower_view(&world).iter().count(), 1);
    }

    #[test]
    fn selling_refunds_seventy_percent() {
        let mut world = World::new();
        let events = apply_all(
            &mut world,
            [Command::PlaceTower {
                kind: TowerKind::Dart,
                position: Position::new(100, 100),
            }],
        );
        let Some(Event::TowerPlaced { tower, .. }) = events.first() else {
            panic!("tower not placed: {events:?}");
        };

        let events = apply_all(&mut world, [Command::SellTower { tower: *tower }]);
        assert_eq!(
            events,
            vec![Event::TowerSold {
                tower: *tower,
                refund: 140
            }]
        );
        assert_eq!(query::coins(&world), 650 - 200 + 140);

        let events = apply_all(&mut world, [Command::SellTower { tower: *tower }]);
        assert_eq!(
            events,
            vec![Event::TowerCommandRejected {
                tower: *tower,
                reason: TowerError::MissingTower
            }]
        );
    }

    #[test]
    fn red_bloon_walks_to_the_exit_and_costs_one_life() {
        let mut world = World::new();
        let events = apply_all(
            &mut world,
            [Command::SpawnBloon {
                kind: BloonKind::RED,
                modifiers: Modifiers::empty(),
            }],
        );
        assert_eq!(
            events,
            vec![Event::BloonSpawned {
                kind: BloonKind::RED,
                modifiers: Modifiers::empty()
            }]
        );

        let events = apply_all(&mut world, ticks(1209));
        assert!(events.contains(&Event::BloonLeaked {
            kind: BloonKind::RED,
            lives_lost: 1
        }));
        assert_eq!(query::lives(&world), 149);
        assert_eq!(query::live_bloons(&world), 0);
    }

    #[test]
    fn population_cap_rejects_manual_spawns() {
        let mut world = world_with(SimulationConfig {
            max_live_bloons: 1,
            ..SimulationConfig::default()
        });
        let spawn = Command::SpawnBloon {
            kind: BloonKind::RED,
            modifiers: Modifiers::empty(),
        };
        let events = apply_all(&mut world, [spawn.clone(), spawn]);
        assert_eq!(
            events[1],
            Event::BloonSpawnRejected {
                kind: BloonKind::RED,
                reason: SpawnError::PopulationCap
            }
        );
    }

    #[test]
    fn second_round_start_is_rejected_while_running() {
        let mut world = World::new();
        let events = apply_all(&mut world, [Command::StartRound, Command::StartRound]);
        assert_eq!(
            events,
            vec![
                Event::RoundStarted { round: 0 },
                Event::RoundStartRejected {
                    reason: RoundError::InProgress
                }
            ]
        );
    }

    #[test]
    fn fast_forward_runs_two_steps_per_tick() {
        let mut world = World::new();
        let _ = apply_all(
            &mut world,
            [Command::SetFastForward { enabled: true }, Command::Tick],
        );
        assert_eq!(query::tick(&world), 2);
    }

    #[test]
    fn unknown_bloon_kind_is_rejected() {
        let mut world = World::new();
        let events = apply_all(
            &mut world,
            [Command::SpawnBloon {
                kind: BloonKind::new(42),
                modifiers: Modifiers::empty(),
            }],
        );
        assert_eq!(
            events,
            vec![Event::BloonSpawnRejected {
                kind: BloonKind::new(42),
                reason: SpawnError::UnknownKind
            }]
        );
    }

    const ICE_SITE: Position = Position::new(100, 100);

    fn ice_tower(upgrades: &[UpgradePath]) -> (World, TowerId, TowerState) {
        let mut world = fixtures::sandbox_with(SimulationConfig::default());
        let events = fixtures::run(
            &mut world,
            [Command::PlaceTower {
                kind: TowerKind::Ice,
                position: ICE_SITE,
            }],
        );
        let Some(Event::TowerPlaced { tower, .. }) = events.first().cloned() else {
            panic!("ice tower not placed: {events:?}");
        };
        let events = fixtures::run(
            &mut world,
            upgrades
                .iter()
                .map(|&path| Command::UpgradeTower { tower, path }),
        );
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::TowerUpgraded { .. })));

        let state = world
            .towers
            .get(tower_handle(tower))
            .cloned()
            .expect("ice tower");
        (world, tower, state)
    }

    #[test]
    fn ice_freezes_visible_bloons_except_moabs_and_white() {
        let (mut world, id, tower) = ice_tower(&[]);
        let red = fixtures::put_bloon(&mut world, BloonKind::RED, Position::new(110, 100));
        let white = fixtures::put_bloon(&mut world, BloonKind::WHITE, Position::new(100, 120));
        let moab = fixtures::put_bloon(&mut world, BloonKind::MOAB, Position::new(90, 100));
        let far = fixtures::put_bloon(&mut world, BloonKind::RED, Position::new(100, 200));

        let mut events = Vec::new();
        assert!(world.freeze_area(id, &tower, &World::seeker(&tower), &mut events));

        let freeze = |handle| world.bloons.get(handle).map(|bloon| bloon.motion.freeze);
        assert_eq!(freeze(red), Some(world.config.freeze_ticks));
        assert_eq!(freeze(white), Some(0));
        assert_eq!(freeze(moab), Some(0));
        assert_eq!(freeze(far), Some(0));
        assert_eq!(
            world.bloons.get(red).map(|bloon| bloon.motion.pending_slow),
            Some(0)
        );
        assert_eq!(
            events,
            vec![Event::TowerFired {
                tower: id,
                angle: Angle::EAST
            }]
        );
    }

    #[test]
    fn ice_without_targets_holds_its_shot() {
        let (mut world, id, tower) = ice_tower(&[]);
        let _ = fixtures::put_bloon(&mut world, BloonKind::WHITE, Position::new(110, 100));

        let mut events = Vec::new();
        assert!(!world.freeze_area(id, &tower, &World::seeker(&tower), &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn permafrost_leaves_a_slow_behind_the_freeze() {
        let (mut world, id, tower) = ice_tower(&[UpgradePath::Second]);
        assert!(tower.stats.abilities.contains(Abilities::PERMAFROST));
        let red = fixtures::put_bloon(&mut world, BloonKind::RED, Position::new(110, 100));

        let mut events = Vec::new();
        assert!(world.freeze_area(id, &tower, &World::seeker(&tower), &mut events));

        let motion = world.bloons.get(red).map(|bloon| bloon.motion).expect("red");
        assert_eq!(motion.freeze, world.config.freeze_ticks);
        assert_eq!(motion.pending_slow, world.config.permafrost_slow_ticks);
    }

    #[test]
    fn aura_keeps_the_longest_slow_and_spares_white() {
        let (mut world, _, tower) = ice_tower(&[UpgradePath::First; 3]);
        assert!(tower.stats.abilities.contains(Abilities::AURA));
        let red = fixtures::put_bloon(&mut world, BloonKind::RED, Position::new(110, 100));
        let glued = fixtures::put_bloon(&mut world, BloonKind::RED, Position::new(90, 100));
        let white = fixtures::put_bloon(&mut world, BloonKind::WHITE, Position::new(100, 120));
        if let Some(bloon) = world.bloons.get_mut(glued) {
            bloon.motion.slow = 50;
        }

        world.chill(&tower);

        let slow = |handle| world.bloons.get(handle).map(|bloon| bloon.motion.slow);
        assert_eq!(slow(red), Some(world.config.aura_slow_ticks));
        assert_eq!(slow(glued), Some(50));
        assert_eq!(slow(white), Some(0));
    }

    #[test]
    fn homing_projectile_keeps_heading_until_a_bloon_is_near() {
        let mut world = fixtures::sandbox_with(SimulationConfig::default());
        let homing = Payload {
            abilities: Abilities::HOMING,
            ..fixtures::payload(1, DamageType::SHARP)
        };
        let shot = fixtures::put_projectile(&mut world, Position::new(200, 50), homing);
        let _ = fixtures::put_bloon(&mut world, BloonKind::RED, Position::new(40, 200));

        world.projectile_phase();
        let projectile = world.projectiles.get(shot).copied().expect("projectile");
        assert_eq!(projectile.motion.angle, Angle::EAST);
        assert_eq!(projectile.position(), Position::new(204, 50));

        let target = Position::new(215, 70);
        let _ = fixtures::put_bloon(&mut world, BloonKind::RED, target);
        world.projectile_phase();
        let projectile = world.projectiles.get(shot).copied().expect("projectile");
        assert_eq!(
            projectile.motion.angle,
            Angle::between(Position::new(204, 50), target)
        );
    }
}
