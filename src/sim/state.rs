//! Game state and the per-phase tick context
//!
//! `GameState` owns the entity arena for the lifetime of one run. Each
//! phase of a tick borrows the arena together with a [`TickContext`] that
//! collects everything the phase creates; the context is flushed back into
//! the arena when the phase ends.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Archetype, Entity, PlayerState, find_player};
use super::ships::ShipKind;
use super::spawner::{self, Spawner};
use crate::settings::{GameMode, PlayArea, SandboxSettings, Settings, SpawnPolicy};
use crate::{Rgba, consts::*};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen; nothing ticks
    Paused,
    /// Player destroyed, final score recorded
    GameOver,
}

/// Damage queued during the update phase, applied by combat resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: usize,
    pub amount: f32,
}

/// What a phase produced, handed back to the state
#[derive(Debug, Default)]
pub struct PhaseOutput {
    pub spawned: Vec<Entity>,
    pub score_gained: u64,
    pub kills: u32,
}

/// Mutable services available to every entity during a phase
pub struct TickContext<'a> {
    pub area: PlayArea,
    pub tick: u64,
    pub rng: &'a mut Pcg32,
    next_id: &'a mut u32,
    spawned: Vec<Entity>,
    particle_budget: usize,
    damage: Vec<DamageRequest>,
    score_gained: u64,
    kills: u32,
}

impl<'a> TickContext<'a> {
    pub fn new(
        area: PlayArea,
        tick: u64,
        rng: &'a mut Pcg32,
        next_id: &'a mut u32,
        particle_budget: usize,
    ) -> Self {
        Self {
            area,
            tick,
            rng,
            next_id,
            spawned: Vec::new(),
            particle_budget,
            damage: Vec::new(),
            score_gained: 0,
            kills: 0,
        }
    }

    /// Allocate a new entity ID
    pub fn alloc_id(&mut self) -> u32 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }

    /// Queue an entity; it joins the arena when the phase ends
    pub fn spawn(&mut self, entity: Entity) {
        self.spawned.push(entity);
    }

    /// Entities queued so far this phase
    pub fn spawned(&self) -> &[Entity] {
        &self.spawned
    }

    /// Spray `count` particles from a point, within the particle budget
    pub fn burst(&mut self, pos: Vec2, color: Rgba, count: usize, speed: f32) {
        let count = count.min(self.particle_budget);
        self.particle_budget -= count;
        for _ in 0..count {
            let id = self.alloc_id();
            let particle = Entity::particle(id, pos, color, speed, &mut *self.rng);
            self.spawned.push(particle);
        }
    }

    pub fn request_damage(&mut self, target: usize, amount: f32) {
        self.damage.push(DamageRequest { target, amount });
    }

    pub fn take_damage(&mut self) -> Vec<DamageRequest> {
        std::mem::take(&mut self.damage)
    }

    /// Credit an enemy kill
    pub fn award_kill(&mut self, score: u64) {
        self.score_gained += score;
        self.kills += 1;
    }

    pub fn finish(self) -> PhaseOutput {
        PhaseOutput {
            spawned: self.spawned,
            score_gained: self.score_gained,
            kills: self.kills,
        }
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub mode: GameMode,
    pub area: PlayArea,
    pub spawn_policy: SpawnPolicy,
    pub sandbox: SandboxSettings,
    pub max_particles: usize,
    /// Ship chosen for this run
    pub ship: ShipKind,
    /// The live entity arena
    pub entities: Vec<Entity>,
    pub score: u64,
    pub kills: u32,
    pub phase: GamePhase,
    /// Set once when the run ends
    pub final_score: Option<u64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub spawner: Spawner,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a run with the player (and sandbox bodies) in place
    pub fn new(settings: &Settings, ship: ShipKind, seed: u64) -> Self {
        let mut state = Self::empty(settings, ship, seed);
        let player_pos = Vec2::new(
            state.area.width / 2.0,
            state.area.height - PLAYER_SPAWN_INSET,
        );
        let id = state.next_entity_id();
        state.push_entity(Entity::player(id, player_pos, ship));

        if state.mode == GameMode::Sandbox {
            let sandbox = state.sandbox.clone();
            state.run_phase(|entities, ctx| spawner::populate_sandbox(entities, ctx, &sandbox));
        }
        log::info!(
            "New {:?} run: ship {}, seed {}",
            state.mode,
            ship.name(),
            seed
        );
        state
    }

    /// A run with an empty arena (scenario setups and tests)
    pub fn empty(settings: &Settings, ship: ShipKind, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: settings.mode,
            area: settings.play_area.sanitized(),
            spawn_policy: settings.spawn,
            sandbox: settings.sandbox.clone(),
            max_particles: settings.max_particles(),
            ship,
            entities: Vec::new(),
            score: 0,
            kills: 0,
            phase: GamePhase::Playing,
            final_score: None,
            time_ticks: 0,
            spawner: Spawner::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an entity to the arena. Non-finite spawns are dropped.
    pub fn push_entity(&mut self, entity: Entity) {
        if entity.is_finite() {
            self.entities.push(entity);
        } else {
            log::warn!("Dropped non-finite {:?} spawn", entity.archetype());
        }
    }

    /// Run one phase: `f` gets the arena and a fresh context; whatever the
    /// phase spawned or scored is applied afterwards.
    pub fn run_phase<R>(&mut self, f: impl FnOnce(&mut [Entity], &mut TickContext) -> R) -> R {
        let live_particles = self.count(Archetype::Particle);
        let budget = self.max_particles.saturating_sub(live_particles);
        let mut ctx = TickContext::new(
            self.area,
            self.time_ticks,
            &mut self.rng,
            &mut self.next_id,
            budget,
        );
        let out = f(&mut self.entities, &mut ctx);
        let output = ctx.finish();

        self.score += output.score_gained;
        self.kills += output.kills;
        for entity in output.spawned {
            self.push_entity(entity);
        }
        out
    }

    /// Remove every dead entity. Running it again changes nothing.
    pub fn cleanup(&mut self) {
        self.entities.retain(|e| !e.dead);
    }

    /// Difficulty step for the current score
    pub fn difficulty(&self) -> u32 {
        spawner::difficulty_for(self.score)
    }

    pub fn player_index(&self) -> Option<usize> {
        find_player(&self.entities)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_index().map(|i| &self.entities[i])
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        self.player().and_then(|p| p.player_state())
    }

    /// Living entities of one archetype
    pub fn count(&self, archetype: Archetype) -> usize {
        self.entities
            .iter()
            .filter(|e| !e.dead && e.archetype() == archetype)
            .count()
    }

    /// Living entities
    pub fn live_count(&self) -> usize {
        self.entities.iter().filter(|e| !e.dead).count()
    }

    /// End the run and freeze the score
    pub fn game_over(&mut self) {
        if self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            self.final_score = Some(self.score);
            log::info!(
                "Game over: score {} ({} kills, {} ticks)",
                self.score,
                self.kills,
                self.time_ticks
            );
        }
    }
}
