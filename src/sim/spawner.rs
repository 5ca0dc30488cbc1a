//! Enemy and sandbox population
//!
//! Difficulty is a step function of score. It widens the HP roll of basic
//! enemies and unlocks the tougher archetypes once the score passes their
//! thresholds.

use glam::Vec2;
use rand::Rng;

use super::entity::{Archetype, Entity, enemies, find_player};
use super::state::TickContext;
use crate::consts::*;
use crate::settings::{GameMode, SandboxSettings, SpawnPolicy};

/// Enemies enter this far above the top edge
const SPAWN_Y: f32 = -50.0;
/// Horizontal inset for enemy spawn positions
const SPAWN_INSET_X: f32 = 25.0;
/// Sandbox bodies keep this far from the edges
const BODY_INSET: f32 = 80.0;
/// Sandbox bodies are not placed this close to the player
const PLAYER_CLEARANCE: f32 = 160.0;

/// `1 + floor(score / 500)`
pub fn difficulty_for(score: u64) -> u32 {
    let step = score / DIFFICULTY_SCORE_STEP;
    u32::try_from(step).unwrap_or(u32::MAX - 1).saturating_add(1)
}

/// Roll weights for basic, seeker and splitter enemies at a score
pub fn archetype_weights(score: u64) -> [(Archetype, u32); 3] {
    [
        (Archetype::Enemy, 70),
        (
            Archetype::Seeker,
            if score >= SEEKER_UNLOCK_SCORE { 20 } else { 0 },
        ),
        (
            Archetype::Splitter,
            if score >= SPLITTER_UNLOCK_SCORE { 10 } else { 0 },
        ),
    ]
}

/// Weighted pick among the unlocked enemy archetypes
pub fn roll_archetype(score: u64, rng: &mut impl Rng) -> Archetype {
    let weights = archetype_weights(score);
    let total: u32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (archetype, weight) in weights {
        if roll < weight {
            return archetype;
        }
        roll -= weight;
    }
    Archetype::Enemy
}

/// Spawn timers carried between ticks
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Ticks since the last periodic enemy
    timer: u32,
    /// Ticks since the last sandbox spark
    spark_timer: u32,
}

impl Spawner {
    /// Spawn phase of one tick
    pub fn step(
        &mut self,
        entities: &[Entity],
        ctx: &mut TickContext,
        mode: GameMode,
        policy: SpawnPolicy,
        score: u64,
        sandbox: &SandboxSettings,
    ) {
        match mode {
            GameMode::Arcade => {
                if self.enemy_due(policy, ctx) {
                    spawn_enemy(ctx, score);
                }
            }
            GameMode::Sandbox => {
                self.spark_timer += 1;
                if self.spark_timer >= sandbox.spark_interval.max(1) {
                    self.spark_timer = 0;
                    let sparks = entities
                        .iter()
                        .filter(|e| !e.dead && e.is_prey())
                        .count();
                    if sparks < sandbox.spark_target as usize {
                        spawn_spark(ctx);
                    }
                }
            }
        }
    }

    fn enemy_due(&mut self, policy: SpawnPolicy, ctx: &mut TickContext) -> bool {
        match policy {
            SpawnPolicy::Periodic { interval } => {
                self.timer += 1;
                if self.timer >= interval.max(1) {
                    self.timer = 0;
                    true
                } else {
                    false
                }
            }
            SpawnPolicy::Probabilistic { chance } => ctx.rng.random::<f32>() < chance,
        }
    }
}

/// Drop a new enemy in above the play area
pub fn spawn_enemy(ctx: &mut TickContext, score: u64) {
    let width = ctx.area.width;
    let x = if width > SPAWN_INSET_X * 2.0 {
        ctx.rng.random_range(SPAWN_INSET_X..=width - SPAWN_INSET_X)
    } else {
        width / 2.0
    };
    let pos = Vec2::new(x, SPAWN_Y);
    let difficulty = difficulty_for(score);
    let archetype = roll_archetype(score, &mut *ctx.rng);

    let id = ctx.alloc_id();
    let enemy = match archetype {
        Archetype::Seeker => Entity::seeker(id, pos, difficulty),
        Archetype::Splitter => Entity::splitter(id, pos, difficulty, enemies::SPLITTER_FRAGMENTS),
        _ => Entity::enemy(id, pos, difficulty, &mut *ctx.rng),
    };
    log::debug!(
        "Spawned {:?} ({} hp) at x={:.0}, difficulty {}",
        enemy.archetype(),
        enemy.hp,
        x,
        difficulty
    );
    ctx.spawn(enemy);
}

/// Scatter `count` minor fragments from a point
pub fn spawn_fragments(ctx: &mut TickContext, pos: Vec2, count: u32) {
    for _ in 0..count {
        let id = ctx.alloc_id();
        let minor = Entity::minor(id, pos, &mut *ctx.rng);
        ctx.spawn(minor);
    }
}

fn random_point(ctx: &mut TickContext, inset: f32) -> Vec2 {
    let area = ctx.area;
    let axis = |rng: &mut rand_pcg::Pcg32, extent: f32| {
        if extent > inset * 2.0 {
            rng.random_range(inset..=extent - inset)
        } else {
            extent / 2.0
        }
    };
    let x = axis(&mut *ctx.rng, area.width);
    let y = axis(&mut *ctx.rng, area.height);
    Vec2::new(x, y)
}

/// Random point for a sandbox body, kept clear of the player when possible
fn body_point(ctx: &mut TickContext, player: Option<Vec2>) -> Vec2 {
    let mut pos = random_point(ctx, BODY_INSET);
    for _ in 0..16 {
        match player {
            Some(p) if p.distance(pos) < PLAYER_CLEARANCE => pos = random_point(ctx, BODY_INSET),
            _ => break,
        }
    }
    pos
}

fn spawn_spark(ctx: &mut TickContext) {
    let pos = random_point(ctx, 0.0);
    let id = ctx.alloc_id();
    let spark = Entity::spark(id, pos, &mut *ctx.rng);
    ctx.spawn(spark);
}

/// Seed a sandbox arena with its bodies and an initial spark population
pub fn populate_sandbox(entities: &mut [Entity], ctx: &mut TickContext, sandbox: &SandboxSettings) {
    let player = find_player(entities).map(|i| entities[i].pos);

    for _ in 0..sandbox.black_holes {
        let pos = body_point(ctx, player);
        let id = ctx.alloc_id();
        ctx.spawn(Entity::black_hole(id, pos));
    }
    for _ in 0..sandbox.void_maws {
        let pos = body_point(ctx, player);
        let id = ctx.alloc_id();
        ctx.spawn(Entity::void_maw(id, pos));
    }
    for _ in 0..sandbox.pulsars {
        let pos = body_point(ctx, player);
        let stagger = ctx.rng.random_range(1..=super::entity::bodies::PULSAR_INTERVAL);
        let id = ctx.alloc_id();
        ctx.spawn(Entity::pulsar(id, pos, stagger));
    }
    for _ in 0..sandbox.spark_target / 2 {
        spawn_spark(ctx);
    }
    log::debug!(
        "Sandbox populated: {} black holes, {} maws, {} pulsars",
        sandbox.black_holes,
        sandbox.void_maws,
        sandbox.pulsars
    );
}
