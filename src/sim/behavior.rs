//! Per-archetype motion rules
//!
//! `update_all` walks the arena once per tick. Each live entity gets the
//! whole arena by index so seekers, maws and pulsars can look at their
//! siblings. Entities spawned during the pass join the arena afterwards and
//! are first updated on the next tick.

use glam::Vec2;
use rand::Rng;

use super::ability;
use super::entity::{
    EnemyBehavior, Entity, Extent, Kind, ProjectilePath, bodies, enemies, find_player,
};
use super::ships::ShipConfig;
use super::state::TickContext;
use super::tick::TickInput;
use crate::consts::*;
use crate::{clamp_speed, colors};

/// A gravity source, sampled once at the start of the pass
#[derive(Debug, Clone, Copy)]
struct Attractor {
    id: u32,
    pos: Vec2,
    radius: f32,
    strength: f32,
    influence: f32,
}

fn gather_attractors(entities: &[Entity]) -> Vec<Attractor> {
    entities
        .iter()
        .filter(|e| !e.dead)
        .filter_map(|e| match e.kind {
            Kind::BlackHole {
                strength,
                influence,
                ..
            } => Some(Attractor {
                id: e.id,
                pos: e.pos,
                radius: e.radius(),
                strength,
                influence,
            }),
            _ => None,
        })
        .collect()
}

/// Update every live entity once
pub fn update_all(entities: &mut [Entity], ctx: &mut TickContext, input: &TickInput) {
    let attractors = gather_attractors(entities);

    for i in 0..entities.len() {
        if entities[i].dead {
            continue;
        }

        if !entities[i].is_immovable() && apply_gravity(&mut entities[i], &attractors) {
            swallow(&mut entities[i], ctx);
            continue;
        }

        match entities[i].kind {
            Kind::Player(_) => update_player(i, entities, ctx, input),
            Kind::Enemy { behavior, .. } => update_enemy(i, behavior, entities, ctx),
            Kind::Projectile { .. } => update_projectile(&mut entities[i], ctx),
            Kind::Particle { .. } => update_particle(&mut entities[i]),
            Kind::Shockwave { .. } => update_shockwave(&mut entities[i]),
            Kind::BlackHole { .. } => update_black_hole(&mut entities[i]),
            Kind::VoidMaw { .. } => update_void_maw(i, entities, ctx),
            Kind::Pulsar { .. } => update_pulsar(i, entities, ctx),
            Kind::Spark => update_spark(&mut entities[i], ctx),
        }
    }
}

/// Inverse-square pull from every attractor in range.
/// Returns true if the entity crossed an event horizon.
fn apply_gravity(entity: &mut Entity, attractors: &[Attractor]) -> bool {
    for a in attractors.iter().filter(|a| a.id != entity.id) {
        let delta = a.pos - entity.pos;
        let dist = delta.length();
        if dist < a.radius + entity.radius() {
            return true;
        }
        if dist < a.influence && dist > 0.0 {
            entity.vel += delta / dist * a.strength / (dist * dist).max(1.0);
        }
    }
    false
}

fn swallow(entity: &mut Entity, ctx: &mut TickContext) {
    entity.hp = 0.0;
    entity.dead = true;
    ctx.burst(entity.pos, colors::EVENT_HORIZON, DEATH_BURST, 3.0);
    log::debug!("{:?} {} crossed an event horizon", entity.archetype(), entity.id);
}

fn update_player(i: usize, entities: &mut [Entity], ctx: &mut TickContext, input: &TickInput) {
    let Some(player) = entities[i].player_state() else {
        return;
    };
    let ship = player.ship.config();
    let ready = player.cooldown == 0;

    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    entities[i].vel += dir * ship.speed * PLAYER_ACCEL_FACTOR;

    if input.fire && ready {
        fire(entities[i].pos, ship, ctx);
        if let Some(p) = entities[i].player_state_mut() {
            p.cooldown = ship.fire_rate;
        }
    }
    if input.ability {
        ability::try_trigger(i, entities, ctx);
    }

    let e = &mut entities[i];
    if let Some(p) = e.player_state_mut() {
        p.cooldown = p.cooldown.saturating_sub(1);
    }
    e.vel *= PLAYER_FRICTION;
    e.pos = ctx.area.clamp(e.pos + e.vel);

    ability::tick_active(i, entities, ctx);
}

/// Queue one trigger pull worth of lasers for a ship
pub fn fire(pos: Vec2, ship: &ShipConfig, ctx: &mut TickContext) {
    let mut shoot = |offset: Vec2, vx: f32| {
        let id = ctx.alloc_id();
        let mut laser = Entity::laser(
            id,
            pos + offset,
            ship.bullet_color,
            ship.bullet_speed,
            ship.bullet_damage,
        );
        laser.vel.x = vx;
        ctx.spawn(laser);
    };

    match ship.bullet_count {
        0 | 1 => shoot(Vec2::ZERO, 0.0),
        2 => {
            shoot(Vec2::new(-10.0, 0.0), 0.0);
            shoot(Vec2::new(10.0, 0.0), 0.0);
        }
        _ => {
            shoot(Vec2::new(-15.0, 5.0), -2.0);
            shoot(Vec2::ZERO, 0.0);
            shoot(Vec2::new(15.0, 5.0), 2.0);
        }
    }
}

fn update_enemy(i: usize, behavior: EnemyBehavior, entities: &mut [Entity], ctx: &mut TickContext) {
    let target = match behavior {
        EnemyBehavior::Seeker => find_player(entities).map(|p| entities[p].pos),
        _ => None,
    };

    let e = &mut entities[i];
    let t = match &mut e.kind {
        Kind::Enemy { age, .. } => {
            *age += 1;
            *age as f32
        }
        _ => return,
    };

    match behavior {
        EnemyBehavior::Diver => {
            e.vel = Vec2::new(2.0 * (0.05 * t).sin(), enemies::DIVER_FALL);
        }
        EnemyBehavior::Strafer => {
            e.vel = Vec2::new(5.0 * (0.02 * t).cos(), enemies::STRAFER_FALL);
        }
        EnemyBehavior::Splitter { .. } => {
            e.vel = Vec2::new(1.5 * (0.03 * t).sin(), enemies::SPLITTER_FALL);
        }
        EnemyBehavior::Seeker => {
            match target {
                Some(target) => {
                    e.vel += (target - e.pos).normalize_or_zero() * enemies::SEEKER_ACCEL;
                }
                // Nobody to chase: drift down and off the screen
                None => e.vel.y += enemies::SEEKER_FALLBACK_DRIFT,
            }
            e.vel = clamp_speed(e.vel, enemies::SEEKER_MAX_SPEED);
        }
        EnemyBehavior::Minor => {
            e.vel *= enemies::MINOR_DRAG;
            e.vel.y += enemies::MINOR_DRIFT;
        }
    }

    e.pos += e.vel;
    if ctx.area.is_outside(e.pos) {
        e.dead = true;
    }
}

fn update_projectile(e: &mut Entity, ctx: &TickContext) {
    if let Kind::Projectile { path, age, .. } = &mut e.kind {
        *age += 1;
        if let ProjectilePath::Weave {
            base_vx,
            amplitude,
            frequency,
        } = *path
        {
            e.vel.x = base_vx + amplitude * (frequency * *age as f32).sin();
        }
    }
    e.pos += e.vel;
    if ctx.area.is_outside(e.pos) {
        e.dead = true;
    }
}

fn update_particle(e: &mut Entity) {
    e.pos += e.vel;
    if let Kind::Particle { life, .. } = &mut e.kind {
        *life = life.saturating_sub(1);
        if *life == 0 {
            e.dead = true;
        }
    }
}

fn update_shockwave(e: &mut Entity) {
    if let Kind::Shockwave {
        radius,
        max_radius,
        life,
        ..
    } = &mut e.kind
    {
        *radius += (*max_radius - *radius) * SHOCKWAVE_EASING;
        *life = life.saturating_sub(1);
        e.extent = Extent::Circle { radius: *radius };
        if *life == 0 {
            e.dead = true;
        }
    }
}

fn update_black_hole(e: &mut Entity) {
    if let Kind::BlackHole { phase, .. } = &mut e.kind {
        *phase = (*phase + bodies::BLACK_HOLE_PULSE_RATE) % std::f32::consts::TAU;
    }
}

/// Nearest living prey to a point
fn nearest_prey(entities: &[Entity], from: Vec2) -> Option<usize> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.dead && e.is_prey())
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(from)
                .total_cmp(&b.pos.distance_squared(from))
        })
        .map(|(j, _)| j)
}

fn update_void_maw(i: usize, entities: &mut [Entity], ctx: &mut TickContext) {
    let pos = entities[i].pos;

    if let Some(j) = nearest_prey(entities, pos) {
        let prey_pos = entities[j].pos;
        if prey_pos.distance(pos) < entities[i].radius() + entities[j].radius() {
            entities[j].dead = true;
            entities[j].hp = 0.0;
            let maw = &mut entities[i];
            let radius = (maw.radius() + bodies::VOID_MAW_GROWTH).min(bodies::VOID_MAW_MAX_RADIUS);
            maw.extent = Extent::Circle { radius };
            if let Kind::VoidMaw { meals } = &mut maw.kind {
                *meals += 1;
            }
            ctx.burst(prey_pos, colors::VOID_MAW, HIT_SPARKS, 1.5);
        } else {
            entities[i].vel += (prey_pos - pos).normalize_or_zero() * bodies::VOID_MAW_ACCEL;
        }
    }

    let maw = &mut entities[i];
    maw.vel = clamp_speed(maw.vel, bodies::VOID_MAW_MAX_SPEED);
    maw.pos = ctx.area.wrap(maw.pos + maw.vel);
}

fn update_pulsar(i: usize, entities: &mut [Entity], ctx: &mut TickContext) {
    let Kind::Pulsar {
        timer,
        interval,
        range,
        kick,
    } = &mut entities[i].kind
    else {
        return;
    };
    *timer = timer.saturating_sub(1);
    if *timer > 0 {
        return;
    }
    *timer = (*interval).max(1);
    let (range, kick) = (*range, *kick);
    let origin = entities[i].pos;

    let mut kicked = 0;
    for (j, other) in entities.iter_mut().enumerate() {
        if j == i || other.dead || other.is_immovable() {
            continue;
        }
        let delta = other.pos - origin;
        let dist = delta.length();
        if dist < range && dist > 0.0 {
            other.vel += delta / dist * kick;
            if let Some(cap) = other.max_speed() {
                other.vel = clamp_speed(other.vel, cap);
            }
            kicked += 1;
        }
    }

    let id = ctx.alloc_id();
    ctx.spawn(Entity::shockwave(
        id,
        origin,
        colors::PULSAR,
        range,
        bodies::PULSAR_RING_LIFE,
    ));
    log::trace!("Pulsar {} kicked {} entities", entities[i].id, kicked);
}

fn update_spark(e: &mut Entity, ctx: &mut TickContext) {
    let jitter = bodies::SPARK_JITTER;
    e.vel += Vec2::new(
        ctx.rng.random_range(-jitter..=jitter),
        ctx.rng.random_range(-jitter..=jitter),
    );
    e.vel = clamp_speed(e.vel, bodies::SPARK_MAX_SPEED);
    e.pos += e.vel;

    let area = ctx.area;
    if e.pos.x < 0.0 {
        e.pos.x = 0.0;
        e.vel.x = e.vel.x.abs();
    } else if e.pos.x > area.width {
        e.pos.x = area.width;
        e.vel.x = -e.vel.x.abs();
    }
    if e.pos.y < 0.0 {
        e.pos.y = 0.0;
        e.vel.y = e.vel.y.abs();
    } else if e.pos.y > area.height {
        e.pos.y = area.height;
        e.vel.y = -e.vel.y.abs();
    }
}
