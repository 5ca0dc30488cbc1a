//! Supercharge abilities
//!
//! Idle -> Active when the charge is full and the ability input is held;
//! Active -> Idle when the duration counter runs out, charge reset to zero.
//! What happens on entry and on each active tick depends on the ship's
//! [`AbilityKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, PlayerState, ProjectilePath};
use super::ships::AbilityKind;
use super::state::TickContext;
use crate::consts::*;
use crate::{colors, unit_at};

/// Ability lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AbilityState {
    #[default]
    Idle,
    Active {
        remaining: u32,
    },
}

/// Plasma Storm: ticks between radial bursts, projectiles per burst
const STORM_PERIOD: u32 = 15;
const STORM_RAYS: u32 = 6;
const STORM_SPEED: f32 = 12.0;

/// Static Field reach and damage per tick
pub const STATIC_FIELD_RADIUS: f32 = 120.0;
const STATIC_FIELD_DAMAGE: f32 = 0.05;

/// Overdrive: ticks between spread volleys
const OVERDRIVE_PERIOD: u32 = 4;

/// Omega Blast visuals
const OMEGA_PURPLE_PARTICLES: usize = 15;
const OMEGA_WHITE_PARTICLES: usize = 10;

/// Contact with enemies is harmless while this is true
pub fn is_invulnerable(player: &PlayerState) -> bool {
    player.is_active() && player.ship.config().ability == AbilityKind::PhaseShift
}

/// Enter the active state if the charge is full. Returns true on entry.
pub fn try_trigger(idx: usize, entities: &mut [Entity], ctx: &mut TickContext) -> bool {
    let pos = entities[idx].pos;
    let Some(player) = entities[idx].player_state_mut() else {
        return false;
    };
    if player.is_active() || player.charge < MAX_CHARGE {
        return false;
    }

    let ability = player.ship.config().ability;
    player.ability = AbilityState::Active {
        remaining: ability.duration_ticks(),
    };
    log::debug!("{} triggered at tick {}", ability.name(), ctx.tick);

    if ability == AbilityKind::OmegaBlast {
        omega_blast(pos, entities, ctx);
    }
    true
}

/// One-shot: every enemy on screen is destroyed. No score, no fragments.
fn omega_blast(origin: Vec2, entities: &mut [Entity], ctx: &mut TickContext) {
    let id = ctx.alloc_id();
    ctx.spawn(Entity::shockwave(
        id,
        origin,
        colors::OMEGA,
        SHOCKWAVE_MAX_RADIUS,
        SHOCKWAVE_LIFE,
    ));

    let mut destroyed = 0;
    for enemy in entities.iter_mut().filter(|e| !e.dead && e.is_enemy()) {
        ctx.burst(enemy.pos, colors::OMEGA, OMEGA_PURPLE_PARTICLES, 4.0);
        ctx.burst(enemy.pos, colors::WHITE, OMEGA_WHITE_PARTICLES, 3.0);
        enemy.hp = 0.0;
        enemy.dead = true;
        destroyed += 1;
    }
    log::debug!("Omega Blast destroyed {} enemies", destroyed);
}

/// Advance an active ability by one tick and apply its effect
pub fn tick_active(idx: usize, entities: &mut [Entity], ctx: &mut TickContext) {
    let pos = entities[idx].pos;
    let Some(player) = entities[idx].player_state_mut() else {
        return;
    };
    let AbilityState::Active { remaining } = player.ability else {
        return;
    };
    let remaining = remaining.saturating_sub(1);
    let ship = player.ship.config();

    if remaining == 0 {
        player.ability = AbilityState::Idle;
        player.charge = 0.0;
    } else {
        player.ability = AbilityState::Active { remaining };
    }

    match ship.ability {
        AbilityKind::PlasmaStorm => {
            if remaining % STORM_PERIOD == 0 {
                for i in 0..STORM_RAYS {
                    let angle = i as f32 / STORM_RAYS as f32 * std::f32::consts::TAU;
                    let id = ctx.alloc_id();
                    ctx.spawn(Entity::projectile(
                        id,
                        pos,
                        unit_at(angle) * STORM_SPEED,
                        colors::PLASMA,
                        1.0,
                        super::entity::Faction::Player,
                    ));
                }
            }
        }
        AbilityKind::StaticField => {
            for (j, other) in entities.iter().enumerate() {
                if j != idx
                    && !other.dead
                    && other.is_enemy()
                    && other.pos.distance(pos) < STATIC_FIELD_RADIUS
                {
                    ctx.request_damage(j, STATIC_FIELD_DAMAGE);
                }
            }
        }
        AbilityKind::Overdrive => {
            if remaining % OVERDRIVE_PERIOD == 0 {
                let speed = ship.bullet_speed;
                let lanes: [(f32, ProjectilePath); 5] = [
                    (0.0, ProjectilePath::Straight),
                    (-2.0, ProjectilePath::Straight),
                    (2.0, ProjectilePath::Straight),
                    (
                        -4.0,
                        ProjectilePath::Weave {
                            base_vx: -4.0,
                            amplitude: 1.5,
                            frequency: 0.3,
                        },
                    ),
                    (
                        4.0,
                        ProjectilePath::Weave {
                            base_vx: 4.0,
                            amplitude: 1.5,
                            frequency: 0.3,
                        },
                    ),
                ];
                for (vx, path) in lanes {
                    let id = ctx.alloc_id();
                    ctx.spawn(
                        Entity::projectile(
                            id,
                            pos,
                            Vec2::new(vx, -speed),
                            ship.bullet_color,
                            ship.bullet_damage,
                            super::entity::Faction::Player,
                        )
                        .with_path(path),
                    );
                }
            }
        }
        AbilityKind::PhaseShift | AbilityKind::OmegaBlast => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PlayArea;
    use crate::sim::entity::{Archetype, Kind};
    use crate::sim::ships::ShipKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn with_ctx<R>(f: impl FnOnce(&mut TickContext) -> R) -> R {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut next_id = 1000;
        let mut ctx = TickContext::new(PlayArea::default(), 0, &mut rng, &mut next_id, 10_000);
        f(&mut ctx)
    }

    fn charged_player(ship: ShipKind) -> Entity {
        let mut p = Entity::player(1, Vec2::new(400.0, 500.0), ship);
        p.player_state_mut().unwrap().charge = MAX_CHARGE;
        p
    }

    #[test]
    fn test_trigger_requires_full_charge() {
        let mut entities = vec![Entity::player(1, Vec2::ZERO, ShipKind::Ace)];
        entities[0].player_state_mut().unwrap().charge = 90.0;
        let triggered = with_ctx(|ctx| try_trigger(0, &mut entities, ctx));
        assert!(!triggered);
        assert_eq!(entities[0].player_state().unwrap().ability, AbilityState::Idle);
    }

    #[test]
    fn test_trigger_then_drain_to_idle() {
        let mut entities = vec![charged_player(ShipKind::Viper)];
        with_ctx(|ctx| {
            assert!(try_trigger(0, &mut entities, ctx));
            // Cannot re-enter while active
            assert!(!try_trigger(0, &mut entities, ctx));
            assert!(is_invulnerable(entities[0].player_state().unwrap()));
            for _ in 0..AbilityKind::PhaseShift.duration_ticks() {
                tick_active(0, &mut entities, ctx);
            }
        });
        let p = entities[0].player_state().unwrap();
        assert_eq!(p.ability, AbilityState::Idle);
        assert_eq!(p.charge, 0.0);
        assert!(!is_invulnerable(p));
    }

    #[test]
    fn test_plasma_storm_bursts() {
        let mut entities = vec![charged_player(ShipKind::Ace)];
        let spawned = with_ctx(|ctx| {
            try_trigger(0, &mut entities, ctx);
            for _ in 0..AbilityKind::PlasmaStorm.duration_ticks() {
                tick_active(0, &mut entities, ctx);
            }
            ctx.spawned().to_vec()
        });
        // remaining hits 165, 150, ..., 15, 0 -> 12 bursts of 6
        assert_eq!(spawned.len(), 12 * 6);
        assert!(spawned.iter().all(|e| e.archetype() == Archetype::Projectile));
        assert!(spawned.iter().all(|e| (e.vel.length() - 12.0).abs() < 1e-3));
    }

    #[test]
    fn test_omega_blast_clears_enemies() {
        let mut entities = vec![
            charged_player(ShipKind::Titan),
            Entity::seeker(2, Vec2::new(100.0, 100.0), 3),
            Entity::splitter(3, Vec2::new(200.0, 100.0), 3, 2),
        ];
        let spawned = with_ctx(|ctx| {
            try_trigger(0, &mut entities, ctx);
            ctx.spawned().to_vec()
        });
        assert!(entities[1].dead && entities[2].dead);
        assert_eq!(entities[1].hp, 0.0);
        assert_eq!(
            spawned
                .iter()
                .filter(|e| e.archetype() == Archetype::Shockwave)
                .count(),
            1
        );
        // No fragments from the blast
        assert!(spawned.iter().all(|e| !e.is_enemy()));
        let p = entities[0].player_state().unwrap();
        assert_eq!(p.ability, AbilityState::Active { remaining: 30 });
        assert!((p.charge_percent() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_static_field_queues_damage_in_range() {
        let mut entities = vec![
            charged_player(ShipKind::Wraith),
            Entity::seeker(2, Vec2::new(450.0, 500.0), 1),
            Entity::seeker(3, Vec2::new(400.0, 100.0), 1),
        ];
        let requests = with_ctx(|ctx| {
            try_trigger(0, &mut entities, ctx);
            tick_active(0, &mut entities, ctx);
            ctx.take_damage()
        });
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target, 1);
    }

    #[test]
    fn test_overdrive_volley_has_weaving_lanes() {
        let mut entities = vec![charged_player(ShipKind::Fury)];
        let spawned = with_ctx(|ctx| {
            try_trigger(0, &mut entities, ctx);
            for _ in 0..4 {
                tick_active(0, &mut entities, ctx);
            }
            ctx.spawned().to_vec()
        });
        assert_eq!(spawned.len(), 5);
        let weaving = spawned
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    Kind::Projectile {
                        path: ProjectilePath::Weave { .. },
                        ..
                    }
                )
            })
            .count();
        assert_eq!(weaving, 2);
    }
}
