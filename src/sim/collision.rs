//! Collision detection and combat resolution
//!
//! Runs once per tick after every entity has moved. Each interacting pair
//! uses its own overlap test: box overlap for ship-on-ship contact, center
//! distance against combined radius for projectile hits. Entities destroyed
//! here are only flagged; later checks in the same pass skip them.

use super::ability;
use super::entity::{EnemyBehavior, Entity, Kind, find_player};
use super::spawner;
use super::state::{DamageRequest, TickContext};
use crate::colors;
use crate::consts::*;

/// Axis-aligned box overlap using both entities' half extents
pub fn aabb_overlap(a: &Entity, b: &Entity) -> bool {
    let gap = (a.pos - b.pos).abs();
    let reach = a.extent.half_size() + b.extent.half_size();
    gap.x < reach.x && gap.y < reach.y
}

/// Center distance strictly below the sum of radii
pub fn circles_overlap(a: &Entity, b: &Entity) -> bool {
    a.pos.distance(b.pos) < a.radius() + b.radius()
}

/// Resolve queued damage, projectile hits and player contact for one tick
pub fn resolve(entities: &mut [Entity], ctx: &mut TickContext, pending: &[DamageRequest]) {
    for req in pending {
        let Some(target) = entities.get(req.target) else {
            continue;
        };
        if !target.dead && target.is_damageable() {
            damage_target(req.target, req.amount, entities, ctx);
        }
    }

    resolve_projectiles(entities, ctx);
    resolve_contact(entities, ctx);
}

fn resolve_projectiles(entities: &mut [Entity], ctx: &mut TickContext) {
    for p in 0..entities.len() {
        let damage = match entities[p].kind {
            Kind::Projectile { damage, .. } if !entities[p].dead => damage,
            _ => continue,
        };

        let hit = (0..entities.len()).find(|&t| {
            let target = &entities[t];
            t != p
                && !target.dead
                && target.is_damageable()
                && target.faction != entities[p].faction
                && circles_overlap(&entities[p], target)
        });

        if let Some(t) = hit {
            entities[p].dead = true;
            ctx.burst(entities[p].pos, colors::WHITE, HIT_SPARKS, PARTICLE_SPEED);
            damage_target(t, damage, entities, ctx);
        }
    }
}

fn resolve_contact(entities: &mut [Entity], ctx: &mut TickContext) {
    let Some(pi) = find_player(entities) else {
        return;
    };

    for e in 0..entities.len() {
        if entities[pi].dead {
            break;
        }
        if entities[e].dead || !entities[e].is_enemy() || !aabb_overlap(&entities[pi], &entities[e]) {
            continue;
        }

        // The enemy crashes either way; no score for a crash
        let enemy = &mut entities[e];
        enemy.hp = 0.0;
        enemy.dead = true;
        let (enemy_pos, enemy_color) = (enemy.pos, enemy.color);

        let shielded = entities[pi]
            .player_state()
            .is_some_and(ability::is_invulnerable);
        if shielded {
            ctx.burst(enemy_pos, enemy_color, DEATH_BURST, 3.0);
            continue;
        }

        let player = &mut entities[pi];
        ctx.burst(player.pos, colors::DAMAGE, DAMAGE_BURST, 4.0);
        if player.apply_damage(1.0) {
            player.dead = true;
            log::info!("Player destroyed by {}", enemy_pos);
        } else {
            log::debug!("Player hit, {} hp left", player.hp);
        }
    }
}

/// Apply damage to one entity and run the kill path if it hits zero
pub fn damage_target(t: usize, amount: f32, entities: &mut [Entity], ctx: &mut TickContext) {
    if entities[t].apply_damage(amount) {
        kill(t, entities, ctx);
    }
}

fn kill(t: usize, entities: &mut [Entity], ctx: &mut TickContext) {
    let target = &mut entities[t];
    target.dead = true;
    let (pos, color) = (target.pos, target.color);

    match target.kind {
        Kind::Enemy { behavior, .. } => {
            ctx.burst(pos, color, DEATH_BURST, 3.0);
            ctx.award_kill(KILL_SCORE);
            if let EnemyBehavior::Splitter { fragments } = behavior {
                spawner::spawn_fragments(ctx, pos, fragments);
            }
            if let Some(pi) = find_player(entities) {
                if let Some(player) = entities[pi].player_state_mut() {
                    player.reward_charge(KILL_CHARGE);
                }
            }
        }
        Kind::Player(_) => {
            ctx.burst(pos, colors::DAMAGE, DAMAGE_BURST, 4.0);
        }
        _ => ctx.burst(pos, color, DEATH_BURST, 3.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::ability::AbilityState;
    use crate::sim::entity::{Archetype, Faction};
    use crate::sim::ships::ShipKind;
    use crate::sim::state::GameState;
    use glam::Vec2;
    use proptest::prelude::*;

    fn state_with(entities: Vec<Entity>) -> GameState {
        let mut state = GameState::empty(&Settings::default(), ShipKind::Ace, 3);
        for e in entities {
            state.push_entity(e);
        }
        state
    }

    fn resolve_once(state: &mut GameState) {
        state.run_phase(|entities, ctx| resolve(entities, ctx, &[]));
    }

    fn player_laser(id: u32, pos: Vec2, damage: f32) -> Entity {
        Entity::laser(id, pos, colors::WHITE, 15.0, damage)
    }

    #[test]
    fn test_overlap_tests_differ_per_pair() {
        let a = Entity::player(1, Vec2::new(0.0, 0.0), ShipKind::Ace);
        // Box reach is 20 + 15 on y; corner-ish placement
        let b = Entity::seeker(2, Vec2::new(38.0, 30.0), 1);
        assert!(aabb_overlap(&a, &b));
        assert!(!circles_overlap(&a, &b));

        let far = Entity::seeker(3, Vec2::new(0.0, 36.0), 1);
        assert!(!aabb_overlap(&a, &far));
    }

    #[test]
    fn test_contact_scenario_to_game_over() {
        let mut state = state_with(vec![Entity::player(1, Vec2::new(400.0, 500.0), ShipKind::Ace)]);
        assert_eq!(state.player().unwrap().hp, 3.0);

        let id = state.next_entity_id();
        state.push_entity(Entity::seeker(id, Vec2::new(400.0, 500.0), 1));
        resolve_once(&mut state);
        state.cleanup();
        assert_eq!(state.player().unwrap().hp, 2.0);
        assert_eq!(state.count(Archetype::Seeker), 0);
        assert_eq!(state.score, 0);

        for _ in 0..2 {
            let id = state.next_entity_id();
            state.push_entity(Entity::seeker(id, Vec2::new(410.0, 505.0), 1));
            resolve_once(&mut state);
        }
        let player = state.entities.iter().find(|e| e.archetype() == Archetype::Player).unwrap();
        assert_eq!(player.hp, 0.0);
        assert!(player.dead);
        assert!(state.player().is_none());
    }

    #[test]
    fn test_phase_shift_ignores_contact() {
        let mut player = Entity::player(1, Vec2::new(400.0, 500.0), ShipKind::Viper);
        player.player_state_mut().unwrap().ability = AbilityState::Active { remaining: 100 };
        let mut state = state_with(vec![player, Entity::seeker(2, Vec2::new(400.0, 500.0), 1)]);
        resolve_once(&mut state);
        assert_eq!(state.player().unwrap().hp, 2.0);
        assert!(state.entities[1].dead);
        assert_eq!(state.count(Archetype::Particle), DEATH_BURST);
    }

    #[test]
    fn test_projectile_kill_rewards() {
        let mut state = state_with(vec![
            Entity::player(1, Vec2::new(400.0, 500.0), ShipKind::Ace),
            Entity::seeker(2, Vec2::new(200.0, 100.0), 1),
            player_laser(3, Vec2::new(200.0, 105.0), 1.0),
        ]);
        resolve_once(&mut state);
        assert!(state.entities[2].dead);
        assert_eq!(state.entities[1].hp, 2.0);
        assert_eq!(state.score, 0);

        for id in 4..6 {
            state.push_entity(player_laser(id, Vec2::new(200.0, 105.0), 1.0));
            resolve_once(&mut state);
        }
        assert!(state.entities[1].dead);
        assert_eq!(state.score, KILL_SCORE);
        assert_eq!(state.kills, 1);
        assert_eq!(state.player_state().unwrap().charge, KILL_CHARGE);
    }

    #[test]
    fn test_one_projectile_one_target() {
        let mut state = state_with(vec![
            Entity::seeker(1, Vec2::new(200.0, 100.0), 1),
            Entity::seeker(2, Vec2::new(202.0, 100.0), 1),
            player_laser(3, Vec2::new(201.0, 100.0), 1.0),
        ]);
        resolve_once(&mut state);
        let total: f32 = state.entities[..2].iter().map(|e| e.max_hp - e.hp).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_no_friendly_fire() {
        let mut state = state_with(vec![
            Entity::player(1, Vec2::new(400.0, 500.0), ShipKind::Ace),
            player_laser(2, Vec2::new(400.0, 500.0), 1.0),
        ]);
        resolve_once(&mut state);
        assert_eq!(state.player().unwrap().hp, 3.0);
        assert!(!state.entities[1].dead);
    }

    #[test]
    fn test_enemy_projectile_hurts_player() {
        let mut state = state_with(vec![
            Entity::player(1, Vec2::new(400.0, 500.0), ShipKind::Ace),
            Entity::projectile(2, Vec2::new(400.0, 500.0), Vec2::new(0.0, 5.0), colors::ENEMY, 1.0, Faction::Enemy),
        ]);
        resolve_once(&mut state);
        assert_eq!(state.player().unwrap().hp, 2.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_splitter_fragments_on_projectile_death() {
        let mut state = state_with(vec![
            Entity::splitter(1, Vec2::new(300.0, 200.0), 1, 2),
            player_laser(2, Vec2::new(300.0, 200.0), 10.0),
        ]);
        resolve_once(&mut state);
        let minors: Vec<_> = state
            .entities
            .iter()
            .filter(|e| e.archetype() == Archetype::Minor)
            .collect();
        assert_eq!(minors.len(), 2);
        for m in minors {
            assert_eq!(m.pos, Vec2::new(300.0, 200.0));
            assert!(m.vel.length() > 0.0);
        }
    }

    #[test]
    fn test_crashing_splitter_does_not_fragment() {
        let mut state = state_with(vec![
            Entity::player(1, Vec2::new(300.0, 200.0), ShipKind::Titan),
            Entity::splitter(2, Vec2::new(300.0, 200.0), 1, 3),
        ]);
        resolve_once(&mut state);
        assert_eq!(state.count(Archetype::Minor), 0);
        assert_eq!(state.player().unwrap().hp, 4.0);
    }

    #[test]
    fn test_no_charge_while_active() {
        let mut player = Entity::player(1, Vec2::new(400.0, 500.0), ShipKind::Wraith);
        {
            let p = player.player_state_mut().unwrap();
            p.charge = 100.0;
            p.ability = AbilityState::Active { remaining: 50 };
        }
        let mut state = state_with(vec![
            player,
            Entity::seeker(2, Vec2::new(200.0, 100.0), 1),
        ]);
        state.run_phase(|entities, ctx| {
            resolve(entities, ctx, &[DamageRequest { target: 1, amount: 5.0 }])
        });
        assert!(state.entities[1].dead);
        assert_eq!(state.score, KILL_SCORE);
        assert_eq!(state.player_state().unwrap().charge, 100.0);
    }

    #[test]
    fn test_stale_damage_request_ignored() {
        let mut state = state_with(vec![Entity::seeker(1, Vec2::new(200.0, 100.0), 1)]);
        state.run_phase(|entities, ctx| {
            resolve(entities, ctx, &[DamageRequest { target: 7, amount: 5.0 }])
        });
        assert_eq!(state.entities[0].hp, 3.0);
    }

    proptest! {
        #[test]
        fn prop_hit_leaves_clamped_hp(difficulty in 1u32..10, damage in 0.0f32..20.0) {
            let mut state = state_with(vec![
                Entity::seeker(1, Vec2::new(300.0, 300.0), difficulty),
                player_laser(2, Vec2::new(300.0, 300.0), damage),
            ]);
            let before = state.entities[0].hp;
            resolve_once(&mut state);
            prop_assert!(state.entities[1].dead);
            prop_assert_eq!(state.entities[0].hp, (before - damage).max(0.0));
            let killed = before - damage <= 0.0;
            prop_assert_eq!(state.score, if killed { KILL_SCORE } else { 0 });
        }
    }
}
