//! Entity model
//!
//! Every simulated object is an [`Entity`]: shared kinematic and combat
//! fields plus a [`Kind`] tag carrying the per-archetype state. Entities live
//! in one flat arena owned by the game state and refer to each other only by
//! index, and only for the duration of a tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ability::AbilityState;
use super::ships::ShipKind;
use crate::consts::*;
use crate::{Rgba, colors, unit_at};

/// Side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
    Neutral,
}

/// Bounding extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    Box { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl Extent {
    /// Radius used by distance-based checks
    pub fn radius(&self) -> f32 {
        match *self {
            Extent::Box { width, height } => width.max(height) / 2.0,
            Extent::Circle { radius } => radius,
        }
    }

    /// Half extents used by box-overlap checks
    pub fn half_size(&self) -> Vec2 {
        match *self {
            Extent::Box { width, height } => Vec2::new(width / 2.0, height / 2.0),
            Extent::Circle { radius } => Vec2::splat(radius),
        }
    }
}

/// Flat behavioral category, handy for counting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Player,
    Enemy,
    Seeker,
    Splitter,
    Minor,
    Projectile,
    Particle,
    Shockwave,
    BlackHole,
    VoidMaw,
    Pulsar,
    Spark,
}

/// Movement rule of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Fast descent with a gentle side-to-side wobble
    Diver,
    /// Slow descent with a wide horizontal weave
    Strafer,
    /// Accelerates toward the player, speed capped
    Seeker,
    /// Slow weave; bursts into fragments on death
    Splitter { fragments: u32 },
    /// Scatter fragment: drag plus a slight downward drift
    Minor,
}

/// Lateral motion of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectilePath {
    Straight,
    /// `vx = base_vx + amplitude * sin(frequency * age)`
    Weave {
        base_vx: f32,
        amplitude: f32,
        frequency: f32,
    },
}

/// Player-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub ship: ShipKind,
    /// Ticks until the guns are ready
    pub cooldown: u32,
    /// Ability charge, 0..=MAX_CHARGE
    pub charge: f32,
    pub ability: AbilityState,
}

impl PlayerState {
    pub fn new(ship: ShipKind) -> Self {
        Self {
            ship,
            cooldown: 0,
            charge: 0.0,
            ability: AbilityState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.ability, AbilityState::Active { .. })
    }

    /// Charge shown on the HUD: the draining remainder while active,
    /// the accumulated charge otherwise
    pub fn charge_percent(&self) -> f32 {
        match self.ability {
            AbilityState::Active { remaining } => {
                let duration = self.ship.config().ability.duration_ticks().max(1);
                remaining as f32 / duration as f32 * 100.0
            }
            AbilityState::Idle => self.charge,
        }
    }

    /// Add charge from a kill. No-op while the ability is running.
    pub fn reward_charge(&mut self, amount: f32) {
        if !self.is_active() {
            self.charge = (self.charge + amount).clamp(0.0, MAX_CHARGE);
        }
    }
}

/// Per-archetype state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Kind {
    Player(PlayerState),
    Enemy {
        behavior: EnemyBehavior,
        /// Ticks alive, drives the weave functions
        age: u32,
    },
    Projectile {
        damage: f32,
        path: ProjectilePath,
        age: u32,
    },
    Particle {
        life: u32,
        max_life: u32,
    },
    Shockwave {
        radius: f32,
        max_radius: f32,
        life: u32,
        max_life: u32,
    },
    BlackHole {
        strength: f32,
        influence: f32,
        /// Visual pulse phase
        phase: f32,
    },
    VoidMaw {
        meals: u32,
    },
    Pulsar {
        timer: u32,
        interval: u32,
        range: f32,
        kick: f32,
    },
    Spark,
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: Kind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub extent: Extent,
    pub color: Rgba,
    pub hp: f32,
    pub max_hp: f32,
    pub faction: Faction,
    pub dead: bool,
}

/// Sandbox body tuning
pub mod bodies {
    pub const BLACK_HOLE_RADIUS: f32 = 28.0;
    pub const BLACK_HOLE_INFLUENCE: f32 = 260.0;
    pub const BLACK_HOLE_STRENGTH: f32 = 420.0;
    pub const BLACK_HOLE_PULSE_RATE: f32 = 0.05;

    pub const VOID_MAW_RADIUS: f32 = 12.0;
    pub const VOID_MAW_GROWTH: f32 = 2.0;
    pub const VOID_MAW_MAX_RADIUS: f32 = 48.0;
    pub const VOID_MAW_ACCEL: f32 = 0.12;
    pub const VOID_MAW_MAX_SPEED: f32 = 2.5;

    pub const PULSAR_RADIUS: f32 = 10.0;
    pub const PULSAR_INTERVAL: u32 = 150;
    pub const PULSAR_RANGE: f32 = 220.0;
    pub const PULSAR_KICK: f32 = 6.0;
    pub const PULSAR_RING_LIFE: u32 = 40;

    pub const SPARK_RADIUS: f32 = 3.0;
    pub const SPARK_JITTER: f32 = 0.15;
    pub const SPARK_MAX_SPEED: f32 = 6.0;
}

/// Enemy tuning
pub mod enemies {
    pub const DIVER_FALL: f32 = 4.0;
    pub const STRAFER_FALL: f32 = 2.0;
    pub const SEEKER_ACCEL: f32 = 0.2;
    pub const SEEKER_MAX_SPEED: f32 = 3.0;
    pub const SEEKER_FALLBACK_DRIFT: f32 = 0.1;
    pub const SPLITTER_FALL: f32 = 1.2;
    pub const SPLITTER_FRAGMENTS: u32 = 3;
    pub const MINOR_SIZE: f32 = 14.0;
    pub const MINOR_DRAG: f32 = 0.96;
    pub const MINOR_DRIFT: f32 = 0.05;
}

impl Entity {
    fn base(id: u32, kind: Kind, pos: Vec2, extent: Extent, color: Rgba, faction: Faction) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            extent,
            color,
            hp: 1.0,
            max_hp: 1.0,
            faction,
            dead: false,
        }
    }

    pub fn player(id: u32, pos: Vec2, ship: ShipKind) -> Self {
        let cfg = ship.config();
        let mut e = Self::base(
            id,
            Kind::Player(PlayerState::new(ship)),
            pos,
            Extent::Box {
                width: PLAYER_SIZE,
                height: PLAYER_SIZE,
            },
            cfg.color,
            Faction::Player,
        );
        e.hp = cfg.max_hp;
        e.max_hp = cfg.max_hp;
        e
    }

    /// Projectile with an explicit velocity
    pub fn projectile(
        id: u32,
        pos: Vec2,
        vel: Vec2,
        color: Rgba,
        damage: f32,
        faction: Faction,
    ) -> Self {
        let mut e = Self::base(
            id,
            Kind::Projectile {
                damage,
                path: ProjectilePath::Straight,
                age: 0,
            },
            pos,
            Extent::Box {
                width: LASER_WIDTH,
                height: LASER_HEIGHT,
            },
            color,
            faction,
        );
        e.vel = vel;
        e
    }

    /// Straight-up player laser
    pub fn laser(id: u32, pos: Vec2, color: Rgba, speed: f32, damage: f32) -> Self {
        Self::projectile(id, pos, Vec2::new(0.0, -speed), color, damage, Faction::Player)
    }

    pub fn with_path(mut self, path: ProjectilePath) -> Self {
        if let Kind::Projectile { path: p, .. } = &mut self.kind {
            *p = path;
        }
        self
    }

    /// Cosmetic spark flying off in a random direction
    pub fn particle(id: u32, pos: Vec2, color: Rgba, speed: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let mut e = Self::base(
            id,
            Kind::Particle {
                life: PARTICLE_LIFE,
                max_life: PARTICLE_LIFE,
            },
            pos,
            Extent::Box {
                width: 2.0,
                height: 2.0,
            },
            color,
            Faction::Neutral,
        );
        e.vel = unit_at(angle) * speed;
        e
    }

    /// Expanding ring effect
    pub fn shockwave(id: u32, pos: Vec2, color: Rgba, max_radius: f32, life: u32) -> Self {
        Self::base(
            id,
            Kind::Shockwave {
                radius: 0.0,
                max_radius,
                life,
                max_life: life,
            },
            pos,
            Extent::Circle { radius: 0.0 },
            color,
            Faction::Neutral,
        )
    }

    fn enemy_base(id: u32, pos: Vec2, behavior: EnemyBehavior, hp: f32, size: f32, color: Rgba) -> Self {
        let mut e = Self::base(
            id,
            Kind::Enemy { behavior, age: 0 },
            pos,
            Extent::Box {
                width: size,
                height: 30.0,
            },
            color,
            Faction::Enemy,
        );
        e.hp = hp;
        e.max_hp = hp;
        e
    }

    /// Basic enemy: HP rolled from the difficulty, size grows with HP
    pub fn enemy(id: u32, pos: Vec2, difficulty: u32, rng: &mut impl Rng) -> Self {
        let behavior = if rng.random_bool(0.5) {
            EnemyBehavior::Diver
        } else {
            EnemyBehavior::Strafer
        };
        let hp = rng.random_range(0..difficulty.max(1)) as f32 + 1.0;
        Self::enemy_base(id, pos, behavior, hp, 30.0 + hp * 5.0, colors::ENEMY)
    }

    pub fn seeker(id: u32, pos: Vec2, difficulty: u32) -> Self {
        let hp = (difficulty as f32 * 1.5).floor() + 2.0;
        Self::enemy_base(id, pos, EnemyBehavior::Seeker, hp, 40.0, colors::SEEKER)
    }

    pub fn splitter(id: u32, pos: Vec2, difficulty: u32, fragments: u32) -> Self {
        let hp = difficulty as f32 + 2.0;
        Self::enemy_base(
            id,
            pos,
            EnemyBehavior::Splitter { fragments },
            hp,
            45.0,
            colors::SPLITTER,
        )
    }

    /// Fragment thrown out of a dying splitter
    pub fn minor(id: u32, pos: Vec2, rng: &mut impl Rng) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = rng.random_range(4.0..7.0);
        let mut e = Self::base(
            id,
            Kind::Enemy {
                behavior: EnemyBehavior::Minor,
                age: 0,
            },
            pos,
            Extent::Box {
                width: enemies::MINOR_SIZE,
                height: enemies::MINOR_SIZE,
            },
            colors::MINOR,
            Faction::Enemy,
        );
        e.vel = unit_at(angle) * speed;
        e
    }

    pub fn black_hole(id: u32, pos: Vec2) -> Self {
        Self::base(
            id,
            Kind::BlackHole {
                strength: bodies::BLACK_HOLE_STRENGTH,
                influence: bodies::BLACK_HOLE_INFLUENCE,
                phase: 0.0,
            },
            pos,
            Extent::Circle {
                radius: bodies::BLACK_HOLE_RADIUS,
            },
            colors::BLACK_HOLE,
            Faction::Neutral,
        )
    }

    pub fn void_maw(id: u32, pos: Vec2) -> Self {
        let mut e = Self::base(
            id,
            Kind::VoidMaw { meals: 0 },
            pos,
            Extent::Circle {
                radius: bodies::VOID_MAW_RADIUS,
            },
            colors::VOID_MAW,
            Faction::Neutral,
        );
        e.hp = 6.0;
        e.max_hp = 6.0;
        e
    }

    /// Pulsar; `timer` staggers the first pulse
    pub fn pulsar(id: u32, pos: Vec2, timer: u32) -> Self {
        Self::base(
            id,
            Kind::Pulsar {
                timer,
                interval: bodies::PULSAR_INTERVAL,
                range: bodies::PULSAR_RANGE,
                kick: bodies::PULSAR_KICK,
            },
            pos,
            Extent::Circle {
                radius: bodies::PULSAR_RADIUS,
            },
            colors::PULSAR,
            Faction::Neutral,
        )
    }

    pub fn spark(id: u32, pos: Vec2, rng: &mut impl Rng) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let mut e = Self::base(
            id,
            Kind::Spark,
            pos,
            Extent::Circle {
                radius: bodies::SPARK_RADIUS,
            },
            colors::SPARK,
            Faction::Neutral,
        );
        e.vel = unit_at(angle) * rng.random_range(0.5..2.0);
        e
    }

    pub fn archetype(&self) -> Archetype {
        match &self.kind {
            Kind::Player(_) => Archetype::Player,
            Kind::Enemy { behavior, .. } => match behavior {
                EnemyBehavior::Diver | EnemyBehavior::Strafer => Archetype::Enemy,
                EnemyBehavior::Seeker => Archetype::Seeker,
                EnemyBehavior::Splitter { .. } => Archetype::Splitter,
                EnemyBehavior::Minor => Archetype::Minor,
            },
            Kind::Projectile { .. } => Archetype::Projectile,
            Kind::Particle { .. } => Archetype::Particle,
            Kind::Shockwave { .. } => Archetype::Shockwave,
            Kind::BlackHole { .. } => Archetype::BlackHole,
            Kind::VoidMaw { .. } => Archetype::VoidMaw,
            Kind::Pulsar { .. } => Archetype::Pulsar,
            Kind::Spark => Archetype::Spark,
        }
    }

    pub fn radius(&self) -> f32 {
        self.extent.radius()
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, Kind::Enemy { .. })
    }

    /// Can be hurt by projectiles
    pub fn is_damageable(&self) -> bool {
        matches!(
            self.kind,
            Kind::Player(_) | Kind::Enemy { .. } | Kind::VoidMaw { .. }
        )
    }

    /// Purely visual, takes no part in physics or combat
    pub fn is_cosmetic(&self) -> bool {
        matches!(self.kind, Kind::Particle { .. } | Kind::Shockwave { .. })
    }

    /// Unaffected by gravity, event horizons and pulsar kicks
    pub fn is_immovable(&self) -> bool {
        self.is_cosmetic() || matches!(self.kind, Kind::BlackHole { .. } | Kind::Pulsar { .. })
    }

    /// Food for void maws
    pub fn is_prey(&self) -> bool {
        matches!(self.kind, Kind::Spark)
    }

    /// Speed cap for archetypes that have one
    pub fn max_speed(&self) -> Option<f32> {
        match self.kind {
            Kind::Enemy {
                behavior: EnemyBehavior::Seeker,
                ..
            } => Some(enemies::SEEKER_MAX_SPEED),
            Kind::VoidMaw { .. } => Some(bodies::VOID_MAW_MAX_SPEED),
            Kind::Spark => Some(bodies::SPARK_MAX_SPEED),
            _ => None,
        }
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.kind {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Subtract hit points, clamping at zero.
    /// Returns true when this hit took the entity from alive to zero.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.hp > 0.0;
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
        was_alive && self.hp <= 0.0
    }

    /// Position and velocity are usable numbers
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Index of the first living player, if any
pub fn find_player(entities: &[Entity]) -> Option<usize> {
    entities
        .iter()
        .position(|e| !e.dead && matches!(e.kind, Kind::Player(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_enemy_hp_scales_with_difficulty() {
        let mut rng = Pcg32::seed_from_u64(7);
        for difficulty in 1..6 {
            for _ in 0..50 {
                let e = Entity::enemy(1, Vec2::ZERO, difficulty, &mut rng);
                assert!(e.hp >= 1.0 && e.hp <= difficulty as f32);
                assert_eq!(e.hp, e.max_hp);
                assert_eq!(e.extent.half_size().x * 2.0, 30.0 + e.hp * 5.0);
                assert_eq!(e.faction, Faction::Enemy);
            }
        }
    }

    #[test]
    fn test_difficulty_one_is_single_hit() {
        let mut rng = Pcg32::seed_from_u64(1);
        let e = Entity::enemy(1, Vec2::ZERO, 1, &mut rng);
        assert_eq!(e.hp, 1.0);
    }

    #[test]
    fn test_seeker_and_splitter_are_tougher() {
        assert_eq!(Entity::seeker(1, Vec2::ZERO, 2).hp, 5.0);
        assert_eq!(Entity::splitter(1, Vec2::ZERO, 2, 3).hp, 4.0);
        assert_eq!(Entity::seeker(1, Vec2::ZERO, 1).archetype(), Archetype::Seeker);
    }

    #[test]
    fn test_apply_damage_clamps_and_reports_crossing() {
        let mut e = Entity::seeker(1, Vec2::ZERO, 1); // 3 hp
        assert!(!e.apply_damage(1.0));
        assert_eq!(e.hp, 2.0);
        assert!(e.apply_damage(5.0));
        assert_eq!(e.hp, 0.0);
        // Already at zero: no second crossing
        assert!(!e.apply_damage(1.0));
        assert_eq!(e.hp, 0.0);
    }

    #[test]
    fn test_minor_always_moves() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let e = Entity::minor(1, Vec2::ZERO, &mut rng);
            assert!(e.vel.length() >= 4.0 - 1e-4);
            assert_eq!(e.archetype(), Archetype::Minor);
        }
    }

    #[test]
    fn test_charge_percent_while_active() {
        let mut p = PlayerState::new(ShipKind::Ace);
        p.charge = 40.0;
        assert_eq!(p.charge_percent(), 40.0);
        p.ability = AbilityState::Active { remaining: 90 };
        assert!((p.charge_percent() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_reward_charge_caps_and_skips_active() {
        let mut p = PlayerState::new(ShipKind::Ace);
        p.charge = 95.0;
        p.reward_charge(KILL_CHARGE);
        assert_eq!(p.charge, MAX_CHARGE);
        p.charge = 50.0;
        p.ability = AbilityState::Active { remaining: 10 };
        p.reward_charge(KILL_CHARGE);
        assert_eq!(p.charge, 50.0);
    }

    #[test]
    fn test_find_player_skips_dead() {
        let mut entities = vec![
            Entity::seeker(1, Vec2::ZERO, 1),
            Entity::player(2, Vec2::ZERO, ShipKind::Ace),
        ];
        assert_eq!(find_player(&entities), Some(1));
        entities[1].dead = true;
        assert_eq!(find_player(&entities), None);
    }
}
