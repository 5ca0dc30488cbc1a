//! Neon Ace - a neon arcade shooter with a gravity sandbox
//!
//! Core modules:
//! - `sim`: Deterministic entity simulation (steering, spawning, combat, abilities)
//! - `session`: Screen flow, frame scheduling and HUD publication
//! - `renderer`: Draw-command surface and vertex tessellation
//! - `settings`: Data-driven configuration

pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{FrameSource, HudSnapshot, Screen, Session, SessionCommand};
pub use settings::{GameMode, QualityPreset, Settings, SpawnPolicy};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Display refresh the simulation is tuned for (one tick per frame)
    pub const TICK_RATE: u32 = 60;

    /// Default play area
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
    /// Anything this far past an edge is gone for good
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_FRICTION: f32 = 0.9;
    /// Fraction of ship speed added per held direction per tick
    pub const PLAYER_ACCEL_FACTOR: f32 = 0.2;
    /// Spawn height above the bottom edge
    pub const PLAYER_SPAWN_INSET: f32 = 100.0;

    /// Combat rewards
    pub const KILL_SCORE: u64 = 100;
    pub const KILL_CHARGE: f32 = 10.0;
    pub const MAX_CHARGE: f32 = 100.0;

    /// Difficulty ramps one step every this many points
    pub const DIFFICULTY_SCORE_STEP: u64 = 500;
    /// Score needed before seekers / splitters can be rolled
    pub const SEEKER_UNLOCK_SCORE: u64 = 1000;
    pub const SPLITTER_UNLOCK_SCORE: u64 = 2000;

    /// Projectiles
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 20.0;

    /// Cosmetics
    pub const PARTICLE_LIFE: u32 = 20;
    pub const PARTICLE_SPEED: f32 = 2.0;
    pub const SHOCKWAVE_LIFE: u32 = 30;
    pub const SHOCKWAVE_MAX_RADIUS: f32 = 800.0;
    pub const SHOCKWAVE_EASING: f32 = 0.15;

    /// Burst sizes
    pub const HIT_SPARKS: usize = 5;
    pub const DEATH_BURST: usize = 20;
    pub const DAMAGE_BURST: usize = 30;
}

/// RGBA colors, 0-1 per channel
pub type Rgba = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Palette shared by the simulation (entity tint) and the renderer
pub mod colors {
    use super::{Rgba, rgb};

    pub const BACKGROUND: Rgba = [0.0, 0.02, 0.08, 1.0];
    pub const WHITE: Rgba = rgb(0xffffff);
    pub const ENEMY: Rgba = rgb(0xff0055);
    pub const SEEKER: Rgba = rgb(0xff8800);
    pub const SPLITTER: Rgba = rgb(0x39ff14);
    pub const MINOR: Rgba = rgb(0x9dff7a);
    pub const DAMAGE: Rgba = rgb(0xff0000);
    pub const PLASMA: Rgba = rgb(0xff00ff);
    pub const OMEGA: Rgba = rgb(0xd400ff);
    pub const ENGINE: Rgba = rgb(0xff5500);
    pub const BLACK_HOLE: Rgba = [0.02, 0.0, 0.06, 1.0];
    pub const EVENT_HORIZON: Rgba = rgb(0x8a2be2);
    pub const VOID_MAW: Rgba = rgb(0xff2d95);
    pub const PULSAR: Rgba = rgb(0x7df9ff);
    pub const SPARK: Rgba = rgb(0xffe066);
    pub const HUD_TEXT: Rgba = rgb(0x00f3ff);
    pub const DIM_TEXT: Rgba = rgb(0x888888);
}

/// Clamp a velocity to a maximum magnitude, keeping its direction
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed && speed > 0.0 {
        vel * (max_speed / speed)
    } else {
        vel
    }
}

/// Deterministic hash in [0, 1) for visual jitter (never gameplay)
#[inline]
pub fn hash_unit(seed: u32, salt: u32) -> f32 {
    let hash = seed.wrapping_mul(2654435761).wrapping_add(salt.wrapping_mul(7919));
    (hash % 1000) as f32 / 1000.0
}

/// Unit vector at the given angle (radians)
#[inline]
pub fn unit_at(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_channels() {
        let c = rgb(0xff8000);
        assert_eq!(c[0], 1.0);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(30.0, 40.0), 5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        assert!((v.x - 3.0).abs() < 1e-4);

        let slow = Vec2::new(1.0, 1.0);
        assert_eq!(clamp_speed(slow, 5.0), slow);
        assert_eq!(clamp_speed(Vec2::ZERO, 5.0), Vec2::ZERO);
    }

    #[test]
    fn test_hash_unit_range() {
        for seed in 0..200 {
            let h = hash_unit(seed, 3);
            assert!((0.0..1.0).contains(&h));
        }
    }
}
