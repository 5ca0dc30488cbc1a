//! Game settings and tuning
//!
//! Loaded from JSON on native builds; every field has a default so partial
//! files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, OFFSCREEN_MARGIN};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 600,
            QualityPreset::High => 2000,
        }
    }

    /// Segments used when tessellating circles
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 48,
        }
    }
}

/// Which ruleset a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Waves of enemies, score and difficulty ramp
    #[default]
    Arcade,
    /// Gravitational bodies and free sparks, no enemy waves
    Sandbox,
}

/// How new enemies enter the arena. Exactly one policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// One enemy every `interval` ticks
    Periodic { interval: u32 },
    /// Independent roll each tick
    Probabilistic { chance: f32 },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::Periodic { interval: 60 }
    }
}

/// The visible play area in pixels (origin top-left, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl PlayArea {
    /// Both dimensions finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// This area, or the default one if it is unusable
    pub fn sanitized(self) -> Self {
        if self.is_valid() {
            self
        } else {
            log::warn!(
                "Invalid play area {}x{}, using {}x{}",
                self.width,
                self.height,
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT
            );
            Self::default()
        }
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True once a point is more than the despawn margin past any edge
    pub fn is_outside(&self, pos: glam::Vec2) -> bool {
        self.is_outside_by(pos, OFFSCREEN_MARGIN)
    }

    pub fn is_outside_by(&self, pos: glam::Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.width + margin
            || pos.y < -margin
            || pos.y > self.height + margin
    }

    /// Clamp a point into the visible area (no margin)
    pub fn clamp(&self, pos: glam::Vec2) -> glam::Vec2 {
        glam::Vec2::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }

    /// Wrap a point around the edges (torus)
    pub fn wrap(&self, pos: glam::Vec2) -> glam::Vec2 {
        glam::Vec2::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }
}

/// Sandbox population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxSettings {
    pub black_holes: u32,
    pub void_maws: u32,
    pub pulsars: u32,
    /// Sparks are topped up toward this count
    pub spark_target: u32,
    /// Ticks between spark top-ups
    pub spark_interval: u32,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            black_holes: 2,
            void_maws: 2,
            pulsars: 1,
            spark_target: 60,
            spark_interval: 20,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions, sparks, etc.)
    pub particles: bool,
    /// Ruleset
    pub mode: GameMode,
    pub play_area: PlayArea,
    /// Arcade enemy spawning
    pub spawn: SpawnPolicy,
    pub sandbox: SandboxSettings,
    /// HUD snapshot is republished every N ticks
    pub hud_interval_ticks: u32,
    /// Show FPS counter
    pub show_fps: bool,
    /// Fixed run seed (random per run when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            mode: GameMode::Arcade,
            play_area: PlayArea::default(),
            spawn: SpawnPolicy::default(),
            sandbox: SandboxSettings::default(),
            hud_interval_ticks: 6,
            show_fps: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::validated)
    }

    /// Replace values the simulation cannot run with
    pub fn validated(mut self) -> Self {
        self.play_area = self.play_area.sanitized();
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "mode": "Sandbox", "quality": "Low" }"#).unwrap();
        assert_eq!(settings.mode, GameMode::Sandbox);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.spawn, SpawnPolicy::Periodic { interval: 60 });
        assert_eq!(settings.hud_interval_ticks, 6);
        assert_eq!(settings.sandbox.black_holes, 2);
    }

    #[test]
    fn test_spawn_policy_json() {
        let settings =
            Settings::from_json(r#"{ "spawn": { "Probabilistic": { "chance": 0.05 } } }"#).unwrap();
        assert_eq!(settings.spawn, SpawnPolicy::Probabilistic { chance: 0.05 });
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json("{ mode: ").is_err());
    }

    #[test]
    fn test_round_trip_keeps_seed() {
        let settings = Settings {
            seed: Some(42),
            ..Settings::default()
        };
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back.seed, Some(42));
    }

    #[test]
    fn test_particles_toggle() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_play_area_bounds() {
        let area = PlayArea::default();
        assert!(!area.is_outside(Vec2::new(-50.0, 300.0)));
        assert!(area.is_outside(Vec2::new(-50.5, 300.0)));
        assert!(area.is_outside(Vec2::new(400.0, 651.0)));
        assert_eq!(area.clamp(Vec2::new(-5.0, 900.0)), Vec2::new(0.0, 600.0));
        assert_eq!(area.wrap(Vec2::new(-10.0, 610.0)), Vec2::new(790.0, 10.0));
    }

    #[test]
    fn test_bad_play_area_falls_back() {
        let settings =
            Settings::from_json(r#"{ "play_area": { "width": -10.0, "height": 600.0 } }"#).unwrap();
        assert_eq!(settings.play_area, PlayArea::default());

        let zero = PlayArea {
            width: 0.0,
            height: 600.0,
        };
        assert!(!zero.is_valid());
        assert_eq!(zero.sanitized(), PlayArea::default());
        let nan = PlayArea {
            width: 800.0,
            height: f32::NAN,
        };
        assert_eq!(nan.sanitized(), PlayArea::default());

        let small = PlayArea {
            width: 320.0,
            height: 240.0,
        };
        assert_eq!(small.sanitized(), small);
    }
}
