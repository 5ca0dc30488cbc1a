//! Ship catalog
//!
//! Each selectable ship is a fixed configuration. The special ability is an
//! enum so the per-ship effect table is checked exhaustively.

use serde::{Deserialize, Serialize};

use crate::{Rgba, rgb};

/// Selectable ships, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShipKind {
    #[default]
    Ace,
    Viper,
    Titan,
    Wraith,
    Fury,
}

impl ShipKind {
    pub const ALL: [ShipKind; 5] = [
        ShipKind::Ace,
        ShipKind::Viper,
        ShipKind::Titan,
        ShipKind::Wraith,
        ShipKind::Fury,
    ];

    pub fn config(self) -> &'static ShipConfig {
        match self {
            ShipKind::Ace => &ACE,
            ShipKind::Viper => &VIPER,
            ShipKind::Titan => &TITAN,
            ShipKind::Wraith => &WRAITH,
            ShipKind::Fury => &FURY,
        }
    }

    pub fn name(self) -> &'static str {
        self.config().name
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
    }

    /// Step through the catalog with wraparound (ship select screen)
    pub fn cycle(self, step: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0) as i32;
        Self::ALL[(idx + step).rem_euclid(len) as usize]
    }
}

/// Special abilities, one per ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Radial projectile bursts on a fixed cadence
    PlasmaStorm,
    /// Contact with enemies costs no hit points
    PhaseShift,
    /// Destroys every enemy at once, then a short visual flare
    OmegaBlast,
    /// Continuous damage to enemies near the ship
    StaticField,
    /// Rapid five-way spread fire
    Overdrive,
}

impl AbilityKind {
    /// Active duration in ticks. The HUD charge drain reads this too.
    pub fn duration_ticks(self) -> u32 {
        match self {
            AbilityKind::PlasmaStorm => 180,
            AbilityKind::PhaseShift => 300,
            AbilityKind::OmegaBlast => 30,
            AbilityKind::StaticField => 240,
            AbilityKind::Overdrive => 180,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::PlasmaStorm => "Plasma Storm",
            AbilityKind::PhaseShift => "Phase Shift",
            AbilityKind::OmegaBlast => "Omega Blast",
            AbilityKind::StaticField => "Static Field",
            AbilityKind::Overdrive => "Overdrive",
        }
    }
}

/// Static per-ship configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ShipConfig {
    pub name: &'static str,
    pub description: &'static str,
    /// Movement speed (acceleration scale)
    pub speed: f32,
    pub color: Rgba,
    pub max_hp: f32,
    /// Ticks between shots (lower is faster)
    pub fire_rate: u32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_color: Rgba,
    /// Projectiles per trigger pull (1-3)
    pub bullet_count: u8,
    pub ability: AbilityKind,
}

pub static ACE: ShipConfig = ShipConfig {
    name: "ACE",
    description: "Balanced. Reliable. The classic choice.",
    speed: 7.0,
    color: rgb(0x00f3ff),
    max_hp: 3.0,
    fire_rate: 8,
    bullet_speed: 15.0,
    bullet_damage: 1.0,
    bullet_color: rgb(0x00ff00),
    bullet_count: 2,
    ability: AbilityKind::PlasmaStorm,
};

pub static VIPER: ShipConfig = ShipConfig {
    name: "VIPER",
    description: "Fast. Rapid fire. Fragile.",
    speed: 10.0,
    color: rgb(0xfae100),
    max_hp: 2.0,
    fire_rate: 4,
    bullet_speed: 20.0,
    bullet_damage: 0.5,
    bullet_color: rgb(0xffff00),
    bullet_count: 1,
    ability: AbilityKind::PhaseShift,
};

pub static TITAN: ShipConfig = ShipConfig {
    name: "TITAN",
    description: "Heavy armor. Spread shot. Slow.",
    speed: 4.0,
    color: rgb(0xa200ff),
    max_hp: 5.0,
    fire_rate: 15,
    bullet_speed: 10.0,
    bullet_damage: 3.0,
    bullet_color: rgb(0xd400ff),
    bullet_count: 3,
    ability: AbilityKind::OmegaBlast,
};

pub static WRAITH: ShipConfig = ShipConfig {
    name: "WRAITH",
    description: "Slippery. Punishes anything that gets close.",
    speed: 9.0,
    color: rgb(0x9ad0ff),
    max_hp: 3.0,
    fire_rate: 6,
    bullet_speed: 18.0,
    bullet_damage: 1.0,
    bullet_color: rgb(0xc8f0ff),
    bullet_count: 1,
    ability: AbilityKind::StaticField,
};

pub static FURY: ShipConfig = ShipConfig {
    name: "FURY",
    description: "All offense. Twin cannons and a spread overdrive.",
    speed: 6.0,
    color: rgb(0xff3b3b),
    max_hp: 3.0,
    fire_rate: 5,
    bullet_speed: 16.0,
    bullet_damage: 1.5,
    bullet_color: rgb(0xff9a3b),
    bullet_count: 2,
    ability: AbilityKind::Overdrive,
};
