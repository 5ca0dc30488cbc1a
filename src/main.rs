//! Neon Ace - headless native runner
//!
//! Drives a session with an autopilot pilot and logs HUD telemetry. Useful
//! for soak runs and for checking a settings file.
//!
//! ```text
//! neon-ace [--ship NAME] [--ticks N] [--seed N] [--sandbox] [--settings PATH] [--quality LEVEL]
//! ```

use std::path::PathBuf;

use clap::Parser;
use neon_ace::renderer::{CommandList, vertex};
use neon_ace::session::Frame;
use neon_ace::sim::{Kind, ShipKind, TickInput};
use neon_ace::{FrameSource, GameMode, QualityPreset, Screen, Session, SessionCommand, Settings};

fn parse_ship(s: &str) -> Result<ShipKind, String> {
    ShipKind::parse(s).ok_or_else(|| {
        let names: Vec<_> = ShipKind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown ship '{}', expected one of {}", s, names.join(", "))
    })
}

fn parse_quality(s: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(s).ok_or_else(|| format!("unknown quality '{}', expected low, medium or high", s))
}

#[derive(Parser, Debug)]
#[command(name = "neon-ace")]
#[command(about = "Headless Neon Ace runner driven by an autopilot")]
struct Args {
    /// Ship to fly
    #[arg(long, value_parser = parse_ship, default_value = "ACE")]
    ship: ShipKind,
    /// Frames to run before stopping
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Run seed (random when absent)
    #[arg(long)]
    seed: Option<u64>,
    /// Gravity sandbox instead of arcade waves
    #[arg(long)]
    sandbox: bool,
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Override the quality preset from the settings file
    #[arg(long, value_parser = parse_quality)]
    quality: Option<QualityPreset>,
}

/// Simple pilot: shadow the lowest enemy, keep firing, burn the ability
/// as soon as it is charged
struct Autopilot {
    ship: ShipKind,
    frames: u64,
    limit: u64,
    started: bool,
    last_hud: u64,
}

impl Autopilot {
    fn steer(&self, session: &Session) -> TickInput {
        let mut input = TickInput {
            fire: true,
            ..Default::default()
        };
        let Some(game) = session.game() else {
            return input;
        };
        let Some(player) = game.player() else {
            return input;
        };

        // Lowest enemy is the most urgent
        let target = game
            .entities
            .iter()
            .filter(|e| !e.dead && e.is_enemy())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        if let Some(enemy) = target {
            let dx = enemy.pos.x - player.pos.x;
            let close = (enemy.pos.y - player.pos.y).abs() < 80.0;
            // Line up from afar, sidestep when it gets close
            if close {
                input.left = dx > 0.0;
                input.right = dx <= 0.0;
            } else if dx.abs() > 8.0 {
                input.left = dx < 0.0;
                input.right = dx > 0.0;
            }
        }

        if let Kind::Player(state) = &player.kind {
            input.ability = state.charge >= neon_ace::consts::MAX_CHARGE;
        }
        input
    }
}

impl FrameSource for Autopilot {
    fn next_frame(&mut self, session: &Session) -> Option<Frame> {
        if self.frames >= self.limit || session.screen() == Screen::GameOver {
            return None;
        }
        if session.hud_revision() != self.last_hud {
            self.last_hud = session.hud_revision();
            if let Ok(json) = session.hud().to_json() {
                log::debug!("HUD {}", json);
            }
        }

        let timestamp_ms = self.frames as f64 * 1000.0 / neon_ace::consts::TICK_RATE as f64;
        self.frames += 1;

        let commands = if self.started {
            Vec::new()
        } else {
            self.started = true;
            vec![
                SessionCommand::Start,
                SessionCommand::SelectShip(self.ship),
                SessionCommand::Confirm,
            ]
        };
        Some(Frame {
            timestamp_ms,
            input: self.steer(session),
            commands,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Neon Ace (headless) starting: {:?}", args);

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if args.sandbox {
        settings.mode = GameMode::Sandbox;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(quality) = args.quality {
        settings.quality = quality;
    }
    let quality = settings.quality;

    let mut session = Session::new(settings);
    let mut pilot = Autopilot {
        ship: args.ship,
        frames: 0,
        limit: args.ticks,
        started: false,
        last_hud: 0,
    };
    let mut surface = CommandList::new(quality);

    let frames = session.run(&mut pilot, &mut surface);

    match session.hud().to_json() {
        Ok(json) => log::info!("Final HUD: {}", json),
        Err(e) => log::error!("Could not encode HUD: {}", e),
    }
    let area = session.settings().play_area;
    let vertices = surface.to_vertices(area.width, area.height);
    log::info!(
        "{} frames, last frame {} draw commands / {} vertices ({} bytes to upload)",
        frames,
        surface.len(),
        vertices.len(),
        vertex::as_bytes(&vertices).len()
    );
    session.stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives a Session directly; nothing to run here
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["neon-ace"]).unwrap();
        assert_eq!(args.ship, ShipKind::Ace);
        assert_eq!(args.ticks, 3600);
        assert_eq!(args.seed, None);
        assert!(!args.sandbox);
        assert_eq!(args.quality, None);
    }

    #[test]
    fn test_args_parse_ship_and_quality() {
        let args = Args::try_parse_from([
            "neon-ace", "--ship", "titan", "--seed", "7", "--quality", "high", "--sandbox",
        ])
        .unwrap();
        assert_eq!(args.ship, ShipKind::Titan);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.quality, Some(QualityPreset::High));
        assert!(args.sandbox);
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["neon-ace", "--seed", "12x"]).is_err());
        assert!(Args::try_parse_from(["neon-ace", "--ship", "zeppelin"]).is_err());
        assert!(Args::try_parse_from(["neon-ace", "--ticks", "-1"]).is_err());
    }
}
