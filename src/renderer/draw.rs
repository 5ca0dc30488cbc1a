//! Per-archetype drawing and screen overlays
//!
//! Read-only with respect to the simulation. Flicker and shimmer come from
//! a hash of tick and entity id so a replay draws identically.

use glam::Vec2;

use super::{DrawCommand, Surface, TextAlign, shapes};
use crate::session::Screen;
use crate::settings::PlayArea;
use crate::sim::ability::STATIC_FIELD_RADIUS;
use crate::sim::entity::{EnemyBehavior, Entity, Kind};
use crate::sim::ships::{AbilityKind, ShipKind};
use crate::sim::state::GameState;
use crate::{colors, hash_unit, with_alpha};

/// Clear the frame and draw every live entity
pub fn draw_world(state: &GameState, surface: &mut impl Surface) {
    surface.submit(DrawCommand::Clear {
        color: colors::BACKGROUND,
    });
    for entity in state.entities.iter().filter(|e| !e.dead) {
        draw_entity(entity, state.time_ticks, surface);
    }
}

/// Draw one entity. Dead entities draw nothing.
pub fn draw_entity(e: &Entity, tick: u64, surface: &mut impl Surface) {
    if e.dead {
        return;
    }
    let flicker = hash_unit(tick as u32, e.id);

    match &e.kind {
        Kind::Player(player) => {
            let half = e.extent.half_size();
            let config = player.ship.config();

            // Engine flame under the hull
            let flame = half.y * (0.6 + 0.6 * flicker);
            surface.submit(DrawCommand::FillPolygon {
                points: vec![
                    e.pos + Vec2::new(-half.x * 0.4, half.y),
                    e.pos + Vec2::new(half.x * 0.4, half.y),
                    e.pos + Vec2::new(0.0, half.y + flame),
                ],
                color: colors::ENGINE,
            });

            surface.glow(e.color, 20.0);
            surface.submit(DrawCommand::FillPolygon {
                points: vec![
                    e.pos + Vec2::new(0.0, -half.y),
                    e.pos + Vec2::new(half.x, half.y),
                    e.pos + Vec2::new(-half.x, half.y),
                ],
                color: e.color,
            });
            surface.no_glow();

            if player.is_active() {
                match config.ability {
                    AbilityKind::PhaseShift => surface.submit(DrawCommand::StrokeCircle {
                        center: e.pos,
                        radius: half.x * 1.5,
                        width: 2.0,
                        color: with_alpha(e.color, 0.4 + 0.3 * flicker),
                    }),
                    AbilityKind::StaticField => surface.submit(DrawCommand::StrokeCircle {
                        center: e.pos,
                        radius: STATIC_FIELD_RADIUS,
                        width: 1.0 + 2.0 * flicker,
                        color: with_alpha(config.bullet_color, 0.35),
                    }),
                    _ => surface.submit(DrawCommand::StrokeCircle {
                        center: e.pos,
                        radius: half.x * 1.3,
                        width: 3.0,
                        color: with_alpha(config.bullet_color, 0.6),
                    }),
                }
            }
        }
        Kind::Enemy { behavior, .. } => {
            let half = e.extent.half_size();
            surface.glow(e.color, 15.0);
            match behavior {
                EnemyBehavior::Seeker => surface.submit(DrawCommand::FillPolygon {
                    points: vec![
                        e.pos + Vec2::new(0.0, half.y),
                        e.pos + Vec2::new(half.x, 0.0),
                        e.pos + Vec2::new(0.0, -half.y),
                        e.pos + Vec2::new(-half.x, 0.0),
                    ],
                    color: e.color,
                }),
                EnemyBehavior::Splitter { .. } => surface.submit(DrawCommand::FillPolygon {
                    points: shapes::regular_polygon(e.pos, half.x, 6, 0.0),
                    color: e.color,
                }),
                _ => surface.fill_rect_centered(e.pos, half * 2.0, e.color),
            }
            surface.no_glow();

            // Damage shows as a dimmer core
            if e.hp < e.max_hp && e.max_hp > 0.0 {
                let left = e.hp / e.max_hp;
                surface.fill_rect_centered(
                    e.pos,
                    half * 0.8,
                    with_alpha(colors::BACKGROUND, 1.0 - left),
                );
            }
        }
        Kind::Projectile { .. } => {
            surface.glow(e.color, 10.0);
            surface.fill_rect_centered(e.pos, e.extent.half_size() * 2.0, e.color);
            surface.no_glow();
        }
        Kind::Particle { life, max_life } => {
            let alpha = *life as f32 / (*max_life).max(1) as f32;
            surface.fill_rect_centered(e.pos, e.extent.half_size() * 2.0, with_alpha(e.color, alpha));
        }
        Kind::Shockwave {
            radius,
            life,
            max_life,
            ..
        } => {
            let alpha = *life as f32 / (*max_life).max(1) as f32;
            surface.submit(DrawCommand::StrokeCircle {
                center: e.pos,
                radius: *radius,
                width: 3.0,
                color: with_alpha(e.color, alpha),
            });
        }
        Kind::BlackHole {
            influence, phase, ..
        } => {
            let pulse = 1.0 + 0.08 * phase.sin();
            surface.submit(DrawCommand::RadialGradient {
                center: e.pos,
                radius: influence * 0.45 * pulse,
                inner: with_alpha(colors::EVENT_HORIZON, 0.35),
                outer: with_alpha(colors::EVENT_HORIZON, 0.0),
            });
            surface.submit(DrawCommand::FillCircle {
                center: e.pos,
                radius: e.radius(),
                color: e.color,
            });
            surface.submit(DrawCommand::StrokeCircle {
                center: e.pos,
                radius: e.radius() * pulse,
                width: 2.0,
                color: colors::EVENT_HORIZON,
            });
        }
        Kind::VoidMaw { .. } => {
            surface.glow(e.color, 12.0);
            surface.submit(DrawCommand::FillCircle {
                center: e.pos,
                radius: e.radius(),
                color: e.color,
            });
            surface.no_glow();
            surface.submit(DrawCommand::FillCircle {
                center: e.pos,
                radius: e.radius() * 0.55,
                color: colors::BLACK_HOLE,
            });
        }
        Kind::Pulsar {
            timer, interval, ..
        } => {
            // Brightens as the next pulse approaches
            let charge = 1.0 - *timer as f32 / (*interval).max(1) as f32;
            surface.glow(e.color, 8.0 + 20.0 * charge);
            surface.submit(DrawCommand::FillCircle {
                center: e.pos,
                radius: e.radius(),
                color: with_alpha(e.color, 0.5 + 0.5 * charge),
            });
            surface.no_glow();
        }
        Kind::Spark => {
            surface.submit(DrawCommand::FillCircle {
                center: e.pos,
                radius: e.radius(),
                color: with_alpha(e.color, 0.7 + 0.3 * flicker),
            });
        }
    }
}

/// Screen-level overlay drawn on top of the world
pub fn draw_screen(
    screen: Screen,
    selected: ShipKind,
    state: Option<&GameState>,
    area: PlayArea,
    surface: &mut impl Surface,
) {
    let center = area.center();
    match screen {
        Screen::Menu => {
            surface.submit(DrawCommand::Clear {
                color: colors::BACKGROUND,
            });
            surface.glow(colors::HUD_TEXT, 20.0);
            surface.text(center - Vec2::new(0.0, 60.0), "NEON ACE", 64.0, colors::HUD_TEXT);
            surface.no_glow();
            surface.text(center + Vec2::new(0.0, 20.0), "PRESS START", 24.0, colors::WHITE);
        }
        Screen::ShipSelect => {
            surface.submit(DrawCommand::Clear {
                color: colors::BACKGROUND,
            });
            surface.text(Vec2::new(center.x, 60.0), "SELECT YOUR SHIP", 36.0, colors::HUD_TEXT);

            let spacing = area.width / (ShipKind::ALL.len() as f32 + 1.0);
            for (i, kind) in ShipKind::ALL.into_iter().enumerate() {
                let config = kind.config();
                let pos = Vec2::new(spacing * (i as f32 + 1.0), center.y - 40.0);
                let is_selected = kind == selected;
                if is_selected {
                    surface.submit(DrawCommand::StrokeCircle {
                        center: pos,
                        radius: 40.0,
                        width: 2.0,
                        color: config.color,
                    });
                    surface.glow(config.color, 20.0);
                }
                surface.submit(DrawCommand::FillPolygon {
                    points: vec![
                        pos + Vec2::new(0.0, -20.0),
                        pos + Vec2::new(20.0, 20.0),
                        pos + Vec2::new(-20.0, 20.0),
                    ],
                    color: config.color,
                });
                if is_selected {
                    surface.no_glow();
                }
                let label = if is_selected { colors::WHITE } else { colors::DIM_TEXT };
                surface.text(pos + Vec2::new(0.0, 60.0), config.name, 18.0, label);
            }

            let config = selected.config();
            surface.text(center + Vec2::new(0.0, 90.0), config.description, 18.0, colors::WHITE);
            surface.text(
                center + Vec2::new(0.0, 120.0),
                format!(
                    "HP {}  SPEED {}  DMG {}  ABILITY {}",
                    config.max_hp,
                    config.speed,
                    config.bullet_damage,
                    config.ability.name()
                ),
                16.0,
                colors::DIM_TEXT,
            );
        }
        Screen::Playing => {}
        Screen::Paused => {
            surface.fill_rect_centered(
                center,
                Vec2::new(area.width, area.height),
                with_alpha(colors::BACKGROUND, 0.6),
            );
            surface.text(center, "PAUSED", 48.0, colors::HUD_TEXT);
        }
        Screen::GameOver => {
            surface.fill_rect_centered(
                center,
                Vec2::new(area.width, area.height),
                with_alpha(colors::BACKGROUND, 0.75),
            );
            surface.glow(colors::ENEMY, 20.0);
            surface.text(center - Vec2::new(0.0, 40.0), "GAME OVER", 56.0, colors::ENEMY);
            surface.no_glow();
            let score = state.and_then(|s| s.final_score).unwrap_or(0);
            surface.text(
                center + Vec2::new(0.0, 20.0),
                format!("FINAL SCORE {}", score),
                28.0,
                colors::WHITE,
            );
        }
    }
}

/// FPS and entity count in the top corners
pub fn draw_telemetry(fps: u32, entity_count: usize, area: PlayArea, surface: &mut impl Surface) {
    surface.submit(DrawCommand::Text {
        pos: Vec2::new(10.0, 20.0),
        text: format!("FPS {}", fps),
        size: 14.0,
        color: colors::DIM_TEXT,
        align: TextAlign::Left,
    });
    surface.submit(DrawCommand::Text {
        pos: Vec2::new(area.width - 10.0, 20.0),
        text: format!("ENTITIES {}", entity_count),
        size: 14.0,
        color: colors::DIM_TEXT,
        align: TextAlign::Right,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::CommandList;
    use crate::settings::Settings;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_dead_entities_draw_nothing() {
        let mut list = CommandList::default();
        let mut e = Entity::seeker(1, Vec2::new(10.0, 10.0), 1);
        e.dead = true;
        draw_entity(&e, 0, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_particle_fades_with_life() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Entity::particle(1, Vec2::ZERO, colors::WHITE, 2.0, &mut rng);
        if let Kind::Particle { life, .. } = &mut e.kind {
            *life = 5;
        }
        let mut list = CommandList::default();
        draw_entity(&e, 0, &mut list);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::FillRect { color, .. } if (color[3] - 0.25).abs() < 1e-6
        ));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let state = GameState::new(&Settings::default(), ShipKind::Ace, 7);
        let mut a = CommandList::default();
        let mut b = CommandList::default();
        draw_world(&state, &mut a);
        draw_world(&state, &mut b);
        assert_eq!(a.commands(), b.commands());
        assert!(matches!(a.commands()[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn test_game_over_shows_final_score() {
        let mut state = GameState::new(&Settings::default(), ShipKind::Ace, 7);
        state.score = 1200;
        state.game_over();
        let mut list = CommandList::default();
        draw_screen(
            Screen::GameOver,
            ShipKind::Ace,
            Some(&state),
            PlayArea::default(),
            &mut list,
        );
        assert!(list.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "FINAL SCORE 1200"
        )));
    }

    #[test]
    fn test_ship_select_lists_every_ship() {
        let mut list = CommandList::default();
        draw_screen(
            Screen::ShipSelect,
            ShipKind::Titan,
            None,
            PlayArea::default(),
            &mut list,
        );
        for kind in ShipKind::ALL {
            assert!(list.commands().iter().any(|c| matches!(
                c,
                DrawCommand::Text { text, .. } if text == kind.name()
            )));
        }
    }

    #[test]
    fn test_telemetry_anchors_corners() {
        let mut list = CommandList::default();
        draw_telemetry(58, 12, PlayArea::default(), &mut list);
        assert_eq!(list.len(), 2);
        assert!(matches!(
            &list.commands()[0],
            DrawCommand::Text { text, align: TextAlign::Left, .. } if text == "FPS 58"
        ));
        assert!(matches!(
            &list.commands()[1],
            DrawCommand::Text { text, pos, align: TextAlign::Right, .. }
                if text == "ENTITIES 12" && pos.x == 790.0
        ));
    }
}
