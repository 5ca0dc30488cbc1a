//! Rendering module
//!
//! The game never talks to a graphics API. Draw code emits [`DrawCommand`]s
//! into a [`Surface`]; the host decides what to do with them. [`CommandList`]
//! is the stock surface: it records commands and can tessellate the
//! geometric ones into a triangle list for a GPU upload.

pub mod draw;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::Rgba;
use crate::settings::QualityPreset;
pub use draw::{draw_entity, draw_screen, draw_telemetry, draw_world};
pub use vertex::Vertex;

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One immediate-mode drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: Rgba },
    /// Axis-aligned rectangle from its top-left corner
    FillRect { origin: Vec2, size: Vec2, color: Rgba },
    /// Convex polygon
    FillPolygon { points: Vec<Vec2>, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Rgba,
    },
    /// Disc fading from `inner` at the center to `outer` at the rim
    RadialGradient {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Rgba,
        align: TextAlign,
    },
    /// Glow applied to following fills until reset with `blur: 0`
    Glow { color: Rgba, blur: f32 },
}

/// A sink for draw commands
pub trait Surface {
    fn submit(&mut self, command: DrawCommand);

    /// Called once before each frame is drawn
    fn begin_frame(&mut self) {}

    fn fill_rect_centered(&mut self, center: Vec2, size: Vec2, color: Rgba) {
        self.submit(DrawCommand::FillRect {
            origin: center - size / 2.0,
            size,
            color,
        });
    }

    fn glow(&mut self, color: Rgba, blur: f32) {
        self.submit(DrawCommand::Glow { color, blur });
    }

    fn no_glow(&mut self) {
        self.submit(DrawCommand::Glow {
            color: [0.0; 4],
            blur: 0.0,
        });
    }

    fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Rgba)
    where
        Self: Sized,
    {
        self.submit(DrawCommand::Text {
            pos,
            text: text.into(),
            size,
            color,
            align: TextAlign::Center,
        });
    }
}

/// Records commands for one frame
#[derive(Debug, Clone)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    /// Circle tessellation detail
    segments: u32,
}

impl Default for CommandList {
    fn default() -> Self {
        Self::new(QualityPreset::default())
    }
}

impl CommandList {
    pub fn new(quality: QualityPreset) -> Self {
        Self {
            commands: Vec::new(),
            segments: quality.circle_segments(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop the previous frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Tessellate the geometric commands into a triangle list.
    /// Text and glow are left to the host.
    pub fn to_vertices(&self, width: f32, height: f32) -> Vec<Vertex> {
        let mut vertices = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Clear { color } => {
                    vertices.extend(shapes::rect(Vec2::ZERO, Vec2::new(width, height), *color));
                }
                DrawCommand::FillRect {
                    origin,
                    size,
                    color,
                } => vertices.extend(shapes::rect(*origin, *size, *color)),
                DrawCommand::FillPolygon { points, color } => {
                    vertices.extend(shapes::polygon(points, *color));
                }
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => vertices.extend(shapes::circle(*center, *radius, *color, self.segments)),
                DrawCommand::StrokeCircle {
                    center,
                    radius,
                    width,
                    color,
                } => vertices.extend(shapes::ring(
                    *center,
                    radius - width / 2.0,
                    radius + width / 2.0,
                    *color,
                    self.segments,
                )),
                DrawCommand::RadialGradient {
                    center,
                    radius,
                    inner,
                    outer,
                } => vertices.extend(shapes::radial_fan(
                    *center,
                    *radius,
                    *inner,
                    *outer,
                    self.segments,
                )),
                DrawCommand::Text { .. } | DrawCommand::Glow { .. } => {}
            }
        }
        vertices
    }
}

impl Surface for CommandList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn begin_frame(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;

    #[test]
    fn test_records_and_tessellates() {
        let mut list = CommandList::new(QualityPreset::Low);
        list.submit(DrawCommand::Clear {
            color: colors::BACKGROUND,
        });
        list.fill_rect_centered(Vec2::new(10.0, 10.0), Vec2::new(4.0, 20.0), colors::WHITE);
        list.submit(DrawCommand::FillCircle {
            center: Vec2::ZERO,
            radius: 3.0,
            color: colors::SPARK,
        });
        list.text(Vec2::ZERO, "SCORE", 20.0, colors::HUD_TEXT);
        list.glow(colors::PLASMA, 15.0);

        assert_eq!(list.len(), 5);
        // 6 + 6 + 12 * 3; text and glow add nothing
        assert_eq!(list.to_vertices(800.0, 600.0).len(), 48);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_centered_rect_origin() {
        let mut list = CommandList::default();
        list.fill_rect_centered(Vec2::new(10.0, 10.0), Vec2::new(4.0, 20.0), colors::WHITE);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::FillRect { origin, .. } if origin == Vec2::new(8.0, 0.0)
        ));
    }
}
