//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::Rgba;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    radial_fan(center, radius, color, color, segments)
}

/// Filled circle whose color blends from `inner` at the center to `outer`
/// at the rim
pub fn radial_fan(center: Vec2, radius: f32, inner: Rgba, outer: Rgba, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            outer,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            outer,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let inner_radius = inner_radius.max(0.0);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (sin1, cos1) = theta1.sin_cos();
        let (sin2, cos2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(cos1, sin1) * inner_radius;
        let outer1 = center + Vec2::new(cos1, sin1) * outer_radius;
        let inner2 = center + Vec2::new(cos2, sin2) * inner_radius;
        let outer2 = center + Vec2::new(cos2, sin2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(origin: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    let (x0, y0) = (origin.x, origin.y);
    let (x1, y1) = (origin.x + size.x, origin.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Convex polygon as a fan around its first point
pub fn polygon(points: &[Vec2], color: Rgba) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let anchor = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(anchor.x, anchor.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Regular polygon centered on a point, first vertex at `rotation`
pub fn regular_polygon(center: Vec2, radius: f32, sides: u32, rotation: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let theta = rotation + i as f32 / sides as f32 * 2.0 * PI;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, [1.0; 4], 24);
        assert_eq!(verts.len(), 72);
        // Rim points sit on the radius
        let rim = Vec2::from(verts[1].position);
        assert!((rim.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_and_rect() {
        assert_eq!(ring(Vec2::ZERO, 5.0, 8.0, [1.0; 4], 12).len(), 72);
        let quad = rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), [1.0; 4]);
        assert_eq!(quad.len(), 6);
        assert_eq!(quad[5].position, [14.0, 26.0]);
    }

    #[test]
    fn test_polygon_fan() {
        let hex = regular_polygon(Vec2::ZERO, 10.0, 6, 0.0);
        assert_eq!(hex.len(), 6);
        assert_eq!(polygon(&hex, [1.0; 4]).len(), 12);
        assert!(polygon(&hex[..2], [1.0; 4]).is_empty());
    }

    #[test]
    fn test_radial_fan_blends() {
        let verts = radial_fan(Vec2::ZERO, 10.0, [1.0; 4], [0.0; 4], 8);
        assert_eq!(verts[0].color, [1.0; 4]);
        assert_eq!(verts[1].color, [0.0; 4]);
    }
}
