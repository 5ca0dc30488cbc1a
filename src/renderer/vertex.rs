//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Rgba,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// View a vertex batch as raw bytes for upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let verts = [Vertex::new(1.0, 2.0, [0.5; 4]); 3];
        assert_eq!(as_bytes(&verts).len(), 72);
    }
}
