//! Renderer-agnostic brush overlay geometry.

use bytemuck::{Pod, Zeroable};

use crate::core::types::Vec3;

/// One overlay vertex: world position plus the cell's selection weight.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BrushVertex {
    pub position: [f32; 3],
    pub weight: f32,
}

impl BrushVertex {
    pub fn new(position: Vec3, weight: f32) -> Self {
        Self { position: position.to_array(), weight }
    }
}

/// Flat vertex buffer plus the primitive layout a renderer needs to draw it.
///
/// Every primitive is a quad: `verts_per_prim` vertices, drawn as two
/// triangles (`elems_per_prim` indices).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrushGeometry {
    pub vertices: Vec<BrushVertex>,
    pub verts_per_prim: u32,
    pub elems_per_prim: u32,
    pub num_prims: u32,
}

impl BrushGeometry {
    pub const QUAD_VERTS: u32 = 4;
    pub const QUAD_ELEMS: u32 = 6;

    /// Empty quad buffer
    pub fn quads() -> Self {
        Self {
            vertices: Vec::new(),
            verts_per_prim: Self::QUAD_VERTS,
            elems_per_prim: Self::QUAD_ELEMS,
            num_prims: 0,
        }
    }

    /// Append one quad, corners in winding order.
    pub fn push_quad(&mut self, corners: [BrushVertex; 4]) {
        self.vertices.extend_from_slice(&corners);
        self.num_prims += 1;
    }

    /// Triangle indices for every quad, two triangles each.
    pub fn indices(&self) -> Vec<u32> {
        (0..self.num_prims)
            .flat_map(|q| {
                let base = q * Self::QUAD_VERTS;
                [base, base + 1, base + 2, base, base + 2, base + 3]
            })
            .collect()
    }

    /// Vertex data as bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn is_empty(&self) -> bool {
        self.num_prims == 0
    }
}
