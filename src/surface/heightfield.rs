//! In-memory height/material grid.

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec2, UVec2, Vec3};
use super::adapter::SurfaceAdapter;

/// Dense grid of heights and material indices placed at a world origin.
///
/// Reads outside the grid return height 0 and material 0; writes outside
/// it are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightField {
    size: UVec2,
    square_size: f32,
    origin: Vec3,
    heights: Vec<f32>,
    materials: Vec<u8>,
}

impl HeightField {
    /// Create a flat field at height 0 with material 0
    pub fn new(size: UVec2, square_size: f32, origin: Vec3) -> Self {
        Self::flat(size, square_size, origin, 0.0)
    }

    /// Create a field with every cell at `height`
    pub fn flat(size: UVec2, square_size: f32, origin: Vec3, height: f32) -> Self {
        let count = cell_count(size);
        Self {
            size,
            square_size,
            origin,
            heights: vec![height; count],
            materials: vec![0; count],
        }
    }

    /// Create a field whose cells are filled by `f(pos) -> (height, material)`.
    pub fn from_fn(
        size: UVec2,
        square_size: f32,
        origin: Vec3,
        mut f: impl FnMut(IVec2) -> (f32, u8),
    ) -> Self {
        let mut field = Self::new(size, square_size, origin);
        for y in 0..size.y as i32 {
            for x in 0..size.x as i32 {
                let pos = IVec2::new(x, y);
                let (height, material) = f(pos);
                field.set_height_at(pos, height);
                field.set_material_at(pos, material);
            }
        }
        field
    }

    /// World position of cell (0, 0) at height 0
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.size.x as usize + pos.x as usize)
    }
}

fn cell_count(size: UVec2) -> usize {
    size.x as usize * size.y as usize
}

impl SurfaceAdapter for HeightField {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn square_size(&self) -> f32 {
        self.square_size
    }

    fn height_at(&self, pos: IVec2) -> f32 {
        self.index(pos).map_or(0.0, |i| self.heights[i])
    }

    fn set_height_at(&mut self, pos: IVec2, height: f32) {
        if let Some(i) = self.index(pos) {
            self.heights[i] = height;
        }
    }

    fn material_at(&self, pos: IVec2) -> u8 {
        self.index(pos).map_or(0, |i| self.materials[i])
    }

    fn set_material_at(&mut self, pos: IVec2, material: u8) {
        if let Some(i) = self.index(pos) {
            self.materials[i] = material;
        }
    }

    fn world_to_local(&self, world: Vec3) -> Vec3 {
        world - self.origin
    }

    fn local_to_world(&self, local: Vec3) -> Vec3 {
        local + self.origin
    }
}
