//! Interface to an editable height/material grid.

use crate::core::types::{IVec2, UVec2, Vec3};
use crate::math::Aabb;

/// Height and material storage the editing core reads and writes.
///
/// Grid cell `(x, y)` sits at local position `(x * square_size, height,
/// y * square_size)`; the adapter's transform places that in the world.
pub trait SurfaceAdapter {
    /// Cells per side
    fn size(&self) -> UVec2;

    /// World distance between neighbouring cells
    fn square_size(&self) -> f32;

    fn height_at(&self, pos: IVec2) -> f32;

    fn set_height_at(&mut self, pos: IVec2, height: f32);

    fn material_at(&self, pos: IVec2) -> u8;

    fn set_material_at(&mut self, pos: IVec2, material: u8);

    fn world_to_local(&self, world: Vec3) -> Vec3;

    fn local_to_world(&self, local: Vec3) -> Vec3;

    /// Check whether a cell lies on this surface
    fn contains(&self, pos: IVec2) -> bool {
        let size = self.size();
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < size.x && (pos.y as u32) < size.y
    }

    /// World position of a cell, at its current height.
    fn grid_to_world(&self, pos: IVec2) -> Vec3 {
        let sq = self.square_size();
        self.local_to_world(Vec3::new(
            pos.x as f32 * sq,
            self.height_at(pos),
            pos.y as f32 * sq,
        ))
    }

    /// Nearest cell under a world point, if it lies on this surface.
    fn world_to_grid(&self, world: Vec3) -> Option<IVec2> {
        let local = self.world_to_local(world);
        let sq = self.square_size();
        let pos = IVec2::new((local.x / sq).round() as i32, (local.z / sq).round() as i32);
        self.contains(pos).then_some(pos)
    }

    /// World-space footprint of the grid at height zero.
    fn world_bounds(&self) -> Aabb {
        let size = self.size();
        let sq = self.square_size();
        let far_x = size.x.saturating_sub(1) as f32 * sq;
        let far_z = size.y.saturating_sub(1) as f32 * sq;
        let corners = [
            Vec3::ZERO,
            Vec3::new(far_x, 0.0, 0.0),
            Vec3::new(0.0, 0.0, far_z),
            Vec3::new(far_x, 0.0, far_z),
        ];
        Aabb::from_points(corners.map(|c| self.local_to_world(c))).unwrap_or_default()
    }
}
