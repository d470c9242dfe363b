//! Brush state and rasterization into a [`SpatialSet`].

use crate::core::types::{IVec2, Vec3};
use crate::math::lerp;
use crate::selection::{GridCoord, GridRecord, SpatialSet, SurfaceId};
use crate::surface::{SurfaceAdapter, SurfaceRegistry};
use super::filter::Filter;
use super::geometry::{BrushGeometry, BrushVertex};
use super::shape::{footprint_center, BrushShape};

/// Valid range for pressure and softness.
pub const FACTOR_RANGE: (f32, f32) = (0.01, 1.0);

/// Default upper bound on either brush dimension, in cells.
pub const DEFAULT_MAX_BRUSH_SIZE: i32 = 256;

/// Hard ceiling for [`Brush::with_max_size`].
pub const MAX_BRUSH_SIZE: i32 = 1024;

/// A weighted footprint anchored to a cell of a surface.
///
/// The cell set is regenerated from scratch whenever the anchor, size,
/// surface, shape or any weighting parameter changes.
#[derive(Clone, Debug)]
pub struct Brush {
    shape: BrushShape,
    anchor: IVec2,
    size: IVec2,
    surface: Option<SurfaceId>,
    pressure: f32,
    softness: f32,
    filter: Filter,
    max_size: i32,
    cells: SpatialSet,
    /// Footprint offset (row-major, `y * w + x`) to the primary record's
    /// index in `cells`; `None` where the cell was excluded.
    index_map: Vec<Option<usize>>,
}

impl Brush {
    /// Create an unbound 1×1 brush with full pressure and softness
    pub fn new(shape: BrushShape) -> Self {
        Self {
            shape,
            anchor: IVec2::ZERO,
            size: IVec2::ONE,
            surface: None,
            pressure: 1.0,
            softness: 1.0,
            filter: Filter::default(),
            max_size: DEFAULT_MAX_BRUSH_SIZE,
            cells: SpatialSet::new(),
            index_map: Vec::new(),
        }
    }

    /// Use a set with `bucket_count` buckets for the rasterized cells.
    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.cells = SpatialSet::with_buckets(bucket_count);
        self
    }

    /// Cap both dimensions at `max_size`, itself clamped to
    /// `[1, MAX_BRUSH_SIZE]`. Does not rebuild.
    pub fn with_max_size(mut self, max_size: i32) -> Self {
        self.max_size = max_size.clamp(1, MAX_BRUSH_SIZE);
        self.size = self.clamp_size(self.size);
        self
    }

    pub fn shape(&self) -> BrushShape {
        self.shape
    }

    pub fn anchor(&self) -> IVec2 {
        self.anchor
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn softness(&self) -> f32 {
        self.softness
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    /// Anchor cell on the bound surface
    pub fn anchor_coord(&self) -> Option<GridCoord> {
        self.surface.map(|surface| GridCoord { surface, pos: self.anchor })
    }

    /// Currently rasterized, weighted cells
    pub fn cells(&self) -> &SpatialSet {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn set_shape(&mut self, shape: BrushShape, registry: &SurfaceRegistry) {
        self.shape = shape;
        self.rebuild(registry);
    }

    pub fn set_position(&mut self, anchor: IVec2, registry: &SurfaceRegistry) {
        self.anchor = anchor;
        self.rebuild(registry);
    }

    /// Bind to the surface under a world-space hit and anchor on the cell
    /// there. Returns `false` and leaves the brush alone if nothing is hit.
    pub fn set_world_position(&mut self, hit: Vec3, registry: &SurfaceRegistry) -> bool {
        let Some(id) = registry.surface_under_world_point(hit) else {
            return false;
        };
        let Some(pos) = registry.get(id).and_then(|s| s.world_to_grid(hit)) else {
            return false;
        };
        self.surface = Some(id);
        self.anchor = pos;
        self.rebuild(registry);
        true
    }

    /// Resize, clamping each dimension to `[1, max_size]`. Ignored by
    /// selection brushes.
    pub fn set_size(&mut self, width: i32, height: i32, registry: &SurfaceRegistry) {
        if !self.shape.rasterizes() {
            return;
        }
        let requested = IVec2::new(width, height);
        self.size = self.clamp_size(requested);
        if self.size != requested {
            log::trace!("Brush size {:?} clamped to {:?}", requested, self.size);
        }
        self.rebuild(registry);
    }

    pub fn set_surface(&mut self, surface: Option<SurfaceId>, registry: &SurfaceRegistry) {
        self.surface = surface;
        self.rebuild(registry);
    }

    /// Set the weight multiplier, clamped to [`FACTOR_RANGE`].
    pub fn set_pressure(&mut self, pressure: f32, registry: &SurfaceRegistry) {
        self.pressure = clamp_factor(pressure);
        self.rebuild(registry);
    }

    /// Set the blend toward the falloff curve, clamped to [`FACTOR_RANGE`].
    pub fn set_softness(&mut self, softness: f32, registry: &SurfaceRegistry) {
        self.softness = clamp_factor(softness);
        self.rebuild(registry);
    }

    pub fn set_filter(&mut self, filter: Filter, registry: &SurfaceRegistry) {
        self.filter = filter;
        self.rebuild(registry);
    }

    /// Regenerate the cell set with fresh records as the prior weights.
    pub fn rebuild(&mut self, registry: &SurfaceRegistry) {
        self.rebuild_seeded(registry, None);
    }

    /// Regenerate the cell set. Where `seed` holds a cell, its weight is
    /// the prior that softness blends the falloff value toward.
    pub fn rebuild_seeded(&mut self, registry: &SurfaceRegistry, seed: Option<&SpatialSet>) {
        self.cells.reset();
        self.index_map.clear();

        let Some(surface) = self.surface else {
            return;
        };
        if !self.shape.rasterizes() {
            return;
        }

        let (w, h) = (self.size.x, self.size.y);
        self.index_map.resize(footprint_len(self.size), None);
        let (cx, cy) = footprint_center(self.size);
        let origin = self.anchor - IVec2::new(cx as i32, cy as i32);

        for y in 0..h {
            for x in 0..w {
                let Some(distance) = self.shape.distance(self.size, x, y) else {
                    continue;
                };
                let falloff = self.filter.get_value(distance);

                for mut record in registry.records_at(surface, origin + IVec2::new(x, y)) {
                    let prior = seed
                        .and_then(|s| s.weight_of(&record.coord))
                        .unwrap_or(record.weight);
                    record.weight = self.pressure * lerp(prior, falloff, self.softness);

                    let index = self.cells.len();
                    if self.cells.add(record) && record.primary {
                        self.index_map[(y * w + x) as usize] = Some(index);
                    }
                }
            }
        }

        log::debug!(
            "Rebuilt {:?} brush {}x{} at {:?}: {} cells",
            self.shape, w, h, self.anchor, self.cells.len()
        );
    }

    /// One marker quad per rasterized cell, centred on the cell and lying
    /// at its height. Excluded cells emit nothing.
    pub fn render(&self, registry: &SurfaceRegistry) -> BrushGeometry {
        let mut geometry = BrushGeometry::quads();
        for record in &self.cells {
            let Some(surface) = registry.get(record.surface()) else {
                continue;
            };
            let center = cell_world(surface, record);
            let half = surface.square_size() * 0.25;
            let corners = [
                Vec3::new(-half, 0.0, -half),
                Vec3::new(half, 0.0, -half),
                Vec3::new(half, 0.0, half),
                Vec3::new(-half, 0.0, half),
            ];
            geometry.push_quad(corners.map(|c| BrushVertex::new(center + c, record.weight)));
        }
        geometry
    }

    /// Surface-hugging mesh over the footprint: one quad per 2×2 block of
    /// neighbouring cells, emitted only when all four corners were
    /// rasterized on the bound surface.
    pub fn render_fill(&self, registry: &SurfaceRegistry) -> BrushGeometry {
        let mut geometry = BrushGeometry::quads();
        let (w, h) = (self.size.x, self.size.y);
        if self.index_map.len() != footprint_len(self.size) {
            return geometry;
        }

        let at = |x: i32, y: i32| self.index_map[(y * w + x) as usize];
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let (Some(a), Some(b), Some(c), Some(d)) =
                    (at(x, y), at(x + 1, y), at(x + 1, y + 1), at(x, y + 1))
                else {
                    continue;
                };
                let corners = [a, b, c, d].map(|i| &self.cells[i]);
                let Some(surface) = registry.get(corners[0].surface()) else {
                    continue;
                };
                geometry.push_quad(
                    corners.map(|r| BrushVertex::new(cell_world(surface, r), r.weight)),
                );
            }
        }
        geometry
    }

    fn clamp_size(&self, size: IVec2) -> IVec2 {
        size.clamp(IVec2::ONE, IVec2::splat(self.max_size))
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(BrushShape::default())
    }
}

fn footprint_len(size: IVec2) -> usize {
    size.x.max(0) as usize * size.y.max(0) as usize
}

fn clamp_factor(value: f32) -> f32 {
    if value.is_nan() {
        return FACTOR_RANGE.1;
    }
    value.clamp(FACTOR_RANGE.0, FACTOR_RANGE.1)
}

/// World position of a record's cell at the record's own height.
fn cell_world(surface: &dyn SurfaceAdapter, record: &GridRecord) -> Vec3 {
    let sq = surface.square_size();
    surface.local_to_world(Vec3::new(
        record.coord.pos.x as f32 * sq,
        record.height,
        record.coord.pos.y as f32 * sq,
    ))
}
