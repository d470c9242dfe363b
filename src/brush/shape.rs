//! Brush footprints and their falloff distances.

use serde::{Deserialize, Serialize};

use crate::core::types::IVec2;

/// Footprint a brush rasterizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushShape {
    /// Full rectangle; falloff is carried by weight alone
    #[default]
    Box,
    /// Cells outside the inscribed ellipse are left out entirely
    Ellipse,
    /// Stamps nothing; the current selection is the stamp
    Selection,
}

impl BrushShape {
    /// Normalized falloff distance for offset `(x, y)` inside a `size` footprint,
    /// or `None` when the cell is excluded from the shape.
    pub fn distance(self, size: IVec2, x: i32, y: i32) -> Option<f32> {
        match self {
            BrushShape::Box => Some(box_distance(size, x, y)),
            BrushShape::Ellipse => {
                let factor = ellipse_factor(size, x, y);
                ellipse_includes(factor).then_some(factor)
            }
            BrushShape::Selection => None,
        }
    }

    /// Whether the shape rasterizes cells at all
    pub fn rasterizes(self) -> bool {
        !matches!(self, BrushShape::Selection)
    }
}

/// Centre of a `size` footprint in offset space: `((w-1)/2, (h-1)/2)`.
pub fn footprint_center(size: IVec2) -> (f32, f32) {
    ((size.x - 1) as f32 / 2.0, (size.y - 1) as f32 / 2.0)
}

/// Distance along one axis of a box, 0 at the centre and just under 1 at
/// the edge. The `c / (c + 0.5)` scale keeps even and odd sizes comparable.
fn box_axis_factor(center: f32, i: i32) -> f32 {
    if center == 0.0 {
        return 0.0;
    }
    (center - i as f32).abs() / center * (center / (center + 0.5))
}

/// Chebyshev-style box falloff: the larger of the two axis factors.
pub fn box_distance(size: IVec2, x: i32, y: i32) -> f32 {
    let (cx, cy) = footprint_center(size);
    box_axis_factor(cx, x).max(box_axis_factor(cy, y))
}

/// `(a·dx)² + (b·dy)²` with `a = 2/w`, `b = 2/h`, offsets taken from the
/// footprint centre. At most 1 inside the ellipse.
pub fn ellipse_factor(size: IVec2, x: i32, y: i32) -> f32 {
    let (cx, cy) = footprint_center(size);
    let a = 2.0 / size.x as f32;
    let b = 2.0 / size.y as f32;
    let dx = a * (cx - x as f32);
    let dy = b * (cy - y as f32);
    dx * dx + dy * dy
}

/// Cells on the boundary (factor exactly 1) belong to the ellipse.
#[inline]
pub fn ellipse_includes(factor: f32) -> bool {
    factor <= 1.0
}
