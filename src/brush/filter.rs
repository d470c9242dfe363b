//! Falloff curve shared by the brush shapes.
//!
//! [`Filter`] maps a normalized distance from the brush centre (0 at the
//! centre, 1 at the edge) to a weight multiplier.

use serde::{Deserialize, Serialize};

use crate::math::lerp;

/// Breakpoints of the default linear falloff.
pub const DEFAULT_FILTER: [f32; 7] = [1.0, 0.83, 0.67, 0.5, 0.33, 0.17, 0.0];

/// Breakpoints evenly spaced across `[0, 1]`, sampled with linear
/// interpolation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    points: Vec<f32>,
}

impl Filter {
    /// Create a filter from breakpoints; the first sits at 0 and the last at 1.
    pub fn new(points: Vec<f32>) -> Self {
        Self { points }
    }

    /// Create a filter that returns `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self { points: vec![value] }
    }

    pub fn points(&self) -> &[f32] {
        &self.points
    }

    /// Sample the curve at `t`.
    ///
    /// Outside `[0, 1]` the nearest end breakpoint is returned. An empty
    /// filter applies no falloff and returns 1.
    pub fn get_value(&self, t: f32) -> f32 {
        let n = self.points.len();
        match n {
            0 => 1.0,
            1 => self.points[0],
            _ => {
                // Negated comparison also catches NaN.
                if !(t > 0.0) {
                    return self.points[0];
                }
                if t >= 1.0 {
                    return self.points[n - 1];
                }
                let pos = t * (n - 1) as f32;
                let lower = (pos.floor() as usize).min(n - 2);
                let frac = pos - lower as f32;
                lerp(self.points[lower], self.points[lower + 1], frac)
            }
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER.to_vec())
    }
}
