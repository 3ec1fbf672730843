//! Spatial Mapper - grid indices to centered, evenly spaced 3D positions.
//!
//! Pure arithmetic, no aggregation logic: the same grid coordinates always
//! yield the same position. Centering guarantees the cube sits at the
//! origin regardless of axis cardinality, and adjacent grid indices land
//! exactly one unit apart before scaling (the neighbor relation in
//! `selection` depends on that even spacing).

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Default spacing between adjacent cell centers (tight packing).
pub const DEFAULT_SPACING: f64 = 1.1;

/// Layout parameters handed in by the rendering consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Uniform distance between adjacent cell centers
    pub spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
        }
    }
}

/// Map grid indices to origin-centered, unscaled coordinates.
///
/// `centered[axis] = grid[axis] - (len[axis] - 1) / 2`
pub fn centered_position(grid: [usize; 3], lens: [usize; 3]) -> Vector3<f64> {
    Vector3::new(
        grid[0] as f64 - (lens[0] as f64 - 1.0) / 2.0,
        grid[1] as f64 - (lens[1] as f64 - 1.0) / 2.0,
        grid[2] as f64 - (lens[2] as f64 - 1.0) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_odd_axis_centers_on_origin() {
        let pos = centered_position([1, 1, 1], [3, 3, 3]);
        assert_relative_eq!(pos, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_even_axis_straddles_origin() {
        assert_relative_eq!(
            centered_position([0, 1, 0], [2, 2, 2]),
            Vector3::new(-0.5, 0.5, -0.5)
        );
    }

    #[test]
    fn test_adjacent_indices_one_unit_apart() {
        let a = centered_position([0, 2, 4], [2, 3, 5]);
        let b = centered_position([0, 2, 3], [2, 3, 5]);
        assert_relative_eq!((a - b).norm(), 1.0);
    }

    #[test]
    fn test_deterministic() {
        let grid = [1, 0, 4];
        let lens = [2, 2, 5];
        assert_eq!(centered_position(grid, lens), centered_position(grid, lens));
    }
}
