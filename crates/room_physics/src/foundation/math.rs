//! Math utilities and types
//!
//! Provides the vector types shared by the 2D and 3D collision code.
//! Coordinates follow screen convention: +x is right and +y is **down**.
//! In 3D, y stays the vertical axis and z is the second horizontal axis.

pub use nalgebra::{SVector, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Index of the vertical axis in every vector used by the engine
pub const VERTICAL_AXIS: usize = 1;

/// Math constants
pub mod constants {
    /// Distances below this are treated as zero when normalising push vectors
    pub const EPSILON: f32 = 1e-6;
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Index of the largest-magnitude component.
    ///
    /// Ties favour the vertical axis, then the lower index, so a push that
    /// is exactly diagonal reports a floor or ceiling contact.
    pub fn dominant_axis(components: &[f32]) -> usize {
        let mut best = 0;
        for (axis, value) in components.iter().enumerate().skip(1) {
            let current = components[best].abs();
            let candidate = value.abs();
            if candidate > current || (candidate == current && axis == super::VERTICAL_AXIS) {
                best = axis;
            }
        }
        best
    }
}
