use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Global sheet skew correction.
///
/// The sheet rotation is estimated upstream from the staff lines; this type
/// only applies the inverse rotation so that abscissae measured on different
/// staves become comparable.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Skew {
    /// Estimated global rotation angle, radians, counter-clockwise positive.
    angle: f64,
}

impl Skew {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    /// A perfectly straight sheet.
    pub fn identity() -> Self {
        Self { angle: 0.0 }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Rotate the point back by the estimated sheet angle.
    pub fn deskewed(&self, p: Point2<f64>) -> Point2<f64> {
        let (sin, cos) = (-self.angle).sin_cos();
        Point2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
    }
}
