use serde::{Deserialize, Serialize};

/// Sheet scale context.
///
/// All thresholds of the grid retrieval are expressed as fractions of the
/// interline distance (the vertical gap between two staff lines) and
/// resolved to pixels through this context once per run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Scale {
    /// Interline distance in pixels.
    pub interline: u32,
    /// Typical thickness of a staff line / stroke, in pixels.
    pub max_fore: u32,
}

impl Scale {
    pub fn new(interline: u32, max_fore: u32) -> Self {
        Self {
            interline,
            max_fore,
        }
    }

    /// Resolve an interline fraction to a pixel count (rounded).
    #[inline]
    pub fn to_pixels(&self, frac: f64) -> i32 {
        (frac * self.interline as f64).round() as i32
    }

    /// Resolve an interline-squared area fraction to a pixel area.
    #[inline]
    pub fn to_pixels_area(&self, frac: f64) -> i32 {
        (frac * (self.interline as f64) * (self.interline as f64)).round() as i32
    }

    /// Convert a pixel distance to an interline fraction.
    #[inline]
    pub fn pixels_to_frac(&self, pixels: f64) -> f64 {
        pixels / self.interline as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trips() {
        let scale = Scale::new(20, 3);
        assert_eq!(scale.to_pixels(0.5), 10);
        assert_eq!(scale.to_pixels_area(0.25), 100);
        assert_relative_eq!(scale.pixels_to_frac(10.0), 0.5);
    }

    #[test]
    fn survives_json() {
        let scale = Scale::new(20, 3);
        let json = serde_json::to_string(&scale).unwrap();
        let back: Scale = serde_json::from_str(&json).unwrap();
        assert_eq!(back.interline, 20);
        assert_eq!(back.max_fore, 3);
    }
}
