use nalgebra::Point2;

use crate::geom::Rect;

/// Geometric descriptors of a connected pixel aggregate.
///
/// Glyphs are built by the external pixel-run infrastructure; this crate
/// only consumes their derived geometry.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// Bounding box of the aggregate.
    pub bounds: Rect,
    /// Number of foreground pixels.
    pub weight: i32,
    /// Centroid of the foreground pixels.
    pub centroid: Point2<f64>,
    /// Mean radius of curvature of the aggregate's spine, in pixels.
    /// Straight bar lines have a very large value, brace portions a small one.
    pub mean_curvature: f64,
    /// Slope of the best-fit line through the aggregate, as dy/dx for mostly
    /// horizontal aggregates (serifs) or dx/dy for mostly vertical ones.
    pub slope: f64,
}

/// Access to the external pixel-run aggregation service.
///
/// Implementations own the run tables of the sheet; the grid retrieval only
/// asks for glyphs at specific places.
pub trait GlyphSource {
    /// Build the core glyph of a bar peak from runs intersecting `bounds`,
    /// keeping only runs no wider than `max_width`.
    fn bar_glyph(&self, bounds: Rect, max_width: i32) -> Glyph;

    /// Build a connected glyph from the runs intersecting `roi`, excluding
    /// runs that belong to the given glyphs (typically the bar itself and
    /// the following peak). Returns `None` when no runs remain.
    fn glyph_in(&self, roi: Rect, exclude: &[Rect]) -> Option<Glyph>;
}
