use bargrid_core::Scale;
use serde::{Deserialize, Serialize};

/// Configuration for the bar grid detector.
///
/// All distances are interline fractions unless noted otherwise; they are
/// resolved to pixels once per run through the sheet [`Scale`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridParams {
    /// Max deskewed abscissa shift for a cross-staff alignment.
    pub max_alignment_dx: f64,
    /// Max vertical white gap when validating a connection.
    pub max_connection_gap: f64,
    /// Max white-row ratio when validating a connection (plain ratio).
    pub max_connection_white_ratio: f64,
    /// Max extension of a bar glyph above or below the staff lines.
    pub max_bar_extension: f64,
    /// Min glyph mean curvature radius for a bar line (below: brace).
    pub min_bar_curvature: f64,
    /// Max horizontal gap between members of a double bar.
    pub max_double_bar_gap: f64,
    /// Min width of a measure.
    pub min_measure_width: f64,
    /// Typical width of a thin bar line (EM seed).
    pub typical_thin_width: f64,
    /// Typical width of a thick bar line (EM seed).
    pub typical_thick_width: f64,
    /// Min separation between fitted thin/thick means; below this the
    /// classifier falls back to all-thin.
    pub min_thin_thick_delta: f64,
    /// Min width of the first (thick) C-clef peak.
    pub min_cclef_peak1_width: f64,
    /// Max width of the second (thin) C-clef peak.
    pub max_cclef_peak2_width: f64,
    /// Tail width of a C-clef, from second peak to its right end.
    pub cclef_tail: f64,
    /// Min width of a bracket end peak.
    pub min_bracket_width: f64,
    /// Max extension of a bracket end above or below the staff lines.
    pub max_bracket_extension: f64,
    /// Lookup height above/below the staff when building bar glyphs.
    pub bracket_lookup_extension: f64,
    /// Width of the serif lookup region.
    pub serif_roi_width: f64,
    /// Height of the serif lookup region.
    pub serif_roi_height: f64,
    /// Typical serif stroke thickness.
    pub serif_thickness: f64,
    /// Min serif pixel weight (interline-squared area fraction).
    pub serif_min_weight: f64,
    /// Min absolute serif slope away from the bar axis (tangent).
    pub serif_min_slope: f64,
    /// Confidence boost ratio for aligned bar lines.
    pub aligned_boost_ratio: f64,
    /// Confidence penalty ratio for unaligned bar lines.
    pub unaligned_penalty_ratio: f64,
    /// Hard-delete unaligned peaks in multi-staff systems instead of
    /// down-weighting them.
    pub delete_unaligned: bool,
    /// Max EM rounds for the width mixture fit.
    pub em_max_iters: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            max_alignment_dx: 0.5,
            max_connection_gap: 2.0,
            max_connection_white_ratio: 0.25,
            max_bar_extension: 0.3,
            min_bar_curvature: 20.0,
            max_double_bar_gap: 0.6,
            min_measure_width: 2.0,
            typical_thin_width: 0.25,
            typical_thick_width: 0.45,
            min_thin_thick_delta: 0.2,
            min_cclef_peak1_width: 0.3,
            max_cclef_peak2_width: 0.3,
            cclef_tail: 2.0,
            min_bracket_width: 0.4,
            max_bracket_extension: 1.25,
            bracket_lookup_extension: 2.0,
            serif_roi_width: 2.0,
            serif_roi_height: 2.0,
            serif_thickness: 0.3,
            serif_min_weight: 0.25,
            serif_min_slope: 0.25,
            aligned_boost_ratio: 0.30,
            unaligned_penalty_ratio: 0.30,
            delete_unaligned: true,
            em_max_iters: 50,
        }
    }
}

/// Scale-resolved parameters, pixels everywhere.
#[derive(Clone, Debug)]
pub(crate) struct Resolved {
    pub max_alignment_dx: f64,
    pub max_connection_gap: i32,
    pub max_connection_white_ratio: f64,
    pub max_bar_extension: f64,
    pub min_bar_curvature: f64,
    pub max_double_bar_gap: i32,
    pub min_measure_width: i32,
    pub typical_thin_width: f64,
    pub typical_thick_width: f64,
    pub min_thin_thick_delta: f64,
    pub min_cclef_peak1_width: i32,
    pub max_cclef_peak2_width: i32,
    pub cclef_tail: i32,
    pub min_bracket_width: i32,
    pub max_bracket_extension: f64,
    pub bracket_lookup_extension: i32,
    pub serif_roi_width: i32,
    pub serif_roi_height: i32,
    pub serif_thickness: i32,
    pub serif_min_weight: i32,
    pub serif_min_slope: f64,
    pub aligned_boost_ratio: f64,
    pub unaligned_penalty_ratio: f64,
    pub delete_unaligned: bool,
    pub em_max_iters: usize,
}

impl Resolved {
    pub fn new(params: &GridParams, scale: &Scale) -> Self {
        Self {
            // Kept in interline fraction: alignment deviations are compared
            // in fraction units directly.
            max_alignment_dx: params.max_alignment_dx,
            max_connection_gap: scale.to_pixels(params.max_connection_gap),
            max_connection_white_ratio: params.max_connection_white_ratio,
            max_bar_extension: scale.to_pixels(params.max_bar_extension) as f64,
            min_bar_curvature: scale.to_pixels(params.min_bar_curvature) as f64,
            max_double_bar_gap: scale.to_pixels(params.max_double_bar_gap),
            min_measure_width: scale.to_pixels(params.min_measure_width),
            typical_thin_width: scale.to_pixels(params.typical_thin_width) as f64,
            typical_thick_width: scale.to_pixels(params.typical_thick_width) as f64,
            min_thin_thick_delta: params.min_thin_thick_delta,
            min_cclef_peak1_width: scale.to_pixels(params.min_cclef_peak1_width),
            max_cclef_peak2_width: scale.to_pixels(params.max_cclef_peak2_width),
            cclef_tail: scale.to_pixels(params.cclef_tail),
            min_bracket_width: scale.to_pixels(params.min_bracket_width),
            max_bracket_extension: scale.to_pixels(params.max_bracket_extension) as f64,
            bracket_lookup_extension: scale.to_pixels(params.bracket_lookup_extension),
            serif_roi_width: scale.to_pixels(params.serif_roi_width),
            serif_roi_height: scale.to_pixels(params.serif_roi_height),
            serif_thickness: scale.to_pixels(params.serif_thickness),
            serif_min_weight: scale.to_pixels_area(params.serif_min_weight),
            serif_min_slope: params.serif_min_slope,
            aligned_boost_ratio: params.aligned_boost_ratio,
            unaligned_penalty_ratio: params.unaligned_penalty_ratio,
            delete_unaligned: params.delete_unaligned,
            em_max_iters: params.em_max_iters,
        }
    }
}
