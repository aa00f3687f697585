//! Core glyph construction for peaks, plus the brace purge that relies on
//! glyph curvature.

use std::collections::HashSet;

use bargrid_core::GlyphSource;
use log::debug;

use super::state::{Ctx, State};
use crate::peak::PeakId;
use crate::tags::Tag;

/// Build the underlying glyph of every peak.
///
/// The glyphs are needed to detect peaks which go past staff height (and may
/// rather be stems) and curly peaks due to brace portions. The lookup box is
/// enlarged horizontally by one interline and vertically by the bracket
/// lookup extension, so bracket ends keep their full extent.
pub(crate) fn build_bar_sticks(state: &mut State, ctx: &Ctx<'_>, glyphs: &dyn GlyphSource) {
    let ids: Vec<PeakId> = state
        .staves
        .iter()
        .flat_map(|staff| staff.peaks.iter().copied())
        .collect();

    for id in ids {
        let peak = state.peak(id);
        let lookup = peak
            .bounds()
            .grown(ctx.scale.interline as i32, ctx.params.bracket_lookup_extension);
        let max_width = peak.width();
        let glyph = glyphs.bar_glyph(lookup, max_width);
        debug!(
            "staff#{} peak [{}..{}] glyph weight {}",
            peak.staff + 1,
            peak.start,
            peak.stop,
            glyph.weight
        );
        state.peak_mut(id).glyph = Some(glyph);
    }
}

/// Purge brace portions mistaken for bar-line peaks.
///
/// Brace portions are characterized by a short mean curvature radius, while
/// genuine bar lines are nearly straight.
pub(crate) fn purge_brace_peaks(state: &mut State, ctx: &Ctx<'_>) {
    let mut removed = HashSet::new();

    for staff in &state.staves {
        for &id in &staff.peaks {
            let peak = state.peak(id);
            let curvature = peak
                .glyph
                .as_ref()
                .map(|g| g.mean_curvature)
                .unwrap_or(f64::INFINITY);

            if curvature < ctx.params.min_bar_curvature {
                debug!(
                    "staff#{} removing curved peak [{}..{}] curvature {:.1}",
                    staff.id, peak.start, peak.stop, curvature
                );
                removed.insert(id);
            }
        }
    }

    for &id in &removed {
        state.peak_mut(id).set(Tag::Brace);
    }
    state.remove_peaks(&removed);
}
