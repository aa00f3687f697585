//! Bracket detection: serif-based end detection on the leftmost peak of a
//! staff, then middle propagation along confirmed connections.

use bargrid_core::{GlyphSource, Rect};
use log::debug;

use super::state::{Ctx, State};
use crate::peak::PeakId;
use crate::side::{HorizontalSide, VerticalSide};
use crate::sig::BracketKind;
use crate::tags::Tag;

/// Detect the peaks that are the top or bottom end of a bracket.
///
/// A bracket end is the first peak on staff left (braces are gone at this
/// point), rather thick, not extending too far beyond the staff, and shows
/// a serif-shaped pixel cluster just past its trailing edge.
pub(crate) fn detect_bracket_ends(state: &mut State, ctx: &Ctx<'_>, glyphs: &dyn GlyphSource) {
    let half_line = ctx.scale.max_fore as f64 / 2.0;
    let mut found: Vec<(PeakId, VerticalSide)> = Vec::new();

    for staff in &state.staves {
        let Some(&first) = staff.peaks.first() else {
            continue;
        };
        let peak = state.peak(first);
        let next_bounds = staff
            .peaks
            .get(1)
            .and_then(|&id| state.peak(id).glyph.as_ref())
            .map(|g| g.bounds);

        // The first peak must sit at the staff's left end.
        if peak.start > staff.abscissa(HorizontalSide::Left) {
            continue;
        }
        if peak.width() < ctx.params.min_bracket_width {
            continue;
        }

        for side in VerticalSide::BOTH {
            let ext = peak.extension(side, half_line);
            if ext <= ctx.params.max_bracket_extension
                && has_serif(state, ctx, glyphs, first, next_bounds, side)
            {
                debug!("staff#{} {:?} bracket end", staff.id, side);
                found.push((first, side));
            }
        }
    }

    for (id, side) in found {
        state.peak_mut(id).set(Tag::bracket_end(side));
    }
}

/// Check for a serif cluster just past the peak's trailing edge.
///
/// The lookup region sits beyond the glyph end on the chosen side; the
/// cluster must weigh enough and slope away from the bar axis in the
/// expected direction.
fn has_serif(
    state: &State,
    ctx: &Ctx<'_>,
    glyphs: &dyn GlyphSource,
    id: PeakId,
    next_bounds: Option<Rect>,
    side: VerticalSide,
) -> bool {
    let peak = state.peak(id);
    let Some(bar_glyph) = &peak.glyph else {
        return false;
    };

    let half_line = (ctx.scale.max_fore as f64 / 2.0).ceil() as i32;
    let gbox = bar_glyph.bounds;
    let y_box = match side {
        VerticalSide::Top => {
            (gbox.y + ctx.params.serif_thickness).min(peak.top - half_line)
                - ctx.params.serif_roi_height
        }
        VerticalSide::Bottom => {
            (gbox.bottom() - ctx.params.serif_thickness).max(peak.bottom + half_line)
        }
    };
    let roi = Rect::new(
        peak.stop + 1,
        y_box,
        ctx.params.serif_roi_width,
        ctx.params.serif_roi_height,
    );

    let mut exclude = vec![gbox];
    if let Some(next) = next_bounds {
        exclude.push(next);
    }

    let Some(serif) = glyphs.glyph_in(roi, &exclude) else {
        return false;
    };

    if serif.weight < ctx.params.serif_min_weight {
        debug!("serif weight too small {}", serif.weight);
        return false;
    }

    let dir = match side {
        VerticalSide::Top => -1.0,
        VerticalSide::Bottom => 1.0,
    };
    if serif.slope * dir < ctx.params.serif_min_slope {
        debug!("serif slope too small {}", serif.slope * dir);
        return false;
    }

    true
}

/// Flag the middle portions of brackets.
///
/// Any peak connected to a bracket portion is itself a bracket portion;
/// iterate to a fixpoint, bounded by the connection count (worst case one
/// propagation per edge).
pub(crate) fn detect_bracket_middles(state: &mut State) {
    for _ in 0..=state.connections.len() {
        let mut newly: Vec<PeakId> = Vec::new();

        for connection in &state.connections {
            let top = state.peak(connection.top);
            let bottom = state.peak(connection.bottom);

            if top.is_bracket() && !bottom.is_bracket() {
                newly.push(connection.bottom);
            } else if bottom.is_bracket() && !top.is_bracket() {
                newly.push(connection.top);
            }
        }

        if newly.is_empty() {
            break;
        }
        for id in newly {
            state.peak_mut(id).set(Tag::BracketMiddle);
        }
    }
}

/// Bracket portion kind of a peak, if it is a bracket at all.
pub(crate) fn bracket_kind(state: &State, id: PeakId) -> Option<BracketKind> {
    let peak = state.peak(id);

    if peak.is_set(Tag::BracketMiddle) {
        return Some(BracketKind::None);
    }

    match (
        peak.is_bracket_end(VerticalSide::Top),
        peak.is_bracket_end(VerticalSide::Bottom),
    ) {
        (true, true) => Some(BracketKind::Both),
        (true, false) => Some(BracketKind::Top),
        (false, true) => Some(BracketKind::Bottom),
        (false, false) => None,
    }
}
