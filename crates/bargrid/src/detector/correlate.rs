//! Cross-staff peak correlation: build alignment candidates from deskewed
//! abscissae.

use nalgebra::Point2;

use super::state::{Ctx, State};
use crate::peak::PeakId;
use crate::relation::BarAlignment;
use crate::side::VerticalSide;

/// Find all bar (or bracket) alignments across staves.
///
/// Each staff looks at its vertical neighbors of compatible shortness class
/// on both sides; every peak within the alignment tolerance of a neighbor
/// peak yields a candidate. Duplicates per peak are expected here and
/// resolved later.
pub(crate) fn find_alignments(state: &mut State, ctx: &Ctx<'_>) {
    for staff in 0..state.staves.len() {
        for side in VerticalSide::BOTH {
            let Some(other) = state.neighbor(staff, side) else {
                continue;
            };

            let ids: Vec<PeakId> = state.staves[staff].peaks.clone();
            for id in ids {
                lookup_peaks(state, ctx, id, side, other);
            }
        }
    }
}

/// Look in `other` staff for peaks aligned with `peak`, deskewed.
fn lookup_peaks(state: &mut State, ctx: &Ctx<'_>, id: PeakId, side: VerticalSide, other: usize) {
    let peak = state.peak(id);
    let dsk = deskewed_x(ctx, peak.mid(), peak.ordinate(side));

    let candidates: Vec<PeakId> = state.staves[other].peaks.clone();
    for other_id in candidates {
        let other_peak = state.peak(other_id);
        // The opposing corner: its bottom when looking up, its top when
        // looking down.
        let other_y = other_peak.ordinate(side.opposite());
        let other_dsk = deskewed_x(ctx, other_peak.mid(), other_y);
        let dx = ctx.scale.pixels_to_frac(other_dsk - dsk);

        if dx.abs() <= ctx.params.max_alignment_dx {
            let grade = 1.0 - dx.abs() / ctx.params.max_alignment_dx;
            let alignment = match side {
                VerticalSide::Top => BarAlignment {
                    top: other_id,
                    bottom: id,
                    dx: -dx,
                    grade,
                },
                VerticalSide::Bottom => BarAlignment {
                    top: id,
                    bottom: other_id,
                    dx,
                    grade,
                },
            };

            // Each pair is discovered from both staves; keep one record.
            let duplicate = state
                .alignments
                .iter()
                .any(|a| a.top == alignment.top && a.bottom == alignment.bottom);
            if !duplicate {
                state.alignments.push(alignment);
            }
        }
    }
}

fn deskewed_x(ctx: &Ctx<'_>, x: i32, y: i32) -> f64 {
    ctx.skew.deskewed(Point2::new(x as f64, y as f64)).x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::detector::testutil::{add_peak, state_with_staves, Fixture};

    #[test]
    fn facing_peaks_align_once() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(2);

        let top = add_peak(&mut state, 0, 500, 502);
        let bottom = add_peak(&mut state, 1, 500, 502);

        find_alignments(&mut state, &ctx);

        // Discovered from both staves but recorded once.
        assert_eq!(state.alignments.len(), 1);
        let al = &state.alignments[0];
        assert_eq!(al.top, top);
        assert_eq!(al.bottom, bottom);
        assert_relative_eq!(al.dx, 0.0);
        assert_relative_eq!(al.grade, 1.0);
    }

    #[test]
    fn shifted_peaks_grade_by_deviation() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(2);

        add_peak(&mut state, 0, 500, 502);
        // 5 px shift: a quarter interline, half the tolerance.
        add_peak(&mut state, 1, 505, 507);

        find_alignments(&mut state, &ctx);

        assert_eq!(state.alignments.len(), 1);
        assert_relative_eq!(state.alignments[0].dx, 0.25);
        assert_relative_eq!(state.alignments[0].grade, 0.5);
    }

    #[test]
    fn distant_peaks_do_not_align() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(2);

        add_peak(&mut state, 0, 500, 502);
        // 15 px shift is past the half-interline tolerance.
        add_peak(&mut state, 1, 515, 517);

        find_alignments(&mut state, &ctx);
        assert!(state.alignments.is_empty());
    }

    #[test]
    fn short_staves_do_not_pair_with_regular_ones() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(2);
        state.staves[1].short = true;

        add_peak(&mut state, 0, 500, 502);
        add_peak(&mut state, 1, 500, 502);

        find_alignments(&mut state, &ctx);
        assert!(state.alignments.is_empty());
    }
}
