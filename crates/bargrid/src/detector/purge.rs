//! Conflict resolution: deduplication of relations, and removal of peaks
//! that turn out not to be bar lines (long stems, C-clef strokes, isolated
//! peaks in multi-staff systems).

use std::collections::{HashMap, HashSet};

use log::debug;

use super::state::{Ctx, State};
use crate::peak::PeakId;
use crate::side::VerticalSide;
use crate::tags::Tag;

/// Purge the connection set of per-side duplicates, keeping the higher
/// combined quality.
pub(crate) fn purge_connections(state: &mut State) {
    for side in VerticalSide::BOTH {
        let mut best: HashMap<PeakId, usize> = HashMap::new();
        let mut losers: HashSet<usize> = HashSet::new();

        for (i, connection) in state.connections.iter().enumerate() {
            let peak = connection.peak(side);
            match best.get(&peak) {
                Some(&j) => {
                    if state.connections[j].grade() >= connection.grade() {
                        losers.insert(i);
                    } else {
                        losers.insert(j);
                        best.insert(peak, i);
                    }
                }
                None => {
                    best.insert(peak, i);
                }
            }
        }

        if !losers.is_empty() {
            debug!("purging {} duplicate connections", losers.len());
            let mut i = 0;
            state.connections.retain(|_| {
                let keep = !losers.contains(&i);
                i += 1;
                keep
            });
        }
    }
}

/// Purge the alignment set.
///
/// Connections dominate: any alignment whose peak+side matches a confirmed
/// connection goes away. Then per-side duplicates are resolved by smaller
/// absolute deviation.
pub(crate) fn purge_alignments(state: &mut State) {
    let connected_tops: HashSet<PeakId> = state.connections.iter().map(|c| c.top).collect();
    let connected_bottoms: HashSet<PeakId> = state.connections.iter().map(|c| c.bottom).collect();

    state
        .alignments
        .retain(|a| !connected_tops.contains(&a.top) && !connected_bottoms.contains(&a.bottom));

    for side in VerticalSide::BOTH {
        let mut best: HashMap<PeakId, usize> = HashMap::new();
        let mut losers: HashSet<usize> = HashSet::new();

        for (i, alignment) in state.alignments.iter().enumerate() {
            let peak = alignment.peak(side);
            match best.get(&peak) {
                Some(&j) => {
                    if state.alignments[j].dx.abs() <= alignment.dx.abs() {
                        losers.insert(i);
                    } else {
                        losers.insert(j);
                        best.insert(peak, i);
                    }
                }
                None => {
                    best.insert(peak, i);
                }
            }
        }

        if !losers.is_empty() {
            debug!("purging {} duplicate alignments", losers.len());
            let mut i = 0;
            state.alignments.retain(|_| {
                let keep = !losers.contains(&i);
                i += 1;
                keep
            });
        }
    }
}

/// Detect long bars: non-bracket peaks whose glyph gets clearly above or
/// below the staff. A bar just after a bracket end is exempt, since the
/// serif growth makes it extend slightly.
pub(crate) fn detect_long_peaks(state: &mut State, ctx: &Ctx<'_>) {
    let half_line = ctx.scale.max_fore as f64 / 2.0;
    let mut flagged: Vec<(PeakId, VerticalSide)> = Vec::new();

    for staff in &state.staves {
        for (index, &id) in staff.peaks.iter().enumerate() {
            let peak = state.peak(id);
            if peak.is_bracket() {
                continue;
            }

            for side in VerticalSide::BOTH {
                let ext = peak.extension(side, half_line);
                if ext > ctx.params.max_bar_extension
                    && !is_just_after_bracket(state, &staff.peaks, index, side, ctx)
                {
                    flagged.push((id, side));
                }
            }
        }
    }

    for (id, side) in flagged {
        state.peak_mut(id).set(Tag::beyond(side));
    }
}

/// Whether the peak at `index` immediately trails a bracket end on the
/// given side (within double-bar distance).
fn is_just_after_bracket(
    state: &State,
    peaks: &[PeakId],
    index: usize,
    side: VerticalSide,
    ctx: &Ctx<'_>,
) -> bool {
    if index == 0 {
        return false;
    }

    let prev = state.peak(peaks[index - 1]);
    if !prev.is_bracket_end(side) {
        return false;
    }

    let peak = state.peak(peaks[index]);
    peak.start - prev.stop - 1 <= ctx.params.max_double_bar_gap
}

/// Purge long peaks that do not connect staves, cascading to any relation
/// that referenced them.
///
/// The check is relaxed for a peak aligned with exactly one partner that
/// exhibits no length problem itself.
pub(crate) fn purge_long_peaks(state: &mut State) {
    let mut removed = HashSet::new();

    for staff in &state.staves {
        'peaks: for &id in &staff.peaks {
            let peak = state.peak(id);

            for side in VerticalSide::BOTH {
                if peak.is_beyond(side) && !state.is_connected(id, side) {
                    let partners = state.aligned_peaks(id, side);
                    if let [partner] = partners[..] {
                        if !state.peak(partner).is_beyond_any() {
                            // Single clean partner: consider this bar safe.
                            continue 'peaks;
                        }
                    }

                    debug!(
                        "staff#{} removing long peak [{}..{}]",
                        staff.id, peak.start, peak.stop
                    );
                    removed.insert(id);
                }
            }
        }
    }

    state.remove_peaks(&removed);
}

/// Remove alignments between peaks of different systems; once membership is
/// known they carry no information.
pub(crate) fn purge_cross_alignments(state: &mut State) {
    let before = state.alignments.len();
    let staff_system = &state.staff_system;
    let peaks = &state.peaks;
    state.alignments.retain(|a| {
        staff_system[peaks.get(a.top).staff] == staff_system[peaks.get(a.bottom).staff]
    });

    let dropped = before - state.alignments.len();
    if dropped > 0 {
        debug!("purged {dropped} cross-system alignments");
    }
}

/// Purge C-clef strokes mistaken for bar lines.
///
/// A C-clef shows up as a rather thick peak followed closely by a rather
/// thin one, neither confirmed by a connection, at a plausible distance
/// inside the measure. Spurious peaks within the clef tail are suppressed
/// along with the pair.
pub(crate) fn purge_cclefs(state: &mut State, ctx: &Ctx<'_>) {
    let mut removed = HashSet::new();
    let mut tagged: Vec<(PeakId, Tag)> = Vec::new();

    for staff_index in 0..state.staves.len() {
        let staff_start = state.staves[staff_index].left;
        let peaks = state.staves[staff_index].peaks.clone();
        let mut measure_start = staff_start;

        let mut i = 0;
        while i < peaks.len() {
            let id = peaks[i];
            let peak = state.peak(id).clone();

            if peak.start <= measure_start {
                i += 1;
                continue;
            }

            let looks_like_peak1 = !peak.is_set(Tag::StaffEnd)
                && !peak.is_bracket()
                && peak.width() >= ctx.params.min_cclef_peak1_width;

            if looks_like_peak1 {
                let gap = peak.start - measure_start;
                // The gap test only applies after the first measure; the
                // staff-end exclusion already guards the staff start.
                let min_gap = if measure_start == staff_start {
                    0
                } else {
                    ctx.params.max_double_bar_gap
                };

                if gap > min_gap
                    && gap < ctx.params.min_measure_width
                    && !state.is_connected(id, VerticalSide::Top)
                    && !state.is_connected(id, VerticalSide::Bottom)
                {
                    debug!("staff#{} C-clef peak1 at {}", staff_index + 1, peak.start);
                    tagged.push((id, Tag::CClefOne));
                    removed.insert(id);

                    if i + 1 < peaks.len() {
                        let id2 = peaks[i + 1];
                        let peak2 = state.peak(id2).clone();
                        let gap2 = peak2.start - peak.stop - 1;

                        if peak2.width() <= ctx.params.max_cclef_peak2_width
                            && gap2 <= ctx.params.max_double_bar_gap
                            && !state.is_connected(id2, VerticalSide::Top)
                            && !state.is_connected(id2, VerticalSide::Bottom)
                        {
                            debug!(
                                "staff#{} C-clef peak2 at {}",
                                staff_index + 1,
                                peak2.start
                            );
                            tagged.push((id2, Tag::CClefTwo));
                            removed.insert(id2);
                            i += 1;

                            // Suppress false peaks until past the clef tail.
                            let x_break = peak2.mid() + ctx.params.cclef_tail;
                            while i + 1 < peaks.len() {
                                let tail_id = peaks[i + 1];
                                let tail = state.peak(tail_id);
                                if tail.mid() < x_break {
                                    debug!(
                                        "staff#{} C-clef tail peak at {}",
                                        staff_index + 1,
                                        tail.start
                                    );
                                    tagged.push((tail_id, Tag::CClefTail));
                                    removed.insert(tail_id);
                                    i += 1;
                                } else {
                                    break;
                                }
                            }
                        }
                    }
                } else {
                    measure_start = peak.stop + 1;
                }
            } else {
                measure_start = peak.stop + 1;
            }

            i += 1;
        }
    }

    for (id, tag) in tagged {
        state.peak_mut(id).set(tag);
    }
    state.remove_peaks(&removed);
}

/// In multi-staff systems, tag every peak as aligned or unaligned with its
/// neighbor staves, and apply the configured policy to the isolated ones
/// (hard delete, or keep for a later confidence penalty).
pub(crate) fn check_unaligned_peaks(state: &mut State, ctx: &Ctx<'_>) {
    let mut aligned: Vec<PeakId> = Vec::new();
    let mut unaligned: Vec<PeakId> = Vec::new();

    for system in &state.systems {
        if system.staves.len() < 2 {
            continue;
        }

        for &staff_index in &system.staves {
            for &id in &state.staves[staff_index].peaks {
                if state.is_aligned(id) {
                    aligned.push(id);
                } else {
                    unaligned.push(id);
                }
            }
        }
    }

    for &id in &aligned {
        state.peak_mut(id).set(Tag::Aligned);
    }
    for &id in &unaligned {
        state.peak_mut(id).set(Tag::Unaligned);
    }

    if ctx.params.delete_unaligned && !unaligned.is_empty() {
        debug!("removing {} isolated peaks", unaligned.len());
        state.remove_peaks(&unaligned.into_iter().collect());
    }
}
