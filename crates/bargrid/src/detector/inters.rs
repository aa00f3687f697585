//! Emission of scored interpretations and relations into the per-system
//! graphs.

use bargrid_core::Rect;

use super::brackets::bracket_kind;
use super::state::{Ctx, State};
use crate::side::HorizontalSide;
use crate::sig::{BarShape, Inter, InterId, InterKind, RelationKind};
use crate::tags::Tag;

/// Turn every retained peak into a scored interpretation in its system
/// graph. Aligned bar lines get a confidence boost, unaligned ones (when
/// kept by policy) a penalty; brackets are left untouched.
pub(crate) fn create_inters(state: &mut State, ctx: &Ctx<'_>) {
    for s in 0..state.systems.len() {
        let staves = state.systems[s].staves.clone();

        for staff_index in staves {
            let ids = state.staves[staff_index].peaks.clone();

            for id in ids {
                let kind = match bracket_kind(state, id) {
                    Some(bk) => InterKind::Bracket(bk),
                    None => {
                        let peak = state.peak(id);
                        let shape = if peak.is_set(Tag::Thick) {
                            BarShape::Thick
                        } else {
                            BarShape::Thin
                        };
                        InterKind::Barline(shape)
                    }
                };

                let peak = state.peak(id);
                let mut inter = Inter {
                    kind,
                    grade: peak.grade,
                    bounds: peak.bounds(),
                    staff: Some(staff_index),
                };

                if let InterKind::Barline(_) = inter.kind {
                    if peak.is_set(Tag::Aligned) {
                        inter.increase(ctx.params.aligned_boost_ratio);
                    }
                    if peak.is_set(Tag::Unaligned) {
                        inter.decrease(ctx.params.unaligned_penalty_ratio);
                    }
                }

                let index = state.systems[s].sig.add_inter(inter);
                state.peak_mut(id).inter = Some(InterId { system: s, index });
            }
        }
    }
}

/// Add a connector interpretation for every confirmed connection, plus a
/// support relation between the two interpretations it joins.
pub(crate) fn create_connection_inters(state: &mut State) {
    let connections = state.connections.clone();

    for connection in connections {
        let top = state.peak(connection.top).clone();
        let bottom = state.peak(connection.bottom).clone();
        let system = state.staff_system[top.staff];

        let kind = if top.is_bracket() {
            InterKind::BracketConnector
        } else if top.is_set(Tag::Thick) {
            InterKind::BarConnector(BarShape::Thick)
        } else {
            InterKind::BarConnector(BarShape::Thin)
        };

        // The inter-staff area spanned by the connection.
        let x = top.start.min(bottom.start);
        let right = top.stop.max(bottom.stop) + 1;
        let bounds = Rect::new(x, top.bottom, right - x, bottom.top - top.bottom + 1);

        let sig = &mut state.systems[system].sig;
        sig.add_inter(Inter {
            kind,
            grade: connection.grade(),
            bounds,
            staff: None,
        });

        if let (Some(top_inter), Some(bottom_inter)) = (top.inter, bottom.inter) {
            sig.add_relation(
                top_inter.index,
                bottom_inter.index,
                RelationKind::ConnectionSupport,
            );
        }
    }
}

/// Link bar lines within double-bar distance of each other on the same
/// staff as a detected group.
pub(crate) fn group_barlines(state: &mut State, ctx: &Ctx<'_>) {
    for system in 0..state.systems.len() {
        let staves = state.systems[system].staves.clone();

        for staff_index in staves {
            let ids = state.staves[staff_index].peaks.clone();

            for pair in ids.windows(2) {
                let prev = state.peak(pair[0]).clone();
                let next = state.peak(pair[1]).clone();
                let gap = next.start - prev.stop - 1;

                if gap <= ctx.params.max_double_bar_gap {
                    if let (Some(a), Some(b)) = (prev.inter, next.inter) {
                        state.systems[system].sig.add_relation(
                            a.index,
                            b.index,
                            RelationKind::BarGroup {
                                gap: ctx.scale.pixels_to_frac(gap as f64),
                            },
                        );
                    }
                }
            }
        }
    }
}

/// Final per-staff bar list, plus the side bars when the staff ends fall
/// within the outermost bar.
pub(crate) fn record_bars(state: &State, staff_index: usize) -> (Vec<InterId>, [Option<InterId>; 2]) {
    let staff = &state.staves[staff_index];

    let bars: Vec<InterId> = staff
        .peaks
        .iter()
        .filter_map(|&id| {
            let peak = state.peak(id);
            let inter = peak.inter?;
            let system = &state.systems[inter.system];
            match system.sig.inters[inter.index].kind {
                InterKind::Barline(_) => Some(inter),
                _ => None,
            }
        })
        .collect();

    let mut side_bars = [None, None];
    if !bars.is_empty() {
        for (slot, side) in HorizontalSide::BOTH.into_iter().enumerate() {
            let inter_id = match side {
                HorizontalSide::Left => bars[0],
                HorizontalSide::Right => bars[bars.len() - 1],
            };
            let bounds = state.systems[inter_id.system].sig.inters[inter_id.index].bounds;
            let end = staff.abscissa(side);
            if end >= bounds.x && end <= bounds.right() - 1 {
                side_bars[slot] = Some(inter_id);
            }
        }
    }

    (bars, side_bars)
}
