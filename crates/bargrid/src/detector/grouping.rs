//! System and part grouping derived from the confirmed connection set.

use log::{debug, info};

use super::state::{Ctx, State};
use crate::sig::{Part, Sig, System};

/// Per-staff grouping labels: for each staff, the 1-based id of the staff
/// that starts its enclosing system/part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GroupingTables {
    pub system_tops: Vec<usize>,
    pub part_tops: Vec<usize>,
}

/// Gather staves into systems and parts and materialize the containers.
///
/// The previous grouping, if any, is replaced wholesale.
pub(crate) fn create_systems_and_parts(state: &mut State, ctx: &Ctx<'_>) {
    sort_connections(state);
    let tables = gather_staves(state, ctx);
    create_systems(state, &tables.system_tops);
    create_parts(state, &tables.part_tops);
}

/// Put connections in canonical order: grouped by upper staff, then by
/// abscissa.
pub(crate) fn sort_connections(state: &mut State) {
    let peaks = &state.peaks;
    state
        .connections
        .sort_by_key(|c| (peaks.get(c.top).staff, peaks.get(c.top).start));
}

/// Use connections across staves to derive grouping labels.
///
/// A first connection between two staves makes them system partners. A
/// second connection between the same pair marks a part boundary at the
/// lower staff, provided it is sufficiently abscissa-shifted from the
/// preceding connection — a thin+thick double bar is one boundary, not two.
pub(crate) fn gather_staves(state: &State, ctx: &Ctx<'_>) -> GroupingTables {
    let count = state.staves.len();
    let mut system_tops: Vec<Option<usize>> = vec![None; count];
    let mut part_break = vec![false; count];

    let mut prev_top_stop: Option<i32> = None;

    for connection in &state.connections {
        let top_peak = state.peak(connection.top);
        let bottom_peak = state.peak(connection.bottom);
        let top = top_peak.staff + 1;
        let bottom = bottom_peak.staff + 1;

        if system_tops[top - 1].is_none() {
            // First connection ever involving this staff as the top one.
            system_tops[top - 1] = Some(top);
        } else {
            // A repeat: part boundary only if clearly shifted from the
            // previous connection.
            let gap = top_peak.start - prev_top_stop.unwrap_or(top_peak.start) - 1;

            if gap > ctx.params.max_double_bar_gap {
                part_break[bottom - 1] = true;
            }
        }

        system_tops[bottom - 1] = system_tops[top - 1];
        prev_top_stop = Some(top_peak.stop);
    }

    // Unconnected staves remain singleton systems.
    let system_tops: Vec<usize> = system_tops
        .into_iter()
        .enumerate()
        .map(|(i, top)| top.unwrap_or(i + 1))
        .collect();

    // Parts run from one boundary (or the system start) to the next.
    let mut part_tops = vec![0usize; count];
    for i in 0..count {
        part_tops[i] = if i == 0 || part_break[i] || system_tops[i] != system_tops[i - 1] {
            i + 1
        } else {
            part_tops[i - 1]
        };
    }

    info!("systems: {system_tops:?}");
    info!("parts:   {part_tops:?}");

    GroupingTables {
        system_tops,
        part_tops,
    }
}

/// Materialize the systems from the labels, replacing any prior grouping.
fn create_systems(state: &mut State, system_tops: &[usize]) {
    state.systems.clear();
    state.staff_system = vec![0; state.staves.len()];

    let mut current_top: Option<usize> = None;

    for (i, &top) in system_tops.iter().enumerate() {
        if current_top.is_none_or(|t| t < top) {
            current_top = Some(top);
            state.systems.push(System {
                id: state.systems.len() + 1,
                staves: vec![i],
                parts: Vec::new(),
                sig: Sig::default(),
            });
        } else {
            state.systems.last_mut().unwrap().staves.push(i);
        }
        state.staff_system[i] = state.systems.len() - 1;
    }
}

/// Materialize the parts within each system.
fn create_parts(state: &mut State, part_tops: &[usize]) {
    for system in &mut state.systems {
        system.parts.clear();

        let mut current_top: Option<usize> = None;
        for &staff_index in &system.staves {
            let top = part_tops[staff_index];
            if current_top != Some(top) {
                current_top = Some(top);
                system.parts.push(Part { staves: Vec::new() });
            }
            system.parts.last_mut().unwrap().staves.push(staff_index);
        }
    }
}

/// Refine staff side abscissae from the outermost surviving peaks.
///
/// When a staff's end falls inside its outermost peak, the side snaps to
/// the peak's outer edge; the projector's rough estimate is kept otherwise.
pub(crate) fn refine_sides(state: &mut State) {
    for staff_index in 0..state.staves.len() {
        let staff = &state.staves[staff_index];

        let left = staff
            .peaks
            .first()
            .map(|&id| state.peak(id))
            .filter(|p| p.start <= staff.left && staff.left <= p.stop)
            .map(|p| p.start);
        let right = staff
            .peaks
            .last()
            .map(|&id| state.peak(id))
            .filter(|p| p.start <= staff.right && staff.right <= p.stop)
            .map(|p| p.stop);

        let staff = &mut state.staves[staff_index];
        if let Some(x) = left {
            debug!("staff#{} left side refined to {x}", staff.id);
            staff.left = x;
        }
        if let Some(x) = right {
            debug!("staff#{} right side refined to {x}", staff.id);
            staff.right = x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::state::State;
    use crate::detector::testutil::{add_peak, state_with_staves, Fixture};
    use crate::relation::{BarConnection, ConnectionImpacts};

    fn connect(state: &mut State, top_staff: usize, bottom_staff: usize, x: i32) {
        let top = add_peak(state, top_staff, x, x + 2);
        let bottom = add_peak(state, bottom_staff, x, x + 2);
        state.connections.push(BarConnection {
            top,
            bottom,
            dx: 0.0,
            impacts: ConnectionImpacts {
                align: 1.0,
                white: 1.0,
                gap: 1.0,
            },
        });
    }

    #[test]
    fn connected_chain_forms_one_system_and_one_part() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(3);

        connect(&mut state, 0, 1, 100);
        // Within double-bar distance of the previous connection.
        connect(&mut state, 1, 2, 105);

        sort_connections(&mut state);
        let tables = gather_staves(&state, &ctx);

        assert_eq!(tables.system_tops, vec![1, 1, 1]);
        assert_eq!(tables.part_tops, vec![1, 1, 1]);
    }

    #[test]
    fn repeated_shifted_connection_breaks_the_part() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(3);

        connect(&mut state, 0, 1, 100);
        connect(&mut state, 1, 2, 105);
        // A clearly separate second connection between staves 2 and 3.
        connect(&mut state, 1, 2, 400);

        sort_connections(&mut state);
        let tables = gather_staves(&state, &ctx);

        assert_eq!(tables.system_tops, vec![1, 1, 1]);
        assert_eq!(tables.part_tops, vec![1, 1, 3]);
    }

    #[test]
    fn double_bar_is_one_boundary_not_two() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(2);

        connect(&mut state, 0, 1, 100);
        // Second connection within double-bar distance of the first.
        connect(&mut state, 0, 1, 107);

        sort_connections(&mut state);
        let tables = gather_staves(&state, &ctx);

        assert_eq!(tables.system_tops, vec![1, 1]);
        assert_eq!(tables.part_tops, vec![1, 1]);
    }

    #[test]
    fn unconnected_staves_stay_singletons() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(3);

        connect(&mut state, 0, 1, 100);

        sort_connections(&mut state);
        let tables = gather_staves(&state, &ctx);

        assert_eq!(tables.system_tops, vec![1, 1, 3]);
        assert_eq!(tables.part_tops, vec![1, 1, 3]);
    }

    #[test]
    fn systems_and_parts_are_materialized() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        let mut state = state_with_staves(4);

        connect(&mut state, 0, 1, 100);
        connect(&mut state, 1, 2, 100);
        connect(&mut state, 2, 3, 100);
        // Shifted repeats between staves 3 and 4.
        connect(&mut state, 2, 3, 400);

        create_systems_and_parts(&mut state, &ctx);

        assert_eq!(state.systems.len(), 1);
        assert_eq!(state.systems[0].staves, vec![0, 1, 2, 3]);
        assert_eq!(state.staff_system, vec![0, 0, 0, 0]);

        let parts: Vec<Vec<usize>> = state.systems[0]
            .parts
            .iter()
            .map(|p| p.staves.clone())
            .collect();
        assert_eq!(parts, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn refine_sides_snaps_to_outer_peaks() {
        let mut state = state_with_staves(1);
        // Leftmost peak straddles the rough left end, rightmost straddles
        // the right end.
        add_peak(&mut state, 0, 98, 103);
        add_peak(&mut state, 0, 500, 502);
        add_peak(&mut state, 0, 1099, 1104);

        refine_sides(&mut state);

        assert_eq!(state.staves[0].left, 98);
        assert_eq!(state.staves[0].right, 1104);
    }

    #[test]
    fn refine_sides_keeps_rough_estimate_otherwise() {
        let mut state = state_with_staves(1);
        add_peak(&mut state, 0, 150, 152);

        refine_sides(&mut state);

        assert_eq!(state.staves[0].left, 100);
        assert_eq!(state.staves[0].right, 1100);
    }
}
