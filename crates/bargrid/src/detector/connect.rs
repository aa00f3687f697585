//! Pixel-backed validation of alignments into physical connections.

use bargrid_core::{vertical_core, CoreData};
use log::debug;
use nalgebra::Point2;

use super::state::{Ctx, State};
use crate::relation::{BarAlignment, BarConnection, ConnectionImpacts};

/// Check every alignment for concrete foreground pixels between the staves;
/// promote the convincing ones to connections and drop them from the
/// alignment set.
pub(crate) fn find_connections(state: &mut State, ctx: &Ctx<'_>) {
    let alignments = std::mem::take(&mut state.alignments);
    for alignment in alignments {
        match check_connection(state, ctx, &alignment) {
            Some(connection) => state.connections.push(connection),
            None => state.alignments.push(alignment),
        }
    }
}

/// Validate one alignment against the binary image.
///
/// Two theoretical boundary lines join the bottom corners of the upper peak
/// to the top corners of the lower peak; the area in between must be
/// sufficiently black, both in longest vertical gap and in white-row ratio.
fn check_connection(
    state: &State,
    ctx: &Ctx<'_>,
    alignment: &BarAlignment,
) -> Option<BarConnection> {
    let p1 = state.peak(alignment.top);
    let p2 = state.peak(alignment.bottom);

    let left = (
        Point2::new(p1.start as f64, p1.bottom as f64),
        Point2::new(p2.start as f64, p2.top as f64),
    );
    let right = (
        Point2::new(p1.stop as f64, p1.bottom as f64),
        Point2::new(p2.stop as f64, p2.top as f64),
    );

    let CoreData { gap, white_ratio } = vertical_core(&ctx.image, left, right);
    debug!(
        "connection check staff#{}->#{} dx {:.2} gap {} white {:.2}",
        p1.staff + 1,
        p2.staff + 1,
        alignment.dx,
        gap,
        white_ratio
    );

    if gap <= ctx.params.max_connection_gap
        && white_ratio <= ctx.params.max_connection_white_ratio
    {
        let impacts = ConnectionImpacts {
            align: alignment.grade,
            white: 1.0 - white_ratio / ctx.params.max_connection_white_ratio,
            gap: 1.0 - gap as f64 / ctx.params.max_connection_gap as f64,
        };
        Some(BarConnection {
            top: alignment.top,
            bottom: alignment.bottom,
            dx: alignment.dx,
            impacts,
        })
    } else {
        None
    }
}
