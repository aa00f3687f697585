//! Unsupervised thin/thick width partition.

use std::collections::BTreeMap;

use bargrid_core::{fit_two_gaussians, Gaussian, WidthHistogram};
use log::{debug, info};

use super::state::{Ctx, State};
use crate::peak::PeakId;
use crate::tags::Tag;

/// Histogram of widths over all non-bracket peaks.
fn width_histogram(state: &State) -> WidthHistogram {
    let mut histo = WidthHistogram::new();
    for staff in &state.staves {
        for &id in &staff.peaks {
            let peak = state.peak(id);
            if !peak.is_bracket() {
                histo.increase(peak.width(), 1);
            }
        }
    }
    info!("peak width histogram {histo}");
    histo
}

/// Partition peak widths into thin and thick.
///
/// A two-component Gaussian mixture is fitted on the width histogram,
/// seeded with the typical thin/thick widths. When the fitted means are
/// not separated enough everything is thin; otherwise a crisp threshold is
/// taken at the midpoint between the widest thin and the narrowest thick
/// width, and applied to every peak.
pub(crate) fn partition_widths(state: &mut State, ctx: &Ctx<'_>) {
    let histo = width_histogram(state);
    let threshold = width_threshold(&histo, ctx);

    let mut thins: Vec<PeakId> = Vec::new();
    let mut thicks: Vec<PeakId> = Vec::new();

    for staff in &state.staves {
        for &id in &staff.peaks {
            let peak = state.peak(id);
            if peak.is_bracket() {
                continue;
            }
            match threshold {
                Some(t) if (peak.width() as f64) > t => thicks.push(id),
                _ => thins.push(id),
            }
        }
    }

    for id in thins {
        state.peak_mut(id).set(Tag::Thin);
    }
    for id in thicks {
        state.peak_mut(id).set(Tag::Thick);
    }
}

/// Derive the crisp thin/thick width threshold, or `None` when all peaks
/// are thin.
pub(crate) fn width_threshold(histo: &WidthHistogram, ctx: &Ctx<'_>) -> Option<f64> {
    if histo.total_count() < 2 {
        return None;
    }

    let seeds = [
        Gaussian::new(ctx.params.typical_thin_width, 1.0),
        Gaussian::new(ctx.params.typical_thick_width, 1.0),
    ];
    let fit = fit_two_gaussians(&histo.to_samples(), seeds, ctx.params.em_max_iters);
    let [thin, thick] = fit.components;

    let delta = thick.mean - thin.mean;
    let normed_delta = ctx.scale.pixels_to_frac(delta);
    debug!(
        "width means thin {:.3} thick {:.3} delta {:.3} ({:.3})",
        thin.mean, thick.mean, delta, normed_delta
    );

    if normed_delta < ctx.params.min_thin_thick_delta {
        info!("all thin peaks: {histo}");
        return None;
    }

    let mut thin_widths: BTreeMap<i32, usize> = BTreeMap::new();
    let mut thick_widths: BTreeMap<i32, usize> = BTreeMap::new();

    for (width, count) in histo.entries() {
        let w = width as f64;
        if w <= thin.mean {
            thin_widths.insert(width, count);
        } else if w >= thick.mean {
            thick_widths.insert(width, count);
        } else if thick.density(w) > thin.density(w) {
            thick_widths.insert(width, count);
        } else {
            thin_widths.insert(width, count);
        }
    }

    match (
        thin_widths.keys().next_back(),
        thick_widths.keys().next(),
    ) {
        (Some(&widest_thin), Some(&narrowest_thick)) => {
            debug!("thin widths {thin_widths:?} thick widths {thick_widths:?}");
            Some((widest_thin + narrowest_thick) as f64 / 2.0)
        }
        // All widths landed on the thick side: everything is thick.
        (None, Some(&narrowest_thick)) => Some(narrowest_thick as f64 - 0.5),
        _ => None,
    }
}
