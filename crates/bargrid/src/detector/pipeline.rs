use bargrid_core::{BinaryView, GlyphSource, Scale, Skew};
use log::debug;

use super::error::GridBuildError;
use super::params::{GridParams, Resolved};
use super::result::{BarGridResult, StaffResult};
use super::state::{Ctx, State};
use super::{brackets, connect, correlate, grouping, inters, purge, sticks, widths};
use crate::peak::BarPeak;
use crate::staff::{Staff, StaffSpec};
use crate::tags::{Tag, TagSet};

/// Bar-line and bracket grid detector.
///
/// Takes the per-staff peak candidates produced by the projector, confirms
/// cross-staff connections against the binary image, resolves conflicts and
/// emits systems, parts and scored interpretations.
pub struct BarGridDetector {
    scale: Scale,
    skew: Skew,
    params: GridParams,
}

impl BarGridDetector {
    pub fn new(scale: Scale, skew: Skew, params: GridParams) -> Self {
        Self {
            scale,
            skew,
            params,
        }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &GridParams {
        &self.params
    }

    /// Run the full retrieval over one sheet.
    ///
    /// The passes form a fixed ordered pipeline; each transforms the
    /// in-memory peak/relation sets and the whole run is deterministic
    /// given the same inputs.
    pub fn detect(
        &self,
        staves: &[StaffSpec],
        image: &BinaryView<'_>,
        glyphs: &dyn GlyphSource,
    ) -> Result<BarGridResult, GridBuildError> {
        let mut state = build_state(staves)?;
        let resolved = Resolved::new(&self.params, &self.scale);
        let ctx = Ctx {
            scale: self.scale,
            skew: self.skew,
            params: &resolved,
            image: *image,
        };

        // Build core glyph for each peak.
        sticks::build_bar_sticks(&mut state, &ctx, glyphs);

        // Remove braces.
        sticks::purge_brace_peaks(&mut state, &ctx);

        // Find all bar (or bracket) alignments across staves.
        correlate::find_alignments(&mut state, &ctx);

        // Find all concrete connections across staves.
        connect::find_connections(&mut state, &ctx);

        // Purge conflicting connections, then incompatible alignments.
        purge::purge_connections(&mut state);
        purge::purge_alignments(&mut state);

        // Detect bracket ends, then middle portions.
        brackets::detect_bracket_ends(&mut state, &ctx, glyphs);
        brackets::detect_bracket_middles(&mut state);

        // Detect and purge long peaks that do not connect staves.
        purge::detect_long_peaks(&mut state, &ctx);
        purge::purge_long_peaks(&mut state);

        // Create systems and parts from bar connections.
        grouping::create_systems_and_parts(&mut state, &ctx);

        // Alignments across systems are not relevant.
        purge::purge_cross_alignments(&mut state);

        // Define precisely all staff side abscissae.
        grouping::refine_sides(&mut state);

        // Purge C-clef-based false bar lines.
        purge::purge_cclefs(&mut state, &ctx);

        // Boost the aligned peaks, weaken or delete the isolated ones.
        purge::check_unaligned_peaks(&mut state, &ctx);

        // Partition peaks between thin and thick.
        widths::partition_widths(&mut state, &ctx);

        // Emit interpretations and relations within each system.
        inters::create_inters(&mut state, &ctx);
        inters::create_connection_inters(&mut state);
        inters::group_barlines(&mut state, &ctx);

        // Record bars in each staff.
        let staves_out: Vec<StaffResult> = (0..state.staves.len())
            .map(|i| {
                let (bars, side_bars) = inters::record_bars(&state, i);
                let staff = &state.staves[i];
                StaffResult {
                    left: staff.left,
                    right: staff.right,
                    peaks: staff
                        .peaks
                        .iter()
                        .map(|&id| state.peak(id).clone())
                        .collect(),
                    bars,
                    side_bars,
                }
            })
            .collect();

        Ok(BarGridResult {
            systems: state.systems,
            staves: staves_out,
        })
    }
}

/// Validate the projector output and set up the working state.
fn build_state(staves: &[StaffSpec]) -> Result<State, GridBuildError> {
    if staves.is_empty() {
        return Err(GridBuildError::NoStaves);
    }

    let mut state = State::default();
    let mut total_peaks = 0usize;

    for (index, spec) in staves.iter().enumerate() {
        let mut staff = Staff {
            id: index + 1,
            left: spec.left,
            right: spec.right,
            top: spec.top,
            bottom: spec.bottom,
            short: spec.short,
            peaks: Vec::with_capacity(spec.peaks.len()),
        };

        let mut prev_stop: Option<i32> = None;
        for raw in &spec.peaks {
            if raw.stop < raw.start || prev_stop.is_some_and(|stop| raw.start <= stop) {
                return Err(GridBuildError::MalformedStaff { staff: index + 1 });
            }
            prev_stop = Some(raw.stop);

            let mut tags = TagSet::EMPTY;
            if raw.staff_end.is_some() {
                tags.set(Tag::StaffEnd);
            }

            let id = state.peaks.push(BarPeak {
                staff: index,
                start: raw.start,
                stop: raw.stop,
                top: raw.top,
                bottom: raw.bottom,
                grade: raw.grade.clamp(0.0, 1.0),
                glyph: None,
                tags,
                inter: None,
            });
            staff.peaks.push(id);
            total_peaks += 1;
        }

        debug!("staff#{} with {} raw peaks", staff.id, staff.peaks.len());
        state.staves.push(staff);
    }

    if total_peaks == 0 {
        return Err(GridBuildError::NoPeaks);
    }

    state.staff_system = vec![0; state.staves.len()];
    Ok(state)
}
