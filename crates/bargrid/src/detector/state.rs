use std::collections::HashSet;

use bargrid_core::{BinaryView, Scale, Skew};

use super::params::Resolved;
use crate::peak::{BarPeak, PeakArena, PeakId};
use crate::relation::{BarAlignment, BarConnection};
use crate::sig::System;
use crate::staff::Staff;
use crate::side::VerticalSide;

/// Read-only context shared by all passes of a run.
pub(crate) struct Ctx<'a> {
    pub scale: Scale,
    pub skew: Skew,
    pub params: &'a Resolved,
    pub image: BinaryView<'a>,
}

/// Mutable state of one retrieval run.
///
/// All passes operate on this value sequentially; relations reference peaks
/// through ids into the arena, and peak deletion is a two-phase
/// mark-and-sweep so the surviving relation sets never depend on processing
/// order within a pass.
#[derive(Default)]
pub(crate) struct State {
    pub staves: Vec<Staff>,
    pub peaks: PeakArena,
    pub alignments: Vec<BarAlignment>,
    pub connections: Vec<BarConnection>,
    /// Built by the grid builder; empty before then.
    pub systems: Vec<System>,
    /// Staff index -> system index, parallel to `staves`.
    pub staff_system: Vec<usize>,
}

impl State {
    #[inline]
    pub fn peak(&self, id: PeakId) -> &BarPeak {
        self.peaks.get(id)
    }

    #[inline]
    pub fn peak_mut(&mut self, id: PeakId) -> &mut BarPeak {
        self.peaks.get_mut(id)
    }

    /// Vertically adjacent staff on the given side, when shortness classes
    /// are compatible.
    pub fn neighbor(&self, staff: usize, side: VerticalSide) -> Option<usize> {
        let other = match side {
            VerticalSide::Top => staff.checked_sub(1)?,
            VerticalSide::Bottom => {
                if staff + 1 < self.staves.len() {
                    staff + 1
                } else {
                    return None;
                }
            }
        };

        if self.staves[other].short != self.staves[staff].short {
            return None;
        }
        Some(other)
    }

    /// Alignments in which `peak` occupies the given side slot.
    pub fn alignments_of(
        &self,
        peak: PeakId,
        side: VerticalSide,
    ) -> impl Iterator<Item = &BarAlignment> {
        self.alignments.iter().filter(move |a| a.peak(side) == peak)
    }

    /// Peaks aligned with `peak`, looking on the given vertical side.
    pub fn aligned_peaks(&self, peak: PeakId, side: VerticalSide) -> Vec<PeakId> {
        self.alignments_of(peak, side.opposite())
            .map(|a| a.peak(side))
            .collect()
    }

    /// Whether `peak` occupies any slot of any alignment or connection.
    pub fn is_aligned(&self, peak: PeakId) -> bool {
        for side in VerticalSide::BOTH {
            if self.alignments_of(peak, side).next().is_some() {
                return true;
            }
            if self.connections.iter().any(|c| c.peak(side) == peak) {
                return true;
            }
        }
        false
    }

    /// Whether a confirmed connection leaves `peak` on the given side.
    pub fn is_connected(&self, peak: PeakId, side: VerticalSide) -> bool {
        let opposite = side.opposite();
        self.connections.iter().any(|c| c.peak(opposite) == peak)
    }

    /// Remove the peaks from their staff, then sweep both relation sets.
    ///
    /// The sweep is a pure function of the removal set: any relation that
    /// references a removed peak on either side goes away, regardless of
    /// the order peaks were collected in.
    pub fn remove_peaks(&mut self, removed: &HashSet<PeakId>) {
        if removed.is_empty() {
            return;
        }

        for staff in &mut self.staves {
            staff.peaks.retain(|id| !removed.contains(id));
        }
        self.alignments
            .retain(|a| !removed.contains(&a.top) && !removed.contains(&a.bottom));
        self.connections
            .retain(|c| !removed.contains(&c.top) && !removed.contains(&c.bottom));
    }
}
