use serde::{Deserialize, Serialize};

use crate::peak::PeakId;
use crate::side::HorizontalSide;

/// A bar-peak candidate produced by the external per-staff projector.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawPeak {
    /// First abscissa of the peak.
    pub start: i32,
    /// Last abscissa of the peak.
    pub stop: i32,
    /// Ordinate of the staff top line at the peak.
    pub top: i32,
    /// Ordinate of the staff bottom line at the peak.
    pub bottom: i32,
    /// Projector quality in [0, 1].
    pub grade: f64,
    /// Set when the projector recognized this peak as defining a staff end.
    pub staff_end: Option<HorizontalSide>,
}

/// Geometry and raw peaks of one staff, as supplied by the staff directory.
///
/// Peaks must be ordered by ascending `start` and must not overlap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaffSpec {
    /// Left abscissa extent of the staff lines.
    pub left: i32,
    /// Right abscissa extent of the staff lines.
    pub right: i32,
    /// Ordinate of the first staff line.
    pub top: i32,
    /// Ordinate of the last staff line.
    pub bottom: i32,
    /// Short staves (e.g. cue staves) must not correlate with regular ones.
    pub short: bool,
    /// Abscissa-ordered bar peak candidates.
    pub peaks: Vec<RawPeak>,
}

/// Working staff state during a retrieval run.
#[derive(Clone, Debug)]
pub(crate) struct Staff {
    /// 1-based id, following sheet order from top to bottom.
    pub id: usize,
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
    pub short: bool,
    /// Surviving peaks, ascending start abscissa.
    pub peaks: Vec<PeakId>,
}

impl Staff {
    pub fn abscissa(&self, side: HorizontalSide) -> i32 {
        match side {
            HorizontalSide::Left => self.left,
            HorizontalSide::Right => self.right,
        }
    }
}
