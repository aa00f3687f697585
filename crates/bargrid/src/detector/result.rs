use crate::peak::BarPeak;
use crate::sig::{InterId, System};

/// Final state of one staff after retrieval.
#[derive(Clone, Debug)]
pub struct StaffResult {
    /// Refined left abscissa of the staff.
    pub left: i32,
    /// Refined right abscissa of the staff.
    pub right: i32,
    /// Surviving peaks with their accumulated tags, ascending abscissa.
    pub peaks: Vec<BarPeak>,
    /// Bar-line interpretations of this staff, ascending abscissa.
    pub bars: Vec<InterId>,
    /// Left/right side bar, when the staff end falls within the outermost
    /// bar line.
    pub side_bars: [Option<InterId>; 2],
}

/// Output of a retrieval run: systems with their interpretation graphs,
/// plus per-staff records. Replaces any previous grouping wholesale.
#[derive(Clone, Debug)]
pub struct BarGridResult {
    pub systems: Vec<System>,
    /// One entry per input staff, sheet order.
    pub staves: Vec<StaffResult>,
}
