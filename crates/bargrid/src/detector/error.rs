/// Fatal-for-sheet errors raised by the grid detector.
///
/// Local ambiguities (missing serif, unconvincing connection evidence,
/// unseparated width clusters) never surface here; they resolve to
/// documented fallbacks.
#[derive(thiserror::Error, Debug)]
pub enum GridBuildError {
    #[error("sheet contains no staves")]
    NoStaves,
    #[error("no usable bar peak on any staff")]
    NoPeaks,
    #[error("staff #{staff}: peaks out of order or overlapping")]
    MalformedStaff { staff: usize },
}
