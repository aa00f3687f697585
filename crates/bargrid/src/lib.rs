//! Bar-line and bracket grid retrieval built on top of `bargrid-core`.
//!
//! ## Quickstart
//!
//! ```
//! use bargrid::{BarGridDetector, GridParams};
//! use bargrid_core::{Scale, Skew};
//!
//! let scale = Scale::new(20, 3);
//! let detector = BarGridDetector::new(scale, Skew::identity(), GridParams::default());
//! println!("max alignment dx: {}", detector.params().max_alignment_dx);
//! ```
//!
//! Retrieval pipeline, per sheet:
//! 1. Build the core glyph behind each projector peak, drop braces.
//! 2. Correlate peaks across adjacent staves into alignments.
//! 3. Confirm alignments against the binary image as connections.
//! 4. Purge conflicting connections and alignments.
//! 5. Detect bracket ends by their serifs, propagate middle portions.
//! 6. Drop over-tall peaks that connect nothing.
//! 7. Group staves into systems and parts from the connections.
//! 8. Purge C-clef false positives, handle unaligned peaks per policy.
//! 9. Partition thin vs. thick widths with a two-Gaussian fit.
//! 10. Emit scored interpretations and relations per system.

mod detector;
mod peak;
mod relation;
mod side;
mod sig;
mod staff;
mod tags;

pub use detector::{BarGridDetector, BarGridResult, GridBuildError, GridParams, StaffResult};
pub use peak::{BarPeak, PeakId};
pub use side::{HorizontalSide, VerticalSide};
pub use sig::{
    BarShape, BracketKind, Inter, InterId, InterKind, Part, Relation, RelationKind, Sig, System,
};
pub use staff::{RawPeak, StaffSpec};
pub use tags::{Tag, TagSet};
