//! Bar grid retrieval pipeline.
//!
//! This module wires together peak correlation across staves, pixel-backed
//! connection validation, conflict resolution, bracket detection, width
//! classification and system/part grouping.

mod brackets;
mod connect;
mod correlate;
mod error;
mod grouping;
mod inters;
mod params;
mod pipeline;
mod purge;
mod result;
mod state;
mod sticks;
mod widths;

pub use error::GridBuildError;
pub use params::GridParams;
pub use pipeline::BarGridDetector;
pub use result::{BarGridResult, StaffResult};

#[cfg(test)]
pub(crate) mod testutil {
    use bargrid_core::{BinaryImage, Glyph, Rect, Scale, Skew};
    use nalgebra::Point2;

    use super::params::{GridParams, Resolved};
    use super::state::{Ctx, State};
    use crate::peak::{BarPeak, PeakId};
    use crate::staff::Staff;
    use crate::tags::TagSet;

    /// Shared scaffolding for pass-level tests: interline 20 px, straight
    /// sheet, default parameters, blank image.
    pub(crate) struct Fixture {
        pub scale: Scale,
        pub skew: Skew,
        pub params: Resolved,
        pub image: BinaryImage,
    }

    impl Fixture {
        pub fn new() -> Self {
            let scale = Scale::new(20, 3);
            Self {
                scale,
                skew: Skew::identity(),
                params: Resolved::new(&GridParams::default(), &scale),
                image: BinaryImage::blank(1200, 1000),
            }
        }

        pub fn ctx(&self) -> Ctx<'_> {
            Ctx {
                scale: self.scale,
                skew: self.skew,
                params: &self.params,
                image: self.image.view(),
            }
        }
    }

    /// Staves of height 80 px, stacked 200 px apart starting at y = 100.
    pub(crate) fn state_with_staves(count: usize) -> State {
        let mut state = State::default();
        for i in 0..count {
            let top = 100 + (i as i32) * 200;
            state.staves.push(Staff {
                id: i + 1,
                left: 100,
                right: 1100,
                top,
                bottom: top + 80,
                short: false,
                peaks: Vec::new(),
            });
        }
        state.staff_system = vec![0; count];
        state
    }

    /// Append a straight-glyph peak to a staff. Peaks must be added in
    /// ascending abscissa order.
    pub(crate) fn add_peak(state: &mut State, staff: usize, start: i32, stop: i32) -> PeakId {
        let (top, bottom) = {
            let s = &state.staves[staff];
            (s.top, s.bottom)
        };
        let width = stop - start + 1;
        let height = bottom - top + 1;
        let id = state.peaks.push(BarPeak {
            staff,
            start,
            stop,
            top,
            bottom,
            grade: 0.8,
            glyph: Some(Glyph {
                bounds: Rect::new(start, top, width, height),
                weight: width * height,
                centroid: Point2::new(
                    (start + stop) as f64 / 2.0,
                    (top + bottom) as f64 / 2.0,
                ),
                mean_curvature: 1e6,
                slope: 0.0,
            }),
            tags: TagSet::EMPTY,
            inter: None,
        });
        state.staves[staff].peaks.push(id);
        id
    }
}
