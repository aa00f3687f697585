use bargrid_core::{Glyph, Rect};

use crate::side::VerticalSide;
use crate::sig::InterId;
use crate::tags::{Tag, TagSet};

/// Stable handle to a bar peak, valid for one retrieval run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeakId(pub(crate) u32);

impl PeakId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A candidate vertical bar-line or bracket segment on one staff.
///
/// `top`/`bottom` are the ordinates of the staff's first and last line at
/// the peak abscissa; the owned glyph may extend past them.
#[derive(Clone, Debug)]
pub struct BarPeak {
    /// Index of the owning staff (0-based).
    pub staff: usize,
    /// First abscissa of the peak.
    pub start: i32,
    /// Last abscissa of the peak.
    pub stop: i32,
    /// Ordinate of the staff top line at the peak.
    pub top: i32,
    /// Ordinate of the staff bottom line at the peak.
    pub bottom: i32,
    /// Quality reported by the upstream projector, in [0, 1].
    pub grade: f64,
    /// Core glyph, filled early in the pipeline.
    pub glyph: Option<Glyph>,
    /// Accumulated boolean attributes.
    pub tags: TagSet,
    /// Interpretation created for this peak, if any.
    pub inter: Option<InterId>,
}

impl BarPeak {
    #[inline]
    pub fn width(&self) -> i32 {
        self.stop - self.start + 1
    }

    #[inline]
    pub fn mid(&self) -> i32 {
        (self.start + self.stop) / 2
    }

    /// Staff-line ordinate on the given side.
    #[inline]
    pub fn ordinate(&self, side: VerticalSide) -> i32 {
        match side {
            VerticalSide::Top => self.top,
            VerticalSide::Bottom => self.bottom,
        }
    }

    /// Bounding box limited to staff height.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.start, self.top, self.width(), self.bottom - self.top + 1)
    }

    pub fn set(&mut self, tag: Tag) {
        self.tags.set(tag);
    }

    pub fn is_set(&self, tag: Tag) -> bool {
        self.tags.is_set(tag)
    }

    /// Whether the peak belongs to a bracket (end or middle portion).
    pub fn is_bracket(&self) -> bool {
        self.is_set(Tag::BracketTop)
            || self.is_set(Tag::BracketBottom)
            || self.is_set(Tag::BracketMiddle)
    }

    pub fn is_bracket_end(&self, side: VerticalSide) -> bool {
        self.is_set(Tag::bracket_end(side))
    }

    pub fn is_beyond(&self, side: VerticalSide) -> bool {
        self.is_set(Tag::beyond(side))
    }

    pub fn is_beyond_any(&self) -> bool {
        self.is_set(Tag::BeyondTop) || self.is_set(Tag::BeyondBottom)
    }

    /// How far the glyph goes beyond the staff limit line on the given side,
    /// in pixels. `half_line` is half the typical staff-line thickness.
    /// Zero when no glyph has been built yet.
    pub fn extension(&self, side: VerticalSide, half_line: f64) -> f64 {
        let Some(glyph) = &self.glyph else {
            return 0.0;
        };
        match side {
            VerticalSide::Top => self.top as f64 - half_line - glyph.bounds.y as f64,
            VerticalSide::Bottom => {
                (glyph.bounds.bottom() - 1) as f64 - half_line - self.bottom as f64
            }
        }
    }
}

/// Append-only arena holding every peak of the run.
///
/// Peaks are never physically dropped during a run; deletion removes the id
/// from its staff and sweeps the relation sets, so stale ids can never be
/// observed through the staves.
#[derive(Clone, Debug, Default)]
pub(crate) struct PeakArena {
    items: Vec<BarPeak>,
}

impl PeakArena {
    pub fn push(&mut self, peak: BarPeak) -> PeakId {
        let id = PeakId(self.items.len() as u32);
        self.items.push(peak);
        id
    }

    #[inline]
    pub fn get(&self, id: PeakId) -> &BarPeak {
        &self.items[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PeakId) -> &mut BarPeak {
        &mut self.items[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak() -> BarPeak {
        BarPeak {
            staff: 0,
            start: 10,
            stop: 13,
            top: 50,
            bottom: 130,
            grade: 0.8,
            glyph: None,
            tags: TagSet::EMPTY,
            inter: None,
        }
    }

    #[test]
    fn width_and_bounds() {
        let p = peak();
        assert_eq!(p.width(), 4);
        assert_eq!(p.bounds(), Rect::new(10, 50, 4, 81));
        assert_eq!(p.ordinate(VerticalSide::Top), 50);
    }

    #[test]
    fn bracket_query_covers_all_portions() {
        let mut p = peak();
        assert!(!p.is_bracket());
        p.set(Tag::BracketMiddle);
        assert!(p.is_bracket());
    }
}
