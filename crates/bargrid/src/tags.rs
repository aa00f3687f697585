use std::fmt;

use crate::side::VerticalSide;

/// Boolean attributes a bar peak can accumulate during retrieval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum Tag {
    /// Classified as a thin bar line.
    Thin = 1 << 0,
    /// Classified as a thick bar line.
    Thick = 1 << 1,
    /// Recognized as a brace portion, not a bar line.
    Brace = 1 << 2,
    /// Top end of a bracket (carries the serif).
    BracketTop = 1 << 3,
    /// Bottom end of a bracket (carries the serif).
    BracketBottom = 1 << 4,
    /// Middle portion of a bracket.
    BracketMiddle = 1 << 5,
    /// Aligned or connected with a peak of a nearby staff.
    Aligned = 1 << 6,
    /// Isolated peak within a multi-staff system.
    Unaligned = 1 << 7,
    /// Glyph extends clearly above the staff.
    BeyondTop = 1 << 8,
    /// Glyph extends clearly below the staff.
    BeyondBottom = 1 << 9,
    /// Peak defines a staff end abscissa.
    StaffEnd = 1 << 10,
    /// First (thick) peak of a C-clef.
    CClefOne = 1 << 11,
    /// Second (thin) peak of a C-clef.
    CClefTwo = 1 << 12,
    /// Spurious peak within a C-clef tail.
    CClefTail = 1 << 13,
}

impl Tag {
    /// Bracket-end tag for the given vertical side.
    pub fn bracket_end(side: VerticalSide) -> Tag {
        match side {
            VerticalSide::Top => Tag::BracketTop,
            VerticalSide::Bottom => Tag::BracketBottom,
        }
    }

    /// Beyond-staff tag for the given vertical side.
    pub fn beyond(side: VerticalSide) -> Tag {
        match side {
            VerticalSide::Top => Tag::BeyondTop,
            VerticalSide::Bottom => Tag::BeyondBottom,
        }
    }
}

/// Fixed-size set of [`Tag`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSet(u16);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    #[inline]
    pub fn set(&mut self, tag: Tag) {
        self.0 |= tag as u16;
    }

    #[inline]
    pub fn is_set(&self, tag: Tag) -> bool {
        self.0 & (tag as u16) != 0
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const ALL: [(Tag, &str); 14] = [
            (Tag::Thin, "THIN"),
            (Tag::Thick, "THICK"),
            (Tag::Brace, "BRACE"),
            (Tag::BracketTop, "BRACKET_TOP"),
            (Tag::BracketBottom, "BRACKET_BOTTOM"),
            (Tag::BracketMiddle, "BRACKET_MIDDLE"),
            (Tag::Aligned, "ALIGNED"),
            (Tag::Unaligned, "UNALIGNED"),
            (Tag::BeyondTop, "BEYOND_TOP"),
            (Tag::BeyondBottom, "BEYOND_BOTTOM"),
            (Tag::StaffEnd, "STAFF_END"),
            (Tag::CClefOne, "CCLEF_ONE"),
            (Tag::CClefTwo, "CCLEF_TWO"),
            (Tag::CClefTail, "CCLEF_TAIL"),
        ];

        let mut list = f.debug_set();
        for (tag, name) in ALL {
            if self.is_set(tag) {
                list.entry(&name);
            }
        }
        list.finish()
    }
}
