use serde::{Deserialize, Serialize};

/// Vertical side of a staff or peak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalSide {
    Top,
    Bottom,
}

impl VerticalSide {
    pub const BOTH: [VerticalSide; 2] = [VerticalSide::Top, VerticalSide::Bottom];

    pub fn opposite(self) -> VerticalSide {
        match self {
            VerticalSide::Top => VerticalSide::Bottom,
            VerticalSide::Bottom => VerticalSide::Top,
        }
    }
}

/// Horizontal side of a staff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalSide {
    Left,
    Right,
}

impl HorizontalSide {
    pub const BOTH: [HorizontalSide; 2] = [HorizontalSide::Left, HorizontalSide::Right];
}
