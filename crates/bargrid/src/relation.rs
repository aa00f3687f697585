use crate::peak::PeakId;
use crate::side::VerticalSide;

/// Unvalidated correspondence between a peak and a peak of the staff below.
///
/// `dx` is the signed deskewed abscissa deviation (bottom minus top) in
/// interline fraction.
#[derive(Clone, Copy, Debug)]
pub struct BarAlignment {
    pub top: PeakId,
    pub bottom: PeakId,
    pub dx: f64,
    /// Alignment quality, `1 - |dx| / max_dx`.
    pub grade: f64,
}

impl BarAlignment {
    #[inline]
    pub fn peak(&self, side: VerticalSide) -> PeakId {
        match side {
            VerticalSide::Top => self.top,
            VerticalSide::Bottom => self.bottom,
        }
    }
}

/// Pixel-evidence impacts of a confirmed connection.
#[derive(Clone, Copy, Debug)]
pub struct ConnectionImpacts {
    /// Alignment quality carried over from the underlying alignment.
    pub align: f64,
    /// `1 - white_ratio / max_white_ratio`.
    pub white: f64,
    /// `1 - gap / max_gap`.
    pub gap: f64,
}

impl ConnectionImpacts {
    /// Combined quality of the connection.
    pub fn grade(&self) -> f64 {
        (self.align + self.white + self.gap) / 3.0
    }
}

/// An alignment promoted into a physical connection by pixel evidence.
#[derive(Clone, Copy, Debug)]
pub struct BarConnection {
    pub top: PeakId,
    pub bottom: PeakId,
    pub dx: f64,
    pub impacts: ConnectionImpacts,
}

impl BarConnection {
    #[inline]
    pub fn peak(&self, side: VerticalSide) -> PeakId {
        match side {
            VerticalSide::Top => self.top,
            VerticalSide::Bottom => self.bottom,
        }
    }

    pub fn grade(&self) -> f64 {
        self.impacts.grade()
    }
}
