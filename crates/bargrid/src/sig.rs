//! Scored interpretations and the per-system relation graph.

use bargrid_core::Rect;

/// Handle to an interpretation inside a system graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InterId {
    /// System index within the sheet.
    pub system: usize,
    /// Vertex index within the system graph.
    pub index: usize,
}

/// Bar-line sub-kind derived from the width classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarShape {
    Thin,
    Thick,
}

/// Which ends of a bracket a peak carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BracketKind {
    Top,
    Bottom,
    Both,
    /// Middle portion, no serif.
    None,
}

/// Interpretation vertex kinds emitted by the grid builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterKind {
    Barline(BarShape),
    Bracket(BracketKind),
    /// Physical connection between two bar lines across staves.
    BarConnector(BarShape),
    /// Physical connection between two bracket portions across staves.
    BracketConnector,
}

/// A scored interpretation.
#[derive(Clone, Debug)]
pub struct Inter {
    pub kind: InterKind,
    /// Confidence in [0, 1].
    pub grade: f64,
    pub bounds: Rect,
    /// Owning staff index, absent for cross-staff connectors.
    pub staff: Option<usize>,
}

impl Inter {
    /// Move the grade toward 1 by the given ratio of the remaining headroom.
    pub fn increase(&mut self, ratio: f64) {
        self.grade += ratio * (1.0 - self.grade);
    }

    /// Scale the grade down by the given ratio.
    pub fn decrease(&mut self, ratio: f64) {
        self.grade *= 1.0 - ratio;
    }
}

/// Relation edge kinds between interpretations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelationKind {
    /// Two bar lines (or bracket portions) support each other through a
    /// confirmed physical connection.
    ConnectionSupport,
    /// Two close bar lines on the same staff form a double/triple bar.
    BarGroup {
        /// Horizontal gap, interline fraction.
        gap: f64,
    },
}

/// Relation edge between two vertices of the same system graph.
#[derive(Clone, Copy, Debug)]
pub struct Relation {
    pub source: usize,
    pub target: usize,
    pub kind: RelationKind,
}

/// Per-system scoring graph of interpretations and relations.
#[derive(Clone, Debug, Default)]
pub struct Sig {
    pub inters: Vec<Inter>,
    pub relations: Vec<Relation>,
}

impl Sig {
    pub fn add_inter(&mut self, inter: Inter) -> usize {
        self.inters.push(inter);
        self.inters.len() - 1
    }

    pub fn add_relation(&mut self, source: usize, target: usize, kind: RelationKind) {
        self.relations.push(Relation {
            source,
            target,
            kind,
        });
    }
}

/// A subdivision of a system sharing one instrument.
#[derive(Clone, Debug)]
pub struct Part {
    /// Staff indices (0-based, sheet order), contiguous.
    pub staves: Vec<usize>,
}

/// A set of vertically connected staves performed together.
#[derive(Clone, Debug)]
pub struct System {
    /// 1-based id, top to bottom.
    pub id: usize,
    /// Staff indices (0-based, sheet order), contiguous.
    pub staves: Vec<usize>,
    pub parts: Vec<Part>,
    pub sig: Sig,
}
