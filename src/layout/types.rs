use serde::Serialize;

/// Whether a curve moves outward or inward through a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Outward,
    Inward,
}

/// One intersection point of the full diagram.
#[derive(Debug, Clone, Serialize)]
pub struct Crossing {
    /// Position among all `n * L` crossings, in angular order.
    pub column: usize,
    /// Rotational replica (pie slice) the crossing belongs to.
    pub slice: usize,
    /// Column inside the pie slice.
    pub slice_column: usize,
    pub ring: usize,
    pub angle: f32,
    /// Curve on level `ring` before the crossing; it leaves on level `ring + 1`.
    pub lower: usize,
    /// Curve on level `ring + 1` before the crossing.
    pub upper: usize,
}

impl Crossing {
    pub fn involves(&self, curve: usize) -> bool {
        self.lower == curve || self.upper == curve
    }

    pub fn partner_of(&self, curve: usize) -> Option<usize> {
        if self.lower == curve {
            Some(self.upper)
        } else if self.upper == curve {
            Some(self.lower)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ring {
    pub index: usize,
    /// Indices into [`Layout::crossings`], in angular order.
    pub crossings: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CurveEvent {
    pub crossing: usize,
    pub partner: usize,
    pub ring: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveTrace {
    pub curve: usize,
    /// Level held at angle zero.
    pub start_level: usize,
    pub events: Vec<CurveEvent>,
}

/// Combinatorial skeleton of one diagram: rings, crossings and the path of
/// every curve through them. Angles are in radians, growing with the column.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub curves: usize,
    /// Crossings per pie slice, `L`.
    pub slice_columns: usize,
    pub crossings: Vec<Crossing>,
    pub rings: Vec<Ring>,
    pub traces: Vec<CurveTrace>,
    /// `levels[j][k]` is the curve on level `k` just before column `j`;
    /// the last entry is the order after the final column.
    pub levels: Vec<Vec<usize>>,
}

impl Layout {
    pub fn total_columns(&self) -> usize {
        self.crossings.len()
    }

    /// Angular distance between neighbouring crossings.
    pub fn column_gap(&self) -> f32 {
        std::f32::consts::TAU / self.total_columns().max(1) as f32
    }

    pub fn column_angle(&self, column: usize) -> f32 {
        (column as f32 + 0.5) * self.column_gap()
    }

    /// Level of `curve` just before `column` (`column == total_columns()` gives
    /// the level after the last crossing).
    pub fn level_of(&self, curve: usize, column: usize) -> usize {
        self.levels[column]
            .iter()
            .position(|&held| held == curve)
            .unwrap_or(0)
    }

    /// True when every curve ends on the level it started on.
    pub fn closes(&self) -> bool {
        self.levels.first() == self.levels.last()
    }

    /// Number of crossing points shared by curves `a` and `b`.
    pub fn crossings_between(&self, a: usize, b: usize) -> usize {
        self.crossings
            .iter()
            .filter(|crossing| crossing.involves(a) && crossing.involves(b))
            .count()
    }
}
