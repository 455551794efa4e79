/*!
# Representation

The [`Graph`] of this crate is a *forward-star* structure: an arena of arc records
`(tail, head, next)` in which every node knows the position of its first and last outgoing arc,
and every arc links to the next outgoing arc of the same tail. Walking the out-arcs of a node
costs `O(out-degree)` without any per-node dynamic arrays.

Arc *positions* are the identity of arcs: the optional cost, capacity and flow vectors as well as
the mirror links of residual graphs are indexed by them. Adding an arc appends a new position;
deleting one compacts all vectors and rebuilds the linkage by replaying the surviving arcs.

Submodules:
- [`forward_star`] construction, editing and arc queries,
- `queries` reachability, predicates and aggregate values,
- `residual` conversion between flow graphs and residual graphs,
- `sorting` reordering of arcs and renumbering of nodes.
*/

use std::fmt::Display;

use crate::*;

pub mod forward_star;
mod queries;
mod residual;
mod sorting;

pub use forward_star::*;
pub use sorting::SortOrder;

/// Numerical slack used when comparing flows, capacities and supplies
pub const EPSILON: f64 = 1e-9;

/// The kind of a graph determines which algorithms accept it
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum GraphKind {
    #[default]
    Directed,
    Undirected,
    /// Every arc is paired with a reverse mirror arc
    Residual,
}

impl GraphKind {
    /// Returns the single character used by the board file format
    pub fn code(&self) -> char {
        match self {
            GraphKind::Directed => 'd',
            GraphKind::Undirected => 'u',
            GraphKind::Residual => 'r',
        }
    }

    /// Parses the single character used by the board file format
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'd' => Some(GraphKind::Directed),
            'u' => Some(GraphKind::Undirected),
            'r' => Some(GraphKind::Residual),
            _ => None,
        }
    }
}

impl Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GraphKind::Directed => "directed",
            GraphKind::Undirected => "undirected",
            GraphKind::Residual => "residual",
        };
        write!(f, "{name}")
    }
}

/// Names the per-arc vectors of a graph
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArcVector {
    Cost,
    Capacity,
    Flow,
    Mirror,
}

impl Display for ArcVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArcVector::Cost => "cost",
            ArcVector::Capacity => "capacity",
            ArcVector::Flow => "flow",
            ArcVector::Mirror => "mirror",
        };
        write!(f, "{name}")
    }
}

/// A per-arc vector that is either absent or holds exactly one value per arc.
///
/// An absent vector is different from an all-zero vector: algorithms that need costs fail on
/// `Absent`, and algorithms that filter by capacity treat every arc as usable if capacities are
/// `Absent`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ArcData {
    #[default]
    Absent,
    Present(Vec<f64>),
}

impl ArcData {
    /// Returns *true* if the vector exists
    pub fn is_present(&self) -> bool {
        matches!(self, ArcData::Present(_))
    }

    /// Returns the values if present
    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            ArcData::Absent => None,
            ArcData::Present(values) => Some(values),
        }
    }

    /// Returns the values mutably if present
    pub fn as_mut_slice(&mut self) -> Option<&mut [f64]> {
        match self {
            ArcData::Absent => None,
            ArcData::Present(values) => Some(values),
        }
    }

    /// Returns the value at `pos` if the vector is present.
    /// ** Panics if present and `pos >= m` **
    pub fn get(&self, pos: ArcPos) -> Option<f64> {
        self.as_slice().map(|values| values[pos as usize])
    }

    /// Appends a zero if the vector is present
    pub(crate) fn pad(&mut self) {
        if let ArcData::Present(values) = self {
            values.push(0.0);
        }
    }

    /// Keeps only the entries whose `keep`-flag is set
    pub(crate) fn retain(&mut self, keep: &[bool]) {
        if let ArcData::Present(values) = self {
            let mut flags = keep.iter();
            values.retain(|_| flags.next().copied().unwrap_or(false));
        }
    }

    /// Reorders the entries such that new entry `k` is old entry `perm[k]`
    pub(crate) fn permute(&mut self, perm: &[ArcPos]) {
        if let ArcData::Present(values) = self {
            *values = perm.iter().map(|&old| values[old as usize]).collect();
        }
    }
}

/// Marks an arc of a residual graph as an original arc or its synthetic reverse
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The arc exists in the underlying flow graph
    Forward,
    /// The arc is the reverse of a forward arc and carries its flow as capacity
    Backward,
}

impl Direction {
    /// Numeric marker used by the board file format (`1` / `-1`)
    pub fn marker(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Links an arc of a residual graph to its paired reverse arc
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Mirror {
    pub partner: ArcPos,
    pub direction: Direction,
}

/// Everything known about a single arc.
/// Absent vectors are reported as `NaN`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcBundle {
    pub tail: Node,
    pub head: Node,
    pub next: Option<ArcPos>,
    pub cost: f64,
    pub capacity: f64,
    pub flow: f64,
}
