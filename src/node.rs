/*!
# Node Representation

We choose `Node = u32` as almost all use-cases involve less than `2^32` nodes.
Nodes are numbered `0` to `n - 1`; deleting a node renumbers every higher node down by one.

Besides its id, every node carries two attributes that algorithms may read:
a display coordinate ([`Point`]) and an external flow value (its *supply*).
Positive supply marks a node that injects flow, negative supply one that absorbs it.
*/

use std::fmt::{Debug, Display};

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// Colors assigned to nodes by the coloring algorithms; `0` means *uncolored*
pub type Color = u32;

/// Color value of a node that has not been colored (yet)
pub const UNCOLORED: Color = 0;

/// Display coordinate of a node.
///
/// Coordinates are never interpreted by the algorithms, they only survive copies,
/// sorting and the file format.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Point::new(value.0, value.1)
    }
}
