use std::fmt::{Debug, Display};

use crate::Node;

/// An arc is defined by its two endpoints `(tail, head)`.
/// In undirected graphs the orientation is only a storage artefact.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Position of an arc inside a graph.
///
/// Positions are `0..m` and index every per-arc vector (cost, capacity, flow, mirror).
/// They are append-only until an arc is deleted, which shifts all later positions down by one.
pub type ArcPos = u32;

/// We limit the number of arcs to `2^32 - 1`.
pub type NumArcs = u32;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Returns the tail (first endpoint) of the arc
    pub fn tail(&self) -> Node {
        self.0
    }

    /// Returns the head (second endpoint) of the arc
    pub fn head(&self) -> Node {
        self.1
    }

    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the endpoint with smaller index comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Returns true if `u` is one of the endpoints
    pub fn is_incident_to(&self, u: Node) -> bool {
        self.0 == u || self.1 == u
    }

    /// Returns the endpoint opposite to `u`.
    /// ** Panics if `u` is not an endpoint (in debug builds) **
    pub fn opposite(&self, u: Node) -> Node {
        debug_assert!(self.is_incident_to(u));
        if self.0 == u { self.1 } else { self.0 }
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}
