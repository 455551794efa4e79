/*!
# Errors

Every fallible operation of this crate returns [`Result<T>`] with a [`GraphError`].
None of the errors is fatal: the graph passed in is left in a usable state and the caller
decides how to proceed.

A negative cycle found by a shortest-path computation is *not* an error; it is reported through
[`ShortestPathTree::negative_cycle`](crate::algo::ShortestPathTree::negative_cycle).
*/

use thiserror::Error;

use crate::{
    edge::{ArcPos, NumArcs},
    node::Node,
    repr::{ArcVector, GraphKind},
};

/// Shorthand for results of graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Coarse classification of a [`GraphError`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The graph does not have the shape the operation needs
    Structural,
    /// The requested problem has no solution on this graph
    Infeasible,
    /// An algorithm-specific requirement on the input is violated
    Precondition,
    /// The directed graph contains a cycle
    Cycle,
}

/// All errors returned by graph operations.
///
/// # Error Categories
///
/// ## Structural
/// - [`GraphError::WrongKind`], [`GraphError::MissingVector`], [`GraphError::SizeMismatch`]
/// - [`GraphError::NodeNotFound`], [`GraphError::ArcNotFound`], [`GraphError::NoSuchArc`]
/// - [`GraphError::MissingSource`], [`GraphError::MissingSink`]
///
/// ## Infeasible
/// - [`GraphError::UnbalancedSupply`], [`GraphError::InfeasibleSupply`]
/// - [`GraphError::SinkUnreachable`], [`GraphError::Disconnected`], [`GraphError::TooManyArcs`]
///
/// ## Precondition
/// - [`GraphError::NegativeCost`], [`GraphError::NotTopologicallySorted`]
/// - [`GraphError::NoOutgoingArcs`], [`GraphError::NegativeCycle`], [`GraphError::SourceIsSink`]
/// - [`GraphError::InvalidBound`]
///
/// ## Cycle
/// - [`GraphError::CycleDetected`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("{operation} requires a {expected} graph, but the graph is {found}")]
    WrongKind {
        operation: &'static str,
        expected: &'static str,
        found: GraphKind,
    },

    #[error("{operation} requires a {vector} vector")]
    MissingVector {
        operation: &'static str,
        vector: ArcVector,
    },

    #[error("{vector} vector has {found} entries, expected {expected}")]
    SizeMismatch {
        vector: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("node {0} does not exist")]
    NodeNotFound(Node),

    #[error("arc position {0} does not exist")]
    ArcNotFound(ArcPos),

    #[error("there is no arc ({0},{1})")]
    NoSuchArc(Node, Node),

    #[error("{0} requires a source node")]
    MissingSource(&'static str),

    #[error("{0} requires a sink node")]
    MissingSink(&'static str),

    #[error("external flows do not sum up to zero (total {0})")]
    UnbalancedSupply(f64),

    #[error("no flow satisfies the external flows of all nodes")]
    InfeasibleSupply,

    #[error("sink {sink} cannot be reached from source {source}")]
    SinkUnreachable { r#source: Node, sink: Node },

    #[error("not all nodes can be reached from node {0}")]
    Disconnected(Node),

    #[error("arc {0} has a negative cost")]
    NegativeCost(ArcPos),

    #[error("arc {0} points from a larger to a smaller node")]
    NotTopologicallySorted(ArcPos),

    #[error("no node has an outgoing arc")]
    NoOutgoingArcs,

    #[error("a negative cycle {0:?} makes the result unbounded")]
    NegativeCycle(Vec<Node>),

    #[error("node {0} cannot be source and sink at the same time")]
    SourceIsSink(Node),

    #[error("the graph contains a directed cycle")]
    CycleDetected,

    #[error("{requested} arcs requested, but only {available} node pairs exist")]
    TooManyArcs { requested: NumArcs, available: u64 },

    #[error("{name} bound {value} must be finite and non-negative")]
    InvalidBound { name: &'static str, value: f64 },
}

impl GraphError {
    /// Returns the class of the error
    pub fn category(&self) -> ErrorCategory {
        use GraphError::*;
        match self {
            WrongKind { .. }
            | MissingVector { .. }
            | SizeMismatch { .. }
            | NodeNotFound(_)
            | ArcNotFound(_)
            | NoSuchArc(..)
            | MissingSource(_)
            | MissingSink(_) => ErrorCategory::Structural,
            UnbalancedSupply(_)
            | InfeasibleSupply
            | SinkUnreachable { .. }
            | Disconnected(_)
            | TooManyArcs { .. } => ErrorCategory::Infeasible,
            NegativeCost(_)
            | NotTopologicallySorted(_)
            | NoOutgoingArcs
            | NegativeCycle(_)
            | SourceIsSink(_)
            | InvalidBound { .. } => ErrorCategory::Precondition,
            CycleDetected => ErrorCategory::Cycle,
        }
    }
}

impl From<GraphError> for std::io::Error {
    fn from(value: GraphError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}
