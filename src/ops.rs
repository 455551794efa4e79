/*!
# Graph Operations

Capability traits shared by everything that looks like a graph in this crate.
The forward-star [`Graph`](crate::repr::Graph) implements all of them; algorithms only
rely on these getters plus the arc-level queries of the representation itself.
*/

use std::ops::Range;

use crate::{repr::GraphKind, *};

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns a range of all nodes.
    /// In contrast to [`GraphNodeOrder::vertices`], the range does not borrow `self` and may be
    /// used where a mutable reference to the graph is needed while iterating.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns *true* if the graph has no nodes (and thus no arcs)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns *true* if `u` is a node of the graph
    fn has_node(&self, u: Node) -> bool {
        u < self.number_of_nodes()
    }
}

/// Provides getters pertaining to the arc-size of a graph
pub trait GraphArcOrder {
    /// Returns the number of arcs of the graph
    fn number_of_arcs(&self) -> NumArcs;

    /// Returns a range of all arc positions
    fn arc_positions(&self) -> Range<ArcPos> {
        0..self.number_of_arcs()
    }

    /// Returns *true* if the graph has no arcs
    fn is_singleton_graph(&self) -> bool {
        self.number_of_arcs() == 0
    }

    /// Returns *true* if `pos` is a valid arc position
    fn has_arc_position(&self, pos: ArcPos) -> bool {
        pos < self.number_of_arcs()
    }
}

/// Provides the kind of a graph, which gates the algorithms accepting it
pub trait GraphType {
    /// Returns the kind of the graph
    fn kind(&self) -> GraphKind;

    /// Returns *true* if the graph is directed
    fn is_directed(&self) -> bool {
        self.kind() == GraphKind::Directed
    }

    /// Returns *true* if the graph is undirected
    fn is_undirected(&self) -> bool {
        self.kind() == GraphKind::Undirected
    }

    /// Returns *true* if the graph is a residual graph
    fn is_residual(&self) -> bool {
        self.kind() == GraphKind::Residual
    }
}
