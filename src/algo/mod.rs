/*!
# Graph Algorithms

This module provides the **network algorithms** built on top of the forward-star [`Graph`].
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use flowboard::algo::*;
```
and gain access to traversals, shortest paths, maximum flows, minimum cuts, minimum cost flows,
spanning trees and colorings.

Every algorithm family is a trait implemented on [`Graph`], so algorithms are invoked as methods
(`graph.bfs(0)`, `graph.max_flow(..)`). Algorithms that take `&self` never modify the graph;
algorithms that take `&mut self` document what they write back (usually the flow vector).
*/

mod coloring;
mod max_flow;
mod min_cost_flow;
mod min_cut;
mod shortest_path;
mod spanning_tree;
mod traversal;

use crate::prelude::*;

pub use coloring::*;
pub use max_flow::*;
pub use min_cost_flow::*;
pub use min_cut::*;
pub use shortest_path::*;
pub use spanning_tree::*;
pub use traversal::*;

/// Follows `predecessor_arc` from `t` back to `root` and returns the nodes and arcs of the
/// path `root, .., t` in forward order, or `None` if `t` is not connected to `root`.
fn walk_back(
    predecessor: &[Option<Node>],
    predecessor_arc: &[Option<ArcPos>],
    root: Node,
    t: Node,
) -> Option<(Vec<Node>, Vec<ArcPos>)> {
    let mut nodes = vec![t];
    let mut arcs = Vec::new();

    let mut v = t;
    while v != root {
        arcs.push(predecessor_arc[v as usize]?);
        v = predecessor[v as usize]?;
        nodes.push(v);
        if nodes.len() > predecessor.len() {
            return None;
        }
    }

    nodes.reverse();
    arcs.reverse();
    Some((nodes, arcs))
}
