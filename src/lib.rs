/*!
`flowboard` is a graph data structure & algorithms library for small to medium sized
*networks*: directed, undirected or residual graphs whose arcs may carry a cost, a capacity and a
flow, and whose nodes carry an external flow (supply).

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
**Arcs** are identified by their *position* `0..m`; the tuple-struct `Edge(tail, head)` describes
their endpoints.

The single representation [`Graph`](crate::repr::Graph) is a *forward-star* structure:
an arena of arc records in which every arc links to the next outgoing arc of its tail.
Cost, capacity and flow are optional per-arc vectors; an absent vector is distinct from a vector
full of zeros. See the [`repr`] module for details.

### Directed, Undirected, Residual

- In a **directed** graph, arcs have an orientation.
- In an **undirected** graph, the stored orientation of an arc is meaningless to the algorithms.
- A **residual** graph pairs every arc with a mirror arc of opposite direction and is produced from
  a directed flow graph by [`Graph::build_residual`](crate::repr::Graph::build_residual).

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, arcs, errors, basic graph operations and the graph itself,
- [`algo`] includes algorithm traits implemented on the graph itself, such as BFS (`graph.bfs(k)`),
  shortest paths, maximum flows, minimum cuts, minimum cost flows, spanning trees and colorings,
- [`gens`] includes a random network generator,
- [`io`] includes readers and writers for the board text format.

In most use-cases, `use flowboard::{prelude::*, algo::*};` suffices for your needs.

```
use flowboard::{prelude::*, algo::*};

let mut graph = Graph::from_arcs(GraphKind::Directed, 4, [(0, 1), (0, 2), (1, 3), (2, 3)])
    .with_source(0)
    .with_sink(3);
graph.set_capacities(vec![3.0, 2.0, 2.0, 3.0]).unwrap();

let value = graph.max_flow(MaxFlowAlgorithm::Labeling).unwrap();
assert_eq!(value, 4.0);
assert_eq!(graph.total_flow_from(0).unwrap(), 4.0);
```

# Errors and Diagnostics

Every fallible operation returns a [`Result`](crate::error::Result) with a
[`GraphError`](crate::error::GraphError). Diagnostics that do not abort an operation
(e.g. a source that cannot reach every node) are emitted as [`tracing`] events; the library never
installs a subscriber itself.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod io;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;

pub use edge::*;
pub use error::{GraphError, Result};
pub use node::*;

/// `flowboard::prelude` includes definitions for nodes and arcs, errors, all basic graph operation traits
/// as well as the graph representation.
pub mod prelude {
    pub use super::{edge::*, error::*, node::*, ops::*, repr::*};
}
