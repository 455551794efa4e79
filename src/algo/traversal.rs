/*!
Graph traversal algorithms and traversal-derived results.

This module provides:
- A generic traversal iterator [`TraversalSearch`] that yields every newly discovered node
  together with the arc it was discovered through. The frontier data structure decides the
  order: a queue gives BFS, a stack gives DFS.
- [`SearchTree`], the order/predecessor result of a complete search.
- Topological ordering of directed acyclic graphs via Kahn's algorithm.
- The [`Traversal`] trait exposing all of the above as methods on [`Graph`].

Searches never modify the graph passed in: they run on a private copy whose arcs are sorted
ascending by `(tail, head)`, which makes the visitation order deterministic. All arc positions
reported to the caller refer to the original graph.
*/

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use tracing::debug;

use super::*;

/// Abstraction for the traversal frontier data structure.
///
/// A `NodeSequencer` stores the nodes whose out-arcs are still being explored.
/// Different implementations determine the traversal order:
///
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
pub trait NodeSequencer<T> {
    /// Creates a new sequencer initialized with a single node.
    fn init(u: T) -> Self;

    /// Pushes a node into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next node from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Returns a clone of the next node without removing it.
    fn peek(&self) -> Option<T>;
}

impl<T> NodeSequencer<T> for VecDeque<T>
where
    T: Clone,
{
    fn init(u: T) -> Self {
        Self::from(vec![u])
    }
    fn push(&mut self, u: T) {
        self.push_back(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn peek(&self) -> Option<T> {
        self.front().cloned()
    }
}

impl<T> NodeSequencer<T> for Vec<T>
where
    T: Clone,
{
    fn init(u: T) -> Self {
        vec![u]
    }
    fn push(&mut self, u: T) {
        self.push(u)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn peek(&self) -> Option<T> {
        self.last().cloned()
    }
}

/// A node discovered by a [`TraversalSearch`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// The newly discovered node
    pub node: Node,
    /// The arc (position in the searched graph) through which `node` was discovered;
    /// `None` for the start node
    pub arc: Option<ArcPos>,
    /// Tail of `arc`
    pub predecessor: Option<Node>,
}

/// Generic traversal iterator supporting BFS and DFS variants.
///
/// The node at the front of the frontier repeatedly consumes its next unexplored out-arc.
/// If the arc is admissible (no capacities, or positive capacity) and leads to an undiscovered
/// node, that node is discovered, yielded and pushed; a node without remaining arcs is dropped
/// from the frontier. With a stack this follows the first remaining arc of the most recently
/// discovered node and backtracks on exhaustion.
pub struct TraversalSearch<S>
where
    S: NodeSequencer<Node>,
{
    sorted: Graph,
    /// Maps arc positions of `sorted` to positions in the caller's graph
    original_pos: Vec<ArcPos>,
    /// Next unexplored out-arc of every node
    cursor: Vec<Option<ArcPos>>,
    discovered: Vec<bool>,
    sequencer: S,
    root: Node,
    /// The root until it has been yielded
    start: Option<Node>,
}

/// A breadth-first search iterator
pub type Bfs = TraversalSearch<VecDeque<Node>>;

/// A depth-first search iterator
pub type Dfs = TraversalSearch<Vec<Node>>;

impl<S> TraversalSearch<S>
where
    S: NodeSequencer<Node>,
{
    /// Creates a new traversal starting from `start` on a sorted copy of `graph`.
    /// ** Panics if `start >= n` **
    pub fn new(graph: &Graph, start: Node) -> Self {
        let mut sorted = graph.clone();
        let original_pos = sorted.sort_arcs(SortOrder::Ascending);
        let cursor = sorted.vertices().map(|u| sorted.first_out_arc(u)).collect();

        let mut discovered = vec![false; sorted.len()];
        discovered[start as usize] = true;

        Self {
            sorted,
            original_pos,
            cursor,
            discovered,
            sequencer: S::init(start),
            root: start,
            start: Some(start),
        }
    }

    /// Returns *true* if `u` has been discovered so far.
    /// ** Panics if `u >= n` **
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.discovered[u as usize]
    }

    /// Consumes the search and records the order of discovery and the search tree
    pub fn into_tree(mut self) -> SearchTree {
        let n = self.sorted.len();
        let mut tree = SearchTree {
            root: self.root,
            order: vec![None; n],
            predecessor: vec![None; n],
            predecessor_arc: vec![None; n],
        };

        for (position, found) in self.by_ref().enumerate() {
            let v = found.node as usize;
            tree.order[v] = Some(position as NumNodes);
            tree.predecessor[v] = found.predecessor;
            tree.predecessor_arc[v] = found.arc;
        }

        tree
    }
}

impl<S> Iterator for TraversalSearch<S>
where
    S: NodeSequencer<Node>,
{
    type Item = Discovery;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.start.take() {
            return Some(Discovery {
                node: start,
                arc: None,
                predecessor: None,
            });
        }

        while let Some(u) = self.sequencer.peek() {
            let Some(pos) = self.cursor[u as usize] else {
                self.sequencer.pop();
                continue;
            };
            self.cursor[u as usize] = self.sorted.next_out_arc(pos);

            let v = self.sorted.head(pos);
            if !self.discovered[v as usize] && self.sorted.is_admissible(pos) {
                self.discovered[v as usize] = true;
                self.sequencer.push(v);
                return Some(Discovery {
                    node: v,
                    arc: Some(self.original_pos[pos as usize]),
                    predecessor: Some(u),
                });
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let undiscovered = self.discovered.iter().filter(|&&x| !x).count();
        (
            self.start.is_some() as usize,
            Some(undiscovered + self.start.is_some() as usize),
        )
    }
}

/// Result of a complete BFS or DFS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTree {
    /// The start node
    pub root: Node,
    /// Position at which each node was discovered (the root gets `0`); `None` if unreached
    pub order: Vec<Option<NumNodes>>,
    /// Predecessor of each node in the search tree; `None` for the root and unreached nodes
    pub predecessor: Vec<Option<Node>>,
    /// Arc through which each node was discovered
    pub predecessor_arc: Vec<Option<ArcPos>>,
}

impl SearchTree {
    /// Returns *true* if `u` was reached from the root.
    /// ** Panics if `u >= n` **
    pub fn is_reached(&self, u: Node) -> bool {
        self.order[u as usize].is_some()
    }

    /// Returns the number of reached nodes including the root
    pub fn number_reached(&self) -> NumNodes {
        self.order.iter().filter(|x| x.is_some()).count() as NumNodes
    }

    /// Returns *true* if every node was reached
    pub fn is_spanning(&self) -> bool {
        self.order.iter().all(|x| x.is_some())
    }

    /// Returns the reached nodes in the order they were discovered
    pub fn visit_sequence(&self) -> Vec<Node> {
        let mut nodes = (0..self.order.len() as Node)
            .filter(|&u| self.is_reached(u))
            .collect::<Vec<_>>();
        nodes.sort_unstable_by_key(|&u| self.order[u as usize]);
        nodes
    }

    /// Returns the discovery positions as a node permutation suitable for
    /// [`Graph::sort_nodes`], or `None` if not every node was reached
    pub fn ranking(&self) -> Option<Vec<Node>> {
        self.order.iter().map(|x| x.map(|r| r as Node)).collect()
    }

    /// Returns the tree path `root, .., t` or `None` if `t` was not reached.
    /// ** Panics if `t >= n` **
    pub fn rooted_path(&self, t: Node) -> Option<Vec<Node>> {
        walk_back(&self.predecessor, &self.predecessor_arc, self.root, t).map(|(nodes, _)| nodes)
    }

    /// Returns the arcs of the tree path from the root to `t` or `None` if `t` was not reached.
    /// ** Panics if `t >= n` **
    pub fn rooted_arcs(&self, t: Node) -> Option<Vec<ArcPos>> {
        walk_back(&self.predecessor, &self.predecessor_arc, self.root, t).map(|(_, arcs)| arcs)
    }
}

/// Result of a topological search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Position of every node in the topological order
    pub order: Vec<NumNodes>,
    /// The node whose removal last decreased the in-degree of a node to zero;
    /// `None` for nodes without incoming arcs
    pub predecessor: Vec<Option<Node>>,
}

impl TopologicalOrder {
    /// Returns the nodes sorted by their topological position
    pub fn sequence(&self) -> Vec<Node> {
        let mut nodes = vec![0; self.order.len()];
        for (u, &pos) in self.order.iter().enumerate() {
            nodes[pos as usize] = u as Node;
        }
        nodes
    }
}

/// Provides traversal methods (BFS, DFS, topological order)
pub trait Traversal {
    /// Returns a lazy breadth-first search from `start`.
    /// Fails if the graph is undirected or `start` does not exist.
    fn bfs_search(&self, start: Node) -> Result<Bfs>;

    /// Returns a lazy depth-first search from `start`.
    /// Fails if the graph is undirected or `start` does not exist.
    fn dfs_search(&self, start: Node) -> Result<Dfs>;

    /// Runs a complete breadth-first search from `start`.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let graph = Graph::from_arcs(GraphKind::Directed, 4, [(0, 2), (0, 1), (1, 3)]);
    /// let tree = graph.bfs(0).unwrap();
    /// assert_eq!(tree.visit_sequence(), vec![0, 1, 2, 3]);
    /// assert_eq!(tree.predecessor[3], Some(1));
    /// ```
    fn bfs(&self, start: Node) -> Result<SearchTree> {
        Ok(self.bfs_search(start)?.into_tree())
    }

    /// Runs a complete depth-first search from `start`.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let graph = Graph::from_arcs(GraphKind::Directed, 4, [(0, 2), (0, 1), (1, 3)]);
    /// let tree = graph.dfs(0).unwrap();
    /// assert_eq!(tree.visit_sequence(), vec![0, 1, 3, 2]);
    /// ```
    fn dfs(&self, start: Node) -> Result<SearchTree> {
        Ok(self.dfs_search(start)?.into_tree())
    }

    /// Runs a complete breadth-first search from the declared source
    fn bfs_from_source(&self) -> Result<SearchTree>;

    /// Runs a complete depth-first search from the declared source
    fn dfs_from_source(&self) -> Result<SearchTree>;

    /// Computes a topological order with Kahn's algorithm, always removing the smallest
    /// node of in-degree zero next.
    /// Fails with [`GraphError::CycleDetected`] if the graph has a directed cycle.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let graph = Graph::from_arcs(GraphKind::Directed, 3, [(2, 0), (1, 0)]);
    /// let topo = graph.topological_order().unwrap();
    /// assert_eq!(topo.sequence(), vec![1, 2, 0]);
    /// ```
    fn topological_order(&self) -> Result<TopologicalOrder>;

    /// Returns *true* if the directed graph has no directed cycle
    fn is_acyclic(&self) -> bool {
        self.topological_order().is_ok()
    }
}

impl Graph {
    fn require_searchable(&self, operation: &'static str, start: Node) -> Result<()> {
        self.require_kind(
            operation,
            "directed or residual",
            &[GraphKind::Directed, GraphKind::Residual],
        )?;
        self.check_node(start)
    }
}

impl Traversal for Graph {
    fn bfs_search(&self, start: Node) -> Result<Bfs> {
        self.require_searchable("bfs", start)?;
        Ok(Bfs::new(self, start))
    }

    fn dfs_search(&self, start: Node) -> Result<Dfs> {
        self.require_searchable("dfs", start)?;
        Ok(Dfs::new(self, start))
    }

    fn bfs_from_source(&self) -> Result<SearchTree> {
        self.bfs(self.resolve_source("bfs", None)?)
    }

    fn dfs_from_source(&self) -> Result<SearchTree> {
        self.dfs(self.resolve_source("dfs", None)?)
    }

    fn topological_order(&self) -> Result<TopologicalOrder> {
        self.require_kind("topological_order", "directed", &[GraphKind::Directed])?;

        let n = self.len();
        let mut in_degs = vec![0 as NumArcs; n];
        for Edge(_, v) in self.arcs() {
            in_degs[v as usize] += 1;
        }

        let mut heap = in_degs
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(u, _)| Reverse(u as Node))
            .collect::<BinaryHeap<_>>();

        let mut order = vec![0; n];
        let mut predecessor = vec![None; n];
        let mut tentative = vec![None; n];
        let mut position = 0;

        while let Some(Reverse(u)) = heap.pop() {
            order[u as usize] = position;
            predecessor[u as usize] = tentative[u as usize];
            position += 1;

            for pos in self.out_arcs(u) {
                let v = self.head(pos) as usize;
                tentative[v] = Some(u);
                in_degs[v] -= 1;
                if in_degs[v] == 0 {
                    heap.push(Reverse(v as Node));
                }
            }
        }

        if (position as usize) < n {
            debug!("topological search stopped after {position} of {n} nodes");
            return Err(GraphError::CycleDetected);
        }

        Ok(TopologicalOrder { order, predecessor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    //  / 2
    // 1         4 - 3
    //  \ 0 - 5 /
    fn sample() -> Graph {
        Graph::from_arcs(
            GraphKind::Directed,
            6,
            [(1, 2), (1, 0), (4, 3), (0, 5), (5, 4)],
        )
    }

    #[test]
    fn bfs_order() {
        let graph = sample();
        let tree = graph.bfs(1).unwrap();
        assert_eq!(tree.visit_sequence(), vec![1, 0, 2, 5, 4, 3]);
        assert_eq!(
            tree.order,
            vec![Some(1), Some(0), Some(2), Some(5), Some(4), Some(3)]
        );
        assert_eq!(
            tree.predecessor,
            vec![Some(1), None, Some(1), Some(4), Some(5), Some(0)]
        );
        assert_eq!(tree.predecessor_arc[0], Some(1));
        assert_eq!(tree.rooted_path(3), Some(vec![1, 0, 5, 4, 3]));
        assert_eq!(tree.rooted_arcs(3), Some(vec![1, 3, 4, 2]));
        assert!(tree.is_spanning());

        let tree = graph.bfs(5).unwrap();
        assert_eq!(tree.visit_sequence(), vec![5, 4, 3]);
        assert_eq!(tree.number_reached(), 3);
        assert_eq!(tree.rooted_path(0), None);
        assert_eq!(tree.ranking(), None);
    }

    #[test]
    fn dfs_order() {
        let graph = Graph::from_arcs(
            GraphKind::Directed,
            5,
            [(0, 3), (0, 1), (1, 2), (3, 4), (1, 4)],
        );
        let tree = graph.dfs(0).unwrap();
        assert_eq!(tree.visit_sequence(), vec![0, 1, 2, 4, 3]);
        assert_eq!(
            tree.predecessor,
            vec![None, Some(0), Some(1), Some(0), Some(1)]
        );

        let tree = graph.bfs(0).unwrap();
        assert_eq!(tree.visit_sequence(), vec![0, 1, 3, 2, 4]);
        assert_eq!(tree.predecessor[4], Some(1));
    }

    #[test]
    fn search_skips_saturated_arcs() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2), (0, 2)]);
        graph.set_capacities(vec![1.0, 1.0, 0.0]).unwrap();

        let tree = graph.bfs(0).unwrap();
        assert_eq!(tree.predecessor, vec![None, Some(0), Some(1)]);
        assert_eq!(tree.rooted_arcs(2), Some(vec![0, 1]));
    }

    #[test]
    fn search_requires_directed_graph() {
        let graph = Graph::from_arcs(GraphKind::Undirected, 2, [(0, 1)]);
        assert!(matches!(graph.bfs(0), Err(GraphError::WrongKind { .. })));

        let graph = Graph::from_arcs(GraphKind::Directed, 2, [(0, 1)]);
        assert_eq!(graph.dfs(2), Err(GraphError::NodeNotFound(2)));
        assert_eq!(
            graph.bfs_from_source(),
            Err(GraphError::MissingSource("bfs"))
        );
        assert!(graph.clone().with_source(0).dfs_from_source().is_ok());
    }

    #[test]
    fn lazy_search() {
        let graph = sample();
        let nodes = graph.dfs_search(1).unwrap().map(|d| d.node).collect_vec();
        assert_eq!(nodes, vec![1, 0, 5, 4, 3, 2]);

        let mut search = graph.bfs_search(1).unwrap();
        assert_eq!(
            search.next(),
            Some(Discovery {
                node: 1,
                arc: None,
                predecessor: None
            })
        );
        assert!(search.did_visit_node(1));
        assert!(!search.did_visit_node(0));
        assert_eq!(search.next().map(|d| d.node), Some(0));
    }

    #[test]
    fn topology_rank() {
        let mut graph = Graph::from_arcs(
            GraphKind::Directed,
            7,
            [(2, 0), (1, 0), (0, 3), (0, 4), (0, 5), (3, 6)],
        );

        let topo = graph.topological_order().unwrap();
        assert_eq!(topo.sequence(), vec![1, 2, 0, 3, 4, 5, 6]);
        for Edge(u, v) in graph.arcs() {
            assert!(topo.order[u as usize] < topo.order[v as usize]);
        }
        assert_eq!(topo.predecessor[0], Some(2));
        assert_eq!(topo.predecessor[1], None);
        assert_eq!(topo.predecessor[6], Some(3));

        graph.sort_nodes(&topo.order).unwrap();
        assert!(graph.is_topologically_sorted());

        graph.add_arc(6, 2).unwrap();
        graph.add_arc(2, 6).unwrap();
        assert_eq!(graph.topological_order(), Err(GraphError::CycleDetected));
        assert!(!graph.is_acyclic());
    }
}
