/*!
# Shortest Paths

Four shortest-path tree algorithms on directed and residual graphs with costs:

| Algorithm                                 | Requirement                      | Negative cycles  |
|-------------------------------------------|----------------------------------|------------------|
| [`ShortestPathAlgorithm::Dag`]            | `tail <= head` for every arc     | n/a              |
| [`ShortestPathAlgorithm::Dijkstra`]       | non-negative costs               | n/a              |
| [`ShortestPathAlgorithm::LabelCorrecting`]| none                             | detected         |
| [`ShortestPathAlgorithm::Fifo`]           | none                             | detected         |

If the graph has capacities, only arcs with positive capacity may be used.

The label-correcting variants certify a negative cycle as soon as the smallest label drops
below `-n * C` where `C` is the largest absolute arc cost: no simple path can be that cheap.
The cycle is then recovered from the predecessor graph and reported through
[`ShortestPathTree::negative_cycle`]; it is not an error.
*/

use std::collections::VecDeque;

use tracing::{trace, warn};

use super::*;

/// Selects the shortest-path algorithm
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ShortestPathAlgorithm {
    /// Single sweep in node order for topologically sorted graphs
    Dag,
    /// Settles the closest unsettled node first; first node by id on ties
    Dijkstra,
    /// Repeatedly relaxes the first arc violating the optimality condition
    LabelCorrecting,
    /// Label-correcting with a FIFO queue of improved nodes
    #[default]
    Fifo,
}

/// A directed cycle of negative total cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeCycle {
    /// The nodes of the cycle in forward order; the first node is repeated at the end
    pub nodes: Vec<Node>,
    /// The arc positions of the cycle, `arcs[i]` joins `nodes[i]` and `nodes[i + 1]`
    pub arcs: Vec<ArcPos>,
}

/// Result of a shortest-path computation
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    pub source: Node,
    /// Distance labels; `+inf` for unreached nodes
    pub distance: Vec<f64>,
    /// Predecessor of every node; `None` for the source and unreached nodes
    pub predecessor: Vec<Option<Node>>,
    /// Arc through which every node received its label
    pub predecessor_arc: Vec<Option<ArcPos>>,
    /// Set if a negative cycle was detected. The labels are not optimal in this case.
    pub negative_cycle: Option<NegativeCycle>,
}

impl ShortestPathTree {
    /// Returns *true* if a negative cycle was detected
    pub fn has_negative_cycle(&self) -> bool {
        self.negative_cycle.is_some()
    }

    /// Returns *true* if `u` received a finite label.
    /// ** Panics if `u >= n` **
    pub fn is_reached(&self, u: Node) -> bool {
        self.distance[u as usize].is_finite()
    }

    /// Returns the path `source, .., t` of the tree or `None` if `t` is unreached
    /// (or its predecessors run into a cycle).
    /// ** Panics if `t >= n` **
    pub fn rooted_path(&self, t: Node) -> Option<Vec<Node>> {
        walk_back(&self.predecessor, &self.predecessor_arc, self.source, t).map(|(nodes, _)| nodes)
    }

    /// Like [`ShortestPathTree::rooted_path`] but returns the arc positions.
    /// ** Panics if `t >= n` **
    pub fn rooted_arcs(&self, t: Node) -> Option<Vec<ArcPos>> {
        walk_back(&self.predecessor, &self.predecessor_arc, self.source, t).map(|(_, arcs)| arcs)
    }
}

/// Distance labels under construction
struct Labels<'a> {
    graph: &'a Graph,
    costs: &'a [f64],
    distance: Vec<f64>,
    predecessor: Vec<Option<Node>>,
    predecessor_arc: Vec<Option<ArcPos>>,
}

impl<'a> Labels<'a> {
    fn new(graph: &'a Graph, costs: &'a [f64], source: Node) -> Self {
        let n = graph.len();
        let mut distance = vec![f64::INFINITY; n];
        distance[source as usize] = 0.0;
        Self {
            graph,
            costs,
            distance,
            predecessor: vec![None; n],
            predecessor_arc: vec![None; n],
        }
    }

    /// Returns *true* if `pos` is admissible and `d[head] > d[tail] + c[pos]`
    fn violates(&self, pos: ArcPos) -> bool {
        let Edge(i, j) = self.graph.arc(pos);
        self.graph.is_admissible(pos)
            && self.distance[j as usize] > self.distance[i as usize] + self.costs[pos as usize]
    }

    /// Corrects the label of the head of `pos` if the arc violates the optimality condition
    fn relax(&mut self, pos: ArcPos) -> bool {
        if !self.violates(pos) {
            return false;
        }
        let Edge(i, j) = self.graph.arc(pos);
        self.distance[j as usize] = self.distance[i as usize] + self.costs[pos as usize];
        self.predecessor[j as usize] = Some(i);
        self.predecessor_arc[j as usize] = Some(pos);
        trace!("label of {j} corrected to {}", self.distance[j as usize]);
        true
    }

    /// Returns the first node with the smallest label
    fn argmin(&self) -> Node {
        self.distance
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(u, _)| u as Node)
    }

    /// Returns *true* if some label is below `-n * C`
    fn certifies_negative_cycle(&self, bound: f64) -> bool {
        self.distance[self.argmin() as usize] < bound
    }

    /// Recovers a cycle of the predecessor graph reached from the node with the smallest label
    fn negative_cycle(&self) -> Option<NegativeCycle> {
        let n = self.distance.len();
        let mut seen = vec![false; n];
        let mut chain = Vec::new();

        let mut v = self.argmin();
        while !seen[v as usize] {
            seen[v as usize] = true;
            chain.push(v);
            v = self.predecessor[v as usize]?;
        }
        chain.push(v);

        // drop the part of the chain leading into the cycle
        let start = chain.iter().position(|&u| u == v)?;
        let mut nodes = chain.split_off(start);
        nodes.reverse();

        let arcs = nodes
            .windows(2)
            .map(|w| self.predecessor_arc[w[1] as usize])
            .collect::<Option<Vec<_>>>()?;

        Some(NegativeCycle { nodes, arcs })
    }

    fn into_tree(self, source: Node, negative_cycle: Option<NegativeCycle>) -> ShortestPathTree {
        ShortestPathTree {
            source,
            distance: self.distance,
            predecessor: self.predecessor,
            predecessor_arc: self.predecessor_arc,
            negative_cycle,
        }
    }
}

/// Provides shortest-path tree computations
pub trait ShortestPaths {
    /// Computes a shortest-path tree rooted at `source` with the given algorithm.
    ///
    /// Fails if the graph is undirected, has no costs or if the requirement of the algorithm
    /// (see the module documentation) is violated.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2), (0, 2)]);
    /// graph.set_costs(vec![1.0, 1.0, 5.0]).unwrap();
    ///
    /// let tree = graph.shortest_paths_from(0, ShortestPathAlgorithm::Dijkstra).unwrap();
    /// assert_eq!(tree.distance, vec![0.0, 1.0, 2.0]);
    /// assert_eq!(tree.rooted_path(2), Some(vec![0, 1, 2]));
    /// ```
    fn shortest_paths_from(
        &self,
        source: Node,
        algorithm: ShortestPathAlgorithm,
    ) -> Result<ShortestPathTree>;

    /// Computes a shortest-path tree rooted at the declared source
    fn shortest_paths(&self, algorithm: ShortestPathAlgorithm) -> Result<ShortestPathTree>;
}

impl ShortestPaths for Graph {
    fn shortest_paths_from(
        &self,
        source: Node,
        algorithm: ShortestPathAlgorithm,
    ) -> Result<ShortestPathTree> {
        self.require_kind(
            "shortest_paths",
            "directed or residual",
            &[GraphKind::Directed, GraphKind::Residual],
        )?;
        let costs = self.require_costs("shortest_paths")?;
        self.check_node(source)?;

        match algorithm {
            ShortestPathAlgorithm::Dag => {
                if let Some(pos) = self.arc_positions().find(|&p| self.tail(p) > self.head(p)) {
                    return Err(GraphError::NotTopologicallySorted(pos));
                }
            }
            ShortestPathAlgorithm::Dijkstra => {
                if let Some(pos) = self.arc_positions().find(|&p| costs[p as usize] < 0.0) {
                    return Err(GraphError::NegativeCost(pos));
                }
            }
            _ => {}
        }

        if self.reachable_from(source).contains(&false) {
            warn!("not all nodes are reachable from node {source}");
        }

        let mut labels = Labels::new(self, costs, source);
        let negative_cycle = match algorithm {
            ShortestPathAlgorithm::Dag => {
                dag(&mut labels, source);
                None
            }
            ShortestPathAlgorithm::Dijkstra => {
                dijkstra(&mut labels);
                None
            }
            ShortestPathAlgorithm::LabelCorrecting => label_correcting(&mut labels),
            ShortestPathAlgorithm::Fifo => fifo(&mut labels, source),
        };

        Ok(labels.into_tree(source, negative_cycle))
    }

    fn shortest_paths(&self, algorithm: ShortestPathAlgorithm) -> Result<ShortestPathTree> {
        let source = self.resolve_source("shortest_paths", None)?;
        self.shortest_paths_from(source, algorithm)
    }
}

/// Labels of `-n * C` and below certify a negative cycle
fn cycle_bound(labels: &Labels) -> f64 {
    let max_cost = labels.costs.iter().fold(0.0f64, |acc, c| acc.max(c.abs()));
    -(labels.graph.len() as f64) * max_cost
}

/// Nodes before the source cannot be reached in a topologically sorted graph
fn dag(labels: &mut Labels, source: Node) {
    let graph = labels.graph;
    for u in source..graph.number_of_nodes() {
        for pos in graph.out_arcs(u) {
            labels.relax(pos);
        }
    }
}

fn dijkstra(labels: &mut Labels) {
    let graph = labels.graph;
    let mut settled = vec![false; graph.len()];

    loop {
        let next = labels
            .distance
            .iter()
            .enumerate()
            .filter(|(u, _)| !settled[*u])
            .min_by(|a, b| a.1.total_cmp(b.1));
        let Some((u, d)) = next else {
            break;
        };
        if d.is_infinite() {
            break;
        }

        settled[u] = true;
        for pos in graph.out_arcs(u as Node) {
            labels.relax(pos);
        }
    }
}

fn label_correcting(labels: &mut Labels) -> Option<NegativeCycle> {
    let graph = labels.graph;
    let bound = cycle_bound(labels);

    // arcs are scanned node by node along the out-lists
    let scan = graph
        .vertices()
        .flat_map(|u| graph.out_arcs(u))
        .collect::<Vec<_>>();

    while let Some(&pos) = scan.iter().find(|&&pos| labels.violates(pos)) {
        labels.relax(pos);
        if labels.certifies_negative_cycle(bound) {
            return labels.negative_cycle();
        }
    }

    None
}

fn fifo(labels: &mut Labels, source: Node) -> Option<NegativeCycle> {
    let graph = labels.graph;
    let bound = cycle_bound(labels);

    let mut queued = vec![false; graph.len()];
    let mut queue = VecDeque::from([source]);
    queued[source as usize] = true;

    while let Some(u) = queue.pop_front() {
        queued[u as usize] = false;
        for pos in graph.out_arcs(u) {
            if labels.relax(pos) {
                let v = graph.head(pos) as usize;
                if !queued[v] {
                    queued[v] = true;
                    queue.push_back(v as Node);
                }
            }
        }

        if labels.certifies_negative_cycle(bound) {
            return labels.negative_cycle();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    const ALL: [ShortestPathAlgorithm; 4] = [
        ShortestPathAlgorithm::Dag,
        ShortestPathAlgorithm::Dijkstra,
        ShortestPathAlgorithm::LabelCorrecting,
        ShortestPathAlgorithm::Fifo,
    ];

    fn assert_optimal(graph: &Graph, tree: &ShortestPathTree) {
        let costs = graph.costs().unwrap();
        for pos in graph.arc_positions() {
            let Edge(i, j) = graph.arc(pos);
            if graph.is_admissible(pos) && tree.is_reached(i) {
                assert!(
                    tree.distance[j as usize] <= tree.distance[i as usize] + costs[pos as usize] + 1e-9,
                    "arc ({i},{j}) violates optimality"
                );
            }
        }
        for v in graph.vertices().filter(|&v| tree.is_reached(v)) {
            let path = tree.rooted_path(v).unwrap();
            assert_eq!(path[0], tree.source);
            let arcs = tree.rooted_arcs(v).unwrap();
            assert_eq!(graph.total_arc_set_cost(&arcs).unwrap(), tree.distance[v as usize]);
        }
    }

    #[test]
    fn all_algorithms_agree_on_dag() {
        let mut graph = Graph::from_arcs(
            GraphKind::Directed,
            5,
            [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4), (2, 4)],
        );
        graph.set_costs(vec![2.0, 5.0, 1.0, 6.0, 2.0, 1.0, 7.0]).unwrap();

        for algorithm in ALL {
            let tree = graph.shortest_paths_from(0, algorithm).unwrap();
            assert_eq!(tree.distance, vec![0.0, 2.0, 3.0, 5.0, 6.0], "{algorithm:?}");
            assert_eq!(tree.rooted_path(4), Some(vec![0, 1, 2, 3, 4]));
            assert_eq!(tree.rooted_arcs(4), Some(vec![0, 2, 4, 5]));
            assert!(!tree.has_negative_cycle());
            assert_optimal(&graph, &tree);
        }
    }

    #[test]
    fn capacities_filter_arcs() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2), (0, 2)]);
        graph.set_costs(vec![1.0, 1.0, 5.0]).unwrap();
        graph.set_capacities(vec![1.0, 0.0, 1.0]).unwrap();

        for algorithm in ALL {
            let tree = graph.shortest_paths_from(0, algorithm).unwrap();
            assert_eq!(tree.distance, vec![0.0, 1.0, 5.0]);
            assert_eq!(tree.predecessor, vec![None, Some(0), Some(0)]);
        }
    }

    #[test]
    fn unreachable_nodes_keep_infinite_labels() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 4, [(1, 2), (2, 3)]).with_source(1);
        graph.set_costs(vec![1.0, 1.0]).unwrap();

        for algorithm in ALL {
            let tree = graph.shortest_paths(algorithm).unwrap();
            assert_eq!(tree.distance, vec![f64::INFINITY, 0.0, 1.0, 2.0]);
            assert!(!tree.is_reached(0));
            assert_eq!(tree.rooted_path(0), None);
        }
    }

    #[test]
    fn preconditions() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (2, 1)]);
        assert!(matches!(
            graph.shortest_paths_from(0, ShortestPathAlgorithm::Fifo),
            Err(GraphError::MissingVector { .. })
        ));

        graph.set_costs(vec![1.0, -1.0]).unwrap();
        assert_eq!(
            graph.shortest_paths_from(0, ShortestPathAlgorithm::Dag),
            Err(GraphError::NotTopologicallySorted(1))
        );
        assert_eq!(
            graph.shortest_paths_from(0, ShortestPathAlgorithm::Dijkstra),
            Err(GraphError::NegativeCost(1))
        );
        assert_eq!(
            graph.shortest_paths(ShortestPathAlgorithm::Fifo),
            Err(GraphError::MissingSource("shortest_paths"))
        );

        graph.set_kind(GraphKind::Undirected).unwrap();
        assert!(matches!(
            graph.shortest_paths_from(0, ShortestPathAlgorithm::Fifo),
            Err(GraphError::WrongKind { .. })
        ));
    }

    #[test]
    fn negative_cycle_is_reported() {
        let mut graph = Graph::from_arcs(
            GraphKind::Directed,
            5,
            [(0, 1), (1, 2), (2, 3), (3, 1), (3, 4)],
        );
        graph.set_costs(vec![1.0, 2.0, -4.0, 1.0, 1.0]).unwrap();

        for algorithm in [
            ShortestPathAlgorithm::LabelCorrecting,
            ShortestPathAlgorithm::Fifo,
        ] {
            let tree = graph.shortest_paths_from(0, algorithm).unwrap();
            let cycle = tree.negative_cycle.unwrap();
            assert_eq!(cycle.nodes.first(), cycle.nodes.last());
            assert_eq!(cycle.nodes.len(), 4);
            assert_eq!(cycle.arcs.len(), 3);
            assert!(graph.total_path_cost(&cycle.nodes).unwrap() < 0.0);
            assert_eq!(graph.total_arc_set_cost(&cycle.arcs).unwrap(), -1.0);
            for (k, &pos) in cycle.arcs.iter().enumerate() {
                assert_eq!(graph.arc(pos), Edge(cycle.nodes[k], cycle.nodes[k + 1]));
            }
        }
    }

    #[test]
    fn negative_loop_is_reported() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 2, [(0, 1), (1, 1)]);
        graph.set_costs(vec![3.0, -1.0]).unwrap();

        let tree = graph
            .shortest_paths_from(0, ShortestPathAlgorithm::Fifo)
            .unwrap();
        let cycle = tree.negative_cycle.unwrap();
        assert_eq!(cycle.nodes, vec![1, 1]);
        assert_eq!(cycle.arcs, vec![1]);
    }

    #[test]
    fn random_label_correcting_agrees_with_dijkstra() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);

        for n in [5, 12, 30] {
            for _ in 0..20 {
                let m = rng.random_range(n..4 * n);
                let graph = random_network(rng, n, m);
                let reference = graph
                    .shortest_paths_from(0, ShortestPathAlgorithm::Dijkstra)
                    .unwrap();
                assert_optimal(&graph, &reference);

                for algorithm in [
                    ShortestPathAlgorithm::LabelCorrecting,
                    ShortestPathAlgorithm::Fifo,
                ] {
                    let tree = graph.shortest_paths_from(0, algorithm).unwrap();
                    assert!(!tree.has_negative_cycle());
                    assert_eq!(tree.distance, reference.distance);
                    assert_optimal(&graph, &tree);
                }
            }
        }
    }

    #[test]
    fn random_negative_cycles_are_detected() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);

        for n in [4, 10, 20] {
            for _ in 0..20 {
                let mut graph = random_network(rng, n, 2 * n);
                graph.strip_capacities();

                // inject a negative cycle reachable from 0
                let cycle_len = rng.random_range(2..=n.min(5));
                let before = graph.number_of_arcs();
                for k in 0..cycle_len {
                    graph.add_arc(k, (k + 1) % cycle_len).unwrap();
                }
                let costs = graph.costs_mut().unwrap();
                for pos in before..before + cycle_len {
                    costs[pos as usize] = -20.0;
                }

                for algorithm in [
                    ShortestPathAlgorithm::LabelCorrecting,
                    ShortestPathAlgorithm::Fifo,
                ] {
                    let tree = graph.shortest_paths_from(0, algorithm).unwrap();
                    let cycle = tree.negative_cycle.unwrap();
                    assert_eq!(cycle.nodes.first(), cycle.nodes.last());
                    assert!(graph.total_arc_set_cost(&cycle.arcs).unwrap() < 0.0);
                }
            }
        }
    }
}
