/*!
# Minimum Cuts

A minimum `s-t` cut is read off a maximum flow: the source side consists of all nodes still
reachable from `s` in the residual graph. The global variant fixes a pivot `s` and solves one
maximum flow problem towards every other node, keeping the cheapest cut.
*/

use tracing::debug;

use super::*;

/// A cut together with the flow certifying its minimality
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut {
    pub source: Node,
    pub sink: Node,
    /// Nodes on the source side in ascending order
    pub source_side: Vec<Node>,
    /// Total capacity of the arcs leaving the source side
    pub capacity: f64,
    /// A maximum flow from `source` to `sink` saturating the cut
    pub flow: Vec<f64>,
}

impl MinCut {
    /// Returns *true* if `u` lies on the source side of the cut
    pub fn contains(&self, u: Node) -> bool {
        self.source_side.binary_search(&u).is_ok()
    }
}

/// Provides minimum cut computations on directed graphs with capacities
pub trait MinCuts {
    /// Computes a minimum `s-t` cut from a maximum flow. The graph is not modified.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2)]);
    /// graph.set_capacities(vec![3.0, 1.0]).unwrap();
    ///
    /// let cut = graph.min_cut_between(0, 2).unwrap();
    /// assert_eq!(cut.source_side, vec![0, 1]);
    /// assert_eq!(cut.capacity, 1.0);
    /// ```
    fn min_cut_between(&self, s: Node, t: Node) -> Result<MinCut>;

    /// Computes a minimum cut between the declared source and sink
    fn min_cut(&self) -> Result<MinCut>;

    /// Computes the cheapest cut that has `pivot` on its source side.
    ///
    /// Without an explicit pivot the declared source is used, or node `0` if there is none.
    /// A pivot without outgoing arcs is replaced by the first node that has some; the call
    /// fails with [`GraphError::NoOutgoingArcs`] if no such node exists.
    fn global_min_cut(&self, pivot: Option<Node>) -> Result<MinCut>;
}

impl Graph {
    fn require_cuttable(&self, operation: &'static str) -> Result<()> {
        self.require_kind(operation, "directed", &[GraphKind::Directed])?;
        self.require_capacities(operation)?;
        Ok(())
    }

    /// Assembles the cut induced by the flow of `network`
    fn cut_from_flow(&self, network: &Graph, s: Node, t: Node) -> Result<MinCut> {
        let residual = network.build_residual()?;
        let reached = residual.reachable_from(s);
        let source_side = self
            .vertices()
            .filter(|&u| reached[u as usize])
            .collect::<Vec<_>>();

        Ok(MinCut {
            source: s,
            sink: t,
            capacity: self.cut_capacity(&source_side)?,
            flow: network.require_flows("min_cut")?.to_vec(),
            source_side,
        })
    }
}

impl MinCuts for Graph {
    fn min_cut_between(&self, s: Node, t: Node) -> Result<MinCut> {
        self.require_cuttable("min_cut")?;

        let mut network = self.clone();
        network.max_flow_between(s, t, MaxFlowAlgorithm::Labeling)?;
        self.cut_from_flow(&network, s, t)
    }

    fn min_cut(&self) -> Result<MinCut> {
        let s = self.resolve_source("min_cut", None)?;
        let t = self.resolve_sink("min_cut", None)?;
        self.min_cut_between(s, t)
    }

    fn global_min_cut(&self, pivot: Option<Node>) -> Result<MinCut> {
        self.require_cuttable("global_min_cut")?;

        let mut s = pivot.or(self.source()).unwrap_or(0);
        self.check_node(s)?;
        if self.out_degree_of(s) == 0 {
            s = self
                .vertices()
                .find(|&u| self.out_degree_of(u) > 0)
                .ok_or(GraphError::NoOutgoingArcs)?;
        }

        let reached = self.reachable_from(s);
        if let Some(t) = self.vertices().find(|&u| !reached[u as usize]) {
            debug!("node {t} is unreachable from {s}, the minimum cut is empty");
            let mut network = self.clone();
            network.set_flows(vec![0.0; self.number_of_arcs() as usize])?;
            return self.cut_from_flow(&network, s, t);
        }

        let mut best: Option<(f64, Node, Graph)> = None;
        for t in self.vertices().filter(|&t| t != s) {
            let mut network = self.clone();
            let value = network.max_flow_between(s, t, MaxFlowAlgorithm::Labeling)?;
            debug!("maximum flow from {s} to {t} is {value}");
            if best.as_ref().is_none_or(|(min, _, _)| value < *min) {
                best = Some((value, t, network));
            }
        }

        let (_, t, network) = best.ok_or(GraphError::NoOutgoingArcs)?;
        self.cut_from_flow(&network, s, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn four_node_example() {
        let graph = four_node_network();

        let cut = graph.min_cut().unwrap();
        assert_eq!(cut.source_side, vec![0, 1]);
        assert_eq!(cut.capacity, 4.0);
        assert_eq!(cut.flow, vec![2.0; 4]);
        assert!(cut.contains(1) && !cut.contains(3));
        assert!(graph.flows().is_none());

        let global = graph.global_min_cut(None).unwrap();
        assert_eq!(global.source_side, vec![0, 1, 3]);
        assert_eq!(global.sink, 2);
        assert_eq!(global.capacity, 2.0);
    }

    #[test]
    fn pivot_selection() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(1, 2), (2, 0)]);
        graph.set_capacities(vec![4.0, 3.0]).unwrap();

        // node 0 has no outgoing arcs, node 1 is used instead
        let cut = graph.global_min_cut(None).unwrap();
        assert_eq!(cut.source, 1);
        assert_eq!(cut.capacity, 3.0);
        assert_eq!(cut.source_side, vec![1, 2]);

        // nothing reaches back to 2 from 0
        let cut = graph.global_min_cut(Some(2)).unwrap();
        assert_eq!(cut.capacity, 0.0);
        assert_eq!(cut.source_side, vec![0, 2]);

        let mut graph = Graph::with_nodes(GraphKind::Directed, 3);
        graph.set_capacities(Vec::new()).unwrap();
        assert_eq!(graph.global_min_cut(None), Err(GraphError::NoOutgoingArcs));
    }

    #[test]
    fn max_flow_min_cut_duality() {
        let rng = &mut Pcg64Mcg::seed_from_u64(17);

        for n in [4, 10, 25] {
            for _ in 0..20 {
                let mut graph = random_network(rng, n, 3 * n);
                if !graph.reachable_from(0)[n as usize - 1] {
                    continue;
                }

                let cut = graph.min_cut().unwrap();
                let value = graph.max_flow(MaxFlowAlgorithm::AugmentingPath).unwrap();
                assert_eq!(cut.capacity, value);
                assert!(cut.contains(0));
                assert!(!cut.contains(n - 1));
            }
        }
    }

    #[test]
    fn global_min_cut_is_minimum() {
        let rng = &mut Pcg64Mcg::seed_from_u64(23);

        for _ in 0..30 {
            let n = 6;
            let graph = random_network(rng, n, 12);
            if graph.out_degree_of(0) == 0 {
                continue;
            }
            let cut = graph.global_min_cut(Some(0)).unwrap();
            assert_eq!(cut.source, 0);
            assert_eq!(graph.cut_capacity(&cut.source_side).unwrap(), cut.capacity);

            // every proper node set containing 0
            let best = (0..(1u32 << (n - 1)) - 1)
                .map(|mask| {
                    let side = (0..n)
                        .filter(|&u| u == 0 || mask & (1 << (u - 1)) != 0)
                        .collect::<Vec<_>>();
                    graph.cut_capacity(&side).unwrap()
                })
                .fold(f64::INFINITY, f64::min);
            assert_eq!(cut.capacity, best);
        }
    }
}
