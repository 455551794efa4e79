/*!
# Maximum Flow

Augmenting-path algorithms for the maximum `s-t` flow of a directed graph with capacities.

Both algorithms zero the flow, work on the residual graph and push the bottleneck capacity of
one augmenting path per iteration until the sink becomes unreachable:
- [`MaxFlowAlgorithm::AugmentingPath`] finds every path with a full breadth-first search
  on the arc-sorted residual graph,
- [`MaxFlowAlgorithm::Labeling`] labels the residual graph breadth-first along its out-lists
  and stops as soon as the sink carries a label.

The resulting flow is written into the flow vector of the graph.
The *cheapest bottleneck* of a maximum flow is the cheapest `s-t` path when only saturated arcs
are charged their cost.
*/

use std::collections::VecDeque;

use tracing::debug;

use super::*;

/// Selects the augmenting path search
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MaxFlowAlgorithm {
    /// Breadth-first search tree on the sorted residual graph in every iteration
    AugmentingPath,
    /// Breadth-first labeling that stops once the sink is labeled
    #[default]
    Labeling,
}

/// Repeatedly augments a residual graph along `s-t` paths
struct Augmenter {
    residual: Graph,
    source: Node,
    sink: Node,
    algorithm: MaxFlowAlgorithm,
}

impl Augmenter {
    /// Returns the arcs of the next augmenting path, if the sink is still reachable
    fn find_path(&self) -> Result<Option<Vec<ArcPos>>> {
        match self.algorithm {
            MaxFlowAlgorithm::AugmentingPath => {
                Ok(self.residual.bfs(self.source)?.rooted_arcs(self.sink))
            }
            MaxFlowAlgorithm::Labeling => Ok(self.label()),
        }
    }

    fn label(&self) -> Option<Vec<ArcPos>> {
        let graph = &self.residual;
        let mut labeled = vec![false; graph.len()];
        let mut predecessor_arc = vec![None; graph.len()];
        labeled[self.source as usize] = true;

        let mut queue = VecDeque::from([self.source]);
        while !labeled[self.sink as usize] {
            let Some(i) = queue.pop_front() else {
                break;
            };
            for pos in graph.out_arcs(i) {
                let j = graph.head(pos) as usize;
                if !labeled[j] && graph.is_admissible(pos) {
                    labeled[j] = true;
                    predecessor_arc[j] = Some(pos);
                    queue.push_back(j as Node);
                }
            }
        }

        if !labeled[self.sink as usize] {
            return None;
        }

        let mut path = Vec::new();
        let mut v = self.sink;
        while v != self.source {
            let pos = predecessor_arc[v as usize]?;
            path.push(pos);
            v = graph.tail(pos);
        }
        path.reverse();
        Some(path)
    }

    /// Augments until no path is left and returns the number of augmentations
    fn run(&mut self) -> Result<usize> {
        let mut augmentations = 0;
        while let Some(path) = self.find_path()? {
            let delta = self.residual.path_capacity(&path)?;
            debug!("augmenting {delta} units along {} arcs", path.len());
            self.residual.augment(&path, delta)?;
            augmentations += 1;
        }
        Ok(augmentations)
    }
}

/// Provides maximum flow computations
pub trait MaxFlow {
    /// Computes a maximum flow from `s` to `t`, stores it in the flow vector and returns its
    /// value.
    ///
    /// Fails if the graph is not directed, has no capacities or if `t` cannot be reached from
    /// `s` along arcs with positive capacity. The graph is left unchanged on failure.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2), (0, 2)]);
    /// graph.set_capacities(vec![2.0, 1.0, 1.0]).unwrap();
    ///
    /// let value = graph.max_flow_between(0, 2, MaxFlowAlgorithm::AugmentingPath).unwrap();
    /// assert_eq!(value, 2.0);
    /// assert_eq!(graph.flows(), Some(&[1.0, 1.0, 1.0][..]));
    /// ```
    fn max_flow_between(&mut self, s: Node, t: Node, algorithm: MaxFlowAlgorithm) -> Result<f64>;

    /// Computes a maximum flow between the declared source and sink
    fn max_flow(&mut self, algorithm: MaxFlowAlgorithm) -> Result<f64>;

    /// Returns the cheapest `s-t` path after a maximum flow has been found, where every arc
    /// that is not saturated by the flow is free. The graph itself is not modified.
    ///
    /// Fails with [`GraphError::NegativeCycle`] if negative costs make the path unbounded.
    fn cheapest_bottleneck_between(&self, s: Node, t: Node) -> Result<Vec<Node>>;

    /// Like [`MaxFlow::cheapest_bottleneck_between`] for the declared source and sink
    fn cheapest_bottleneck(&self) -> Result<Vec<Node>>;
}

impl MaxFlow for Graph {
    fn max_flow_between(&mut self, s: Node, t: Node, algorithm: MaxFlowAlgorithm) -> Result<f64> {
        self.require_kind("max_flow", "directed", &[GraphKind::Directed])?;
        self.require_capacities("max_flow")?;
        self.check_node(s)?;
        self.check_node(t)?;
        if s == t {
            return Err(GraphError::SourceIsSink(s));
        }
        if !self.reachable_from(s)[t as usize] {
            return Err(GraphError::SinkUnreachable { source: s, sink: t });
        }

        let mut zero_flow = self.clone();
        zero_flow.set_flows(vec![0.0; self.number_of_arcs() as usize])?;

        let mut augmenter = Augmenter {
            residual: zero_flow.build_residual()?,
            source: s,
            sink: t,
            algorithm,
        };
        let augmentations = augmenter.run()?;

        let collapsed = augmenter.residual.collapse_residual()?;
        let flows = collapsed.require_flows("max_flow")?.to_vec();
        self.set_flows(flows)?;

        let value = self.total_flow_from(s)?;
        debug!("maximum flow {value} from {s} to {t} after {augmentations} augmentations");
        Ok(value)
    }

    fn max_flow(&mut self, algorithm: MaxFlowAlgorithm) -> Result<f64> {
        let s = self.resolve_source("max_flow", None)?;
        let t = self.resolve_sink("max_flow", None)?;
        self.max_flow_between(s, t, algorithm)
    }

    fn cheapest_bottleneck_between(&self, s: Node, t: Node) -> Result<Vec<Node>> {
        self.require_costs("cheapest_bottleneck")?;

        let mut network = self.clone();
        network.max_flow_between(s, t, MaxFlowAlgorithm::Labeling)?;

        let saturated = network
            .require_flows("cheapest_bottleneck")?
            .iter()
            .zip(network.require_capacities("cheapest_bottleneck")?)
            .map(|(f, u)| *f >= u - EPSILON)
            .collect::<Vec<_>>();
        if let Some(costs) = network.costs_mut() {
            for (c, _) in costs.iter_mut().zip(&saturated).filter(|(_, s)| !**s) {
                *c = 0.0;
            }
        }

        let tree = network.shortest_paths_from(s, ShortestPathAlgorithm::Fifo)?;
        if let Some(cycle) = tree.negative_cycle {
            return Err(GraphError::NegativeCycle(cycle.nodes));
        }
        tree.rooted_path(t)
            .ok_or(GraphError::SinkUnreachable { source: s, sink: t })
    }

    fn cheapest_bottleneck(&self) -> Result<Vec<Node>> {
        let s = self.resolve_source("cheapest_bottleneck", None)?;
        let t = self.resolve_sink("cheapest_bottleneck", None)?;
        self.cheapest_bottleneck_between(s, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const ALL: [MaxFlowAlgorithm; 2] = [MaxFlowAlgorithm::AugmentingPath, MaxFlowAlgorithm::Labeling];

    #[test]
    fn four_node_example() {
        for algorithm in ALL {
            let mut graph = four_node_network();
            assert_eq!(graph.max_flow(algorithm), Ok(4.0));
            assert_eq!(graph.flows(), Some(&[2.0, 2.0, 2.0, 2.0][..]));
            assert_eq!(graph.total_flow_from(3), Ok(-4.0));
            assert_feasible_flow(&graph, 0, 3);
        }
    }

    #[test]
    fn existing_flow_is_replaced() {
        let mut graph = four_node_network();
        graph.set_flows(vec![3.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(graph.max_flow(MaxFlowAlgorithm::Labeling), Ok(4.0));
        assert_feasible_flow(&graph, 0, 3);
    }

    #[test]
    fn failures_leave_graph_untouched() {
        let mut graph = four_node_network();
        graph.set_flows(vec![1.0; 4]).unwrap();
        let before = graph.clone();

        assert_eq!(
            graph.max_flow_between(3, 0, MaxFlowAlgorithm::Labeling),
            Err(GraphError::SinkUnreachable { source: 3, sink: 0 })
        );
        assert_eq!(
            graph.max_flow_between(1, 1, MaxFlowAlgorithm::Labeling),
            Err(GraphError::SourceIsSink(1))
        );
        assert_eq!(graph, before);

        graph.strip_capacities();
        assert!(matches!(
            graph.max_flow(MaxFlowAlgorithm::AugmentingPath),
            Err(GraphError::MissingVector {
                vector: ArcVector::Capacity,
                ..
            })
        ));

        let mut graph = Graph::from_arcs(GraphKind::Directed, 2, [(0, 1)]);
        graph.set_capacities(vec![1.0]).unwrap();
        assert_eq!(
            graph.max_flow(MaxFlowAlgorithm::Labeling),
            Err(GraphError::MissingSource("max_flow"))
        );
    }

    #[test]
    fn zero_capacity_blocks_sink() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2)]);
        graph.set_capacities(vec![5.0, 0.0]).unwrap();
        assert!(matches!(
            graph.max_flow_between(0, 2, MaxFlowAlgorithm::Labeling),
            Err(GraphError::SinkUnreachable { .. })
        ));
    }

    #[test]
    fn random_networks() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);

        for n in [4, 10, 25] {
            for _ in 0..20 {
                let graph = random_network(rng, n, 3 * n);
                if !graph.reachable_from(0)[n as usize - 1] {
                    continue;
                }

                let mut values = Vec::new();
                for algorithm in ALL {
                    let mut graph = graph.clone();
                    let value = graph.max_flow(algorithm).unwrap();
                    assert_feasible_flow(&graph, 0, n - 1);
                    assert!((graph.total_flow_from(n - 1).unwrap() + value).abs() < 1e-9);

                    // no augmenting path is left
                    let residual = graph.build_residual().unwrap();
                    assert!(!residual.reachable_from(0)[n as usize - 1]);

                    values.push(value);
                }
                assert_eq!(values[0], values[1]);
            }
        }
    }

    #[test]
    fn cheapest_bottleneck() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 4, [(0, 1), (1, 3), (0, 2), (2, 3)])
            .with_source(0)
            .with_sink(3);
        graph.set_capacities(vec![1.0, 10.0, 1.0, 10.0]).unwrap();
        graph.set_costs(vec![5.0, 1.0, 1.0, 1.0]).unwrap();

        assert_eq!(graph.cheapest_bottleneck(), Ok(vec![0, 2, 3]));
        assert!(graph.flows().is_none());

        graph.strip_costs();
        assert!(matches!(
            graph.cheapest_bottleneck(),
            Err(GraphError::MissingVector {
                vector: ArcVector::Cost,
                ..
            })
        ));
    }
}
