/*!
# Minimum Cost Flow

Computes a flow that satisfies the external flow (supply) of every node at minimum total cost.
Positive supplies are sources, negative supplies are demands; they have to sum up to zero.

- [`MinCostFlowAlgorithm::CycleCanceling`] starts from any feasible flow, found as a maximum
  flow between an auxiliary super source and super sink, and cancels negative cycles of the
  residual graph until none is left.
- [`MinCostFlowAlgorithm::SuccessiveShortestPaths`] starts from the zero flow and repeatedly
  ships flow from the node with the largest excess to the node with the largest deficit along a
  shortest path with respect to reduced costs. Node potentials keep the reduced costs
  non-negative.
*/

use tracing::debug;

use super::*;

/// Selects the minimum cost flow algorithm
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MinCostFlowAlgorithm {
    CycleCanceling,
    #[default]
    SuccessiveShortestPaths,
}

/// Provides minimum cost flow computations
pub trait MinCostFlow {
    /// Computes a minimum cost flow meeting all external flows, stores it in the flow vector
    /// and returns its total cost.
    ///
    /// Fails if the graph is not directed, lacks costs or capacities, if the external flows do
    /// not sum up to zero or if no flow can satisfy them. The graph is left unchanged on
    /// failure.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2), (0, 2)]);
    /// graph.set_costs(vec![1.0, 1.0, 3.0]).unwrap();
    /// graph.set_capacities(vec![1.0, 1.0, 5.0]).unwrap();
    /// graph.set_supplies(vec![2.0, 0.0, -2.0]).unwrap();
    ///
    /// let cost = graph.min_cost_flow(MinCostFlowAlgorithm::CycleCanceling).unwrap();
    /// assert_eq!(cost, 5.0);
    /// assert_eq!(graph.flows(), Some(&[1.0, 1.0, 1.0][..]));
    /// ```
    fn min_cost_flow(&mut self, algorithm: MinCostFlowAlgorithm) -> Result<f64>;
}

impl MinCostFlow for Graph {
    fn min_cost_flow(&mut self, algorithm: MinCostFlowAlgorithm) -> Result<f64> {
        self.require_kind("min_cost_flow", "directed", &[GraphKind::Directed])?;
        self.require_costs("min_cost_flow")?;
        self.require_capacities("min_cost_flow")?;

        let total: f64 = self.supplies().iter().sum();
        if total.abs() > EPSILON {
            return Err(GraphError::UnbalancedSupply(total));
        }

        let flows = match algorithm {
            MinCostFlowAlgorithm::CycleCanceling => cycle_canceling(self)?,
            MinCostFlowAlgorithm::SuccessiveShortestPaths => successive_shortest_paths(self)?,
        };
        self.set_flows(flows)?;

        let cost = self.total_flow_cost()?;
        debug!("minimum cost flow has cost {cost}");
        Ok(cost)
    }
}

/// Returns the index of the first largest value
fn argmax(values: &[f64]) -> Node {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (u, &x)| {
            if x > best.1 { (u, x) } else { best }
        })
        .0 as Node
}

/// Returns the index of the first smallest value
fn argmin(values: &[f64]) -> Node {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (u, &x)| {
            if x < best.1 { (u, x) } else { best }
        })
        .0 as Node
}

/// Finds a flow meeting all external flows with a maximum flow from a super source connected
/// to every supply node to a super sink connected from every demand node
fn feasible_flow(graph: &Graph) -> Result<Vec<f64>> {
    let m = graph.number_of_arcs() as usize;
    if graph.supplies().iter().all(|&b| b <= EPSILON) {
        return Ok(vec![0.0; m]);
    }

    let mut network = graph.clone();
    let s = network.add_node();
    let t = network.add_node();

    let mut capacities = graph.require_capacities("feasible_flow")?.to_vec();
    for u in graph.vertices() {
        let b = graph.supply(u);
        if b > EPSILON {
            network.add_arc(s, u)?;
            capacities.push(b);
        } else if b < -EPSILON {
            network.add_arc(u, t)?;
            capacities.push(-b);
        }
    }
    network.set_capacities(capacities)?;

    match network.max_flow_between(s, t, MaxFlowAlgorithm::Labeling) {
        Ok(_) => {}
        Err(GraphError::SinkUnreachable { .. }) => return Err(GraphError::InfeasibleSupply),
        Err(e) => return Err(e),
    }

    let flows = network.require_flows("feasible_flow")?;
    let capacities = network.require_capacities("feasible_flow")?;
    if (m..flows.len()).any(|pos| flows[pos] < capacities[pos] - EPSILON) {
        return Err(GraphError::InfeasibleSupply);
    }

    Ok(flows[..m].to_vec())
}

/// Searches a negative cycle of the residual graph, first from `root` and then from every
/// node the previous searches did not reach
fn find_negative_cycle(residual: &Graph, root: Node) -> Result<Option<NegativeCycle>> {
    let mut reached = vec![false; residual.len()];
    let mut start = Some(root);

    while let Some(k) = start {
        let tree = residual.shortest_paths_from(k, ShortestPathAlgorithm::Fifo)?;
        if tree.negative_cycle.is_some() {
            return Ok(tree.negative_cycle);
        }
        for u in residual.vertices().filter(|&u| tree.is_reached(u)) {
            reached[u as usize] = true;
        }
        start = residual.vertices().find(|&u| !reached[u as usize]);
    }

    Ok(None)
}

fn cycle_canceling(graph: &Graph) -> Result<Vec<f64>> {
    let mut network = graph.clone();
    network.set_flows(feasible_flow(graph)?)?;

    let mut residual = network.build_residual()?;
    let root = argmax(graph.supplies());

    let mut cancellations = 0;
    while let Some(cycle) = find_negative_cycle(&residual, root)? {
        let delta = residual.path_capacity(&cycle.arcs)?;
        debug!("cancelling negative cycle {:?} with {delta} units", cycle.nodes);
        residual.augment(&cycle.arcs, delta)?;
        cancellations += 1;
    }
    debug!("no negative cycle left after {cancellations} cancellations");

    let collapsed = residual.collapse_residual()?;
    Ok(collapsed.require_flows("min_cost_flow")?.to_vec())
}

fn successive_shortest_paths(graph: &Graph) -> Result<Vec<f64>> {
    let mut network = graph.clone();
    network.set_flows(vec![0.0; graph.number_of_arcs() as usize])?;

    let mut residual = network.build_residual()?;
    let costs = residual.require_costs("min_cost_flow")?.to_vec();
    let ends = residual.arcs().collect::<Vec<_>>();
    let n = residual.len();

    let mut excess = graph.supplies().to_vec();
    let mut potential = vec![0.0; n];

    while excess.iter().any(|&e| e > EPSILON) {
        let k = argmax(&excess);
        let l = argmin(&excess);

        // reduced costs are non-negative for all arcs with residual capacity
        for (c, (&Edge(i, j), &cost)) in residual
            .costs_mut()
            .into_iter()
            .flatten()
            .zip(ends.iter().zip(&costs))
        {
            *c = cost - potential[i as usize] + potential[j as usize];
        }
        let tree = residual.shortest_paths_from(k, ShortestPathAlgorithm::Fifo)?;

        let (path, is_cycle) = match &tree.negative_cycle {
            Some(cycle) => (cycle.arcs.clone(), true),
            None => {
                for (p, d) in potential.iter_mut().zip(&tree.distance) {
                    if d.is_finite() {
                        *p -= d;
                    }
                }
                (tree.rooted_arcs(l).ok_or(GraphError::InfeasibleSupply)?, false)
            }
        };

        let delta = residual
            .path_capacity(&path)?
            .min(excess[k as usize])
            .min(-excess[l as usize]);
        debug!("shipping {delta} units from {k} to {l} along {} arcs", path.len());
        residual.augment(&path, delta)?;

        if !is_cycle {
            excess[k as usize] -= delta;
            excess[l as usize] += delta;
        }
    }

    if let Some(c) = residual.costs_mut() {
        c.copy_from_slice(&costs);
    }
    let collapsed = residual.collapse_residual()?;
    Ok(collapsed.require_flows("min_cost_flow")?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const ALL: [MinCostFlowAlgorithm; 2] = [
        MinCostFlowAlgorithm::CycleCanceling,
        MinCostFlowAlgorithm::SuccessiveShortestPaths,
    ];

    fn transport_network() -> Graph {
        let mut graph = Graph::from_arcs(
            GraphKind::Directed,
            4,
            [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)],
        );
        graph.set_costs(vec![2.0, 2.0, 1.0, 3.0, 1.0]).unwrap();
        graph.set_capacities(vec![4.0, 2.0, 2.0, 3.0, 5.0]).unwrap();
        graph.set_supplies(vec![4.0, 0.0, 0.0, -4.0]).unwrap();
        graph
    }

    #[test]
    fn transport_example() {
        for algorithm in ALL {
            let mut graph = transport_network();
            assert_eq!(graph.min_cost_flow(algorithm), Ok(14.0));
            assert_eq!(graph.flows(), Some(&[2.0, 2.0, 2.0, 0.0, 4.0][..]));
            assert_meets_supplies(&graph);
        }
    }

    #[test]
    fn negative_cycle_is_cancelled() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(0, 1), (1, 2), (2, 0)]);
        graph.set_costs(vec![-1.0; 3]).unwrap();
        graph.set_capacities(vec![2.0; 3]).unwrap();

        assert_eq!(graph.min_cost_flow(MinCostFlowAlgorithm::CycleCanceling), Ok(-6.0));
        assert_eq!(graph.flows(), Some(&[2.0; 3][..]));
    }

    #[test]
    fn negative_cycle_on_the_way_is_cancelled() {
        // 1 -> 2 -> 1 is a negative cycle reachable from the supply node
        for algorithm in ALL {
            let mut graph =
                Graph::from_arcs(GraphKind::Directed, 4, [(0, 1), (1, 2), (2, 1), (1, 3)]);
            graph.set_costs(vec![1.0, -5.0, 1.0, 1.0]).unwrap();
            graph.set_capacities(vec![1.0, 2.0, 2.0, 1.0]).unwrap();
            graph.set_supplies(vec![1.0, 0.0, 0.0, -1.0]).unwrap();

            assert_eq!(graph.min_cost_flow(algorithm), Ok(-6.0));
            assert_eq!(graph.flows(), Some(&[1.0, 2.0, 2.0, 1.0][..]));
            assert_meets_supplies(&graph);
        }
    }

    #[test]
    fn preconditions() {
        for algorithm in ALL {
            let mut graph = transport_network();
            graph.set_supply(3, -3.0);
            assert_eq!(graph.min_cost_flow(algorithm), Err(GraphError::UnbalancedSupply(1.0)));
            assert!(graph.flows().is_none());

            let mut graph = Graph::from_arcs(GraphKind::Directed, 2, [(0, 1)]);
            graph.set_costs(vec![1.0]).unwrap();
            graph.set_capacities(vec![2.0]).unwrap();
            graph.set_supplies(vec![3.0, -3.0]).unwrap();
            assert_eq!(graph.min_cost_flow(algorithm), Err(GraphError::InfeasibleSupply));
            assert!(graph.flows().is_none());

            graph.strip_costs();
            assert!(matches!(
                graph.min_cost_flow(algorithm),
                Err(GraphError::MissingVector {
                    vector: ArcVector::Cost,
                    ..
                })
            ));

            let mut graph = Graph::from_arcs(GraphKind::Undirected, 2, [(0, 1)]);
            graph.set_costs(vec![1.0]).unwrap();
            graph.set_capacities(vec![2.0]).unwrap();
            assert!(matches!(
                graph.min_cost_flow(algorithm),
                Err(GraphError::WrongKind { .. })
            ));
        }
    }

    #[test]
    fn random_supplies() {
        let rng = &mut Pcg64Mcg::seed_from_u64(31);

        for n in [4, 8, 15] {
            for _ in 0..15 {
                // any flow is feasible for the supplies it induces
                let template = random_network_with_flow(rng, n, 3 * n);
                let flows = template.flows().unwrap().to_vec();
                let mut supplies = vec![0.0; n as usize];
                for (Edge(i, j), f) in template.arcs().zip(&flows) {
                    supplies[i as usize] += f;
                    supplies[j as usize] -= f;
                }
                let mut graph = template.clone();
                graph.strip_flows();
                graph.set_supplies(supplies).unwrap();
                let reference = template.total_flow_cost().unwrap();

                let costs = ALL
                    .iter()
                    .map(|&algorithm| {
                        let mut graph = graph.clone();
                        let cost = graph.min_cost_flow(algorithm).unwrap();
                        assert_meets_supplies(&graph);
                        assert!(cost <= reference + 1e-9);
                        cost
                    })
                    .collect::<Vec<_>>();
                assert!((costs[0] - costs[1]).abs() < 1e-6);
            }
        }
    }
}
