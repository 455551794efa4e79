/*!
# Minimum Spanning Trees

Both algorithms operate on connected undirected graphs with costs.

- **Kruskal** scans the arcs by ascending cost and accepts every arc joining two different
  components. Components are tracked as one label per node; merging two components relabels
  the larger label to the smaller one.
- **Prim** grows a node set from a start node and repeatedly adds the cheapest arc of the cut.
  Since arcs are stored with an orientation, an arc entering the set is reversed in place so that
  every tree arc points from the predecessor to its successor.
*/

use tracing::debug;

use super::*;

/// Provides minimum spanning tree computations on undirected graphs
pub trait SpanningTree {
    /// Returns the positions of the arcs of a minimum spanning tree in the order Kruskal accepts
    /// them. `start` (or the declared source, or node `0`) is used to verify connectivity.
    ///
    /// # Examples
    /// ```
    /// use flowboard::{prelude::*, algo::*};
    ///
    /// let mut graph = Graph::from_arcs(GraphKind::Undirected, 3, [(0, 1), (1, 2), (2, 0)]);
    /// graph.set_costs(vec![3.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(graph.kruskal(None).unwrap(), vec![1, 2]);
    /// ```
    fn kruskal(&self, start: Option<Node>) -> Result<Vec<ArcPos>>;

    /// Returns the predecessor vector of a minimum spanning tree rooted at `start` (or the
    /// declared source, or node `0`).
    ///
    /// Tree arcs that were stored pointing towards the root are reversed in place, which moves
    /// them to the end of the arc list. Afterwards `(predecessor[v], v)` is an arc for every
    /// `v` except the root.
    fn prim(&mut self, start: Option<Node>) -> Result<Vec<Option<Node>>>;

    /// Like [`SpanningTree::prim`] but leaves `self` untouched and returns the reoriented copy
    /// together with the predecessor vector
    fn prim_on_copy(&self, start: Option<Node>) -> Result<(Graph, Vec<Option<Node>>)>;
}

impl Graph {
    /// Validates the input of both algorithms and returns the start node
    fn require_spanning(&self, operation: &'static str, start: Option<Node>) -> Result<Node> {
        self.require_kind(operation, "undirected", &[GraphKind::Undirected])?;
        self.require_costs(operation)?;

        let k = start.or(self.source()).unwrap_or(0);
        self.check_node(k)?;
        if self.undirected_reachable_from(k).contains(&false) {
            return Err(GraphError::Disconnected(k));
        }
        Ok(k)
    }
}

impl SpanningTree for Graph {
    fn kruskal(&self, start: Option<Node>) -> Result<Vec<ArcPos>> {
        self.require_spanning("kruskal", start)?;
        let costs = self.require_costs("kruskal")?;

        let mut order = self.arc_positions().collect::<Vec<_>>();
        order.sort_by(|&a, &b| costs[a as usize].total_cmp(&costs[b as usize]));

        // 0 marks a node that is not part of any component yet
        let mut label = vec![0u32; self.len()];
        let mut next_label = 1;
        let mut tree = Vec::with_capacity(self.len().saturating_sub(1));

        for pos in order {
            if tree.len() + 1 >= self.len() {
                break;
            }

            let Edge(i, j) = self.arc(pos);
            let (li, lj) = (label[i as usize], label[j as usize]);
            match (li, lj) {
                _ if i == j => continue,
                (0, 0) => {
                    label[i as usize] = next_label;
                    label[j as usize] = next_label;
                    next_label += 1;
                }
                (0, l) => label[i as usize] = l,
                (l, 0) => label[j as usize] = l,
                (li, lj) if li != lj => {
                    let (keep, drop) = (li.min(lj), li.max(lj));
                    for l in label.iter_mut().filter(|l| **l == drop) {
                        *l = keep;
                    }
                }
                _ => continue,
            }

            tree.push(pos);
        }

        debug!(
            "kruskal accepted {} arcs of total cost {}",
            tree.len(),
            self.total_arc_set_cost(&tree)?
        );
        Ok(tree)
    }

    fn prim(&mut self, start: Option<Node>) -> Result<Vec<Option<Node>>> {
        let k = self.require_spanning("prim", start)?;

        let mut predecessor = vec![None; self.len()];
        let mut set = vec![k];

        while set.len() < self.len() {
            let costs = self.require_costs("prim")?;
            let pos = self
                .cut_arcs(&set)
                .into_iter()
                .fold(None, |best: Option<ArcPos>, pos| match best {
                    Some(b) if costs[b as usize] <= costs[pos as usize] => Some(b),
                    _ => Some(pos),
                })
                .ok_or(GraphError::Disconnected(k))?;

            let Edge(i, j) = self.arc(pos);
            if set.contains(&i) {
                predecessor[j as usize] = Some(i);
                set.push(j);
            } else {
                self.swap_arc(pos)?;
                predecessor[i as usize] = Some(j);
                set.push(i);
            }
        }

        Ok(predecessor)
    }

    fn prim_on_copy(&self, start: Option<Node>) -> Result<(Graph, Vec<Option<Node>>)> {
        let mut graph = self.clone();
        let predecessor = graph.prim(start)?;
        Ok((graph, predecessor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn small_graph() -> Graph {
        let mut graph = Graph::from_arcs(
            GraphKind::Undirected,
            4,
            [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)],
        );
        graph.set_costs(vec![1.0, 4.0, 2.0, 5.0, 3.0]).unwrap();
        graph
    }

    /// Cheapest arc between the tree nodes `u` and `v` in either direction
    fn tree_arc_cost(graph: &Graph, u: Node, v: Node) -> f64 {
        graph
            .arc_positions()
            .filter(|&pos| graph.arc(pos).normalized() == Edge(u, v).normalized())
            .map(|pos| graph.cost(pos).unwrap())
            .fold(f64::INFINITY, f64::min)
    }

    fn prim_cost(graph: &Graph, predecessor: &[Option<Node>]) -> f64 {
        predecessor
            .iter()
            .enumerate()
            .filter_map(|(v, p)| p.map(|u| tree_arc_cost(graph, u, v as Node)))
            .sum()
    }

    fn brute_force_cost(graph: &Graph) -> f64 {
        let n = graph.len();
        graph
            .arc_positions()
            .combinations(n - 1)
            .filter(|arcs| {
                let tree = Graph::from_arcs(
                    GraphKind::Undirected,
                    n as NumNodes,
                    arcs.iter().map(|&pos| graph.arc(pos)),
                );
                !tree.undirected_reachable_from(0).contains(&false)
            })
            .map(|arcs| graph.total_arc_set_cost(&arcs).unwrap())
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn small_example() {
        let graph = small_graph();
        assert_eq!(brute_force_cost(&graph), 6.0);

        let tree = graph.kruskal(None).unwrap();
        assert_eq!(tree, vec![0, 2, 4]);
        assert_eq!(graph.total_arc_set_cost(&tree), Ok(6.0));

        let mut graph = small_graph();
        let predecessor = graph.prim(None).unwrap();
        assert_eq!(predecessor, vec![None, Some(0), Some(0), Some(2)]);
        assert_eq!(graph.total_tree_cost(&predecessor), Ok(6.0));
        assert_eq!(graph, small_graph());
    }

    #[test]
    fn prim_reverses_arcs_towards_root() {
        let mut graph = small_graph();
        let predecessor = graph.prim(Some(3)).unwrap();
        assert_eq!(predecessor, vec![Some(2), Some(0), Some(3), None]);

        // (2,3) and (0,2) pointed towards the root and were moved to the end
        assert_eq!(graph.arc(3), Edge(3, 2));
        assert_eq!(graph.arc(4), Edge(2, 0));
        assert_eq!(graph.costs(), Some(&[1.0, 4.0, 5.0, 2.0, 3.0][..]));
        assert_eq!(graph.total_tree_cost(&predecessor), Ok(6.0));

        let original = small_graph();
        let (copy, on_copy) = original.prim_on_copy(Some(3)).unwrap();
        assert_eq!(on_copy, predecessor);
        assert_eq!(copy, graph);
        assert_eq!(original, small_graph());
    }

    #[test]
    fn preconditions() {
        let mut graph = Graph::from_arcs(GraphKind::Undirected, 4, [(0, 1), (2, 3)]);
        graph.set_costs(vec![1.0, 1.0]).unwrap();
        assert_eq!(graph.kruskal(None), Err(GraphError::Disconnected(0)));
        assert_eq!(graph.prim(Some(2)), Err(GraphError::Disconnected(2)));

        graph.strip_costs();
        assert!(matches!(
            graph.kruskal(None),
            Err(GraphError::MissingVector {
                vector: ArcVector::Cost,
                ..
            })
        ));

        let mut graph = Graph::from_arcs(GraphKind::Directed, 2, [(0, 1)]);
        graph.set_costs(vec![1.0]).unwrap();
        assert!(matches!(graph.prim(None), Err(GraphError::WrongKind { .. })));
        assert_eq!(graph.kruskal(Some(5)), Err(GraphError::WrongKind {
            operation: "kruskal",
            expected: "undirected",
            found: GraphKind::Directed,
        }));
    }

    #[test]
    fn single_node() {
        let mut graph = Graph::with_nodes(GraphKind::Undirected, 1);
        graph.set_costs(Vec::new()).unwrap();
        assert_eq!(graph.kruskal(None), Ok(Vec::new()));
        assert_eq!(graph.prim(None), Ok(vec![None]));
    }

    #[test]
    fn random_graphs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(41);

        for n in [3, 6, 7] {
            for _ in 0..20 {
                let graph = random_connected(rng, n, n);
                let tree = graph.kruskal(None).unwrap();
                assert_eq!(tree.len(), n as usize - 1);
                let cost = graph.total_arc_set_cost(&tree).unwrap();

                let (reoriented, predecessor) = graph.prim_on_copy(Some(n - 1)).unwrap();
                assert_eq!(predecessor.iter().filter(|p| p.is_none()).count(), 1);
                for (v, p) in predecessor.iter().enumerate() {
                    if let Some(u) = p {
                        assert!(reoriented.arc_position(*u, v as Node).is_ok());
                    }
                }
                assert_eq!(prim_cost(&reoriented, &predecessor), cost);
                assert_eq!(brute_force_cost(&graph), cost);
            }
        }
    }
}
