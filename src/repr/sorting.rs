//! Reordering arcs and renumbering nodes.

use super::*;
use crate::{error::*, ops::*};

/// Direction in which [`Graph::sort_arcs`] orders the arcs
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl Graph {
    /// Sorts the arcs lexicographically by `(tail, head)`. The sort is stable, so parallel arcs
    /// keep their relative order. All per-arc vectors and mirror links move with their arcs.
    ///
    /// Returns the permutation `perm` with the new arc `k` being the old arc `perm[k]`.
    pub fn sort_arcs(&mut self, order: SortOrder) -> Vec<ArcPos> {
        let mut perm = self.arc_positions().collect::<Vec<_>>();
        match order {
            SortOrder::Ascending => perm.sort_by_key(|&pos| self.arc(pos)),
            SortOrder::Descending => perm.sort_by_key(|&pos| std::cmp::Reverse(self.arc(pos))),
        }
        self.permute_arcs(&perm);
        perm
    }

    /// Renumbers the nodes such that node `u` becomes node `order[u]`.
    ///
    /// `order` must be a permutation of `0..n`, e.g. the ranks of a topological order.
    /// External flows, coordinates, source and sink are relabelled alongside; arc positions
    /// do not change.
    pub fn sort_nodes(&mut self, order: &[Node]) -> Result<()> {
        let n = self.len();
        if order.len() != n {
            return Err(GraphError::SizeMismatch {
                vector: "node order",
                expected: n,
                found: order.len(),
            });
        }
        let mut seen = vec![false; n];
        for &v in order {
            if v as usize >= n || seen[v as usize] {
                return Err(GraphError::NodeNotFound(v));
            }
            seen[v as usize] = true;
        }

        let mut supply = vec![0.0; n];
        let mut coords = vec![Point::default(); n];
        for (u, &v) in order.iter().enumerate() {
            supply[v as usize] = self.supply[u];
            coords[v as usize] = self.coords[u];
        }
        self.supply = supply;
        self.coords = coords;

        for arc in &mut self.arcs {
            arc.tail = order[arc.tail as usize];
            arc.head = order[arc.head as usize];
        }
        self.source = self.source.map(|s| order[s as usize]);
        self.sink = self.sink.map(|t| order[t as usize]);

        self.relink();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn sort_arcs_permutes_data() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(2, 0), (0, 2), (1, 0), (0, 1)]);
        graph.set_costs(vec![1.0, 2.0, 3.0, 4.0]).unwrap();

        let perm = graph.sort_arcs(SortOrder::Ascending);
        assert_eq!(perm, vec![3, 1, 2, 0]);
        assert_eq!(
            graph.arcs().collect_vec(),
            vec![Edge(0, 1), Edge(0, 2), Edge(1, 0), Edge(2, 0)]
        );
        assert_eq!(graph.costs(), Some(&[4.0, 2.0, 3.0, 1.0][..]));
        assert_eq!(graph.out_arcs(0).collect_vec(), vec![0, 1]);

        graph.sort_arcs(SortOrder::Descending);
        assert_eq!(graph.costs(), Some(&[1.0, 3.0, 2.0, 4.0][..]));
    }

    #[test]
    fn sort_arcs_keeps_mirrors() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(1, 2), (0, 1)]);
        graph.set_capacities(vec![2.0, 3.0]).unwrap();
        let mut residual = graph.build_residual().unwrap();

        residual.sort_arcs(SortOrder::Ascending);
        for p in residual.arc_positions() {
            let q = residual.mirror(p).unwrap();
            assert_eq!(residual.mirror(q), Some(p));
            assert_eq!(residual.arc(q), residual.arc(p).reverse());
        }
    }

    #[test]
    fn sort_nodes_relabels() {
        let mut graph = Graph::from_arcs(GraphKind::Directed, 3, [(2, 0), (0, 1)]).with_source(2);
        graph.set_supplies(vec![0.0, -1.0, 1.0]).unwrap();

        graph.sort_nodes(&[1, 2, 0]).unwrap();
        assert_eq!(graph.arcs().collect_vec(), vec![Edge(0, 1), Edge(1, 2)]);
        assert_eq!(graph.supplies(), &[1.0, 0.0, -1.0]);
        assert_eq!(graph.source(), Some(0));
        assert!(graph.is_topologically_sorted());

        assert!(graph.sort_nodes(&[0, 0, 1]).is_err());
        assert!(graph.sort_nodes(&[0, 1]).is_err());
    }
}
