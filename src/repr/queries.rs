//! Reachability, structural predicates and aggregate values of a [`Graph`].

use std::collections::VecDeque;

use super::*;
use crate::{error::*, ops::*};

impl Graph {
    /// Returns for every node whether it can be reached from `k` along directed arcs.
    /// Arcs with non-positive capacity are ignored if the graph has capacities.
    /// ** Panics if `k >= n` **
    pub fn reachable_from(&self, k: Node) -> Vec<bool> {
        let mut reached = vec![false; self.len()];
        reached[k as usize] = true;

        let mut queue = VecDeque::from([k]);
        while let Some(u) = queue.pop_front() {
            for pos in self.out_arcs(u) {
                let v = self.head(pos);
                if !reached[v as usize] && self.is_admissible(pos) {
                    reached[v as usize] = true;
                    queue.push_back(v);
                }
            }
        }

        reached
    }

    /// Returns for every node whether it shares a connected component with `k`,
    /// ignoring arc directions and capacities.
    /// ** Panics if `k >= n` **
    pub fn undirected_reachable_from(&self, k: Node) -> Vec<bool> {
        let neighbors = self.adjacency_lists();
        let mut reached = vec![false; self.len()];
        reached[k as usize] = true;

        let mut queue = VecDeque::from([k]);
        while let Some(u) = queue.pop_front() {
            for &v in &neighbors[u as usize] {
                if !reached[v as usize] {
                    reached[v as usize] = true;
                    queue.push_back(v);
                }
            }
        }

        reached
    }

    /// Returns *true* if the graph is directed and every arc points from a smaller
    /// (or equal) to a larger node
    pub fn is_topologically_sorted(&self) -> bool {
        self.is_directed() && self.arcs().all(|Edge(u, v)| u <= v)
    }

    /// Returns *true* if no arc joins two nodes of the same color.
    /// Uncolored nodes count as one color of their own.
    /// ** Panics if `colors.len() < n` **
    pub fn is_coloring(&self, colors: &[Color]) -> bool {
        self.arcs()
            .all(|Edge(u, v)| colors[u as usize] != colors[v as usize])
    }

    /// Returns the cost of the arc `(i, j)` preferring the first one in the out-list of `i`
    fn cost_between(&self, costs: &[f64], i: Node, j: Node) -> Result<f64> {
        Ok(costs[self.arc_position(i, j)? as usize])
    }

    /// Sums the costs of the arcs `(predecessor[v], v)` of a predecessor tree
    pub fn total_tree_cost(&self, predecessor: &[Option<Node>]) -> Result<f64> {
        let costs = self.require_costs("total_tree_cost")?;
        predecessor
            .iter()
            .enumerate()
            .filter_map(|(v, p)| p.map(|u| (u, v as Node)))
            .try_fold(0.0, |sum, (u, v)| -> Result<f64> {
                Ok(sum + self.cost_between(costs, u, v)?)
            })
    }

    /// Sums the costs of the arcs between consecutive nodes of `path`
    pub fn total_path_cost(&self, path: &[Node]) -> Result<f64> {
        let costs = self.require_costs("total_path_cost")?;
        path.windows(2)
            .try_fold(0.0, |sum, w| -> Result<f64> {
                Ok(sum + self.cost_between(costs, w[0], w[1])?)
            })
    }

    /// Sums the costs of the given arc positions
    pub fn total_arc_set_cost(&self, arcs: &[ArcPos]) -> Result<f64> {
        let costs = self.require_costs("total_arc_set_cost")?;
        arcs.iter().try_fold(0.0, |sum, &pos| -> Result<f64> {
            self.check_arc(pos)?;
            Ok(sum + costs[pos as usize])
        })
    }

    /// Returns the cost of the current flow, i.e. the sum of `cost * flow` over all arcs
    pub fn total_flow_cost(&self) -> Result<f64> {
        let costs = self.require_costs("total_flow_cost")?;
        let flows = self.require_flows("total_flow_cost")?;
        Ok(costs.iter().zip(flows).map(|(c, f)| c * f).sum())
    }

    /// Returns the net flow leaving `s`: outflow minus inflow
    pub fn total_flow_from(&self, s: Node) -> Result<f64> {
        self.check_node(s)?;
        let flows = self.require_flows("total_flow_from")?;
        Ok(self
            .arcs()
            .zip(flows)
            .map(|(Edge(u, v), f)| match (u == s, v == s) {
                (true, false) => *f,
                (false, true) => -*f,
                _ => 0.0,
            })
            .sum())
    }

    /// Returns the total capacity of the arcs leaving the node set `nodes`
    pub fn cut_capacity(&self, nodes: &[Node]) -> Result<f64> {
        let capacities = self.require_capacities("cut_capacity")?;
        let mut inside = vec![false; self.len()];
        for &u in nodes {
            self.check_node(u)?;
            inside[u as usize] = true;
        }

        Ok(self
            .arcs()
            .zip(capacities)
            .filter(|(Edge(u, v), _)| inside[*u as usize] && !inside[*v as usize])
            .map(|(_, cap)| cap)
            .sum())
    }
}
