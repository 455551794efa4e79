/*!
# Residual Graphs

A residual graph pairs every arc `p = (i, j)` of a directed flow graph with a synthetic reverse
arc `(j, i)`. The forward arc keeps the *unused* capacity `u[p] - f[p]`, the backward arc holds
the flow `f[p]` as capacity and the negated cost. Pushing `delta` units along a residual arc
moves `delta` capacity from the arc to its mirror.

Forward arcs keep their positions `0..m`, the backward arc of `p` is placed at `m + p`.
*/

use tracing::warn;

use super::*;
use crate::{error::*, ops::*};

impl Graph {
    /// Builds the residual graph of a directed graph with capacities.
    ///
    /// A missing flow vector is treated as the zero flow. The returned graph is an independent
    /// copy; `self` is never modified.
    pub fn build_residual(&self) -> Result<Graph> {
        self.require_kind("build_residual", "directed", &[GraphKind::Directed])?;
        let capacities = self.require_capacities("build_residual")?;

        let m = self.number_of_arcs();
        let flows = match self.flows() {
            Some(flows) => flows.to_vec(),
            None => {
                warn!("graph has no flow vector, building the residual graph of the zero flow");
                vec![0.0; m as usize]
            }
        };

        let mut residual = self.clone();
        residual.kind = GraphKind::Residual;
        residual.flow = ArcData::Absent;
        residual.mirror = (0..m)
            .map(|p| Mirror {
                partner: m + p,
                direction: Direction::Forward,
            })
            .collect();

        let mut residual_capacity = capacities.to_vec();
        for p in 0..m {
            let Edge(i, j) = self.arc(p);
            residual.push_arc(j, i);
            residual.mirror[(m + p) as usize] = Mirror {
                partner: p,
                direction: Direction::Backward,
            };
            residual_capacity[p as usize] -= flows[p as usize];
        }
        residual_capacity.extend_from_slice(&flows);
        residual.capacity = ArcData::Present(residual_capacity);

        if let Some(costs) = residual.cost.as_mut_slice() {
            for p in 0..m as usize {
                costs[m as usize + p] = -costs[p];
            }
        }

        Ok(residual)
    }

    /// Collapses a residual graph back into a directed flow graph.
    ///
    /// Every forward arc regains the capacity held by its mirror, which also becomes its flow.
    /// All backward arcs are dropped; the remaining arcs keep their relative order.
    pub fn collapse_residual(&self) -> Result<Graph> {
        self.require_kind("collapse_residual", "residual", &[GraphKind::Residual])?;
        let capacities = self.require_capacities("collapse_residual")?;

        let mut capacity = capacities.to_vec();
        let mut flow = vec![0.0; capacity.len()];
        let mut keep = vec![true; capacity.len()];

        for (p, mirror) in self.mirror.iter().enumerate() {
            let q = mirror.partner as usize;
            match mirror.direction {
                Direction::Backward => keep[p] = false,
                Direction::Forward if q != p => {
                    capacity[p] += capacities[q];
                    flow[p] = capacities[q];
                }
                Direction::Forward => {}
            }
        }

        let mut graph = self.clone();
        graph.capacity = ArcData::Present(capacity);
        graph.flow = ArcData::Present(flow);
        graph.retain_arcs(&keep);
        graph.mirror.clear();
        graph.kind = GraphKind::Directed;

        Ok(graph)
    }

    /// Returns the bottleneck capacity of the given arcs, `+inf` for an empty set
    pub fn path_capacity(&self, arcs: &[ArcPos]) -> Result<f64> {
        let capacities = self.require_capacities("path_capacity")?;
        arcs.iter().try_fold(f64::INFINITY, |min, &pos| -> Result<f64> {
            self.check_arc(pos)?;
            Ok(min.min(capacities[pos as usize]))
        })
    }

    /// Pushes `delta` units of flow along the given arcs.
    ///
    /// On a residual graph every arc loses `delta` capacity which its mirror gains.
    /// On a directed graph the flow of every arc grows by `delta`.
    pub fn augment(&mut self, arcs: &[ArcPos], delta: f64) -> Result<()> {
        self.require_kind(
            "augment",
            "directed or residual",
            &[GraphKind::Directed, GraphKind::Residual],
        )?;
        for &pos in arcs {
            self.check_arc(pos)?;
        }

        if self.kind == GraphKind::Residual {
            let mirrors = &self.mirror;
            let capacities = self
                .capacity
                .as_mut_slice()
                .ok_or(GraphError::MissingVector {
                    operation: "augment",
                    vector: ArcVector::Capacity,
                })?;
            for &pos in arcs {
                capacities[pos as usize] -= delta;
                let partner = mirrors[pos as usize].partner;
                if partner != pos {
                    capacities[partner as usize] += delta;
                }
            }
        } else {
            let flows = self.flow.as_mut_slice().ok_or(GraphError::MissingVector {
                operation: "augment",
                vector: ArcVector::Flow,
            })?;
            for &pos in arcs {
                flows[pos as usize] += delta;
            }
        }

        Ok(())
    }

    /// Turns the graph into a residual graph by pairing the `k`-th forward arc with the `k`-th
    /// backward arc in position order.
    ///
    /// Fails if `directions` does not hold one entry per arc, if the numbers of forward and
    /// backward arcs differ or if a backward arc is not the reverse of its partner.
    /// The flow vector is dropped; the graph is unchanged on failure.
    pub fn pair_mirrors(&mut self, directions: &[Direction]) -> Result<()> {
        let m = self.arcs.len();
        if directions.len() != m {
            return Err(GraphError::SizeMismatch {
                vector: "mirror",
                expected: m,
                found: directions.len(),
            });
        }

        let (forward, backward): (Vec<ArcPos>, Vec<ArcPos>) =
            (0..m as ArcPos).partition(|&p| directions[p as usize] == Direction::Forward);
        if forward.len() != backward.len() {
            return Err(GraphError::SizeMismatch {
                vector: "backward arc",
                expected: forward.len(),
                found: backward.len(),
            });
        }

        let mut mirror = vec![
            Mirror {
                partner: 0,
                direction: Direction::Forward,
            };
            m
        ];
        for (&p, &q) in forward.iter().zip(&backward) {
            let arc = self.arc(p);
            if self.arc(q) != arc.reverse() {
                return Err(GraphError::NoSuchArc(arc.1, arc.0));
            }
            mirror[p as usize] = Mirror {
                partner: q,
                direction: Direction::Forward,
            };
            mirror[q as usize] = Mirror {
                partner: p,
                direction: Direction::Backward,
            };
        }

        self.mirror = mirror;
        self.flow = ArcData::Absent;
        self.kind = GraphKind::Residual;
        Ok(())
    }
}
