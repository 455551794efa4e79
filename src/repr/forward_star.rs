/*!
# Forward-Star Graph

[`Graph`] stores nodes, arcs and all per-arc data of a network.

```
use flowboard::prelude::*;

let mut graph = Graph::with_nodes(GraphKind::Directed, 3);
let a = graph.add_arc(0, 1).unwrap();
let b = graph.add_arc(0, 2).unwrap();
graph.set_capacities(vec![4.0, 2.0]).unwrap();

assert_eq!(graph.out_arcs(0).collect::<Vec<_>>(), vec![a, b]);
assert_eq!(graph.capacity(b), Some(2.0));
```
*/

use std::fmt::Display;

use tracing::warn;

use super::*;
use crate::{error::*, ops::*};

/// A single arc record of the forward-star arena
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct ArcRecord {
    pub(super) tail: Node,
    pub(super) head: Node,
    /// Next outgoing arc of `tail`
    pub(super) next: Option<ArcPos>,
}

/// Forward-star graph with optional cost, capacity and flow vectors.
///
/// See the [module documentation](super) for the general layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub(super) kind: GraphKind,
    pub(super) first_out: Vec<Option<ArcPos>>,
    pub(super) last_out: Vec<Option<ArcPos>>,
    pub(super) arcs: Vec<ArcRecord>,
    pub(super) cost: ArcData,
    pub(super) capacity: ArcData,
    pub(super) flow: ArcData,
    /// Empty unless the graph is residual
    pub(super) mirror: Vec<Mirror>,
    pub(super) supply: Vec<f64>,
    pub(super) coords: Vec<Point>,
    pub(super) source: Option<Node>,
    pub(super) sink: Option<Node>,
}

impl GraphNodeOrder for Graph {
    fn number_of_nodes(&self) -> NumNodes {
        self.first_out.len() as NumNodes
    }
}

impl GraphArcOrder for Graph {
    fn number_of_arcs(&self) -> NumArcs {
        self.arcs.len() as NumArcs
    }
}

impl GraphType for Graph {
    fn kind(&self) -> GraphKind {
        self.kind
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<{} graph - {} nodes, {} arcs - c: {}, u: {}, f: {}>",
            self.kind,
            self.number_of_nodes(),
            self.number_of_arcs(),
            self.cost.is_present(),
            self.capacity.is_present(),
            self.flow.is_present()
        )
    }
}

/// Iterator over the outgoing arcs of a node, following the forward-star links
pub struct OutArcs<'a> {
    arcs: &'a [ArcRecord],
    current: Option<ArcPos>,
}

impl Iterator for OutArcs<'_> {
    type Item = ArcPos;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.current?;
        self.current = self.arcs[pos as usize].next;
        Some(pos)
    }
}

impl Graph {
    /// Creates an empty graph of the given kind
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Creates a graph with `n` nodes and no arcs
    pub fn with_nodes(kind: GraphKind, n: NumNodes) -> Self {
        let mut graph = Self::new(kind);
        for _ in 0..n {
            graph.add_node();
        }
        graph
    }

    /// Creates a graph with `n` nodes and the given arcs in order.
    /// ** Panics if an endpoint is `>= n` **
    pub fn from_arcs<I, E>(kind: GraphKind, n: NumNodes, arcs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        let mut graph = Self::with_nodes(kind, n);
        for Edge(u, v) in arcs.into_iter().map(|e| e.into()) {
            assert!(u < n && v < n, "arc ({u},{v}) refers to a node >= {n}");
            graph.push_arc(u, v);
        }
        graph
    }

    /// Changes the kind of the graph.
    ///
    /// Leaving the residual kind drops all mirror links; entering it requires them to exist
    /// (use [`Graph::build_residual`] to obtain a residual graph instead).
    pub fn set_kind(&mut self, kind: GraphKind) -> Result<()> {
        if kind == GraphKind::Residual && self.mirror.len() != self.arcs.len() {
            return Err(GraphError::MissingVector {
                operation: "set_kind",
                vector: ArcVector::Mirror,
            });
        }
        if kind != GraphKind::Residual {
            self.mirror.clear();
        }
        self.kind = kind;
        Ok(())
    }

    /// Returns `Ok` if `u` is a node of the graph
    pub fn check_node(&self, u: Node) -> Result<()> {
        if self.has_node(u) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(u))
        }
    }

    /// Returns `Ok` if `pos` is an arc position of the graph
    pub fn check_arc(&self, pos: ArcPos) -> Result<()> {
        if self.has_arc_position(pos) {
            Ok(())
        } else {
            Err(GraphError::ArcNotFound(pos))
        }
    }

    /// Returns `Ok` if the graph has one of the given kinds
    pub(crate) fn require_kind(
        &self,
        operation: &'static str,
        expected: &'static str,
        kinds: &[GraphKind],
    ) -> Result<()> {
        if kinds.contains(&self.kind) {
            Ok(())
        } else {
            Err(GraphError::WrongKind {
                operation,
                expected,
                found: self.kind,
            })
        }
    }

    /// Returns the cost vector or fails with `MissingVector`
    pub(crate) fn require_costs(&self, operation: &'static str) -> Result<&[f64]> {
        self.cost.as_slice().ok_or(GraphError::MissingVector {
            operation,
            vector: ArcVector::Cost,
        })
    }

    /// Returns the capacity vector or fails with `MissingVector`
    pub(crate) fn require_capacities(&self, operation: &'static str) -> Result<&[f64]> {
        self.capacity.as_slice().ok_or(GraphError::MissingVector {
            operation,
            vector: ArcVector::Capacity,
        })
    }

    /// Returns the flow vector or fails with `MissingVector`
    pub(crate) fn require_flows(&self, operation: &'static str) -> Result<&[f64]> {
        self.flow.as_slice().ok_or(GraphError::MissingVector {
            operation,
            vector: ArcVector::Flow,
        })
    }

    /// Returns the explicitly given node or the declared source
    pub(crate) fn resolve_source(&self, operation: &'static str, s: Option<Node>) -> Result<Node> {
        let s = s.or(self.source).ok_or(GraphError::MissingSource(operation))?;
        self.check_node(s)?;
        Ok(s)
    }

    /// Returns the explicitly given node or the declared sink
    pub(crate) fn resolve_sink(&self, operation: &'static str, t: Option<Node>) -> Result<Node> {
        let t = t.or(self.sink).ok_or(GraphError::MissingSink(operation))?;
        self.check_node(t)?;
        Ok(t)
    }
}

/// Editing
impl Graph {
    /// Adds a node without arcs and returns its id.
    /// The node is placed at `(0, 0)` with supply `0`.
    pub fn add_node(&mut self) -> Node {
        self.first_out.push(None);
        self.last_out.push(None);
        self.supply.push(0.0);
        self.coords.push(Point::default());
        self.number_of_nodes() - 1
    }

    /// Adds the arc `(i, j)` and returns its position.
    ///
    /// All present per-arc vectors are padded with a zero. On a residual graph the new arc has
    /// no partner yet and mirrors itself.
    pub fn add_arc(&mut self, i: Node, j: Node) -> Result<ArcPos> {
        self.check_node(i)?;
        self.check_node(j)?;
        Ok(self.push_arc(i, j))
    }

    /// Appends an arc without validating the endpoints
    pub(crate) fn push_arc(&mut self, i: Node, j: Node) -> ArcPos {
        let pos = self.number_of_arcs();
        self.arcs.push(ArcRecord {
            tail: i,
            head: j,
            next: None,
        });
        self.link(pos);

        self.cost.pad();
        self.capacity.pad();
        self.flow.pad();
        if self.kind == GraphKind::Residual {
            self.mirror.push(Mirror {
                partner: pos,
                direction: Direction::Forward,
            });
        }

        pos
    }

    /// Threads the arc at `pos` into the out-list of its tail (as last element)
    fn link(&mut self, pos: ArcPos) {
        let tail = self.arcs[pos as usize].tail as usize;
        match self.last_out[tail] {
            Some(last) => self.arcs[last as usize].next = Some(pos),
            None => self.first_out[tail] = Some(pos),
        }
        self.last_out[tail] = Some(pos);
    }

    /// Rebuilds all forward-star links by replaying the arcs in position order
    pub(super) fn relink(&mut self) {
        self.first_out.iter_mut().for_each(|x| *x = None);
        self.last_out.iter_mut().for_each(|x| *x = None);
        for pos in 0..self.number_of_arcs() {
            self.arcs[pos as usize].next = None;
            self.link(pos);
        }
    }

    /// Deletes the arc at position `pos`; all later arcs move one position down
    pub fn delete_arc(&mut self, pos: ArcPos) -> Result<()> {
        self.check_arc(pos)?;
        let keep = self.arc_positions().map(|p| p != pos).collect::<Vec<_>>();
        self.retain_arcs(&keep);
        Ok(())
    }

    /// Deletes the first arc `(i, j)` in the out-list of `i`
    pub fn delete_arc_between(&mut self, i: Node, j: Node) -> Result<()> {
        let pos = self.arc_position(i, j)?;
        self.delete_arc(pos)
    }

    /// Deletes node `i` together with all incident arcs.
    /// Every node `u > i` is renamed to `u - 1`.
    pub fn delete_node(&mut self, i: Node) -> Result<()> {
        self.check_node(i)?;

        let keep = self
            .arcs
            .iter()
            .map(|arc| arc.tail != i && arc.head != i)
            .collect::<Vec<_>>();
        self.retain_arcs(&keep);

        let idx = i as usize;
        self.first_out.remove(idx);
        self.last_out.remove(idx);
        self.supply.remove(idx);
        self.coords.remove(idx);

        let shift = |u: Node| if u > i { u - 1 } else { u };
        for arc in &mut self.arcs {
            arc.tail = shift(arc.tail);
            arc.head = shift(arc.head);
        }
        self.source = self.source.filter(|&s| s != i).map(shift);
        self.sink = self.sink.filter(|&t| t != i).map(shift);

        self.relink();
        Ok(())
    }

    /// Keeps exactly the arcs whose flag is set, compacts all per-arc vectors and relinks.
    /// Mirror links pointing to deleted arcs become self-links.
    pub(super) fn retain_arcs(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.arcs.len());

        let mut new_pos = vec![None; keep.len()];
        let mut next = 0;
        for (old, &k) in keep.iter().enumerate() {
            if k {
                new_pos[old] = Some(next);
                next += 1;
            }
        }

        let mut flags = keep.iter();
        self.arcs.retain(|_| flags.next().copied().unwrap_or(false));
        self.cost.retain(keep);
        self.capacity.retain(keep);
        self.flow.retain(keep);

        if !self.mirror.is_empty() {
            self.mirror = self
                .mirror
                .iter()
                .enumerate()
                .filter_map(|(old, mirror)| {
                    let own = new_pos[old]?;
                    Some(match new_pos[mirror.partner as usize] {
                        Some(partner) => Mirror {
                            partner,
                            direction: mirror.direction,
                        },
                        None => Mirror {
                            partner: own,
                            direction: Direction::Forward,
                        },
                    })
                })
                .collect();
        }

        self.relink();
    }

    /// Reverses the arc at `pos` by deleting it and appending `(head, tail)` with the same
    /// cost, capacity and flow. Returns the new position, which is always the last one.
    ///
    /// On a residual graph the mirror link follows the arc.
    pub fn swap_arc(&mut self, pos: ArcPos) -> Result<ArcPos> {
        self.check_arc(pos)?;
        let m = self.number_of_arcs();

        let mut perm = self.arc_positions().filter(|&p| p != pos).collect::<Vec<_>>();
        perm.push(pos);
        self.permute_arcs(&perm);

        let last = (m - 1) as usize;
        let arc = &mut self.arcs[last];
        std::mem::swap(&mut arc.tail, &mut arc.head);
        self.relink();

        Ok(m - 1)
    }

    /// Reorders all arcs such that the new arc at position `k` is the old arc at `perm[k]`.
    /// Per-arc vectors and mirror links are permuted alongside.
    pub(super) fn permute_arcs(&mut self, perm: &[ArcPos]) {
        debug_assert_eq!(perm.len(), self.arcs.len());

        self.arcs = perm.iter().map(|&old| self.arcs[old as usize]).collect();
        self.cost.permute(perm);
        self.capacity.permute(perm);
        self.flow.permute(perm);

        if !self.mirror.is_empty() {
            let mut inverse = vec![0; perm.len()];
            for (new, &old) in perm.iter().enumerate() {
                inverse[old as usize] = new as ArcPos;
            }
            self.mirror = perm
                .iter()
                .map(|&old| {
                    let mirror = self.mirror[old as usize];
                    Mirror {
                        partner: inverse[mirror.partner as usize],
                        direction: mirror.direction,
                    }
                })
                .collect();
        }

        self.relink();
    }
}

/// Per-arc and per-node vectors
impl Graph {
    fn check_len(&self, vector: &'static str, found: usize, expected: usize) -> Result<()> {
        if found == expected {
            Ok(())
        } else {
            Err(GraphError::SizeMismatch {
                vector,
                expected,
                found,
            })
        }
    }

    /// Replaces the cost vector; fails unless it has one entry per arc
    pub fn set_costs(&mut self, costs: Vec<f64>) -> Result<()> {
        self.check_len("cost", costs.len(), self.arcs.len())?;
        self.cost = ArcData::Present(costs);
        Ok(())
    }

    /// Replaces the capacity vector; fails unless it has one entry per arc
    pub fn set_capacities(&mut self, capacities: Vec<f64>) -> Result<()> {
        self.check_len("capacity", capacities.len(), self.arcs.len())?;
        self.capacity = ArcData::Present(capacities);
        Ok(())
    }

    /// Replaces the flow vector; fails unless it has one entry per arc
    pub fn set_flows(&mut self, flows: Vec<f64>) -> Result<()> {
        self.check_len("flow", flows.len(), self.arcs.len())?;
        self.flow = ArcData::Present(flows);
        Ok(())
    }

    /// Replaces the external flows; fails unless it has one entry per node
    pub fn set_supplies(&mut self, supplies: Vec<f64>) -> Result<()> {
        self.check_len("external flow", supplies.len(), self.len())?;
        self.supply = supplies;
        Ok(())
    }

    /// Replaces all node coordinates; fails unless it has one entry per node
    pub fn set_coordinates(&mut self, coords: Vec<Point>) -> Result<()> {
        self.check_len("coordinate", coords.len(), self.len())?;
        self.coords = coords;
        Ok(())
    }

    /// Writes the given values into whichever vectors exist at `pos`.
    /// Values for absent vectors are dropped with a warning.
    pub fn set_arc_data(&mut self, pos: ArcPos, cost: f64, capacity: f64, flow: f64) -> Result<()> {
        self.check_arc(pos)?;
        for (data, value, name) in [
            (&mut self.cost, cost, ArcVector::Cost),
            (&mut self.capacity, capacity, ArcVector::Capacity),
            (&mut self.flow, flow, ArcVector::Flow),
        ] {
            match data.as_mut_slice() {
                Some(values) => values[pos as usize] = value,
                None => warn!(arc = pos, "{name} was not set as the graph has no {name} vector"),
            }
        }
        Ok(())
    }

    /// Removes the cost vector
    pub fn strip_costs(&mut self) {
        self.cost = ArcData::Absent;
    }

    /// Removes the capacity vector
    pub fn strip_capacities(&mut self) {
        self.capacity = ArcData::Absent;
    }

    /// Removes the flow vector
    pub fn strip_flows(&mut self) {
        self.flow = ArcData::Absent;
    }

    /// Resets all external flows to zero
    pub fn strip_supplies(&mut self) {
        self.supply.iter_mut().for_each(|b| *b = 0.0);
    }

    /// Returns the cost vector if present
    pub fn costs(&self) -> Option<&[f64]> {
        self.cost.as_slice()
    }

    /// Returns the capacity vector if present
    pub fn capacities(&self) -> Option<&[f64]> {
        self.capacity.as_slice()
    }

    /// Returns the flow vector if present
    pub fn flows(&self) -> Option<&[f64]> {
        self.flow.as_slice()
    }

    pub fn costs_mut(&mut self) -> Option<&mut [f64]> {
        self.cost.as_mut_slice()
    }

    pub fn capacities_mut(&mut self) -> Option<&mut [f64]> {
        self.capacity.as_mut_slice()
    }

    pub fn flows_mut(&mut self) -> Option<&mut [f64]> {
        self.flow.as_mut_slice()
    }

    /// Returns the cost of the arc at `pos` if costs are present.
    /// ** Panics if `pos >= m` and costs are present **
    pub fn cost(&self, pos: ArcPos) -> Option<f64> {
        self.cost.get(pos)
    }

    /// Returns the capacity of the arc at `pos` if capacities are present.
    /// ** Panics if `pos >= m` and capacities are present **
    pub fn capacity(&self, pos: ArcPos) -> Option<f64> {
        self.capacity.get(pos)
    }

    /// Returns the flow on the arc at `pos` if flows are present.
    /// ** Panics if `pos >= m` and flows are present **
    pub fn flow(&self, pos: ArcPos) -> Option<f64> {
        self.flow.get(pos)
    }

    /// Returns the external flows of all nodes
    pub fn supplies(&self) -> &[f64] {
        &self.supply
    }

    /// Returns the external flow of `u`.
    /// ** Panics if `u >= n` **
    pub fn supply(&self, u: Node) -> f64 {
        self.supply[u as usize]
    }

    /// Sets the external flow of `u`.
    /// ** Panics if `u >= n` **
    pub fn set_supply(&mut self, u: Node, b: f64) {
        self.supply[u as usize] = b;
    }

    /// Returns the coordinates of all nodes
    pub fn coordinates(&self) -> &[Point] {
        &self.coords
    }

    /// Returns the coordinate of `u`.
    /// ** Panics if `u >= n` **
    pub fn coordinate(&self, u: Node) -> Point {
        self.coords[u as usize]
    }

    /// Moves `u` to `p`.
    /// ** Panics if `u >= n` **
    pub fn set_coordinate(&mut self, u: Node, p: Point) {
        self.coords[u as usize] = p;
    }

    /// Returns the declared source node
    pub fn source(&self) -> Option<Node> {
        self.source
    }

    /// Declares (or clears) the source node.
    /// ** Panics if `s >= n` **
    pub fn set_source(&mut self, s: Option<Node>) {
        assert!(s.is_none_or(|s| self.has_node(s)));
        self.source = s;
    }

    /// Returns the declared sink node
    pub fn sink(&self) -> Option<Node> {
        self.sink
    }

    /// Declares (or clears) the sink node.
    /// ** Panics if `t >= n` **
    pub fn set_sink(&mut self, t: Option<Node>) {
        assert!(t.is_none_or(|t| self.has_node(t)));
        self.sink = t;
    }

    /// Checked variant of [`Graph::set_source`]: leaves the source untouched and returns
    /// [`GraphError::NodeNotFound`] if `s` is not a node of the graph
    pub fn try_set_source(&mut self, s: Option<Node>) -> Result<()> {
        if let Some(s) = s {
            self.check_node(s)?;
        }
        self.source = s;
        Ok(())
    }

    /// Checked variant of [`Graph::set_sink`]
    pub fn try_set_sink(&mut self, t: Option<Node>) -> Result<()> {
        if let Some(t) = t {
            self.check_node(t)?;
        }
        self.sink = t;
        Ok(())
    }

    /// Builder-variant of [`Graph::set_source`]
    pub fn with_source(mut self, s: Node) -> Self {
        self.set_source(Some(s));
        self
    }

    /// Builder-variant of [`Graph::set_sink`]
    pub fn with_sink(mut self, t: Node) -> Self {
        self.set_sink(Some(t));
        self
    }
}

/// Arc queries
impl Graph {
    /// Returns the endpoints of the arc at `pos`.
    /// ** Panics if `pos >= m` **
    pub fn arc(&self, pos: ArcPos) -> Edge {
        let arc = &self.arcs[pos as usize];
        Edge(arc.tail, arc.head)
    }

    /// Returns the tail of the arc at `pos`.
    /// ** Panics if `pos >= m` **
    pub fn tail(&self, pos: ArcPos) -> Node {
        self.arcs[pos as usize].tail
    }

    /// Returns the head of the arc at `pos`.
    /// ** Panics if `pos >= m` **
    pub fn head(&self, pos: ArcPos) -> Node {
        self.arcs[pos as usize].head
    }

    /// Returns an iterator over all arcs in position order
    pub fn arcs(&self) -> impl Iterator<Item = Edge> + '_ {
        self.arcs.iter().map(|arc| Edge(arc.tail, arc.head))
    }

    /// Returns the first outgoing arc of `u`.
    /// ** Panics if `u >= n` **
    pub fn first_out_arc(&self, u: Node) -> Option<ArcPos> {
        self.first_out[u as usize]
    }

    /// Returns the last outgoing arc of `u`.
    /// ** Panics if `u >= n` **
    pub fn last_out_arc(&self, u: Node) -> Option<ArcPos> {
        self.last_out[u as usize]
    }

    /// Returns the outgoing arc of the same tail following `pos`.
    /// ** Panics if `pos >= m` **
    pub fn next_out_arc(&self, pos: ArcPos) -> Option<ArcPos> {
        self.arcs[pos as usize].next
    }

    /// Returns an iterator over the positions of all outgoing arcs of `u`.
    /// ** Panics if `u >= n` **
    pub fn out_arcs(&self, u: Node) -> OutArcs<'_> {
        OutArcs {
            arcs: &self.arcs,
            current: self.first_out[u as usize],
        }
    }

    /// Returns the out-degree of `u`.
    /// ** Panics if `u >= n` **
    pub fn out_degree_of(&self, u: Node) -> NumArcs {
        self.out_arcs(u).count() as NumArcs
    }

    /// Returns an iterator over the positions of all incoming arcs of `u` (a scan over all arcs)
    pub fn in_arcs(&self, u: Node) -> impl Iterator<Item = ArcPos> + '_ {
        self.arc_positions()
            .filter(move |&pos| self.arcs[pos as usize].head == u)
    }

    /// Returns an iterator over the positions of all arcs incident to `u` in position order
    pub fn adjacent_arcs(&self, u: Node) -> impl Iterator<Item = ArcPos> + '_ {
        self.arc_positions()
            .filter(move |&pos| self.arc(pos).is_incident_to(u))
    }

    /// Returns all distinct nodes sharing an arc with `u`, ignoring the direction,
    /// in the order they are first seen
    pub fn adjacent_nodes(&self, u: Node) -> Vec<Node> {
        let mut nodes = Vec::new();
        for pos in self.adjacent_arcs(u) {
            let v = self.arc(pos).opposite(u);
            if !nodes.contains(&v) {
                nodes.push(v);
            }
        }
        nodes
    }

    /// Returns the sorted and deduplicated neighbours of every node, ignoring the direction
    pub fn adjacency_lists(&self) -> Vec<Vec<Node>> {
        let mut lists = vec![Vec::new(); self.len()];
        for Edge(u, v) in self.arcs() {
            lists[u as usize].push(v);
            lists[v as usize].push(u);
        }
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }
        lists
    }

    /// Returns the positions of all arcs with exactly one endpoint in `nodes`.
    ///
    /// The arcs are grouped by the node of `nodes` they touch (in the given order):
    /// first its out-arcs leaving the set, then its in-arcs entering the set.
    pub fn cut_arcs(&self, nodes: &[Node]) -> Vec<ArcPos> {
        let mut inside = vec![false; self.len()];
        for &u in nodes {
            inside[u as usize] = true;
        }

        let mut positions = Vec::new();
        for &u in nodes {
            positions.extend(
                self.out_arcs(u)
                    .filter(|&pos| !inside[self.head(pos) as usize]),
            );
            positions.extend(
                self.in_arcs(u)
                    .filter(|&pos| !inside[self.tail(pos) as usize]),
            );
        }
        positions
    }

    /// Returns the position of the first arc `(i, j)` in the out-list of `i`
    pub fn arc_position(&self, i: Node, j: Node) -> Result<ArcPos> {
        self.check_node(i)?;
        self.check_node(j)?;
        self.out_arcs(i)
            .find(|&pos| self.head(pos) == j)
            .ok_or(GraphError::NoSuchArc(i, j))
    }

    /// Returns all data of the arc at `pos`
    pub fn arc_data(&self, pos: ArcPos) -> Result<ArcBundle> {
        self.check_arc(pos)?;
        let arc = &self.arcs[pos as usize];
        Ok(ArcBundle {
            tail: arc.tail,
            head: arc.head,
            next: arc.next,
            cost: self.cost(pos).unwrap_or(f64::NAN),
            capacity: self.capacity(pos).unwrap_or(f64::NAN),
            flow: self.flow(pos).unwrap_or(f64::NAN),
        })
    }

    /// Returns all data of the first arc `(i, j)`
    pub fn arc_data_between(&self, i: Node, j: Node) -> Result<ArcBundle> {
        self.arc_data(self.arc_position(i, j)?)
    }

    /// Returns the mirror links of a residual graph (empty otherwise)
    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirror
    }

    /// Returns the paired reverse arc of `pos` on a residual graph.
    /// ** Panics if `pos >= m` on a residual graph **
    pub fn mirror(&self, pos: ArcPos) -> Option<ArcPos> {
        if self.mirror.is_empty() {
            None
        } else {
            Some(self.mirror[pos as usize].partner)
        }
    }

    /// Returns whether `pos` is an original or a synthetic arc of a residual graph.
    /// ** Panics if `pos >= m` on a residual graph **
    pub fn direction(&self, pos: ArcPos) -> Option<Direction> {
        if self.mirror.is_empty() {
            None
        } else {
            Some(self.mirror[pos as usize].direction)
        }
    }

    /// Returns *true* if flow may be sent along `pos`: either the graph has no capacities
    /// or the capacity of the arc is strictly positive.
    /// ** Panics if `pos >= m` and capacities are present **
    pub fn is_admissible(&self, pos: ArcPos) -> bool {
        self.capacity(pos).is_none_or(|u| u > 0.0)
    }
}
