/*!
# Random Networks

[`RandomBoard`] builds random directed or undirected networks with `n` nodes and `m` arcs:
- the arcs are distinct, contain no loops and never both `(i,j)` and `(j,i)`,
- every admissible set of `m` node pairs is equally likely, each pair is oriented by a fair coin,
- costs are optionally drawn uniformly from `[-C, C]` and capacities from `[0, U]`,
  either as integers or as reals.

The generator follows a builder pattern:

```
use flowboard::{prelude::*, gens::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(1);
let graph = RandomBoard::new()
    .nodes(10)
    .arcs(20)
    .cost_bound(5.0)
    .capacity_bound(8.0)
    .generate(rng)
    .unwrap();

assert_eq!(graph.number_of_arcs(), 20);
assert!(graph.costs().unwrap().iter().all(|c| c.abs() <= 5.0 && c.fract() == 0.0));
```

The [`RandomNetwork`] trait provides the same as one-shot constructors on the graph itself.
*/

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use tracing::debug;

use crate::prelude::*;

mod pairs;

pub use pairs::*;

/// Configurable generator for random networks
#[derive(Debug, Copy, Clone)]
pub struct RandomBoard {
    nodes: NumNodes,
    arcs: NumArcs,
    kind: GraphKind,
    cost_bound: Option<f64>,
    capacity_bound: Option<f64>,
    integral: bool,
}

impl Default for RandomBoard {
    fn default() -> Self {
        Self {
            nodes: 0,
            arcs: 0,
            kind: GraphKind::Directed,
            cost_bound: None,
            capacity_bound: None,
            integral: true,
        }
    }
}

impl RandomBoard {
    /// Creates a generator for an empty directed graph with integral values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of nodes
    pub fn set_nodes(&mut self, n: NumNodes) {
        self.nodes = n;
    }

    /// Sets the number of nodes, consuming and returning `self` for chaining
    pub fn nodes(mut self, n: NumNodes) -> Self {
        self.set_nodes(n);
        self
    }

    /// Sets the number of arcs
    pub fn set_arcs(&mut self, m: NumArcs) {
        self.arcs = m;
    }

    /// Sets the number of arcs, consuming and returning `self` for chaining
    pub fn arcs(mut self, m: NumArcs) -> Self {
        self.set_arcs(m);
        self
    }

    /// Sets the kind of the generated graph (directed or undirected)
    pub fn set_kind(&mut self, kind: GraphKind) {
        self.kind = kind;
    }

    /// Sets the kind, consuming and returning `self` for chaining
    pub fn kind(mut self, kind: GraphKind) -> Self {
        self.set_kind(kind);
        self
    }

    /// Attaches costs drawn from `[-c, c]`
    pub fn set_cost_bound(&mut self, c: f64) {
        self.cost_bound = Some(c);
    }

    /// Attaches costs drawn from `[-c, c]`, consuming and returning `self` for chaining
    pub fn cost_bound(mut self, c: f64) -> Self {
        self.set_cost_bound(c);
        self
    }

    /// Attaches capacities drawn from `[0, u]`
    pub fn set_capacity_bound(&mut self, u: f64) {
        self.capacity_bound = Some(u);
    }

    /// Attaches capacities drawn from `[0, u]`, consuming and returning `self` for chaining
    pub fn capacity_bound(mut self, u: f64) -> Self {
        self.set_capacity_bound(u);
        self
    }

    /// Chooses between integral (default) and real costs and capacities.
    /// Integral values use the bounds rounded towards zero.
    pub fn set_integral(&mut self, integral: bool) {
        self.integral = integral;
    }

    /// Chooses integral or real values, consuming and returning `self` for chaining
    pub fn integral(mut self, integral: bool) -> Self {
        self.set_integral(integral);
        self
    }

    /// Draws `m` values uniformly from `[low, high]`
    fn draw_values<R>(
        &self,
        rng: &mut R,
        name: &'static str,
        bound: f64,
        low: f64,
        high: f64,
    ) -> Result<Vec<f64>>
    where
        R: Rng,
    {
        let invalid = GraphError::InvalidBound { name, value: bound };
        let m = self.arcs as usize;
        Ok(if self.integral {
            let dist = Uniform::new_inclusive(low.trunc() as i64, high.trunc() as i64)
                .map_err(|_| invalid)?;
            dist.sample_iter(rng).take(m).map(|x| x as f64).collect()
        } else {
            let dist = Uniform::new_inclusive(low, high).map_err(|_| invalid)?;
            dist.sample_iter(rng).take(m).collect()
        })
    }

    /// Generates a new random graph.
    ///
    /// # Errors
    /// - [`GraphError::WrongKind`] if the kind is residual
    /// - [`GraphError::TooManyArcs`] if `m` exceeds the `n choose 2` available node pairs
    /// - [`GraphError::InvalidBound`] if a bound is negative or not finite
    pub fn generate<R>(&self, rng: &mut R) -> Result<Graph>
    where
        R: Rng,
    {
        if self.kind == GraphKind::Residual {
            return Err(GraphError::WrongKind {
                operation: "random_board",
                expected: "directed or undirected",
                found: self.kind,
            });
        }

        let available = number_of_pairs(self.nodes);
        if self.arcs as u64 > available {
            return Err(GraphError::TooManyArcs {
                requested: self.arcs,
                available,
            });
        }

        for (name, bound) in [("cost", self.cost_bound), ("capacity", self.capacity_bound)] {
            if let Some(value) = bound.filter(|b| !(b.is_finite() && *b >= 0.0)) {
                return Err(GraphError::InvalidBound { name, value });
            }
        }

        let mut graph = Graph::from_arcs(
            self.kind,
            self.nodes,
            PairSampler::new(rng, self.nodes, self.arcs).collect::<Vec<_>>(),
        );

        if let Some(c) = self.cost_bound {
            graph.set_costs(self.draw_values(rng, "cost", c, -c, c)?)?;
        }
        if let Some(u) = self.capacity_bound {
            graph.set_capacities(self.draw_values(rng, "capacity", u, 0.0, u)?)?;
        }

        debug!("generated random network {graph}");
        Ok(graph)
    }
}

/// One-shot constructors for random networks
pub trait RandomNetwork: Sized {
    /// Creates a random graph with `n` nodes and `m` arcs but no costs or capacities
    fn random_graph<R>(rng: &mut R, kind: GraphKind, n: NumNodes, m: NumArcs) -> Result<Self>
    where
        R: Rng;

    /// Creates a random graph with `n` nodes and `m` arcs.
    /// Costs in `[-c, c]` are attached if `c > 0`, capacities in `[0, u]` if `u > 0`.
    fn random_graph_full<R>(
        rng: &mut R,
        kind: GraphKind,
        n: NumNodes,
        m: NumArcs,
        c: f64,
        u: f64,
        integral: bool,
    ) -> Result<Self>
    where
        R: Rng;
}

impl RandomNetwork for Graph {
    fn random_graph<R>(rng: &mut R, kind: GraphKind, n: NumNodes, m: NumArcs) -> Result<Self>
    where
        R: Rng,
    {
        RandomBoard::new().kind(kind).nodes(n).arcs(m).generate(rng)
    }

    fn random_graph_full<R>(
        rng: &mut R,
        kind: GraphKind,
        n: NumNodes,
        m: NumArcs,
        c: f64,
        u: f64,
        integral: bool,
    ) -> Result<Self>
    where
        R: Rng,
    {
        let mut board = RandomBoard::new()
            .kind(kind)
            .nodes(n)
            .arcs(m)
            .integral(integral);
        if c > 0.0 {
            board.set_cost_bound(c);
        }
        if u > 0.0 {
            board.set_capacity_bound(u);
        }
        board.generate(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn assert_simple(graph: &Graph) {
        let mut seen = FxHashSet::default();
        for arc in graph.arcs() {
            assert!(!arc.is_loop());
            assert!(seen.insert(arc.normalized()), "pair {arc} occurs twice");
        }
    }

    #[test]
    fn structure() {
        let rng = &mut Pcg64Mcg::seed_from_u64(5);

        for (n, m) in [(0, 0), (1, 0), (2, 1), (8, 12), (25, 100)] {
            for kind in [GraphKind::Directed, GraphKind::Undirected] {
                let graph = Graph::random_graph(rng, kind, n, m).unwrap();
                assert_eq!(graph.kind(), kind);
                assert_eq!(graph.number_of_nodes(), n);
                assert_eq!(graph.number_of_arcs(), m);
                assert!(graph.costs().is_none() && graph.capacities().is_none());
                assert_simple(&graph);
            }
        }

        // all pairs of a complete graph
        let graph = Graph::random_graph(rng, GraphKind::Directed, 7, 21).unwrap();
        assert_simple(&graph);
        assert!(graph.arcs().any(|e| e.is_normalized()));
        assert!(graph.arcs().any(|e| !e.is_normalized()));
    }

    #[test]
    fn values_respect_bounds() {
        let rng = &mut Pcg64Mcg::seed_from_u64(8);

        let graph = Graph::random_graph_full(rng, GraphKind::Directed, 12, 40, 3.0, 7.5, true)
            .unwrap();
        for (&c, &u) in graph.costs().unwrap().iter().zip(graph.capacities().unwrap()) {
            assert!((-3.0..=3.0).contains(&c) && c.fract() == 0.0);
            assert!((0.0..=7.0).contains(&u) && u.fract() == 0.0);
        }

        let graph = Graph::random_graph_full(rng, GraphKind::Undirected, 12, 40, 3.0, 7.5, false)
            .unwrap();
        let costs = graph.costs().unwrap();
        assert!(costs.iter().all(|c| (-3.0..=3.0).contains(c)));
        assert!(costs.iter().any(|c| c.fract() != 0.0));
        assert!(graph.capacities().unwrap().iter().all(|u| (0.0..=7.5).contains(u)));

        let graph =
            Graph::random_graph_full(rng, GraphKind::Directed, 5, 5, 0.0, 4.0, true).unwrap();
        assert!(graph.costs().is_none());
        assert!(graph.capacities().is_some());
    }

    #[test]
    fn invalid_parameters() {
        let rng = &mut Pcg64Mcg::seed_from_u64(13);

        assert_eq!(
            RandomBoard::new().nodes(4).arcs(7).generate(rng),
            Err(GraphError::TooManyArcs {
                requested: 7,
                available: 6
            })
        );
        assert!(matches!(
            RandomBoard::new().kind(GraphKind::Residual).generate(rng),
            Err(GraphError::WrongKind { .. })
        ));
        assert_eq!(
            RandomBoard::new()
                .nodes(4)
                .arcs(3)
                .capacity_bound(-1.0)
                .generate(rng),
            Err(GraphError::InvalidBound {
                name: "capacity",
                value: -1.0
            })
        );
        assert!(matches!(
            RandomBoard::new().cost_bound(f64::INFINITY).generate(rng),
            Err(GraphError::InvalidBound { name: "cost", .. })
        ));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let board = RandomBoard::new()
            .nodes(15)
            .arcs(30)
            .cost_bound(10.0)
            .capacity_bound(10.0)
            .integral(false);

        let first = board.generate(&mut Pcg64Mcg::seed_from_u64(21)).unwrap();
        let second = board.generate(&mut Pcg64Mcg::seed_from_u64(21)).unwrap();
        assert_eq!(first, second);
    }
}
