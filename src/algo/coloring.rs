/*!
# Node Colorings

A *coloring* assigns every node of an undirected graph a color in `1..=k` such that no arc joins
two nodes of the same color. Color [`UNCOLORED`] marks nodes without a color. Loops are ignored.

- [`Colorings::brute_force_coloring`] enumerates all partitions of the nodes and returns a
  coloring with the chromatic number of colors. Only use it on small graphs.
- [`Colorings::greedy_coloring`] builds color classes one after another, always adding the
  uncolored node of largest degree that fits into the current class.
- [`Colorings::tabu_coloring`] and [`Colorings::tabu_precoloring`] start from the greedy coloring
  and repeatedly try to get rid of one color with a [`TabuSearch`]. The first variant minimizes
  the number of conflicting nodes, the second one the number of uncolored nodes.

# Examples
```
use flowboard::{prelude::*, algo::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let graph = Graph::from_arcs(GraphKind::Undirected, 4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
let rng = &mut Pcg64Mcg::seed_from_u64(3);

let coloring = graph.tabu_coloring(rng, &TabuSearch::default()).unwrap();
assert_eq!(coloring.number_of_colors, 2);
assert!(graph.is_coloring(&coloring.colors));
```
*/

use rand::Rng;
use tracing::{debug, warn};

use super::*;

/// Colors of all nodes together with the number of colors used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring {
    pub colors: Vec<Color>,
    pub number_of_colors: Color,
}

impl Coloring {
    fn from_colors(colors: Vec<Color>) -> Self {
        let number_of_colors = colors.iter().copied().max().unwrap_or(UNCOLORED);
        Self {
            colors,
            number_of_colors,
        }
    }
}

/// Parameters of the tabu search used by [`Colorings::tabu_coloring`] and
/// [`Colorings::tabu_precoloring`].
///
/// After a move assigns `color` to `node`, the pair is tabu for `U(0, tenure_spread) +
/// tenure_factor * |conflicts|` iterations. A search with a fixed number of colors stops once it
/// has a valid coloring, found no admissible move or did not improve within `step_limit`
/// iterations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TabuSearch {
    step_limit: usize,
    tenure_spread: f64,
    tenure_factor: f64,
}

impl Default for TabuSearch {
    fn default() -> Self {
        Self {
            step_limit: 100,
            tenure_spread: 9.0,
            tenure_factor: 0.6,
        }
    }
}

impl TabuSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of iterations without improvement after which a round gives up
    pub fn set_step_limit(&mut self, step_limit: usize) {
        self.step_limit = step_limit;
    }

    /// Sets the number of iterations without improvement after which a round gives up
    pub fn step_limit(mut self, step_limit: usize) -> Self {
        self.set_step_limit(step_limit);
        self
    }

    /// Sets the upper bound `b` of the uniform part of the tabu tenure
    pub fn set_tenure_spread(&mut self, b: f64) {
        assert!(b >= 0.0);
        self.tenure_spread = b;
    }

    /// Sets the upper bound `b` of the uniform part of the tabu tenure
    pub fn tenure_spread(mut self, b: f64) -> Self {
        self.set_tenure_spread(b);
        self
    }

    /// Sets the factor `alpha` by which the number of conflicts prolongs the tabu tenure
    pub fn set_tenure_factor(&mut self, alpha: f64) {
        self.tenure_factor = alpha;
    }

    /// Sets the factor `alpha` by which the number of conflicts prolongs the tabu tenure
    pub fn tenure_factor(mut self, alpha: f64) -> Self {
        self.set_tenure_factor(alpha);
        self
    }

    fn tenure<R: Rng>(&self, rng: &mut R, conflicts: usize) -> f64 {
        rng.random::<f64>() * self.tenure_spread + self.tenure_factor * conflicts as f64
    }
}

/// Provides node colorings of undirected graphs
pub trait Colorings {
    /// Returns a coloring with the minimum number of colors by exhaustive enumeration
    fn brute_force_coloring(&self) -> Result<Coloring>;

    /// Returns the coloring of the largest-degree-first greedy heuristic
    fn greedy_coloring(&self) -> Result<Coloring>;

    /// Improves the greedy coloring with a tabu search on conflicting nodes
    fn tabu_coloring<R: Rng>(&self, rng: &mut R, search: &TabuSearch) -> Result<Coloring>;

    /// Improves the greedy coloring with a tabu search on uncolored nodes
    fn tabu_precoloring<R: Rng>(&self, rng: &mut R, search: &TabuSearch) -> Result<Coloring>;
}

/// Neighbours of every node without loops
struct Conflicts {
    neighbors: Vec<Vec<Node>>,
}

impl Conflicts {
    fn new(graph: &Graph) -> Self {
        let mut neighbors = graph.adjacency_lists();
        for (u, list) in neighbors.iter_mut().enumerate() {
            list.retain(|&v| v as usize != u);
        }
        Self { neighbors }
    }

    fn len(&self) -> usize {
        self.neighbors.len()
    }

    fn degree(&self, u: Node) -> usize {
        self.neighbors[u as usize].len()
    }

    fn adjacent(&self, u: Node, v: Node) -> bool {
        self.neighbors[u as usize].binary_search(&v).is_ok()
    }

    /// Returns the number of colored nodes sharing their color with a neighbour
    fn count(&self, colors: &[Color]) -> usize {
        self.neighbors
            .iter()
            .zip(colors)
            .filter(|(list, c)| {
                **c != UNCOLORED && list.iter().any(|&v| colors[v as usize] == **c)
            })
            .count()
    }

    fn is_stable(&self, colors: &[Color]) -> bool {
        !colors.contains(&UNCOLORED) && self.count(colors) == 0
    }
}

/// Advances `colors` to the next restricted growth string, i.e. the next partition of the nodes
/// in which node `i` uses at most one color more than the nodes `0..i`.
/// Returns *false* once all partitions have been enumerated.
fn next_partition(colors: &mut [Color], prefix_max: &mut [Color]) -> bool {
    for i in (1..colors.len()).rev() {
        if colors[i] <= prefix_max[i - 1] {
            colors[i] += 1;
            prefix_max[i] = prefix_max[i - 1].max(colors[i]);
            for j in i + 1..colors.len() {
                colors[j] = 1;
                prefix_max[j] = prefix_max[i];
            }
            return true;
        }
    }
    false
}

/// Reservoir-style acceptance of the `equal`-th move that is as good as the current best one
fn accept_tie<R: Rng>(rng: &mut R, equal: usize) -> bool {
    rng.random::<f64>() > equal as f64 / (equal as f64 + 1.0)
}

impl TabuSearch {
    /// Searches a conflict-free coloring with colors `1..=k` starting from `colors`
    fn search_conflicts<R: Rng>(
        &self,
        rng: &mut R,
        graph: &Conflicts,
        mut colors: Vec<Color>,
        k: Color,
    ) -> Vec<Color> {
        let n = graph.len();
        let mut tenure = vec![0.0; k as usize * n];
        let mut conflicts = graph.count(&colors);
        let mut step = 0;

        loop {
            let mut best_count = conflicts;
            let mut best_move = None;
            let mut equal = 1;

            for node in 0..n {
                let original = colors[node];
                for color in (1..=k).filter(|&c| c != original) {
                    colors[node] = color;
                    let count = graph.count(&colors);
                    let is_tabu = tenure[(color - 1) as usize * n + node] > 0.0;

                    if count == best_count && !is_tabu {
                        if accept_tie(rng, equal) {
                            best_move = Some((node, color));
                        }
                        equal += 1;
                    } else if count < best_count {
                        best_count = count;
                        best_move = Some((node, color));
                        step = 0;
                        equal = 1;
                    }
                }
                colors[node] = original;
            }

            for t in &mut tenure {
                *t -= 1.0;
            }
            if let Some((node, color)) = best_move {
                colors[node] = color;
                tenure[(color - 1) as usize * n + node] = self.tenure(rng, conflicts);
            }

            conflicts = graph.count(&colors);
            step += 1;
            if conflicts == 0 || step > self.step_limit || best_move.is_none() {
                return colors;
            }
        }
    }

    /// Searches a complete coloring with colors `1..=k` starting from the partial coloring
    /// `colors`, in which conflicts are never allowed
    fn search_uncolored<R: Rng>(
        &self,
        rng: &mut R,
        graph: &Conflicts,
        mut colors: Vec<Color>,
        k: Color,
    ) -> Vec<Color> {
        let n = graph.len();
        let mut tenure = vec![0.0; k as usize * n];
        let mut uncolored = colors.iter().filter(|&&c| c == UNCOLORED).count();
        let mut step = 0;

        loop {
            let mut best_count = uncolored;
            let mut best_move = None;
            let mut equal = 1;

            for node in (0..n).filter(|&u| colors[u] == UNCOLORED) {
                for color in 1..=k {
                    // node gets colored, its neighbours of the same color lose theirs
                    let count = uncolored - 1
                        + graph.neighbors[node]
                            .iter()
                            .filter(|&&v| colors[v as usize] == color)
                            .count();
                    let is_tabu = tenure[(color - 1) as usize * n + node] > 0.0;

                    if count == best_count && !is_tabu {
                        if accept_tie(rng, equal) {
                            best_move = Some((node, color));
                        }
                        equal += 1;
                    } else if count < best_count {
                        best_count = count;
                        best_move = Some((node, color));
                        step = 0;
                        equal = 1;
                    }
                }
            }

            for t in &mut tenure {
                *t -= 1.0;
            }
            if let Some((node, color)) = best_move {
                colors[node] = color;
                uncolored -= 1;
                for &v in &graph.neighbors[node] {
                    if colors[v as usize] == color {
                        colors[v as usize] = UNCOLORED;
                        uncolored += 1;
                        tenure[(color - 1) as usize * n + v as usize] =
                            self.tenure(rng, uncolored);
                    }
                }
            }

            step += 1;
            if uncolored == 0 || step > self.step_limit || best_move.is_none() {
                return colors;
            }
        }
    }
}

impl Colorings for Graph {
    fn brute_force_coloring(&self) -> Result<Coloring> {
        self.require_kind("brute_force_coloring", "undirected", &[GraphKind::Undirected])?;
        let graph = Conflicts::new(self);

        let mut colors = vec![1; self.len()];
        let mut prefix_max = vec![1; self.len()];
        let mut best: Option<(Color, Vec<Color>)> = None;

        loop {
            let used = prefix_max.last().copied().unwrap_or(UNCOLORED);
            if best.as_ref().is_none_or(|(k, _)| used < *k) && graph.is_stable(&colors) {
                best = Some((used, colors.clone()));
            }
            if !next_partition(&mut colors, &mut prefix_max) {
                break;
            }
        }

        let coloring = Coloring::from_colors(best.map(|(_, c)| c).unwrap_or_default());
        debug!("chromatic number is {}", coloring.number_of_colors);
        Ok(coloring)
    }

    fn greedy_coloring(&self) -> Result<Coloring> {
        self.require_kind("greedy_coloring", "undirected", &[GraphKind::Undirected])?;
        let graph = Conflicts::new(self);

        let mut colors = vec![UNCOLORED; self.len()];
        for u in self.vertices().filter(|&u| graph.degree(u) == 0) {
            colors[u as usize] = 1;
        }

        let mut remaining = self
            .vertices()
            .filter(|&u| graph.degree(u) > 0)
            .collect::<Vec<_>>();
        let mut color = 1;

        // first node of maximum degree among the candidates
        let pick = |candidates: &[Node]| {
            candidates
                .iter()
                .enumerate()
                .fold(None, |best: Option<(usize, usize)>, (idx, &u)| match best {
                    Some((_, d)) if d >= graph.degree(u) => best,
                    _ => Some((idx, graph.degree(u))),
                })
                .map(|(idx, _)| idx)
        };

        while let Some(idx) = pick(&remaining) {
            let i = remaining.remove(idx);
            colors[i as usize] = color;

            let mut candidates = remaining
                .iter()
                .copied()
                .filter(|&v| !graph.adjacent(i, v))
                .collect::<Vec<_>>();
            while let Some(idx) = pick(&candidates) {
                let j = candidates.remove(idx);
                remaining.retain(|&v| v != j);
                colors[j as usize] = color;
                candidates.retain(|&v| !graph.adjacent(j, v));
            }

            color += 1;
        }

        Ok(Coloring::from_colors(colors))
    }

    fn tabu_coloring<R: Rng>(&self, rng: &mut R, search: &TabuSearch) -> Result<Coloring> {
        let mut best = self.greedy_coloring()?;
        let graph = Conflicts::new(self);

        let mut colors = best.colors.clone();
        let mut k = best.number_of_colors;
        while k > 1 {
            k -= 1;
            for c in colors.iter_mut().filter(|c| **c > k) {
                *c = k;
            }

            colors = search.search_conflicts(rng, &graph, colors, k);
            if !graph.is_stable(&colors) {
                warn!("tabu search could not find a coloring with {k} colors");
                break;
            }
            debug!("tabu search found a coloring with {k} colors");
            best = Coloring::from_colors(colors.clone());
        }

        Ok(best)
    }

    fn tabu_precoloring<R: Rng>(&self, rng: &mut R, search: &TabuSearch) -> Result<Coloring> {
        let mut best = self.greedy_coloring()?;
        let graph = Conflicts::new(self);

        let mut colors = best.colors.clone();
        let mut k = best.number_of_colors;
        while k > 1 {
            k -= 1;
            for c in colors.iter_mut().filter(|c| **c > k) {
                *c = UNCOLORED;
            }

            colors = search.search_uncolored(rng, &graph, colors, k);
            if !graph.is_stable(&colors) {
                warn!("tabu search could not find a coloring with {k} colors");
                break;
            }
            debug!("tabu search found a coloring with {k} colors");
            best = Coloring::from_colors(colors.clone());
        }

        Ok(best)
    }
}
