use fxhash::FxHashMap;
use rand::Rng;

use crate::prelude::*;

/// Returns the number of unordered pairs of distinct nodes among `n` nodes
pub fn number_of_pairs(n: NumNodes) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

/// Bijection from `0..(n choose 2)` onto the unordered pairs of distinct nodes.
///
/// Every node `u` is assigned the next `(n - 1)/2` nodes modulo `n` (rounded down for the first
/// half of the nodes and up for the second half if `n` is even). The returned pair is *not*
/// normalized.
pub fn pair_from_index(x: u64, n: u64) -> Edge {
    debug_assert!(x < n * (n - 1) / 2);

    let neighbors = (n - 1) / 2;
    if n & 1 == 1 {
        let u = x / neighbors;
        let v = (u + 1 + x % neighbors) % n;
        return Edge(u as Node, v as Node);
    }

    let half = n / 2;
    let lower = neighbors * half;
    if x < lower {
        let u = x / neighbors;
        let v = (u + 1 + x % neighbors) % n;
        Edge(u as Node, v as Node)
    } else {
        let x = x - lower;
        let u = half + x / half;
        let v = (u + 1 + x % half) % n;
        Edge(u as Node, v as Node)
    }
}

/// Draws `m` distinct unordered node pairs uniformly at random and orients each of them by a fair
/// coin flip. Hence no pair is drawn twice and no loop is produced.
///
/// Sampling without replacement emulates a partial Fisher-Yates shuffle of `0..(n choose 2)`
/// where only displaced entries are stored in a hash map (Batagelj & Brandes, 2005).
pub struct PairSampler<'a, R>
where
    R: Rng,
{
    n: u64,
    rem: u64,
    cur: u64,
    end: u64,
    displaced: FxHashMap<u64, u64>,
    rng: &'a mut R,
}

impl<'a, R> PairSampler<'a, R>
where
    R: Rng,
{
    /// Creates a sampler for `m` pairs among `n` nodes.
    /// ** Panics if `m > n choose 2` (in debug builds) **
    pub fn new(rng: &'a mut R, n: NumNodes, m: NumArcs) -> Self {
        let end = number_of_pairs(n);
        debug_assert!(m as u64 <= end);

        Self {
            n: n as u64,
            rem: m as u64,
            cur: 0,
            end,
            displaced: FxHashMap::with_capacity_and_hasher(m as usize, Default::default()),
            rng,
        }
    }

    fn next_index(&mut self) -> Option<u64> {
        if self.rem == 0 {
            return None;
        }

        let drawn = self.rng.random_range(self.cur..self.end);
        let index = self.displaced.get(&drawn).copied().unwrap_or(drawn);

        // the entry at `cur` leaves the undrawn range and takes the slot of `drawn`
        let current = self.displaced.get(&self.cur).copied().unwrap_or(self.cur);
        self.displaced.insert(drawn, current);

        self.cur += 1;
        self.rem -= 1;
        Some(index)
    }
}

impl<R> Iterator for PairSampler<'_, R>
where
    R: Rng,
{
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = pair_from_index(self.next_index()?, self.n);
        Some(if self.rng.random_bool(0.5) {
            pair
        } else {
            pair.reverse()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rem as usize, Some(self.rem as usize))
    }
}

impl<R> ExactSizeIterator for PairSampler<'_, R> where R: Rng {}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn pair_index_is_bijective() {
        for n in 2..12u64 {
            let pairs = (0..n * (n - 1) / 2)
                .map(|x| pair_from_index(x, n))
                .inspect(|e| assert!(!e.is_loop() && e.0 < n as Node && e.1 < n as Node))
                .map(|e| e.normalized())
                .collect::<FxHashSet<_>>();
            assert_eq!(pairs.len() as u64, n * (n - 1) / 2);
        }
    }

    #[test]
    fn samples_are_distinct() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for (n, m) in [(2, 1), (5, 10), (9, 20), (30, 100)] {
            let sampler = PairSampler::new(rng, n, m);
            assert_eq!(sampler.len(), m as usize);

            let pairs = sampler.map(|e| e.normalized()).collect::<FxHashSet<_>>();
            assert_eq!(pairs.len(), m as usize);
        }

        assert_eq!(PairSampler::new(rng, 0, 0).count(), 0);
        assert_eq!(PairSampler::new(rng, 1, 0).count(), 0);
        assert_eq!(number_of_pairs(0), 0);
        assert_eq!(number_of_pairs(7), 21);
    }
}
