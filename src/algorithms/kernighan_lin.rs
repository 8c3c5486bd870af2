//! Kernighan-Lin bipartitioning
//!
//! Splits a vertex set into two halves of (almost) equal size while keeping
//! the total cost of edges crossing the cut small. The graph is implicit: a
//! vertex list, a connection callback and a cost function. Connections are
//! symmetrized, so directed callers get undirected behaviour.
//!
//! Results are deterministic for a given vertex order. Swap selection and
//! prefix selection both keep the first maximum they encounter.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::cost_cache::CostCache;
use crate::error::{MinerError, MinerResult};

/// Cost of the edge between two vertices. Must be symmetric.
pub trait CostFunction<V> {
    fn cost(&self, a: &V, b: &V) -> f64;
}

impl<V, F> CostFunction<V> for F
where
    F: Fn(&V, &V) -> f64,
{
    fn cost(&self, a: &V, b: &V) -> f64 {
        self(a, b)
    }
}

/// Every pair of vertices costs 1, connected or not
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCost;

impl<V> CostFunction<V> for UnitCost {
    fn cost(&self, _a: &V, _b: &V) -> f64 {
        1.0
    }
}

/// The two sides produced by one bipartitioning call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bipartition<V> {
    pub a: Vec<V>,
    pub b: Vec<V>,
}

impl<V> Bipartition<V> {
    pub fn len(&self) -> usize {
        self.a.len() + self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }

    pub fn into_sides(self) -> [Vec<V>; 2] {
        [self.a, self.b]
    }
}

/// Symmetric adjacency over vertex indices
pub(crate) struct IndexedGraph {
    pub(crate) neighbors: Vec<Vec<usize>>,
}

impl IndexedGraph {
    /// Index `vertices` and collect both directions of every connection.
    /// Connections leaving the vertex set are ignored.
    pub(crate) fn build<V, N, I>(vertices: &[V], connections: N) -> MinerResult<Self>
    where
        V: Eq + Hash,
        N: Fn(&V) -> I,
        I: IntoIterator<Item = V>,
    {
        let mut index: HashMap<&V, usize> = HashMap::with_capacity(vertices.len());
        for (i, vertex) in vertices.iter().enumerate() {
            if index.insert(vertex, i).is_some() {
                return Err(MinerError::InvalidArgument(format!(
                    "vertex at position {} occurs more than once",
                    i
                )));
            }
        }

        let mut sets: Vec<HashSet<usize>> = vec![HashSet::new(); vertices.len()];
        for (i, vertex) in vertices.iter().enumerate() {
            for neighbor in connections(vertex) {
                if let Some(&j) = index.get(&neighbor) {
                    sets[i].insert(j);
                    sets[j].insert(i);
                }
            }
        }

        let neighbors = sets
            .into_iter()
            .map(|set| {
                let mut list: Vec<usize> = set.into_iter().collect();
                list.sort_unstable();
                list
            })
            .collect();

        Ok(Self { neighbors })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    A,
    B,
    Locked,
}

/// Kernighan-Lin bipartitioner
#[derive(Debug, Clone)]
pub struct KernighanLin<C = UnitCost> {
    /// `None` iterates until no improving swap exists
    max_iterations: Option<usize>,
    cost: C,
}

impl KernighanLin<UnitCost> {
    pub fn new() -> Self {
        Self {
            max_iterations: Some(10),
            cost: UnitCost,
        }
    }
}

impl Default for KernighanLin<UnitCost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> KernighanLin<C> {
    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_cost<C2>(self, cost: C2) -> KernighanLin<C2> {
        KernighanLin {
            max_iterations: self.max_iterations,
            cost,
        }
    }

    pub fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    /// Split `vertices` into two sides.
    ///
    /// The initial split is round-robin over `vertices`. Inputs with at most
    /// two vertices return that split untouched.
    pub fn bipartition<V, N, I>(&self, vertices: &[V], connections: N) -> MinerResult<Bipartition<V>>
    where
        V: Clone + Eq + Hash,
        N: Fn(&V) -> I,
        I: IntoIterator<Item = V>,
        C: CostFunction<V>,
    {
        let (a, b) = self.bipartition_indices(vertices, connections)?;
        Ok(Bipartition {
            a: a.into_iter().map(|i| vertices[i].clone()).collect(),
            b: b.into_iter().map(|i| vertices[i].clone()).collect(),
        })
    }

    fn bipartition_indices<V, N, I>(
        &self,
        vertices: &[V],
        connections: N,
    ) -> MinerResult<(Vec<usize>, Vec<usize>)>
    where
        V: Eq + Hash,
        N: Fn(&V) -> I,
        I: IntoIterator<Item = V>,
        C: CostFunction<V>,
    {
        let n = vertices.len();
        let mut a: Vec<usize> = (0..n).step_by(2).collect();
        let mut b: Vec<usize> = (1..n).step_by(2).collect();

        if n <= 2 {
            return Ok((a, b));
        }

        let graph = IndexedGraph::build(vertices, connections)?;
        let mut costs = CostCache::with_capacity(n * 4);
        let mut cost = |x: usize, y: usize| -> f64 {
            costs.get_or_insert_with(x, y, || self.cost.cost(&vertices[x], &vertices[y]))
        };

        // Picks per round: every pick number strictly below n / 2
        let picks = (n - 1) / 2;
        let mut slots = vec![Slot::Locked; n];
        let mut d_values = vec![0.0f64; n];
        let mut rounds = 0usize;

        while self.max_iterations.map_or(true, |max| rounds < max) {
            rounds += 1;

            for &v in &a {
                slots[v] = Slot::A;
            }
            for &v in &b {
                slots[v] = Slot::B;
            }
            let mut remaining_a = a.clone();
            let mut remaining_b = b.clone();

            refresh_d_values(&graph, &slots, &remaining_a, &mut d_values, &mut cost);
            refresh_d_values(&graph, &slots, &remaining_b, &mut d_values, &mut cost);

            let mut swaps: Vec<(usize, usize)> = Vec::with_capacity(picks);
            let mut gains: Vec<f64> = Vec::with_capacity(picks);

            for _ in 0..picks {
                let mut best: Option<(usize, usize, f64)> = None;
                for &x in &remaining_a {
                    for &y in &remaining_b {
                        let gain = d_values[x] + d_values[y] - 2.0 * cost(x, y);
                        if best.map_or(true, |(_, _, g)| gain > g) {
                            best = Some((x, y, gain));
                        }
                    }
                }
                let (x, y, gain) = best.ok_or_else(|| {
                    MinerError::Internal("no maximal swap pair found".into())
                })?;

                swaps.push((x, y));
                gains.push(gain);

                slots[x] = Slot::Locked;
                slots[y] = Slot::Locked;
                remaining_a.retain(|&v| v != x);
                remaining_b.retain(|&v| v != y);

                refresh_d_values(&graph, &slots, &remaining_a, &mut d_values, &mut cost);
                refresh_d_values(&graph, &slots, &remaining_b, &mut d_values, &mut cost);
            }

            let (k, g_max) = best_prefix(&gains)?;
            if g_max <= 0.0 {
                break;
            }

            for &(x, y) in &swaps[..=k] {
                let ai = a.iter().position(|&v| v == x);
                let bi = b.iter().position(|&v| v == y);
                match (ai, bi) {
                    (Some(ai), Some(bi)) => {
                        a[ai] = y;
                        b[bi] = x;
                    }
                    _ => {
                        return Err(MinerError::Internal(
                            "swap candidate missing from its side".into(),
                        ))
                    }
                }
            }
            tracing::trace!("Round {}: swapped {} pairs, gain {}", rounds, k + 1, g_max);
        }

        let stats = costs.stats();
        tracing::debug!(
            "Kernighan-Lin finished after {} rounds ({} vertices, {} cached costs, {:.0}% hits)",
            rounds,
            n,
            stats.entries,
            stats.hit_ratio * 100.0
        );

        Ok((a, b))
    }
}

/// External minus internal cost of each member, counting only vertices that
/// have not been pulled aside this round
fn refresh_d_values<F>(
    graph: &IndexedGraph,
    slots: &[Slot],
    members: &[usize],
    d_values: &mut [f64],
    cost: &mut F,
) where
    F: FnMut(usize, usize) -> f64,
{
    for &v in members {
        let side = slots[v];
        let mut internal = 0.0;
        let mut external = 0.0;
        for &u in &graph.neighbors[v] {
            match slots[u] {
                Slot::Locked => {}
                s if s == side => internal += cost(v, u),
                _ => external += cost(v, u),
            }
        }
        d_values[v] = external - internal;
    }
}

/// Index and value of the largest prefix sum of `gains` (first wins on ties)
fn best_prefix(gains: &[f64]) -> MinerResult<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    let mut running = 0.0;
    for (k, gain) in gains.iter().enumerate() {
        running += gain;
        if best.map_or(true, |(_, g)| running > g) {
            best = Some((k, running));
        }
    }
    best.ok_or_else(|| MinerError::Internal("no gain prefix found".into()))
}

/// Total cost of the edges between `a` and `b`
pub fn cut_cost<V, N, I, C>(a: &[V], b: &[V], connections: N, cost: &C) -> MinerResult<f64>
where
    V: Clone + Eq + Hash,
    N: Fn(&V) -> I,
    I: IntoIterator<Item = V>,
    C: CostFunction<V>,
{
    let vertices: Vec<V> = a.iter().chain(b.iter()).cloned().collect();
    let graph = IndexedGraph::build(&vertices, connections)?;

    let mut total = 0.0;
    for i in 0..a.len() {
        for &j in &graph.neighbors[i] {
            if j >= a.len() {
                total += cost.cost(&vertices[i], &vertices[j]);
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Digraph;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_clusters() -> Digraph<char> {
        Digraph::from_edges(
            "abcdefgh".chars(),
            [
                // Very strong connections between a, b, c, f
                ('a', 'b'),
                ('a', 'c'),
                ('b', 'a'),
                ('b', 'c'),
                ('b', 'f'),
                ('c', 'a'),
                ('c', 'b'),
                ('c', 'f'),
                ('f', 'a'),
                ('f', 'b'),
                ('f', 'c'),
                // Strong connections between d, e, g, h
                ('d', 'e'),
                ('d', 'g'),
                ('d', 'h'),
                ('e', 'g'),
                ('g', 'd'),
                ('g', 'e'),
                ('g', 'h'),
            ],
        )
    }

    fn sorted(side: &[char]) -> String {
        let mut side = side.to_vec();
        side.sort_unstable();
        side.into_iter().collect()
    }

    fn partition(graph: &Digraph<char>, max_iterations: Option<usize>) -> Bipartition<char> {
        KernighanLin::new()
            .with_max_iterations(max_iterations)
            .with_cost(|x: &char, y: &char| graph.edge_count(x, y))
            .bipartition(graph.vertices(), |v| graph.connections(v))
            .unwrap()
    }

    #[test]
    fn test_creates_two_partitions() {
        let graph = two_clusters();
        let result = partition(&graph, Some(10));
        assert_eq!(sorted(&result.a), "degh");
        assert_eq!(sorted(&result.b), "abcf");
    }

    #[test]
    fn test_terminates_without_iteration_limit() {
        let graph = two_clusters();
        let result = partition(&graph, None);
        assert_eq!(sorted(&result.a), "degh");
        assert_eq!(sorted(&result.b), "abcf");
    }

    #[test]
    fn test_zero_iterations_keeps_initial_split() {
        let graph = two_clusters();
        let result = partition(&graph, Some(0));
        assert_eq!(result.a, vec!['a', 'c', 'e', 'g']);
        assert_eq!(result.b, vec!['b', 'd', 'f', 'h']);
    }

    #[test]
    fn test_trivial_inputs() {
        let single = Digraph::from_edges(['a'], []);
        let result = partition(&single, None);
        assert_eq!(result.a, vec!['a']);
        assert!(result.b.is_empty());

        let pair = Digraph::from_edges(['a', 'b'], [('a', 'b')]);
        let result = partition(&pair, None);
        assert_eq!(result.a, vec!['a']);
        assert_eq!(result.b, vec!['b']);

        // Cost and iteration limit are irrelevant below three vertices
        let result = KernighanLin::new()
            .with_max_iterations(None)
            .with_cost(|_: &char, _: &char| -100.0)
            .bipartition(pair.vertices(), |v| pair.connections(v))
            .unwrap();
        assert_eq!(result.a, vec!['a']);
        assert_eq!(result.b, vec!['b']);

        let empty: Vec<char> = Vec::new();
        let result = KernighanLin::new()
            .bipartition(&empty, |_| Vec::new())
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_uneven_list() {
        let graph = Digraph::from_edges("abcde".chars(), [('a', 'b'), ('d', 'e')]);
        let result = partition(&graph, None);
        assert_eq!(sorted(&result.a), "cde");
        assert_eq!(sorted(&result.b), "ab");
    }

    #[test]
    fn test_self_loop_counts_as_internal_cost() {
        // Counted twice, the loop on 0 keeps it in place; only 2 and 3 trade sides
        let graph = Digraph::from_edges(0..5u32, [(3, 2), (4, 3), (3, 4), (0, 0)]);
        assert_eq!(graph.edge_count(&0, &0), 2.0);

        let result = KernighanLin::new()
            .with_max_iterations(None)
            .with_cost(|x: &u32, y: &u32| graph.edge_count(x, y))
            .bipartition(graph.vertices(), |v| graph.connections(v))
            .unwrap();
        assert_eq!(result.a, vec![0, 3, 4]);
        assert_eq!(result.b, vec![1, 2]);
    }

    #[test]
    fn test_unit_cost_on_clusters() {
        let graph = two_clusters();
        let result = KernighanLin::new()
            .bipartition(graph.vertices(), |v| graph.connections(v))
            .unwrap();
        assert_eq!(result.len(), 8);
        assert_eq!(result.a.len(), 4);
        assert_eq!(result.b.len(), 4);
    }

    #[test]
    fn test_rejects_duplicate_vertices() {
        let vertices = vec![1u32, 2, 3, 2];
        let result = KernighanLin::new().bipartition(&vertices, |_| Vec::new());
        assert!(matches!(result, Err(MinerError::InvalidArgument(_))));
    }

    #[test]
    fn test_best_prefix() {
        assert_eq!(best_prefix(&[1.0, 2.0, -4.0]).unwrap(), (1, 3.0));
        assert_eq!(best_prefix(&[-1.0, -2.0]).unwrap(), (0, -1.0));
        // Ties keep the shortest prefix
        assert_eq!(best_prefix(&[2.0, 0.0, 1.0, -1.0]).unwrap(), (2, 3.0));
        assert_eq!(best_prefix(&[2.0, 0.0]).unwrap(), (0, 2.0));
        assert!(matches!(best_prefix(&[]), Err(MinerError::Internal(_))));
    }

    #[test]
    fn test_cut_cost() {
        let graph = two_clusters();
        let cost = |x: &char, y: &char| graph.edge_count(x, y);
        let clustered = cut_cost(&['a', 'b', 'c', 'f'], &['d', 'e', 'g', 'h'], |v| graph.connections(v), &cost).unwrap();
        assert_eq!(clustered, 0.0);

        let initial = cut_cost(&['a', 'c', 'e', 'g'], &['b', 'd', 'f', 'h'], |v| graph.connections(v), &cost).unwrap();
        assert!(initial > 0.0);
    }

    fn random_graph(rng: &mut StdRng) -> Digraph<u32> {
        let n = rng.gen_range(3..20u32);
        let edge_count = rng.gen_range(0..(3 * n));
        let mut edges = Vec::new();
        for _ in 0..edge_count {
            let x = rng.gen_range(0..n);
            let y = rng.gen_range(0..n);
            if x != y {
                edges.push((x, y));
            }
        }
        Digraph::from_edges(0..n, edges)
    }

    #[test]
    fn test_sides_stay_disjoint_and_balanced() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let graph = random_graph(&mut rng);
            let result = KernighanLin::new()
                .with_max_iterations(None)
                .with_cost(|x: &u32, y: &u32| graph.edge_count(x, y))
                .bipartition(graph.vertices(), |v| graph.connections(v))
                .unwrap();

            let n = graph.vertices().len();
            assert_eq!(result.len(), n);
            assert_eq!(result.a.len(), (n + 1) / 2);
            assert_eq!(result.b.len(), n / 2);

            let a: HashSet<u32> = result.a.iter().copied().collect();
            assert!(result.b.iter().all(|v| !a.contains(v)));
        }
    }

    #[test]
    fn test_rounds_never_worsen_cut() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..30 {
            let graph = random_graph(&mut rng);
            let cost = |x: &u32, y: &u32| graph.edge_count(x, y);
            let mut previous = f64::INFINITY;
            for rounds in 0..6 {
                let result = KernighanLin::new()
                    .with_max_iterations(Some(rounds))
                    .with_cost(cost)
                    .bipartition(graph.vertices(), |v| graph.connections(v))
                    .unwrap();
                let cut = cut_cost(&result.a, &result.b, |v| graph.connections(v), &cost).unwrap();
                assert!(cut <= previous, "cut grew from {} to {}", previous, cut);
                previous = cut;
            }
        }
    }
}
