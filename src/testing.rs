//! Graphs and checks shared by the unit tests of this crate.

use rand::Rng;

use crate::{ops::*, repr::*, *};

/// The network `0 -> {1, 2} -> 3` with capacities `3, 2, 2, 3`, source `0` and sink `3`
pub fn four_node_network() -> Graph {
    let mut graph = Graph::from_arcs(GraphKind::Directed, 4, [(0, 1), (0, 2), (1, 3), (2, 3)])
        .with_source(0)
        .with_sink(3);
    graph.set_capacities(vec![3.0, 2.0, 2.0, 3.0]).unwrap();
    graph
}

/// Undirected cycle on `n` nodes
pub fn cycle(n: NumNodes) -> Graph {
    Graph::from_arcs(GraphKind::Undirected, n, (0..n).map(|u| (u, (u + 1) % n)))
}

/// Returns `m` random arcs without loops; parallel arcs may occur
pub fn random_arcs<R: Rng>(rng: &mut R, n: NumNodes, m: NumArcs) -> Vec<Edge> {
    (0..m)
        .map(|_| {
            let u = rng.random_range(0..n);
            let v = (u + rng.random_range(1..n)) % n;
            Edge(u, v)
        })
        .collect()
}

/// Random directed network with integral capacities in `1..=10`, integral costs in `0..=10`,
/// source `0` and sink `n - 1`
pub fn random_network<R: Rng>(rng: &mut R, n: NumNodes, m: NumArcs) -> Graph {
    let mut graph = Graph::from_arcs(GraphKind::Directed, n, random_arcs(rng, n, m))
        .with_source(0)
        .with_sink(n - 1);
    let m = graph.number_of_arcs() as usize;
    graph
        .set_capacities((0..m).map(|_| rng.random_range(1..=10) as f64).collect())
        .unwrap();
    graph
        .set_costs((0..m).map(|_| rng.random_range(0..=10) as f64).collect())
        .unwrap();
    graph
}

/// Like [`random_network`] with an integral flow `0 <= f <= u` on every arc (not conserved)
pub fn random_network_with_flow<R: Rng>(rng: &mut R, n: NumNodes, m: NumArcs) -> Graph {
    let mut graph = random_network(rng, n, m);
    let flows = graph
        .capacities()
        .unwrap()
        .iter()
        .map(|&u| rng.random_range(0..=(u as u32)) as f64)
        .collect();
    graph.set_flows(flows).unwrap();
    graph
}

/// Random connected undirected graph: a random spanning path plus `extra` random arcs,
/// all with integral costs in `1..=20`
pub fn random_connected<R: Rng>(rng: &mut R, n: NumNodes, extra: NumArcs) -> Graph {
    let mut nodes = (0..n).collect::<Vec<_>>();
    for i in (1..nodes.len()).rev() {
        nodes.swap(i, rng.random_range(0..=i));
    }
    let mut arcs = nodes.windows(2).map(|w| Edge(w[0], w[1])).collect::<Vec<_>>();
    arcs.extend(random_arcs(rng, n, extra));

    let mut graph = Graph::from_arcs(GraphKind::Undirected, n, arcs);
    let m = graph.number_of_arcs() as usize;
    graph
        .set_costs((0..m).map(|_| rng.random_range(1..=20) as f64).collect())
        .unwrap();
    graph
}

/// Asserts `0 <= f <= u` on every arc and conservation at every node except `s` and `t`
pub fn assert_feasible_flow(graph: &Graph, s: Node, t: Node) {
    let flows = graph.flows().unwrap();
    let capacities = graph.capacities().unwrap();
    for (f, u) in flows.iter().zip(capacities) {
        assert!(*f >= -EPSILON && *f <= u + EPSILON, "flow {f} violates capacity {u}");
    }

    for v in graph.vertices().filter(|&v| v != s && v != t) {
        assert!(
            graph.total_flow_from(v).unwrap().abs() < 1e-6,
            "flow is not conserved at {v}"
        );
    }
}

/// Asserts that the flow satisfies all external flows: outflow - inflow = supply
pub fn assert_meets_supplies(graph: &Graph) {
    for v in graph.vertices() {
        let net = graph.total_flow_from(v).unwrap();
        assert!(
            (net - graph.supply(v)).abs() < 1e-6,
            "node {v} has net outflow {net} but supply {}",
            graph.supply(v)
        );
    }
}
