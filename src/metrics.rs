//! Whole-graph measurements handed to the presentation layer.

use std::{fmt::Debug, hash::Hash};

use nalgebra::DMatrix;

use crate::{
    edge::Edge,
    graph::{Graph, ShortestPathTable},
};

/// The measurements taken from one graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics<T> {
    /// Number of distinct edges.
    pub edge_count: usize,
    /// Row and column order of `adjacency_matrix`.
    pub nodes: Vec<T>,
    /// Dense 0/1 adjacency matrix, symmetric.
    pub adjacency_matrix: DMatrix<u8>,
    /// Hop distances between every pair of connected vertices.
    pub shortest_paths: ShortestPathTable<T>,
}

impl<T: Ord> Metrics<T> {
    /// Hop distance from `source` to `target`, `None` when they aren't connected.
    pub fn distance(&self, source: &T, target: &T) -> Option<u32> {
        self.shortest_paths.get(source)?.get(target).copied()
    }

    /// The adjacency matrix as nested rows, in the order of `nodes`.
    pub fn adjacency_rows(&self) -> Vec<Vec<u8>> {
        self.adjacency_matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

/// Computes the edge count, the adjacency matrix and the all-pairs shortest path lengths.
///
/// An empty graph yields empty measurements; rejecting it is up to the caller.
///
/// # Examples
///
/// ```
/// use nalgebra::dmatrix;
/// use cartography::edge::Edge;
/// use cartography::graph::Graph;
/// use cartography::metrics::compute_metrics;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("alice", "bob"));
/// graph.add_vertex("carol");
///
/// let metrics = compute_metrics(&mut graph);
///
/// assert_eq!(metrics.edge_count, 1);
/// assert_eq!(metrics.nodes, vec!["alice", "bob", "carol"]);
/// assert_eq!(
///     metrics.adjacency_matrix,
///     dmatrix![0, 1, 0;
///              1, 0, 0;
///              0, 0, 0]
/// );
/// assert_eq!(metrics.distance(&"alice", &"bob"), Some(1));
/// assert_eq!(metrics.distance(&"alice", &"carol"), None);
/// ```
pub fn compute_metrics<T>(graph: &mut Graph<T>) -> Metrics<T>
where
    Edge<T>: Eq + Hash,
    T: Clone + Eq + Hash + Ord + Debug,
{
    Metrics {
        edge_count: graph.edge_count(),
        nodes: graph.vertices().cloned().collect(),
        adjacency_matrix: graph.adjacency_matrix(),
        shortest_paths: graph.shortest_path_lengths(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_graph() {
        let mut graph: Graph<String> = Graph::new();

        let metrics = compute_metrics(&mut graph);

        assert_eq!(metrics.edge_count, 0);
        assert!(metrics.nodes.is_empty());
        assert!(metrics.adjacency_matrix.is_empty());
        assert!(metrics.shortest_paths.is_empty());
    }

    #[test]
    fn isolated_vertex() {
        let mut graph = Graph::new();
        graph.add_vertex("alice");

        let metrics = compute_metrics(&mut graph);

        assert_eq!(metrics.adjacency_rows(), vec![vec![0]]);
        assert_eq!(metrics.distance(&"alice", &"alice"), Some(0));
    }

    #[test]
    fn path_lengths() {
        let (a, b, c, d) = ("alice", "bob", "carol", "dave");
        let mut graph = Graph::new();
        graph.insert(Edge::new(a, b));
        graph.insert(Edge::new(b, c));
        graph.add_vertex(d);

        let metrics = compute_metrics(&mut graph);

        assert_eq!(metrics.edge_count, 2);
        assert_eq!(metrics.distance(&a, &c), Some(2));
        assert_eq!(metrics.distance(&c, &a), Some(2));
        assert_eq!(metrics.distance(&d, &d), Some(0));
        assert_eq!(metrics.distance(&a, &d), None);
        assert_eq!(metrics.shortest_paths[d].len(), 1);
    }

    #[test]
    fn adjacency_rows_follow_node_order() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("carol", "alice"));
        graph.add_vertex("bob");

        let metrics = compute_metrics(&mut graph);

        assert_eq!(metrics.nodes, vec!["alice", "bob", "carol"]);
        assert_eq!(
            metrics.adjacency_rows(),
            vec![vec![0, 0, 1], vec![0, 0, 0], vec![1, 0, 0]]
        );
    }

    fn arbitrary_graph() -> impl Strategy<Value = Graph<u8>> {
        (
            prop::collection::vec(0u8..12, 0..12),
            prop::collection::vec((0u8..12, 0u8..12), 0..30),
        )
            .prop_map(|(vertices, edges)| {
                let mut graph = Graph::new();
                for vertex in vertices {
                    graph.add_vertex(vertex);
                }
                for (a, b) in edges {
                    graph.insert(Edge::new(a, b));
                }
                graph
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_adjacency_is_symmetric(mut graph in arbitrary_graph()) {
            let metrics = compute_metrics(&mut graph);

            prop_assert_eq!(&metrics.adjacency_matrix, &metrics.adjacency_matrix.transpose());
        }

        #[test]
        fn prop_distance_to_self_is_zero(mut graph in arbitrary_graph()) {
            let metrics = compute_metrics(&mut graph);

            for node in &metrics.nodes {
                prop_assert_eq!(metrics.distance(node, node), Some(0));
            }
        }

        #[test]
        fn prop_distances_are_symmetric(mut graph in arbitrary_graph()) {
            let metrics = compute_metrics(&mut graph);

            for a in &metrics.nodes {
                for b in &metrics.nodes {
                    prop_assert_eq!(metrics.distance(a, b), metrics.distance(b, a));
                }
            }
        }

        #[test]
        fn prop_edges_are_distance_one(mut graph in arbitrary_graph()) {
            let edges: Vec<_> = graph.edges().iter().filter(|edge| !edge.is_loop()).cloned().collect();
            let metrics = compute_metrics(&mut graph);

            prop_assert_eq!(metrics.edge_count, graph.edge_count());
            for edge in edges {
                prop_assert_eq!(metrics.distance(edge.source(), edge.target()), Some(1));
            }
        }
    }
}
