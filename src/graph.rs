//! A module for working with graphs.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt::Debug,
    hash::Hash,
};

use nalgebra::DMatrix;

use crate::{
    edge::Edge,
    paths::{all_hop_distances, GraphIndex},
};

/// Hop distances from each vertex to every vertex reachable from it. Unreachable pairs are
/// absent rather than stored as an infinite distance.
pub type ShortestPathTable<T> = BTreeMap<T, BTreeMap<T, u32>>;

/// An undirected, unweighted graph without multi-edges.
///
/// Unlike a pure edge set, the graph also tracks vertices that have no edges at all: a user
/// whose followers all fell outside the cutoff is still part of the picture.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// Every vertex, whether or not it takes part in an edge.
    vertices: BTreeSet<T>,
    /// The edges in the graph.
    edges: HashSet<Edge<T>>,
    /// A mapping of vertices to their indices to be used when constructing the matrices and
    /// adjacency lists representing the graph.
    ///
    /// Built from the sorted vertex set, so the ordering is stable for a given graph.
    index: Option<BTreeMap<T, GraphIndex>>,
    /// Cache the adjacency matrix when possible.
    adjacency_matrix: Option<DMatrix<u8>>,
}

impl<T> Default for Graph<T>
where
    Edge<T>: Eq + Hash,
    T: Clone + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    Edge<T>: Eq + Hash,
    T: Clone + Eq + Hash + Ord + Debug,
{
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::graph::Graph;
    ///
    /// let graph: Graph<String> = Graph::new();
    /// assert!(graph.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            vertices: Default::default(),
            edges: Default::default(),
            index: None,
            adjacency_matrix: None,
        }
    }

    /// Adds a vertex without any edges and returns whether it was new.
    pub fn add_vertex(&mut self, vertex: T) -> bool {
        let is_inserted = self.vertices.insert(vertex);

        if is_inserted {
            self.clear_cache()
        }

        is_inserted
    }

    /// Inserts an edge into the graph, adding both of its vertices if they are missing.
    ///
    /// Returns `false` if the edge (in either direction) was already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::edge::Edge;
    /// use cartography::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert!(graph.insert(Edge::new("alice", "bob")));
    /// assert!(!graph.insert(Edge::new("bob", "alice")));
    /// assert_eq!(graph.vertex_count(), 2);
    /// ```
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        let mut is_mutated = self.vertices.insert(edge.source().clone());
        is_mutated |= self.vertices.insert(edge.target().clone());

        let is_inserted = self.edges.insert(edge);

        // Delete the cached objects if anything changed because we can't reliably update them
        // from the new connection alone.
        if is_mutated || is_inserted {
            self.clear_cache()
        }

        is_inserted
    }

    /// Inserts a subset of `(hub, leaf)` edges into the graph.
    pub fn insert_subset(&mut self, hub: T, leaves: &[T]) {
        for leaf in leaves {
            self.insert(Edge::new(hub.clone(), leaf.clone()));
        }
    }

    /// Checks if the graph contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.edges.contains(edge)
    }

    /// Checks if the graph contains a vertex.
    pub fn contains_vertex(&self, vertex: &T) -> bool {
        self.vertices.contains(vertex)
    }

    /// Returns the vertices in ascending order, which is also the row order of the adjacency
    /// matrix.
    pub fn vertices(&self) -> impl Iterator<Item = &T> + '_ {
        self.vertices.iter()
    }

    /// Returns the edges in no particular order.
    pub fn edges(&self) -> &HashSet<Edge<T>> {
        &self.edges
    }

    /// Returns the vertex count of the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::edge::Edge;
    /// use cartography::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// graph.insert(Edge::new("alice", "bob"));
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.add_vertex("carol");
    /// assert_eq!(graph.density(), 1.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        // Calculate the total number of possible edges given a vertex count.
        let pec = vc * (vc - 1.0) / 2.0;
        ec / pec
    }

    /// Constructs the adjacency matrix for this graph, with rows and columns in the order of
    /// [`vertices`](Self::vertices).
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use cartography::edge::Edge;
    /// use cartography::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("alice", "bob"));
    /// graph.add_vertex("carol");
    ///
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0, 1, 0;
    ///              1, 0, 0;
    ///              0, 0, 0]
    /// );
    /// ```
    pub fn adjacency_matrix(&mut self) -> DMatrix<u8> {
        // Check the cache.
        if let Some(matrix) = self.adjacency_matrix.clone() {
            return matrix;
        }

        let index = self.index();
        let n = index.len();
        let mut matrix = DMatrix::<u8>::zeros(n, n);

        // The graph is undirected so both triangles are written for each edge. A self-loop
        // lands on the diagonal.
        for (i, j) in self.edge_positions(&index) {
            matrix[(i, j)] = 1;
            matrix[(j, i)] = 1;
        }

        // Cache the matrix.
        self.adjacency_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns the neighbour lists of the graph, addressed by index position.
    pub fn adjacency_lists(&mut self) -> Vec<Vec<GraphIndex>> {
        let index = self.index();
        let mut lists = vec![Vec::new(); index.len()];

        for (i, j) in self.edge_positions(&index) {
            lists[i].push(j);
            if i != j {
                lists[j].push(i);
            }
        }

        // Edges come out of a hash set, sorting keeps traversals reproducible.
        for list in &mut lists {
            list.sort_unstable();
        }

        lists
    }

    /// Returns a mapping of vertices to their degree centrality (number of connections) in the
    /// graph. A self-loop counts twice.
    pub fn degree_centrality(&self) -> BTreeMap<T, u32> {
        let mut degrees: BTreeMap<T, u32> =
            self.vertices.iter().map(|vertex| (vertex.clone(), 0)).collect();

        for edge in &self.edges {
            for vertex in [edge.source(), edge.target()] {
                if let Some(degree) = degrees.get_mut(vertex) {
                    *degree += 1;
                }
            }
        }

        degrees
    }

    /// Computes the hop distance between every pair of connected vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::edge::Edge;
    /// use cartography::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("alice", "bob"));
    /// graph.insert(Edge::new("bob", "carol"));
    /// graph.add_vertex("dave");
    ///
    /// let paths = graph.shortest_path_lengths();
    ///
    /// assert_eq!(paths["alice"]["carol"], 2);
    /// assert_eq!(paths["dave"]["dave"], 0);
    /// assert!(!paths["alice"].contains_key("dave"));
    /// ```
    pub fn shortest_path_lengths(&mut self) -> ShortestPathTable<T> {
        let vertices: Vec<T> = self.vertices.iter().cloned().collect();
        let table = all_hop_distances(&self.adjacency_lists());

        vertices
            .iter()
            .zip(table)
            .map(|(source, row)| {
                let reachable = vertices
                    .iter()
                    .zip(row)
                    .filter_map(|(target, distance)| Some((target.clone(), distance?)))
                    .collect();

                (source.clone(), reachable)
            })
            .collect()
    }

    //
    // Private
    //

    /// Clears the computed state.
    ///
    /// This should be called every time the graph is mutated since the cached state won't
    /// correspond to the new graph.
    fn clear_cache(&mut self) {
        self.index = None;
        self.adjacency_matrix = None;
    }

    /// Returns the index, constructing and storing it first if needed.
    fn index(&mut self) -> BTreeMap<T, GraphIndex> {
        match &self.index {
            Some(index) => index.clone(),
            None => {
                let index = self.generate_index();
                self.index = Some(index.clone());
                index
            }
        }
    }

    /// Constructs an index of the vertices, sorted by `T`'s implementation of `Ord`.
    fn generate_index(&self) -> BTreeMap<T, GraphIndex> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, vertex)| (vertex.clone(), i))
            .collect()
    }

    /// Maps each edge to the index positions of its vertices.
    fn edge_positions<'a>(
        &'a self,
        index: &'a BTreeMap<T, GraphIndex>,
    ) -> impl Iterator<Item = (GraphIndex, GraphIndex)> + 'a {
        // Every edge endpoint is inserted into the vertex set alongside the edge, so both
        // lookups succeed for an index generated from the current vertices.
        self.edges
            .iter()
            .filter_map(|edge| Some((*index.get(edge.source())?, *index.get(edge.target())?)))
    }
}
