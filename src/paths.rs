//! Breadth-first hop distances over adjacency lists.
//!
//! Vertices are addressed by their position in the graph index; `indices[v]` lists the
//! positions of the neighbours of `v`.

use std::collections::VecDeque;

/// Position of a vertex in the graph index.
pub type GraphIndex = usize;

/// Hop distances from `source` to every vertex, `None` where no path exists.
pub fn hop_distances(source: GraphIndex, indices: &[Vec<GraphIndex>]) -> Vec<Option<u32>> {
    let num_nodes = indices.len();

    let mut distances: Vec<Option<u32>> = vec![None; num_nodes];
    let mut queue: VecDeque<GraphIndex> = VecDeque::new();

    if source >= num_nodes {
        return distances;
    }

    distances[source] = Some(0);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        // Every vertex in the queue has been assigned a distance before being queued.
        let Some(delta) = distances[current] else {
            continue;
        };

        for &neighbour in &indices[current] {
            if distances[neighbour].is_none() {
                distances[neighbour] = Some(delta + 1);
                queue.push_back(neighbour);
            }
        }
    }

    distances
}

/// Hop distances between every pair of vertices, one row per source.
///
/// Runs one search per vertex, so the cost is O(N·(N+E)).
pub fn all_hop_distances(indices: &[Vec<GraphIndex>]) -> Vec<Vec<Option<u32>>> {
    (0..indices.len())
        .map(|source| hop_distances(source, indices))
        .collect()
}
