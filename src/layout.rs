//! Force-directed placement of a graph in the plane.
//!
//! Uses the Fruchterman-Reingold model: every pair of vertices repels with force `k²/d`,
//! every edge pulls its ends together with force `d²/k`, and a temperature that cools
//! linearly caps how far a vertex may move per iteration. Coordinates only carry meaning
//! relative to each other.

use std::{collections::BTreeMap, fmt::Debug, hash::Hash};

use nalgebra::Vector2;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::debug;

use crate::{edge::Edge, graph::Graph};

/// A point in the plane.
pub type Position = Vector2<f64>;

/// Closest two vertices are considered to be, avoiding divisions by zero for vertices that
/// start on top of each other.
const MIN_DISTANCE: f64 = 0.01;

/// Displacements shorter than this are treated as length `STALL_LENGTH` when normalised.
const MIN_DISPLACEMENT: f64 = 0.01;
const STALL_LENGTH: f64 = 0.1;

/// Knobs for [`compute_layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Upper bound on simulation steps.
    pub iterations: usize,
    /// Seed for the initial positions. Without one, every run starts from fresh entropy.
    pub seed: Option<u64>,
    /// Half-width of the square the result is scaled into.
    pub scale: f64,
    /// Stop early once the mean displacement per vertex falls below this.
    pub threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: None,
            scale: 1.0,
            threshold: 1e-4,
        }
    }
}

impl LayoutConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// A position for every vertex of a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout<T> {
    positions: BTreeMap<T, Position>,
}

impl<T: Ord> Layout<T> {
    pub fn get(&self, vertex: &T) -> Option<&Position> {
        self.positions.get(vertex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, &Position)> + '_ {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Places every vertex of `graph`, isolated ones included.
///
/// The result is centred on the origin and scaled so the largest coordinate magnitude is
/// `config.scale`. A lone vertex sits at the origin.
///
/// # Examples
///
/// ```
/// use cartography::edge::Edge;
/// use cartography::graph::Graph;
/// use cartography::layout::{compute_layout, LayoutConfig};
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("alice", "bob"));
/// graph.add_vertex("carol");
///
/// let config = LayoutConfig::default().with_seed(7);
/// let layout = compute_layout(&mut graph, &config);
///
/// assert_eq!(layout.len(), 3);
/// assert_eq!(layout, compute_layout(&mut graph, &config));
/// ```
pub fn compute_layout<T>(graph: &mut Graph<T>, config: &LayoutConfig) -> Layout<T>
where
    Edge<T>: Eq + Hash,
    T: Clone + Eq + Hash + Ord + Debug,
{
    let vertices: Vec<T> = graph.vertices().cloned().collect();
    let n = vertices.len();

    let positions = match n {
        0 => Vec::new(),
        1 => vec![Position::zeros()],
        _ => {
            let mut rng = match config.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            let initial = (0..n)
                .map(|_| Position::new(rng.gen(), rng.gen()))
                .collect();

            let mut positions = fruchterman_reingold(initial, &graph.adjacency_lists(), config);
            rescale(&mut positions, config.scale);
            positions
        }
    };

    Layout {
        positions: vertices.into_iter().zip(positions).collect(),
    }
}

//
// Helpers
//

fn fruchterman_reingold(
    mut positions: Vec<Position>,
    neighbours: &[Vec<usize>],
    config: &LayoutConfig,
) -> Vec<Position> {
    let n = positions.len();

    // Optimal distance between vertices for a unit area.
    let k = (1.0 / n as f64).sqrt();

    // Start hot enough to cross a tenth of the initial spread, cool to zero by the end.
    let mut temperature = spread(&positions) * 0.1;
    let cooling = temperature / (config.iterations + 1) as f64;

    for iteration in 0..config.iterations {
        let mut displacement = vec![Position::zeros(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[i] - positions[j];
                let distance = delta.norm().max(MIN_DISTANCE);
                let repulsion = delta * (k * k / (distance * distance));

                displacement[i] += repulsion;
                displacement[j] -= repulsion;
            }

            for &j in &neighbours[i] {
                // Each edge appears in both neighbour lists, so only pull towards `j` here.
                if i == j {
                    continue;
                }

                let delta = positions[i] - positions[j];
                let distance = delta.norm().max(MIN_DISTANCE);
                displacement[i] -= delta * (distance / k);
            }
        }

        let mut movement = 0.0;
        for (position, displacement) in positions.iter_mut().zip(&displacement) {
            let length = match displacement.norm() {
                length if length < MIN_DISPLACEMENT => STALL_LENGTH,
                length => length,
            };
            let step = displacement * (temperature / length);

            *position += step;
            movement += step.norm_squared();
        }

        temperature -= cooling;

        if movement.sqrt() / (n as f64) < config.threshold {
            debug!(iteration, "layout settled early");
            break;
        }
    }

    positions
}

/// Largest extent of the positions along either axis.
fn spread(positions: &[Position]) -> f64 {
    let (min, max) = positions.iter().fold(
        (Position::repeat(f64::INFINITY), Position::repeat(f64::NEG_INFINITY)),
        |(min, max), position| (min.inf(position), max.sup(position)),
    );

    (max - min).max()
}

/// Centres the positions on the origin and scales them so the largest coordinate magnitude
/// equals `scale`.
fn rescale(positions: &mut [Position], scale: f64) {
    if positions.is_empty() {
        return;
    }

    let centroid = positions.iter().sum::<Position>() / positions.len() as f64;
    for position in positions.iter_mut() {
        *position -= centroid;
    }

    let limit = positions
        .iter()
        .map(|position| position.amax())
        .fold(0.0, f64::max);

    if limit > 0.0 {
        for position in positions.iter_mut() {
            *position *= scale / limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> LayoutConfig {
        LayoutConfig::default().with_seed(42)
    }

    fn square() -> Graph<&'static str> {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));
        graph.insert(Edge::new("b", "c"));
        graph.insert(Edge::new("c", "d"));
        graph.insert(Edge::new("d", "a"));
        graph
    }

    #[test]
    fn empty_graph() {
        let mut graph: Graph<&str> = Graph::new();

        assert!(compute_layout(&mut graph, &seeded()).is_empty());
    }

    #[test]
    fn single_vertex_at_origin() {
        let mut graph = Graph::new();
        graph.add_vertex("alice");

        let layout = compute_layout(&mut graph, &seeded());

        assert_eq!(layout.get(&"alice"), Some(&Position::zeros()));
    }

    #[test]
    fn every_vertex_is_placed() {
        let mut graph = square();
        graph.add_vertex("island");

        let layout = compute_layout(&mut graph, &seeded());

        assert_eq!(layout.len(), 5);
        for vertex in graph.vertices() {
            let position = layout.get(vertex).unwrap();
            assert!(position.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn seeded_layouts_repeat() {
        let mut graph = square();

        assert_eq!(
            compute_layout(&mut graph, &seeded()),
            compute_layout(&mut graph, &seeded())
        );
    }

    #[test]
    fn different_seeds_differ() {
        let mut graph = square();

        assert_ne!(
            compute_layout(&mut graph, &seeded()),
            compute_layout(&mut graph, &LayoutConfig::default().with_seed(43))
        );
    }

    #[test]
    fn fits_the_scale() {
        let mut graph = square();
        let config = seeded().with_scale(10.0);

        let layout = compute_layout(&mut graph, &config);

        let largest = layout
            .iter()
            .map(|(_, position)| position.amax())
            .fold(0.0, f64::max);
        assert!((largest - 10.0).abs() < 1e-9);

        let centroid = layout.iter().map(|(_, position)| *position).sum::<Position>() / 4.0;
        assert!(centroid.norm() < 1e-9);
    }

    #[test]
    fn neighbours_sit_closer_than_strangers() {
        // Two tight pairs with no edge between them.
        let mut graph = Graph::new();
        graph.insert(Edge::new("a", "b"));
        graph.insert(Edge::new("c", "d"));

        let layout = compute_layout(&mut graph, &seeded().with_iterations(200));
        let distance = |x: &str, y: &str| (layout.get(&x).unwrap() - layout.get(&y).unwrap()).norm();

        assert!(distance("a", "b") < distance("a", "c"));
        assert!(distance("c", "d") < distance("b", "d"));
    }

    #[test]
    fn zero_iterations_keeps_initial_spread() {
        let mut graph = square();

        let layout = compute_layout(&mut graph, &seeded().with_iterations(0));

        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn rescale_coincident_points() {
        let mut positions = vec![Position::new(0.5, 0.5); 3];

        rescale(&mut positions, 1.0);

        assert!(positions.iter().all(|position| *position == Position::zeros()));
    }

    #[test]
    fn spread_of_points() {
        let positions = vec![Position::new(0.0, 0.0), Position::new(0.2, 0.7)];

        assert!((spread(&positions) - 0.7).abs() < 1e-12);
    }
}
