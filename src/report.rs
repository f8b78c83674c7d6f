//! The visualisation request, end to end.
//!
//! [`visualize`] takes fetched follower lists and a cutoff, and produces everything needed to
//! draw and annotate the graph: positions, edges, metrics and the users that couldn't be
//! fetched.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::{
    error::{Error, Result},
    graph::{Graph, ShortestPathTable},
    layout::{compute_layout, LayoutConfig},
    metrics::compute_metrics,
    source::PerUserData,
    timeline::build_graph_from_str,
};

/// Everything a front end needs to draw the graph as it stood at the cutoff.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub num_edges: usize,
    /// Row and column order of `adj_matrix`.
    pub nodes: Vec<String>,
    pub adj_matrix: Vec<Vec<u8>>,
    pub shortest_paths: ShortestPathTable<String>,
    pub positions: BTreeMap<String, [f64; 2]>,
    /// Edges as sorted pairs, sorted.
    pub edges: Vec<(String, String)>,
    /// Connection count per node, for sizing markers.
    pub degrees: BTreeMap<String, u32>,
    /// Why each failed user couldn't be fetched.
    pub errors: BTreeMap<String, String>,
}

/// Runs a visualisation request.
///
/// The cutoff is validated before anything else, and a graph without nodes is rejected
/// before metrics and layout are computed.
///
/// # Examples
///
/// ```
/// use cartography::error::Error;
/// use cartography::layout::LayoutConfig;
/// use cartography::report::visualize;
/// use cartography::source::{FetchOutcome, PerUserData, UserConnection};
///
/// let mut data = PerUserData::new();
/// data.insert(
///     "alice".into(),
///     FetchOutcome::Connections(vec![UserConnection::new("bob", "1000")]),
/// );
///
/// let config = LayoutConfig::default().with_seed(1);
/// let report = visualize(&data, "2021-01-02", &config).unwrap();
/// assert_eq!(report.num_edges, 1);
///
/// assert!(matches!(
///     visualize(&data, "not a date", &config),
///     Err(Error::InvalidCutoff { .. })
/// ));
/// ```
pub fn visualize(data: &PerUserData, cutoff: &str, config: &LayoutConfig) -> Result<Report> {
    let mut graph = build_graph_from_str(data, cutoff)?;

    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    info!(
        nodes = graph.vertex_count(),
        edges = graph.edge_count(),
        density = graph.density(),
        "computing metrics and layout"
    );

    Ok(assemble(data, &mut graph, config))
}

//
// Helpers
//

fn assemble(data: &PerUserData, graph: &mut Graph<String>, config: &LayoutConfig) -> Report {
    let metrics = compute_metrics(graph);
    let adj_matrix = metrics.adjacency_rows();
    let layout = compute_layout(graph, config);

    let mut edges: Vec<(String, String)> = graph
        .edges()
        .iter()
        .map(|edge| {
            let (a, b) = edge.ordered();
            (a.clone(), b.clone())
        })
        .collect();
    edges.sort();

    let errors = data
        .iter()
        .filter_map(|(user, outcome)| Some((user.clone(), outcome.error()?.to_owned())))
        .collect();

    Report {
        num_edges: metrics.edge_count,
        nodes: metrics.nodes,
        adj_matrix,
        shortest_paths: metrics.shortest_paths,
        positions: layout
            .iter()
            .map(|(node, position)| (node.clone(), [position.x, position.y]))
            .collect(),
        edges,
        degrees: graph.degree_centrality(),
        errors,
    }
}
