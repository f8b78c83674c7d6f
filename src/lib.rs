//! Cartography draws a social graph as it stood at a point in time. It takes the follower lists
//! of a handful of users, keeps only the follows made before a cutoff, and measures and lays out
//! the resulting undirected graph.
//!
//! # Basic usage
//!
//! Follower lists come from a [`ConnectionSource`](source::ConnectionSource) and are gathered
//! with [`fetch_all`](source::fetch_all), which records failed users instead of giving up. The
//! [`visualize`](report::visualize) pipeline then builds the graph, computes its metrics and
//! layout, and returns a serializable [`Report`](report::Report). The individual steps are
//! available on their own as well.
//!
//! ```rust
//! use cartography::layout::{compute_layout, LayoutConfig};
//! use cartography::metrics::compute_metrics;
//! use cartography::source::{fetch_all, FetchResult, UserConnection};
//! use cartography::timeline::build_graph_from_str;
//!
//! // Follow timestamps are seconds since the Farcaster epoch, 2021-01-01T00:00:00 UTC.
//! let source = |username: &str| -> FetchResult {
//!     Ok(match username {
//!         "alice" => vec![
//!             UserConnection::new("bob", "1000"),
//!             UserConnection::unknown("carol"),
//!         ],
//!         _ => vec![],
//!     })
//! };
//! let data = fetch_all(&source, &["alice".into(), "bob".into()]);
//!
//! // Keep the follows made in the first hour.
//! let mut graph = build_graph_from_str(&data, "2021-01-01 01:00:00").unwrap();
//!
//! let metrics = compute_metrics(&mut graph);
//! assert_eq!(metrics.edge_count, 1);
//!
//! // Matrices can be pretty printed...
//! println!("{}", metrics.adjacency_matrix);
//! // ...outputs:
//! //  ┌     ┐
//! //  │ 0 1 │
//! //  │ 1 0 │
//! //  └     ┘
//!
//! // Seed the layout for reproducible coordinates.
//! let layout = compute_layout(&mut graph, &LayoutConfig::default().with_seed(7));
//! assert_eq!(layout.len(), 2);
//! ```

pub mod edge;
pub mod error;
pub mod graph;
pub mod layout;
pub mod metrics;
mod paths;
pub mod report;
pub mod source;
pub mod timeline;

pub use error::{Error, Result};
