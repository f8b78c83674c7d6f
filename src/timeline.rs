//! Cutting a follower graph off at a point in time.
//!
//! Follow timestamps are seconds since the Farcaster epoch (2021-01-01T00:00:00 UTC). The
//! cutoff arrives as a calendar timestamp and is converted to the same scale, then every
//! follow made at or before it becomes an edge.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    graph::Graph,
    source::{FetchOutcome, PerUserData, UserConnection},
};

/// The Farcaster epoch, 2021-01-01T00:00:00 UTC, as a unix timestamp.
pub const FARCASTER_EPOCH: i64 = 1_609_459_200;

/// Placeholder the upstream uses when it has no follow time.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// Calendar formats accepted without an offset. These are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Formats carrying their own offset, besides RFC 3339.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// The latest moment a follow may have happened to be drawn, in whole seconds since the
/// Farcaster epoch.
///
/// # Examples
///
/// ```
/// use cartography::timeline::Cutoff;
///
/// let cutoff: Cutoff = "2021-01-01T00:16:40Z".parse().unwrap();
/// assert_eq!(cutoff.seconds(), 1000);
///
/// assert!("next tuesday".parse::<Cutoff>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cutoff {
    seconds: i64,
}

impl Cutoff {
    /// Creates a cutoff already expressed in seconds since the Farcaster epoch.
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Creates a cutoff from a point in time.
    ///
    /// Fractions of a second are dropped towards the past, so the cutoff accepts exactly the
    /// whole-second timestamps that don't come after `at`.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        // `timestamp` floors, sub-second precision lives in the non-negative nanosecond part.
        Self::from_epoch_seconds(at.timestamp() - FARCASTER_EPOCH)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns whether a follow made at `seconds` falls on or before the cutoff.
    pub fn admits(&self, seconds: i64) -> bool {
        seconds <= self.seconds
    }
}

impl FromStr for Cutoff {
    type Err = Error;

    /// Reads RFC 3339 timestamps, `YYYY-MM-DD HH:MM[:SS[.fff]]` with or without a `T`
    /// separator or an offset, and bare `YYYY-MM-DD` dates. Times without an offset are UTC.
    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();

        if let Ok(at) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self::from_datetime(at.with_timezone(&Utc)));
        }

        for format in OFFSET_FORMATS {
            if let Ok(at) = DateTime::parse_from_str(input, format) {
                return Ok(Self::from_datetime(at.with_timezone(&Utc)));
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(at) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(Self::from_datetime(at.and_utc()));
            }
        }

        if let Some(at) = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Self::from_datetime(at.and_utc()));
        }

        Err(Error::InvalidCutoff {
            input: s.to_owned(),
        })
    }
}

/// A raw follow timestamp, classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquired {
    /// The upstream reported no time.
    Unknown,
    /// Seconds since the Farcaster epoch.
    At(i64),
    /// Neither the sentinel nor an integer.
    Malformed,
}

impl Acquired {
    /// # Examples
    ///
    /// ```
    /// use cartography::timeline::Acquired;
    ///
    /// assert_eq!(Acquired::classify("1000"), Acquired::At(1000));
    /// assert_eq!(Acquired::classify(" -5 "), Acquired::At(-5));
    /// assert_eq!(Acquired::classify("Unknown"), Acquired::Unknown);
    /// assert_eq!(Acquired::classify("10.5"), Acquired::Malformed);
    /// ```
    pub fn classify(raw: &str) -> Self {
        if raw == UNKNOWN_TIMESTAMP {
            return Self::Unknown;
        }

        match raw.trim().parse::<i64>() {
            Ok(seconds) => Self::At(seconds),
            Err(_) => Self::Malformed,
        }
    }
}

/// Builds the follower graph as it stood at `cutoff`.
///
/// Every user with a successful fetch becomes a vertex, even without followers. Failed users
/// are left out entirely. A follower is joined to the user when its timestamp is an integer no
/// later than the cutoff; unknown and malformed timestamps skip that one follower.
///
/// # Examples
///
/// ```
/// use cartography::edge::Edge;
/// use cartography::source::{FetchOutcome, PerUserData, UserConnection};
/// use cartography::timeline::{build_graph, Cutoff};
///
/// let mut data = PerUserData::new();
/// data.insert(
///     "alice".into(),
///     FetchOutcome::Connections(vec![
///         UserConnection::new("bob", "1000"),
///         UserConnection::new("carol", "3000"),
///     ]),
/// );
/// data.insert("mallory".into(), FetchOutcome::Failed("HTTP 500".into()));
///
/// let graph = build_graph(&data, &Cutoff::from_epoch_seconds(2000));
///
/// assert!(graph.contains(&Edge::new("alice".into(), "bob".into())));
/// assert_eq!(graph.edge_count(), 1);
/// assert!(!graph.contains_vertex(&"mallory".to_string()));
/// ```
pub fn build_graph(data: &PerUserData, cutoff: &Cutoff) -> Graph<String> {
    let mut graph = Graph::new();

    for (user, outcome) in data {
        let FetchOutcome::Connections(connections) = outcome else {
            debug!(%user, "leaving out user with failed fetch");
            continue;
        };

        graph.add_vertex(user.clone());

        let admitted: Vec<String> = connections
            .iter()
            .filter(|connection| admits(user, connection, cutoff))
            .map(|connection| connection.name.clone())
            .collect();

        graph.insert_subset(user.clone(), &admitted);
    }

    info!(
        nodes = graph.vertex_count(),
        edges = graph.edge_count(),
        cutoff = cutoff.seconds(),
        "built graph"
    );

    graph
}

/// Parses `cutoff` and builds the graph as it stood then.
///
/// Fails with [`Error::InvalidCutoff`] before looking at any data if the cutoff can't be read.
pub fn build_graph_from_str(data: &PerUserData, cutoff: &str) -> Result<Graph<String>> {
    let cutoff: Cutoff = cutoff.parse()?;

    Ok(build_graph(data, &cutoff))
}

//
// Helpers
//

fn admits(user: &str, connection: &UserConnection, cutoff: &Cutoff) -> bool {
    match Acquired::classify(&connection.acquired_at) {
        Acquired::At(seconds) => {
            let admitted = cutoff.admits(seconds);
            if !admitted {
                debug!(%user, connection = %connection.name, seconds, "follow is after the cutoff");
            }
            admitted
        }
        Acquired::Unknown => {
            debug!(%user, connection = %connection.name, "skipping follow with unknown timestamp");
            false
        }
        Acquired::Malformed => {
            warn!(
                %user,
                connection = %connection.name,
                timestamp = %connection.acquired_at,
                "skipping follow with invalid timestamp"
            );
            false
        }
    }
}
