//! Per-user follower lists and the sources they come from.
//!
//! A [`ConnectionSource`] answers one question: who follows this user, and when did they
//! start? [`fetch_all`] asks it for every requested user and records failures against the
//! user instead of giving up on the request, so the graph builder only ever sees a list of
//! connections or a reason there isn't one.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    timeline::UNKNOWN_TIMESTAMP,
};

/// A follower of a user and the raw time the follow happened, in seconds since the
/// Farcaster epoch. The timestamp is kept exactly as the upstream reported it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConnection {
    pub name: String,
    pub acquired_at: String,
}

impl UserConnection {
    pub fn new(name: impl Into<String>, acquired_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            acquired_at: acquired_at.into(),
        }
    }

    /// A follower whose follow time wasn't reported.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN_TIMESTAMP)
    }
}

/// What fetching a single user produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    Connections(Vec<UserConnection>),
    /// The fetch failed; the user contributes neither a node nor edges.
    Failed(String),
}

impl FetchOutcome {
    pub fn connections(&self) -> Option<&[UserConnection]> {
        match self {
            Self::Connections(connections) => Some(connections),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Connections(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// Fetch outcomes keyed by username.
pub type PerUserData = BTreeMap<String, FetchOutcome>;

/// Why a user's followers couldn't be fetched.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("user `{0}` not found")]
    UnknownUser(String),
    #[error("`{field}` key not found in response for user {user}")]
    MissingField { user: String, field: &'static str },
    #[error("`{field}` is not {expected} for user {user}")]
    WrongType {
        user: String,
        field: &'static str,
        expected: &'static str,
    },
    #[error("upstream error for user {user}: {reason}")]
    Unavailable { user: String, reason: String },
}

/// The followers of one user, or why they couldn't be fetched.
pub type FetchResult = std::result::Result<Vec<UserConnection>, SourceError>;

/// Somewhere follower lists can be fetched from.
pub trait ConnectionSource {
    fn fetch_connections(&self, username: &str) -> FetchResult;
}

impl<F> ConnectionSource for F
where
    F: Fn(&str) -> FetchResult,
{
    fn fetch_connections(&self, username: &str) -> FetchResult {
        self(username)
    }
}

/// Fetches every user once, recording failures as [`FetchOutcome::Failed`].
///
/// # Examples
///
/// ```
/// use cartography::source::{fetch_all, SourceError, UserConnection};
///
/// let source = |username: &str| match username {
///     "alice" => Ok(vec![UserConnection::new("bob", "1000")]),
///     _ => Err(SourceError::UnknownUser(username.to_owned())),
/// };
///
/// let data = fetch_all(&source, &["alice".into(), "mallory".into()]);
///
/// assert_eq!(data["alice"].connections().map(|c| c.len()), Some(1));
/// assert_eq!(data["mallory"].error(), Some("user `mallory` not found"));
/// ```
pub fn fetch_all<S>(source: &S, usernames: &[String]) -> PerUserData
where
    S: ConnectionSource + ?Sized,
{
    let mut data = PerUserData::new();

    for username in usernames {
        if data.contains_key(username) {
            continue;
        }

        let outcome = match source.fetch_connections(username) {
            Ok(connections) => {
                debug!(user = %username, count = connections.len(), "fetched connections");
                FetchOutcome::Connections(connections)
            }
            Err(e) => {
                warn!(user = %username, error = %e, "failed to fetch connections");
                FetchOutcome::Failed(e.to_string())
            }
        };

        data.insert(username.clone(), outcome);
    }

    data
}

/// A recorded dump of the follower API.
///
/// The snapshot is a JSON object keyed by username. Each value is either the list of pages
/// the API returned for that user, in order, or a string describing why the user couldn't be
/// fetched:
///
/// ```json
/// {
///   "alice": [
///     { "result": { "users": [{ "username": "bob", "timestamp": 1000 }] }, "next": { "cursor": "p2" } },
///     { "result": { "users": [{ "username": "carol" }] } }
///   ],
///   "mallory": "HTTP 500"
/// }
/// ```
///
/// Pages are read until one carries no `next.cursor`. Followers without a `username` or a
/// `timestamp` get the `"Unknown"` sentinel in its place.
#[derive(Clone, Debug, Default)]
pub struct SnapshotSource {
    users: HashMap<String, Value>,
}

impl SnapshotSource {
    /// Reads a snapshot from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let users: HashMap<String, Value> = serde_json::from_str(json)?;

        Ok(Self { users })
    }

    /// Every user in the snapshot, sorted.
    pub fn usernames(&self) -> Vec<String> {
        let mut usernames: Vec<String> = self.users.keys().cloned().collect();
        usernames.sort();
        usernames
    }
}

impl ConnectionSource for SnapshotSource {
    fn fetch_connections(&self, username: &str) -> FetchResult {
        let pages = match self.users.get(username) {
            Some(Value::Array(pages)) => pages,
            Some(Value::String(reason)) => {
                return Err(SourceError::Unavailable {
                    user: username.to_owned(),
                    reason: reason.clone(),
                })
            }
            Some(_) => {
                return Err(SourceError::WrongType {
                    user: username.to_owned(),
                    field: "pages",
                    expected: "a list",
                })
            }
            None => return Err(SourceError::UnknownUser(username.to_owned())),
        };

        let mut connections = Vec::new();

        for (number, page) in pages.iter().enumerate() {
            connections.extend(read_page(username, page)?);

            let cursor = page
                .get("next")
                .and_then(|next| next.get("cursor"))
                .and_then(Value::as_str)
                .filter(|cursor| !cursor.is_empty());

            match cursor {
                None => return Ok(connections),
                Some(cursor) if number + 1 == pages.len() => {
                    warn!(user = %username, %cursor, "snapshot ends before the last page");
                }
                Some(_) => {}
            }
        }

        Ok(connections)
    }
}

//
// Helpers
//

/// Reads the followers listed on one page of the follower API.
fn read_page(username: &str, page: &Value) -> FetchResult {
    let missing = |field| SourceError::MissingField {
        user: username.to_owned(),
        field,
    };

    let users = page
        .get("result")
        .ok_or_else(|| missing("result"))?
        .get("users")
        .ok_or_else(|| missing("users"))?
        .as_array()
        .ok_or_else(|| SourceError::WrongType {
            user: username.to_owned(),
            field: "users",
            expected: "a list",
        })?;

    users
        .iter()
        .map(|user| {
            if !user.is_object() {
                return Err(SourceError::WrongType {
                    user: username.to_owned(),
                    field: "users[]",
                    expected: "an object",
                });
            }

            let name = user
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_TIMESTAMP);

            Ok(UserConnection::new(name, raw_timestamp(user.get("timestamp"))))
        })
        .collect()
}

/// Renders a follow timestamp as text. Numbers keep their decimal form so they go through the
/// same integer parse as string timestamps; anything else is passed on verbatim and will be
/// skipped by the builder.
fn raw_timestamp(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_TIMESTAMP.to_owned(),
        Some(Value::String(raw)) => raw.clone(),
        Some(other) => other.to_string(),
    }
}
