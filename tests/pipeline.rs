use std::path::PathBuf;

use cartography::{
    layout::LayoutConfig,
    report::visualize,
    source::{fetch_all, SnapshotSource},
    Error,
};

fn snapshot() -> SnapshotSource {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/snapshot.json");

    SnapshotSource::open(path).unwrap()
}

fn config() -> LayoutConfig {
    LayoutConfig::default().with_seed(2021)
}

#[test]
fn snapshot_to_report() {
    let source = snapshot();
    let data = fetch_all(&source, &source.usernames());

    // 2000 seconds after the epoch: bob (1000), frank (1500) and bob's follow of alice (1200)
    // are in, erin (5000) is out.
    let report = visualize(&data, "2021-01-01 00:33:20", &config()).unwrap();

    assert_eq!(report.nodes, vec!["alice", "bob", "frank", "grace"]);
    assert_eq!(report.num_edges, 2);
    assert_eq!(
        report.edges,
        vec![
            ("alice".to_owned(), "bob".to_owned()),
            ("bob".to_owned(), "frank".to_owned()),
        ]
    );
    assert_eq!(
        report.adj_matrix,
        vec![
            vec![0, 1, 0, 0],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 0, 0],
        ]
    );

    assert_eq!(report.shortest_paths["alice"]["frank"], 2);
    assert!(!report.shortest_paths["alice"].contains_key("grace"));
    assert_eq!(report.shortest_paths["grace"].len(), 1);

    assert_eq!(report.degrees["bob"], 2);
    assert_eq!(report.positions.len(), 4);

    assert_eq!(report.errors.len(), 2);
    assert!(report.errors["mallory"].contains("HTTP 500"));
    assert!(report.errors["trent"].contains("users"));
}

#[test]
fn later_cutoff_adds_edges() {
    let source = snapshot();
    let data = fetch_all(&source, &source.usernames());

    let report = visualize(&data, "2021-01-02", &config()).unwrap();

    assert_eq!(report.num_edges, 3);
    assert!(report.nodes.contains(&"erin".to_owned()));
    assert!(!report.nodes.contains(&"carol".to_owned()));
    assert!(!report.nodes.contains(&"dave".to_owned()));
}

#[test]
fn only_requested_users() {
    let source = snapshot();
    let data = fetch_all(&source, &["grace".to_owned(), "nobody".to_owned()]);

    let report = visualize(&data, "2021-01-02", &config()).unwrap();

    assert_eq!(report.nodes, vec!["grace"]);
    assert_eq!(report.adj_matrix, vec![vec![0]]);
    assert_eq!(report.positions["grace"], [0.0, 0.0]);
    assert!(report.errors["nobody"].contains("not found"));
}

#[test]
fn only_failed_users_is_an_empty_graph() {
    let source = snapshot();
    let data = fetch_all(&source, &["mallory".to_owned(), "trent".to_owned()]);

    let err = visualize(&data, "2021-01-02", &config()).unwrap_err();

    assert!(matches!(err, Error::EmptyGraph));
}

#[test]
fn seeded_reports_repeat() {
    let source = snapshot();
    let data = fetch_all(&source, &source.usernames());

    let first = visualize(&data, "2021-01-02", &config()).unwrap();
    let second = visualize(&data, "2021-01-02", &config()).unwrap();

    assert_eq!(first, second);
}
