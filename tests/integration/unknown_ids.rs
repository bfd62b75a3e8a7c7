#![allow(missing_docs)]

use std::fs;

use gindata::dataset::{load_from_paths, DatasetOptions, ExternalId, UnknownIdPolicy};
use gindata::DatasetError;
use tempfile::TempDir;

const FEATURES: &str = "\
id,m1,m2,tag,x
10,a,b,A,1
20,a,b,B,1
30,a,b,A,1
";

// 99 is not in the feature table
const EDGES: &str = "\
src,dst
20,30
30,99
";

fn load(policy: UnknownIdPolicy) -> gindata::Result<gindata::Dataset> {
    let dir = TempDir::new().expect("tempdir");
    let features = dir.path().join("nodes.csv");
    let edges = dir.path().join("edges.csv");
    fs::write(&features, FEATURES).expect("features");
    fs::write(&edges, EDGES).expect("edges");
    let options = DatasetOptions {
        unknown_ids: policy,
        ..DatasetOptions::default()
    };
    load_from_paths(&features, &edges, &options)
}

#[test]
fn alias_attaches_unknown_endpoint_to_first_node() {
    let dataset = load(UnknownIdPolicy::Alias).expect("load");
    let record = &dataset.graphs[0];
    assert_eq!(dataset.unresolved_endpoints, 1);
    assert_eq!(record.neighbors()[0], vec![2]);
    assert_eq!(record.neighbors()[2], vec![0, 1]);
}

#[test]
fn drop_discards_the_edge() {
    let dataset = load(UnknownIdPolicy::Drop).expect("load");
    let record = &dataset.graphs[0];
    assert_eq!(dataset.unresolved_endpoints, 1);
    assert!(record.neighbors()[0].is_empty());
    assert_eq!(record.neighbors()[2], vec![1]);
    assert_eq!(dataset.edge_shape, (1, 2));
}

#[test]
fn reject_fails_with_the_offending_id() {
    let err = load(UnknownIdPolicy::Reject).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::UnknownNodeId { line: 3, id: ExternalId(99), .. }
    ));
}
