#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use gindata::dataset::{load_data, separate_data, DatasetOptions, ExternalId};
use gindata::DatasetError;
use tempfile::TempDir;

const FEATURES: &str = "\
id,screen_name,created_at,tag,followers,friends
10,alice,2019,A,3,1
20,bob,2019,B,0,0
30,carol,2020,A,1,1
40,dave,2021,B,2,6
";

const EDGES: &str = "\
src,dst
10,20
20,30
";

fn write_dataset(root: &Path, name: &str, features: &str, edges: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("dataset dir");
    fs::write(dir.join(format!("{name}.features_small")), features).expect("features");
    fs::write(dir.join(format!("{name}.graph_small")), edges).expect("edges");
}

fn setup(name: &str, features: &str, edges: &str) -> (TempDir, DatasetOptions) {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path(), name, features, edges);
    let mut options = DatasetOptions::named(name);
    options.data_root = dir.path().to_path_buf();
    (dir, options)
}

#[test]
fn four_node_example_matches_expected_record() {
    let (_dir, options) = setup("tiny", FEATURES, EDGES);
    let dataset = load_data(&options).expect("load");

    assert_eq!(dataset.num_classes(), 1);
    assert_eq!(dataset.graphs.len(), 1);
    let record = &dataset.graphs[0];
    assert_eq!(record.label(), 0);
    assert_eq!(record.node_count(), 4);
    assert_eq!(
        record.neighbors(),
        &[vec![1], vec![0, 2], vec![1], vec![]]
    );
    assert_eq!(record.max_neighbor(), 2);

    let features = record.node_features();
    assert_eq!(features.shape(), (4, 2));
    assert_eq!(features.row(0), features.row(2));
    assert_eq!(features.row(1), features.row(3));
    assert_ne!(features.row(0), features.row(1));
    for row in 0..features.rows() {
        assert_eq!(features.row_sum(row), 1.0);
    }

    let edge_mat = record.edge_mat();
    assert_eq!(edge_mat.shape(), (2, 4));
    let columns: Vec<_> = edge_mat.columns().collect();
    assert_eq!(columns, vec![(0, 1), (1, 2), (1, 0), (2, 1)]);
}

#[test]
fn dataset_keeps_remapper_and_normalized_attributes() {
    let (_dir, options) = setup("tiny", FEATURES, EDGES);
    let dataset = load_data(&options).expect("load");

    assert_eq!(dataset.remapper.get(ExternalId(30)), Some(2));
    assert_eq!(dataset.features.row(0), &[0.75, 0.25]);
    assert_eq!(dataset.features.row(1), &[0.0, 0.0]);
    assert_eq!(dataset.label_onehot.shape(), (4, 2));
    assert_eq!(dataset.edge_shape, (2, 2));
    assert_eq!(dataset.graphs[0].node_attributes()[3], vec![2.0, 6.0]);

    let summary = dataset.summary();
    assert_eq!(summary.num_nodes, 4);
    assert_eq!(summary.num_edges, 2);
    assert_eq!(summary.num_tags, 2);
    assert_eq!(summary.unresolved_endpoints, 0);
}

#[test]
fn degree_as_tag_encodes_degrees() {
    let (_dir, mut options) = setup("tiny", FEATURES, EDGES);
    options.degree_as_tag = true;
    let dataset = load_data(&options).expect("load");
    let record = &dataset.graphs[0];

    assert_eq!(record.node_tags(), &[1, 2, 1, 0]);
    assert_eq!(dataset.tag_vocab.tags().collect::<Vec<_>>(), vec![1, 2, 0]);
    assert_eq!(record.node_features().row(3), &[0.0, 0.0, 1.0]);
}

#[test]
fn reciprocal_edges_are_not_double_counted() {
    let edges = "src,dst\n10,20\n20,10\n10,20\n";
    let (_dir, options) = setup("recip", FEATURES, edges);
    let dataset = load_data(&options).expect("load");
    let record = &dataset.graphs[0];
    assert_eq!(record.neighbors()[0], vec![1]);
    assert_eq!(record.neighbors()[1], vec![0]);
    assert_eq!(record.edge_mat().len(), 2);
}

#[test]
fn single_graph_cannot_fill_ten_folds() {
    let (_dir, options) = setup("tiny", FEATURES, EDGES);
    let dataset = load_data(&options).expect("load");
    let err = separate_data(&dataset.graphs, 0, 3).unwrap_err();
    assert!(matches!(err, DatasetError::NotEnoughSamples { samples: 1, n_splits: 10 }));
    let err = separate_data(&dataset.graphs, 0, 10).unwrap_err();
    assert!(matches!(err, DatasetError::FoldOutOfRange { .. }));
}

#[test]
fn malformed_edge_id_is_fatal() {
    let (_dir, options) = setup("bad", FEATURES, "src,dst\n10,twenty\n");
    let err = load_data(&options).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Parse { line: 2, column: 1, .. }
    ));
}

#[test]
fn tab_delimited_files_load() {
    let features = FEATURES.replace(',', "\t");
    let edges = EDGES.replace(',', "\t");
    let (_dir, mut options) = setup("tabs", &features, &edges);
    options.delimiter = b'\t';
    let dataset = load_data(&options).expect("load");
    assert_eq!(dataset.graphs[0].max_neighbor(), 2);
}
