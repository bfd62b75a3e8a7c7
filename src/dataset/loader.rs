#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::adjacency::Adjacency;
use super::edges::load_edges;
use super::features::load_feature_table;
use super::graph::assemble_graph;
use super::idmap::{IdRemapper, UnknownIdPolicy};
use super::matrix::DenseMatrix;
use super::record::{GraphRecord, GraphRecordBuilder};
use super::tags::{encode_records, TagVocabulary};
use super::vocab::Vocabulary;
use crate::error::{DatasetError, Result};

/// Label given to the single graph the loader produces.
pub const DEFAULT_GRAPH_LABEL: i64 = 1;

/// Where to find a dataset and how to interpret it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOptions {
    /// Directory holding one subdirectory per dataset.
    pub data_root: PathBuf,
    /// Dataset name; also the file stem of both input files.
    pub name: String,
    /// Extension of the feature/label table.
    pub features_suffix: String,
    /// Extension of the edge list.
    pub graph_suffix: String,
    /// Field delimiter shared by both files.
    pub delimiter: u8,
    /// Replace node tags with node degrees before encoding.
    pub degree_as_tag: bool,
    /// Handling of edge endpoints missing from the feature table.
    pub unknown_ids: UnknownIdPolicy,
    /// Raw label assigned to the graph.
    pub label: i64,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("../data"),
            name: String::new(),
            features_suffix: "features_small".into(),
            graph_suffix: "graph_small".into(),
            delimiter: b',',
            degree_as_tag: false,
            unknown_ids: UnknownIdPolicy::Alias,
            label: DEFAULT_GRAPH_LABEL,
        }
    }
}

impl DatasetOptions {
    /// Options for dataset `name` with every other field defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `{data_root}/{name}/{name}.{features_suffix}`.
    pub fn features_path(&self) -> PathBuf {
        self.dataset_file(&self.features_suffix)
    }

    /// `{data_root}/{name}/{name}.{graph_suffix}`.
    pub fn graph_path(&self) -> PathBuf {
        self.dataset_file(&self.graph_suffix)
    }

    fn dataset_file(&self, suffix: &str) -> PathBuf {
        self.data_root
            .join(&self.name)
            .join(format!("{}.{}", self.name, suffix))
    }
}

/// Everything the loader produces. The caller owns all of it.
#[derive(Clone, Debug)]
pub struct Dataset {
    /// Graph records; currently always exactly one.
    pub graphs: Vec<GraphRecord>,
    /// Raw label to class index.
    pub label_dict: Vocabulary<i64>,
    /// Raw tag string to tag id.
    pub feat_dict: Vocabulary<String>,
    /// Tag id (or degree) to one-hot column.
    pub tag_vocab: TagVocabulary,
    /// External id to dense index.
    pub remapper: IdRemapper,
    /// L1 row-normalized attribute matrix, one row per node.
    pub features: DenseMatrix<f32>,
    /// One-hot encoding of the tag column, one row per node.
    pub label_onehot: DenseMatrix<i32>,
    /// Shape of the translated edge array.
    pub edge_shape: (usize, usize),
    /// Edge endpoints missing from the feature table.
    pub unresolved_endpoints: usize,
}

impl Dataset {
    /// Number of distinct classes.
    pub fn num_classes(&self) -> usize {
        self.label_dict.len()
    }

    /// Consumes the dataset into `(graphs, num_classes)`.
    pub fn into_parts(self) -> (Vec<GraphRecord>, usize) {
        let classes = self.num_classes();
        (self.graphs, classes)
    }

    /// Counters describing the load.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            num_classes: self.num_classes(),
            num_tags: self.tag_vocab.len(),
            num_graphs: self.graphs.len(),
            num_nodes: self.graphs.iter().map(GraphRecord::node_count).sum(),
            num_edges: self
                .graphs
                .iter()
                .map(|g| g.edge_mat().len() / 2)
                .sum(),
            max_neighbor: self
                .graphs
                .iter()
                .map(GraphRecord::max_neighbor)
                .max()
                .unwrap_or(0),
            attribute_width: self.features.cols(),
            edge_rows: self.edge_shape.0,
            unresolved_endpoints: self.unresolved_endpoints,
        }
    }
}

/// Counters describing a loaded dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// Distinct classes.
    pub num_classes: usize,
    /// One-hot width.
    pub num_tags: usize,
    /// Graph records.
    pub num_graphs: usize,
    /// Nodes across all records.
    pub num_nodes: usize,
    /// Undirected edges across all records.
    pub num_edges: usize,
    /// Largest neighbor-list length across all records.
    pub max_neighbor: usize,
    /// Attribute columns per node.
    pub attribute_width: usize,
    /// Translated edge rows.
    pub edge_rows: usize,
    /// Edge endpoints missing from the feature table.
    pub unresolved_endpoints: usize,
}

/// Loads the dataset named by `options` from `{data_root}/{name}/`.
pub fn load_data(options: &DatasetOptions) -> Result<Dataset> {
    if options.name.trim().is_empty() {
        return Err(DatasetError::InvalidArgument("dataset name is empty".into()));
    }
    info!("Loading {} dataset...", options.name);
    load_from_paths(&options.features_path(), &options.graph_path(), options)
}

/// Loads a dataset from explicit file paths. Path fields of `options` are
/// ignored.
pub fn load_from_paths(
    features_path: &Path,
    graph_path: &Path,
    options: &DatasetOptions,
) -> Result<Dataset> {
    let table = load_feature_table(features_path, options.delimiter)?;
    let features = table.normalized_attributes();
    let label_onehot = table.label_onehot();
    let remapper = table.remapper();

    let edges = load_edges(graph_path, options.delimiter, &remapper, options.unknown_ids)?;
    info!("edges shape: {:?}", edges.shape());
    let adjacency = Adjacency::from_pairs(edges.pairs(), table.len())?;

    let mut label_dict = Vocabulary::new();
    label_dict.intern(options.label);
    let mut feat_dict = Vocabulary::new();
    let assembled = assemble_graph(&table, &adjacency, &mut feat_dict, options.label)?;

    let pending = vec![GraphRecordBuilder::derive(
        assembled,
        &label_dict,
        options.degree_as_tag,
    )?];
    let (graphs, tag_vocab) = encode_records(pending)?;

    info!("# classes: {}", label_dict.len());
    info!("# maximum node tag: {}", tag_vocab.len());
    info!("# data: {}", graphs.len());

    Ok(Dataset {
        graphs,
        label_dict,
        feat_dict,
        tag_vocab,
        remapper,
        features,
        label_onehot,
        edge_shape: edges.shape(),
        unresolved_endpoints: edges.unresolved(),
    })
}
