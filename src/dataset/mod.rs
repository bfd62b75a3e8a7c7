#![forbid(unsafe_code)]

//! Graph dataset preparation.
//!
//! The pipeline runs leaves first: the feature table is parsed and its ids
//! remapped to dense indices ([`features`], [`idmap`]), the edge list is
//! translated through that mapping ([`edges`]), symmetrized ([`adjacency`]),
//! and assembled into a single undirected graph ([`graph`]). Per-graph
//! fields are then derived ([`record`]), the dataset-wide tag vocabulary is
//! fitted and applied ([`tags`]), and [`folds`] splits the finished records
//! for cross-validation. [`loader`] wires the whole sequence together.

/// Symmetric adjacency relation.
pub mod adjacency;
/// Edge list loading and id translation.
pub mod edges;
/// Feature/label table loading.
pub mod features;
/// Stratified cross-validation folds.
pub mod folds;
/// Undirected graph and the graph assembler.
pub mod graph;
/// External id to dense index mapping.
pub mod idmap;
/// End-to-end loading.
pub mod loader;
/// Dense matrices.
pub mod matrix;
/// Graph records and their builder.
pub mod record;
/// Tag vocabulary and one-hot encoding.
pub mod tags;
/// Ordered first-seen dictionaries.
pub mod vocab;

pub use adjacency::Adjacency;
pub use edges::{load_edges, EdgeList, RawEdge};
pub use features::{encode_onehot, load_feature_table, FeatureRow, FeatureTable};
pub use folds::{separate_data, Fold, FoldSplit, StratifiedKFold, N_SPLITS};
pub use graph::{assemble_graph, AssembledGraph, UndirectedGraph};
pub use idmap::{ExternalId, IdRemapper, UnknownIdPolicy};
pub use loader::{load_data, load_from_paths, Dataset, DatasetOptions, DatasetSummary};
pub use matrix::DenseMatrix;
pub use record::{EdgeMatrix, GraphRecord, GraphRecordBuilder};
pub use tags::{encode_records, TagVocabulary};
pub use vocab::Vocabulary;
