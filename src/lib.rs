//! Node-attributed graph dataset preparation for graph neural network
//! training: loads a feature table and an edge list, rebuilds the graph,
//! derives structural and one-hot tag features, and produces stratified
//! cross-validation folds.

#![warn(missing_docs)]

pub mod dataset;
pub mod error;
pub mod logging;

pub use dataset::{
    load_data, separate_data, Dataset, DatasetOptions, DatasetSummary, FoldSplit, GraphRecord,
    UnknownIdPolicy,
};
pub use error::{DatasetError, Result};
