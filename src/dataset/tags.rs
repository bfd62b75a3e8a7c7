#![forbid(unsafe_code)]

use super::matrix::DenseMatrix;
use super::record::{GraphRecord, GraphRecordBuilder};
use super::vocab::Vocabulary;
use crate::error::{DatasetError, Result};

/// Dataset-wide tag vocabulary mapping each distinct tag to a one-hot column.
///
/// Columns are assigned in first appearance across records in order, then
/// nodes in order, so the encoding is identical on every run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagVocabulary {
    columns: Vocabulary<usize>,
}

impl TagVocabulary {
    /// Collects the union of node tags over every pending record.
    pub fn collect(records: &[GraphRecordBuilder]) -> Self {
        Self::from_tags(
            records
                .iter()
                .flat_map(|record| record.node_tags().iter().copied()),
        )
    }

    /// Builds a vocabulary from tags in the order given.
    pub fn from_tags<I: IntoIterator<Item = usize>>(tags: I) -> Self {
        Self {
            columns: tags.into_iter().collect(),
        }
    }

    /// One-hot width.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when no tag was seen.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column of `tag`.
    pub fn column(&self, tag: usize) -> Option<usize> {
        self.columns.get(&tag)
    }

    /// Tags in column order.
    pub fn tags(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.keys().copied()
    }

    /// Encodes `node_tags` as a `nodes x len()` one-hot matrix.
    pub fn encode(&self, node_tags: &[usize]) -> Result<DenseMatrix<f32>> {
        let mut features = DenseMatrix::zeros(node_tags.len(), self.len());
        for (node, &tag) in node_tags.iter().enumerate() {
            let col = self.column(tag).ok_or_else(|| {
                DatasetError::InvalidArgument(format!("tag {tag} of node {node} has no column"))
            })?;
            features.set(node, col, 1.0);
        }
        Ok(features)
    }
}

/// Runs the tag pass over every pending record: collects the shared
/// vocabulary, then freezes each record with its one-hot features.
pub fn encode_records(
    pending: Vec<GraphRecordBuilder>,
) -> Result<(Vec<GraphRecord>, TagVocabulary)> {
    let vocab = TagVocabulary::collect(&pending);
    let records = pending
        .into_iter()
        .map(|builder| builder.build(&vocab))
        .collect::<Result<Vec<_>>>()?;
    Ok((records, vocab))
}
