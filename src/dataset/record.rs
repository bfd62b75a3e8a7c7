#![forbid(unsafe_code)]

//! Graph records handed to training code.
//!
//! A record is produced in two steps. [`GraphRecordBuilder::derive`] computes
//! everything that depends on one graph alone (neighbor lists, maximum
//! degree, edge matrix, class index). [`GraphRecordBuilder::build`] then
//! attaches the one-hot node features, which need the tag vocabulary of the
//! whole dataset. A [`GraphRecord`] is never observed half-built.

use serde::Serialize;

use super::graph::{AssembledGraph, UndirectedGraph};
use super::matrix::DenseMatrix;
use super::tags::TagVocabulary;
use super::vocab::Vocabulary;
use crate::error::{DatasetError, Result};

/// Edge list in `(2, 2·|E|)` layout: column `k` is the directed pair
/// `(src[k], dst[k])`.
///
/// The first `|E|` columns are the undirected edges as the graph reports
/// them; the remaining `|E|` columns are the same edges reversed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EdgeMatrix {
    src: Vec<usize>,
    dst: Vec<usize>,
}

impl EdgeMatrix {
    /// Builds the mirrored matrix from each undirected edge listed once.
    pub fn from_undirected(edges: &[(usize, usize)]) -> Self {
        let mut src = Vec::with_capacity(edges.len() * 2);
        let mut dst = Vec::with_capacity(edges.len() * 2);
        for &(a, b) in edges {
            src.push(a);
            dst.push(b);
        }
        for &(a, b) in edges {
            src.push(b);
            dst.push(a);
        }
        Self { src, dst }
    }

    /// `(2, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (2, self.src.len())
    }

    /// Number of directed columns.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Returns true when the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// First row: source endpoints.
    pub fn sources(&self) -> &[usize] {
        &self.src
    }

    /// Second row: destination endpoints.
    pub fn targets(&self) -> &[usize] {
        &self.dst
    }

    /// Column `k` as `(src, dst)`.
    pub fn column(&self, k: usize) -> Option<(usize, usize)> {
        Some((*self.src.get(k)?, *self.dst.get(k)?))
    }

    /// Columns in order.
    pub fn columns(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }
}

/// A fully derived graph record.
#[derive(Clone, Debug)]
pub struct GraphRecord {
    graph: UndirectedGraph,
    label: usize,
    node_tags: Vec<usize>,
    node_attributes: Vec<Vec<f32>>,
    neighbors: Vec<Vec<usize>>,
    max_neighbor: usize,
    node_features: DenseMatrix<f32>,
    edge_mat: EdgeMatrix,
}

impl GraphRecord {
    /// Underlying undirected graph.
    pub fn graph(&self) -> &UndirectedGraph {
        &self.graph
    }

    /// Dense class index.
    pub fn label(&self) -> usize {
        self.label
    }

    /// Tag per node, or degree per node when degree substitution is on.
    pub fn node_tags(&self) -> &[usize] {
        &self.node_tags
    }

    /// Unnormalized attribute vector per node.
    pub fn node_attributes(&self) -> &[Vec<f32>] {
        &self.node_attributes
    }

    /// Adjacent dense indices per node, without self-loops.
    pub fn neighbors(&self) -> &[Vec<usize>] {
        &self.neighbors
    }

    /// Largest neighbor-list length.
    pub fn max_neighbor(&self) -> usize {
        self.max_neighbor
    }

    /// One-hot tag matrix, nodes x vocabulary size.
    pub fn node_features(&self) -> &DenseMatrix<f32> {
        &self.node_features
    }

    /// Mirrored edge list.
    pub fn edge_mat(&self) -> &EdgeMatrix {
        &self.edge_mat
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_tags.len()
    }
}

/// A record whose per-graph fields are derived but whose one-hot features
/// still wait on the dataset-wide tag vocabulary.
#[derive(Clone, Debug)]
pub struct GraphRecordBuilder {
    graph: UndirectedGraph,
    label: usize,
    node_tags: Vec<usize>,
    node_attributes: Vec<Vec<f32>>,
    neighbors: Vec<Vec<usize>>,
    max_neighbor: usize,
    edge_mat: EdgeMatrix,
}

impl GraphRecordBuilder {
    /// Derives neighbor lists, maximum degree, class index, and edge matrix.
    ///
    /// Every undirected edge appends each endpoint to the other's list, in
    /// the order [`UndirectedGraph::edges`] reports them. Self-loops are
    /// left out of the lists. With `degree_as_tag` the node tags are replaced
    /// by node degrees.
    pub fn derive(
        assembled: AssembledGraph,
        label_dict: &Vocabulary<i64>,
        degree_as_tag: bool,
    ) -> Result<Self> {
        let AssembledGraph {
            graph,
            label,
            node_tags,
            node_attributes,
            ..
        } = assembled;

        let n = node_tags.len();
        if graph.node_count() != n || graph.nodes().any(|node| node >= n) {
            return Err(DatasetError::InvalidArgument(format!(
                "graph nodes do not cover dense indices 0..{n}"
            )));
        }
        let class = label_dict.get(&label).ok_or_else(|| {
            DatasetError::InvalidArgument(format!("label {label} missing from label dictionary"))
        })?;

        let edges = graph.edges();
        let mut neighbors = vec![Vec::new(); n];
        for &(i, j) in &edges {
            if i == j {
                continue;
            }
            neighbors[i].push(j);
            neighbors[j].push(i);
        }
        let max_neighbor = neighbors.iter().map(Vec::len).max().unwrap_or(0);

        let node_tags = if degree_as_tag {
            (0..n).map(|node| graph.degree(node)).collect()
        } else {
            node_tags
        };

        Ok(Self {
            edge_mat: EdgeMatrix::from_undirected(&edges),
            graph,
            label: class,
            node_tags,
            node_attributes,
            neighbors,
            max_neighbor,
        })
    }

    /// Tags the vocabulary pass will collect.
    pub fn node_tags(&self) -> &[usize] {
        &self.node_tags
    }

    /// Dense class index.
    pub fn label(&self) -> usize {
        self.label
    }

    /// Attaches one-hot node features and freezes the record.
    ///
    /// Fails when a node tag is missing from `vocab`.
    pub fn build(self, vocab: &TagVocabulary) -> Result<GraphRecord> {
        let node_features = vocab.encode(&self.node_tags)?;
        Ok(GraphRecord {
            graph: self.graph,
            label: self.label,
            node_tags: self.node_tags,
            node_attributes: self.node_attributes,
            neighbors: self.neighbors,
            max_neighbor: self.max_neighbor,
            node_features,
            edge_mat: self.edge_mat,
        })
    }
}
