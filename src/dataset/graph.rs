#![forbid(unsafe_code)]

//! Undirected graph assembly.
//!
//! [`UndirectedGraph`] keeps nodes and each node's neighbors in insertion
//! order. Adding an edge whose endpoint is not yet a node inserts that node
//! at the end, so the node order the edge walk sees can differ from dense
//! index order.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::adjacency::Adjacency;
use super::features::FeatureTable;
use super::vocab::Vocabulary;
use crate::error::{DatasetError, Result};

/// Simple undirected graph over dense indices. Parallel edges collapse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndirectedGraph {
    adj: IndexMap<usize, IndexSet<usize>>,
}

impl UndirectedGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` if absent.
    pub fn add_node(&mut self, node: usize) {
        self.adj.entry(node).or_default();
    }

    /// Adds the undirected edge `{u, v}`. Re-adding an edge is a no-op.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.adj.entry(u).or_default().insert(v);
        self.adj.entry(v).or_default().insert(u);
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.adj.keys().copied()
    }

    /// Returns true when `node` is in the graph.
    pub fn contains_node(&self, node: usize) -> bool {
        self.adj.contains_key(&node)
    }

    /// Returns true when `{u, v}` is an edge.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj.get(&u).is_some_and(|nbrs| nbrs.contains(&v))
    }

    /// Neighbors of `node` in insertion order, self included for a self-loop.
    pub fn adjacent(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj.get(&node).into_iter().flatten().copied()
    }

    /// Degree of `node`; a self-loop contributes 2.
    pub fn degree(&self, node: usize) -> usize {
        self.adj.get(&node).map_or(0, |nbrs| {
            nbrs.len() + usize::from(nbrs.contains(&node))
        })
    }

    /// Each undirected edge exactly once.
    ///
    /// Nodes are walked in insertion order and an edge is reported from the
    /// first endpoint the walk reaches, oriented `(that endpoint, other)`.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut seen: IndexSet<usize> = IndexSet::with_capacity(self.adj.len());
        let mut out = Vec::new();
        for (&node, nbrs) in &self.adj {
            for &nbr in nbrs {
                if !seen.contains(&nbr) {
                    out.push((node, nbr));
                }
            }
            seen.insert(node);
        }
        out
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }
}

/// Output of the graph assembler: one graph plus per-node raw data.
#[derive(Clone, Debug)]
pub struct AssembledGraph {
    /// Graph over dense indices `0..n`.
    pub graph: UndirectedGraph,
    /// Raw label of the whole graph, not yet remapped.
    pub label: i64,
    /// Tag id per dense index, from the shared tag dictionary.
    pub node_tags: Vec<usize>,
    /// Unnormalized attribute vector per dense index.
    pub node_attributes: Vec<Vec<f32>>,
    /// Nonzero adjacency entries visited while assembling.
    pub visited_entries: usize,
}

/// Assembles the single dataset graph.
///
/// For each dense index `j`: add node `j`, intern its tag into `feat_dict`,
/// keep its attribute row, and add an edge to every nonzero column of
/// adjacency row `j`. Each undirected edge is offered twice (once from each
/// endpoint); the graph absorbs the repeat.
pub fn assemble_graph(
    table: &FeatureTable,
    adjacency: &Adjacency,
    feat_dict: &mut Vocabulary<String>,
    label: i64,
) -> Result<AssembledGraph> {
    if adjacency.node_count() != table.len() {
        return Err(DatasetError::InvalidArgument(format!(
            "adjacency covers {} nodes but the feature table has {} rows",
            adjacency.node_count(),
            table.len()
        )));
    }

    let mut graph = UndirectedGraph::new();
    let mut node_tags = Vec::with_capacity(table.len());
    let mut node_attributes = Vec::with_capacity(table.len());
    let mut visited_entries = 0usize;

    for (j, row) in table.rows().enumerate() {
        graph.add_node(j);
        node_tags.push(feat_dict.intern(row.tag.to_string()));
        node_attributes.push(row.attributes.to_vec());

        let dsts = adjacency.neighbors(j);
        visited_entries += dsts.len();
        for &dst in dsts {
            graph.add_edge(j, dst);
        }
    }

    debug!(
        nodes = graph.node_count(),
        entries = visited_entries,
        tags = feat_dict.len(),
        "graph assembled"
    );
    Ok(AssembledGraph {
        graph,
        label,
        node_tags,
        node_attributes,
        visited_entries,
    })
}
