#![forbid(unsafe_code)]

//! Symmetric 0/1 adjacency relation in compressed sparse row form.

use crate::error::{DatasetError, Result};

/// Symmetric, deduplicated adjacency relation over `0..n`.
///
/// Built as the logical OR of the observed directed pairs and their
/// transpose, so a reciprocal pair is stored once per direction rather than
/// counted twice. Self-loops present in the input are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    /// Row `i` occupies `col_idx[row_ptr[i]..row_ptr[i + 1]]`.
    row_ptr: Vec<usize>,
    /// Neighbor indices, ascending within each row.
    col_idx: Vec<usize>,
}

impl Adjacency {
    /// Builds the symmetric relation over `node_count` nodes.
    ///
    /// Fails when a pair names an index outside `0..node_count`.
    pub fn from_pairs(pairs: &[(usize, usize)], node_count: usize) -> Result<Self> {
        let mut entries = Vec::with_capacity(pairs.len() * 2);
        for &(src, dst) in pairs {
            if src >= node_count || dst >= node_count {
                return Err(DatasetError::InvalidArgument(format!(
                    "edge ({src}, {dst}) outside {node_count} nodes"
                )));
            }
            entries.push((src, dst));
            entries.push((dst, src));
        }
        entries.sort_unstable();
        entries.dedup();

        let mut row_ptr = Vec::with_capacity(node_count + 1);
        let mut col_idx = Vec::with_capacity(entries.len());
        row_ptr.push(0);
        let mut cursor = entries.iter().peekable();
        for row in 0..node_count {
            while let Some(&(_, dst)) = cursor.next_if(|(src, _)| *src == row) {
                col_idx.push(dst);
            }
            row_ptr.push(col_idx.len());
        }
        Ok(Self { row_ptr, col_idx })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Number of stored `(i, j)` entries, counting both directions.
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Nonzero columns of row `node`, ascending.
    ///
    /// # Panics
    /// Panics when `node` is out of range.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[node]..self.row_ptr[node + 1]]
    }

    /// Nonzero count of row `node`. A self-loop counts once.
    pub fn row_count(&self, node: usize) -> usize {
        self.row_ptr[node + 1] - self.row_ptr[node]
    }

    /// Returns true when `(src, dst)` is in the relation.
    pub fn contains(&self, src: usize, dst: usize) -> bool {
        src < self.node_count() && self.neighbors(src).binary_search(&dst).is_ok()
    }

    /// Iterates every stored `(i, j)` entry in row order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.node_count())
            .flat_map(move |row| self.neighbors(row).iter().map(move |&col| (row, col)))
    }

    /// Symmetric degree normalization `D^-1/2 A D^-1/2`.
    ///
    /// Returns per-row `(column, weight)` lists in the same order as
    /// [`Adjacency::neighbors`]. Rows with no entries contribute a zero
    /// inverse square root instead of infinity.
    pub fn normalize_adj(&self) -> Vec<Vec<(usize, f32)>> {
        let inv_sqrt: Vec<f32> = (0..self.node_count())
            .map(|row| {
                let value = (self.row_count(row) as f32).powf(-0.5);
                if value.is_finite() {
                    value
                } else {
                    0.0
                }
            })
            .collect();
        (0..self.node_count())
            .map(|row| {
                self.neighbors(row)
                    .iter()
                    .map(|&col| (col, inv_sqrt[row] * inv_sqrt[col]))
                    .collect()
            })
            .collect()
    }
}
