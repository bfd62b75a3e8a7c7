#![forbid(unsafe_code)]

//! Translation from external node identifiers to dense indices.
//!
//! Input files name nodes with arbitrary sparse integers. Everything past the
//! loaders works in the dense index space `0..n`, where `n` is the number of
//! feature-table rows and a node's index is the row of its first appearance.
//!
//! **Unresolved ids alias to index 0.** An edge endpoint missing from the
//! feature table is mapped to dense index 0 under [`UnknownIdPolicy::Alias`],
//! which silently attaches the edge to whatever node happens to sit in the
//! first row. [`UnknownIdPolicy::Drop`] and [`UnknownIdPolicy::Reject`] are
//! available for datasets where that corruption is unacceptable.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node identifier as it appears in the input files.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct ExternalId(pub i64);

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExternalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ExternalId)
    }
}

impl From<i64> for ExternalId {
    fn from(value: i64) -> Self {
        ExternalId(value)
    }
}

/// What to do with an edge endpoint absent from the feature table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownIdPolicy {
    /// Map the endpoint to dense index 0.
    #[default]
    Alias,
    /// Discard the whole edge row.
    Drop,
    /// Fail the load.
    Reject,
}

impl UnknownIdPolicy {
    /// Lowercase name used in config files and flags.
    pub fn as_str(self) -> &'static str {
        match self {
            UnknownIdPolicy::Alias => "alias",
            UnknownIdPolicy::Drop => "drop",
            UnknownIdPolicy::Reject => "reject",
        }
    }
}

impl FromStr for UnknownIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alias" => Ok(UnknownIdPolicy::Alias),
            "drop" => Ok(UnknownIdPolicy::Drop),
            "reject" => Ok(UnknownIdPolicy::Reject),
            other => Err(format!(
                "unknown id policy '{other}', expected alias, drop, or reject"
            )),
        }
    }
}

/// Dense index that unresolved ids alias to under [`UnknownIdPolicy::Alias`].
pub const FALLBACK_INDEX: usize = 0;

/// Bijection from external ids to dense row indices.
#[derive(Clone, Debug, Default)]
pub struct IdRemapper {
    map: IndexMap<ExternalId, usize>,
    rows: usize,
    duplicates: usize,
}

impl IdRemapper {
    /// Builds the mapping from ids in feature-table row order.
    ///
    /// A repeated id keeps the row of its first occurrence; later rows with
    /// the same id still count toward [`IdRemapper::node_count`].
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ExternalId>,
    {
        let mut remapper = Self::default();
        for (row, id) in ids.into_iter().enumerate() {
            if remapper.map.contains_key(&id) {
                remapper.duplicates += 1;
            } else {
                remapper.map.insert(id, row);
            }
            remapper.rows = row + 1;
        }
        remapper
    }

    /// Dense index of `id`, or `None` when the feature table lacks it.
    pub fn get(&self, id: ExternalId) -> Option<usize> {
        self.map.get(&id).copied()
    }

    /// Dense index of `id`, aliasing unknown ids to [`FALLBACK_INDEX`].
    pub fn resolve(&self, id: ExternalId) -> usize {
        self.get(id).unwrap_or(FALLBACK_INDEX)
    }

    /// Returns true when `id` appears in the feature table.
    pub fn contains(&self, id: ExternalId) -> bool {
        self.map.contains_key(&id)
    }

    /// Number of distinct external ids.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true when no id was registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Size of the dense index space (feature-table rows).
    pub fn node_count(&self) -> usize {
        self.rows
    }

    /// Number of rows whose id repeated an earlier row.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// `(external, dense)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (ExternalId, usize)> + '_ {
        self.map.iter().map(|(id, idx)| (*id, *idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<ExternalId> {
        raw.iter().copied().map(ExternalId).collect()
    }

    #[test]
    fn assigns_rows_in_file_order() {
        let remapper = IdRemapper::from_ids(ids(&[10, 20, 30, 40]));
        assert_eq!(remapper.get(ExternalId(10)), Some(0));
        assert_eq!(remapper.get(ExternalId(40)), Some(3));
        assert_eq!(remapper.len(), 4);
        assert_eq!(remapper.node_count(), 4);
    }

    #[test]
    fn unknown_ids_alias_to_first_row() {
        let remapper = IdRemapper::from_ids(ids(&[7, 8]));
        assert_eq!(remapper.get(ExternalId(99)), None);
        assert_eq!(remapper.resolve(ExternalId(99)), FALLBACK_INDEX);
    }

    #[test]
    fn repeated_id_keeps_first_row() {
        let remapper = IdRemapper::from_ids(ids(&[5, 6, 5]));
        assert_eq!(remapper.get(ExternalId(5)), Some(0));
        assert_eq!(remapper.len(), 2);
        assert_eq!(remapper.node_count(), 3);
        assert_eq!(remapper.duplicates(), 1);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Drop".parse::<UnknownIdPolicy>(), Ok(UnknownIdPolicy::Drop));
        assert!("ignore".parse::<UnknownIdPolicy>().is_err());
    }
}
