#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use super::features::{parse_id, record_line};
use super::idmap::{ExternalId, IdRemapper, UnknownIdPolicy, FALLBACK_INDEX};
use crate::error::{DatasetError, Result};

const EDGE_COLUMNS: usize = 2;

/// Edge row as read from disk, before id translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEdge {
    /// One-based line in the edge file.
    pub line: u64,
    /// Source external id.
    pub src: ExternalId,
    /// Destination external id.
    pub dst: ExternalId,
}

/// Edge pairs translated into the dense index space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeList {
    pairs: Vec<(usize, usize)>,
    rows_read: usize,
    unresolved: usize,
    dropped: usize,
}

impl EdgeList {
    /// Dense `(src, dst)` pairs in file order.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Number of translated pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true when no pair survived translation.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Shape of the translated edge array, `(rows, 2)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.pairs.len(), EDGE_COLUMNS)
    }

    /// Data rows read from the edge file.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Endpoints that were missing from the feature table.
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// Rows discarded under [`UnknownIdPolicy::Drop`].
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Reads `src,dst` rows from `path`. Columns past the second are ignored.
pub fn read_raw_edges(path: &Path, delimiter: u8) -> Result<Vec<RawEdge>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let mut edges = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record_line(&record);
        if record.len() < EDGE_COLUMNS {
            return Err(DatasetError::MissingColumn {
                path: path.to_path_buf(),
                line,
                expected: EDGE_COLUMNS,
                found: record.len(),
            });
        }
        edges.push(RawEdge {
            line,
            src: parse_id(path, &record, 0, line)?,
            dst: parse_id(path, &record, 1, line)?,
        });
    }
    Ok(edges)
}

/// Translates raw edges through `remapper` under `policy`.
///
/// `path` is only used to label [`DatasetError::UnknownNodeId`].
pub fn translate_edges(
    raw: &[RawEdge],
    remapper: &IdRemapper,
    policy: UnknownIdPolicy,
    path: &Path,
) -> Result<EdgeList> {
    let mut list = EdgeList {
        pairs: Vec::with_capacity(raw.len()),
        rows_read: raw.len(),
        ..EdgeList::default()
    };
    for edge in raw {
        let src = remapper.get(edge.src);
        let dst = remapper.get(edge.dst);
        list.unresolved += usize::from(src.is_none()) + usize::from(dst.is_none());
        match (src, dst, policy) {
            (Some(src), Some(dst), _) => list.pairs.push((src, dst)),
            (_, _, UnknownIdPolicy::Alias) => list.pairs.push((
                src.unwrap_or(FALLBACK_INDEX),
                dst.unwrap_or(FALLBACK_INDEX),
            )),
            (_, _, UnknownIdPolicy::Drop) => list.dropped += 1,
            (src_idx, _, UnknownIdPolicy::Reject) => {
                let id = if src_idx.is_none() { edge.src } else { edge.dst };
                return Err(DatasetError::UnknownNodeId {
                    path: PathBuf::from(path),
                    line: edge.line,
                    id,
                });
            }
        }
    }
    if list.unresolved > 0 {
        warn!(
            path = %path.display(),
            unresolved = list.unresolved,
            dropped = list.dropped,
            policy = policy.as_str(),
            "edge file references node ids missing from the feature table"
        );
    }
    Ok(list)
}

/// Reads `path` and translates it in one step.
pub fn load_edges(
    path: &Path,
    delimiter: u8,
    remapper: &IdRemapper,
    policy: UnknownIdPolicy,
) -> Result<EdgeList> {
    let raw = read_raw_edges(path, delimiter)?;
    let list = translate_edges(&raw, remapper, policy, path)?;
    debug!(
        path = %path.display(),
        rows = list.rows_read(),
        kept = list.len(),
        "edge list loaded"
    );
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(i64, i64)]) -> Vec<RawEdge> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (s, d))| RawEdge {
                line: i as u64 + 2,
                src: ExternalId(*s),
                dst: ExternalId(*d),
            })
            .collect()
    }

    fn remapper() -> IdRemapper {
        IdRemapper::from_ids([10, 20, 30].into_iter().map(ExternalId))
    }

    #[test]
    fn translates_known_ids() {
        let list = translate_edges(
            &raw(&[(10, 20), (30, 10)]),
            &remapper(),
            UnknownIdPolicy::Alias,
            Path::new("edges"),
        )
        .unwrap();
        assert_eq!(list.pairs(), &[(0, 1), (2, 0)]);
        assert_eq!(list.shape(), (2, 2));
        assert_eq!(list.unresolved(), 0);
    }

    #[test]
    fn alias_policy_redirects_to_first_row() {
        let list = translate_edges(
            &raw(&[(20, 99), (77, 88)]),
            &remapper(),
            UnknownIdPolicy::Alias,
            Path::new("edges"),
        )
        .unwrap();
        assert_eq!(list.pairs(), &[(1, 0), (0, 0)]);
        assert_eq!(list.unresolved(), 3);
    }

    #[test]
    fn drop_policy_discards_rows() {
        let list = translate_edges(
            &raw(&[(20, 99), (10, 30)]),
            &remapper(),
            UnknownIdPolicy::Drop,
            Path::new("edges"),
        )
        .unwrap();
        assert_eq!(list.pairs(), &[(0, 2)]);
        assert_eq!(list.dropped(), 1);
        assert_eq!(list.rows_read(), 2);
    }

    #[test]
    fn reject_policy_reports_line_and_id() {
        let err = translate_edges(
            &raw(&[(10, 20), (20, 99)]),
            &remapper(),
            UnknownIdPolicy::Reject,
            Path::new("edges"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::UnknownNodeId { line: 3, id: ExternalId(99), .. }
        ));
    }
}
