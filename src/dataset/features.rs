#![forbid(unsafe_code)]

//! Feature/label table loading.
//!
//! Raw layout, one node per row after a header:
//!
//! ```text
//! id, meta_1, meta_2, tag, attr_0, ..., attr_k
//! ```
//!
//! The two metadata columns are dropped. The tag column doubles as the label
//! source for [`FeatureTable::label_onehot`].

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use super::idmap::{ExternalId, IdRemapper};
use super::matrix::DenseMatrix;
use super::vocab::Vocabulary;
use crate::error::{DatasetError, Result};

const ID_COLUMN: usize = 0;
const TAG_COLUMN: usize = 3;
const FIRST_ATTRIBUTE_COLUMN: usize = 4;

/// One parsed feature-table row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureRow<'a> {
    /// External node id.
    pub id: ExternalId,
    /// Raw categorical tag.
    pub tag: &'a str,
    /// Attribute values, unnormalized.
    pub attributes: &'a [f32],
}

/// Parsed feature table in file order.
#[derive(Clone, Debug)]
pub struct FeatureTable {
    ids: Vec<ExternalId>,
    tags: Vec<String>,
    attributes: DenseMatrix<f32>,
}

impl FeatureTable {
    /// Builds a table from already-parsed columns.
    ///
    /// Every attribute row must have the same width.
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ExternalId, S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut ids = Vec::new();
        let mut tags = Vec::new();
        let mut data = Vec::new();
        let mut width = None;
        for (id, tag, attrs) in rows {
            match width {
                None => width = Some(attrs.len()),
                Some(w) if w != attrs.len() => {
                    return Err(DatasetError::InvalidArgument(format!(
                        "node {id} has {} attributes, expected {w}",
                        attrs.len()
                    )))
                }
                Some(_) => {}
            }
            ids.push(id);
            tags.push(tag.into());
            data.extend(attrs);
        }
        let width = width.unwrap_or(0);
        let attributes = DenseMatrix::from_vec(ids.len(), width, data).ok_or_else(|| {
            DatasetError::InvalidArgument("attribute matrix shape mismatch".into())
        })?;
        Ok(Self {
            ids,
            tags,
            attributes,
        })
    }

    /// Number of rows, which is the size of the dense index space.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// External ids in row order.
    pub fn ids(&self) -> &[ExternalId] {
        &self.ids
    }

    /// Raw tags in row order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Unnormalized attribute matrix.
    pub fn attributes(&self) -> &DenseMatrix<f32> {
        &self.attributes
    }

    /// Number of attribute columns.
    pub fn attribute_width(&self) -> usize {
        self.attributes.cols()
    }

    /// Row `index`.
    pub fn row(&self, index: usize) -> Option<FeatureRow<'_>> {
        (index < self.len()).then(|| FeatureRow {
            id: self.ids[index],
            tag: &self.tags[index],
            attributes: self.attributes.row(index),
        })
    }

    /// Rows in file order.
    pub fn rows(&self) -> impl Iterator<Item = FeatureRow<'_>> {
        (0..self.len()).filter_map(move |idx| self.row(idx))
    }

    /// Identifier remapper over this table's ids.
    pub fn remapper(&self) -> IdRemapper {
        IdRemapper::from_ids(self.ids.iter().copied())
    }

    /// L1 row-normalized attribute matrix.
    pub fn normalized_attributes(&self) -> DenseMatrix<f32> {
        self.attributes.normalized()
    }

    /// One-hot encoding of the tag column, see [`encode_onehot`].
    pub fn label_onehot(&self) -> DenseMatrix<i32> {
        encode_onehot(&self.tags)
    }
}

/// One-hot encodes `labels`; column order is first appearance.
pub fn encode_onehot<S: AsRef<str>>(labels: &[S]) -> DenseMatrix<i32> {
    let classes: Vocabulary<&str> = labels.iter().map(|label| label.as_ref()).collect();
    let mut out = DenseMatrix::zeros(labels.len(), classes.len());
    for (row, label) in labels.iter().enumerate() {
        if let Some(col) = classes.get(label.as_ref()) {
            out.set(row, col, 1);
        }
    }
    out
}

/// Reads a feature table from `path`.
pub fn load_feature_table(path: &Path, delimiter: u8) -> Result<FeatureTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let width = reader.headers()?.len();
    if width < FIRST_ATTRIBUTE_COLUMN {
        return Err(DatasetError::MissingColumn {
            path: path.to_path_buf(),
            line: 1,
            expected: FIRST_ATTRIBUTE_COLUMN,
            found: width,
        });
    }

    let mut ids = Vec::new();
    let mut tags = Vec::new();
    let mut data = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record_line(&record);
        if record.len() != width {
            return Err(DatasetError::MissingColumn {
                path: path.to_path_buf(),
                line,
                expected: width,
                found: record.len(),
            });
        }
        ids.push(parse_id(path, &record, ID_COLUMN, line)?);
        tags.push(cell(&record, TAG_COLUMN).to_string());
        for column in FIRST_ATTRIBUTE_COLUMN..width {
            let raw = cell(&record, column);
            let value = raw.parse::<f32>().map_err(|_| DatasetError::Parse {
                path: path.to_path_buf(),
                line,
                column,
                value: raw.to_string(),
                expected: "float",
            })?;
            data.push(value);
        }
    }
    if ids.is_empty() {
        return Err(DatasetError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    let attributes = DenseMatrix::from_vec(ids.len(), width - FIRST_ATTRIBUTE_COLUMN, data)
        .ok_or_else(|| DatasetError::InvalidArgument("attribute matrix shape mismatch".into()))?;
    let table = FeatureTable {
        ids,
        tags,
        attributes,
    };
    let remapper = table.remapper();
    if remapper.duplicates() > 0 {
        warn!(
            path = %path.display(),
            duplicates = remapper.duplicates(),
            "feature table repeats node ids; first occurrence wins"
        );
    }
    debug!(
        path = %path.display(),
        rows = table.len(),
        attributes = table.attribute_width(),
        "feature table loaded"
    );
    Ok(table)
}

pub(crate) fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or_default()
}

pub(crate) fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or(0)
}

pub(crate) fn parse_id(
    path: &Path,
    record: &StringRecord,
    column: usize,
    line: u64,
) -> Result<ExternalId> {
    let raw = cell(record, column);
    raw.parse::<ExternalId>().map_err(|_| DatasetError::Parse {
        path: PathBuf::from(path),
        line,
        column,
        value: raw.to_string(),
        expected: "integer node id",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn drops_metadata_and_keeps_order() {
        let file = write_table(
            "id,m1,m2,tag,a,b\n\
             10,x,y,A,1,3\n\
             20,x,y,B,0,0\n",
        );
        let table = load_feature_table(file.path(), b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.ids(), &[ExternalId(10), ExternalId(20)]);
        assert_eq!(table.tags(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.attributes().row(0), &[1.0, 3.0]);

        let normalized = table.normalized_attributes();
        assert_eq!(normalized.row(0), &[0.25, 0.75]);
        assert_eq!(normalized.row(1), &[0.0, 0.0]);
    }

    #[test]
    fn rejects_non_numeric_attribute() {
        let file = write_table("id,m1,m2,tag,a\n1,x,y,A,oops\n");
        let err = load_feature_table(file.path(), b',').unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Parse { line: 2, column: 4, .. }
        ));
    }

    #[test]
    fn rejects_header_only_table() {
        let file = write_table("id,m1,m2,tag\n");
        let err = load_feature_table(file.path(), b',').unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset { .. }));
    }

    #[test]
    fn rejects_short_rows() {
        let file = write_table("id,m1,m2,tag,a\n1,x,y,A\n");
        let err = load_feature_table(file.path(), b',').unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { expected: 5, found: 4, .. }
        ));
    }

    #[test]
    fn onehot_columns_follow_first_appearance() {
        let onehot = encode_onehot(&["b", "a", "b"]);
        assert_eq!(onehot.shape(), (3, 2));
        assert_eq!(onehot.row(0), &[1, 0]);
        assert_eq!(onehot.row(1), &[0, 1]);
        assert_eq!(onehot.row(2), &[1, 0]);
    }
}
