#![forbid(unsafe_code)]

//! Stratified k-fold splitting.
//!
//! Samples are grouped by label and groups are visited in ascending label
//! order. Each group is shuffled with a `ChaCha8Rng` seeded once per split,
//! then dealt round-robin onto the folds, the fold cursor carrying over from
//! one group to the next. Fold sizes therefore differ by at most one, each
//! label's count per fold differs by at most one, and the test folds
//! partition the samples exactly.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::record::GraphRecord;
use crate::error::{DatasetError, Result};

/// Fold count used by [`separate_data`].
pub const N_SPLITS: usize = 10;

/// Train/test sample indices for one fold, each ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fold {
    /// Indices outside the fold.
    pub train: Vec<usize>,
    /// Indices inside the fold.
    pub test: Vec<usize>,
}

/// Seeded stratified k-fold splitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StratifiedKFold {
    n_splits: usize,
    seed: u64,
}

impl StratifiedKFold {
    /// Creates a splitter. `n_splits` must be at least 2.
    pub fn new(n_splits: usize, seed: u64) -> Result<Self> {
        if n_splits < 2 {
            return Err(DatasetError::InvalidArgument(format!(
                "n_splits must be at least 2, got {n_splits}"
            )));
        }
        Ok(Self { n_splits, seed })
    }

    /// Number of folds.
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Fold index of every sample.
    pub fn assign(&self, labels: &[usize]) -> Result<Vec<usize>> {
        if labels.len() < self.n_splits {
            return Err(DatasetError::NotEnoughSamples {
                samples: labels.len(),
                n_splits: self.n_splits,
            });
        }
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in labels.iter().enumerate() {
            groups.entry(label).or_default().push(idx);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut assignment = vec![0usize; labels.len()];
        let mut cursor = 0usize;
        for members in groups.values_mut() {
            members.shuffle(&mut rng);
            for &idx in members.iter() {
                assignment[idx] = cursor;
                cursor = (cursor + 1) % self.n_splits;
            }
        }
        Ok(assignment)
    }

    /// All folds in order.
    pub fn split(&self, labels: &[usize]) -> Result<Vec<Fold>> {
        let assignment = self.assign(labels)?;
        let mut folds = vec![Fold::default(); self.n_splits];
        for (idx, &fold) in assignment.iter().enumerate() {
            for (f, out) in folds.iter_mut().enumerate() {
                if f == fold {
                    out.test.push(idx);
                } else {
                    out.train.push(idx);
                }
            }
        }
        Ok(folds)
    }

    /// Fold `fold_idx` only.
    pub fn fold(&self, labels: &[usize], fold_idx: usize) -> Result<Fold> {
        self.check_fold(fold_idx)?;
        let assignment = self.assign(labels)?;
        let (test, train): (Vec<usize>, Vec<usize>) =
            (0..labels.len()).partition(|&idx| assignment[idx] == fold_idx);
        Ok(Fold { train, test })
    }

    fn check_fold(&self, fold_idx: usize) -> Result<()> {
        if fold_idx >= self.n_splits {
            return Err(DatasetError::FoldOutOfRange {
                fold_idx,
                n_splits: self.n_splits,
            });
        }
        Ok(())
    }
}

/// Borrowed train/test view over a record list.
#[derive(Clone, Debug)]
pub struct FoldSplit<'a> {
    /// Records outside the fold.
    pub train: Vec<&'a GraphRecord>,
    /// Records inside the fold.
    pub test: Vec<&'a GraphRecord>,
}

/// Splits `graphs` into 10 stratified folds and returns fold `fold_idx`.
///
/// `fold_idx` outside `0..10` fails before any work is done.
pub fn separate_data(graphs: &[GraphRecord], seed: u64, fold_idx: usize) -> Result<FoldSplit<'_>> {
    let splitter = StratifiedKFold::new(N_SPLITS, seed)?;
    splitter.check_fold(fold_idx)?;
    let labels: Vec<usize> = graphs.iter().map(GraphRecord::label).collect();
    let fold = splitter.fold(&labels, fold_idx)?;
    debug!(
        fold_idx,
        seed,
        train = fold.train.len(),
        test = fold.test.len(),
        "dataset separated"
    );
    Ok(FoldSplit {
        train: fold.train.iter().map(|&idx| &graphs[idx]).collect(),
        test: fold.test.iter().map(|&idx| &graphs[idx]).collect(),
    })
}
