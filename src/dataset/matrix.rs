#![forbid(unsafe_code)]

use serde::Serialize;

/// Dense row-major matrix.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DenseMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> DenseMatrix<T> {
    /// Allocates a `rows x cols` matrix filled with `T::default()`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Wraps `data` laid out row by row. Returns `None` on a size mismatch.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { rows, cols, data })
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrites `(row, col)`.
    ///
    /// # Panics
    /// Panics when the coordinate is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) outside {}x{} matrix",
            self.rows,
            self.cols
        );
        self.data[row * self.cols + col] = value;
    }
}

impl<T> DenseMatrix<T> {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Borrowed row slice.
    ///
    /// # Panics
    /// Panics when `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutable row slice.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterates rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |row| self.row(row))
    }

    /// Row-major backing storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl DenseMatrix<f32> {
    /// Sum of row `row`.
    pub fn row_sum(&self, row: usize) -> f32 {
        self.row(row).iter().sum()
    }

    /// L1 row normalization: each row is divided by its sum.
    ///
    /// Rows summing to zero stay all-zero instead of turning into NaN or
    /// infinity.
    pub fn normalize_rows(&mut self) {
        for row in 0..self.rows {
            let sum: f32 = self.row(row).iter().sum();
            let inv = match sum.recip() {
                inv if sum != 0.0 && inv.is_finite() => inv,
                _ => 0.0,
            };
            for value in self.row_mut(row) {
                *value *= inv;
            }
        }
    }

    /// Returns a row-normalized copy; see [`DenseMatrix::normalize_rows`].
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.normalize_rows();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_rows_and_keeps_zero_rows() {
        let mut m = DenseMatrix::from_vec(2, 3, vec![1.0, 1.0, 2.0, 0.0, 0.0, 0.0]).unwrap();
        m.normalize_rows();
        assert_eq!(m.row(0), &[0.25, 0.25, 0.5]);
        assert_eq!(m.row(1), &[0.0, 0.0, 0.0]);
        assert!(m.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn from_vec_rejects_bad_shape() {
        assert!(DenseMatrix::from_vec(2, 2, vec![0i32; 3]).is_none());
    }

    #[test]
    fn zero_width_matrix_yields_empty_rows() {
        let m: DenseMatrix<f32> = DenseMatrix::zeros(3, 0);
        assert_eq!(m.shape(), (3, 0));
        assert_eq!(m.iter_rows().count(), 3);
        assert_eq!(m.row(2).len(), 0);
    }

    #[test]
    fn set_and_get() {
        let mut m: DenseMatrix<i32> = DenseMatrix::zeros(2, 2);
        m.set(1, 0, 7);
        assert_eq!(m.get(1, 0), Some(7));
        assert_eq!(m.get(2, 0), None);
    }
}
