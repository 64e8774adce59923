//! Small dense matrices for the normal-equation solver
//!
//! Regression here never has more than three columns (intercept plus two
//! features), so a row-major `Vec<f64>` with Gauss-Jordan inversion is all
//! that is needed.

use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Pivots with magnitude below this are treated as zero
pub const PIVOT_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Build from row vectors; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(Error::DimensionMismatch(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t[(c, r)] = self[(r, c)];
            }
        }
        t
    }

    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::DimensionMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = Self::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                out[(r, c)] = (0..self.cols).map(|k| self[(r, k)] * other[(k, c)]).sum();
            }
        }
        Ok(out)
    }

    pub fn multiply_vector(&self, v: &[f64]) -> Result<Vec<f64>> {
        if self.cols != v.len() {
            return Err(Error::DimensionMismatch(format!(
                "cannot multiply {}x{} by vector of length {}",
                self.rows,
                self.cols,
                v.len()
            )));
        }
        Ok((0..self.rows)
            .map(|r| self.row(r).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Invert by Gauss-Jordan elimination with partial pivoting.
    ///
    /// At each column the row with the largest-magnitude entry is swapped in
    /// as pivot. A pivot below [`PIVOT_EPSILON`] fails with
    /// [`Error::SingularMatrix`].
    pub fn inverse(&self) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(Error::NonSquareMatrix {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let n = self.rows;
        let mut a = self.clone();
        let mut inv = Self::identity(n);

        for col in 0..n {
            let pivot_row = a.pivot_row(col);

            if pivot_row != col {
                a.swap_rows(col, pivot_row);
                inv.swap_rows(col, pivot_row);
            }

            let pivot = a[(col, col)];
            if pivot.abs() < PIVOT_EPSILON {
                return Err(Error::SingularMatrix {
                    size: n,
                    pivot_column: col,
                });
            }

            for c in 0..n {
                a[(col, c)] /= pivot;
                inv[(col, c)] /= pivot;
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = a[(r, col)];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..n {
                    a[(r, c)] -= factor * a[(col, c)];
                    inv[(r, c)] -= factor * inv[(col, c)];
                }
            }
        }

        Ok(inv)
    }

    /// First row at or below `col` with the largest magnitude in `col`;
    /// ties keep the earlier row
    fn pivot_row(&self, col: usize) -> usize {
        (col + 1..self.rows).fold(col, |best, i| {
            if self[(i, col)].abs() > self[(best, col)].abs() {
                i
            } else {
                best
            }
        })
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.data[r * self.cols + c]
    }
}
