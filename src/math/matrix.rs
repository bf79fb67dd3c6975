use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{NnError, Result};

/// Dense row-major 2-D array. Every activation and gradient flowing through
/// the network is one of these, shaped `(batch_size, feature_dim)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from nested rows. Rejects empty input and ragged rows.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            Some(row) => row.len(),
            None => return Err(NnError::Data("cannot build a matrix from zero rows".into())),
        };
        if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(NnError::Data(format!(
                "ragged matrix: row 0 has {} columns but row {} has {}",
                cols, i, row.len()
            )));
        }
        Ok(Matrix { rows: data.len(), cols, data })
    }

    /// A single-row matrix, e.g. one sample or a bias vector.
    pub fn from_row(row: Vec<f64>) -> Matrix {
        Matrix { rows: 1, cols: row.len(), data: vec![row] }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both uniforms in (0, 1] so ln() never sees zero.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Zero-mean Gaussian matrix with standard deviation `std_dev`.
    pub fn gaussian<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Elementwise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, rhs: &Matrix, op: &'static str, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.ensure_same_shape(rhs, op)?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(rhs.data.iter())
                .map(|(a, b)| a.iter().zip(b.iter()).map(|(&x, &y)| functor(x, y)).collect())
                .collect(),
        })
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_map(rhs, "add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_map(rhs, "sub", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_map(rhs, "hadamard", |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::shape("matmul", (self.cols, rhs.cols), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    /// Adds a `1 × cols` row to every row of `self` (bias broadcast over the batch).
    pub fn add_row_broadcast(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(NnError::shape("add_row_broadcast", (1, self.cols), row.shape()));
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|r| r.iter().zip(bias.iter()).map(|(x, b)| x + b).collect())
                .collect(),
        })
    }

    /// Column sums over the batch dimension, returned as `1 × cols`.
    pub fn sum_rows(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for row in &self.data {
            for (acc, x) in res.data[0].iter_mut().zip(row.iter()) {
                *acc += x;
            }
        }
        res
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().map(|row| row.iter().sum::<f64>()).sum()
    }

    /// Index of the largest entry in each row. Ties resolve to the lowest index.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, &x)| if x > best.1 { (i, x) } else { best })
                    .0
            })
            .collect()
    }

    /// Gathers the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    pub fn ensure_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(NnError::shape(op, self.shape(), other.shape()));
        }
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NnError::Data(_)));
        assert!(Matrix::from_data(vec![]).is_err());
    }

    #[test]
    fn matmul_matches_hand_computation() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![5.0, 6.0, 7.0], vec![8.0, 9.0, 10.0]]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data, vec![vec![21.0, 24.0, 27.0], vec![47.0, 54.0, 61.0]]);
    }

    #[test]
    fn matmul_rejects_inner_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(a.matmul(&b), Err(NnError::ShapeMismatch { op: "matmul", .. })));
    }

    #[test]
    fn broadcast_adds_bias_to_every_row() {
        let x = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_row(vec![10.0, 20.0]);
        let y = x.add_row_broadcast(&b).unwrap();
        assert_eq!(y.data, vec![vec![11.0, 22.0], vec![13.0, 24.0]]);
        assert!(x.add_row_broadcast(&Matrix::from_row(vec![1.0])).is_err());
    }

    #[test]
    fn sum_rows_collapses_batch() {
        let x = m(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(x.sum_rows().data, vec![vec![9.0, 12.0]]);
    }

    #[test]
    fn elementwise_ops_check_shapes() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(2, 3);
        assert!(a.add(&b).is_err());
        assert!(a.sub(&b).is_err());
        assert!(a.hadamard(&b).is_err());
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        let x = m(vec![vec![0.1, 0.7, 0.2], vec![0.5, 0.5, 0.0]]);
        assert_eq!(x.argmax_rows(), vec![1, 0]);
    }

    #[test]
    fn gaussian_with_zero_std_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = Matrix::gaussian(3, 4, 0.0, &mut rng);
        assert!(g.data.iter().flatten().all(|&x| x == 0.0));
    }

    #[test]
    fn gaussian_statistics_are_plausible() {
        let mut rng = StdRng::seed_from_u64(42);
        let g = Matrix::gaussian(200, 50, 0.5, &mut rng);
        let n = (g.rows * g.cols) as f64;
        let mean = g.sum() / n;
        let var = g.data.iter().flatten().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.02, "mean = {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std = {}", var.sqrt());
    }

    #[test]
    fn select_rows_gathers_in_order() {
        let x = m(vec![vec![1.0], vec![2.0], vec![3.0]]);
        assert_eq!(x.select_rows(&[2, 0]).data, vec![vec![3.0], vec![1.0]]);
    }
}
