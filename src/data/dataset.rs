use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Feature rows paired with one-hot label rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn new(inputs: Matrix, labels: Matrix) -> Result<Dataset> {
        if inputs.rows != labels.rows {
            return Err(NnError::Data(format!(
                "{} input rows but {} label rows",
                inputs.rows, labels.rows
            )));
        }
        Ok(Dataset { inputs, labels })
    }

    /// Builds a dataset from samples and class indices, one-hot encoding the labels.
    pub fn from_classes(inputs: Vec<Vec<f64>>, classes: &[usize], n_classes: usize) -> Result<Dataset> {
        let mut labels = Vec::with_capacity(classes.len());
        for (i, &class) in classes.iter().enumerate() {
            if class >= n_classes {
                return Err(NnError::Data(format!(
                    "label at index {}: class {} is out of range for {} classes",
                    i, class, n_classes
                )));
            }
            let mut one_hot = vec![0.0; n_classes];
            one_hot[class] = 1.0;
            labels.push(one_hot);
        }
        Dataset::new(Matrix::from_data(inputs)?, Matrix::from_data(labels)?)
    }

    pub fn len(&self) -> usize {
        self.inputs.rows
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.rows == 0
    }

    /// Gathers the given samples into a mini-batch.
    pub fn batch(&self, indices: &[usize]) -> (Matrix, Matrix) {
        (self.inputs.select_rows(indices), self.labels.select_rows(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_classes_one_hot_encodes() {
        let ds = Dataset::from_classes(vec![vec![0.0], vec![1.0]], &[2, 0], 3).unwrap();
        assert_eq!(ds.labels.data, vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]]);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn rejects_row_count_mismatch_and_bad_class() {
        assert!(Dataset::new(Matrix::zeros(2, 1), Matrix::zeros(3, 2)).is_err());
        assert!(Dataset::from_classes(vec![vec![0.0]], &[5], 3).is_err());
    }

    #[test]
    fn batch_selects_matching_rows() {
        let ds = Dataset::from_classes(vec![vec![10.0], vec![20.0], vec![30.0]], &[0, 1, 0], 2).unwrap();
        let (x, t) = ds.batch(&[1, 2]);
        assert_eq!(x.data, vec![vec![20.0], vec![30.0]]);
        assert_eq!(t.data, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
    }
}
