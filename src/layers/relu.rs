use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::{cache::ForwardCache, elementwise, layer::Layer};
use crate::math::matrix::Matrix;

/// Rectified linear unit, `max(0, x)`. Caches its input.
#[derive(Debug, Clone)]
pub struct Relu {
    name: String,
    cache: ForwardCache,
}

impl Relu {
    pub fn new(name: impl Into<String>) -> Relu {
        Relu { name: name.into(), cache: ForwardCache::default() }
    }
}

impl Layer for Relu {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        Ok(elementwise::forward(ActivationFunction::ReLU, &mut self.cache, input))
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        elementwise::backward(ActivationFunction::ReLU, &mut self.cache, &self.name, grad_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NnError;

    #[test]
    fn forward_clamps_negatives() {
        let mut relu = Relu::new("relu");
        let x = Matrix::from_data(vec![vec![-1.0, 0.0, 2.5]]).unwrap();
        assert_eq!(relu.forward(&x).unwrap().data, vec![vec![0.0, 0.0, 2.5]]);
    }

    #[test]
    fn backward_masks_non_positive_inputs() {
        let mut relu = Relu::new("relu");
        let x = Matrix::from_data(vec![vec![-1.0, 0.0, 2.5], vec![3.0, -0.5, 1e-9]]).unwrap();
        relu.forward(&x).unwrap();
        let g = Matrix::from_data(vec![vec![7.0, 7.0, 7.0], vec![2.0, 2.0, 2.0]]).unwrap();
        let dx = relu.backward(&g).unwrap();
        assert_eq!(dx.data, vec![vec![0.0, 0.0, 7.0], vec![2.0, 0.0, 2.0]]);
    }

    #[test]
    fn backward_without_forward_is_stale() {
        let mut relu = Relu::new("relu");
        let g = Matrix::zeros(1, 3);
        assert!(matches!(relu.backward(&g), Err(NnError::StaleCache { .. })));
    }

    #[test]
    fn second_backward_is_stale() {
        let mut relu = Relu::new("relu");
        let x = Matrix::from_row(vec![1.0]);
        relu.forward(&x).unwrap();
        relu.backward(&x).unwrap();
        assert!(matches!(relu.backward(&x), Err(NnError::StaleCache { .. })));
    }

    #[test]
    fn backward_rejects_wrong_shape_and_keeps_cache() {
        let mut relu = Relu::new("relu");
        relu.forward(&Matrix::zeros(2, 3)).unwrap();
        assert!(matches!(relu.backward(&Matrix::zeros(2, 2)), Err(NnError::ShapeMismatch { .. })));
        assert!(relu.backward(&Matrix::zeros(2, 3)).is_ok());
    }

    #[test]
    fn is_not_trainable() {
        let relu = Relu::new("relu");
        assert!(!relu.is_trainable());
        assert_eq!(relu.parameter_count(), 0);
    }
}
