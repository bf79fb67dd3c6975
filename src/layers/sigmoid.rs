use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::{cache::ForwardCache, elementwise, layer::Layer};
use crate::math::matrix::Matrix;

/// Logistic activation. Caches its output, since `σ' = σ(1 - σ)`.
#[derive(Debug, Clone)]
pub struct Sigmoid {
    name: String,
    cache: ForwardCache,
}

impl Sigmoid {
    pub fn new(name: impl Into<String>) -> Sigmoid {
        Sigmoid { name: name.into(), cache: ForwardCache::default() }
    }
}

impl Layer for Sigmoid {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        Ok(elementwise::forward(ActivationFunction::Sigmoid, &mut self.cache, input))
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        elementwise::backward(ActivationFunction::Sigmoid, &mut self.cache, &self.name, grad_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_matches_closed_form() {
        let mut s = Sigmoid::new("sigm");
        let x = Matrix::from_data(vec![vec![-2.0, 0.0, 3.0]]).unwrap();
        let y = s.forward(&x).unwrap();
        for (&xi, &yi) in x.data[0].iter().zip(y.data[0].iter()) {
            assert!((yi - 1.0 / (1.0 + (-xi).exp())).abs() < 1e-12);
        }
    }

    #[test]
    fn large_negative_inputs_do_not_overflow() {
        let mut s = Sigmoid::new("sigm");
        let y = s.forward(&Matrix::from_row(vec![-1e4, 1e4])).unwrap();
        assert_eq!(y.data, vec![vec![0.0, 1.0]]);
        let dx = s.backward(&Matrix::from_row(vec![1.0, 1.0])).unwrap();
        assert_eq!(dx.data, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn backward_uses_cached_output() {
        let mut s = Sigmoid::new("sigm");
        s.forward(&Matrix::from_row(vec![0.0])).unwrap();
        let dx = s.backward(&Matrix::from_row(vec![2.0])).unwrap();
        assert_eq!(dx.data, vec![vec![0.5]]);
    }
}
