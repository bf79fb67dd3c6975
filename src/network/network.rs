use log::debug;

use crate::error::Result;
use crate::layers::layer::Layer;
use crate::math::matrix::Matrix;
use crate::optim::sgd::UpdateConfig;

/// An ordered stack of layers.
///
/// `forward` threads a batch left to right; `backward` threads the loss
/// gradient right to left and drops the gradient w.r.t. the network input.
#[derive(Debug, Default)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
}

impl Network {
    pub fn new() -> Network {
        Network { layers: Vec::new() }
    }

    pub fn add(&mut self, layer: Box<dyn Layer>) {
        debug!("network: adding layer '{}' at position {}", layer.name(), self.layers.len());
        self.layers.push(layer);
    }

    /// Forward pass; every layer saves what its backward will need.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    pub fn backward(&mut self, grad_output: &Matrix) -> Result<()> {
        let mut grad = grad_output.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
        }
        Ok(())
    }

    /// Applies `config` to every trainable layer.
    pub fn update(&mut self, config: &UpdateConfig) -> Result<()> {
        for layer in self.layers.iter_mut().filter(|l| l.is_trainable()) {
            layer.update(config)?;
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|l| l.parameter_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NnError;
    use crate::layers::{Linear, Relu, Sigmoid};

    fn identity_linear(name: &str, n: usize) -> Box<Linear> {
        let mut w = Matrix::zeros(n, n);
        for i in 0..n {
            w.data[i][i] = 1.0;
        }
        Box::new(Linear::from_parameters(name, w, Matrix::zeros(1, n)).unwrap())
    }

    #[test]
    fn empty_network_is_identity() {
        let mut net = Network::new();
        let x = Matrix::from_row(vec![1.0, -2.0]);
        assert!(net.is_empty());
        assert_eq!(net.forward(&x).unwrap(), x);
        assert!(net.backward(&x).is_ok());
    }

    #[test]
    fn forward_composes_left_to_right() {
        let mut net = Network::new();
        net.add(identity_linear("fc", 2));
        net.add(Box::new(Relu::new("relu")));
        let y = net.forward(&Matrix::from_row(vec![1.0, -2.0])).unwrap();
        assert_eq!(y.data, vec![vec![1.0, 0.0]]);
        assert_eq!(net.len(), 2);
        assert_eq!(net.layers().iter().filter(|l| l.is_trainable()).count(), 1);
        assert_eq!(net.parameter_count(), 6);
    }

    #[test]
    fn backward_before_forward_fails() {
        let mut net = Network::new();
        net.add(Box::new(Sigmoid::new("sigm")));
        let err = net.backward(&Matrix::zeros(1, 1)).unwrap_err();
        assert!(matches!(err, NnError::StaleCache { ref layer } if layer == "sigm"));
    }

    #[test]
    fn update_moves_trainable_parameters() {
        let mut net = Network::new();
        net.add(identity_linear("fc", 1));
        net.add(Box::new(Relu::new("relu")));
        net.forward(&Matrix::from_row(vec![1.0])).unwrap();
        net.backward(&Matrix::from_row(vec![1.0])).unwrap();
        net.update(&UpdateConfig::new(0.1, 0.0, 0.0)).unwrap();
        let y = net.forward(&Matrix::from_row(vec![1.0])).unwrap();
        // w = 1 - 0.1, b = -0.1
        assert!((y.data[0][0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn shape_errors_surface_from_inner_layers() {
        let mut net = Network::new();
        net.add(identity_linear("fc", 3));
        assert!(matches!(net.forward(&Matrix::zeros(1, 2)), Err(NnError::ShapeMismatch { .. })));
    }
}
