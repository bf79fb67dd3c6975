use log::debug;
use rand::Rng;

use crate::error::{NnError, Result};
use crate::layers::{cache::ForwardCache, layer::Layer};
use crate::math::matrix::Matrix;
use crate::optim::sgd::{momentum_step, UpdateConfig};

/// Fully connected layer: `y = x · W + b`.
///
/// Owns its parameters together with two sets of same-shaped buffers:
/// - `grad_*`: parameter gradients from the most recent `backward`. They are
///   overwritten on every call, not accumulated. Gradients are summed over
///   the batch here; any division by batch size belongs to the loss.
/// - `diff_*`: momentum velocity. Zero at construction and carried across
///   every `update` for the lifetime of the layer.
#[derive(Debug, Clone)]
pub struct Linear {
    name: String,
    in_dim: usize,
    out_dim: usize,
    weights: Matrix,       // (in_dim, out_dim)
    biases: Matrix,        // (1, out_dim)
    grad_weights: Matrix,
    grad_biases: Matrix,
    diff_weights: Matrix,
    diff_biases: Matrix,
    cache: ForwardCache,
}

impl Linear {
    /// Weights drawn from `N(0, init_std²)` using the thread RNG; biases zero.
    pub fn new(name: impl Into<String>, in_dim: usize, out_dim: usize, init_std: f64) -> Linear {
        Linear::with_rng(name, in_dim, out_dim, init_std, &mut rand::thread_rng())
    }

    /// Same as `new`, drawing the initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        name: impl Into<String>,
        in_dim: usize,
        out_dim: usize,
        init_std: f64,
        rng: &mut R,
    ) -> Linear {
        let name = name.into();
        debug!("linear '{}': {} -> {}, init std {}", name, in_dim, out_dim, init_std);
        Linear::assemble(
            name,
            Matrix::gaussian(in_dim, out_dim, init_std, rng),
            Matrix::zeros(1, out_dim),
        )
    }

    /// Builds a layer from explicit parameters. `biases` must be `1 × out_dim`.
    pub fn from_parameters(name: impl Into<String>, weights: Matrix, biases: Matrix) -> Result<Linear> {
        if biases.rows != 1 || biases.cols != weights.cols {
            return Err(NnError::shape("linear parameters", (1, weights.cols), biases.shape()));
        }
        Ok(Linear::assemble(name.into(), weights, biases))
    }

    fn assemble(name: String, weights: Matrix, biases: Matrix) -> Linear {
        let (in_dim, out_dim) = weights.shape();
        Linear {
            name,
            in_dim,
            out_dim,
            weights,
            biases,
            grad_weights: Matrix::zeros(in_dim, out_dim),
            grad_biases: Matrix::zeros(1, out_dim),
            diff_weights: Matrix::zeros(in_dim, out_dim),
            diff_biases: Matrix::zeros(1, out_dim),
            cache: ForwardCache::default(),
        }
    }

    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn grad_weights(&self) -> &Matrix {
        &self.grad_weights
    }

    pub fn grad_biases(&self) -> &Matrix {
        &self.grad_biases
    }

    pub fn diff_weights(&self) -> &Matrix {
        &self.diff_weights
    }

    pub fn diff_biases(&self) -> &Matrix {
        &self.diff_biases
    }
}

impl Layer for Linear {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_trainable(&self) -> bool {
        true
    }

    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        if input.cols != self.in_dim {
            return Err(NnError::shape("linear forward", (input.rows, self.in_dim), input.shape()));
        }
        let output = input.matmul(&self.weights)?.add_row_broadcast(&self.biases)?;
        self.cache.save(input.clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        let input = self.cache.peek(&self.name)?;
        let expected = (input.rows, self.out_dim);
        if grad_output.shape() != expected {
            return Err(NnError::shape("linear backward", expected, grad_output.shape()));
        }

        // grad_W[i][j] = Σ_b x[b][i] · g[b][j]
        self.grad_weights = input.transpose().matmul(grad_output)?;
        self.grad_biases = grad_output.sum_rows();
        let grad_input = grad_output.matmul(&self.weights.transpose())?;

        self.cache.clear();
        Ok(grad_input)
    }

    fn update(&mut self, config: &UpdateConfig) -> Result<()> {
        momentum_step(&mut self.weights, &self.grad_weights, &mut self.diff_weights, config)?;
        momentum_step(&mut self.biases, &self.grad_biases, &mut self.diff_biases, config)
    }

    fn parameter_count(&self) -> usize {
        self.in_dim * self.out_dim + self.out_dim
    }
}
