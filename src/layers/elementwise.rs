use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::layers::cache::ForwardCache;
use crate::math::matrix::Matrix;

/// Shared forward for parameter-free elementwise layers.
pub(crate) fn forward(
    function: ActivationFunction,
    cache: &mut ForwardCache,
    input: &Matrix,
) -> Matrix {
    let output = input.map(|x| function.function(x));
    if function.caches_output() {
        cache.save(output.clone());
    } else {
        cache.save(input.clone());
    }
    output
}

/// Shared backward: `derivative(cached) ⊙ grad_output`.
pub(crate) fn backward(
    function: ActivationFunction,
    cache: &mut ForwardCache,
    layer: &str,
    grad_output: &Matrix,
) -> Result<Matrix> {
    let cached = cache.peek(layer)?;
    let grad_input = cached.zip_map(grad_output, "activation backward", |c, g| {
        function.derivative_from_cached(c) * g
    })?;
    cache.clear();
    Ok(grad_input)
}
