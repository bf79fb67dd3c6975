use std::time::Instant;

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::loss::loss_fn::Loss;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, EvalStats, TestRecord, TrainingReport};
use crate::train::solver_config::SolverConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.max_epoch` epochs.
///
/// When `test` is given it is evaluated every `config.test_epoch` epochs
/// (starting with epoch 0) and once more after the last epoch.
pub fn train<R: Rng + ?Sized>(
    network: &mut Network,
    loss: &dyn Loss,
    config: &SolverConfig,
    train_set: &Dataset,
    test_set: Option<&Dataset>,
    rng: &mut R,
) -> Result<TrainingReport> {
    config.validate()?;
    let t_start = Instant::now();
    let mut report = TrainingReport::default();

    for epoch in 0..config.max_epoch {
        info!("Training @ {} epoch...", epoch);
        let stats = train_epoch(network, loss, config, train_set, epoch, rng)?;
        report.epochs.push(stats);

        if let Some(test) = test_set {
            if epoch % config.test_epoch == 0 {
                info!("Testing @ {} epoch...", epoch);
                let stats = evaluate(network, loss, test, config.batch_size)?;
                report.tests.push(TestRecord { epoch, stats });
            }
        }
    }

    if let Some(test) = test_set {
        info!("Testing @ final epoch...");
        report.final_test = Some(evaluate(network, loss, test, config.batch_size)?);
    }

    report.elapsed_ms = t_start.elapsed().as_millis() as u64;
    info!("training time: {} seconds", report.elapsed_ms / 1000);
    Ok(report)
}

/// One pass of mini-batch momentum SGD over `data` in shuffled order.
///
/// Each iteration runs forward, loss, loss gradient, backward, then `update`
/// on every trainable layer.
pub fn train_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    loss: &dyn Loss,
    config: &SolverConfig,
    data: &Dataset,
    epoch: usize,
    rng: &mut R,
) -> Result<EpochStats> {
    config.validate()?;
    if data.is_empty() {
        return Err(NnError::Data("training set is empty".into()));
    }

    let t_start = Instant::now();
    let update = config.update_config();

    let mut indices: Vec<usize> = (0..data.len()).collect();
    indices.shuffle(rng);

    let mut iteration_losses = Vec::new();
    let mut iteration_accuracies = Vec::new();

    for (iter, batch) in indices.chunks(config.batch_size).enumerate() {
        let (inputs, targets) = data.batch(batch);

        let predictions = network.forward(&inputs)?;
        let loss_value = loss.forward(&predictions, &targets)?;
        if !loss_value.is_finite() {
            warn!("'{}' produced a non-finite loss at iteration {}", loss.name(), iter);
        }
        let grad = loss.backward(&predictions, &targets)?;
        network.backward(&grad)?;
        network.update(&update)?;

        iteration_losses.push(loss_value);
        iteration_accuracies.push(accuracy(&predictions, &targets));

        if (iter + 1) % config.disp_freq == 0 {
            let window = config.disp_freq;
            info!(
                "  Training iter {}, batch loss {:.4}, batch acc {:.4}",
                iter + 1,
                mean(&iteration_losses[iteration_losses.len() - window..]),
                mean(&iteration_accuracies[iteration_accuracies.len() - window..]),
            );
        }
    }

    Ok(EpochStats {
        epoch,
        mean_loss: mean(&iteration_losses),
        mean_accuracy: mean(&iteration_accuracies),
        iteration_losses,
        iteration_accuracies,
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    })
}

/// Forward-only pass over `data`; returns sample-weighted mean loss and accuracy.
pub fn evaluate(
    network: &mut Network,
    loss: &dyn Loss,
    data: &Dataset,
    batch_size: usize,
) -> Result<EvalStats> {
    if batch_size == 0 {
        return Err(NnError::InvalidConfig("batch_size must be at least 1".into()));
    }
    if data.is_empty() {
        return Err(NnError::Data("evaluation set is empty".into()));
    }

    let indices: Vec<usize> = (0..data.len()).collect();
    let mut total_loss = 0.0;
    let mut correct = 0usize;

    for batch in indices.chunks(batch_size) {
        let (inputs, targets) = data.batch(batch);
        let predictions = network.forward(&inputs)?;
        total_loss += loss.forward(&predictions, &targets)? * batch.len() as f64;
        correct += count_correct(&predictions, &targets);
    }

    let n = data.len() as f64;
    let stats = EvalStats { loss: total_loss / n, accuracy: correct as f64 / n };
    info!("    Testing, total mean loss {:.5}, total acc {:.5}", stats.loss, stats.accuracy);
    Ok(stats)
}

/// Fraction of rows whose prediction argmax matches the target argmax.
pub fn accuracy(predictions: &Matrix, targets: &Matrix) -> f64 {
    if predictions.rows == 0 {
        return 0.0;
    }
    count_correct(predictions, targets) as f64 / predictions.rows as f64
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn count_correct(predictions: &Matrix, targets: &Matrix) -> usize {
    predictions.argmax_rows().into_iter()
        .zip(targets.argmax_rows())
        .filter(|(p, t)| p == t)
        .count()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_argmax_matches() {
        let p = Matrix::from_data(vec![vec![0.9, 0.1], vec![0.2, 0.8], vec![0.6, 0.4]]).unwrap();
        let t = Matrix::from_data(vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        assert!((accuracy(&p, &t) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 3.0]), 2.0);
    }
}
