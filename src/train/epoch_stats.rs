use serde::{Serialize, Deserialize};

/// Statistics for one training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch number.
    pub epoch: usize,
    /// Mean of the per-iteration batch losses.
    pub mean_loss: f64,
    /// Mean of the per-iteration batch accuracies, in [0, 1].
    pub mean_accuracy: f64,
    pub iteration_losses: Vec<f64>,
    pub iteration_accuracies: Vec<f64>,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of a forward-only pass over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalStats {
    pub loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub epoch: usize,
    pub stats: EvalStats,
}

/// Everything a `train` run produced, in a form that can be written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: Vec<EpochStats>,
    pub tests: Vec<TestRecord>,
    pub final_test: Option<EvalStats>,
    pub elapsed_ms: u64,
}

impl TrainingReport {
    /// Serializes the report to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> crate::error::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
