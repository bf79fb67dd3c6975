use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::optim::sgd::UpdateConfig;

/// Hyperparameters for a `train` run.
///
/// # Fields
/// - `learning_rate`, `momentum`, `weight_decay` — passed to every trainable
///   layer's `update` (see `UpdateConfig`)
/// - `batch_size` — samples per mini-batch; the last batch of an epoch may be short
/// - `max_epoch`  — number of full passes over the training data
/// - `disp_freq`  — log the running training loss every this many iterations
/// - `test_epoch` — evaluate on the test set every this many epochs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub learning_rate: f64,
    pub weight_decay: f64,
    pub momentum: f64,
    pub batch_size: usize,
    pub max_epoch: usize,
    pub disp_freq: usize,
    pub test_epoch: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            learning_rate: 0.001,
            weight_decay: 0.01,
            momentum: 0.01,
            batch_size: 100,
            max_epoch: 500,
            disp_freq: 50,
            test_epoch: 5,
        }
    }
}

impl SolverConfig {
    pub fn update_config(&self) -> UpdateConfig {
        UpdateConfig::new(self.learning_rate, self.momentum, self.weight_decay)
    }

    /// Applies space-separated `key:value` overrides,
    /// e.g. `"learning_rate:0.01 momentum:0.9"`.
    pub fn apply_overrides(&mut self, overrides: &str) -> Result<()> {
        for item in overrides.split_whitespace() {
            let (key, value) = item.split_once(':').ok_or_else(|| {
                NnError::InvalidConfig(format!("expected key:value, got '{}'", item))
            })?;
            match key {
                "learning_rate" => self.learning_rate = parse_value(key, value)?,
                "weight_decay" => self.weight_decay = parse_value(key, value)?,
                "momentum" => self.momentum = parse_value(key, value)?,
                "batch_size" => self.batch_size = parse_value(key, value)?,
                "max_epoch" => self.max_epoch = parse_value(key, value)?,
                "disp_freq" => self.disp_freq = parse_value(key, value)?,
                "test_epoch" => self.test_epoch = parse_value(key, value)?,
                _ => return Err(NnError::InvalidConfig(format!("unknown config key '{}'", key))),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.update_config().validate()?;
        for (key, value) in [
            ("batch_size", self.batch_size),
            ("disp_freq", self.disp_freq),
            ("test_epoch", self.test_epoch),
        ] {
            if value == 0 {
                return Err(NnError::InvalidConfig(format!("{} must be at least 1", key)));
            }
        }
        Ok(())
    }

    /// Reads a config from JSON; absent fields keep their defaults.
    pub fn load_json(path: &str) -> Result<SolverConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        NnError::InvalidConfig(format!("cannot parse '{}' as a value for {}", value, key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_runner() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.update_config(), UpdateConfig::new(0.001, 0.01, 0.01));
        assert_eq!((cfg.batch_size, cfg.max_epoch, cfg.disp_freq, cfg.test_epoch), (100, 500, 50, 5));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overrides_update_named_fields() {
        let mut cfg = SolverConfig::default();
        cfg.apply_overrides("learning_rate:0.1 momentum:0.9 batch_size:32").unwrap();
        assert_eq!(cfg.learning_rate, 0.1);
        assert_eq!(cfg.momentum, 0.9);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.weight_decay, 0.01);
    }

    #[test]
    fn overrides_reject_unknown_keys_and_bad_values() {
        let mut cfg = SolverConfig::default();
        assert!(matches!(cfg.apply_overrides("lr:0.1"), Err(NnError::InvalidConfig(_))));
        assert!(cfg.apply_overrides("batch_size:1.5").is_err());
        assert!(cfg.apply_overrides("momentum").is_err());
    }

    #[test]
    fn validate_rejects_zero_batch() {
        let cfg = SolverConfig { batch_size: 0, ..SolverConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SolverConfig = serde_json::from_str(r#"{"max_epoch": 3, "momentum": 0.5}"#).unwrap();
        assert_eq!(cfg.max_epoch, 3);
        assert_eq!(cfg.momentum, 0.5);
        assert_eq!(cfg.batch_size, 100);
    }
}
