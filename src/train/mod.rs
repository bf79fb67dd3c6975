pub mod epoch_stats;
pub mod loop_fn;
pub mod solver_config;

pub use epoch_stats::{EpochStats, EvalStats, TestRecord, TrainingReport};
pub use loop_fn::{accuracy, evaluate, train, train_epoch};
pub use solver_config::SolverConfig;
