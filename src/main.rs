//! Command-line runner: builds a network from an architecture string, trains
//! it on MNIST, and writes the training report to `result/<name>/`.
//!
//! ```text
//! cargo run --release -- --arch "Lin-784-100 Relu Lin-100-10" --loss Softmax \
//!     --config "learning_rate:0.01 momentum:0.9" --name softmax_relu
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use ferro_mlp::data::load_mnist_2d;
use ferro_mlp::network::DEFAULT_INIT_STD;
use ferro_mlp::{train, Architecture, LossType, SolverConfig};

#[derive(Parser, Debug)]
#[command(name = "ferro-mlp")]
#[command(about = "Train a feed-forward network on MNIST with momentum SGD")]
struct Args {
    /// Space-separated key:value overrides applied on top of the defaults
    #[arg(short, long, default_value = "learning_rate:0.001 weight_decay:0.01 momentum:0.01")]
    config: String,

    /// JSON solver config loaded before the overrides
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Network architecture, e.g. "Lin-784-100 Sigm Lin-100-10"
    #[arg(short, long, default_value = "Lin-784-10 Relu")]
    arch: String,

    /// Loss type: Euclidean or Softmax
    #[arg(short, long, default_value = "Euclidean")]
    loss: LossType,

    /// Experiment name; results go to result/<name>/
    #[arg(short, long, default_value = "default")]
    name: String,

    /// Directory holding the four MNIST IDX files
    #[arg(short, long, default_value = "data")]
    data: PathBuf,

    /// Standard deviation for Linear weight initialization
    #[arg(long, default_value_t = DEFAULT_INIT_STD)]
    init_std: f64,

    /// Seed for weight init and shuffling; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let result_dir = PathBuf::from("result").join(&args.name);
    std::fs::create_dir_all(&result_dir)
        .with_context(|| format!("creating {}", result_dir.display()))?;

    let mut config = match &args.config_file {
        Some(path) => SolverConfig::load_json(&path.to_string_lossy())
            .with_context(|| format!("loading {}", path.display()))?,
        None => SolverConfig::default(),
    };
    config.apply_overrides(&args.config)?;
    config.validate()?;

    let arch = Architecture::parse(&args.arch, args.init_std)?;
    let loss = args.loss.build("loss");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = arch.build_with_rng(&mut rng);

    let (train_set, test_set) = load_mnist_2d(&args.data)?;

    info!("======================================================");
    info!("{:?}", config);
    info!("network: {} ({} parameters)", arch, network.parameter_count());
    info!("loss: {:?}", args.loss);
    info!("result dir: {}", result_dir.display());
    info!("======================================================");

    let report = train(&mut network, loss.as_ref(), &config, &train_set, Some(&test_set), &mut rng)?;

    let report_path = result_dir.join("report.json");
    report.save_json(&report_path.to_string_lossy())?;
    arch.save_json(&result_dir.join("arch.json").to_string_lossy())?;
    info!("report written to {}", report_path.display());

    Ok(())
}
