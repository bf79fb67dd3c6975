use ferro_mlp::{train, Architecture, Dataset, LossType, SolverConfig};
use rand::{rngs::StdRng, SeedableRng};

fn main() -> ferro_mlp::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let data = Dataset::from_classes(inputs, &[1, 0, 1, 0], 2)?;

    let mut rng = StdRng::seed_from_u64(2019);
    let arch = Architecture::parse("Lin-2-8 Sigm Lin-8-2", 1.0)?;
    let mut network = arch.build_with_rng(&mut rng);
    let loss = LossType::Softmax.build("loss");

    let config = SolverConfig {
        learning_rate: 0.5,
        momentum: 0.9,
        weight_decay: 0.0,
        batch_size: 4,
        max_epoch: 2000,
        disp_freq: 1000,
        test_epoch: 500,
    };

    let report = train(&mut network, loss.as_ref(), &config, &data, Some(&data), &mut rng)?;
    for stats in report.epochs.iter().step_by(250) {
        println!("Epoch {}: loss = {:.6}", stats.epoch, stats.mean_loss);
    }

    let predictions = network.forward(&data.inputs)?;
    for (input, class) in data.inputs.data.iter().zip(predictions.argmax_rows()) {
        println!("Input: {:?} -> Class: {}", input, class);
    }
    Ok(())
}
