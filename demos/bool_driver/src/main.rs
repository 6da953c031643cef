use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Parser;
use layered_nn::{
    neural::{
        config::NetworkConfig,
        optimizer::Optimizer,
        values::{Sample, ValuesList},
        NeuralNetwork,
    },
    persist::{self, CsvFormat},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Trains small networks on a boolean rule, then saves and reloads the weights
#[derive(Parser, Debug)]
#[command(name = "bool_driver", version, long_about = None)]
struct Args {
    /// Training steps per run
    #[arg(short, long, default_value_t = i32::MAX as usize / 40_000)]
    iterations: usize,

    /// Learning rate
    #[arg(short, long, default_value_t = 0.9)]
    rate: f64,

    /// How many hand-wired networks to train
    #[arg(long, default_value_t = 10)]
    runs: usize,

    /// Hidden neurons of the fully-connected network
    #[arg(long, default_value_t = 3)]
    hidden_width: usize,

    /// JSON file with `network` and `optimizer` sections, overrides the flags above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the trained weights
    #[arg(short, long, default_value = "network.csv")]
    output: PathBuf,

    /// Field separator of the weight file
    #[arg(long, default_value_t = ',')]
    separator: char,

    /// Seed for weight initialisation and sample order
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct DriverConfig {
    network: NetworkConfig,
    optimizer: Optimizer,
}

const CORNERS: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// 0 when both inputs are low, 1 otherwise
fn rule(a: f64, b: f64) -> f64 {
    if a < 0.51 && b < 0.5 {
        0.0
    } else {
        1.0
    }
}

fn corner_samples() -> Vec<Sample> {
    CORNERS
        .iter()
        .map(|&[a, b]| Sample::new([a, b], [rule(a, b)]))
        .collect()
}

/// Two inputs, two hidden neurons and one output, wired by hand.
fn hand_wired(rng: &mut StdRng) -> layered_nn::prelude::Result<NeuralNetwork> {
    let mut net = NeuralNetwork::default();
    let in0 = net.add_input_neuron();
    let in1 = net.add_input_neuron();
    let n0 = net.add_hidden_neuron();
    let n1 = net.add_hidden_neuron();
    let out = net.add_output_neuron();

    for (src, dst) in [(in0, n0), (in1, n0), (in0, n1), (in1, n1), (n0, out), (n1, out)] {
        net.connect(src, dst, rng)?;
    }
    Ok(net)
}

fn train_bool(
    net: &mut NeuralNetwork,
    optim: &Optimizer,
    rng: &mut StdRng,
) -> layered_nn::prelude::Result<()> {
    optim.train_with(net, &corner_samples(), rng, |_, rng| {
        let a = rng.gen_range(0..=1) as f64;
        let b = rng.gen_range(0..=1) as f64;
        Sample::new([a, b], [rule(a, b)])
    })
}

fn report(net: &mut NeuralNetwork) -> anyhow::Result<Vec<ValuesList>> {
    let mut outputs = Vec::with_capacity(CORNERS.len());
    for corner in CORNERS {
        let inputs = ValuesList::from(corner);
        let out = net.calculate_outputs(&inputs)?;
        info!("{inputs} --> {out}");
        outputs.push(out);
    }
    Ok(outputs)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => DriverConfig {
            network: NetworkConfig::new(2, 1, 1).with_hidden_layers(1, args.hidden_width),
            optimizer: Optimizer::new(args.iterations, args.rate)
                .with_log(Some((args.iterations / 10).max(1))),
        },
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for run in 0..args.runs {
        info!(run, "training hand-wired network");
        let mut net = hand_wired(&mut rng)?;
        train_bool(&mut net, &config.optimizer, &mut rng)?;
        report(&mut net)?;
    }

    info!(network = ?config.network, "training fully-connected network");
    let mut net = NeuralNetwork::with_rng(&config.network, &mut rng)?;
    train_bool(&mut net, &config.optimizer, &mut rng)?;
    let trained = report(&mut net)?;
    println!("{net}");

    let format = CsvFormat::default().with_field_separator(args.separator);
    persist::save(&net, &args.output, &format)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), "saved weights");

    let mut loaded = persist::load(&args.output, &format)
        .with_context(|| format!("reading {}", args.output.display()))?;
    let reloaded = report(&mut loaded)?;
    ensure!(
        trained == reloaded,
        "reloaded network disagrees with the trained one"
    );
    println!("{loaded}");

    Ok(())
}
