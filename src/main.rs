use tensorlib::{Dataset, ExperimentConfig, Network, Tensor};
use tracing_subscriber::EnvFilter;

// Trains the network described by an optional JSON config (default: [2, 2, 1]
// sigmoid on XOR) and prints the learned truth table.
//   cargo run -- path/to/config.json
//   RUST_LOG=debug cargo run
fn main() -> tensorlib::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => ExperimentConfig::load_json(&path)?,
        None => ExperimentConfig::default(),
    };

    let data = Dataset::table(config.dataset)?;
    let mut init = config.init.build()?;
    let mut network = Network::new(&config.network, &mut init)?;

    println!("===== Training Data =====");
    println!("{}", data.inputs.labelled("Inputs"));
    println!("{}", data.outputs.labelled("Outputs"));

    let report = tensorlib::train(&mut network, &data, &config.train)?;

    println!("===== After Training =====");
    print!("{network}");
    println!("Loss: {} -> {}", report.initial_loss, report.final_loss);

    println!("===== Test =====");
    for row in 0..data.len() {
        let input: Tensor = data.inputs.view_row(row)?;
        let output = network.evaluate(&input)?;
        println!("{:?} -> {:.4}", input.to_vec(), output.get(0)?);
    }

    Ok(())
}
