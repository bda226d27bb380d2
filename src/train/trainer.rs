use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::dataset::Dataset;
use crate::train::train_config::TrainConfig;
use crate::train::train_report::TrainReport;

/// Trains `network` in place for `config.epochs` full-dataset steps.
///
/// Each step computes the gradient with `config.method` into a mirror
/// gradient network and applies one SGD update. Divergence is not detected;
/// a rising or NaN loss shows up in the report and the logs.
pub fn train(network: &mut Network, data: &Dataset, config: &TrainConfig) -> Result<TrainReport> {
    config.validate()?;
    network.check_dataset(&data.inputs, &data.outputs)?;

    let mut gradients = Network::zeros_like(network)?;
    let optimizer = Sgd::new(config.learning_rate);
    let initial_loss = network.loss(&data.inputs, &data.outputs)?;
    let t_start = Instant::now();

    info!(
        topology = ?network.topology(),
        method = ?config.method,
        epochs = config.epochs,
        initial_loss = initial_loss,
        "training started"
    );

    for epoch in 1..=config.epochs {
        let loss = train_step(network, &mut gradients, data, config, &optimizer)?;
        if config.log_every > 0 && epoch % config.log_every == 0 {
            debug!(epoch = epoch, loss = loss, "epoch finished");
        }
    }

    let final_loss = network.loss(&data.inputs, &data.outputs)?;
    let elapsed_ms = t_start.elapsed().as_millis() as u64;
    info!(final_loss = final_loss, elapsed_ms = elapsed_ms, "training finished");

    Ok(TrainReport {
        epochs: config.epochs,
        initial_loss,
        final_loss,
        elapsed_ms,
    })
}

/// One gradient computation plus update. Returns the loss measured before
/// the update.
pub fn train_step(
    network: &mut Network,
    gradients: &mut Network,
    data: &Dataset,
    config: &TrainConfig,
    optimizer: &Sgd,
) -> Result<f32> {
    let loss = config
        .method
        .compute(network, gradients, &data.inputs, &data.outputs, config.epsilon)?;
    optimizer.step(network, gradients)?;
    Ok(loss)
}
