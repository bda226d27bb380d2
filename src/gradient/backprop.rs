use tracing::trace;

use crate::error::{Error, Result};
use crate::loss::mse::MseLoss;
use crate::math::tensor::Tensor;
use crate::network::network::Network;

/// Analytic gradient of the dataset loss by backpropagation.
///
/// `gradients` must be shaped like `model` (see [`Network::zeros_like`]); its
/// weights and biases receive the mean gradient over all examples, and its
/// activation slots are used as per-example activation-gradient buffers.
/// Those buffers hold half of the true loss derivative; the factor of 2 is
/// applied once when a layer's weight and bias gradients are accumulated.
///
/// Returns the dataset loss seen during the forward passes.
pub fn backprop(
    model: &mut Network,
    gradients: &mut Network,
    inputs: &Tensor,
    outputs: &Tensor,
) -> Result<f32> {
    model.check_paired(gradients)?;
    model.check_dataset(inputs, outputs)?;
    if model.activations.is_none() {
        return Err(Error::InvalidConfig(
            "backpropagation needs a model built with cache_activations".into(),
        ));
    }

    gradients.zero();
    let activation = model.activation();
    let examples = inputs.rows();
    let mut total = 0.0;

    let Network {
        layers: grad_layers,
        activations: grad_cache,
        ..
    } = gradients;
    let grad_acts = grad_cache.as_mut().ok_or_else(|| {
        Error::InvalidConfig("gradient network has no activation buffers".into())
    })?;

    for e in 0..examples {
        let target = outputs.view_row(e)?.to_vec();
        let prediction = model.forward(&inputs.view_row(e)?)?.to_vec();
        total += MseLoss::squared_error(&prediction, &target);

        // Stale gradients from the previous example would leak into this one.
        for buffer in grad_acts.iter_mut() {
            buffer.zero();
        }

        let depth = model.layers.len();
        for (j, d) in MseLoss::derivative(&prediction, &target).into_iter().enumerate() {
            grad_acts[depth].set(j, d)?;
        }

        let acts = model.activations.as_deref().unwrap_or_default();
        for l in (0..depth).rev() {
            let layer = &model.layers[l];
            let (lower, upper) = grad_acts.split_at_mut(l + 1);
            let (prev_grad, grad) = (&mut lower[l], &upper[0]);
            let grad_layer = &mut grad_layers[l];

            for j in 0..layer.size() {
                let delta = grad.get(j)? * activation.derivative(acts[l + 1].get(j)?);
                grad_layer.bias.add_at(j, 2.0 * delta)?;

                for k in 0..layer.input_size() {
                    let prev = acts[l].get(k)?;
                    let weight = layer.weights.at(k, j)?;
                    grad_layer.weights.add_at(k * layer.size() + j, 2.0 * delta * prev)?;
                    prev_grad.add_at(k, delta * weight)?;
                }
            }
        }
    }

    let inv = 1.0 / examples as f32;
    for grad_layer in grad_layers.iter_mut() {
        scale_in_place(&mut grad_layer.weights, inv)?;
        scale_in_place(&mut grad_layer.bias, inv)?;
    }

    let loss = total * inv;
    trace!(loss = loss, examples = examples, "backprop gradient computed");
    Ok(loss)
}

fn scale_in_place(t: &mut Tensor, factor: f32) -> Result<()> {
    for i in 0..t.len() {
        let v = t.get(i)?;
        t.set(i, v * factor)?;
    }
    Ok(())
}
