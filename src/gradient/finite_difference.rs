use tracing::trace;

use crate::error::Result;
use crate::math::tensor::Tensor;
use crate::network::network::Network;

/// Canonical perturbation size.
pub const DEFAULT_EPSILON: f32 = 0.01;

/// Numerical gradient of the dataset loss by forward differences.
///
/// Every weight and bias of `model` is visited in turn: it is bumped by
/// `epsilon` in place, the full-dataset loss is recomputed, and
/// `(perturbed - base) / epsilon` is written into `gradients` at the same
/// position before the parameter is restored. The bump goes through a view
/// of the live parameter tensor, so `model` itself is only borrowed.
///
/// Returns the unperturbed loss. Cost is one full loss evaluation per
/// parameter; this is the slow reference method.
pub fn finite_difference(
    model: &Network,
    gradients: &mut Network,
    inputs: &Tensor,
    outputs: &Tensor,
    epsilon: f32,
) -> Result<f32> {
    model.check_paired(gradients)?;
    let base = model.loss(inputs, outputs)?;

    for (layer, grad_layer) in model.layers.iter().zip(gradients.layers.iter_mut()) {
        let grad_weights = &mut grad_layer.weights;
        perturb_each(model, &layer.weights, grad_weights, inputs, outputs, base, epsilon)?;
        let grad_bias = &mut grad_layer.bias;
        perturb_each(model, &layer.bias, grad_bias, inputs, outputs, base, epsilon)?;
    }

    trace!(loss = base, epsilon = epsilon, "finite-difference gradient computed");
    Ok(base)
}

fn perturb_each(
    model: &Network,
    param: &Tensor,
    grad: &mut Tensor,
    inputs: &Tensor,
    outputs: &Tensor,
    base: f32,
    epsilon: f32,
) -> Result<()> {
    let mut live = param.view(param.rows(), param.columns())?;

    for i in 0..live.len() {
        let saved = live.get(i)?;
        live.set(i, saved + epsilon)?;
        let perturbed = model.loss(inputs, outputs);
        live.set(i, saved)?;
        grad.set(i, (perturbed? - base) / epsilon)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::spec::NetworkSpec;

    #[test]
    fn parameters_are_restored() {
        let spec = NetworkSpec::new(vec![2, 2, 1], ActivationFunction::Sigmoid);
        let mut n = 0.0;
        let model = Network::from_fn(&spec, |_, _| {
            n += 0.1;
            n
        })
        .unwrap();
        let before = model.copy();
        let mut grads = Network::zeros_like(&model).unwrap();

        let inputs = Tensor::from_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let outputs = Tensor::from_slice(2, 1, &[1.0, 1.0]).unwrap();
        finite_difference(&model, &mut grads, &inputs, &outputs, DEFAULT_EPSILON).unwrap();

        for (a, b) in model.layers.iter().zip(before.layers.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn linear_model_gradient() {
        // Single identity unit: y = w * x + b, loss = (y - t)^2.
        let spec = NetworkSpec::new(vec![1, 1], ActivationFunction::Identity);
        let model = Network::from_fn(&spec, |_, _| 0.0).unwrap();
        let mut grads = Network::zeros_like(&model).unwrap();

        let inputs = Tensor::from_slice(1, 1, &[2.0]).unwrap();
        let outputs = Tensor::from_slice(1, 1, &[1.0]).unwrap();
        let base = finite_difference(&model, &mut grads, &inputs, &outputs, 1e-3).unwrap();

        assert_eq!(base, 1.0);
        // dL/dw = 2 (y - t) x = -4, dL/db = 2 (y - t) = -2
        assert!((grads.weights(0).unwrap().get(0).unwrap() + 4.0).abs() < 1e-2);
        assert!((grads.bias(0).unwrap().get(0).unwrap() + 2.0).abs() < 1e-2);
    }

    #[test]
    fn mismatched_gradient_network_is_rejected() {
        let spec = NetworkSpec::new(vec![2, 1], ActivationFunction::Sigmoid);
        let model = Network::zeros(&spec).unwrap();
        let spec = NetworkSpec::new(vec![2, 2], ActivationFunction::Sigmoid);
        let mut grads = Network::zeros(&spec).unwrap();
        let inputs = Tensor::new(1, 2).unwrap();
        let outputs = Tensor::new(1, 1).unwrap();
        assert!(finite_difference(&model, &mut grads, &inputs, &outputs, 0.01).is_err());
    }
}
