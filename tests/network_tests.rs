mod common;

use approx::assert_abs_diff_eq;
use tensorlib::{
    backprop, finite_difference, ActivationFunction, Dataset, Error, Network, NetworkSpec, Tensor,
};

use common::xor_network;

const TOLERANCE: f32 = 1e-2;

fn all_gradients(network: &Network) -> Vec<f32> {
    network
        .layers
        .iter()
        .flat_map(|l| l.weights.to_vec().into_iter().chain(l.bias.to_vec()))
        .collect()
}

fn compare_strategies(activation: ActivationFunction, epsilon: f32) {
    let data = Dataset::xor().unwrap();
    let mut model = xor_network(2, 0.0, 1.0, activation);

    let mut numeric = Network::zeros_like(&model).unwrap();
    let mut analytic = Network::zeros_like(&model).unwrap();

    let fd_loss =
        finite_difference(&model, &mut numeric, &data.inputs, &data.outputs, epsilon).unwrap();
    let bp_loss = backprop(&mut model, &mut analytic, &data.inputs, &data.outputs).unwrap();
    assert_abs_diff_eq!(fd_loss, bp_loss, epsilon = 1e-5);

    let numeric = all_gradients(&numeric);
    let analytic = all_gradients(&analytic);
    assert_eq!(numeric.len(), 9);
    for (i, (n, a)) in numeric.iter().zip(analytic.iter()).enumerate() {
        assert!(
            (n - a).abs() < TOLERANCE,
            "{activation:?} parameter {i}: numeric={n}, analytic={a}"
        );
    }
}

#[test]
fn test_finite_difference_matches_backprop_sigmoid() {
    compare_strategies(ActivationFunction::Sigmoid, 0.01);
}

#[test]
fn test_finite_difference_matches_backprop_tanh() {
    compare_strategies(ActivationFunction::Tanh, 1e-3);
}

#[test]
fn test_finite_difference_matches_backprop_relu() {
    compare_strategies(ActivationFunction::ReLU, 1e-3);
}

// The dataset gradient is the mean of per-example gradients. If the
// activation-gradient buffers carried over between examples the two would
// disagree from the second example on.
#[test]
fn test_backprop_resets_activation_gradients_between_examples() {
    let data = Dataset::xor().unwrap();
    let mut model = xor_network(5, 0.0, 1.0, ActivationFunction::Sigmoid);

    let mut whole = Network::zeros_like(&model).unwrap();
    backprop(&mut model, &mut whole, &data.inputs, &data.outputs).unwrap();
    let whole = all_gradients(&whole);

    let mut mean = vec![0.0; whole.len()];
    for e in 0..data.len() {
        let input = data.inputs.view_row(e).unwrap();
        let output = data.outputs.view_row(e).unwrap();
        let mut single = Network::zeros_like(&model).unwrap();
        backprop(&mut model, &mut single, &input, &output).unwrap();
        for (m, g) in mean.iter_mut().zip(all_gradients(&single)) {
            *m += g / data.len() as f32;
        }
    }

    for (w, m) in whole.iter().zip(mean.iter()) {
        assert_abs_diff_eq!(*w, *m, epsilon = 1e-6);
    }
}

#[test]
fn test_backprop_overwrites_previous_gradients() {
    let data = Dataset::xor().unwrap();
    let mut model = xor_network(3, 0.0, 1.0, ActivationFunction::Sigmoid);
    let mut grads = Network::zeros_like(&model).unwrap();

    backprop(&mut model, &mut grads, &data.inputs, &data.outputs).unwrap();
    let first = all_gradients(&grads);
    backprop(&mut model, &mut grads, &data.inputs, &data.outputs).unwrap();
    assert_eq!(all_gradients(&grads), first);
}

#[test]
fn test_loss_matches_hand_computation() {
    let data = Dataset::xor().unwrap();
    // All-zero parameters: every output is sigmoid(0) = 0.5.
    let spec = NetworkSpec::new(vec![2, 2, 1], ActivationFunction::Sigmoid);
    let model = Network::zeros(&spec).unwrap();
    let loss = model.loss(&data.inputs, &data.outputs).unwrap();
    assert_abs_diff_eq!(loss, 0.25, epsilon = 1e-6);
}

#[test]
fn test_forward_rejects_wrong_input_width() {
    let mut model = xor_network(1, 0.0, 1.0, ActivationFunction::Sigmoid);
    let input = Tensor::from_slice(1, 3, &[1.0, 0.0, 1.0]).unwrap();
    assert!(matches!(model.forward(&input), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_forward_over_a_row_view() {
    let data = Dataset::xor().unwrap();
    let mut model = xor_network(4, 0.0, 1.0, ActivationFunction::Sigmoid);
    let row = data.inputs.view_row(3).unwrap();
    let out = model.forward(&row).unwrap();
    assert_eq!(out.shape(), (1, 1));
    assert_eq!(model.activations().unwrap()[0].to_vec(), vec![1.0, 1.0]);
}
