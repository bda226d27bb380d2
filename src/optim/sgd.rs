use crate::error::Result;
use crate::network::network::Network;

pub const DEFAULT_LEARNING_RATE: f32 = 0.1;

pub struct Sgd {
    pub learning_rate: f32,
}

impl Sgd {
    pub fn new(learning_rate: f32) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one gradient-descent update to every layer of `model`.
    pub fn step(&self, model: &mut Network, gradients: &Network) -> Result<()> {
        learn(model, gradients, self.learning_rate)
    }
}

impl Default for Sgd {
    fn default() -> Self {
        Sgd::new(DEFAULT_LEARNING_RATE)
    }
}

/// `param -= grad * learning_rate` for every weight and bias pair.
pub fn learn(model: &mut Network, gradients: &Network, learning_rate: f32) -> Result<()> {
    model.check_paired(gradients)?;
    for (layer, grads) in model.layers.iter_mut().zip(gradients.layers.iter()) {
        layer.apply_gradients(grads, learning_rate)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::spec::NetworkSpec;

    #[test]
    fn step_moves_every_parameter() {
        let spec = NetworkSpec::new(vec![2, 1], ActivationFunction::Sigmoid);
        let mut model = Network::from_fn(&spec, |_, _| 1.0).unwrap();
        let grads = Network::from_fn(&spec, |_, _| 2.0).unwrap();
        Sgd::default().step(&mut model, &grads).unwrap();
        assert!(model.weights(0).unwrap().to_vec().iter().all(|&v| (v - 0.8).abs() < 1e-6));
        assert!((model.bias(0).unwrap().get(0).unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn unpaired_networks_are_rejected() {
        let spec = NetworkSpec::new(vec![2, 1], ActivationFunction::Sigmoid);
        let mut model = Network::zeros(&spec).unwrap();
        let spec = NetworkSpec::new(vec![3, 1], ActivationFunction::Sigmoid);
        let grads = Network::zeros(&spec).unwrap();
        assert!(learn(&mut model, &grads, 0.1).is_err());
    }
}
