use std::fmt;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::loss::mse::MseLoss;
use crate::math::init::Initializer;
use crate::math::tensor::{format_shape, Tensor};
use crate::network::spec::NetworkSpec;

/// A stack of affine + activation layers.
///
/// `layers[i]` holds `Weights[i]` (`topology[i] x topology[i+1]`) and
/// `Bias[i]` (`1 x topology[i+1]`). When the activation cache is enabled,
/// `activations[i]` is a `1 x topology[i]` row holding the state entering
/// layer `i` during the last `forward` call (`activations[0]` is the input,
/// the last entry the output). A gradient network uses the same slots for
/// activation gradients.
#[derive(Debug)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub(crate) activations: Option<Vec<Tensor>>,
    activation: ActivationFunction,
}

impl Network {
    /// Builds a network whose parameters are drawn from `init`.
    pub fn new(spec: &NetworkSpec, init: &mut Initializer) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .layer_shapes()
            .map(|(input_size, size)| Layer::random(input_size, size, init))
            .collect::<Result<Vec<_>>>()?;
        Network::assemble(spec, layers)
    }

    /// Builds a network from an arbitrary generator, filling
    /// `Weights[0], Bias[0], Weights[1], Bias[1], ...` in that order.
    ///
    /// Start parameters small (within `[-1, 1]` or `[0, 1]`); wide ranges such
    /// as `[-10, 10]` saturate the activations and training stalls.
    pub fn from_fn<F>(spec: &NetworkSpec, mut generator: F) -> Result<Network>
    where
        F: FnMut(usize, usize) -> f32,
    {
        spec.validate()?;
        let layers = spec
            .layer_shapes()
            .map(|(input_size, size)| Layer::from_fn(input_size, size, &mut generator))
            .collect::<Result<Vec<_>>>()?;
        Network::assemble(spec, layers)
    }

    /// All-zero network with the given architecture.
    pub fn zeros(spec: &NetworkSpec) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .layer_shapes()
            .map(|(input_size, size)| Layer::zeros(input_size, size))
            .collect::<Result<Vec<_>>>()?;
        Network::assemble(spec, layers)
    }

    /// All-zero network shaped like `model`, used to hold its gradients.
    /// The activation slots are always allocated here since backpropagation
    /// keeps activation gradients in them.
    pub fn zeros_like(model: &Network) -> Result<Network> {
        let spec = NetworkSpec::new(model.topology(), model.activation);
        Network::zeros(&spec)
    }

    fn assemble(spec: &NetworkSpec, layers: Vec<Layer>) -> Result<Network> {
        let activations = if spec.cache_activations {
            Some(
                spec.topology
                    .iter()
                    .map(|&width| Tensor::new(1, width))
                    .collect::<Result<Vec<_>>>()?,
            )
        } else {
            None
        };

        Ok(Network {
            layers,
            activations,
            activation: spec.activation,
        })
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn topology(&self) -> Vec<usize> {
        let mut topology = Vec::with_capacity(self.layers.len() + 1);
        if let Some(first) = self.layers.first() {
            topology.push(first.input_size());
        }
        topology.extend(self.layers.iter().map(Layer::size));
        topology
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::size)
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn weights(&self, layer: usize) -> Option<&Tensor> {
        self.layers.get(layer).map(|l| &l.weights)
    }

    pub fn bias(&self, layer: usize) -> Option<&Tensor> {
        self.layers.get(layer).map(|l| &l.bias)
    }

    /// States cached by the last `forward` call, input first.
    pub fn activations(&self) -> Option<&[Tensor]> {
        self.activations.as_deref()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.bias.len())
            .sum()
    }

    fn check_input(&self, inputs: &Tensor) -> Result<()> {
        if inputs.columns() != self.input_size() {
            return Err(Error::shape_mismatch(
                format!("{} input columns", self.input_size()),
                format!("{} columns", inputs.columns()),
            ));
        }
        Ok(())
    }

    /// Runs `inputs` (`1 x topology[0]`) through every layer, overwriting the
    /// activation cache when it is enabled.
    pub fn forward(&mut self, inputs: &Tensor) -> Result<Tensor> {
        self.check_input(inputs)?;
        if inputs.rows() != 1 {
            return Err(Error::shape_mismatch(
                format!("1x{}", self.input_size()),
                format_shape(inputs.shape()),
            ));
        }

        let activation = self.activation;
        let mut state = inputs.copy();
        if let Some(cache) = self.activations.as_mut() {
            cache[0].assign(&state)?;
        }

        for (i, layer) in self.layers.iter().enumerate() {
            state = layer.feed_from(&state, activation)?;
            if let Some(cache) = self.activations.as_mut() {
                cache[i + 1].assign(&state)?;
            }
        }

        Ok(state)
    }

    /// The same computation as `forward` without touching the cache. Accepts
    /// any number of rows and evaluates each independently.
    pub fn evaluate(&self, inputs: &Tensor) -> Result<Tensor> {
        self.check_input(inputs)?;
        let mut state = inputs.copy();
        for layer in &self.layers {
            state = layer.feed_from(&state, self.activation)?;
        }
        Ok(state)
    }

    /// Checks that `inputs` and `outputs` form a dataset for this network.
    pub fn check_dataset(&self, inputs: &Tensor, outputs: &Tensor) -> Result<()> {
        self.check_input(inputs)?;
        if outputs.columns() != self.output_size() {
            return Err(Error::shape_mismatch(
                format!("{} output columns", self.output_size()),
                format!("{} columns", outputs.columns()),
            ));
        }
        if inputs.rows() != outputs.rows() {
            return Err(Error::shape_mismatch(
                format!("{} target rows", inputs.rows()),
                format!("{} rows", outputs.rows()),
            ));
        }
        Ok(())
    }

    /// Mean over examples of the summed squared output error:
    /// `(1/N) Σ_example Σ_j (forward(example)[j] - target[j])²`.
    pub fn loss(&self, inputs: &Tensor, outputs: &Tensor) -> Result<f32> {
        self.check_dataset(inputs, outputs)?;
        let predicted = self.evaluate(inputs)?;

        let mut total = 0.0;
        for e in 0..inputs.rows() {
            let p = predicted.view_row(e)?.to_vec();
            let t = outputs.view_row(e)?.to_vec();
            total += MseLoss::squared_error(&p, &t);
        }
        Ok(total / inputs.rows() as f32)
    }

    /// Network outputs rounded to the nearest integer, one row per example.
    pub fn predict_rounded(&self, inputs: &Tensor) -> Result<Vec<Vec<f32>>> {
        let predicted = self.evaluate(inputs)?;
        (0..predicted.rows())
            .map(|e| {
                Ok(predicted
                    .view_row(e)?
                    .to_vec()
                    .into_iter()
                    .map(f32::round)
                    .collect())
            })
            .collect()
    }

    /// Zeroes every weight, bias and cached activation.
    pub fn zero(&mut self) {
        for layer in &mut self.layers {
            layer.zero();
        }
        if let Some(cache) = self.activations.as_mut() {
            for t in cache {
                t.zero();
            }
        }
    }

    /// Fails unless `other` has exactly this network's topology.
    pub fn check_paired(&self, other: &Network) -> Result<()> {
        if self.topology() != other.topology() {
            return Err(Error::shape_mismatch(
                format!("topology {:?}", self.topology()),
                format!("topology {:?}", other.topology()),
            ));
        }
        Ok(())
    }

    /// Independent deep copy; the cache is copied as well.
    pub fn copy(&self) -> Network {
        Network {
            layers: self.layers.iter().map(Layer::copy).collect(),
            activations: self
                .activations
                .as_ref()
                .map(|cache| cache.iter().map(Tensor::copy).collect()),
            activation: self.activation,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f, "=== Layer {i} ===")?;
            writeln!(f, "{}", layer.weights.labelled("Weights"))?;
            writeln!(f, "{}", layer.bias.labelled("Bias"))?;
            if let Some(cache) = &self.activations {
                writeln!(f, "{}", cache[i].labelled("Activations"))?;
            }
        }
        if let Some(last) = self.activations.as_ref().and_then(|c| c.last()) {
            writeln!(f, "=== Output ===")?;
            writeln!(f, "{}", last.labelled("Activations"))?;
        }
        Ok(())
    }
}
