use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};

/// Architecture of a feed-forward network.
///
/// Fields:
/// - `topology`: layer widths, input first; at least two entries,
///   all non-zero
/// - `activation`: activation applied after every affine layer
/// - `cache_activations`: keep every layer's output from the last
///   `forward` call (needed for backpropagation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub topology: Vec<usize>,
    #[serde(default)]
    pub activation: ActivationFunction,
    #[serde(default = "default_cache")]
    pub cache_activations: bool,
}

fn default_cache() -> bool {
    true
}

impl NetworkSpec {
    pub fn new(topology: Vec<usize>, activation: ActivationFunction) -> NetworkSpec {
        NetworkSpec {
            topology,
            activation,
            cache_activations: true,
        }
    }

    pub fn without_cache(mut self) -> NetworkSpec {
        self.cache_activations = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.topology.len() < 2 || self.topology.contains(&0) {
            return Err(Error::InvalidTopology(self.topology.clone()));
        }
        Ok(())
    }

    /// `(input_size, size)` for every layer.
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.topology.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
