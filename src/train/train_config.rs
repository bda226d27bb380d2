use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gradient::finite_difference::DEFAULT_EPSILON;
use crate::gradient::method::GradientMethod;
use crate::optim::sgd::DEFAULT_LEARNING_RATE;

/// Configuration for a `train` run.
///
/// # Fields
/// - `epochs`: number of full-dataset gradient steps
/// - `learning_rate`: step size applied to every gradient
/// - `epsilon`: perturbation for `GradientMethod::FiniteDifference`
/// - `method`: how gradients are computed
/// - `log_every`: emit a `debug` event every this many epochs (0 = never)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f32,
    pub epsilon: f32,
    pub method: GradientMethod,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 20_000,
            learning_rate: DEFAULT_LEARNING_RATE,
            epsilon: DEFAULT_EPSILON,
            method: GradientMethod::Backprop,
            log_every: 1_000,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, method: GradientMethod) -> Self {
        TrainConfig {
            epochs,
            method,
            ..TrainConfig::default()
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.method == GradientMethod::FiniteDifference
            && (!self.epsilon.is_finite() || self.epsilon <= 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
