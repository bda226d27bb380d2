use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gradient::backprop::backprop;
use crate::gradient::finite_difference::finite_difference;
use crate::math::tensor::Tensor;
use crate::network::network::Network;

/// Selects how the training loop computes gradients.
///
/// - `FiniteDifference`: perturb each parameter and re-measure the loss;
///   slow, used as a reference.
/// - `Backprop`: analytic chain rule over cached activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMethod {
    FiniteDifference,
    #[default]
    Backprop,
}

impl GradientMethod {
    /// Fills `gradients` for `model` on the dataset and returns the loss at
    /// the current parameters. `epsilon` only affects `FiniteDifference`.
    pub fn compute(
        &self,
        model: &mut Network,
        gradients: &mut Network,
        inputs: &Tensor,
        outputs: &Tensor,
        epsilon: f32,
    ) -> Result<f32> {
        match self {
            GradientMethod::FiniteDifference => {
                finite_difference(model, gradients, inputs, outputs, epsilon)
            }
            GradientMethod::Backprop => backprop(model, gradients, inputs, outputs),
        }
    }
}
