use serde::{Deserialize, Serialize};

/// Elementwise activation applied after each affine layer.
///
/// Every variant pairs its function with a derivative written in terms of the
/// *activated* value `a = function(x)`, which is what the forward cache
/// holds. Forward and backward passes take the same value, so the two can not
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    Tanh,
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f32) -> f32 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => x.max(0.0),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative at the point whose activation is `a`.
    pub fn derivative(&self, a: f32) -> f32 {
        match self {
            ActivationFunction::Sigmoid => a * (1.0 - a),
            ActivationFunction::ReLU => {
                if a > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::Tanh => 1.0 - a * a,
            ActivationFunction::Identity => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ActivationFunction; 4] = [
        ActivationFunction::Sigmoid,
        ActivationFunction::ReLU,
        ActivationFunction::Tanh,
        ActivationFunction::Identity,
    ];

    // The derivative taken from the activated value must match a central
    // difference of the function itself.
    #[test]
    fn derivative_matches_function() {
        let h = 1e-3;
        for act in ALL {
            for &x in &[-2.0f32, -0.5, 0.3, 1.7] {
                let numeric = (act.function(x + h) - act.function(x - h)) / (2.0 * h);
                let analytic = act.derivative(act.function(x));
                assert!(
                    (numeric - analytic).abs() < 1e-2,
                    "{act:?} at {x}: numeric {numeric}, analytic {analytic}"
                );
            }
        }
    }

    #[test]
    fn relu_clamps_negative() {
        assert_eq!(ActivationFunction::ReLU.function(-3.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(0.0), 0.0);
        assert_eq!(ActivationFunction::ReLU.derivative(2.0), 1.0);
    }

    #[test]
    fn parses_from_config_names() {
        let act: ActivationFunction = serde_json::from_str("\"relu\"").unwrap();
        assert_eq!(act, ActivationFunction::ReLU);
        let act: ActivationFunction = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(act, ActivationFunction::Tanh);
    }
}
