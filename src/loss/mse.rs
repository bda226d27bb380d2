pub struct MseLoss;

impl MseLoss {
    /// Sum of squared differences for one example: Σ (predicted - expected)²
    pub fn squared_error(predicted: &[f32], expected: &[f32]) -> f32 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Per-output gradient with the factor of 2 left out: predicted - expected
    pub fn derivative(predicted: &[f32], expected: &[f32]) -> Vec<f32> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| a - b)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_error_sums_over_outputs() {
        assert_eq!(MseLoss::squared_error(&[1.0, 0.5], &[0.0, 1.5]), 2.0);
    }

    #[test]
    fn derivative_is_signed_difference() {
        assert_eq!(MseLoss::derivative(&[0.25, 1.0], &[1.0, 0.0]), vec![-0.75, 1.0]);
    }
}
