use serde::{Deserialize, Serialize};

/// Summary returned by `train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// Number of update steps applied.
    pub epochs: usize,
    /// Dataset loss before the first update.
    pub initial_loss: f32,
    /// Dataset loss after the last update.
    pub final_loss: f32,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl TrainReport {
    pub fn improved(&self) -> bool {
        self.final_loss < self.initial_loss
    }
}
