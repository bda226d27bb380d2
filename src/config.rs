use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::math::init::InitConfig;
use crate::network::spec::NetworkSpec;
use crate::train::dataset::BooleanFunction;
use crate::train::train_config::TrainConfig;

/// Everything needed to reproduce one training run: the architecture, the
/// initialization, the training hyperparameters and which truth table to
/// learn.
///
/// Only `network` is required in JSON; the other sections fall back to their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub network: NetworkSpec,
    #[serde(default)]
    pub init: InitConfig,
    #[serde(default)]
    pub train: TrainConfig,
    #[serde(default)]
    pub dataset: BooleanFunction,
}

impl Default for ExperimentConfig {
    /// `[2, 2, 1]` sigmoid network learning XOR.
    fn default() -> Self {
        ExperimentConfig {
            network: NetworkSpec::new(vec![2, 2, 1], ActivationFunction::Sigmoid),
            init: InitConfig::default(),
            train: TrainConfig::default(),
            dataset: BooleanFunction::Xor,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.train.validate()?;
        self.init.build().map(|_| ())
    }

    pub fn from_json_str(raw: &str) -> Result<ExperimentConfig> {
        let config: ExperimentConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config written by `save_json` (or by hand).
    pub fn load_json(path: &str) -> Result<ExperimentConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: ExperimentConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
