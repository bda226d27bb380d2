pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod gradient;
pub mod optim;
pub mod train;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::tensor::Tensor;
pub use math::init::{InitConfig, Initializer};
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use gradient::{backprop, finite_difference, GradientMethod};
pub use optim::sgd::{learn, Sgd};
pub use train::{train, BooleanFunction, Dataset, TrainConfig, TrainReport};
pub use config::ExperimentConfig;
