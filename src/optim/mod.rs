pub mod sgd;

pub use sgd::{learn, Sgd, DEFAULT_LEARNING_RATE};
