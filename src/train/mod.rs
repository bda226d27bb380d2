pub mod dataset;
pub mod train_config;
pub mod train_report;
pub mod trainer;

pub use dataset::{BooleanFunction, Dataset};
pub use train_config::TrainConfig;
pub use train_report::TrainReport;
pub use trainer::{train, train_step};
