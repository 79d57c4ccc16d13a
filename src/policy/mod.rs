//! Policy network, training session and progress metrics

pub mod metrics;
pub mod model;
pub mod train;

pub use metrics::{MovingAverage, TrainingMetrics};
pub use model::{PolicyNet, PolicyNetConfig, PolicySnapshot};
pub use train::{TrainConfig, TrainingSession};
