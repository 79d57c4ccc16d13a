pub mod board;
pub mod game;
pub mod policy;
pub mod rewards;
pub mod serving;
pub mod target;

// Re-export commonly used types for convenience
pub use board::{Cell, GameConfig, ObserverBoard, OwnerBoard, Position};
pub use game::{Episode, GameSimulator, SelectionMode, StrikePolicy, UniformPolicy};
pub use policy::{PolicyNet, PolicyNetConfig, PolicySnapshot, TrainConfig, TrainingSession};
pub use serving::{SelectError, StrikePlanner, StrikeRequest, StrikeResponse};

/// CPU backend used by the serving path and evaluation.
pub type InferBackend = burn::backend::NdArray<f32>;
/// Autodiff wrapper over the inference backend, used for training.
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;
