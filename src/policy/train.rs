//! Policy-gradient training loop with periodic checkpointing

use burn::module::AutodiffModule;
use burn::optim::{GradientsParams, Optimizer, SgdConfig};
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, RecorderError};
use burn::tensor::activation::log_softmax;
use burn::tensor::backend::AutodiffBackend;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::board::GameConfig;
use crate::game::{Episode, GameSimulator, SelectionMode};
use crate::policy::metrics::TrainingMetrics;
use crate::policy::model::{PolicyNet, PolicyNetConfig, PolicySnapshot};
use crate::rewards::shape_rewards;

/// Training configuration.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of training iterations (one episode each).
    pub iterations: usize,
    /// Checkpoint + progress log cadence, in iterations.
    pub checkpoint_interval: usize,
    /// Base learning rate; scaled per step by the shaped reward.
    pub learning_rate: f64,
    /// Discount factor for reward shaping.
    pub discount_factor: f32,
    /// Window for the rolling average episode length.
    pub window_size: usize,
    /// Fixed checkpoint path, overwritten whole on every write.
    pub checkpoint_path: String,
    /// Seed for the backend and the episode RNG; random when unset.
    pub seed: Option<u64>,
    /// Game parameters.
    pub game: GameConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            iterations: 20_000,
            checkpoint_interval: 100,
            learning_rate: 0.005,
            discount_factor: 0.5,
            window_size: 50,
            checkpoint_path: "checkpoints/policy".to_string(),
            seed: None,
            game: GameConfig::default(),
        }
    }
}

/// One training run: owns the model, the optimizer configuration, the
/// episode RNG and the progress metrics.
pub struct TrainingSession<B: AutodiffBackend> {
    model: PolicyNet<B>,
    optim: SgdConfig,
    device: B::Device,
    config: TrainConfig,
    metrics: TrainingMetrics,
    rng: StdRng,
    checkpoints_written: usize,
}

impl<B: AutodiffBackend> TrainingSession<B> {
    pub fn new(device: B::Device, config: TrainConfig) -> Self {
        if let Some(seed) = config.seed {
            B::seed(seed);
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let model = PolicyNetConfig::for_game(&config.game).init(&device);
        let metrics = TrainingMetrics::new(config.window_size);

        Self {
            model,
            optim: SgdConfig::new(),
            device,
            config,
            metrics,
            rng,
            checkpoints_written: 0,
        }
    }

    /// Run the configured number of iterations. Each iteration plays one
    /// stochastic episode under the current policy, shapes its rewards,
    /// and applies one sequential gradient step per trajectory step.
    pub fn run(&mut self) -> Result<(), RecorderError> {
        tracing::info!(
            "Starting training for {} iterations",
            self.config.iterations
        );

        let mut optimizer = self.optim.init::<B, PolicyNet<B>>();

        for iteration in 0..self.config.iterations {
            let episode = self.play_episode();
            let rewards = shape_rewards(
                &episode.hit_log,
                self.config.discount_factor,
                self.config.game.board_size(),
                self.config.game.plane_size,
            );

            for step in 0..episode.len() {
                self.update_step(
                    &mut optimizer,
                    &episode.observations[step],
                    episode.actions[step],
                    rewards[step],
                );
            }

            self.metrics.record_episode(episode.len());

            if (iteration + 1) % self.config.checkpoint_interval == 0 {
                self.save_checkpoint()?;
                tracing::info!(
                    "Iteration {} | avg episode length {:.1}",
                    iteration + 1,
                    self.metrics.average_length()
                );
            }
        }

        Ok(())
    }

    /// Persist the current weights, overwriting the configured path.
    pub fn save_checkpoint(&mut self) -> Result<(), RecorderError> {
        if let Some(parent) = std::path::Path::new(&self.config.checkpoint_path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.model
            .clone()
            .save_file(self.config.checkpoint_path.as_str(), &recorder)?;

        self.checkpoints_written += 1;
        tracing::debug!("Saved checkpoint to {}", self.config.checkpoint_path);
        Ok(())
    }

    /// Inference-backend view of the current weights.
    pub fn snapshot(&self) -> PolicySnapshot<B::InnerBackend> {
        PolicySnapshot::new(self.model.valid(), self.device.clone())
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn checkpoints_written(&self) -> usize {
        self.checkpoints_written
    }

    fn play_episode(&mut self) -> Episode {
        let snapshot = self.snapshot();
        let simulator = GameSimulator::new(&snapshot, self.config.game, SelectionMode::Sample);
        simulator.play(&mut self.rng)
    }

    /// One policy-gradient step for a single trajectory entry: the
    /// cross-entropy gradient of the taken action, applied with an
    /// effective learning rate of `learning_rate * reward`. A negative
    /// reward flips the step into pushing mass away from the action.
    fn update_step(
        &mut self,
        optimizer: &mut impl Optimizer<PolicyNet<B>, B>,
        observation: &[f32],
        action: usize,
        reward: f32,
    ) {
        let input =
            Tensor::<B, 1>::from_floats(observation, &self.device).reshape([1, observation.len()]);
        let log_probs = log_softmax(self.model.forward(input), 1);

        let indices: Tensor<B, 2, Int> =
            Tensor::<B, 1, Int>::from_ints([action as i64].as_slice(), &self.device)
                .reshape([1, 1]);
        let loss = -log_probs.gather(1, indices).mean();

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        let lr = self.config.learning_rate * reward as f64;
        self.model = optimizer.step(lr, self.model.clone(), grads);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InferBackend, TrainBackend};
    use burn::backend::ndarray::NdArrayDevice;

    fn temp_checkpoint_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("strikebot-{}-{}", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    fn arg_max(probs: &[f32]) -> usize {
        probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_train_config_default() {
        let config = TrainConfig::default();
        assert_eq!(config.iterations, 20_000);
        assert_eq!(config.checkpoint_interval, 100);
        assert!((config.learning_rate - 0.005).abs() < 1e-9);
        assert!((config.discount_factor - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_periodic_checkpoint_count() {
        let config = TrainConfig {
            iterations: 10,
            checkpoint_interval: 3,
            checkpoint_path: temp_checkpoint_path("ckpt-count"),
            seed: Some(17),
            ..TrainConfig::default()
        };

        let mut session = TrainingSession::<TrainBackend>::new(NdArrayDevice::default(), config);
        session.run().unwrap();

        // floor(10 / 3) periodic writes.
        assert_eq!(session.checkpoints_written(), 3);
    }

    #[test]
    fn test_checkpoint_round_trip_is_deterministic() {
        let path = temp_checkpoint_path("round-trip");
        let config = TrainConfig {
            iterations: 3,
            checkpoint_interval: 100,
            checkpoint_path: path.clone(),
            seed: Some(42),
            ..TrainConfig::default()
        };

        let device = NdArrayDevice::default();
        let mut session = TrainingSession::<TrainBackend>::new(device, config);
        session.run().unwrap();
        session.save_checkpoint().unwrap();

        let loaded =
            PolicySnapshot::<InferBackend>::load(&path, &PolicyNetConfig::default(), device)
                .unwrap();

        let mut observation = vec![0.0f32; 36];
        observation[7] = 1.0;
        observation[8] = -1.0;

        let trained = session.snapshot().probabilities(&observation);
        let reloaded = loaded.probabilities(&observation);

        assert_eq!(arg_max(&trained), arg_max(&reloaded));
        for (a, b) in trained.iter().zip(&reloaded) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_metrics_track_every_episode() {
        let config = TrainConfig {
            iterations: 4,
            checkpoint_interval: 100,
            checkpoint_path: temp_checkpoint_path("metrics"),
            seed: Some(5),
            ..TrainConfig::default()
        };

        let mut session = TrainingSession::<TrainBackend>::new(NdArrayDevice::default(), config);
        session.run().unwrap();

        assert_eq!(session.metrics().episodes(), 4);
        assert!(session.metrics().average_length() > 0.0);
    }
}
