//! Policy network: feed-forward softmax classifier over board cells

use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, RecorderError};
use burn::tensor::activation::softmax;

use crate::board::GameConfig;
use crate::game::StrikePolicy;

/// Network shape: flattened board in, one softmax class per cell out.
#[derive(Debug, Config)]
pub struct PolicyNetConfig {
    pub input_size: usize,
    pub hidden_size_1: usize,
    pub hidden_size_2: usize,
    pub num_classes: usize,
}

impl PolicyNetConfig {
    /// Reference architecture for a given grid: H*W -> 50 -> 100 -> H*W.
    pub fn for_game(config: &GameConfig) -> Self {
        let board_size = config.board_size();
        Self::new(board_size, 50, 100, board_size)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> PolicyNet<B> {
        PolicyNet {
            fc1: LinearConfig::new(self.input_size, self.hidden_size_1).init(device),
            fc2: LinearConfig::new(self.hidden_size_1, self.hidden_size_2).init(device),
            output: LinearConfig::new(self.hidden_size_2, self.num_classes).init(device),
            activation: Relu::new(),
        }
    }
}

impl Default for PolicyNetConfig {
    fn default() -> Self {
        Self::for_game(&GameConfig::default())
    }
}

/// Two hidden ReLU layers and a linear head; softmax is applied by the
/// callers that need probabilities so training can use log-softmax on
/// the same logits.
#[derive(Module, Debug)]
pub struct PolicyNet<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    output: Linear<B>,
    activation: Relu,
}

impl<B: Backend> PolicyNet<B> {
    /// Forward pass returning raw logits.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.fc1.forward(input));
        let x = self.activation.forward(self.fc2.forward(x));
        self.output.forward(x)
    }

    /// Softmax distribution over all cells for a single observation.
    pub fn probabilities(&self, observation: &[f32], device: &B::Device) -> Vec<f32> {
        let input =
            Tensor::<B, 1>::from_floats(observation, device).reshape([1, observation.len()]);
        let probs = softmax(self.forward(input), 1);
        probs.into_data().to_vec().unwrap()
    }
}

/// A loaded policy with its device: the unit the serving path holds on
/// to. The snapshot is immutable in use; `reload` swaps in a fresh set
/// of weights wholesale instead of mutating the live one.
pub struct PolicySnapshot<B: Backend> {
    net: PolicyNet<B>,
    device: B::Device,
}

impl<B: Backend> PolicySnapshot<B> {
    pub fn new(net: PolicyNet<B>, device: B::Device) -> Self {
        Self { net, device }
    }

    /// Read a checkpoint from disk once, at startup.
    pub fn load(
        path: &str,
        config: &PolicyNetConfig,
        device: B::Device,
    ) -> Result<Self, RecorderError> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let net = config.init::<B>(&device).load_file(path, &recorder, &device)?;
        tracing::info!("Loaded policy checkpoint from {}", path);
        Ok(Self { net, device })
    }

    /// Explicit weight refresh; replaces the whole net on success.
    pub fn reload(&mut self, path: &str) -> Result<(), RecorderError> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.net = self.net.clone().load_file(path, &recorder, &self.device)?;
        tracing::info!("Reloaded policy checkpoint from {}", path);
        Ok(())
    }

    pub fn probabilities(&self, observation: &[f32]) -> Vec<f32> {
        self.net.probabilities(observation, &self.device)
    }
}

impl<B: Backend> StrikePolicy for PolicySnapshot<B> {
    fn distribution(&self, observation: &[f32]) -> Vec<f32> {
        self.probabilities(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InferBackend;
    use burn::backend::ndarray::NdArrayDevice;

    #[test]
    fn test_probabilities_form_a_distribution() {
        let device = NdArrayDevice::default();
        let net = PolicyNetConfig::default().init::<InferBackend>(&device);

        let observation = vec![0.0f32; 36];
        let probs = net.probabilities(&observation, &device);

        assert_eq!(probs.len(), 36);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(probs.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_snapshot_matches_net_output() {
        let device = NdArrayDevice::default();
        let net = PolicyNetConfig::default().init::<InferBackend>(&device);
        let expected = net.probabilities(&vec![0.0f32; 36], &device);

        let snapshot = PolicySnapshot::new(net, device);
        let probs = snapshot.probabilities(&vec![0.0f32; 36]);
        assert_eq!(probs, expected);
    }
}
