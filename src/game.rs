//! Episode simulation: plays one full game under a strike policy

use rand::Rng;
use rand::rngs::StdRng;

use crate::board::{Cell, GameConfig, ObserverBoard, OwnerBoard};
use crate::target::TargetGenerator;

/// A policy maps the flattened observer board to a probability
/// distribution over all cells.
pub trait StrikePolicy {
    fn distribution(&self, observation: &[f32]) -> Vec<f32>;
}

/// Baseline policy: equal mass on every cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPolicy;

impl StrikePolicy for UniformPolicy {
    fn distribution(&self, observation: &[f32]) -> Vec<f32> {
        if observation.is_empty() {
            return Vec::new();
        }
        vec![1.0 / observation.len() as f32; observation.len()]
    }
}

/// How the simulator picks a cell from the masked distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Weighted random sampling, used during training.
    Sample,
    /// Arg-max, used during evaluation and serving.
    Greedy,
}

/// Trajectory of one episode: per-step observation snapshots, chosen cell
/// indices and strike outcomes.
#[derive(Debug, Clone, Default)]
pub struct Episode {
    pub observations: Vec<Vec<f32>>,
    pub actions: Vec<usize>,
    pub hit_log: Vec<bool>,
}

impl Episode {
    pub fn push(&mut self, observation: Vec<f32>, action: usize, hit: bool) {
        self.observations.push(observation);
        self.actions.push(action);
        self.hit_log.push(hit);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hit_log.iter().filter(|&&h| h).count()
    }
}

/// Plays full episodes against freshly generated targets.
pub struct GameSimulator<'a, P: StrikePolicy> {
    policy: &'a P,
    config: GameConfig,
    mode: SelectionMode,
}

impl<'a, P: StrikePolicy> GameSimulator<'a, P> {
    pub fn new(policy: &'a P, config: GameConfig, mode: SelectionMode) -> Self {
        Self {
            policy,
            config,
            mode,
        }
    }

    /// Play one episode to completion. Terminates once every target cell
    /// is struck, or after the whole board has been struck as a
    /// defensive bound.
    pub fn play(&self, rng: &mut StdRng) -> Episode {
        let target = TargetGenerator::new(self.config).generate(rng);
        let mut owner = OwnerBoard::with_target(&self.config, &target);
        let mut observer = ObserverBoard::new(&self.config);

        let mut episode = Episode::default();
        let mut hits = 0;

        while hits < self.config.plane_size && episode.len() < self.config.board_size() {
            let observation = observer.flatten();
            let probs = self.masked_distribution(&observer, &observation);

            let action = match self.mode {
                SelectionMode::Sample => sample_categorical(&probs, rng),
                SelectionMode::Greedy => arg_max(&probs),
            };

            let pos = observer.position_of(action);
            if owner.strike(pos) {
                observer.record_hit(pos);
                hits += 1;
                episode.push(observation, action, true);
            } else {
                observer.record_miss(pos);
                episode.push(observation, action, false);
            }
        }

        episode
    }

    /// Zero out mass on already-struck cells and renormalize over the
    /// remainder. Falls back to a uniform distribution over unexplored
    /// cells when no mass is left.
    fn masked_distribution(&self, observer: &ObserverBoard, observation: &[f32]) -> Vec<f32> {
        let mut probs = self.policy.distribution(observation);
        debug_assert_eq!(probs.len(), observer.len());

        let mut total = 0.0f32;
        for (index, prob) in probs.iter_mut().enumerate() {
            if observer.get_index(index) == Cell::Unknown {
                total += *prob;
            } else {
                *prob = 0.0;
            }
        }

        if total > 0.0 {
            for prob in &mut probs {
                *prob /= total;
            }
        } else {
            let unexplored = observer.unexplored();
            let uniform = 1.0 / unexplored.len() as f32;
            for pos in unexplored {
                probs[observer.index_of(pos)] = uniform;
            }
        }

        probs
    }
}

/// Sample an index from a categorical distribution.
pub fn sample_categorical(probs: &[f32], rng: &mut StdRng) -> usize {
    let draw: f32 = rng.random();
    let mut cumulative = 0.0f32;

    for (index, &prob) in probs.iter().enumerate() {
        cumulative += prob;
        if draw < cumulative {
            return index;
        }
    }

    // Float residue can leave the draw past the final bucket; take the
    // last index that still carries mass.
    probs
        .iter()
        .rposition(|&p| p > 0.0)
        .unwrap_or(probs.len() - 1)
}

fn arg_max(probs: &[f32]) -> usize {
    let mut best = 0;
    let mut best_prob = probs[0];
    for (index, &prob) in probs.iter().enumerate().skip(1) {
        if prob > best_prob {
            best_prob = prob;
            best = index;
        }
    }
    best
}
