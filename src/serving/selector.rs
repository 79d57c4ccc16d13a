//! Strategy chain that turns an observation into a strike coordinate

use burn::tensor::backend::Backend;
use rand::rngs::StdRng;
use tracing::debug;

use crate::board::{Cell, GameConfig, ObserverBoard, Position};
use crate::policy::PolicySnapshot;

use super::neighborhood::NeighborhoodSearch;
use super::{SelectError, StrikeRequest, StrikeResponse, observation_from_grid};

/// One stage of the selection chain. `Ok(None)` means this stage has no
/// candidate and the next stage should be tried; an error aborts the
/// whole selection.
pub trait SelectStrike {
    fn name(&self) -> &'static str;

    fn try_select(
        &self,
        board: &ObserverBoard,
        total_hits: usize,
        rng: &mut StdRng,
    ) -> Result<Option<Position>, SelectError>;
}

/// Primary stage: arg-max of the trained policy over unexplored cells.
pub struct PolicyStrike<B: Backend> {
    snapshot: PolicySnapshot<B>,
}

impl<B: Backend> PolicyStrike<B> {
    pub fn new(snapshot: PolicySnapshot<B>) -> Self {
        Self { snapshot }
    }
}

impl<B: Backend> SelectStrike for PolicyStrike<B> {
    fn name(&self) -> &'static str {
        "policy"
    }

    fn try_select(
        &self,
        board: &ObserverBoard,
        _total_hits: usize,
        _rng: &mut StdRng,
    ) -> Result<Option<Position>, SelectError> {
        let probs = self.snapshot.probabilities(&board.flatten());

        // Only unexplored cells with strictly positive mass qualify; a
        // degenerate model yields no candidate and the chain moves on.
        let mut best: Option<(usize, f32)> = None;
        for (index, &prob) in probs.iter().enumerate() {
            if board.get_index(index) != Cell::Unknown {
                continue;
            }
            if prob > best.map_or(0.0, |(_, p)| p) {
                best = Some((index, prob));
            }
        }

        Ok(best.map(|(index, _)| board.position_of(index)))
    }
}

/// Ordered list of selection strategies tried in sequence, created once
/// at serving startup.
pub struct StrikePlanner {
    config: GameConfig,
    strategies: Vec<Box<dyn SelectStrike>>,
}

impl StrikePlanner {
    /// Full chain: trained policy first, neighborhood search as the
    /// fallback. Serving runs on the CPU inference backend.
    pub fn with_model(config: GameConfig, snapshot: PolicySnapshot<crate::InferBackend>) -> Self {
        Self {
            config,
            strategies: vec![
                Box::new(PolicyStrike::new(snapshot)),
                Box::new(NeighborhoodSearch),
            ],
        }
    }

    /// Fallback-only chain for when no trained model is available.
    pub fn without_model(config: GameConfig) -> Self {
        Self {
            config,
            strategies: vec![Box::new(NeighborhoodSearch)],
        }
    }

    /// Validate the observation and return the next strike coordinate.
    pub fn select(
        &self,
        request: &StrikeRequest,
        rng: &mut StdRng,
    ) -> Result<StrikeResponse, SelectError> {
        let board = observation_from_grid(&request.observation_board, &self.config)?;

        if board.known_hits().len() != request.total_hits_by_agent {
            return Err(SelectError::StateInconsistency);
        }

        for strategy in &self.strategies {
            if let Some(pos) = strategy.try_select(&board, request.total_hits_by_agent, rng)? {
                debug!(
                    "Strategy {} selected ({}, {})",
                    strategy.name(),
                    pos.row,
                    pos.col
                );
                return Ok(StrikeResponse {
                    row: pos.row as usize,
                    column: pos.col as usize,
                });
            }
        }

        Err(SelectError::NoEligibleCell)
    }
}
