//! Neighborhood-search fallback: expand outward from known hits

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::board::{Cell, ObserverBoard, Position};

use super::SelectError;
use super::selector::SelectStrike;

/// Fallback strike selection. With no hits yet, strikes a random
/// unexplored cell; otherwise probes the four neighbors of each known
/// target cell. The hit list is rotated around a random pivot first so
/// repeated calls don't always expand from the first-discovered hit.
pub struct NeighborhoodSearch;

impl SelectStrike for NeighborhoodSearch {
    fn name(&self) -> &'static str {
        "neighborhood-search"
    }

    fn try_select(
        &self,
        board: &ObserverBoard,
        total_hits: usize,
        rng: &mut StdRng,
    ) -> Result<Option<Position>, SelectError> {
        if total_hits == 0 {
            let unexplored = board.unexplored();
            if unexplored.is_empty() {
                return Ok(None);
            }
            return Ok(Some(unexplored[rng.random_range(0..unexplored.len())]));
        }

        let mut known_hits = board.known_hits();
        if known_hits.len() != total_hits {
            return Err(SelectError::StateInconsistency);
        }

        let pivot = rng.random_range(0..known_hits.len());
        known_hits.rotate_left(pivot);

        for cell in known_hits {
            for neighbor in cell.neighbors() {
                if board.in_bounds(neighbor) && board.get(neighbor) == Cell::Unknown {
                    return Ok(Some(neighbor));
                }
            }
        }

        debug!("Neighborhood search exhausted all candidates");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameConfig;
    use rand::SeedableRng;

    #[test]
    fn test_no_hits_returns_random_unexplored() {
        let config = GameConfig::default();
        let mut board = ObserverBoard::new(&config);
        board.record_miss(Position::new(0, 0));

        let mut rng = StdRng::seed_from_u64(1);
        let pos = NeighborhoodSearch
            .try_select(&board, 0, &mut rng)
            .unwrap()
            .unwrap();

        assert!(board.in_bounds(pos));
        assert_eq!(board.get(pos), Cell::Unknown);
    }

    #[test]
    fn test_expands_from_a_known_hit() {
        let config = GameConfig::default();
        let mut board = ObserverBoard::new(&config);
        board.record_hit(Position::new(2, 2));

        let mut rng = StdRng::seed_from_u64(2);
        let pos = NeighborhoodSearch
            .try_select(&board, 1, &mut rng)
            .unwrap()
            .unwrap();

        let adjacent = Position::new(2, 2)
            .neighbors()
            .iter()
            .any(|&n| n == pos);
        assert!(adjacent);
        assert_eq!(board.get(pos), Cell::Unknown);
    }

    #[test]
    fn test_surrounded_hit_has_no_candidate() {
        let config = GameConfig::default();
        let mut board = ObserverBoard::new(&config);
        board.record_hit(Position::new(2, 2));
        for neighbor in Position::new(2, 2).neighbors() {
            board.record_miss(neighbor);
        }

        let mut rng = StdRng::seed_from_u64(3);
        let result = NeighborhoodSearch.try_select(&board, 1, &mut rng).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_hit_count_mismatch_is_rejected() {
        let config = GameConfig::default();
        let mut board = ObserverBoard::new(&config);
        board.record_hit(Position::new(1, 1));
        board.record_hit(Position::new(1, 2));
        board.record_hit(Position::new(1, 3));

        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            NeighborhoodSearch.try_select(&board, 2, &mut rng),
            Err(SelectError::StateInconsistency)
        );
    }

    #[test]
    fn test_corner_hit_probes_stay_in_bounds() {
        let config = GameConfig::default();
        let mut board = ObserverBoard::new(&config);
        board.record_hit(Position::new(0, 0));

        let mut rng = StdRng::seed_from_u64(5);
        let pos = NeighborhoodSearch
            .try_select(&board, 1, &mut rng)
            .unwrap()
            .unwrap();
        assert!(board.in_bounds(pos));
    }
}
