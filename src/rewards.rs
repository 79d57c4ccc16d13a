//! Credit assignment: turns a raw hit/miss sequence into per-step rewards

/// Shape an episode's hit log into one reward per step.
///
/// Each step's raw signal is how much better it did than the expected hit
/// rate of a uniformly random guess over the cells still unstruck at that
/// step, discounted by how late the step occurred:
///
/// `delta_i = (hit_i - (plane_size - hits_before_i) / (board_size - i)) * discount^i`
///
/// The reward for step `i` is the reward-to-go `sum(delta_j, j >= i)`
/// recentred by `discount^-i`, so early actions are credited with the
/// shaped outcome of the whole remaining trajectory. The baseline keeps
/// the gradient informative on misses, which dominate most episodes.
pub fn shape_rewards(
    hit_log: &[bool],
    discount: f32,
    board_size: usize,
    plane_size: usize,
) -> Vec<f32> {
    let mut deltas = Vec::with_capacity(hit_log.len());
    let mut hits_before = 0.0f32;

    for (step, &hit) in hit_log.iter().enumerate() {
        let remaining = board_size.saturating_sub(step) as f32;
        // A trajectory bounded by the board size always leaves at least
        // one unstruck cell here; the guard defines the degenerate case
        // as a zero baseline instead of dividing by zero.
        let baseline = if remaining > 0.0 {
            (plane_size as f32 - hits_before) / remaining
        } else {
            0.0
        };
        let outcome = if hit { 1.0 } else { 0.0 };
        deltas.push((outcome - baseline) * discount.powi(step as i32));
        hits_before += outcome;
    }

    (0..deltas.len())
        .map(|step| discount.powi(-(step as i32)) * deltas[step..].iter().sum::<f32>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_SIZE: usize = 36;
    const PLANE_SIZE: usize = 8;

    #[test]
    fn test_all_misses_never_rewarded() {
        let hit_log = vec![false; 12];
        let rewards = shape_rewards(&hit_log, 0.5, BOARD_SIZE, PLANE_SIZE);

        assert_eq!(rewards.len(), 12);
        for reward in rewards {
            assert!(reward <= 0.0, "miss-only trajectories earn no credit");
        }
    }

    #[test]
    fn test_early_hits_beat_misses_at_every_step() {
        let hits = vec![true; PLANE_SIZE];
        let misses = vec![false; PLANE_SIZE];

        let hit_rewards = shape_rewards(&hits, 0.5, BOARD_SIZE, PLANE_SIZE);
        let miss_rewards = shape_rewards(&misses, 0.5, BOARD_SIZE, PLANE_SIZE);

        for (hit_reward, miss_reward) in hit_rewards.iter().zip(&miss_rewards) {
            assert!(hit_reward > miss_reward);
        }
    }

    #[test]
    fn test_full_length_trajectory_stays_finite() {
        let mut hit_log = vec![false; BOARD_SIZE];
        for slot in hit_log.iter_mut().take(PLANE_SIZE) {
            *slot = true;
        }

        let rewards = shape_rewards(&hit_log, 0.5, BOARD_SIZE, PLANE_SIZE);
        assert_eq!(rewards.len(), BOARD_SIZE);
        for reward in rewards {
            assert!(reward.is_finite());
        }
    }

    #[test]
    fn test_last_step_reward_is_its_own_delta() {
        let hit_log = vec![false, true];
        let discount = 0.5f32;
        let rewards = shape_rewards(&hit_log, discount, BOARD_SIZE, PLANE_SIZE);

        // reward_1 = discount^-1 * delta_1, and delta_1 folds the
        // baseline of the 35 remaining cells.
        let baseline = PLANE_SIZE as f32 / (BOARD_SIZE - 1) as f32;
        let expected = 1.0 - baseline;
        assert!((rewards[1] - expected).abs() < 1e-5);
    }
}
