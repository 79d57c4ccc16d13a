//! Training progress tracking

use std::collections::VecDeque;

/// Moving average over a fixed window.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f32>,
    window_size: usize,
    sum: f32,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() >= self.window_size {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tracks episode lengths across the run; the windowed average is the
/// training progress metric.
#[derive(Debug)]
pub struct TrainingMetrics {
    episode_lengths: MovingAverage,
    episodes: usize,
}

impl TrainingMetrics {
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_lengths: MovingAverage::new(window_size),
            episodes: 0,
        }
    }

    pub fn record_episode(&mut self, length: usize) {
        self.episode_lengths.push(length as f32);
        self.episodes += 1;
    }

    /// Average episode length over the sliding window. Shorter is
    /// better: fewer guesses to destroy the target.
    pub fn average_length(&self) -> f32 {
        self.episode_lengths.average()
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let mut avg = MovingAverage::new(3);

        avg.push(1.0);
        assert!((avg.average() - 1.0).abs() < 1e-6);

        avg.push(2.0);
        assert!((avg.average() - 1.5).abs() < 1e-6);

        avg.push(3.0);
        assert!((avg.average() - 2.0).abs() < 1e-6);

        avg.push(4.0); // Pushes out 1.0
        assert!((avg.average() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_training_metrics_window() {
        let mut metrics = TrainingMetrics::new(2);
        metrics.record_episode(10);
        metrics.record_episode(20);
        metrics.record_episode(30);

        assert_eq!(metrics.episodes(), 3);
        assert!((metrics.average_length() - 25.0).abs() < 1e-6);
    }
}
