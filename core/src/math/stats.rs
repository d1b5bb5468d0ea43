/// Streaming arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the pushed values, zero when nothing was pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mean_yields_zero() {
        assert_eq!(RunningMean::default().mean(), 0.0);
    }

    #[test]
    fn mean_of_values() {
        let mut mean = RunningMean::default();
        for value in [0.5, 0.7, 0.9] {
            mean.push(value);
        }
        assert_eq!(mean.count(), 3);
        assert!((mean.mean() - 0.7).abs() < 1e-12);
    }
}
