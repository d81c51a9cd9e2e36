//! Whole-percent progress tracking

/// Turns byte counts into a deduplicated stream of percentages
///
/// Values are only produced when the total size is known and positive.
/// Each value is produced at most once and values only ever increase;
/// the first value reported is therefore at least 1.
#[derive(Debug, Clone)]
pub struct PercentTracker {
    total: Option<u64>,
    received: u64,
    last: u8,
}

impl PercentTracker {
    #[must_use]
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|&total| total > 0),
            received: 0,
            last: 0,
        }
    }

    /// Bytes counted so far
    #[must_use]
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Count `bytes` more; returns the new percentage if it changed
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.received = self.received.saturating_add(bytes);
        let total = self.total?;

        let percent = (u128::from(self.received) * 100 / u128::from(total)).min(100);
        let percent = u8::try_from(percent).unwrap_or(100);

        if percent == self.last {
            return None;
        }
        self.last = percent;
        Some(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_total_reports_nothing() {
        let mut tracker = PercentTracker::new(None);
        assert_eq!(tracker.advance(8192), None);
        assert_eq!(tracker.received(), 8192);

        let mut tracker = PercentTracker::new(Some(0));
        assert_eq!(tracker.advance(10), None);
    }

    #[test]
    fn test_floor_and_dedupe() {
        let mut tracker = PercentTracker::new(Some(1000));
        assert_eq!(tracker.advance(5), None); // 0%
        assert_eq!(tracker.advance(5), Some(1));
        assert_eq!(tracker.advance(9), None); // still 1%
        assert_eq!(tracker.advance(481), Some(50));
        assert_eq!(tracker.advance(500), Some(100));
        assert_eq!(tracker.advance(0), None);
    }

    #[test]
    fn test_overrun_is_capped() {
        let mut tracker = PercentTracker::new(Some(10));
        assert_eq!(tracker.advance(50), Some(100));
        assert_eq!(tracker.advance(50), None);
    }

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let total = 100_003u64;
        let mut tracker = PercentTracker::new(Some(total));
        let mut seen = Vec::new();
        let mut remaining = total;
        while remaining > 0 {
            let step = remaining.min(777);
            remaining -= step;
            if let Some(percent) = tracker.advance(step) {
                seen.push(percent);
            }
        }
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(seen.last(), Some(&100));
    }
}
