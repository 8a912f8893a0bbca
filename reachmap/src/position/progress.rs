use serde::{Deserialize, Serialize};

/// the highest percentage shown before the search has actually finished.
pub const MAX_ESTIMATED_PERCENT: f64 = 99.0;

/// the marker never fades below this opacity.
pub const MIN_MARKER_OPACITY: f64 = 0.5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ProgressDisplay {
    pub percent: f64,
    /// set when the estimate ran past its maximum and the bar shows activity instead
    pub striped: bool,
}

impl ProgressDisplay {
    /// progress shown for an explicit percentage.
    pub fn exact(percent: f64) -> ProgressDisplay {
        ProgressDisplay {
            percent,
            striped: false,
        }
    }

    /// estimates progress from the iteration counter of a running search.
    /// estimates are capped at 99%; only a finished search shows 100%.
    pub fn estimate(progress_count: u64, estimated_max: u64) -> ProgressDisplay {
        let max = estimated_max.max(1) as f64;
        let percent = progress_count as f64 / max * 100.0;
        if percent > MAX_ESTIMATED_PERCENT {
            ProgressDisplay {
                percent: MAX_ESTIMATED_PERCENT,
                striped: true,
            }
        } else {
            ProgressDisplay::exact(percent)
        }
    }

    /// marker opacity scales with progress.
    pub fn marker_opacity(&self) -> f64 {
        (self.percent / 100.0).max(MIN_MARKER_OPACITY)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_estimate_is_linear_below_cap() {
        let p = ProgressDisplay::estimate(25_000, 100_000);
        assert_eq!(p.percent, 25.0);
        assert!(!p.striped);
        assert_eq!(p.marker_opacity(), 0.5);
        let p = ProgressDisplay::estimate(80_000, 100_000);
        assert!((p.marker_opacity() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_never_reaches_100() {
        for count in [99_001, 100_000, 150_000, u64::MAX] {
            let p = ProgressDisplay::estimate(count, 100_000);
            assert_eq!(p.percent, 99.0);
            assert!(p.striped);
        }
    }

    #[test]
    fn test_exact_shows_100() {
        let p = ProgressDisplay::exact(100.0);
        assert_eq!(p.percent, 100.0);
        assert_eq!(p.marker_opacity(), 1.0);
    }
}
