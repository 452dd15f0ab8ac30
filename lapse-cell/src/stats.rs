//! Per-cell access counters.

use serde::Serialize;

/// Cell statistics.
///
/// Counters are observational only; they never influence expiry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CellStats {
    /// Values stored, explicitly or by a producer
    pub sets: u64,
    /// `get` and `get_or_*insert_with` calls that found a live value
    pub hits: u64,
    /// `get` and `get_or_*insert_with` calls that found the cell empty
    pub misses: u64,
    /// Values reclaimed lazily after their deadline passed
    pub expirations: u64,
    /// Explicit clears of a stored value
    pub clears: u64,
    /// Successful producer or `get_or_*insert_with` closure runs
    pub productions: u64,
    /// Failed producer or `get_or_try_insert_with` closure runs
    pub production_failures: u64,
}

impl CellStats {
    /// Fraction of reads answered without production, in `[0, 1]`.
    ///
    /// Returns `0.0` before the first `get`.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_ratio() {
        assert_eq!(CellStats::default().hit_ratio(), 0.0);

        let stats = CellStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_ratio(), 0.75);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CellStats {
            sets: 2,
            expirations: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["sets"], 2);
        assert_eq!(json["expirations"], 1);
        assert_eq!(json["productions"], 0);
    }
}
