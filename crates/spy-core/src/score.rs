//! Score rescaling
//!
//! Rescales raw per-mission averages to a percentage of the mission's
//! three-stars score.

use std::collections::BTreeMap;
use tracing::debug;

/// Percentage of a perfect score
pub const FULL_MARKS: f64 = 100.0;

/// Score normalizer backed by one catalog category (mission -> maximum score)
#[derive(Debug, Clone, Copy)]
pub struct ScoreNormalizer<'a> {
    maxima: &'a BTreeMap<String, u32>,
}

impl<'a> ScoreNormalizer<'a> {
    /// Create a score normalizer over a mission -> maximum score mapping
    ///
    /// # Example
    /// ```
    /// use spy_core::ScoreNormalizer;
    /// use std::collections::BTreeMap;
    ///
    /// let maxima = BTreeMap::from([("mission01".to_string(), 100)]);
    /// let normalizer = ScoreNormalizer::new(&maxima);
    /// assert_eq!(normalizer.normalize("mission01", Some(90.0)), 90.0);
    /// ```
    pub fn new(maxima: &'a BTreeMap<String, u32>) -> Self {
        Self { maxima }
    }

    /// Normalize the raw average of one mission
    ///
    /// Missions missing from the catalog keep their raw average.
    pub fn normalize(&self, level: &str, raw_average: Option<f64>) -> f64 {
        let max = self.maxima.get(level).copied();
        if max.map_or(true, |max| max == 0) {
            debug!(mission_level = level, "No maximum score for mission, keeping raw average");
        }
        Self::normalize_with_max(raw_average, max)
    }

    /// Normalize every mission of an average-score map
    pub fn rescale_all(&self, averages: &BTreeMap<String, Option<f64>>) -> BTreeMap<String, f64> {
        averages
            .iter()
            .map(|(level, average)| (level.clone(), self.normalize(level, *average)))
            .collect()
    }

    /// Normalize against an explicit maximum
    ///
    /// - no average: 0
    /// - no usable maximum: the raw average, unscaled
    /// - above the maximum: saturates at 100
    /// - below zero: clamps to 0
    /// - otherwise: `average / max * 100`, rounded to one decimal
    pub fn normalize_with_max(raw_average: Option<f64>, max: Option<u32>) -> f64 {
        let Some(average) = raw_average else {
            return 0.0;
        };

        match max {
            Some(max) if max > 0 => {
                let max = f64::from(max);
                if average > max {
                    FULL_MARKS
                } else if average < 0.0 {
                    0.0
                } else {
                    round_one_decimal(average / max * FULL_MARKS)
                }
            }
            _ => average,
        }
    }
}

/// Round on the exact decimal expansion of `value`, so 0.15 (stored just
/// below it) gives 0.1
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
