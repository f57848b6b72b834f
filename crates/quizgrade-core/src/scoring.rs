//! Percentage and tier scoring.
//!
//! Percentages are rounded half-up in integer arithmetic, so 1/8 (12.5%)
//! becomes 13 and no float error can move a score across a tier boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse qualitative bucket derived from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Tier {
    /// Classify a percentage, highest threshold first.
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => Tier::Excellent,
            60..=79 => Tier::Good,
            40..=59 => Tier::Average,
            _ => Tier::Poor,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Excellent => write!(f, "excellent"),
            Tier::Good => write!(f, "good"),
            Tier::Average => write!(f, "average"),
            Tier::Poor => write!(f, "poor"),
        }
    }
}

/// Compute `round(100 * score / total)` with halves rounded up.
///
/// Returns 0 when `total` is 0; the engine rejects empty quizzes before
/// calling this. `score` is clamped to `total`.
pub fn percentage(score: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = score.min(total) as u64;
    let total = total as u64;
    // (100s/t + 1/2) floored == (200s + t) / 2t
    ((200 * score + total) / (2 * total)) as u8
}
