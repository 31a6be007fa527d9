//! Percentages, completion tiers and progress.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Round `100 * correct / total` to the nearest integer, halves rounding up.
///
/// Computed in integers so `1/8` lands on 13 rather than drifting with float
/// error. Returns 0 when `total` is 0.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u32
}

/// Fraction of the challenge reached when page `index` (0-based) is shown.
pub fn progress_fraction(index: usize, page_count: usize) -> f64 {
    if page_count == 0 {
        return 0.0;
    }
    ((index + 1) as f64 / page_count as f64).min(1.0)
}

/// Qualitative performance bucket derived from the final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Tier {
    /// Inclusive lower bounds: 90, 70, 50.
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 90 {
            Tier::Excellent
        } else if percentage >= 70 {
            Tier::Good
        } else if percentage >= 50 {
            Tier::Fair
        } else {
            Tier::NeedsImprovement
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Excellent => "Outstanding! You've mastered the concepts!",
            Tier::Good => "Great job! You have a solid understanding of the material.",
            Tier::Fair => "Good effort! Consider reviewing the concepts.",
            Tier::NeedsImprovement => "Keep learning! Practice makes perfect.",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Excellent => write!(f, "excellent"),
            Tier::Good => write!(f, "good"),
            Tier::Fair => write!(f, "fair"),
            Tier::NeedsImprovement => write!(f, "needs-improvement"),
        }
    }
}

/// Final result of a run. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: Tier,
    pub message: String,
}

impl CompletionSummary {
    pub fn compute(correct: usize, total: usize) -> Self {
        let percentage = percentage(correct, total);
        let tier = Tier::from_percentage(percentage);
        Self {
            correct,
            total,
            percentage,
            tier,
            message: tier.message().to_string(),
        }
    }
}
