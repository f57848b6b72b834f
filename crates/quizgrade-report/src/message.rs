//! Result messages and tier styling.

use quizgrade_core::scoring::Tier;

/// Encouragement shown under the score, chosen by percentage band.
pub fn result_message(percentage: u8) -> &'static str {
    match percentage {
        90.. => "Excellent! You have mastered this topic!",
        80..=89 => "Very good! Keep it up!",
        60..=79 => "Good! A little review would help.",
        40..=59 => "More practice is needed.",
        _ => "Review the material and try again!",
    }
}

/// CSS class for the result box.
pub fn tier_class(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "result-excellent",
        Tier::Good => "result-good",
        Tier::Average => "result-average",
        Tier::Poor => "result-poor",
    }
}

pub fn tier_icon(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "🎉",
        Tier::Good => "👍",
        Tier::Average => "📚",
        Tier::Poor => "😕",
    }
}

/// `Score: 4/5 (80%)`
pub fn score_line(score: usize, total: usize, percentage: u8) -> String {
    format!("Score: {score}/{total} ({percentage}%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_bands() {
        assert_eq!(result_message(100), result_message(90));
        assert_ne!(result_message(90), result_message(89));
        assert_eq!(result_message(80), "Very good! Keep it up!");
        assert_eq!(result_message(60), "Good! A little review would help.");
        assert_eq!(result_message(59), "More practice is needed.");
        assert_eq!(result_message(40), "More practice is needed.");
        assert_eq!(result_message(39), "Review the material and try again!");
        assert_eq!(result_message(0), "Review the material and try again!");
    }

    #[test]
    fn tier_styles() {
        assert_eq!(tier_class(Tier::Excellent), "result-excellent");
        assert_eq!(tier_class(Tier::Poor), "result-poor");
        assert_eq!(tier_icon(Tier::Good), "👍");
    }

    #[test]
    fn score_line_format() {
        assert_eq!(score_line(4, 5, 80), "Score: 4/5 (80%)");
    }
}
