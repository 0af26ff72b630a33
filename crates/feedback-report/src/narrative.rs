//! Statistics block for the summary prompt and text cleanup for the PDF.

use feedback_core::{DistributionStats, LabelShare};

/// Render the statistics block substituted into the summary prompt.
///
/// ```text
/// - Total Reviews: 3
/// - Sentiment Distribution: Positive: 33.3%, Negative: 33.3%, Neutral: 33.3%
/// - Breakdown of Negative Issues: Car Condition: 100.0%
/// ```
///
/// Empty distributions render as `None`.
pub fn stats_text(total: usize, stats: &DistributionStats) -> String {
    format!(
        "- Total Reviews: {total}\n\
         - Sentiment Distribution: {}\n\
         - Breakdown of Negative Issues: {}",
        shares_text(&stats.sentiment),
        shares_text(&stats.issues),
    )
}

fn shares_text(shares: &[LabelShare]) -> String {
    if shares.is_empty() {
        return "None".to_string();
    }
    shares
        .iter()
        .map(|s| format!("{}: {:.1}%", s.label, s.percent))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Replace every character the PDF's built-in fonts cannot encode with `?`.
///
/// Keeps Latin-1 and newlines; other control characters are replaced too.
/// `\r\n` is folded to `\n` first.
pub fn sanitize_latin1(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|c| {
            let code = c as u32;
            if c == '\n' || (code <= 0xFF && !c.is_control()) {
                c
            } else {
                '?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_core::{aggregate, ClassificationResult, Sentiment};

    #[test]
    fn stats_block_lists_both_distributions() {
        let results = vec![
            ClassificationResult::new("a", Sentiment::Positive, None),
            ClassificationResult::new("b", Sentiment::Negative, Some("Car Condition".into())),
            ClassificationResult::new("c", Sentiment::Neutral, None),
        ];
        let stats = aggregate(&results);

        assert_eq!(
            stats_text(results.len(), &stats),
            "- Total Reviews: 3\n\
             - Sentiment Distribution: Negative: 33.3%, Neutral: 33.3%, Positive: 33.3%\n\
             - Breakdown of Negative Issues: Car Condition: 100.0%"
        );
    }

    #[test]
    fn no_negatives_renders_none() {
        let results = vec![ClassificationResult::new("a", Sentiment::Positive, None)];
        let text = stats_text(1, &aggregate(&results));
        assert!(text.ends_with("- Breakdown of Negative Issues: None"));
        assert!(text.contains("- Sentiment Distribution: Positive: 100.0%"));
    }

    #[test]
    fn empty_batch_renders_none_twice() {
        let text = stats_text(0, &aggregate(&[]));
        assert_eq!(
            text,
            "- Total Reviews: 0\n- Sentiment Distribution: None\n- Breakdown of Negative Issues: None"
        );
    }

    #[test]
    fn sanitizer_keeps_latin1_and_newlines() {
        assert_eq!(
            sanitize_latin1("Café staff\n- naïve pricing"),
            "Café staff\n- naïve pricing"
        );
    }

    #[test]
    fn sanitizer_replaces_wide_and_control_chars() {
        assert_eq!(sanitize_latin1("Great 👍 “service”"), "Great ? ?service?");
        assert_eq!(sanitize_latin1("tab\there\r\nnext"), "tab?here\nnext");
    }
}
