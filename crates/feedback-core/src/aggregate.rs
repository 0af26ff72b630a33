//! Sentiment and negative-issue distributions over a result set.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::ClassificationResult;

/// One label's share of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    /// Percentage of the distribution's population, one decimal place.
    pub percent: f64,
}

/// Distribution statistics for a batch.
///
/// Shares are ordered by count (descending), ties broken by label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    /// Number of classified reviews.
    pub total: usize,
    /// Number of negative reviews; the population of `issues`.
    pub negative_total: usize,
    pub sentiment: Vec<LabelShare>,
    /// Issue shares among negative reviews only.
    pub issues: Vec<LabelShare>,
}

impl DistributionStats {
    pub fn sentiment_percent(&self, label: &str) -> Option<f64> {
        find_percent(&self.sentiment, label)
    }

    pub fn issue_percent(&self, label: &str) -> Option<f64> {
        find_percent(&self.issues, label)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn find_percent(shares: &[LabelShare], label: &str) -> Option<f64> {
    shares.iter().find(|s| s.label == label).map(|s| s.percent)
}

/// Compute distributions over `results`. Pure and deterministic.
pub fn aggregate(results: &[ClassificationResult]) -> DistributionStats {
    let sentiment = shares(results.iter().map(|r| r.sentiment().label()), results.len());

    let negatives: Vec<&ClassificationResult> = results
        .iter()
        .filter(|r| r.sentiment().is_negative())
        .collect();
    let issues = shares(negatives.iter().map(|r| r.issue_label()), negatives.len());

    DistributionStats {
        total: results.len(),
        negative_total: negatives.len(),
        sentiment,
        issues,
    }
}

fn shares<'a>(labels: impl Iterator<Item = &'a str>, population: usize) -> Vec<LabelShare> {
    if population == 0 {
        return Vec::new();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut shares: Vec<LabelShare> = counts
        .into_iter()
        .map(|(label, count)| LabelShare {
            label: label.to_string(),
            count,
            percent: round_one_decimal(count as f64 * 100.0 / population as f64),
        })
        .collect();
    // BTreeMap order is by label, so a stable sort keeps ties alphabetical.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sentiment;

    fn result(sentiment: Sentiment, issue: Option<&str>) -> ClassificationResult {
        ClassificationResult::new("review", sentiment, issue.map(str::to_string))
    }

    #[test]
    fn empty_results_give_empty_distributions() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.sentiment.is_empty());
        assert!(stats.issues.is_empty());
        assert!(stats.is_empty());
    }

    #[test]
    fn issue_shares_use_negative_population() {
        let results = vec![
            result(Sentiment::Positive, None),
            result(Sentiment::Positive, None),
            result(Sentiment::Negative, Some("Staff Interaction")),
            result(Sentiment::Negative, Some("Billing/Pricing")),
            result(Sentiment::Negative, Some("Billing/Pricing")),
            result(Sentiment::Neutral, None),
        ];
        let stats = aggregate(&results);

        assert_eq!(stats.negative_total, 3);
        assert_eq!(stats.issue_percent("Billing/Pricing"), Some(66.7));
        assert_eq!(stats.issue_percent("Staff Interaction"), Some(33.3));
        assert_eq!(stats.sentiment_percent("Negative"), Some(50.0));
        assert_eq!(stats.issues[0].label, "Billing/Pricing");
        assert_eq!(stats.issues[0].count, 2);
    }

    #[test]
    fn no_negatives_means_no_issue_distribution() {
        let results = vec![
            result(Sentiment::Positive, None),
            result(Sentiment::Neutral, None),
        ];
        let stats = aggregate(&results);
        assert!(stats.issues.is_empty());
        assert_eq!(stats.negative_total, 0);
    }

    #[test]
    fn unrecognized_labels_are_grouped_by_raw_text() {
        let results = vec![
            result(Sentiment::Unrecognized("Mixed".to_string()), None),
            result(Sentiment::Unrecognized("Mixed".to_string()), None),
            result(Sentiment::Positive, None),
            result(Sentiment::Positive, None),
        ];
        let stats = aggregate(&results);

        // Equal counts: alphabetical order.
        assert_eq!(stats.sentiment[0].label, "Mixed");
        assert_eq!(stats.sentiment[1].label, "Positive");
        assert_eq!(stats.sentiment_percent("Mixed"), Some(50.0));
    }

    #[test]
    fn sentiment_percentages_sum_to_about_one_hundred() {
        let results = vec![
            result(Sentiment::Positive, None),
            result(Sentiment::Negative, Some("Other")),
            result(Sentiment::Neutral, None),
            result(Sentiment::Positive, None),
            result(Sentiment::Positive, None),
            result(Sentiment::Negative, Some("Other")),
            result(Sentiment::Neutral, None),
        ];
        let stats = aggregate(&results);
        let sum: f64 = stats.sentiment.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() < 0.2, "sum was {sum}");
    }

    #[test]
    fn aggregate_is_idempotent() {
        let results = vec![
            result(Sentiment::Negative, Some("Car Condition")),
            result(Sentiment::Positive, None),
        ];
        assert_eq!(aggregate(&results), aggregate(&results));
    }
}
