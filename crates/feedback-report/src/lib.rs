//! Feedback Report
//!
//! Renders a batch's classification results into a PDF summary:
//! - `narrative`: statistics block for the summary prompt, Latin-1 cleanup
//! - `chart`: pie and bar chart geometry
//! - `layout`: flow layout into per-page drawing operations
//! - `pdf`: PDF encoding with `printpdf`

pub mod chart;
pub mod error;
pub mod layout;
pub mod narrative;
pub mod pdf;

use std::sync::Arc;

use chrono::NaiveDate;
use feedback_core::{ClassificationResult, DistributionStats, InferenceService, PromptBuilder};
use tracing::{debug, info};

pub use error::{ReportError, Result};
pub use layout::REPORT_TITLE;
pub use narrative::{sanitize_latin1, stats_text};

pub const SECTION_SUMMARY: &str = "1. Overall Performance Summary";
pub const SECTION_NEGATIVE: &str = "2. Breakdown of Negative Feedback";
pub const SECTION_INSIGHTS: &str = "3. AI-Generated Actionable Insights";
pub const SENTIMENT_CHART_TITLE: &str = "Sentiment Distribution";
pub const ISSUE_CHART_TITLE: &str = "Top Issues in Negative Reviews";
pub const ISSUE_AXIS_LABEL: &str = "Number of Mentions";
pub const NO_REVIEWS_TEXT: &str = "No reviews were analyzed.";
pub const NO_NEGATIVES_TEXT: &str = "No negative reviews were found in this batch.";

/// A finished PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBytes(Vec<u8>);

impl ReportBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for ReportBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Everything that goes on the page, with the narrative already generated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContent<'a> {
    pub total_reviews: usize,
    pub generated_on: NaiveDate,
    pub stats: &'a DistributionStats,
    pub narrative: &'a str,
}

/// Builds the PDF summary report for a completed batch.
///
/// Makes exactly one inference call, for the narrative section. Any failure
/// aborts the report.
#[derive(Clone)]
pub struct ReportGenerator {
    inference: Arc<dyn InferenceService>,
    prompts: PromptBuilder,
}

impl ReportGenerator {
    pub fn new(inference: Arc<dyn InferenceService>) -> Self {
        Self {
            inference,
            prompts: PromptBuilder::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Generate the report dated today (local time).
    pub async fn generate(
        &self,
        results: &[ClassificationResult],
        stats: &DistributionStats,
    ) -> Result<ReportBytes> {
        self.generate_on(results, stats, chrono::Local::now().date_naive())
            .await
    }

    /// Generate the report with a fixed generation date.
    pub async fn generate_on(
        &self,
        results: &[ClassificationResult],
        stats: &DistributionStats,
        date: NaiveDate,
    ) -> Result<ReportBytes> {
        let narrative = self.narrative(results.len(), stats).await?;
        let content = ReportContent {
            total_reviews: results.len(),
            generated_on: date,
            stats,
            narrative: &narrative,
        };
        let bytes = render(&content)?;
        info!(
            reviews = results.len(),
            bytes = bytes.len(),
            "report generated"
        );
        Ok(bytes)
    }

    /// Ask the model for the management summary of `stats`.
    pub async fn narrative(&self, total: usize, stats: &DistributionStats) -> Result<String> {
        let prompt = self.prompts.summary(&stats_text(total, stats))?;
        let text = self.inference.generate_text(&prompt).await?;
        debug!(chars = text.len(), "narrative generated");
        Ok(text)
    }
}

/// Lay out and encode the report.
pub fn render(content: &ReportContent<'_>) -> Result<ReportBytes> {
    let pages = layout_report(content);
    let bytes = pdf::render_pdf(REPORT_TITLE, &pages)?;
    Ok(ReportBytes(bytes))
}

/// Lay out the three report sections.
pub fn layout_report(content: &ReportContent<'_>) -> Vec<layout::PageLayout> {
    let mut page = layout::Layout::new();

    page.heading(SECTION_SUMMARY);
    page.paragraph(
        &format!(
            "Total reviews analyzed: {}\nReport generated on: {}",
            content.total_reviews,
            content.generated_on.format("%Y-%m-%d")
        ),
        11.0,
        5.0,
    );
    page.gap(5.0);
    let slices = chart::pie_slices(&content.stats.sentiment);
    if slices.is_empty() {
        page.paragraph(NO_REVIEWS_TEXT, 11.0, 10.0);
    } else {
        page.pie_chart(SENTIMENT_CHART_TITLE, &slices);
    }
    page.gap(5.0);

    page.heading(SECTION_NEGATIVE);
    let rows = chart::bar_rows(&content.stats.issues);
    if rows.is_empty() {
        page.paragraph(NO_NEGATIVES_TEXT, 11.0, 10.0);
    } else {
        page.bar_chart(ISSUE_CHART_TITLE, ISSUE_AXIS_LABEL, &rows);
    }
    page.gap(5.0);

    page.heading(SECTION_INSIGHTS);
    page.paragraph(&sanitize_latin1(content.narrative), 11.0, 6.0);

    page.into_pages()
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_core::{aggregate, Sentiment};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn all_text(pages: &[layout::PageLayout]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn sections_appear_in_order() {
        let results = vec![
            ClassificationResult::new("a", Sentiment::Positive, None),
            ClassificationResult::new("b", Sentiment::Negative, Some("Car Condition".into())),
        ];
        let stats = aggregate(&results);
        let content = ReportContent {
            total_reviews: 2,
            generated_on: date(),
            stats: &stats,
            narrative: "- Fix the cars",
        };
        let texts = all_text(&layout_report(&content));

        let position = |needle: &str| {
            texts
                .iter()
                .position(|t| t == needle)
                .unwrap_or_else(|| panic!("missing {needle}"))
        };
        assert!(position(SECTION_SUMMARY) < position(SENTIMENT_CHART_TITLE));
        assert!(position(SENTIMENT_CHART_TITLE) < position(SECTION_NEGATIVE));
        assert!(position(SECTION_NEGATIVE) < position(ISSUE_CHART_TITLE));
        assert!(position(ISSUE_CHART_TITLE) < position(SECTION_INSIGHTS));
        assert!(position(SECTION_INSIGHTS) < position("- Fix the cars"));
        assert!(texts.contains(&"Total reviews analyzed: 2".to_string()));
        assert!(texts.contains(&"Report generated on: 2024-03-09".to_string()));
        assert!(texts.contains(&"50.0%".to_string()));
    }

    #[test]
    fn no_negatives_shows_placeholder_text() {
        let results = vec![ClassificationResult::new("a", Sentiment::Positive, None)];
        let stats = aggregate(&results);
        let content = ReportContent {
            total_reviews: 1,
            generated_on: date(),
            stats: &stats,
            narrative: "",
        };
        let texts = all_text(&layout_report(&content));

        assert!(texts.contains(&NO_NEGATIVES_TEXT.to_string()));
        assert!(!texts.contains(&ISSUE_CHART_TITLE.to_string()));
    }

    #[test]
    fn narrative_is_sanitized() {
        let stats = aggregate(&[]);
        let content = ReportContent {
            total_reviews: 0,
            generated_on: date(),
            stats: &stats,
            narrative: "Keep smiling 😀",
        };
        let texts = all_text(&layout_report(&content));

        assert!(texts.contains(&"Keep smiling ?".to_string()));
        assert!(texts.contains(&NO_REVIEWS_TEXT.to_string()));
    }
}
