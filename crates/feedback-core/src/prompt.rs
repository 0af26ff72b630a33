//! Few-shot prompt templates and placeholder rendering.

use crate::error::TemplateError;

/// Placeholder replaced with the review text.
pub const REVIEW_PLACEHOLDER: &str = "{review_text}";

/// Placeholder replaced with the formatted statistics block.
pub const STATS_PLACEHOLDER: &str = "{stats_text}";

/// Closed set of issue categories suggested to the model.
///
/// The model's answer is not validated against this list.
pub const ISSUE_CATEGORIES: [&str; 8] = [
    "Car Condition",
    "Staff Interaction",
    "Pickup/Dropoff Experience",
    "Billing/Pricing",
    "Booking Process",
    "Location/Facilities",
    "Add-ons/Extras",
    "Other",
];

pub const SENTIMENT_TEMPLATE: &str = "
Classify the sentiment of the car rental review as Positive, Negative, or Neutral.
Review: {review_text}
Sentiment:
";

pub const ISSUE_TEMPLATE: &str = "
Identify the main issue from the review. Choose from: Car Condition, Staff Interaction, Pickup/Dropoff Experience, Billing/Pricing, Booking Process, Location/Facilities, Add-ons/Extras, Other.

Review: The online booking was easy but they charged me for extra insurance I didn't ask for.
Topic: Billing/Pricing

Review: The agent at the counter was rude and unhelpful.
Topic: Staff Interaction

Review: The car's tires were worn out and the AC was not working.
Topic: Car Condition

Review: I ordered a child seat, but it wasn't in the car when I arrived.
Topic: Add-ons/Extras

Review: The pickup took over an hour, the lines were huge.
Topic: Pickup/Dropoff Experience

Review: {review_text}
Topic:
";

pub const SUMMARY_TEMPLATE: &str = "
You are an expert operations analyst for a car rental company.
Based on the following summary statistics from customer reviews, write a brief, professional, and actionable summary for management.
Focus on the top 2-3 most critical areas for improvement and mention one key strength to maintain.
Use bullet points for clarity.

Statistics:
{stats_text}

Analysis:
";

/// Substitute `value` for the single `placeholder` in `template`.
///
/// The value is inserted verbatim; placeholder text inside the value is
/// not expanded again.
pub fn render(
    template: &str,
    placeholder: &'static str,
    value: &str,
) -> Result<String, TemplateError> {
    let count = template.matches(placeholder).count();
    if count > 1 {
        return Err(TemplateError::AmbiguousPlaceholder { placeholder, count });
    }

    let (head, tail) = template
        .split_once(placeholder)
        .ok_or(TemplateError::MissingPlaceholder { placeholder })?;

    let mut out = String::with_capacity(head.len() + value.len() + tail.len());
    out.push_str(head);
    out.push_str(value);
    out.push_str(tail);
    Ok(out)
}

/// Renders the sentiment, issue, and summary prompts.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    sentiment: String,
    issue: String,
    summary: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            sentiment: SENTIMENT_TEMPLATE.to_string(),
            issue: ISSUE_TEMPLATE.to_string(),
            summary: SUMMARY_TEMPLATE.to_string(),
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sentiment template.
    pub fn with_sentiment_template(mut self, template: impl Into<String>) -> Self {
        self.sentiment = template.into();
        self
    }

    /// Replace the issue template.
    pub fn with_issue_template(mut self, template: impl Into<String>) -> Self {
        self.issue = template.into();
        self
    }

    /// Replace the summary template.
    pub fn with_summary_template(mut self, template: impl Into<String>) -> Self {
        self.summary = template.into();
        self
    }

    pub fn sentiment(&self, review: &str) -> Result<String, TemplateError> {
        render(&self.sentiment, REVIEW_PLACEHOLDER, review)
    }

    pub fn issue(&self, review: &str) -> Result<String, TemplateError> {
        render(&self.issue, REVIEW_PLACEHOLDER, review)
    }

    pub fn summary(&self, stats_text: &str) -> Result<String, TemplateError> {
        render(&self.summary, STATS_PLACEHOLDER, stats_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_prompt_embeds_review_verbatim() {
        let prompt = PromptBuilder::new()
            .sentiment("Car smelled of smoke & the \"AC\" was {broken}")
            .unwrap();

        assert!(prompt.contains("Review: Car smelled of smoke & the \"AC\" was {broken}\n"));
        assert!(prompt.ends_with("Sentiment:\n"));
        assert!(!prompt.contains(REVIEW_PLACEHOLDER));
    }

    #[test]
    fn issue_prompt_keeps_few_shot_examples() {
        let prompt = PromptBuilder::new().issue("No child seat").unwrap();

        assert!(prompt.contains("Topic: Billing/Pricing"));
        assert!(prompt.contains("Topic: Add-ons/Extras"));
        assert!(prompt.ends_with("Review: No child seat\nTopic:\n"));
    }

    #[test]
    fn issue_template_lists_every_category() {
        for category in ISSUE_CATEGORIES {
            assert!(ISSUE_TEMPLATE.contains(category), "missing {category}");
        }
    }

    #[test]
    fn value_containing_placeholder_is_not_expanded() {
        let out = render("A {review_text} B", REVIEW_PLACEHOLDER, "{review_text}").unwrap();
        assert_eq!(out, "A {review_text} B");
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        let err = PromptBuilder::new()
            .with_sentiment_template("Classify this review.")
            .sentiment("fine")
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholder {
                placeholder: REVIEW_PLACEHOLDER
            }
        );
    }

    #[test]
    fn repeated_placeholder_is_rejected() {
        let err = render("{stats_text} {stats_text}", STATS_PLACEHOLDER, "x").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::AmbiguousPlaceholder { count: 2, .. }
        ));
    }

    #[test]
    fn summary_prompt_embeds_stats() {
        let prompt = PromptBuilder::new().summary("- Total Reviews: 3").unwrap();
        assert!(prompt.contains("Statistics:\n- Total Reviews: 3\n\nAnalysis:\n"));
    }
}
