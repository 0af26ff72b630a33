//! Report generation against the scripted inference fake.

use std::sync::Arc;

use chrono::NaiveDate;
use feedback_core::fakes::ScriptedInference;
use feedback_core::{aggregate, ClassificationResult, InferenceError, Sentiment};
use feedback_report::{ReportError, ReportGenerator};

fn sample_results() -> Vec<ClassificationResult> {
    vec![
        ClassificationResult::new("Clean car", Sentiment::Positive, None),
        ClassificationResult::new(
            "Charged twice",
            Sentiment::Negative,
            Some("Billing/Pricing".to_string()),
        ),
        ClassificationResult::new("Rude desk agent", Sentiment::Negative, Some("Staff Interaction".to_string())),
        ClassificationResult::new("It was fine", Sentiment::Neutral, None),
    ]
}

fn march_ninth() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

#[tokio::test]
async fn report_is_a_pdf_and_uses_one_narrative_call() {
    let fake = Arc::new(ScriptedInference::replying([
        "- Improve billing accuracy\n- Keep the fleet clean",
    ]));
    let generator = ReportGenerator::new(fake.clone());

    let results = sample_results();
    let stats = aggregate(&results);
    let report = generator
        .generate_on(&results, &stats, march_ninth())
        .await
        .unwrap();

    assert!(report.as_bytes().starts_with(b"%PDF"));
    assert_eq!(fake.calls(), 1);

    let prompt = &fake.prompts()[0];
    assert!(prompt.contains("- Total Reviews: 4"));
    assert!(prompt.contains("- Sentiment Distribution: Negative: 50.0%, Neutral: 25.0%, Positive: 25.0%"));
    assert!(prompt.contains("- Breakdown of Negative Issues: Billing/Pricing: 50.0%, Staff Interaction: 50.0%"));
    assert!(prompt.trim_end().ends_with("Analysis:"));
}

#[tokio::test]
async fn empty_batch_still_produces_a_document() {
    let fake = Arc::new(ScriptedInference::replying(["No data to summarize."]));
    let generator = ReportGenerator::new(fake.clone());

    let stats = aggregate(&[]);
    let report = generator.generate_on(&[], &stats, march_ninth()).await.unwrap();

    assert!(report.as_bytes().starts_with(b"%PDF"));
    assert!(fake.prompts()[0].contains("- Sentiment Distribution: None"));
}

#[tokio::test]
async fn narrative_failure_aborts_the_report() {
    let fake = Arc::new(ScriptedInference::new());
    fake.push_err(InferenceError::RateLimited("quota exceeded".to_string()));
    let generator = ReportGenerator::new(fake);

    let results = sample_results();
    let stats = aggregate(&results);
    let err = generator
        .generate_on(&results, &stats, march_ninth())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::Narrative(InferenceError::RateLimited(_))
    ));
}

#[tokio::test]
async fn non_latin1_narrative_still_renders() {
    let fake = Arc::new(ScriptedInference::replying([
        "• Résumé of issues ✓\n• 顧客満足度",
    ]));
    let generator = ReportGenerator::new(fake);

    let results = sample_results();
    let stats = aggregate(&results);
    let report = generator.generate(&results, &stats).await.unwrap();

    assert!(!report.is_empty());
}

#[tokio::test]
async fn report_can_be_written_to_disk() -> anyhow::Result<()> {
    let fake = Arc::new(ScriptedInference::replying(["Summary"]));
    let generator = ReportGenerator::new(fake);
    let results = sample_results();
    let stats = aggregate(&results);
    let report = generator.generate_on(&results, &stats, march_ninth()).await?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("feedback_analysis_report.pdf");
    std::fs::write(&path, report.as_bytes())?;

    let written = std::fs::read(&path)?;
    assert_eq!(written.len(), report.len());
    assert!(written.starts_with(b"%PDF"));
    Ok(())
}
