// ============================================================
// Layer 6 — Batch Files
// ============================================================
// Input and output files of the `batch` command:
//
//   read_tweets   *.csv → the `text` column (header required)
//                 other → one tweet per non-blank line
//
//   write_results one CSV row per prediction:
//     text, sentiment, sentiment_label, confidence,
//     prob_positive, prob_negative, model_type
//
// Blank tweets are skipped on read; the API would drop them
// anyway and they count against the 100-tweet limit.
//
// Reference: csv crate docs (ReaderBuilder, Writer::serialize)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;

use crate::domain::wire::PredictionOutput;

/// Column holding the tweets in an imported CSV
pub const TEXT_COLUMN: &str = "text";

#[derive(Serialize)]
struct ResultRow<'a> {
    text:            &'a str,
    sentiment:       &'a str,
    sentiment_label: &'a str,
    confidence:      f64,
    prob_positive:   f64,
    prob_negative:   f64,
    model_type:      &'a str,
}

impl<'a> From<&'a PredictionOutput> for ResultRow<'a> {
    fn from(p: &'a PredictionOutput) -> Self {
        ResultRow {
            text:            &p.text,
            sentiment:       &p.sentiment,
            sentiment_label: &p.sentiment_label,
            confidence:      p.confidence,
            prob_positive:   p.probabilities.positive,
            prob_negative:   p.probabilities.negative,
            model_type:      &p.model_type,
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Tweets from a CSV `text` column or a plain text file.
pub fn read_tweets(path: &Path) -> Result<Vec<String>> {
    let tweets = if is_csv(path) {
        read_csv_column(path)?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    };
    tracing::info!("Read {} tweets from '{}'", tweets.len(), path.display());
    Ok(tweets)
}

fn read_csv_column(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    let column = reader
        .headers()
        .with_context(|| format!("Cannot read the header of '{}'", path.display()))?
        .iter()
        .position(|h| h == TEXT_COLUMN);
    let Some(column) = column else {
        bail!("'{}' has no '{TEXT_COLUMN}' column", path.display());
    };

    let mut tweets = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad CSV row {} in '{}'", row + 1, path.display()))?;
        match record.get(column) {
            Some(text) if !text.is_empty() => tweets.push(text.to_string()),
            _ => {}
        }
    }
    Ok(tweets)
}

/// `sentiment_analysis_20240101_120000.csv`
pub fn timestamped_output(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("sentiment_analysis_{}.csv", now.format("%Y%m%d_%H%M%S")))
}

pub fn write_results(path: &Path, predictions: &[PredictionOutput]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;

    for p in predictions {
        writer.serialize(ResultRow::from(p))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} predictions to '{}'", predictions.len(), path.display());
    Ok(())
}
