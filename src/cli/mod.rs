// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application);
// the HTTP boundary itself lives next door in api/.
//
// Async work (the server, the API client) runs on an actix
// System started here, so main() stays synchronous.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{BatchArgs, Commands, PredictArgs, ReviewArgs, ServeArgs, StatusArgs};

use crate::application::prediction_service::PredictionService;
use crate::application::review_use_case::{FeedbackOutcome, ReviewUseCase};
use crate::domain::error::FeedbackError;
use crate::domain::wire::PredictionOutput;
use crate::infra::analytics::{PosthogConfig, PosthogSink};
use crate::infra::api_client::ApiClient;
use crate::infra::batch_file;

#[derive(Parser, Debug)]
#[command(
    name = "tweet-sentiment",
    version,
    about = "Serve pre-trained tweet sentiment classifiers and collect prediction feedback."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args)   => run_serve(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Status(args)  => run_status(args),
            Commands::Review(args)  => run_review(args),
            Commands::Batch(args)   => run_batch(args),
        }
    }
}

/// Handles `serve`. A model that fails to load is logged and
/// the API still starts, answering 503 until restarted.
fn run_serve(args: ServeArgs) -> Result<()> {
    let mut service: PredictionService = PredictionService::new(args.model.into());
    if let Err(e) = service.load() {
        tracing::warn!("Serving without a model: {e}");
    }

    actix_web::rt::System::new()
        .block_on(crate::api::run_server(service, &args.host, args.port, args.workers))
        .with_context(|| format!("HTTP server on {}:{} failed", args.host, args.port))
}

/// Handles `predict`. Here a load failure is fatal.
fn run_predict(args: PredictArgs) -> Result<()> {
    let mut service: PredictionService = PredictionService::new(args.model.into());
    service.load().context("Cannot load model")?;

    let output = service.predict_one(&args.text)?;
    print_prediction(&output);
    Ok(())
}

fn review_use_case(api_url: String, analytics: PosthogConfig) -> Result<ReviewUseCase> {
    let client = ApiClient::new(api_url)?;
    let sink   = PosthogSink::new(analytics)?;
    Ok(ReviewUseCase::new(client, Box::new(sink)))
}

/// Handles `status`.
fn run_status(args: StatusArgs) -> Result<()> {
    let use_case = review_use_case(args.client.api_url, args.analytics.into())?;
    let health = actix_web::rt::System::new().block_on(use_case.status())?;

    println!("API:        {:?}", health.status);
    println!("Model:      {} (loaded: {})", health.model_type, health.model_loaded);
    println!(
        "Feedback:   {}",
        if use_case.feedback_configured() { "PostHog configured" } else { "disabled (set POSTHOG_API_KEY)" }
    );
    Ok(())
}

/// Handles `review`.
fn run_review(args: ReviewArgs) -> Result<()> {
    let use_case = review_use_case(args.client.api_url, args.analytics.into())?;
    let review = actix_web::rt::System::new().block_on(use_case.review(&args.text, args.actual))?;

    print_prediction(&review.prediction);
    match review.feedback {
        FeedbackOutcome::NotRequested => {
            println!("\nWrong prediction? Re-run with --actual <positive|negative>.");
        }
        FeedbackOutcome::Confirmed => println!("\nPrediction confirmed, no feedback sent."),
        FeedbackOutcome::Sent      => println!("\nThanks! Feedback sent."),
        FeedbackOutcome::Failed(FeedbackError::NotConfigured) => {
            println!("\nFeedback not sent: analytics is not configured (set POSTHOG_API_KEY).");
        }
        FeedbackOutcome::Failed(e) => println!("\nFeedback not sent: {e}"),
    }
    Ok(())
}

/// Handles `batch`.
fn run_batch(args: BatchArgs) -> Result<()> {
    let tweets = batch_file::read_tweets(&args.file)?;
    if tweets.is_empty() {
        anyhow::bail!("'{}' contains no tweets", args.file.display());
    }

    let use_case = review_use_case(args.client.api_url, PosthogConfig::default())?;
    let summary = actix_web::rt::System::new().block_on(use_case.batch(&tweets))?;

    for p in &summary.output.predictions {
        println!("[{:<7} {:>5.1}%] {}", p.sentiment_label, p.confidence * 100.0, p.text);
    }
    println!(
        "\n{} tweets: {} positive, {} negative, mean confidence {:.1}% ({})",
        summary.output.count,
        summary.positive,
        summary.negative,
        summary.mean_confidence * 100.0,
        summary.output.model_type
    );

    if let Some(output) = args.output {
        let path = output.unwrap_or_else(|| batch_file::timestamped_output(chrono::Local::now()));
        batch_file::write_results(&path, &summary.output.predictions)?;
        println!("Results written to {}", path.display());
    }
    Ok(())
}

fn print_prediction(p: &PredictionOutput) {
    println!("\nText:       {}", p.text);
    println!("Sentiment:  {} ({})", p.sentiment_label, p.sentiment);
    println!("Confidence: {:.1}%", p.confidence * 100.0);
    println!(
        "Negative:   {:.1}%   Positive: {:.1}%",
        p.probabilities.negative * 100.0,
        p.probabilities.positive * 100.0
    );
    println!("Model:      {}", p.model_type);
}
