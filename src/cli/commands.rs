// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Server side:
//   serve    — load the configured model and serve the API
//   predict  — one in-process prediction, no server needed
//
// Dashboard side (talk to a running API):
//   status   — API health and analytics configuration
//   review   — predict one tweet, optionally report that the
//              prediction was wrong
//   batch    — predict a file of tweets (lines or a CSV `text`
//              column), optionally exporting a CSV of results
//
// Every deployment setting can also come from the environment
// (MODEL_TYPE, MODEL_PATH, HOST, PORT, WORKERS, API_URL,
// POSTHOG_API_KEY, POSTHOG_HOST); a flag wins over the variable.
//
// Reference: Rust Book §12 (Building a CLI Program), clap docs (env)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::prediction_service::{ModelConfig, DEFAULT_MODEL_PATH, DEFAULT_MODEL_TYPE};
use crate::domain::prediction::Sentiment;
use crate::infra::analytics::{PosthogConfig, DEFAULT_POSTHOG_HOST};
use crate::infra::api_client::DEFAULT_API_URL;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model and serve the HTTP API
    Serve(ServeArgs),

    /// Predict the sentiment of one tweet in-process
    Predict(PredictArgs),

    /// Show the health of a running API
    Status(StatusArgs),

    /// Predict a tweet through the API and report a wrong prediction
    Review(ReviewArgs),

    /// Predict every line of a file through the API
    Batch(BatchArgs),
}

// ─── Shared argument groups ───────────────────────────────────────────────────
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model family tag: bert, lstm, cnn or logistic
    #[arg(long, env = "MODEL_TYPE", default_value = DEFAULT_MODEL_TYPE)]
    pub model_type: String,

    /// Primary artifact: model JSON, burn record, or model directory
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,
}

/// Layer 1 → Layer 2 boundary: the application never sees clap types.
impl From<ModelArgs> for ModelConfig {
    fn from(a: ModelArgs) -> Self {
        ModelConfig {
            model_type: a.model_type,
            model_path: a.model_path,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the sentiment API
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyticsArgs {
    /// PostHog project key; feedback is disabled without it
    #[arg(long, env = "POSTHOG_API_KEY", hide_env_values = true)]
    pub posthog_api_key: Option<String>,

    #[arg(long, env = "POSTHOG_HOST", default_value = DEFAULT_POSTHOG_HOST)]
    pub posthog_host: String,
}

impl From<AnalyticsArgs> for PosthogConfig {
    fn from(a: AnalyticsArgs) -> Self {
        PosthogConfig {
            api_key: a.posthog_api_key,
            host:    a.posthog_host,
        }
    }
}

// ─── Per-command arguments ────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Number of HTTP worker threads
    #[arg(long, env = "WORKERS", default_value_t = 2)]
    pub workers: usize,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// The tweet to classify
    pub text: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(flatten)]
    pub analytics: AnalyticsArgs,
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(flatten)]
    pub analytics: AnalyticsArgs,

    /// The tweet to classify
    pub text: String,

    /// The real sentiment (positive/negative, 1/0, Positif/Négatif).
    /// Feedback is sent only when it differs from the prediction.
    #[arg(long, value_parser = parse_sentiment)]
    pub actual: Option<Sentiment>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Tweets to classify (at most 100): a CSV with a `text`
    /// column, or any other file with one tweet per line
    pub file: PathBuf,

    /// Export the predictions as CSV. Without a value the file is
    /// named sentiment_analysis_<YYYYmmdd_HHMMSS>.csv
    #[arg(long, value_name = "FILE.csv", num_args = 0..=1)]
    pub output: Option<Option<PathBuf>>,
}

fn parse_sentiment(s: &str) -> Result<Sentiment, String> {
    Sentiment::parse_label(s)
        .ok_or_else(|| format!("'{s}' is not a sentiment (use positive or negative)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_model_args_convert() {
        let cli = Cli::try_parse_from([
            "tweet-sentiment", "predict", "--model-type", "bert", "--model-path", "models/bert", "hello",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.text, "hello");
                let config: ModelConfig = args.model.into();
                assert_eq!(config.model_type, "bert");
                assert_eq!(config.model_path, "models/bert");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_review_actual_label() {
        let cli = Cli::try_parse_from([
            "tweet-sentiment", "review", "--actual", "Négatif", "--api-url", "http://api:8000", "meh",
        ])
        .unwrap();
        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.actual, Some(Sentiment::Negative));
                assert_eq!(args.client.api_url, "http://api:8000");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_label_is_rejected() {
        assert!(Cli::try_parse_from(["tweet-sentiment", "review", "--actual", "meh", "text"]).is_err());
    }

    #[test]
    fn test_batch_output_forms() {
        let parse = |args: &[&str]| match Cli::try_parse_from(args).unwrap().command {
            Commands::Batch(a) => a,
            other => panic!("unexpected command {other:?}"),
        };

        assert_eq!(parse(&["tweet-sentiment", "batch", "tweets.csv"]).output, None);
        assert_eq!(parse(&["tweet-sentiment", "batch", "tweets.csv", "--output"]).output, Some(None));
        assert_eq!(
            parse(&["tweet-sentiment", "batch", "tweets.csv", "--output", "out.csv"]).output,
            Some(Some(PathBuf::from("out.csv")))
        );
    }

    #[test]
    fn test_parse_sentiment() {
        assert_eq!(parse_sentiment("positive"), Ok(Sentiment::Positive));
        assert_eq!(parse_sentiment("0"), Ok(Sentiment::Negative));
        assert!(parse_sentiment("neutral").is_err());
    }
}
