//! The `lookout ask` command: answer one question from a detections file.

use clap::{Args, ValueEnum};
use lookout_core::{Config, Lookout, Question};
use std::path::PathBuf;

/// Supported answer providers.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProviderArg {
    /// OpenAI-compatible chat completions
    Openai,
    /// Gemini generateContent
    Gemini,
}

impl std::fmt::Display for ProviderArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderArg::Openai => write!(f, "openai"),
            ProviderArg::Gemini => write!(f, "gemini"),
        }
    }
}

/// Arguments for the `ask` command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// JSON file with raw detector output for one image
    #[arg(short, long)]
    pub detections: PathBuf,

    /// Question about the detected objects
    #[arg(short, long)]
    pub question: String,

    /// Answer provider (overrides `[qa] provider`)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name (provider-specific)
    #[arg(long)]
    pub model: Option<String>,
}

/// Execute the ask command.
pub async fn execute(args: AskArgs) -> anyhow::Result<()> {
    let question = Question::new(args.question)?;
    let config = Config::load()?;
    let provider = args.provider.map(|p| p.to_string());
    let lookout = Lookout::new(config, provider.as_deref(), args.model.as_deref())?;

    let raw = super::read_raw_detections(&args.detections)?;
    let (detections, report) = lookout.normalizer().normalize_with_report(&raw);
    if report.dropped > 0 {
        tracing::warn!(
            "Dropped {} malformed detection(s) from {}",
            report.dropped,
            args.detections.display()
        );
    }

    let answer = lookout.ask(&detections, &question).await;
    if let Some(failure) = answer.failure() {
        tracing::warn!("{failure}");
    }
    let text = answer.into_reply()?;
    println!("{text}");
    Ok(())
}
