use std::{
    env,
    io::{self, IsTerminal},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, Timelike};
use clap::{Args, Parser, Subcommand};
use client_core::{
    presentation::title_meter, FormSession, HttpPredictionService, Locale, SubmissionController,
};
use shared::domain::{
    FIELD_CHANNEL_SUBSCRIBERS, FIELD_CHANNEL_VIDEO_COUNT, FIELD_DURATION_MINUTES,
    FIELD_PUBLISH_DATE, FIELD_PUBLISH_HOUR, FIELD_TAG_COUNT, FIELD_TITLE,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "predictor", about = "Predict first-week views for a video")]
struct Cli {
    /// Base URL of the prediction service.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    locale: Option<Locale>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    result_delay_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the prediction form.
    Predict(PredictArgs),
    /// Report whether the service has a model loaded.
    Health,
    /// Show the model the service is serving.
    ModelInfo,
}

/// Values are taken as typed; malformed numbers are sent as 0.
#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long)]
    title: String,
    /// Defaults to the current local time.
    #[arg(long)]
    publish_date: Option<String>,
    /// Defaults to the current local hour.
    #[arg(long)]
    publish_hour: Option<String>,
    #[arg(long)]
    duration_minutes: Option<String>,
    #[arg(long)]
    tag_count: Option<String>,
    #[arg(long)]
    channel_subscribers: Option<String>,
    #[arg(long)]
    channel_video_count: Option<String>,
    /// Extra form field as name=value, e.g. --field category=Education.
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

fn parse_field(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "field name must not be empty");
    Ok((name.to_string(), value.to_string()))
}

impl PredictArgs {
    /// Form entries in control order, with the pre-filled publish date used
    /// when none was given.
    fn into_entries(self, prefilled_date: &str) -> Vec<(String, String)> {
        let publish_date = self
            .publish_date
            .unwrap_or_else(|| prefilled_date.to_string());
        let publish_hour = self
            .publish_hour
            .unwrap_or_else(|| Local::now().hour().to_string());

        let mut entries = vec![
            (FIELD_TITLE.to_string(), self.title),
            (FIELD_PUBLISH_DATE.to_string(), publish_date),
            (FIELD_PUBLISH_HOUR.to_string(), publish_hour),
        ];
        for (name, value) in [
            (FIELD_DURATION_MINUTES, self.duration_minutes),
            (FIELD_TAG_COUNT, self.tag_count),
            (FIELD_CHANNEL_SUBSCRIBERS, self.channel_subscribers),
            (FIELD_CHANNEL_VIDEO_COUNT, self.channel_video_count),
        ] {
            if let Some(value) = value {
                entries.push((name.to_string(), value));
            }
        }
        entries.extend(self.fields);
        entries
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(locale) = cli.locale {
        settings.locale = locale;
    }
    if let Some(secs) = cli.timeout_secs.filter(|secs| *secs > 0) {
        settings.request_timeout_secs = secs;
    }
    if let Some(ms) = cli.result_delay_ms {
        settings.result_delay_ms = ms;
    }

    let base_url = settings.api_base_url()?;
    info!(%base_url, locale = %settings.locale, "using prediction service");
    let service = Arc::new(HttpPredictionService::new(base_url));
    let controller = SubmissionController::new(service, settings.presentation_options());

    match cli.command {
        Command::Health => {
            let health = controller.health().await.context("health check failed")?;
            println!(
                "status: {:?}, model loaded: {}",
                health.status, health.model_loaded
            );
            Ok(if health.model_loaded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::ModelInfo => {
            let info = controller
                .model_info()
                .await
                .context("failed to fetch model info")?;
            println!("model: {}", info.model_name);
            println!("trained: {}", info.training_date);
            println!("features: {}", info.feature_count);
            Ok(ExitCode::SUCCESS)
        }
        Command::Predict(args) => {
            let color = io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none();
            let mut renderer =
                TerminalRenderer::new(io::stdout(), settings.locale).with_color(color);
            renderer.show_title_meter(title_meter(&args.title));

            let mut session = FormSession::new(Arc::new(controller), renderer);
            session.initialize().await;
            let entries = args.into_entries(&session.renderer().view().publish_date_input);
            session.submit(&entries).await?;

            let renderer = session.into_renderer();
            let failed = renderer.view().error().is_some();
            renderer.finish().context("failed to write prediction output")?;
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
