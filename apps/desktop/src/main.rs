use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{load_settings, ContentStudio, StudioError, StudioEvent};
use shared::{
    domain::{ContentType, Tone},
    protocol::{GenerationEvent, DEFAULT_WORD_COUNT},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Runs one simulated generation without the GUI.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    keyword: String,
    #[arg(long, default_value = "US")]
    location: String,
    #[arg(long, default_value = "blog")]
    content_type: ContentType,
    #[arg(long, default_value_t = DEFAULT_WORD_COUNT)]
    word_count: u32,
    #[arg(long, default_value = "professional")]
    tone: Tone,
    #[arg(long)]
    audience: String,
    #[arg(long = "competitor-url")]
    competitor_urls: Vec<String>,
    #[arg(long = "internal-link")]
    internal_links: Vec<String>,
    #[arg(long)]
    no_images: bool,
    /// Cancel the run after this many milliseconds.
    #[arg(long)]
    cancel_after_ms: Option<u64>,
    /// Print every generation event as a JSON line.
    #[arg(long)]
    events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = load_settings()?;

    let mut studio = ContentStudio::from_settings(&settings)?;
    let mut events = studio.subscribe_events();

    {
        let wizard = studio.wizard_mut();
        let values = wizard
            .values_mut()
            .context("wizard is not accepting input")?;
        values.keyword = args.keyword;
        values.location = args.location;
        values.content_type = Some(args.content_type);
        values.word_count = args.word_count;
        values.tone = Some(args.tone);
        values.include_images = !args.no_images;
        values.target_audience = args.audience;
        values.competitor_urls = args.competitor_urls;
        values.internal_links = args.internal_links;
        while wizard.next() {}
    }

    match studio.submit().await {
        Ok(brief) => info!(keyword = %brief.keyword, "generation started"),
        Err(StudioError::Wizard(err)) => {
            if let Some(errors) = err.validation_errors() {
                for field in errors.iter() {
                    eprintln!("{}: {}", field.field, field.message);
                }
            }
            bail!("submit failed: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    let mut cancel_at = args
        .cancel_after_ms
        .map(|ms| tokio::time::Instant::now() + Duration::from_millis(ms));

    loop {
        let next = match cancel_at {
            Some(deadline) => match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    cancel_at = None;
                    studio.cancel();
                    continue;
                }
            },
            None => events.recv().await,
        };

        let event = match next {
            Ok(StudioEvent::Generation(event)) => event,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "dropped progress events");
                continue;
            }
            Err(RecvError::Closed) => bail!("generation ended without a result"),
        };

        if args.events {
            println!("{}", serde_json::to_string(&event)?);
        }
        match event {
            GenerationEvent::Progress(progress) => {
                if !args.events {
                    eprintln!(
                        "{:>3}% {}",
                        progress.rounded_percent(),
                        progress.active_stage().title()
                    );
                }
            }
            GenerationEvent::Completed { result } => {
                if !args.events {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                return Ok(());
            }
            GenerationEvent::Cancelled => {
                eprintln!("generation cancelled");
                return Ok(());
            }
        }
    }
}
