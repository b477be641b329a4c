mod output;
mod playlist;
mod settings;

use crate::output::OutputSet;
use crate::settings::{Command, Settings, usage_text};
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use pixelsport_api::Event;
use pixelsport_api::client::{self, ApiError, PixelApi, TlsPolicy};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const OUTPUT_STANDARD: &str = "Pixelsports.m3u8";
const OUTPUT_TIVIMATE: &str = "Pixelsports_Tivimate.m3u8";
const OUTPUT_CATEGORIES: &str = "Pixelsports_categories.txt";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(Command::Run(settings)) => settings,
        Ok(Command::Help) => {
            println!("{}", usage_text());
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("pixelsports {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}\n\n{}", usage_text());
            return ExitCode::from(2);
        }
    };

    better_panic::install();
    init_logging();

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if is_transport_failure(&err) {
                error!("error fetching data: {err:#}");
            } else {
                error!("unexpected error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// True when the chain holds a network or HTTP status failure from the client.
fn is_transport_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(ApiError::is_transport)
}

/// Logs go to stderr; `log` records from both crates are bridged in.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let events = load_events(settings).await?;
    if events.is_empty() {
        info!("no live events found");
        return Ok(());
    }

    let outputs = build_outputs(&events, Utc::now(), settings);
    let count = outputs.len();
    let written = outputs.commit().context("writing playlists")?;
    for path in &written {
        debug!("wrote {}", path.display());
    }
    info!("committed {count} files to {}", settings.out_dir.display());
    Ok(())
}

async fn load_events(settings: &Settings) -> anyhow::Result<Vec<Event>> {
    if let Some(path) = &settings.events_file {
        info!("reading live events from {}", path.display());
        return client::load_events_file(path).context("loading events snapshot");
    }

    let api = PixelApi::builder()
        .tls_policy(TlsPolicy::AcceptInvalid)
        .build()?;
    info!("fetching PixelSport live events from {}", api.events_url());
    if api.tls_policy() == TlsPolicy::AcceptInvalid {
        warn!("certificate verification is disabled for the events request");
    }
    api.fetch_events().await.context("fetching live events")
}

/// Everything is rendered in memory before the first byte hits the disk.
fn build_outputs(events: &[Event], now: DateTime<Utc>, settings: &Settings) -> OutputSet {
    let mut outputs = OutputSet::new(&settings.out_dir);

    let standard = playlist::render_standard(events, now);
    info!(
        "rendered playlist: {OUTPUT_STANDARD} ({} entries, {} events)",
        standard.entries,
        events.len()
    );
    outputs.add(OUTPUT_STANDARD, standard.body);

    let tivimate = playlist::render_header_embedded(events, now);
    info!(
        "rendered TiviMate playlist: {OUTPUT_TIVIMATE} ({} entries, {} events)",
        tivimate.entries,
        events.len()
    );
    outputs.add(OUTPUT_TIVIMATE, tivimate.body);

    let categories = playlist::category_names(events).len();
    info!("rendered categories list: {OUTPUT_CATEGORIES} ({categories} categories)");
    outputs.add(OUTPUT_CATEGORIES, playlist::category_index(events));

    if settings.per_category {
        for category in playlist::render_per_category(events, now) {
            info!(
                "rendered {} playlist: {} ({} entries)",
                category.display_name, category.file_name, category.playlist.entries
            );
            outputs.add(category.file_name, category.playlist.body);
        }
    }

    outputs
}
