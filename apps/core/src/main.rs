// VibeCurator CLI
// Interpret a vibe, curate a playlist, print it

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use vibecurator_core::catalog::SpotifyCatalog;
use vibecurator_core::config::AppConfig;
use vibecurator_core::fs_manager::PortablePathManager;
use vibecurator_core::history::RECENT_HISTORY_LEN;
use vibecurator_core::models::{PlaylistOutcome, MAX_PLAYLIST_SIZE, MIN_PLAYLIST_SIZE};
use vibecurator_core::preflight::{run_preflight_checks, PreflightReport};
use vibecurator_core::telemetry::init_telemetry;
use vibecurator_core::SupervisorHandle;

#[derive(Parser)]
#[command(name = "vibecurator")]
#[command(about = "Turn a free-text vibe into a catalog-checked playlist", long_about = None)]
struct Cli {
    /// Vibe descriptions, one playlist each
    vibes: Vec<String>,

    /// Number of tracks per playlist
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(MIN_PLAYLIST_SIZE as i64..=MAX_PLAYLIST_SIZE as i64))]
    size: Option<u16>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Run the startup checks and print the report
    #[arg(long)]
    preflight: bool,

    /// Print the recent playlists after generating
    #[arg(long)]
    history: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Invalid configuration")?;
    init_telemetry(config.log_format, "info")?;

    if let Err(e) = PortablePathManager::init() {
        error!("Failed to initialize data directories: {}", e);
    }

    if cli.preflight {
        let catalog = SpotifyCatalog::from_config(&config)?;
        let report = run_preflight_checks(&config, &catalog).await;
        print_preflight(&report, cli.json)?;
    }

    if cli.vibes.is_empty() {
        if !cli.preflight {
            anyhow::bail!("No vibe given. Try: vibecurator \"rainy sunday with coffee\"");
        }
        return Ok(());
    }

    let supervisor = SupervisorHandle::from_config(&config)?;
    let size = cli.size.map(usize::from).unwrap_or(config.playlist_size);

    for vibe in cli.vibes {
        info!("Curating playlist for '{}'", vibe);
        let outcome = supervisor
            .generate_playlist(vibe.clone(), size)
            .await
            .with_context(|| format!("Could not build a playlist for '{}'", vibe))?;
        print_outcome(&vibe, &outcome, cli.json)?;
    }

    if cli.history {
        let entries = supervisor.recent_history(RECENT_HISTORY_LEN).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            println!("Recent playlists:");
            for entry in entries {
                println!(
                    "  {}  {:<40} {:>2} tracks{}",
                    entry.created_at.format("%H:%M:%S"),
                    entry.vibe,
                    entry.track_count,
                    if entry.refined { " (refined)" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn print_preflight(report: &PreflightReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Preflight: {}", report.summary);
    for check in &report.checks {
        let mark = if check.passed { "ok" } else { "!!" };
        println!("  [{}] {:<20} {}", mark, check.name, check.message);
        if let Some(details) = &check.details {
            println!("       {}", details);
        }
    }
    println!();
    Ok(())
}

fn print_outcome(vibe: &str, outcome: &PlaylistOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let profile = &outcome.profile;
    println!("Vibe: {}", vibe);
    println!("  Interpreter:     {}", outcome.interpreter);
    println!("  Genres:          {}", profile.primary_genres.join(", "));
    println!("  Energy/Valence:  {:.2} / {:.2} ({} tempo)", profile.energy, profile.valence, profile.tempo);
    println!("  Characteristics: {}", profile.characteristics.join(", "));
    println!("  Catalog:         {:?}", outcome.catalog_status);
    if outcome.refined {
        println!("  Refined with catalog feedback ({} suggestions)", outcome.feedback.len());
    }
    println!();

    if !outcome.is_validated() {
        println!("Catalog unavailable - showing unverified suggestions:");
    }
    for (idx, track) in outcome.tracks.iter().enumerate() {
        let link = track.external_url.as_deref().unwrap_or("-");
        println!("{:>3}. {} - {}  {}", idx + 1, track.artist, track.name, link);
    }

    let links: Vec<String> = outcome
        .tracks
        .iter()
        .filter_map(|t| t.external_url.clone())
        .collect();
    if let Some(url) = SpotifyCatalog::playlist_url(&links) {
        println!();
        println!("Open in Spotify: {}", url);
    }
    println!();
    Ok(())
}
