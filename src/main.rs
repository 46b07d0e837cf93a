//! # Attune - Profile-Tuned Soundscape Player
//!
//! Attune scores a listener profile against tuning tables to pick the best
//! matching meditation track, then plays it with optional ambience layers
//! and binaural tones for a requested duration. This binary is the CLI
//! front end over the `attune` library crate.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `tuning` / `scoring`: Signal tables and recommendation engine
//! - `catalog`: Track catalog and asset resolution
//! - `session`: Playback orchestration state machine
//! - `audio`: Rodio-backed output
//! - `snapshot`: Saved sessions for resume
//!
//! ## Usage
//!
//! ```bash
//! # Print the recommended track for a profile
//! attune recommend mindfulness mindfulness_meditation --gender F --age 34
//!
//! # Run a 30 minute session with two ambience layers
//! attune play sleep falling_asleep --duration 30 --ambience Stream --ambience Campfire
//!
//! # Replay the last saved session
//! attune resume
//! ```

use anyhow::{Context, Result};
use attune::audio::RodioBackend;
use attune::cli::{self, ProfileArgs};
use attune::config::RuntimeConfig;
use attune::scoring::{self, Profile, Recommendation};
use attune::session::{self, Orchestrator, PlaybackState, SessionParams, Volumes};
use attune::snapshot::{self, SessionSnapshot};
use attune::{catalog, tuning};
use clap::{CommandFactory, Parser};
use log::{info, warn};
use std::io::Write;

/// Build a scoring profile from CLI arguments, bucketing the raw age
/// into its tuning group.
fn build_profile(args: &ProfileArgs) -> Profile {
    Profile {
        gender: args.gender.clone(),
        age_group: tuning::age_group_for(args.age).to_string(),
        blood_type: args.blood_type.clone(),
        space: args.space.clone(),
        device: args.device.clone(),
    }
}

fn print_recommendation(rec: &Recommendation) {
    println!("Target signal:");
    println!("  frequency: {:.2} Hz", rec.hz);
    println!("  tempo:     {:.1} bpm", rec.bpm);
    println!("  energy:    {:.2}", rec.energy);
    println!("  rhythm:    {:.2}", rec.rhythm);
    match &rec.matched_track {
        Some(track) => println!(
            "Matched track: {} ({:.1} bpm, {:.1} Hz, energy {:.2})",
            track.asset_id, track.bpm, track.hz, track.energy
        ),
        None => println!("Fallback track: {}", rec.asset_id),
    }
}

/// Drive one session to completion, printing progress once per second.
///
/// Blocks until the orchestrator reaches `Stopped` (requested duration
/// elapsed) or `Errored`.
fn run_session(config: &RuntimeConfig, params: SessionParams, volumes: Volumes) -> Result<()> {
    let backend = RodioBackend::try_default()
        .context("Failed to open an audio output device")?;
    let mut orchestrator = Orchestrator::new(backend, config.asset_base_url.clone());

    orchestrator.begin(params, volumes).map_err(|e| {
        anyhow::anyhow!("Failed to start session: {e}")
    })?;

    loop {
        std::thread::sleep(session::TICK_INTERVAL);
        orchestrator.tick();

        match orchestrator.state() {
            PlaybackState::Stopped => {
                println!();
                println!("Session complete");
                return Ok(());
            }
            PlaybackState::Errored => {
                println!();
                let (category, message) = orchestrator
                    .error()
                    .map(|(c, m)| (c.to_string(), m.to_string()))
                    .unwrap_or_else(|| ("unknown".to_string(), "unknown error".to_string()));
                anyhow::bail!("Session failed ({category}): {message}");
            }
            _ => {
                if let Some(status) = orchestrator.status() {
                    print!(
                        "\r  {:>5.0}s / {:.0}s (loop {})   ",
                        status.total_elapsed_secs,
                        status.requested_duration_secs,
                        status.loop_count + 1
                    );
                    let _ = std::io::stdout().flush();
                }
            }
        }
    }
}

/// Main entry point for the Attune application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate library functions. All operations return Results for
/// consistent error handling throughout the application.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug attune play ...` - Enable debug logging
/// - `RUST_LOG=attune::session=trace attune play ...` - Module-specific logging
fn main() -> Result<()> {
    // Initialize environment logger for debugging and monitoring
    env_logger::init();

    // Parse command-line arguments using Clap derive macros
    let args = cli::Args::parse();

    // Global flags override the platform defaults
    let mut config = RuntimeConfig::default();
    if let Some(path) = args.catalog {
        config.catalog_path = path;
    }
    if let Some(base) = args.asset_base {
        config.asset_base_url = base;
    }

    // Route commands to appropriate library functions
    match args.command {
        cli::Command::Recommend {
            category,
            subcategory,
            profile,
            json,
        } => {
            let profile = build_profile(&profile);
            let catalog_result = catalog::load_catalog(&config.catalog_path);
            let rec = scoring::recommend(&category, &subcategory, &profile, catalog_result)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rec)?);
            } else {
                print_recommendation(&rec);
            }
        }
        cli::Command::Play {
            category,
            subcategory,
            profile,
            duration,
            ambience,
            music_volume,
            ambience_volume,
            binaural_volume,
            plan,
        } => {
            catalog::validate_selection(&category, &subcategory, duration)?;

            let profile = build_profile(&profile);
            let catalog_result = catalog::load_catalog(&config.catalog_path);
            let rec = scoring::recommend(&category, &subcategory, &profile, catalog_result)?;
            print_recommendation(&rec);

            let snapshot = SessionSnapshot::new(
                profile,
                &category,
                &subcategory,
                duration,
                ambience,
                rec,
                plan,
            );
            match snapshot.save(&config.snapshot_dir) {
                Ok(path) => info!("Session snapshot saved to {}", path.display()),
                Err(e) => warn!("Could not save session snapshot: {e}"),
            }

            let volumes = Volumes {
                music: music_volume,
                ambience: ambience_volume,
                binaural: binaural_volume,
            };
            run_session(&config, snapshot.into_params(), volumes)?;
        }
        cli::Command::Resume { snapshot } => {
            let path = match snapshot {
                Some(path) => path,
                None => snapshot::list_snapshots(&config.snapshot_dir)?
                    .into_iter()
                    .next()
                    .context("No saved sessions to resume")?,
            };

            info!("Resuming session from {}", path.display());
            let snapshot = SessionSnapshot::load(&path)?;
            println!(
                "Resuming {} / {} ({} min)",
                snapshot.category, snapshot.subcategory, snapshot.duration_minutes
            );
            run_session(&config, snapshot.into_params(), Volumes::default())?;
        }
        cli::Command::Tracks => {
            let tracks = catalog::load_catalog(&config.catalog_path).with_context(|| {
                format!("Failed to read catalog at {}", config.catalog_path.display())
            })?;

            println!("{} track(s) in catalog:", tracks.len());
            for track in tracks {
                println!(
                    "  {:<24} {:>6.1} bpm  {:>7.1} Hz  energy {:.2}",
                    track.asset_id, track.bpm, track.hz, track.energy
                );
            }
        }
        cli::Command::Ambience => {
            println!("Available ambience layers (up to two per session):");
            for name in catalog::ambience_names() {
                println!("  {name}");
            }
        }
        cli::Command::Snapshots => {
            let paths = snapshot::list_snapshots(&config.snapshot_dir)?;
            if paths.is_empty() {
                println!("No saved sessions");
            } else {
                for path in paths {
                    match SessionSnapshot::load(&path) {
                        Ok(s) => println!(
                            "  {}  {} / {} ({} min)",
                            path.display(),
                            s.category,
                            s.subcategory,
                            s.duration_minutes
                        ),
                        Err(_) => println!("  {}  (unreadable)", path.display()),
                    }
                }
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            attune::completion::generate_completions(
                attune::completion::shell_to_completion_shell(&shell),
                &mut cmd,
            );
        }
    }

    Ok(())
}
