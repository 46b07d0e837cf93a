//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Attune using Clap derive
//! macros. It provides a type-safe way to parse command-line arguments and
//! route them to appropriate functionality.
//!
//! ## Commands
//!
//! - `recommend`: Score a profile against a meditation selection and print the
//!   nearest track
//! - `play`: Run a full playback session (music + ambience + binaural tones)
//! - `resume`: Replay a saved session snapshot without re-scoring
//! - `tracks`: List the track catalog
//! - `ambience`: List available ambience layer names
//! - `snapshots`: List saved session snapshots
//!
//! ## Examples
//!
//! ```bash
//! attune recommend mindfulness mindfulness_meditation --gender M --age 25
//! attune play sleep falling_asleep --duration 30 --ambience Stream --ambience Campfire
//! attune resume
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. The main structure contains only a subcommand
/// since all functionality is accessed through specific commands.
#[derive(Parser)]
#[command(name = "attune")]
#[command(about = "Attune: profile-tuned binaural soundscapes & session playback")]
#[command(version)]
pub struct Args {
    /// Path to the track catalog file (defaults to the data directory)
    #[arg(long, global = true, env = "ATTUNE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Base URL or directory prepended to asset ids when resolving audio
    #[arg(long, global = true, env = "ATTUNE_ASSET_BASE")]
    pub asset_base: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Listener profile arguments shared by the scoring commands.
///
/// Every field has a default so a bare `attune recommend <cat> <sub>` works;
/// unrecognized values contribute no correction rather than failing.
#[derive(ClapArgs, Debug, Clone)]
pub struct ProfileArgs {
    /// Gender ("M" or "F")
    #[arg(long, default_value = "M")]
    pub gender: String,

    /// Age in years, bucketed into tuning groups (10-20, 21-30, ... 70+)
    #[arg(long, default_value = "25")]
    pub age: u32,

    /// Blood type ("A", "B", "AB" or "O")
    #[arg(long, default_value = "O")]
    pub blood_type: String,

    /// Listening space ("Indoor" or "Outdoor")
    #[arg(long, default_value = "Indoor")]
    pub space: String,

    /// Playback device ("Phone Speaker", "Earphones" or "External Speaker")
    #[arg(long, default_value = "Earphones")]
    pub device: String,
}

/// Enumeration of all available subcommands.
///
/// Each variant corresponds to a major piece of functionality in Attune.
/// Command arguments are embedded directly in the enum variants for
/// type safety and automatic validation.
#[derive(Subcommand)]
pub enum Command {
    /// Score a profile and print the recommended track
    ///
    /// Looks up the base signal for the category/subcategory pair, applies
    /// per-profile corrections, and prints the target signal alongside the
    /// nearest catalog track. Falls back to a default asset when the catalog
    /// cannot be read.
    Recommend {
        /// Meditation category (e.g. "mindfulness", "sleep", "study")
        category: String,

        /// Subcategory within the category (e.g. "mindfulness_meditation")
        subcategory: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the result as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Run a full playback session
    ///
    /// Scores the profile, resolves the recommended track and any requested
    /// ambience layers, starts binaural tones at the target frequency, and
    /// loops the music until the requested duration elapses. A snapshot of
    /// the session is saved so it can be resumed later.
    Play {
        /// Meditation category (e.g. "mindfulness", "sleep", "study")
        category: String,

        /// Subcategory within the category (e.g. "mindfulness_meditation")
        subcategory: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Session length in minutes
        #[arg(long, default_value = "30")]
        duration: u32,

        /// Ambience layer to mix in (repeatable, at most two are used)
        #[arg(long)]
        ambience: Vec<String>,

        /// Music volume, 0-100
        #[arg(long, default_value = "50")]
        music_volume: u8,

        /// Ambience volume, 0-100
        #[arg(long, default_value = "50")]
        ambience_volume: u8,

        /// Binaural tone volume, 0-100
        #[arg(long, default_value = "50")]
        binaural_volume: u8,

        /// Billing plan identifier, recorded in the session snapshot
        #[arg(long, env = "ATTUNE_PLAN")]
        plan: Option<String>,
    },

    /// Resume the most recent saved session
    ///
    /// Loads the newest snapshot from the snapshot directory (or an explicit
    /// file) and replays it with the previously computed target signal and
    /// track, skipping the scoring step entirely.
    Resume {
        /// Path to a specific snapshot file (defaults to the newest)
        snapshot: Option<PathBuf>,
    },

    /// List all tracks in the catalog
    ///
    /// Displays every catalog entry with its bpm, frequency, and energy so
    /// recommendations can be sanity-checked by eye.
    Tracks,

    /// List available ambience layer names
    Ambience,

    /// List saved session snapshots, newest first
    Snapshots,

    /// Generate shell completions
    ///
    /// Generates completion scripts for various shells to enable tab
    /// completion of commands and flags.
    ///
    /// Usage: attune completion bash > ~/.local/share/bash-completion/completions/attune
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
