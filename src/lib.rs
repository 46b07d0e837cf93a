//! Profile-tuned soundscape engine for guided meditation sessions.
//!
//! Core modules:
//! - [`tuning`] - Base signal and per-profile correction tables
//! - [`scoring`] - Target signal computation and nearest-track matching
//! - [`catalog`] - Track catalog, ambience names, and asset URL resolution
//! - [`session`] - Playback orchestration state machine
//! - [`binaural`] - Binaural tone synthesis
//! - [`audio`] - Rodio-backed audio output
//!
//! ### Supporting Modules
//!
//! - [`config`] - Configuration and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation for enhanced UX
//! - [`snapshot`] - Saved session snapshots for resume
//! - [`error`] - Error taxonomy shared across the crate
//!
//! ## Quick Start Example
//!
//! ```
//! use attune::scoring::{self, Profile};
//! use attune::catalog::Track;
//!
//! let profile = Profile {
//!     gender: "M".to_string(),
//!     age_group: "21-30".to_string(),
//!     blood_type: "O".to_string(),
//!     space: "Indoor".to_string(),
//!     device: "Earphones".to_string(),
//! };
//!
//! let catalog = vec![Track {
//!     bpm: 62.0,
//!     hz: 201.0,
//!     energy: 0.6,
//!     asset_id: "calmwaves01".to_string(),
//! }];
//!
//! let rec = scoring::recommend(
//!     "Mindfulness",
//!     "Mindfulness Meditation",
//!     &profile,
//!     Ok(catalog),
//! )?;
//! println!("Recommended asset: {} ({} Hz)", rec.asset_id, rec.hz);
//! # Ok::<(), attune::error::Error>(())
//! ```
//!
//! ## Scoring Details
//!
//! Each (category, subcategory) pair maps to a base signal of four
//! dimensions: binaural frequency (hz), tempo (bpm), energy, and rhythm.
//! Five profile attributes each contribute a small additive correction:
//!
//! - Gender
//! - Age group (ages bucket into decade ranges)
//! - Blood type
//! - Listening space (indoor/outdoor)
//! - Playback device
//!
//! Unrecognized attribute values contribute nothing. The resulting target
//! signal is matched against the catalog by Euclidean distance over
//! (bpm, hz, energy); rhythm is computed but reserved.
//!
//! ## Session Playback
//!
//! [`session::Orchestrator`] drives a session: it loads the matched track,
//! mixes in up to two ambience layers, and starts a binaural tone pair at
//! the target frequency after a short settle delay. When the requested
//! duration exceeds the track's native length the track loops seamlessly,
//! and total elapsed time accounts for completed loops. The orchestrator is
//! generic over an [`session::AudioBackend`] so its behavior is fully
//! testable without an audio device.
//!
//! ## Error Handling
//!
//! Library functions return [`error::Result`] with a categorized
//! [`error::Error`]; the binary wraps these with `anyhow` context at the
//! command boundary. Common error scenarios include:
//!
//! - Unknown category/subcategory pairs
//! - Unreadable or malformed catalogs
//! - Audio assets that fail to open or decode
//! - Audio device initialization failures

pub mod audio;
pub mod binaural;
pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod tuning;
