//! Track catalog and asset resolution.
//!
//! The catalog is an externally maintained, append-only JSON list of
//! track descriptors, treated as read-only input to matching. Asset ids
//! resolve to playable URLs through a fixed base-path template, and
//! ambience display names resolve through a static identifier→filename
//! table. Unresolvable ambience names are dropped silently: ambience is
//! cosmetic, never load-bearing.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Asset id substituted when the catalog is empty or unreadable, so any
/// request still yields a playable session.
pub const FALLBACK_ASSET_ID: &str = "newagemusic001";

/// Default remote base path for resolving asset ids.
pub const DEFAULT_ASSET_BASE_URL: &str = "https://res.cloudinary.com/dsixore5e/video/upload/";

/// One catalogued track descriptor.
///
/// `asset_id` also deserializes from the legacy `public_id` field name
/// used by older catalog exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub bpm: f64,
    pub hz: f64,
    pub energy: f64,
    #[serde(alias = "public_id")]
    pub asset_id: String,
}

/// The descriptor substituted for an empty catalog. Its signal values
/// are irrelevant; it is never matched against, only played.
pub fn fallback_track() -> Track {
    Track {
        bpm: 60.0,
        hz: 200.0,
        energy: 0.5,
        asset_id: FALLBACK_ASSET_ID.to_string(),
    }
}

/// Load the track catalog from a JSON file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, or
/// [`Error::Snapshot`] wrapping the serde failure for malformed JSON.
pub fn load_catalog(path: &Path) -> Result<Vec<Track>> {
    let raw = fs::read_to_string(path)?;
    let tracks: Vec<Track> = serde_json::from_str(&raw)?;
    debug!("Loaded {} catalog entries from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Resolve an asset id to its playable URL. Purely template-driven: no
/// lookup, no ambiguity.
pub fn asset_url(base_url: &str, asset_id: &str) -> String {
    format!("{base_url}{asset_id}.mp3")
}

/// Resolve an ambience display name to its asset id, or `None` for an
/// unknown name (skipped by the orchestrator, not an error).
pub fn ambience_asset_id(name: &str) -> Option<&'static str> {
    AMBIENCE_FILES.get(name).copied()
}

/// All recognized ambience display names, in stable sorted order.
pub fn ambience_names() -> Vec<&'static str> {
    let mut names: Vec<_> = AMBIENCE_FILES.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Resolve a set of ambience display names to asset ids, dropping
/// unknown names and capping the result at two layers.
pub fn resolve_ambience(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| {
            let resolved = ambience_asset_id(name);
            if resolved.is_none() {
                debug!("Dropping unknown ambience '{name}'");
            }
            resolved
        })
        .take(2)
        .map(str::to_string)
        .collect()
}

/// Validate that required selection fields are present.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the first missing field.
pub fn validate_selection(category: &str, subcategory: &str, duration_minutes: u32) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::Validation("category".into()));
    }
    if subcategory.trim().is_empty() {
        return Err(Error::Validation("subcategory".into()));
    }
    if duration_minutes == 0 {
        return Err(Error::Validation("duration".into()));
    }
    Ok(())
}

lazy_static! {
    /// Ambience display name → asset id
    static ref AMBIENCE_FILES: HashMap<&'static str, &'static str> = HashMap::from([
        ("Stream", "stream_sound"),
        ("Prairie Wind", "prairie_wind"),
        ("Forest Wind", "forest_wind"),
        ("Gentle Waves", "gentle_waves"),
        ("Rustling Leaves", "rustling_leaves"),
        ("Soft Birdsong", "soft_birdsong"),
        ("Crickets at Night", "crickets_night"),
        ("Owls at Night", "owls_night"),
        ("Page Turning", "page_turning"),
        ("Humming", "humming"),
        ("Cave Drips", "cave_drips"),
        ("Seagulls", "seagulls"),
        ("Campfire", "campfire"),
        ("Cosmic Sounds", "cosmic_sounds"),
        ("Deep Sea", "deep_sea"),
        ("Temple Bells", "temple_bells"),
    ]);
}
