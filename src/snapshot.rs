//! Session snapshots.
//!
//! An opaque serialization of {profile, selection, scoring result,
//! timestamp} saved after a successful recommendation, usable later to
//! resume or share a session without re-scoring: a snapshot converts
//! straight into [`SessionParams`].

use crate::catalog::Track;
use crate::error::Result;
use crate::scoring::{Profile, Recommendation, TargetSignal};
use crate::session::SessionParams;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything needed to reproduce a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub profile: Profile,
    pub category: String,
    pub subcategory: String,
    pub duration_minutes: u32,
    pub ambience: Vec<String>,
    pub recommendation: Recommendation,
    /// Billing plan flag, carried opaquely
    pub plan: Option<String>,
    /// Unix timestamp (seconds) at capture time
    pub saved_at: u64,
}

impl SessionSnapshot {
    pub fn new(
        profile: Profile,
        category: &str,
        subcategory: &str,
        duration_minutes: u32,
        ambience: Vec<String>,
        recommendation: Recommendation,
        plan: Option<String>,
    ) -> Self {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            profile,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            duration_minutes,
            ambience,
            recommendation,
            plan,
            saved_at,
        }
    }

    /// Save under the data directory as `session_<timestamp>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Io`] on write failure or
    /// [`crate::error::Error::Snapshot`] on serialization failure.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("session_{}.json", self.saved_at));
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("Saved session snapshot to {}", path.display());
        Ok(path)
    }

    /// Load a previously saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Io`] when the file cannot be read
    /// or [`crate::error::Error::Snapshot`] for malformed contents.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Convert into playable session parameters, skipping re-scoring.
    /// A snapshot captured during a catalog outage lacks the matched
    /// descriptor; the fallback descriptor stands in so the session is
    /// still playable.
    pub fn into_params(self) -> SessionParams {
        let track = self.recommendation.matched_track.unwrap_or_else(|| Track {
            bpm: self.recommendation.bpm,
            hz: self.recommendation.hz,
            energy: self.recommendation.energy,
            asset_id: self.recommendation.asset_id,
        });

        SessionParams {
            target: TargetSignal {
                hz: self.recommendation.hz,
                bpm: self.recommendation.bpm,
                energy: self.recommendation.energy,
                rhythm: self.recommendation.rhythm,
            },
            track,
            ambience: self.ambience,
            requested_duration_secs: f64::from(self.duration_minutes) * 60.0,
            plan: self.plan,
        }
    }
}

/// List saved snapshots in a directory, newest first.
pub fn list_snapshots(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("session_") && n.ends_with(".json"))
        })
        .collect();
    paths.sort();
    paths.reverse();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use tempfile::TempDir;

    fn sample_snapshot() -> SessionSnapshot {
        SessionSnapshot::new(
            Profile {
                gender: "M".into(),
                age_group: "21-30".into(),
                blood_type: "O".into(),
                space: "Indoor".into(),
                device: "Earphones".into(),
            },
            "mindfulness",
            "mindfulness_meditation",
            30,
            vec!["Stream".into()],
            Recommendation {
                hz: 200.5,
                bpm: 63.0,
                energy: 0.6,
                rhythm: 0.6,
                asset_id: "calmwaves01".into(),
                matched_track: Some(Track {
                    bpm: 62.0,
                    hz: 201.0,
                    energy: 0.6,
                    asset_id: "calmwaves01".into(),
                }),
            },
            Some("freeA".into()),
        )
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let snapshot = sample_snapshot();
        let path = snapshot.save(dir.path()).unwrap();

        let loaded = SessionSnapshot::load(&path).unwrap();
        assert_eq!(loaded.category, "mindfulness");
        assert_eq!(loaded.recommendation.asset_id, "calmwaves01");
        assert_eq!(loaded.plan.as_deref(), Some("freeA"));
    }

    #[test]
    fn test_into_params_skips_rescoring() {
        let params = sample_snapshot().into_params();
        assert_eq!(params.requested_duration_secs, 1800.0);
        assert_eq!(params.track.asset_id, "calmwaves01");
        assert!((params.target.hz - 200.5).abs() < 1e-9);
        assert_eq!(params.ambience, vec!["Stream".to_string()]);
    }

    #[test]
    fn test_into_params_without_matched_track() {
        let mut snapshot = sample_snapshot();
        snapshot.recommendation.matched_track = None;
        snapshot.recommendation.asset_id = catalog::FALLBACK_ASSET_ID.into();
        let params = snapshot.into_params();
        assert_eq!(params.track.asset_id, catalog::FALLBACK_ASSET_ID);
    }

    #[test]
    fn test_list_snapshots_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("session_100.json"), "{}").unwrap();
        fs::write(dir.path().join("session_200.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let listed = list_snapshots(dir.path()).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].to_string_lossy().contains("session_200"));
    }

    #[test]
    fn test_list_snapshots_missing_dir_is_empty() {
        assert!(list_snapshots(Path::new("/no/such/dir")).unwrap().is_empty());
    }
}
