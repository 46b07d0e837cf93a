//! Signal scoring and nearest-track matching.
//!
//! Combines a base prescription with per-dimension profile corrections
//! into a [`TargetSignal`], then picks the catalog track closest to it.

use crate::catalog::{self, Track};
use crate::error::{Error, Result};
use crate::tuning::{self, Dimension};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Biometric/contextual profile captured once per session.
///
/// Values are free-form strings matched against the correction tables;
/// anything unrecognized simply contributes no correction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: String,
    pub age_group: String,
    pub blood_type: String,
    pub space: String,
    pub device: String,
}

/// Fully corrected signal prescription. All fields are always finite
/// numbers: lookup misses contribute zero rather than poisoning a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSignal {
    pub hz: f64,
    pub bpm: f64,
    pub energy: f64,
    pub rhythm: f64,
}

/// Response shape of [`recommend`], mirroring what the playback layer
/// consumes: the corrected signal plus the chosen asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub hz: f64,
    pub bpm: f64,
    pub energy: f64,
    pub rhythm: f64,
    pub asset_id: String,
    /// The full matched descriptor, absent when the catalog could not be
    /// read and the fallback asset was substituted.
    pub matched_track: Option<Track>,
}

/// Compute the personalized target signal for a selection and profile.
///
/// The only failure is a missing base tuning entry for the normalized
/// (category, subcategory) pair. Profile values that don't match any
/// correction table entry are zero-effect, never an error.
///
/// # Errors
///
/// Returns [`Error::MatchNotFound`] when no base signal exists.
pub fn score(category: &str, subcategory: &str, profile: &Profile) -> Result<TargetSignal> {
    let base = tuning::base_signal(category, subcategory).ok_or_else(|| Error::MatchNotFound {
        category: tuning::normalize_category(category),
        subcategory: tuning::normalize_subcategory(subcategory),
    })?;

    let corrections = [
        tuning::correction(Dimension::Gender, &profile.gender),
        tuning::correction(Dimension::AgeGroup, &profile.age_group),
        tuning::correction(Dimension::BloodType, &profile.blood_type),
        tuning::correction(Dimension::Space, &profile.space),
        tuning::correction(Dimension::Device, &profile.device),
    ];

    let mut target = TargetSignal {
        hz: base.hz,
        bpm: base.bpm,
        energy: base.energy,
        rhythm: base.rhythm,
    };

    for correction in corrections.into_iter().flatten() {
        target.hz += correction.hz.unwrap_or(0.0);
        target.bpm += correction.bpm.unwrap_or(0.0);
        target.energy += correction.energy.unwrap_or(0.0);
        target.rhythm += correction.rhythm.unwrap_or(0.0);
    }

    debug!(
        "Scored {category}/{subcategory}: hz={:.2} bpm={:.2} energy={:.2} rhythm={:.2}",
        target.hz, target.bpm, target.energy, target.rhythm
    );

    Ok(target)
}

/// Euclidean distance over (bpm, hz, energy).
///
/// Rhythm is computed by the scoring step but intentionally left out of
/// the distance; it is a reserved dimension kept for later tuning.
fn distance(target: &TargetSignal, track: &Track) -> f64 {
    let bpm_diff = track.bpm - target.bpm;
    let hz_diff = track.hz - target.hz;
    let energy_diff = track.energy - target.energy;

    (bpm_diff * bpm_diff + hz_diff * hz_diff + energy_diff * energy_diff).sqrt()
}

/// Pick the catalog entry closest to the target signal.
///
/// Deterministic: ties break by catalog iteration order, so the first
/// minimal entry always wins. An empty catalog falls back to the default
/// track so the session stays playable under partial data failure.
pub fn match_track(target: &TargetSignal, tracks: &[Track]) -> Track {
    let mut best: Option<(&Track, f64)> = None;

    for track in tracks {
        let d = distance(target, track);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((track, d)),
        }
    }

    match best {
        Some((track, d)) => {
            debug!("Matched track '{}' at distance {d:.3}", track.asset_id);
            track.clone()
        }
        None => {
            warn!("Empty catalog; falling back to default track");
            catalog::fallback_track()
        }
    }
}

/// Full recommendation pass: score, then match against the configured
/// catalog. Catalog-read failures degrade to the fallback asset rather
/// than failing the whole request; only an unknown selection errors.
///
/// # Errors
///
/// Returns [`Error::MatchNotFound`] for an unknown (category,
/// subcategory) pair.
pub fn recommend(
    category: &str,
    subcategory: &str,
    profile: &Profile,
    catalog_result: std::result::Result<Vec<Track>, Error>,
) -> Result<Recommendation> {
    let target = score(category, subcategory, profile)?;

    let (asset_id, matched_track) = match catalog_result {
        Ok(tracks) => {
            let track = match_track(&target, &tracks);
            (track.asset_id.clone(), Some(track))
        }
        Err(e) => {
            warn!("Catalog unavailable ({e}); using default asset");
            (catalog::FALLBACK_ASSET_ID.to_string(), None)
        }
    };

    Ok(Recommendation {
        hz: target.hz,
        bpm: target.bpm,
        energy: target.energy,
        rhythm: target.rhythm,
        asset_id,
        matched_track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(asset_id: &str, bpm: f64, hz: f64, energy: f64) -> Track {
        Track {
            bpm,
            hz,
            energy,
            asset_id: asset_id.to_string(),
        }
    }

    #[test]
    fn test_zero_correction_invariant() {
        // Every dimension unrecognized: the target must equal the base
        // signal exactly.
        let profile = Profile {
            gender: "unknown".into(),
            age_group: "unknown".into(),
            blood_type: "unknown".into(),
            space: "unknown".into(),
            device: "unknown".into(),
        };

        let target = score("mindfulness", "mindfulness_meditation", &profile).unwrap();
        let base = crate::tuning::base_signal("mindfulness", "mindfulness_meditation").unwrap();

        assert_eq!(target.hz, base.hz);
        assert_eq!(target.bpm, base.bpm);
        assert_eq!(target.energy, base.energy);
        assert_eq!(target.rhythm, base.rhythm);
    }

    #[test]
    fn test_reference_correction_sum() {
        // Worked example: base {200, 60, 0.5, 0.5}, gender M adds
        // {hz: 0.2, energy: 0.05, rhythm: 0.1}, age 10-20 adds
        // {hz: 0.3, bpm: 3, energy: 0.15, rhythm: 0.2}.
        let profile = Profile {
            gender: "M".into(),
            age_group: "10-20".into(),
            blood_type: "unknown".into(),
            space: "unknown".into(),
            device: "unknown".into(),
        };

        let target = score("mindfulness", "Mindfulness Meditation", &profile).unwrap();
        assert!((target.hz - 200.5).abs() < 1e-9);
        assert!((target.bpm - 63.0).abs() < 1e-9);
        assert!((target.energy - 0.7).abs() < 1e-9);
        assert!((target.rhythm - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_selection_is_match_not_found() {
        let err = score("mindfulness", "astral projection", &Profile::default()).unwrap_err();
        assert_eq!(err.category(), "match-not-found");
    }

    #[test]
    fn test_match_track_picks_nearest() {
        let target = TargetSignal {
            hz: 200.0,
            bpm: 60.0,
            energy: 0.5,
            rhythm: 0.5,
        };
        let tracks = vec![
            track("far", 120.0, 400.0, 0.9),
            track("near", 61.0, 201.0, 0.5),
            track("mid", 80.0, 230.0, 0.6),
        ];

        assert_eq!(match_track(&target, &tracks).asset_id, "near");
    }

    #[test]
    fn test_match_track_is_deterministic_and_first_wins_on_tie() {
        let target = TargetSignal {
            hz: 200.0,
            bpm: 60.0,
            energy: 0.5,
            rhythm: 0.5,
        };
        // Two tracks equidistant from the target.
        let tracks = vec![
            track("first", 60.0, 210.0, 0.5),
            track("second", 60.0, 190.0, 0.5),
        ];

        for _ in 0..10 {
            assert_eq!(match_track(&target, &tracks).asset_id, "first");
        }
    }

    #[test]
    fn test_empty_catalog_falls_back() {
        let target = TargetSignal {
            hz: 200.0,
            bpm: 60.0,
            energy: 0.5,
            rhythm: 0.5,
        };
        let chosen = match_track(&target, &[]);
        assert_eq!(chosen.asset_id, crate::catalog::FALLBACK_ASSET_ID);
    }

    #[test]
    fn test_rhythm_excluded_from_matching() {
        let target = TargetSignal {
            hz: 200.0,
            bpm: 60.0,
            energy: 0.5,
            rhythm: 0.9,
        };
        // Identical on the three matched axes; rhythm must not break the
        // tie in favour of the second entry.
        let tracks = vec![
            track("a", 60.0, 200.0, 0.5),
            track("b", 60.0, 200.0, 0.5),
        ];
        assert_eq!(match_track(&target, &tracks).asset_id, "a");
    }

    #[test]
    fn test_recommend_degrades_on_catalog_failure() {
        let rec = recommend(
            "sleep",
            "deep sleep",
            &Profile::default(),
            Err(Error::Config("missing catalog".into())),
        )
        .unwrap();

        assert_eq!(rec.asset_id, crate::catalog::FALLBACK_ASSET_ID);
        assert!(rec.matched_track.is_none());
        // Signal is still the best-effort computed one.
        assert!(rec.hz > 0.0);
    }
}
