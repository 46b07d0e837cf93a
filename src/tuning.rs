//! # Tuning Tables
//!
//! Static signal-prescription data for the scoring engine.
//!
//! Two kinds of tables live here:
//!
//! - The **base table**: one [`BaseSignal`] per (category, subcategory)
//!   pair, describing the unpersonalized prescription for that practice.
//! - Five **correction tables**, one per profile dimension (gender, age
//!   group, blood type, space, device). Each maps a recognized dimension
//!   value to an additive [`Correction`].
//!
//! Lookup keys are normalized: categories are lowercased, subcategories
//! are lowercased with whitespace collapsed to underscores. Correction
//! values that don't match any table entry contribute zero, never an
//! error. Only a missing base entry is a failure.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unpersonalized signal prescription for a (category, subcategory) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseSignal {
    /// Carrier frequency in Hz
    pub hz: f64,
    /// Beats per minute of the backing track
    pub bpm: f64,
    /// Perceived intensity, 0.0–1.0
    pub energy: f64,
    /// Rhythmic density, 0.0–1.0 (reserved; not used in matching)
    pub rhythm: f64,
}

/// Additive per-dimension adjustment. Every field is optional; an absent
/// field contributes 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub hz: Option<f64>,
    pub bpm: Option<f64>,
    pub energy: Option<f64>,
    pub rhythm: Option<f64>,
}

impl Correction {
    const fn new(hz: f64, bpm: f64, energy: f64, rhythm: f64) -> Self {
        Self {
            hz: Some(hz),
            bpm: Some(bpm),
            energy: Some(energy),
            rhythm: Some(rhythm),
        }
    }
}

/// Normalize a category name for table lookup (lowercase).
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Normalize a subcategory name for table lookup (lowercase, whitespace
/// runs become single underscores).
pub fn normalize_subcategory(subcategory: &str) -> String {
    subcategory
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Look up the base signal for a normalized (category, subcategory) pair.
pub fn base_signal(category: &str, subcategory: &str) -> Option<BaseSignal> {
    let key = (normalize_category(category), normalize_subcategory(subcategory));
    BASE_TABLE.get(&key).copied()
}

/// Look up the correction for one profile dimension. Unrecognized values
/// yield `None`, which the scoring engine treats as a zero correction.
pub fn correction(dimension: Dimension, value: &str) -> Option<Correction> {
    let table = match dimension {
        Dimension::Gender => &*GENDER,
        Dimension::AgeGroup => &*AGE_GROUP,
        Dimension::BloodType => &*BLOOD_TYPE,
        Dimension::Space => &*SPACE,
        Dimension::Device => &*DEVICE,
    };
    table.get(value).copied()
}

/// The five recognized profile dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Gender,
    AgeGroup,
    BloodType,
    Space,
    Device,
}

/// Bucket a raw age into the age-group key used by the correction table.
pub fn age_group_for(age: u32) -> &'static str {
    match age {
        0..=20 => "10-20",
        21..=30 => "21-30",
        31..=40 => "31-40",
        41..=50 => "41-50",
        51..=60 => "51-60",
        61..=70 => "61-70",
        _ => "70+",
    }
}

lazy_static! {
    /// Base prescriptions keyed by normalized (category, subcategory)
    static ref BASE_TABLE: HashMap<(String, String), BaseSignal> = {
        let mut t = HashMap::new();
        let mut put = |cat: &str, sub: &str, hz: f64, bpm: f64, energy: f64, rhythm: f64| {
            t.insert(
                (cat.to_string(), sub.to_string()),
                BaseSignal { hz, bpm, energy, rhythm },
            );
        };

        // Mindfulness
        put("mindfulness", "mindfulness_meditation", 200.0, 60.0, 0.5, 0.5);
        put("mindfulness", "body_scan", 180.0, 54.0, 0.4, 0.4);
        put("mindfulness", "breath_awareness", 190.0, 56.0, 0.4, 0.45);
        put("mindfulness", "nature_connection", 210.0, 62.0, 0.5, 0.5);
        put("mindfulness", "cosmic_connection", 220.0, 58.0, 0.45, 0.4);
        put("mindfulness", "transcendental_meditation", 170.0, 52.0, 0.35, 0.35);
        put("mindfulness", "focused_attention", 240.0, 66.0, 0.55, 0.5);

        // Sleep
        put("sleep", "deep_sleep", 110.0, 42.0, 0.2, 0.2);
        put("sleep", "falling_asleep", 130.0, 46.0, 0.25, 0.25);
        put("sleep", "power_nap", 150.0, 50.0, 0.3, 0.3);
        put("sleep", "lucid_dreaming", 140.0, 48.0, 0.3, 0.35);

        // Study
        put("study", "deep_focus", 260.0, 70.0, 0.6, 0.55);
        put("study", "memorization", 250.0, 68.0, 0.55, 0.5);
        put("study", "reading", 230.0, 64.0, 0.5, 0.45);
        put("study", "creative_thinking", 270.0, 72.0, 0.6, 0.6);

        // Work
        put("work", "productivity", 280.0, 76.0, 0.65, 0.6);
        put("work", "stress_relief", 190.0, 56.0, 0.4, 0.4);
        put("work", "short_break", 210.0, 60.0, 0.45, 0.45);

        // Exercise
        put("exercise", "warm_up", 320.0, 90.0, 0.7, 0.7);
        put("exercise", "endurance", 360.0, 104.0, 0.8, 0.8);
        put("exercise", "cool_down", 200.0, 58.0, 0.4, 0.4);
        put("exercise", "yoga", 180.0, 52.0, 0.35, 0.4);

        // Emotion
        put("emotion", "calming_anxiety", 160.0, 50.0, 0.3, 0.3);
        put("emotion", "lifting_mood", 300.0, 80.0, 0.65, 0.65);
        put("emotion", "releasing_anger", 220.0, 62.0, 0.5, 0.5);

        // Love
        put("love", "self_compassion", 190.0, 56.0, 0.4, 0.45);
        put("love", "loving_kindness", 200.0, 58.0, 0.45, 0.5);

        // Spirituality
        put("spirituality", "chakra_alignment", 230.0, 60.0, 0.5, 0.5);
        put("spirituality", "inner_silence", 150.0, 48.0, 0.3, 0.3);
        put("spirituality", "gratitude", 210.0, 60.0, 0.5, 0.5);

        t
    };

    /// Gender corrections
    static ref GENDER: HashMap<&'static str, Correction> = HashMap::from([
        ("M", Correction::new(0.2, 0.0, 0.05, 0.1)),
        ("F", Correction::new(-0.1, -2.0, -0.05, -0.05)),
    ]);

    /// Age-group corrections (bucketed decade ranges)
    static ref AGE_GROUP: HashMap<&'static str, Correction> = HashMap::from([
        ("10-20", Correction::new(0.3, 3.0, 0.15, 0.2)),
        ("21-30", Correction::new(0.1, 1.0, 0.10, 0.1)),
        ("31-40", Correction::new(0.0, 0.0, 0.0, 0.0)),
        ("41-50", Correction::new(-0.1, -1.0, -0.05, -0.05)),
        ("51-60", Correction::new(-0.2, -2.0, -0.10, -0.1)),
        ("61-70", Correction::new(-0.3, -3.0, -0.15, -0.15)),
        ("70+", Correction::new(-0.4, -4.0, -0.20, -0.2)),
    ]);

    /// Blood-type corrections
    static ref BLOOD_TYPE: HashMap<&'static str, Correction> = HashMap::from([
        ("A", Correction::new(0.1, 1.0, 0.05, 0.05)),
        ("B", Correction::new(-0.1, -1.0, -0.05, -0.05)),
        ("AB", Correction::new(0.2, 2.0, 0.10, 0.1)),
        ("O", Correction::new(0.0, 0.0, 0.0, 0.0)),
    ]);

    /// Listening-space corrections
    static ref SPACE: HashMap<&'static str, Correction> = HashMap::from([
        ("Indoor", Correction::new(0.0, 0.0, 0.0, 0.0)),
        ("Outdoor", Correction::new(0.2, 2.0, 0.10, 0.1)),
    ]);

    /// Playback-device corrections
    static ref DEVICE: HashMap<&'static str, Correction> = HashMap::from([
        ("Phone Speaker", Correction::new(0.0, 0.0, 0.0, 0.0)),
        ("Earphones", Correction::new(0.1, 0.0, 0.05, 0.0)),
        ("External Speaker", Correction::new(0.2, 1.0, 0.10, 0.05)),
    ]);
}
