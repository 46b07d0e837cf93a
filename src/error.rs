//! Error types for Attune
//!
//! Defines the crate-wide error taxonomy using thiserror. Each variant maps
//! to a distinct user-facing failure category so the CLI and the playback
//! orchestrator can react differently to each:
//!
//! - `Validation`: required selection fields missing, blocks generation
//! - `MatchNotFound`: no base tuning entry, blocks generation, not retried
//! - `AssetLoad`: audio fetch/decode failure, retriable, playback halted
//! - `Synthesis`: audio engine unavailable, needs a fresh user action,
//!   not fatal to primary playback

use thiserror::Error;

/// Main error type for the attune library
#[derive(Error, Debug)]
pub enum Error {
    /// Required selection fields are missing or empty
    #[error("Missing required field: {0}")]
    Validation(String),

    /// No base tuning entry exists for the requested pair
    #[error("No tuning entry for category '{category}' / subcategory '{subcategory}'")]
    MatchNotFound {
        category: String,
        subcategory: String,
    },

    /// Audio asset could not be fetched or decoded
    #[error("Failed to load audio asset '{0}': {1}")]
    AssetLoad(String, String),

    /// Tone generation is unavailable (no output device, engine blocked)
    #[error("Audio synthesis unavailable: {0}")]
    Synthesis(String),

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl Error {
    /// Short category label surfaced to the user alongside the message.
    /// The orchestrator stores this when downgrading a failure to the
    /// `Errored` state.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::MatchNotFound { .. } => "match-not-found",
            Error::AssetLoad(..) => "asset-load",
            Error::Synthesis(_) => "synthesis",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Snapshot(_) => "snapshot",
        }
    }

    /// Whether the user can sensibly retry the same action.
    pub fn retriable(&self) -> bool {
        matches!(self, Error::AssetLoad(..) | Error::Synthesis(_) | Error::Io(_))
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_are_distinct() {
        let errors = vec![
            Error::Validation("category".into()),
            Error::MatchNotFound {
                category: "sleep".into(),
                subcategory: "deep_sleep".into(),
            },
            Error::AssetLoad("track01".into(), "404".into()),
            Error::Synthesis("no output device".into()),
        ];

        let categories: std::collections::HashSet<_> =
            errors.iter().map(|e| e.category()).collect();
        assert_eq!(categories.len(), errors.len());
    }

    #[test]
    fn test_match_not_found_message_names_both_keys() {
        let err = Error::MatchNotFound {
            category: "study".into(),
            subcategory: "deep_focus".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("study"));
        assert!(msg.contains("deep_focus"));
    }

    #[test]
    fn test_asset_load_is_retriable_but_match_miss_is_not() {
        assert!(Error::AssetLoad("a".into(), "b".into()).retriable());
        assert!(!Error::MatchNotFound {
            category: "a".into(),
            subcategory: "b".into()
        }
        .retriable());
    }
}
