//! # Playback Orchestrator
//!
//! Owns the full lifecycle of one listening session: the looping primary
//! track, up to two ambience layers, and the binaural tone pair.
//!
//! ## State machine
//!
//! ```text
//! Idle ──begin──▶ Loading ──metadata──▶ Playing ◀──▶ Paused
//!                    │                     │
//!                    │ load error          │ duration reached / stop
//!                    ▼                     ▼
//!                 Errored               Stopped
//! ```
//!
//! Forbidden combinations (Playing with no loaded asset, two live tone
//! pairs, orphaned sources after an error) are unrepresentable: every
//! audio handle lives inside the single [`ActiveSession`] owned by the
//! orchestrator, and entering a terminal state drops them.
//!
//! ## Duration extension
//!
//! The user picks a session length independent of the primary asset's
//! native length. On each natural end-of-track the orchestrator seeks
//! back to zero and resumes until the accumulated elapsed time covers the
//! request. Elapsed time is always derived as
//!
//! ```text
//! floor(total / native) * native + current_position
//! ```
//!
//! i.e. whole loops at full native length plus the current partial
//! position. Deriving it this way (rather than accumulating raw position
//! deltas) keeps the global timeline consistent when the user seeks
//! mid-loop.
//!
//! ## Scheduling
//!
//! Single-threaded and cooperative: the host drives the orchestrator from
//! its event loop via [`Orchestrator::tick`] (~1 Hz) and the end-of-track
//! callback. The tick is guarded against re-entrancy (a tick arriving
//! while one runs is skipped, not queued) and a stop or pause always wins
//! over a pending auto-loop resume because the resume re-checks state.

use crate::binaural;
use crate::catalog;
use crate::error::{Error, Result};
use crate::scoring::TargetSignal;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Reconciliation tick cadence the host should aim for.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delay between primary playback start and tone start, covering the
/// platform audio-engine settling window.
pub const SYNTH_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Native length assumed when the primary asset reports no duration.
pub const DEFAULT_NATIVE_DURATION_SECS: f64 = 450.0;

/// Session playback states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Paused,
    Stopped,
    Errored,
}

/// The three user-controllable volume channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChannel {
    Music,
    Ambience,
    Binaural,
}

/// Per-channel volumes on the 0–100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volumes {
    pub music: u8,
    pub ambience: u8,
    pub binaural: u8,
}

impl Default for Volumes {
    fn default() -> Self {
        Self {
            music: 50,
            ambience: 50,
            binaural: 50,
        }
    }
}

fn layer_gain(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 100.0
}

/// One playable audio source (primary track or ambience layer).
///
/// Implementations wrap the real audio backend; tests substitute fakes.
/// Positions and durations are in seconds.
pub trait AudioLayer {
    /// Start or resume playback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] when the underlying source cannot
    /// (re)start.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn stop(&mut self);
    /// Seek to an absolute in-asset position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] when the source cannot seek.
    fn seek(&mut self, position_secs: f64) -> Result<()>;
    fn position_secs(&self) -> f64;
    /// Native asset duration, when the metadata exposes one.
    fn native_duration_secs(&self) -> Option<f64>;
    fn set_gain(&mut self, gain: f32);
    /// Whether the source drained naturally (end of track).
    fn has_ended(&self) -> bool;
}

/// Handle over a live tone pair. `stop` must be idempotent and safe on a
/// never-started pair; the generators are one-shot, so a fresh pair is
/// created on every (re)start rather than resumed.
pub trait ToneHandle {
    fn stop(&mut self);
    fn set_gain(&mut self, gain: f32);
}

/// Factory for the concrete audio sources of one session.
pub trait AudioBackend {
    type Layer: AudioLayer;
    type Tones: ToneHandle;

    /// Load one audio source from its resolved URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] on fetch/decode failure.
    fn load(&mut self, url: &str, looping: bool, gain: f32) -> Result<Self::Layer>;

    /// Start a fresh tone pair at the given carrier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Synthesis`] when the audio engine is
    /// unavailable.
    fn start_tones(&mut self, carrier_hz: f64, gain: f32) -> Result<Self::Tones>;
}

/// Everything needed to start a session. Produced by the scoring engine
/// or restored from a snapshot (skipping re-scoring).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    pub target: TargetSignal,
    pub track: catalog::Track,
    /// Ambience display names as selected by the user (0–2 effective).
    pub ambience: Vec<String>,
    pub requested_duration_secs: f64,
    /// Billing plan flag, consumed opaquely (never computed here).
    pub plan: Option<String>,
}

/// Published session status for the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: PlaybackState,
    pub total_elapsed_secs: f64,
    pub requested_duration_secs: f64,
    pub native_duration_secs: f64,
    /// Completed natural play-throughs of the primary asset
    pub loop_count: u32,
    pub volumes: Volumes,
}

/// Live resources and bookkeeping of the one active session
struct ActiveSession<B: AudioBackend> {
    target: TargetSignal,
    requested_secs: f64,
    native_secs: f64,
    total_elapsed: f64,
    loop_count: u32,
    volumes: Volumes,
    primary: B::Layer,
    ambience: Vec<B::Layer>,
    tones: Option<B::Tones>,
    /// Deferred tone start deadline; `None` once fired or while paused
    tones_due: Option<Instant>,
}

impl<B: AudioBackend> ActiveSession<B> {
    fn stop_all(&mut self) {
        self.primary.stop();
        for layer in &mut self.ambience {
            layer.stop();
        }
        self.stop_tones();
    }

    fn stop_tones(&mut self) {
        self.tones_due = None;
        if let Some(mut tones) = self.tones.take() {
            tones.stop();
        }
    }

    /// Exactly one tone pair may be live: any previous pair is fully
    /// stopped before a new one starts.
    fn start_tones(&mut self, backend: &mut B) -> Result<()> {
        self.stop_tones();
        let carrier = binaural::carrier_hz(self.target.hz);
        let gain = binaural::tone_gain(self.volumes.binaural);
        self.tones = Some(backend.start_tones(carrier, gain)?);
        debug!("Tone pair started at {carrier:.1} Hz");
        Ok(())
    }
}

/// Orchestrates one session's sources over an audio backend.
pub struct Orchestrator<B: AudioBackend> {
    backend: B,
    asset_base_url: String,
    state: PlaybackState,
    session: Option<ActiveSession<B>>,
    /// Categorized message for the Errored state
    error: Option<(String, String)>,
    /// Re-entrancy guard for the reconciliation tick
    tick_in_progress: bool,
}

impl<B: AudioBackend> Orchestrator<B> {
    pub fn new(backend: B, asset_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            asset_base_url: asset_base_url.into(),
            state: PlaybackState::Idle,
            session: None,
            error: None,
            tick_in_progress: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Category and message of the last terminal error, if any.
    pub fn error(&self) -> Option<(&str, &str)> {
        self.error
            .as_ref()
            .map(|(category, message)| (category.as_str(), message.as_str()))
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.session.as_ref().map(|s| SessionStatus {
            state: self.state,
            total_elapsed_secs: s.total_elapsed,
            requested_duration_secs: s.requested_secs,
            native_duration_secs: s.native_secs,
            loop_count: s.loop_count,
            volumes: s.volumes,
        })
    }

    /// Start a session: tears down any previous session's resources
    /// synchronously, loads the primary track and ambience layers, and
    /// schedules the tone start after the settling delay.
    ///
    /// Per-layer ambience failures are isolated and non-fatal; a primary
    /// load failure is terminal and releases everything already started.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] when the primary asset cannot be
    /// loaded; the orchestrator is left in the `Errored` state.
    pub fn begin(&mut self, params: SessionParams, volumes: Volumes) -> Result<()> {
        self.begin_at(params, volumes, Instant::now())
    }

    fn begin_at(&mut self, params: SessionParams, volumes: Volumes, now: Instant) -> Result<()> {
        // No two sessions may hold live handles.
        self.teardown();
        self.state = PlaybackState::Loading;
        self.error = None;

        let primary_url = catalog::asset_url(&self.asset_base_url, &params.track.asset_id);
        info!("Loading primary track {}", params.track.asset_id);

        let mut primary = match self
            .backend
            .load(&primary_url, false, layer_gain(volumes.music))
        {
            Ok(layer) => layer,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        let native_secs = primary
            .native_duration_secs()
            .unwrap_or(DEFAULT_NATIVE_DURATION_SECS);

        // Ambience is cosmetic: unknown names were already dropped by
        // resolution, and load failures only cost that one layer.
        let mut ambience = Vec::new();
        for asset_id in catalog::resolve_ambience(&params.ambience) {
            let url = catalog::asset_url(&self.asset_base_url, &asset_id);
            match self
                .backend
                .load(&url, true, layer_gain(volumes.ambience))
            {
                Ok(mut layer) => {
                    if let Err(e) = layer.play() {
                        warn!("Ambience layer '{asset_id}' failed to start: {e}");
                    } else {
                        ambience.push(layer);
                    }
                }
                Err(e) => warn!("Ambience layer '{asset_id}' failed to load: {e}"),
            }
        }

        if let Err(e) = primary.play() {
            self.fail(&e);
            return Err(e);
        }

        self.session = Some(ActiveSession {
            target: params.target,
            requested_secs: params.requested_duration_secs,
            native_secs,
            total_elapsed: 0.0,
            loop_count: 0,
            volumes,
            primary,
            ambience,
            tones: None,
            tones_due: Some(now + SYNTH_SETTLE_DELAY),
        });
        self.state = PlaybackState::Playing;
        info!(
            "Session started: {:.0}s requested over {native_secs:.0}s native",
            params.requested_duration_secs
        );
        Ok(())
    }

    /// Reconciliation tick. Recomputes the published elapsed time, fires
    /// the deferred tone start, and forces a stop once the requested
    /// duration is reached. Re-entrant invocations are skipped.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.tick_in_progress {
            debug!("Skipping re-entrant tick");
            return;
        }
        self.tick_in_progress = true;
        self.run_tick(now);
        self.tick_in_progress = false;
    }

    fn run_tick(&mut self, now: Instant) {
        if self.state != PlaybackState::Playing {
            return;
        }

        // Polling hosts have no end-of-track event; detect the drained
        // source here and run the same loop-or-stop policy.
        let ended = self
            .session
            .as_ref()
            .is_some_and(|s| s.primary.has_ended());
        if ended {
            self.handle_track_ended();
            if self.state != PlaybackState::Playing {
                return;
            }
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(due) = session.tones_due {
            if now >= due {
                session.tones_due = None;
                if let Err(e) = session.start_tones(&mut self.backend) {
                    // Synthesis loss is surfaced but never fatal to the
                    // primary playback.
                    warn!("Tone start failed ({}): {e}", e.category());
                }
            }
        }

        // Whole loops at full native length, plus the current partial
        // position. Never the other way around.
        let position = session.primary.position_secs();
        let completed = (session.total_elapsed / session.native_secs).floor();
        session.total_elapsed = completed * session.native_secs + position;

        if session.total_elapsed >= session.requested_secs {
            session.total_elapsed = session.requested_secs;
            info!("Requested duration reached; stopping session");
            self.stop();
        }
    }

    /// Natural end-of-track callback for the primary asset. Loops while
    /// the accumulated time is short of the request, otherwise stops.
    ///
    /// A stop or pause issued before this fires wins: the loop-resume is
    /// abandoned whenever the state is no longer `Playing`.
    pub fn handle_track_ended(&mut self) {
        if self.state != PlaybackState::Playing {
            debug!("Ignoring end-of-track outside Playing state");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let completed = (session.total_elapsed / session.native_secs).floor();
        session.total_elapsed = (completed + 1.0) * session.native_secs;
        // One full natural play-through of the asset.
        session.loop_count += 1;

        if session.total_elapsed < session.requested_secs {
            let loops = session.loop_count;
            debug!(
                "Looping primary track (cycle #{loops}, {:.0}s elapsed)",
                session.total_elapsed
            );
            let resumed = session
                .primary
                .seek(0.0)
                .and_then(|()| session.primary.play());
            if let Err(e) = resumed {
                self.fail(&e);
            }
        } else {
            session.total_elapsed = session.total_elapsed.min(session.requested_secs);
            self.stop();
        }
    }

    /// Suspend all sources. The tone pair is stopped outright (one-shot
    /// generators) and recreated on resume.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.primary.pause();
            for layer in &mut session.ambience {
                layer.pause();
            }
            session.stop_tones();
        }
        self.state = PlaybackState::Paused;
        info!("Session paused");
    }

    /// Resume a paused session, recreating the tone pair after a fresh
    /// settling delay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] when the primary source cannot
    /// resume; the orchestrator transitions to `Errored`.
    pub fn resume(&mut self) -> Result<()> {
        self.resume_at(Instant::now())
    }

    pub fn resume_at(&mut self, now: Instant) -> Result<()> {
        if self.state != PlaybackState::Paused {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        if let Err(e) = session.primary.play() {
            self.fail(&e);
            return Err(e);
        }
        for layer in &mut session.ambience {
            // Ambience resume failures stay isolated, same as at load.
            if let Err(e) = layer.play() {
                warn!("Ambience layer failed to resume: {e}");
            }
        }
        session.tones_due = Some(now + SYNTH_SETTLE_DELAY);
        self.state = PlaybackState::Playing;
        info!("Session resumed");
        Ok(())
    }

    /// Stop the session and release every source. Elapsed time freezes
    /// at its current value.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.stop_all();
        }
        if !matches!(self.state, PlaybackState::Idle | PlaybackState::Errored) {
            self.state = PlaybackState::Stopped;
            info!("Session stopped");
        }
    }

    /// Seek by a fraction of the nominal session length. Positions past
    /// the asset's native end wrap modulo the native duration while the
    /// reported elapsed time keeps the full unwrapped target, preserving
    /// the illusion of one continuous long track.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetLoad`] when the primary source cannot seek.
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<()> {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        let fraction = fraction.clamp(0.0, 1.0);
        let target = session.requested_secs * fraction;
        let in_asset = if target > session.native_secs {
            target % session.native_secs
        } else {
            target
        };

        session.primary.seek(in_asset)?;
        session.total_elapsed = target;
        debug!("Seek to {target:.1}s (in-asset {in_asset:.1}s)");
        Ok(())
    }

    /// Apply a volume change to live sources immediately, independent of
    /// play/pause state.
    pub fn set_volume(&mut self, channel: VolumeChannel, volume: u8) {
        let volume = volume.min(100);
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match channel {
            VolumeChannel::Music => {
                session.volumes.music = volume;
                session.primary.set_gain(layer_gain(volume));
            }
            VolumeChannel::Ambience => {
                session.volumes.ambience = volume;
                for layer in &mut session.ambience {
                    layer.set_gain(layer_gain(volume));
                }
            }
            VolumeChannel::Binaural => {
                session.volumes.binaural = volume;
                if let Some(tones) = session.tones.as_mut() {
                    tones.set_gain(binaural::tone_gain(volume));
                }
            }
        }
    }

    /// Transition to `Errored`, guaranteeing no orphaned audio.
    fn fail(&mut self, error: &Error) {
        if let Some(session) = self.session.as_mut() {
            session.stop_all();
        }
        self.error = Some((error.category().to_string(), error.to_string()));
        self.state = PlaybackState::Errored;
        warn!("Session errored ({}): {error}", error.category());
    }

    /// Release the previous session's resources synchronously.
    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop_all();
        }
        self.state = PlaybackState::Idle;
        self.tick_in_progress = false;
    }
}
