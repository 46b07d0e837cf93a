//! Rodio-backed audio output.
//!
//! Implements the orchestrator's backend traits over [`rodio`] sinks:
//! one sink per layer (primary track, each ambience bed) and one sink
//! for the binaural tone pair. Resolved asset URLs are treated as local
//! paths (an optional `file://` prefix is stripped); the CLI points the
//! asset base at a local directory.

use crate::binaural::BinauralTones;
use crate::error::{Error, Result};
use crate::session::{AudioBackend, AudioLayer, ToneHandle};
use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

/// Audio device handle shared by all sinks of a process
pub struct RodioBackend {
    // Dropping the stream kills every sink attached to it.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Synthesis`] when no output device is available,
    /// the same category the orchestrator uses for tone failures: both
    /// mean the audio engine is unreachable.
    pub fn try_default() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| Error::Synthesis(format!("no audio output device: {e}")))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    fn open_decoder(path: &PathBuf) -> Result<Decoder<BufReader<File>>> {
        let file = File::open(path)
            .map_err(|e| Error::AssetLoad(path.display().to_string(), e.to_string()))?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| Error::AssetLoad(path.display().to_string(), e.to_string()))
    }
}

fn url_to_path(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
}

/// One decoded audio file playing through its own sink
pub struct RodioLayer {
    path: PathBuf,
    sink: Sink,
    native_duration: Option<Duration>,
    looping: bool,
}

impl RodioLayer {
    fn refill(&mut self) -> Result<()> {
        let decoder = RodioBackend::open_decoder(&self.path)?;
        if self.looping {
            self.sink.append(decoder.repeat_infinite());
        } else {
            self.sink.append(decoder);
        }
        Ok(())
    }
}

impl AudioLayer for RodioLayer {
    fn play(&mut self) -> Result<()> {
        if self.sink.empty() {
            self.refill()?;
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        if self.sink.empty() {
            self.refill()?;
        }
        self.sink
            .try_seek(Duration::from_secs_f64(position_secs.max(0.0)))
            .map_err(|e| Error::AssetLoad(self.path.display().to_string(), e.to_string()))
    }

    fn position_secs(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    fn native_duration_secs(&self) -> Option<f64> {
        self.native_duration.map(|d| d.as_secs_f64())
    }

    fn set_gain(&mut self, gain: f32) {
        self.sink.set_volume(gain);
    }

    fn has_ended(&self) -> bool {
        self.sink.empty()
    }
}

/// Tone pair playing through one dedicated sink. Stopping is idempotent:
/// rodio tolerates stop on an already-stopped sink, and the generators
/// are recreated from scratch on the next start.
pub struct RodioTones {
    sink: Sink,
}

impl ToneHandle for RodioTones {
    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_gain(&mut self, gain: f32) {
        self.sink.set_volume(gain);
    }
}

impl AudioBackend for RodioBackend {
    type Layer = RodioLayer;
    type Tones = RodioTones;

    fn load(&mut self, url: &str, looping: bool, gain: f32) -> Result<Self::Layer> {
        let path = url_to_path(url);
        let decoder = Self::open_decoder(&path)?;
        let native_duration = decoder.total_duration();

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| Error::AssetLoad(path.display().to_string(), e.to_string()))?;
        sink.set_volume(gain);
        sink.pause();
        if looping {
            sink.append(decoder.repeat_infinite());
        } else {
            sink.append(decoder);
        }

        debug!(
            "Loaded {} ({}), native duration {:?}",
            path.display(),
            if looping { "looping" } else { "one-shot" },
            native_duration
        );
        Ok(RodioLayer {
            path,
            sink,
            native_duration,
            looping,
        })
    }

    fn start_tones(&mut self, carrier_hz: f64, gain: f32) -> Result<Self::Tones> {
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| Error::Synthesis(format!("tone sink unavailable: {e}")))?;
        // The source runs at unit amplitude; the sink volume is the live
        // gain control so later volume changes apply immediately.
        sink.append(BinauralTones::new(carrier_hz, 1.0));
        sink.set_volume(gain);
        Ok(RodioTones { sink })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_to_path_strips_file_scheme() {
        assert_eq!(
            url_to_path("file:///tmp/assets/track.mp3"),
            PathBuf::from("/tmp/assets/track.mp3")
        );
        assert_eq!(
            url_to_path("/var/lib/attune/assets/track.mp3"),
            PathBuf::from("/var/lib/attune/assets/track.mp3")
        );
    }

    #[test]
    fn test_open_decoder_missing_file_is_asset_load() {
        let err = RodioBackend::open_decoder(&PathBuf::from("/no/such/file.mp3"))
            .map(|_| ())
            .unwrap_err();
        assert_eq!(err.category(), "asset-load");
    }
}
