//! Binaural beat generation.
//!
//! Produces two continuous pure tones, left channel at the carrier
//! frequency and right channel at carrier + [`BEAT_FREQUENCY_HZ`], as a
//! single stereo-interleaved [`rodio::Source`]. The perceived "beat" is
//! the difference between the two ears, so the beat frequency is a fixed
//! engine constant sitting in the alpha entrainment band rather than a
//! user-facing knob.

use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

/// Fixed offset between the two ears, in Hz. Alpha band.
pub const BEAT_FREQUENCY_HZ: f64 = 8.0;

/// Carrier used when the scored target frequency is unusable.
pub const DEFAULT_CARRIER_HZ: f64 = 440.0;

/// Headroom factor applied on top of the user volume so the pure tones
/// sit under the backing track instead of masking it.
const TONE_HEADROOM: f32 = 0.8;

/// Pick the carrier for a scored target frequency, falling back to the
/// default for non-positive or non-finite values.
pub fn carrier_hz(target_hz: f64) -> f64 {
    if target_hz.is_finite() && target_hz > 0.0 {
        target_hz
    } else {
        DEFAULT_CARRIER_HZ
    }
}

/// Map a 0–100 binaural volume to the tone gain.
pub fn tone_gain(volume: u8) -> f32 {
    (f32::from(volume.min(100)) / 100.0) * TONE_HEADROOM
}

/// Infinite stereo source: left ear at `left_freq`, right ear at
/// `right_freq`, each a sine with its own gain, interleaved L/R.
pub struct BinauralTones {
    left_freq: f32,
    right_freq: f32,
    left_gain: f32,
    right_gain: f32,
    sample_rate: u32,
    num_sample: usize,
}

impl BinauralTones {
    /// Build the tone pair for a carrier frequency. Both channels start
    /// at the same gain; per-channel gain stays available for tuning.
    pub fn new(carrier_hz: f64, gain: f32) -> Self {
        Self {
            left_freq: carrier_hz as f32,
            right_freq: (carrier_hz + BEAT_FREQUENCY_HZ) as f32,
            left_gain: gain,
            right_gain: gain,
            sample_rate: 44100,
            num_sample: 0,
        }
    }

    pub fn left_freq(&self) -> f32 {
        self.left_freq
    }

    pub fn right_freq(&self) -> f32 {
        self.right_freq
    }
}

impl Iterator for BinauralTones {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        // Even samples feed the left channel, odd the right; each ear
        // advances through time at half the interleaved sample index.
        let frame = self.num_sample / 2;
        let t = frame as f32 / self.sample_rate as f32;

        let sample = if self.num_sample % 2 == 0 {
            (2.0 * PI * self.left_freq * t).sin() * self.left_gain
        } else {
            (2.0 * PI * self.right_freq * t).sin() * self.right_gain
        };

        self.num_sample = self.num_sample.wrapping_add(1);
        Some(sample)
    }
}

impl Source for BinauralTones {
    fn current_frame_len(&self) -> Option<usize> {
        None // Infinite stream
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
