//! Real audio output through `rodio`: one sink per voice, all mixed into the
//! default output device.
//!
//! The registry side and the audio thread share each voice's targets through
//! lock-free floats. The source glides towards new targets linearly and
//! fades itself out when a ramped release is requested.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use atomic_float::AtomicF32;
use log::{debug, info};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use super::{Release, VoiceBackend, VoiceParams, Waveform};
use crate::error::AudioError;

const SAMPLE_RATE: u32 = 44_100;
/// Release time value meaning "still sounding".
const NOT_RELEASED: f32 = -1.0;

/// Targets written by the registry, read by the audio thread.
struct VoiceControl {
    frequency: AtomicF32,
    gain: AtomicF32,
    release_secs: AtomicF32,
}

impl VoiceControl {
    fn new(params: VoiceParams) -> Self {
        Self {
            frequency: AtomicF32::new(params.frequency),
            gain: AtomicF32::new(params.gain),
            release_secs: AtomicF32::new(NOT_RELEASED),
        }
    }
}

/// Endless oscillator for a single shape.
struct VoiceSource {
    control: Arc<VoiceControl>,
    waveform: Waveform,
    phase: f32,
    frequency: Glide,
    gain: Glide,
    glide_samples: f32,
    fade: Option<(f32, f32)>, // (samples left, total)
}

/// Linear ramp towards the most recently seen target.
struct Glide {
    current: f32,
    target: f32,
    step: f32,
}

impl Glide {
    fn new(value: f32) -> Self {
        Self { current: value, target: value, step: 0.0 }
    }

    fn advance(&mut self, target: f32, glide_samples: f32) -> f32 {
        if target != self.target {
            self.target = target;
            self.step = if glide_samples >= 1.0 {
                (target - self.current) / glide_samples
            } else {
                target - self.current
            };
        }
        if self.current != self.target {
            let next = self.current + self.step;
            let overshoot = (self.step > 0.0 && next >= self.target) || (self.step < 0.0 && next <= self.target);
            self.current = if overshoot || self.step == 0.0 { self.target } else { next };
        }
        self.current
    }
}

impl VoiceSource {
    fn new(control: Arc<VoiceControl>, params: VoiceParams, glide: Duration) -> Self {
        Self {
            control,
            waveform: params.waveform,
            phase: 0.0,
            frequency: Glide::new(params.frequency),
            gain: Glide::new(params.gain),
            glide_samples: glide.as_secs_f32() * SAMPLE_RATE as f32,
            fade: None,
        }
    }
}

impl Iterator for VoiceSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fade.is_none() {
            let release = self.control.release_secs.load(Ordering::Relaxed);
            if release >= 0.0 {
                // Whole samples; a ramp shorter than one sample ends the voice now.
                let total = (release * SAMPLE_RATE as f32).round();
                self.fade = Some((total, total));
            }
        }

        let envelope = match &mut self.fade {
            Some((left, total)) => {
                if *left < 1.0 {
                    return None;
                }
                *left -= 1.0;
                *left / *total
            }
            None => 1.0,
        };

        let freq = self.frequency.advance(self.control.frequency.load(Ordering::Relaxed), self.glide_samples);
        let gain = self.gain.advance(self.control.gain.load(Ordering::Relaxed), self.glide_samples);

        let sample = self.waveform.sample(self.phase) * gain * envelope;

        self.phase += freq / SAMPLE_RATE as f32;
        self.phase -= self.phase.floor();

        Some(sample)
    }
}

impl Source for VoiceSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None // Runs until released
    }
}

/// A sounding voice: its sink plus the shared targets.
pub struct RodioVoice {
    sink: Sink,
    control: Arc<VoiceControl>,
}

/// Backend that plays every voice on the default output device.
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    glide: Duration,
    master_volume: f32,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn new(glide: Duration, master_volume: f32) -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::NoOutputDevice(e.to_string()))?;
        info!("audio output opened (glide {:?}, volume {:.0}%)", glide, master_volume * 100.0);
        Ok(Self {
            _stream: stream,
            handle,
            glide,
            master_volume: master_volume.clamp(0.0, 2.0),
        })
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }
}

impl VoiceBackend for RodioBackend {
    type Voice = RodioVoice;

    fn start(&mut self, params: VoiceParams) -> Result<RodioVoice, AudioError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::Sink(e.to_string()))?;
        let control = Arc::new(VoiceControl::new(params));
        sink.set_volume(self.master_volume);
        sink.append(VoiceSource::new(Arc::clone(&control), params, self.glide));
        debug!("voice started: {} {:.1}Hz gain {:.3}", params.waveform, params.frequency, params.gain);
        Ok(RodioVoice { sink, control })
    }

    fn retune(&mut self, voice: &mut RodioVoice, params: VoiceParams) {
        voice.control.frequency.store(params.frequency, Ordering::Relaxed);
        voice.control.gain.store(params.gain, Ordering::Relaxed);
    }

    fn release(&mut self, voice: RodioVoice, release: Release) {
        match release {
            Release::Ramp(time) => {
                voice.control.release_secs.store(time.as_secs_f32(), Ordering::Relaxed);
                // Let the fade play out; the source ends itself.
                voice.sink.detach();
            }
            Release::Immediate => voice.sink.stop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> VoiceParams {
        VoiceParams { frequency: 440.0, gain: 0.1, waveform: Waveform::Square }
    }

    #[test]
    fn source_runs_until_released() {
        let control = Arc::new(VoiceControl::new(params()));
        let mut source = VoiceSource::new(Arc::clone(&control), params(), Duration::ZERO);
        assert!(source.by_ref().take(10_000).all(|s| s.abs() <= 0.1 + f32::EPSILON));

        control.release_secs.store(0.5, Ordering::Relaxed);
        let tail = source.by_ref().take(30_000).count();
        assert_eq!(tail, 22_050);
        assert!(source.next().is_none());
    }

    #[test]
    fn sub_sample_release_stays_within_gain() {
        for release in [1e-6, 1e-5, 3e-5, 5e-5] {
            let control = Arc::new(VoiceControl::new(params()));
            let mut source = VoiceSource::new(Arc::clone(&control), params(), Duration::ZERO);
            assert_eq!(source.by_ref().take(100).count(), 100);

            control.release_secs.store(release, Ordering::Relaxed);
            let tail: Vec<f32> = source.by_ref().take(100).collect();
            assert!(tail.len() <= 3, "{release}s left {} samples", tail.len());
            assert!(tail.iter().all(|s| s.abs() <= 0.1 + f32::EPSILON), "{release}s: {tail:?}");
            assert!(source.next().is_none());
        }
    }

    #[test]
    fn glide_reaches_target_without_overshoot() {
        let mut g = Glide::new(100.0);
        let mut last = 100.0;
        for _ in 0..20 {
            let v = g.advance(200.0, 10.0);
            assert!(v >= last && v <= 200.0);
            last = v;
        }
        assert_eq!(last, 200.0);
    }

    #[test]
    fn glide_without_time_jumps() {
        let mut g = Glide::new(0.0);
        assert_eq!(g.advance(0.05, 0.0), 0.05);
    }
}
