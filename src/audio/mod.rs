// Voice parameters, the output seam, and the backends behind it
pub mod mapping;
pub mod waveform;
#[cfg(feature = "playback")]
pub mod playback;

use std::time::Duration;

use crate::error::AudioError;

pub use mapping::{frequency_from_y, gain_from_x, Canvas, SoundMapper};
pub use waveform::{ParseWaveformError, Waveform};
#[cfg(feature = "playback")]
pub use playback::{RodioBackend, RodioVoice};

/// What a voice should currently sound like.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoiceParams {
    /// Oscillation frequency in Hz.
    pub frequency: f32,
    /// Linear amplitude, nominally `0..=1`.
    pub gain: f32,
    pub waveform: Waveform,
}

/// How a voice is stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Release {
    /// Fade out over the given time, then stop. Scheduled, never awaited.
    Ramp(Duration),
    /// Cut the voice off now.
    Immediate,
}

/// An audio output able to host one voice per shape.
///
/// Voices are owned by the caller; `release` takes the voice by value, so a
/// released voice cannot be retuned again.
pub trait VoiceBackend {
    type Voice;

    /// Create a voice and start it sounding right away.
    fn start(&mut self, params: VoiceParams) -> Result<Self::Voice, AudioError>;

    /// Move a live voice towards new parameters.
    fn retune(&mut self, voice: &mut Self::Voice, params: VoiceParams);

    /// Stop a voice. Must not block on the release ramp.
    fn release(&mut self, voice: Self::Voice, release: Release);
}

/// Something that happened to a [`SilentBackend`] voice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VoiceEvent {
    Started { voice: u64, params: VoiceParams },
    Retuned { voice: u64, params: VoiceParams },
    Released { voice: u64, release: Release },
}

/// Handle for a voice that exists only on paper.
#[derive(Debug, PartialEq)]
pub struct SilentVoice {
    id: u64,
}

impl SilentVoice {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Headless backend: makes no sound. Counts live voices and, when built
/// with [`SilentBackend::recording`], keeps an event log.
#[derive(Debug, Default)]
pub struct SilentBackend {
    next_voice: u64,
    live: usize,
    record: bool,
    events: Vec<VoiceEvent>,
}

impl SilentBackend {
    /// A backend that keeps no event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that logs every start, retune and release.
    pub fn recording() -> Self {
        Self { record: true, ..Self::default() }
    }

    fn log(&mut self, event: VoiceEvent) {
        if self.record {
            self.events.push(event);
        }
    }

    /// Number of voices started and not yet released.
    pub fn live_voices(&self) -> usize {
        self.live
    }

    pub fn events(&self) -> &[VoiceEvent] {
        &self.events
    }

    /// Ids of released voices, in release order.
    pub fn released(&self) -> impl Iterator<Item = (u64, Release)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            VoiceEvent::Released { voice, release } => Some((voice, release)),
            _ => None,
        })
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl VoiceBackend for SilentBackend {
    type Voice = SilentVoice;

    fn start(&mut self, params: VoiceParams) -> Result<SilentVoice, AudioError> {
        let id = self.next_voice;
        self.next_voice += 1;
        self.live += 1;
        self.log(VoiceEvent::Started { voice: id, params });
        Ok(SilentVoice { id })
    }

    fn retune(&mut self, voice: &mut SilentVoice, params: VoiceParams) {
        self.log(VoiceEvent::Retuned { voice: voice.id, params });
    }

    fn release(&mut self, voice: SilentVoice, release: Release) {
        self.live = self.live.saturating_sub(1);
        self.log(VoiceEvent::Released { voice: voice.id, release });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(frequency: f32) -> VoiceParams {
        VoiceParams { frequency, gain: 0.05, waveform: Waveform::Sine }
    }

    #[test]
    fn silent_backend_tracks_live_voices() {
        let mut backend = SilentBackend::recording();
        let a = backend.start(params(100.0)).unwrap();
        let mut b = backend.start(params(200.0)).unwrap();
        assert_eq!(backend.live_voices(), 2);
        assert_ne!(a.id(), b.id());

        backend.retune(&mut b, params(250.0));
        backend.release(a, Release::Ramp(Duration::from_millis(500)));
        assert_eq!(backend.live_voices(), 1);
        assert_eq!(
            backend.released().collect::<Vec<_>>(),
            vec![(0, Release::Ramp(Duration::from_millis(500)))]
        );
        assert_eq!(backend.events().len(), 4);
        assert_eq!(backend.events()[2], VoiceEvent::Retuned { voice: 1, params: params(250.0) });
    }

    #[test]
    fn plain_backend_keeps_no_log() {
        let mut backend = SilentBackend::new();
        let mut voice = backend.start(params(100.0)).unwrap();
        for i in 0..10_000 {
            backend.retune(&mut voice, params(100.0 + i as f32));
        }
        backend.release(voice, Release::Immediate);
        assert!(backend.events().is_empty());
        assert_eq!(backend.released().count(), 0);
        assert_eq!(backend.live_voices(), 0);
    }
}
