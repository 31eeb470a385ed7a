//! Clip preview playback contracts and the simulated sink.
//!
//! The sink owns the platform playable resource (the original app cached an
//! audio element bound to a blob URL). `unload` releases it; the recorder
//! calls that on reset and before any superseding load.

use crate::recorder::AudioClip;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Recoverable playback failure; never affects the captured buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackError {
    pub reason: String,
}

impl Display for PlaybackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "playback failed: {}", self.reason)
    }
}

impl Error for PlaybackError {}

/// The platform audio-output seam.
pub trait PlaybackSink {
    /// Starts or resumes playback of the clip, loading it if necessary.
    fn begin(&mut self, clip: &AudioClip) -> Result<(), PlaybackError>;

    /// Pauses playback, keeping the loaded resource.
    fn pause(&mut self);

    /// Releases the loaded playable resource, if any.
    fn unload(&mut self);
}

/// Stand-in sink for tests and headless use; records lifecycle counters.
#[derive(Debug, Default)]
pub struct SimulatedPlayback {
    fail_next_begin: Option<String>,
    loaded: bool,
    playing: bool,
    begin_count: u32,
    unload_count: u32,
}

impl SimulatedPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `begin` call fail with the given reason.
    pub fn fail_next_begin(&mut self, reason: impl Into<String>) {
        self.fail_next_begin = Some(reason.into());
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn begin_count(&self) -> u32 {
        self.begin_count
    }

    pub fn unload_count(&self) -> u32 {
        self.unload_count
    }
}

impl PlaybackSink for SimulatedPlayback {
    fn begin(&mut self, _clip: &AudioClip) -> Result<(), PlaybackError> {
        if let Some(reason) = self.fail_next_begin.take() {
            return Err(PlaybackError { reason });
        }
        self.loaded = true;
        self.playing = true;
        self.begin_count += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn unload(&mut self) {
        if self.loaded {
            self.unload_count += 1;
        }
        self.loaded = false;
        self.playing = false;
    }
}
