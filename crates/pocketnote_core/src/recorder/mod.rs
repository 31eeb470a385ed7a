//! Voice capture state machine.
//!
//! # Responsibility
//! - Drive `idle -> recording -> stopped -> idle`, with the
//!   `playing <-> paused` sub-state of `stopped`.
//! - Own the microphone/playback resource lifecycle: one capture session at
//!   a time, device released unconditionally on stop, error and teardown.
//!
//! # Invariants
//! - `start` while recording never spawns a second capture.
//! - `stop` releases the microphone immediately, regardless of what happens
//!   to the finalized clip afterward.
//! - Playback never discards the buffer; natural end lands in paused
//!   `stopped`, not `idle`.
//! - The one-second ticker is a sampled monotonic clock, so nothing
//!   periodic survives disposal.

use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub mod capture;
pub mod playback;

pub use capture::{
    negotiate_encoding, AudioEncoding, CaptureError, CaptureStream, MicrophoneSource,
    SimulatedMicrophone,
};
pub use playback::{PlaybackError, PlaybackSink, SimulatedPlayback};

/// Immutable result of one finished capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub encoding: AudioEncoding,
    /// Elapsed capture time in whole seconds.
    pub duration_secs: u32,
}

/// Monotonic seconds source; the recorder samples it instead of running a
/// periodic timer.
pub trait Clock {
    fn seconds(&self) -> u64;
}

/// Wall clock anchored at construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn seconds(&self) -> u64 {
        self.origin.elapsed().as_secs()
    }
}

/// Hand-driven clock for tests and simulations.
///
/// Clones share one time source, so a caller can keep a handle and advance
/// the clock after handing a clone to the recorder.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: u64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn seconds(&self) -> u64 {
        self.seconds.load(Ordering::SeqCst)
    }
}

/// Recoverable recorder failure; the state machine always lands in a
/// well-defined state alongside one of these.
#[derive(Debug)]
pub enum RecorderError {
    /// `start` while a capture session is active.
    AlreadyRecording,
    /// `start` while a finished clip is still held; reset first.
    ClipPending,
    /// Microphone permission denied; recorder is back in `idle`.
    PermissionDenied,
    /// Device-level capture failure other than permission.
    Capture(CaptureError),
    /// The device supports none of the known encodings.
    NoSupportedEncoding,
    /// `play`/`pause` without a held clip.
    NoClip,
    /// Preview playback failed; the clip is intact and still `stopped`.
    Playback(PlaybackError),
}

impl Display for RecorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRecording => write!(f, "a recording session is already active"),
            Self::ClipPending => write!(f, "a finished recording is pending; reset it first"),
            Self::PermissionDenied => write!(f, "microphone access denied"),
            Self::Capture(err) => write!(f, "{err}"),
            Self::NoSupportedEncoding => {
                write!(f, "device supports no known capture encoding")
            }
            Self::NoClip => write!(f, "no recording available"),
            Self::Playback(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecorderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Capture(err) => Some(err),
            Self::Playback(err) => Some(err),
            _ => None,
        }
    }
}

/// Observable recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Idle,
    Recording,
    /// Holding a finished clip; `playing` is the playback sub-state.
    Stopped { playing: bool },
}

enum State {
    Idle,
    Recording {
        stream: Box<dyn CaptureStream>,
        encoding: AudioEncoding,
        started_secs: u64,
    },
    Stopped {
        clip: AudioClip,
        playing: bool,
    },
}

/// Voice capture state machine over injected device seams.
pub struct Recorder<S: MicrophoneSource, P: PlaybackSink, C: Clock> {
    source: S,
    sink: P,
    clock: C,
    state: State,
}

impl<S: MicrophoneSource, P: PlaybackSink, C: Clock> Recorder<S, P, C> {
    pub fn new(source: S, sink: P, clock: C) -> Self {
        Self {
            source,
            sink,
            clock,
            state: State::Idle,
        }
    }

    pub fn phase(&self) -> RecorderPhase {
        match &self.state {
            State::Idle => RecorderPhase::Idle,
            State::Recording { .. } => RecorderPhase::Recording,
            State::Stopped { playing, .. } => RecorderPhase::Stopped { playing: *playing },
        }
    }

    /// Begins a capture session from `idle`.
    ///
    /// Negotiates the encoding from the device's supported list and
    /// acquires the microphone. On permission denial the recorder stays in
    /// `idle` and the caller gets a recoverable error.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        match &self.state {
            State::Recording { .. } => return Err(RecorderError::AlreadyRecording),
            State::Stopped { .. } => return Err(RecorderError::ClipPending),
            State::Idle => {}
        }

        let supported = self.source.supported_encodings();
        let encoding =
            negotiate_encoding(&supported).ok_or(RecorderError::NoSupportedEncoding)?;

        let stream = match self.source.acquire(encoding) {
            Ok(stream) => stream,
            Err(CaptureError::PermissionDenied) => {
                warn!("event=recorder_start module=recorder status=error error_code=permission_denied");
                return Err(RecorderError::PermissionDenied);
            }
            Err(err) => {
                warn!("event=recorder_start module=recorder status=error error_code=capture_failed error={err}");
                return Err(RecorderError::Capture(err));
            }
        };

        let started_secs = self.clock.seconds();
        self.state = State::Recording {
            stream,
            encoding,
            started_secs,
        };
        debug!(
            "event=recorder_start module=recorder status=ok encoding={}",
            encoding.mime()
        );
        Ok(())
    }

    /// Whole seconds elapsed in the active capture session.
    pub fn recording_seconds(&self) -> Option<u64> {
        match &self.state {
            State::Recording { started_secs, .. } => {
                Some(self.clock.seconds().saturating_sub(*started_secs))
            }
            _ => None,
        }
    }

    /// Finalizes the capture into an immutable clip and releases the
    /// microphone. A no-op returning `None` outside `recording`.
    pub fn stop(&mut self) -> Option<AudioClip> {
        let state = std::mem::replace(&mut self.state, State::Idle);
        match state {
            State::Recording {
                stream,
                encoding,
                started_secs,
            } => {
                let elapsed = self.clock.seconds().saturating_sub(started_secs);
                // finish() consumes the stream; the device is free from here
                // on no matter what happens to the clip.
                let data = stream.finish();
                let clip = AudioClip {
                    data,
                    encoding,
                    duration_secs: u32::try_from(elapsed).unwrap_or(u32::MAX),
                };
                debug!(
                    "event=recorder_stop module=recorder status=ok duration_secs={} bytes={}",
                    clip.duration_secs,
                    clip.data.len()
                );
                self.state = State::Stopped {
                    clip: clip.clone(),
                    playing: false,
                };
                Some(clip)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The clip held in `stopped`, if any.
    pub fn clip(&self) -> Option<&AudioClip> {
        match &self.state {
            State::Stopped { clip, .. } => Some(clip),
            _ => None,
        }
    }

    /// Starts or resumes preview playback of the held clip.
    ///
    /// A playback failure leaves the recorder in paused `stopped` with the
    /// clip intact.
    pub fn play(&mut self) -> Result<(), RecorderError> {
        match &mut self.state {
            State::Stopped { clip, playing } => {
                if *playing {
                    return Ok(());
                }
                match self.sink.begin(clip) {
                    Ok(()) => {
                        *playing = true;
                        Ok(())
                    }
                    Err(err) => {
                        warn!(
                            "event=recorder_play module=recorder status=error error={err}"
                        );
                        Err(RecorderError::Playback(err))
                    }
                }
            }
            _ => Err(RecorderError::NoClip),
        }
    }

    /// Pauses preview playback; a no-op unless playing.
    pub fn pause(&mut self) {
        if let State::Stopped { playing, .. } = &mut self.state {
            if *playing {
                self.sink.pause();
                *playing = false;
            }
        }
    }

    /// Signals that preview playback reached the end of the clip.
    /// Lands in paused `stopped`; the buffer is kept.
    pub fn on_playback_ended(&mut self) {
        if let State::Stopped { playing, .. } = &mut self.state {
            *playing = false;
        }
    }

    /// Discards any held clip or aborts an active capture, releasing the
    /// microphone and the playable resource. Always lands in `idle`.
    pub fn reset(&mut self) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        match state {
            State::Recording { stream, .. } => {
                drop(stream);
                debug!("event=recorder_reset module=recorder status=ok detail=capture_aborted");
            }
            State::Stopped { .. } => {
                self.sink.unload();
                debug!("event=recorder_reset module=recorder status=ok detail=clip_discarded");
            }
            State::Idle => {}
        }
    }

    /// Read access to the playback sink (tests, resource inspection).
    pub fn playback(&self) -> &P {
        &self.sink
    }
}

impl<S: MicrophoneSource, P: PlaybackSink, C: Clock> Drop for Recorder<S, P, C> {
    fn drop(&mut self) {
        // Teardown must not leak an open capture stream or playable resource.
        self.reset();
    }
}
