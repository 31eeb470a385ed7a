//! Microphone capture contracts and the simulated device.
//!
//! # Responsibility
//! - Define the seam between the recorder state machine and the platform
//!   microphone (probe, acquire, release).
//! - Negotiate the capture encoding from a preference-ordered list.
//!
//! # Invariants
//! - The device is held exactly by the live [`CaptureStream`]; dropping the
//!   stream releases it, finished or not.
//! - Negotiation never fails solely because the most preferred encoding is
//!   unsupported; it walks the preference list.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Audio container/codec for a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    OpusWebm,
    Webm,
    Mp4Aac,
    WavPcm,
}

impl AudioEncoding {
    /// Preference order used for negotiation, best first.
    pub const PREFERENCE: [AudioEncoding; 4] = [
        AudioEncoding::OpusWebm,
        AudioEncoding::Webm,
        AudioEncoding::Mp4Aac,
        AudioEncoding::WavPcm,
    ];

    /// MIME label stored alongside captured buffers.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::OpusWebm => "audio/webm;codecs=opus",
            Self::Webm => "audio/webm",
            Self::Mp4Aac => "audio/mp4",
            Self::WavPcm => "audio/wav",
        }
    }
}

/// Picks the best mutually supported encoding, or `None` when the device
/// supports nothing we can store.
pub fn negotiate_encoding(supported: &[AudioEncoding]) -> Option<AudioEncoding> {
    AudioEncoding::PREFERENCE
        .into_iter()
        .find(|candidate| supported.contains(candidate))
}

/// Microphone acquisition failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user (or platform) denied microphone access.
    PermissionDenied,
    /// No usable capture device.
    DeviceUnavailable(String),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "microphone access denied"),
            Self::DeviceUnavailable(reason) => {
                write!(f, "no usable capture device: {reason}")
            }
        }
    }
}

impl Error for CaptureError {}

/// A live, exclusive hold on the microphone.
///
/// Implementations must release the device when dropped, whether or not
/// [`CaptureStream::finish`] ran.
pub trait CaptureStream {
    /// Finalizes the in-progress buffer and releases the device.
    fn finish(self: Box<Self>) -> Vec<u8>;
}

/// The platform microphone seam.
pub trait MicrophoneSource {
    /// Encodings the device claims to support, unordered.
    fn supported_encodings(&self) -> Vec<AudioEncoding>;

    /// Opens an exclusive capture session in the negotiated encoding.
    fn acquire(&mut self, encoding: AudioEncoding) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// Stand-in microphone for tests and headless use.
///
/// Produces a configurable payload and tracks device release through a
/// shared probe flag.
#[derive(Debug, Clone)]
pub struct SimulatedMicrophone {
    permission_granted: bool,
    encodings: Vec<AudioEncoding>,
    payload: Vec<u8>,
    released: Arc<AtomicBool>,
}

impl SimulatedMicrophone {
    pub fn new() -> Self {
        Self {
            permission_granted: true,
            encodings: vec![AudioEncoding::OpusWebm, AudioEncoding::Webm],
            payload: vec![0u8; 1024],
            released: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulates a user denying the microphone permission prompt.
    pub fn denying_permission() -> Self {
        Self {
            permission_granted: false,
            ..Self::new()
        }
    }

    pub fn with_encodings(mut self, encodings: Vec<AudioEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Probe that observes whether the device is currently released.
    pub fn release_probe(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl Default for SimulatedMicrophone {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrophoneSource for SimulatedMicrophone {
    fn supported_encodings(&self) -> Vec<AudioEncoding> {
        self.encodings.clone()
    }

    fn acquire(&mut self, _encoding: AudioEncoding) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if !self.permission_granted {
            return Err(CaptureError::PermissionDenied);
        }
        if self.encodings.is_empty() {
            return Err(CaptureError::DeviceUnavailable(
                "no capture encodings available".to_string(),
            ));
        }
        self.released.store(false, Ordering::SeqCst);
        Ok(Box::new(SimulatedCaptureStream {
            payload: self.payload.clone(),
            released: Arc::clone(&self.released),
        }))
    }
}

struct SimulatedCaptureStream {
    payload: Vec<u8>,
    released: Arc<AtomicBool>,
}

impl CaptureStream for SimulatedCaptureStream {
    fn finish(mut self: Box<Self>) -> Vec<u8> {
        std::mem::take(&mut self.payload)
        // Drop runs next and flips the release probe.
    }
}

impl Drop for SimulatedCaptureStream {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
