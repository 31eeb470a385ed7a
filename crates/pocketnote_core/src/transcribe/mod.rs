//! Transcription collaborator interface.
//!
//! # Responsibility
//! - Define the contract for converting a captured audio buffer into text.
//! - Provide the simulated stand-in used in place of a real engine.
//!
//! # Invariants
//! - Failures are recoverable and independent of buffer validity; callers
//!   must treat them as non-fatal to the recording they hold.
//! - Every call is bounded by a caller-visible timeout.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Result of a successful transcription call.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    /// Engine confidence in `0.0..=1.0`.
    pub confidence: f32,
    /// BCP-47 style language tag, e.g. `en`.
    pub language: String,
}

/// Recoverable transcription failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscribeError {
    /// The service did not answer within the caller's timeout.
    Timeout { waited: Duration },
    /// The caller abandoned the call.
    Cancelled,
    /// Service-side failure, independent of the audio buffer.
    Service(String),
}

impl Display for TranscribeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { waited } => {
                write!(f, "transcription timed out after {}ms", waited.as_millis())
            }
            Self::Cancelled => write!(f, "transcription cancelled"),
            Self::Service(reason) => write!(f, "transcription service failed: {reason}"),
        }
    }
}

impl Error for TranscribeError {}

/// External capability that converts an audio buffer into text.
pub trait Transcriber {
    /// Transcribes the buffer, answering within `timeout` or failing with
    /// [`TranscribeError::Timeout`].
    fn transcribe(&self, audio: &[u8], timeout: Duration) -> Result<Transcription, TranscribeError>;
}

const SIMULATED_TEXT: &str = "This is a simulated transcription of your voice recording. \
In a real implementation, this would be the actual transcribed text from your audio.";
const SIMULATED_LATENCY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Succeed,
    FailService,
}

/// Stand-in for a real transcription engine.
///
/// Latency is compared against the caller's timeout, not slept, so tests
/// stay fast and deterministic.
#[derive(Debug, Clone)]
pub struct SimulatedTranscriber {
    latency: Duration,
    behavior: Behavior,
    failure_reason: String,
}

impl SimulatedTranscriber {
    pub fn new() -> Self {
        Self {
            latency: SIMULATED_LATENCY,
            behavior: Behavior::Succeed,
            failure_reason: String::new(),
        }
    }

    /// Overrides the simulated service latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes every call fail with a service error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            latency: Duration::ZERO,
            behavior: Behavior::FailService,
            failure_reason: reason.into(),
        }
    }
}

impl Default for SimulatedTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for SimulatedTranscriber {
    fn transcribe(
        &self,
        _audio: &[u8],
        timeout: Duration,
    ) -> Result<Transcription, TranscribeError> {
        if self.latency > timeout {
            return Err(TranscribeError::Timeout { waited: timeout });
        }
        match self.behavior {
            Behavior::FailService => Err(TranscribeError::Service(self.failure_reason.clone())),
            Behavior::Succeed => Ok(Transcription {
                text: SIMULATED_TEXT.to_string(),
                confidence: 0.95,
                language: "en".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SimulatedTranscriber, TranscribeError, Transcriber};
    use std::time::Duration;

    #[test]
    fn answers_within_timeout() {
        let transcriber = SimulatedTranscriber::new().with_latency(Duration::from_millis(100));
        let result = transcriber
            .transcribe(&[1, 2, 3], Duration::from_secs(1))
            .unwrap();
        assert!(!result.text.is_empty());
        assert_eq!(result.language, "en");
    }

    #[test]
    fn slow_service_times_out() {
        let transcriber = SimulatedTranscriber::new().with_latency(Duration::from_secs(10));
        let err = transcriber
            .transcribe(&[1, 2, 3], Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, TranscribeError::Timeout { .. }));
    }

    #[test]
    fn failing_mode_reports_service_error() {
        let transcriber = SimulatedTranscriber::failing("upstream 503");
        let err = transcriber
            .transcribe(&[], Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err, TranscribeError::Service("upstream 503".to_string()));
    }
}
