//! Error types surfaced by the generative lookup path.
use std::fmt;

use super::{broker::DestinationProviderKind, types::ResolutionRequestId};

/// Failure categories for a generative lookup. Every one of them sends the
/// resolver to the gazetteer; none reaches the caller.
#[derive(Debug, Clone)]
pub enum LookupErrorKind {
    /// No API key configured; the live client was never built.
    Offline,
    HttpStatus { status: u16, message: String },
    Transport { message: String },
    EmptyCompletion,
    MalformedPayload { message: String },
    MissingCoordinates,
}

impl LookupErrorKind {
    pub fn offline() -> Self {
        Self::Offline
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn empty_completion() -> Self {
        Self::EmptyCompletion
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn missing_coordinates() -> Self {
        Self::MissingCoordinates
    }
}

impl fmt::Display for LookupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "Provider offline (no API key configured)"),
            Self::HttpStatus { status, message } => {
                write!(f, "HTTP {}: {}", status, message)
            }
            Self::Transport { message } => write!(f, "Transport failure: {}", message),
            Self::EmptyCompletion => write!(f, "Provider returned no completion text"),
            Self::MalformedPayload { message } => {
                write!(f, "Malformed payload: {}", message)
            }
            Self::MissingCoordinates => {
                write!(f, "Completion lacked usable coordinates")
            }
        }
    }
}

/// Full lookup error with provider metadata and request id.
#[derive(Debug, Clone)]
pub struct LookupError {
    pub request_id: ResolutionRequestId,
    pub provider: DestinationProviderKind,
    pub kind: LookupErrorKind,
}

impl LookupError {
    pub fn new(
        request_id: ResolutionRequestId,
        provider: DestinationProviderKind,
        kind: LookupErrorKind,
    ) -> Self {
        Self {
            request_id,
            provider,
            kind,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lookup error ({} - {}): {}",
            self.provider, self.request_id, self.kind
        )
    }
}

impl std::error::Error for LookupError {}
