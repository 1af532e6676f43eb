//! Destination broker trait and Gemini-backed implementation.

pub mod config;
pub mod gemini;

pub use gemini::GeminiDestinationBroker;

use std::fmt;

use super::{
    errors::LookupError,
    types::{CandidatePlace, LookupRequest, ResolutionRequestId},
};

/// Lookup provider flavours we can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationProviderKind {
    Gemini,
}

impl fmt::Display for DestinationProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Gemini => "Gemini",
        };
        write!(f, "{}", label)
    }
}

/// Contract every generative lookup backend must satisfy.
///
/// A broker only covers the generative path; the gazetteer fallback lives
/// in the resolver so every backend degrades the same way.
pub trait DestinationBroker: Send + Sync {
    fn provider_kind(&self) -> DestinationProviderKind;

    fn lookup(
        &self,
        request_id: ResolutionRequestId,
        request: &LookupRequest,
    ) -> Result<CandidatePlace, LookupError>;
}
