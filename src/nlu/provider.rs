//! NLU provider abstraction
//!
//! The hosted intent-detection service is reachable only through
//! [`NluProvider::detect_intent`]: free text in, a structured
//! [`RecognitionResult`] out. One network call per invocation, no caching
//! and no retries — retry policy is a caller concern, and conversational
//! context lives entirely inside the provider's session state.

use crate::config::ProviderConfig;
use crate::nlu::dialogflow::DialogflowProvider;
use crate::params::ParamValue;
use crate::session::ConversationSession;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors crossing the provider boundary.
///
/// `Unavailable` is transient and worth a caller-side retry with backoff;
/// the others are not retried. Nothing here is fatal to the process — every
/// failure is scoped to a single turn.
#[derive(Error, Debug)]
pub enum NluError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider rejected request: {0}")]
    Provider(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl NluError {
    /// Whether a caller retry with backoff could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, NluError::Unavailable(_))
    }
}

/// Structured result of one detect-intent call. Immutable, scoped to a
/// single conversational turn.
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    /// Display name of the detected intent
    pub intent: String,
    /// Provider-reported confidence in [0, 1]
    pub confidence: f32,
    /// Extracted parameters, already normalized
    pub parameters: HashMap<String, ParamValue>,
    /// The provider's own suggested reply
    pub fulfillment_text: String,
}

/// Intent-detection provider trait
#[async_trait]
pub trait NluProvider: Send + Sync {
    /// Detect the intent of one user utterance. `text` must be non-empty
    /// UTF-8 and the session's language code a valid BCP-47 tag.
    async fn detect_intent(
        &self,
        session: &ConversationSession,
        text: &str,
    ) -> Result<RecognitionResult, NluError>;

    /// Validate connectivity to the provider
    async fn validate_connection(&self) -> Result<(), NluError>;

    /// Human-readable provider name
    fn provider_name(&self) -> &str;
}

/// Create the configured provider
pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn NluProvider>, NluError> {
    Ok(Box::new(DialogflowProvider::new(config)))
}
