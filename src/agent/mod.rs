//! Turn orchestration - the glue both front ends share
//!
//! One [`BankingAgent::process_turn`] call runs the full per-turn pipeline:
//! detect intent, route, and render an acknowledgment. The downstream
//! banking API call is the caller's job; once its result is in hand,
//! [`BankingAgent::complete_turn`] renders the final reply.
//!
//! Turns are independent and safe to run concurrently across sessions: the
//! agent holds only the read-only routing table and policy, and the provider
//! call is the sole suspending step.

use crate::config::AppConfig;
use crate::logging;
use crate::nlu::{create_provider, NluError, NluProvider, RecognitionResult};
use crate::reply::ResponseFormatter;
use crate::routing::{
    Action, ConfidencePolicy, IntentRouter, OperationTable, RouteOutcome, RouterOptions,
    RoutingDecision,
};
use crate::session::ConversationSession;
use serde_json::Value;

/// Everything the caller needs to finish one conversational turn
#[derive(Debug)]
pub struct Turn {
    pub recognition: RecognitionResult,
    pub outcome: RouteOutcome,
    /// Acknowledgment to show while (or instead of) calling the banking API.
    /// Absent when authentication must happen first - that copy is the
    /// caller's responsibility.
    pub acknowledgment: Option<String>,
}

/// Per-turn pipeline shared by the chat UI and the backend service
pub struct BankingAgent {
    provider: Box<dyn NluProvider>,
    router: IntentRouter,
    formatter: ResponseFormatter,
    audit_intents: bool,
    mask_parameters: bool,
}

impl BankingAgent {
    pub fn new(provider: Box<dyn NluProvider>, router: IntentRouter) -> Self {
        Self {
            provider,
            router,
            formatter: ResponseFormatter::new(),
            audit_intents: true,
            mask_parameters: true,
        }
    }

    /// Build an agent from configuration with the production intent table
    pub fn from_config(config: &AppConfig) -> Result<Self, NluError> {
        let provider = create_provider(config.provider.clone())?;
        let router = IntentRouter::new(
            OperationTable::builtin(),
            ConfidencePolicy::new(config.confidence.high, config.confidence.medium),
            RouterOptions {
                auto_execute_high_confidence: config.auto_execute_high_confidence_intents,
                require_confirmation_for_sensitive: config
                    .require_confirmation_for_sensitive_operations,
            },
        );

        Ok(Self {
            provider,
            router,
            formatter: ResponseFormatter::new(),
            audit_intents: config.enable_intent_logging,
            mask_parameters: config.mask_sensitive_parameters,
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Check connectivity to the NLU provider
    pub async fn validate_connection(&self) -> Result<(), NluError> {
        self.provider.validate_connection().await
    }

    /// Run one turn: detect intent, route, render an acknowledgment.
    ///
    /// Provider failures abandon the turn - nothing is partially executed
    /// and the error carries enough structure for the caller to decide
    /// between retrying, falling back to help text, or apologizing.
    pub async fn process_turn(
        &self,
        session: &ConversationSession,
        text: &str,
        authenticated: bool,
    ) -> Result<Turn, NluError> {
        let recognition = self.provider.detect_intent(session, text).await?;

        if self.audit_intents {
            logging::log_intent(
                &session.session_id,
                &recognition.intent,
                recognition.confidence,
                &recognition.parameters,
                self.mask_parameters,
            );
        }

        let outcome = self.router.route(&recognition, session, authenticated);

        let acknowledgment = match &outcome {
            RouteOutcome::Decision(decision) => Some(self.formatter.format(
                &decision.intent,
                &decision.params,
                None,
                &recognition.fulfillment_text,
            )),
            RouteOutcome::AuthRequired(_) => None,
        };

        Ok(Turn {
            recognition,
            outcome,
            acknowledgment,
        })
    }

    /// Render the final reply once the caller has invoked the banking API
    pub fn complete_turn(
        &self,
        decision: &RoutingDecision,
        api_result: &Value,
        fulfillment_text: &str,
    ) -> String {
        self.formatter.format(
            &decision.intent,
            &decision.params,
            Some(api_result),
            fulfillment_text,
        )
    }
}

impl Turn {
    pub fn decision(&self) -> &RoutingDecision {
        self.outcome.decision()
    }

    /// Whether the caller may invoke the banking API without asking the user
    pub fn approved(&self) -> bool {
        !self.outcome.needs_auth() && self.decision().action == Action::AutoExecute
    }
}
