//! Per-turn routing decisions
//!
//! The router is a pure function of the current turn's inputs: the
//! recognition result, the session, and whether the caller is authenticated.
//! It holds no cross-turn state; multi-turn conversational context lives
//! inside the NLU provider.

use crate::nlu::RecognitionResult;
use crate::params::ParamValue;
use crate::routing::operations::{OperationDescriptor, OperationTable};
use crate::routing::policy::{ConfidencePolicy, ConfidenceTier};
use crate::session::ConversationSession;
use std::collections::HashMap;

/// What the caller should do with the recognized intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Invoke the operation without asking the user
    AutoExecute,
    /// Ask the user to confirm, then invoke
    Confirm,
    /// Ask the user to rephrase; do not invoke anything
    Clarify,
}

/// Routing verdict for a single turn
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub intent: String,
    pub operation: OperationDescriptor,
    pub action: Action,
    pub params: HashMap<String, ParamValue>,
}

/// Outcome of routing a turn.
///
/// `AuthRequired` is not a failure: it carries the pending decision so the
/// caller can redirect to authentication and resume afterwards.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Decision(RoutingDecision),
    AuthRequired(RoutingDecision),
}

impl RouteOutcome {
    pub fn decision(&self) -> &RoutingDecision {
        match self {
            RouteOutcome::Decision(d) | RouteOutcome::AuthRequired(d) => d,
        }
    }

    pub fn needs_auth(&self) -> bool {
        matches!(self, RouteOutcome::AuthRequired(_))
    }
}

/// Behavior switches sourced from configuration
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// When false, high confidence still requires confirmation (global
    /// kill-switch; the production default).
    pub auto_execute_high_confidence: bool,
    /// Force confirmation for financial mutations regardless of confidence
    pub require_confirmation_for_sensitive: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            auto_execute_high_confidence: false,
            require_confirmation_for_sensitive: true,
        }
    }
}

/// Maps recognition results to banking operations and decides how to act
pub struct IntentRouter {
    table: OperationTable,
    policy: ConfidencePolicy,
    options: RouterOptions,
}

impl IntentRouter {
    pub fn new(table: OperationTable, policy: ConfidencePolicy, options: RouterOptions) -> Self {
        Self {
            table,
            policy,
            options,
        }
    }

    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    /// Decide what to do with a recognized intent.
    ///
    /// Steps: resolve the operation descriptor (fail-closed default for
    /// unknown intents), classify confidence into a tier, downgrade
    /// auto-execution for unknown intents and financial mutations, then gate
    /// on authentication.
    pub fn route(
        &self,
        result: &RecognitionResult,
        session: &ConversationSession,
        authenticated: bool,
    ) -> RouteOutcome {
        let operation = self.table.lookup(&result.intent).clone();
        let known = self.table.contains(&result.intent);

        if !known {
            crate::log_warn!(
                "unrecognized intent '{}' in session {}, using fail-closed descriptor",
                result.intent,
                session.session_id
            );
        }

        let mut action = match self.policy.classify(result.confidence) {
            ConfidenceTier::High if self.options.auto_execute_high_confidence => {
                Action::AutoExecute
            }
            ConfidenceTier::High | ConfidenceTier::Medium => Action::Confirm,
            ConfidenceTier::Low => Action::Clarify,
        };

        if action == Action::AutoExecute {
            // Unknown intents have nothing safe to execute; mutations always
            // get an explicit confirmation.
            if !known {
                action = Action::Confirm;
            } else if operation.is_sensitive() && self.options.require_confirmation_for_sensitive {
                action = Action::Confirm;
            }
        }

        tracing::debug!(
            intent = %result.intent,
            confidence = result.confidence,
            ?action,
            session = %session.session_id,
            "routed turn"
        );

        let decision = RoutingDecision {
            intent: result.intent.clone(),
            operation,
            action,
            params: result.parameters.clone(),
        };

        if decision.action != Action::Clarify
            && decision.operation.requires_auth
            && !authenticated
        {
            return RouteOutcome::AuthRequired(decision);
        }

        RouteOutcome::Decision(decision)
    }
}
