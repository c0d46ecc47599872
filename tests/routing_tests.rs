//! End-to-end turn tests with a canned NLU provider
//!
//! Exercises the full per-turn pipeline (detect -> normalize -> route ->
//! format) without the network: a mock provider returns scripted
//! recognition results, and the banking API result is injected by hand.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use teller::{
    Action, BankingAgent, ConfidencePolicy, ConversationSession, IntentRouter, Money, NluError,
    NluProvider, OperationTable, ParamValue, RecognitionResult, RouteOutcome, RouterOptions,
};

/// Provider returning a scripted result per utterance
struct ScriptedProvider {
    results: HashMap<String, RecognitionResult>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            results: HashMap::new(),
        }
    }

    fn on(mut self, text: &str, result: RecognitionResult) -> Self {
        self.results.insert(text.to_string(), result);
        self
    }
}

#[async_trait]
impl NluProvider for ScriptedProvider {
    async fn detect_intent(
        &self,
        _session: &ConversationSession,
        text: &str,
    ) -> Result<RecognitionResult, NluError> {
        self.results
            .get(text)
            .cloned()
            .ok_or_else(|| NluError::Unavailable("no scripted result".to_string()))
    }

    async fn validate_connection(&self) -> Result<(), NluError> {
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

fn recognition(
    intent: &str,
    confidence: f32,
    parameters: HashMap<String, ParamValue>,
    fulfillment: &str,
) -> RecognitionResult {
    RecognitionResult {
        intent: intent.to_string(),
        confidence,
        parameters,
        fulfillment_text: fulfillment.to_string(),
    }
}

fn agent_with(provider: ScriptedProvider, options: RouterOptions) -> BankingAgent {
    let router = IntentRouter::new(OperationTable::builtin(), ConfidencePolicy::default(), options);
    BankingAgent::new(Box::new(provider), router)
}

fn permissive() -> RouterOptions {
    RouterOptions {
        auto_execute_high_confidence: true,
        require_confirmation_for_sensitive: true,
    }
}

fn session() -> ConversationSession {
    ConversationSession::with_id("it-session", "user-1", "en")
}

#[tokio::test]
async fn balance_check_executes_and_formats_the_result() {
    let provider = ScriptedProvider::new().on(
        "what's my balance?",
        recognition("account.balance", 0.91, HashMap::new(), ""),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent
        .process_turn(&session(), "what's my balance?", true)
        .await
        .unwrap();

    assert!(turn.approved());
    assert_eq!(
        turn.decision().operation.api_endpoint.as_deref(),
        Some("/api/accounts/balance")
    );

    // Caller invokes the endpoint, then completes the turn with the result.
    let reply = agent.complete_turn(turn.decision(), &json!({"balance": 1234.5}), "");
    assert_eq!(reply, "Your account balance is $1234.50");
}

#[tokio::test]
async fn high_confidence_transfer_still_requires_confirmation() {
    let mut params = HashMap::new();
    params.insert(
        "amount-of-money".to_string(),
        ParamValue::Money(Money::usd("150".parse().unwrap())),
    );
    params.insert("recipient".to_string(), ParamValue::Text("John".to_string()));

    let provider = ScriptedProvider::new().on(
        "transfer $150 to John",
        recognition("payment.transfer", 0.99, params, ""),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent
        .process_turn(&session(), "transfer $150 to John", true)
        .await
        .unwrap();

    assert_eq!(turn.decision().action, Action::Confirm);
    assert!(!turn.approved());
    assert_eq!(
        turn.acknowledgment.as_deref(),
        Some("I'll help you transfer $150.00 to John. Please confirm this transaction.")
    );
}

#[tokio::test]
async fn unauthenticated_balance_check_asks_for_sign_in() {
    let provider = ScriptedProvider::new().on(
        "what's my balance?",
        recognition("account.balance", 0.91, HashMap::new(), ""),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent
        .process_turn(&session(), "what's my balance?", false)
        .await
        .unwrap();

    assert!(matches!(turn.outcome, RouteOutcome::AuthRequired(_)));
    assert!(turn.acknowledgment.is_none());
}

#[tokio::test]
async fn unknown_intent_is_never_executed() {
    let provider = ScriptedProvider::new().on(
        "do the thing",
        recognition("foo.bar", 0.95, HashMap::new(), ""),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent
        .process_turn(&session(), "do the thing", true)
        .await
        .unwrap();

    let decision = turn.decision();
    assert_ne!(decision.action, Action::AutoExecute);
    assert!(decision.operation.requires_auth);
    assert!(decision.operation.api_endpoint.is_none());
}

#[tokio::test]
async fn low_confidence_clarifies_without_an_auth_gate() {
    let provider = ScriptedProvider::new().on(
        "mumble",
        recognition("payment.transfer", 0.31, HashMap::new(), "Could you rephrase that?"),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent.process_turn(&session(), "mumble", false).await.unwrap();

    assert_eq!(turn.decision().action, Action::Clarify);
    assert!(!turn.outcome.needs_auth());
    assert_eq!(turn.acknowledgment.as_deref(), Some("Could you rephrase that?"));
}

#[tokio::test]
async fn greeting_uses_fulfillment_text_without_auth() {
    let provider = ScriptedProvider::new().on(
        "hello",
        recognition("general.greeting", 0.97, HashMap::new(), "Hi! How can I help you today?"),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent.process_turn(&session(), "hello", false).await.unwrap();

    assert!(turn.approved());
    assert_eq!(turn.acknowledgment.as_deref(), Some("Hi! How can I help you today?"));
}

#[tokio::test]
async fn kill_switch_downgrades_every_auto_execution() {
    let provider = ScriptedProvider::new().on(
        "what's my balance?",
        recognition("account.balance", 0.99, HashMap::new(), ""),
    );
    let agent = agent_with(provider, RouterOptions::default());

    let turn = agent
        .process_turn(&session(), "what's my balance?", true)
        .await
        .unwrap();

    assert_eq!(turn.decision().action, Action::Confirm);
}

#[tokio::test]
async fn provider_failure_abandons_the_turn() {
    let agent = agent_with(ScriptedProvider::new(), permissive());

    let err = agent
        .process_turn(&session(), "anything", true)
        .await
        .unwrap_err();

    assert!(err.is_transient());
}

#[tokio::test]
async fn card_block_confirmation_flow() {
    let mut params = HashMap::new();
    params.insert("card-type".to_string(), ParamValue::Text("credit".to_string()));

    let provider = ScriptedProvider::new().on(
        "block my credit card",
        recognition("card.block", 0.88, params, ""),
    );
    let agent = agent_with(provider, permissive());

    let turn = agent
        .process_turn(&session(), "block my credit card", true)
        .await
        .unwrap();

    assert_eq!(turn.decision().action, Action::Confirm);
    let ack = turn.acknowledgment.as_deref().unwrap();
    assert!(ack.contains("credit"));
    assert!(ack.contains("cannot be undone"));

    let reply = agent.complete_turn(turn.decision(), &json!({"success": true}), "");
    assert!(reply.contains("successfully blocked"));
}
