//! Teller - Conversational Banking Assistant Core
//!
//! Teller is the shared core behind a banking chatbot: it sends free text to
//! a hosted NLU service, normalizes the recognized parameters, routes the
//! detected intent to a banking operation under a confidence policy, and
//! formats the user-facing reply.
//!
//! # Architecture
//!
//! - **NLU Client Adapter**: one detect-intent RPC per turn against the
//!   hosted provider; no local caching, no retries
//! - **Parameter Normalizer**: flattens the provider's loosely typed payload
//!   into typed values, with decimal-precise money amounts
//! - **Intent Router**: static intent-to-operation table plus a three-tier
//!   confidence policy deciding auto-execute / confirm / clarify
//! - **Response Formatter**: per-intent templates with API-result and
//!   acknowledgment branches
//!
//! # Example
//!
//! ```rust,no_run
//! use teller::{AppConfig, BankingAgent, ConversationSession};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load(None)?;
//! let agent = BankingAgent::from_config(&config)?;
//! let session = ConversationSession::new("user-42", "en");
//!
//! let turn = agent.process_turn(&session, "what's my balance?", true).await?;
//! println!("{:?}", turn.decision().action);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod logging;
pub mod nlu;
pub mod params;
pub mod reply;
pub mod routing;
pub mod session;

pub use agent::{BankingAgent, Turn};
pub use config::{AppConfig, ConfidenceThresholds, ProviderConfig};
pub use nlu::{create_provider, NluError, NluProvider, RecognitionResult};
pub use params::{normalize, Money, ParamValue};
pub use reply::ResponseFormatter;
pub use routing::{
    Action, ConfidencePolicy, ConfidenceTier, IntentRouter, OperationDescriptor, OperationTable,
    RouteOutcome, RouterOptions, RoutingDecision,
};
pub use session::{ConversationSession, SessionManager};
