//! Intent routing - mapping recognized intents to banking operations
//!
//! The static operation table, the confidence policy, and the per-turn
//! router live here. Routing is stateless across turns by design.

pub mod operations;
pub mod policy;
pub mod router;

pub use operations::{OperationDescriptor, OperationTable};
pub use policy::{ConfidencePolicy, ConfidenceTier};
pub use router::{Action, IntentRouter, RouteOutcome, RouterOptions, RoutingDecision};
