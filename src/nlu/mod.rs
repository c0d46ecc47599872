//! NLU client adapter - the boundary with the hosted intent-detection service

pub mod dialogflow;
pub mod provider;

pub use dialogflow::DialogflowProvider;
pub use provider::{create_provider, NluError, NluProvider, RecognitionResult};
