//! REST client for the hosted Dialogflow-style detect-intent API
//!
//! Issues one `POST {base}/{session_path}:detectIntent` per turn and decodes
//! the query result into a [`RecognitionResult`]. Raw parameter payloads are
//! normalized at this boundary so nothing downstream sees untyped JSON.

use crate::config::{is_valid_language_tag, ProviderConfig};
use crate::nlu::provider::{NluError, NluProvider, RecognitionResult};
use crate::params;
use crate::session::ConversationSession;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub struct DialogflowProvider {
    config: ProviderConfig,
    client: Client,
    api_key: Option<String>,
}

impl DialogflowProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        let api_key = config.resolve_api_key();

        Self {
            config,
            client,
            api_key,
        }
    }

    fn detect_url(&self, session: &ConversationSession) -> String {
        format!(
            "{}/{}:detectIntent",
            self.config.url,
            session.session_path(&self.config.project_id)
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentRequest {
    query_input: QueryInput,
}

#[derive(Serialize)]
struct QueryInput {
    text: TextInput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextInput {
    text: String,
    language_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetectIntentResponse {
    query_result: Option<QueryResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResult {
    intent: Option<IntentRef>,
    intent_detection_confidence: Option<f32>,
    parameters: Option<Value>,
    fulfillment_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentRef {
    display_name: Option<String>,
}

/// Decode a wire response into a recognition result.
///
/// A response without an intent display name is malformed: confidence and
/// parameters mean nothing if we cannot tell what was recognized.
pub(crate) fn recognition_from_response(
    response: DetectIntentResponse,
) -> Result<RecognitionResult, NluError> {
    let query_result = response
        .query_result
        .ok_or_else(|| NluError::MalformedResponse("no query result in response".to_string()))?;

    let intent = query_result
        .intent
        .and_then(|i| i.display_name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| NluError::MalformedResponse("response missing intent".to_string()))?;

    let confidence = query_result
        .intent_detection_confidence
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    let parameters = query_result
        .parameters
        .as_ref()
        .map(params::normalize)
        .unwrap_or_default();

    Ok(RecognitionResult {
        intent,
        confidence,
        parameters,
        fulfillment_text: query_result.fulfillment_text.unwrap_or_default(),
    })
}

#[async_trait]
impl NluProvider for DialogflowProvider {
    async fn detect_intent(
        &self,
        session: &ConversationSession,
        text: &str,
    ) -> Result<RecognitionResult, NluError> {
        if text.trim().is_empty() {
            return Err(NluError::Provider("input text is empty".to_string()));
        }

        if !is_valid_language_tag(&session.language_code) {
            return Err(NluError::Provider(format!(
                "'{}' is not a valid BCP-47 language tag",
                session.language_code
            )));
        }

        let request = DetectIntentRequest {
            query_input: QueryInput {
                text: TextInput {
                    text: text.to_string(),
                    language_code: session.language_code.clone(),
                },
            },
        };

        let mut builder = self.client.post(self.detect_url(session)).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NluError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(NluError::Unavailable(format!(
                "authentication failed: HTTP {}",
                status
            )));
        }

        if status.is_server_error() {
            return Err(NluError::Unavailable(format!("HTTP {}", status)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NluError::Provider(format!("HTTP {}: {}", status, body)));
        }

        let decoded: DetectIntentResponse = response
            .json()
            .await
            .map_err(|e| NluError::MalformedResponse(e.to_string()))?;

        tracing::debug!(session = %session.session_id, "detect intent call completed");

        recognition_from_response(decoded)
    }

    async fn validate_connection(&self) -> Result<(), NluError> {
        let url = format!("{}/projects/{}/agent", self.config.url, self.config.project_id);

        let mut builder = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NluError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(NluError::Unavailable("invalid API credentials".to_string()));
        }

        if !response.status().is_success() {
            return Err(NluError::Unavailable(format!(
                "failed to reach agent for project {}: HTTP {}",
                self.config.project_id,
                response.status()
            )));
        }

        Ok(())
    }

    fn provider_name(&self) -> &str {
        "dialogflow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use rust_decimal::Decimal;

    fn decode(json: &str) -> Result<RecognitionResult, NluError> {
        let response: DetectIntentResponse = serde_json::from_str(json).unwrap();
        recognition_from_response(response)
    }

    #[test]
    fn test_decode_full_response() {
        let result = decode(
            r#"{
                "queryResult": {
                    "queryText": "transfer $150 to John",
                    "intent": {
                        "name": "projects/p/agent/intents/1",
                        "displayName": "payment.transfer"
                    },
                    "intentDetectionConfidence": 0.93,
                    "parameters": {
                        "amount-of-money": { "amount": 150.0, "currency": "USD" },
                        "recipient": "John"
                    },
                    "fulfillmentText": "I can help you transfer money."
                }
            }"#,
        )
        .unwrap();

        assert_eq!(result.intent, "payment.transfer");
        assert!((result.confidence - 0.93).abs() < f32::EPSILON);
        assert_eq!(result.fulfillment_text, "I can help you transfer money.");

        let money = result.parameters["amount-of-money"].as_money().unwrap();
        assert_eq!(money.amount, Decimal::new(150, 0));
        assert_eq!(
            result.parameters["recipient"],
            ParamValue::Text("John".to_string())
        );
    }

    #[test]
    fn test_decode_missing_intent_is_malformed() {
        let err = decode(r#"{"queryResult": {"fulfillmentText": "hi"}}"#).unwrap_err();
        assert!(matches!(err, NluError::MalformedResponse(_)));

        let err = decode(r#"{}"#).unwrap_err();
        assert!(matches!(err, NluError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_defaults_for_optional_fields() {
        let result = decode(
            r#"{"queryResult": {"intent": {"displayName": "general.greeting"}}}"#,
        )
        .unwrap();

        assert_eq!(result.intent, "general.greeting");
        assert_eq!(result.confidence, 0.0);
        assert!(result.parameters.is_empty());
        assert!(result.fulfillment_text.is_empty());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let result = decode(
            r#"{"queryResult": {"intent": {"displayName": "general.help"}, "intentDetectionConfidence": 1.7}}"#,
        )
        .unwrap();
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_detect_url_shape() {
        let provider = DialogflowProvider::new(ProviderConfig {
            project_id: "my-bank".to_string(),
            ..Default::default()
        });
        let session = ConversationSession::with_id("s-1", "u-1", "en");

        assert_eq!(
            provider.detect_url(&session),
            "https://dialogflow.googleapis.com/v2/projects/my-bank/agent/sessions/s-1:detectIntent"
        );
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_the_network() {
        let provider = DialogflowProvider::new(ProviderConfig::default());
        let session = ConversationSession::with_id("s-1", "u-1", "en");

        let err = provider.detect_intent(&session, "   ").await.unwrap_err();
        assert!(matches!(err, NluError::Provider(_)));
    }

    #[tokio::test]
    async fn test_bad_language_tag_is_rejected_before_the_network() {
        let provider = DialogflowProvider::new(ProviderConfig::default());
        let session = ConversationSession::with_id("s-1", "u-1", "not_a_tag!");

        let err = provider.detect_intent(&session, "hello").await.unwrap_err();
        assert!(matches!(err, NluError::Provider(_)));
    }
}
