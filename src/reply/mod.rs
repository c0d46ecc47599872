//! Response formatting - user-facing text for each banking intent
//!
//! Each template has two branches: one rendering values from the banking API
//! result, and a forward-looking acknowledgment for when no result exists
//! yet. Intents without a template fall back to the provider's fulfillment
//! text, then to a generic acknowledgment. Only success-path and
//! acknowledgment copy lives here; error copy is the caller's job.

use crate::params::{decimal_from_f64, decimal_from_number, Money, ParamValue};
use serde_json::Value;
use std::collections::HashMap;

const GENERIC_ACK: &str = "I can help you with that. Let me process your request.";

/// Renders a reply for a recognized intent and an optional API result
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(
        &self,
        intent: &str,
        params: &HashMap<String, ParamValue>,
        api_result: Option<&Value>,
        fulfillment_text: &str,
    ) -> String {
        match intent {
            "account.balance" => self.format_balance(api_result),
            "payment.transfer" => self.format_transfer(params, api_result),
            "card.block" => self.format_card_block(params, api_result),
            "dispute.create" => self.format_dispute(api_result),
            "fraud.report" => self.format_fraud_report(api_result),
            _ => {
                if fulfillment_text.is_empty() {
                    GENERIC_ACK.to_string()
                } else {
                    fulfillment_text.to_string()
                }
            }
        }
    }

    fn format_balance(&self, api_result: Option<&Value>) -> String {
        if let Some(balance) = api_result
            .and_then(|r| r.get("balance"))
            .and_then(money_from_result)
        {
            return format!("Your account balance is {}", balance);
        }

        "I can help you check your account balance. \
         Please wait while I retrieve this information."
            .to_string()
    }

    fn format_transfer(
        &self,
        params: &HashMap<String, ParamValue>,
        api_result: Option<&Value>,
    ) -> String {
        let amount = transfer_amount(params)
            .map(|m| m.to_string())
            .unwrap_or_else(|| "the requested amount".to_string());
        let recipient = params
            .get("recipient")
            .and_then(ParamValue::as_text)
            .unwrap_or("the recipient");

        if let Some(result) = api_result {
            if result.get("success").and_then(Value::as_bool) == Some(true) {
                let transaction_id = result
                    .get("transactionId")
                    .and_then(Value::as_str)
                    .unwrap_or("unavailable");
                return format!(
                    "Successfully transferred {} to {}. Transaction ID: {}",
                    amount, recipient, transaction_id
                );
            }
        }

        format!(
            "I'll help you transfer {} to {}. Please confirm this transaction.",
            amount, recipient
        )
    }

    fn format_card_block(
        &self,
        params: &HashMap<String, ParamValue>,
        api_result: Option<&Value>,
    ) -> String {
        let card_type = params
            .get("card-type")
            .and_then(ParamValue::as_text)
            .unwrap_or("card");

        if let Some(result) = api_result {
            if result.get("success").and_then(Value::as_bool) == Some(true) {
                return format!(
                    "Your {} has been successfully blocked for security. \
                     A replacement card will be sent to you.",
                    card_type
                );
            }
        }

        format!(
            "I'll block your {} immediately for security. This action cannot be undone.",
            card_type
        )
    }

    fn format_dispute(&self, api_result: Option<&Value>) -> String {
        if let Some(dispute_id) = api_result
            .and_then(|r| r.get("disputeId"))
            .and_then(Value::as_str)
        {
            return format!(
                "Dispute filed successfully. Reference number: {}. \
                 We'll investigate and contact you within 5-7 business days.",
                dispute_id
            );
        }

        "I'll help you file a dispute for this transaction. \
         Please provide details about the disputed charge."
            .to_string()
    }

    fn format_fraud_report(&self, api_result: Option<&Value>) -> String {
        if let Some(report_id) = api_result
            .and_then(|r| r.get("reportId"))
            .and_then(Value::as_str)
        {
            return format!(
                "Fraud report filed. Reference: {}. Your account has been flagged \
                 for monitoring. Please change your passwords immediately.",
                report_id
            );
        }

        "I understand you need to report fraud. This is serious - I'll immediately \
         flag your account and start the investigation process."
            .to_string()
    }
}

/// Amount for a transfer: the provider usually extracts a money composite
/// under "amount-of-money", but a bare number under "amount" also occurs.
fn transfer_amount(params: &HashMap<String, ParamValue>) -> Option<Money> {
    for key in ["amount-of-money", "amount"] {
        match params.get(key) {
            Some(ParamValue::Money(money)) => return Some(money.clone()),
            Some(ParamValue::Number(n)) => return decimal_from_f64(*n).map(Money::usd),
            _ => {}
        }
    }
    None
}

/// A money value from a banking API result field (plain JSON number, USD)
fn money_from_result(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => decimal_from_number(n).map(Money::usd),
        _ => None,
    }
}
