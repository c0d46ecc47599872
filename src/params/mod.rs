//! Parameter normalization for NLU provider payloads
//!
//! The hosted NLU service returns extracted parameters as a loosely typed
//! struct (JSON object). This module flattens that payload into a map of
//! [`ParamValue`] so nothing downstream ever inspects raw JSON shapes.
//!
//! Money amounts are kept as [`rust_decimal::Decimal`] rather than `f64` so
//! currency values never pick up binary rounding error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A monetary amount with its ISO-4217 currency code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Convenience constructor for the default currency
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, DEFAULT_CURRENCY)
    }
}

impl fmt::Display for Money {
    /// Renders with two decimal places and a currency symbol when one is
    /// known; otherwise the ISO code is used as a prefix ("CAD 12.00").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.amount.round_dp(2);
        match currency_symbol(&self.currency) {
            Some(symbol) => write!(f, "{}{:.2}", symbol, amount),
            None => write!(f, "{} {:.2}", self.currency, amount),
        }
    }
}

/// Currency code used when the provider omits one
pub const DEFAULT_CURRENCY: &str = "USD";

/// Symbol for a currency code, if we know how to render it
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// A single normalized parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    Money(Money),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<&Money> {
        match self {
            ParamValue::Money(m) => Some(m),
            _ => None,
        }
    }
}

/// Parse a JSON number into a `Decimal` via its decimal text form.
///
/// Going through the string representation keeps "150.1" as 150.1 instead of
/// the nearest binary float.
pub fn decimal_from_number(n: &serde_json::Number) -> Option<Decimal> {
    n.to_string().parse().ok()
}

/// Same conversion for an `f64` already in hand
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value.to_string().parse().ok()
}

/// Flatten a raw provider parameter struct into typed values.
///
/// Classification is by payload shape: scalar string, scalar number, or a
/// composite carrying an `amount` sub-field (a money value, currency
/// defaulting to USD). Composites of any other shape are dropped rather than
/// surfaced — unexpected provider fields must not break the caller. An empty
/// or non-object payload yields an empty map.
pub fn normalize(raw: &Value) -> HashMap<String, ParamValue> {
    let mut normalized = HashMap::new();

    let fields = match raw {
        Value::Object(map) => map,
        _ => return normalized,
    };

    for (name, field) in fields {
        match field {
            Value::String(s) => {
                // Unfilled slots arrive as empty strings, not missing fields
                if !s.is_empty() {
                    normalized.insert(name.clone(), ParamValue::Text(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(value) = n.as_f64() {
                    normalized.insert(name.clone(), ParamValue::Number(value));
                }
            }
            Value::Object(composite) => {
                if let Some(money) = money_from_composite(composite) {
                    normalized.insert(name.clone(), ParamValue::Money(money));
                }
            }
            _ => {}
        }
    }

    normalized
}

fn money_from_composite(composite: &serde_json::Map<String, Value>) -> Option<Money> {
    let amount = match composite.get("amount")? {
        Value::Number(n) => decimal_from_number(n)?,
        _ => return None,
    };

    let currency = composite
        .get("currency")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_string();

    Some(Money { amount, currency })
}
