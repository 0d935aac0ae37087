//! Request classification.
//!
//! Decodes the raw body once and decides which mode handles it. Presence of
//! `dhBody` selects live pass-through; anything else is a legacy echo.
//! Required keys are checked here so later stages only ever see validated
//! payloads.

use serde_json::{Map, Value};

use crate::error::{RelayError, RelayResult};

/// Key that selects live pass-through.
pub const DH_BODY_KEY: &str = "dhBody";

/// Keys every broker order must carry, in reporting order.
pub const ORDER_REQUIRED_KEYS: [&str; 7] = [
    "securityId",
    "exchangeSegment",
    "transactionType",
    "quantity",
    "productType",
    "orderType",
    "validity",
];

/// Keys every legacy paper request must carry, in reporting order.
pub const LEGACY_REQUIRED_KEYS: [&str; 5] = ["symbol", "segment", "instrument", "side", "qty"];

/// A decoded request, tagged by processing mode.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayRequest {
    Live(OrderPayload),
    Legacy(LegacyOrder),
}

/// Broker order body, forwarded verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload(Map<String, Value>);

impl OrderPayload {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Map<String, Value>> for OrderPayload {
    type Error = RelayError;

    fn try_from(map: Map<String, Value>) -> RelayResult<Self> {
        let missing = missing_keys(&map, &ORDER_REQUIRED_KEYS);
        if !missing.is_empty() {
            return Err(RelayError::MissingOrderFields(missing));
        }
        Ok(Self(map))
    }
}

/// The five legacy fields, extracted in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyOrder(Map<String, Value>);

impl LegacyOrder {
    /// Echo object containing exactly the legacy fields.
    pub fn into_echo(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<&Map<String, Value>> for LegacyOrder {
    type Error = RelayError;

    fn try_from(body: &Map<String, Value>) -> RelayResult<Self> {
        let missing = missing_keys(body, &LEGACY_REQUIRED_KEYS);
        if !missing.is_empty() {
            return Err(RelayError::MissingLegacyFields(missing));
        }

        let fields = LEGACY_REQUIRED_KEYS
            .iter()
            .filter_map(|key| body.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect();
        Ok(Self(fields))
    }
}

/// Decode `raw` and select the processing mode.
pub fn classify(raw: &[u8]) -> RelayResult<RelayRequest> {
    let mut body: Map<String, Value> =
        serde_json::from_slice(raw).map_err(|_| RelayError::InvalidBody)?;

    match body.remove(DH_BODY_KEY) {
        Some(Value::Object(order)) => Ok(RelayRequest::Live(OrderPayload::try_from(order)?)),
        Some(_) => Err(RelayError::InvalidPayloadShape),
        None => Ok(RelayRequest::Legacy(LegacyOrder::try_from(&body)?)),
    }
}

fn missing_keys(map: &Map<String, Value>, required: &[&'static str]) -> Vec<&'static str> {
    required
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect()
}
