//! Payload parsers, one per API endpoint.

pub mod budgets;
pub mod goals;
pub mod merchants;
pub mod receipts;
pub mod summary;

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse a JSON body, surfacing `{"error": "..."}` responses as errors.
pub(crate) fn decode_body<T: DeserializeOwned>(json: &str, what: &str) -> Result<T> {
    let value: Value =
        serde_json::from_str(json).with_context(|| format!("{what} payload is not valid JSON"))?;
    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        let msg = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
        bail!("{what} request failed: {msg}");
    }
    serde_json::from_value(value).with_context(|| format!("unexpected {what} payload shape"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope() {
        let err = decode_body::<Vec<Value>>(r#"{"error": "Unauthorized"}"#, "receipts").unwrap_err();
        assert_eq!(err.to_string(), "receipts request failed: Unauthorized");
    }

    #[test]
    fn test_invalid_json() {
        assert!(decode_body::<Vec<Value>>("not json", "budgets").is_err());
    }
}
