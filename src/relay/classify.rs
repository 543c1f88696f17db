//! Response classification
//!
//! Upstream responses arrive as raw text and can be (in descending order
//! of usefulness) valid JSON, a structured JSON error, garbage, or an HTML
//! error page from a gateway that never reached the API at all. This
//! module turns a [`RelayResponse`] into a parsed body or a classified,
//! user-actionable error.

use serde_json::Value;

use crate::error::GenError;
use crate::relay::RelayResponse;

/// Classify a relay response into a parsed JSON body or an error.
///
/// Order matters: HTML detection runs before JSON parsing (gateway pages
/// sometimes come back with a JSON content type), and status-code handling
/// runs after parsing so structured error bodies can be surfaced.
pub fn classify(response: &RelayResponse) -> Result<Value, GenError> {
    let trimmed = response.raw_text.trim_start();
    if response.content_type.contains("text/html")
        || trimmed.starts_with("<!")
        || trimmed.starts_with("<html")
    {
        return Err(GenError::GatewayError {
            status: response.status,
            message: gateway_hint(response.status),
        });
    }

    let value: Value = serde_json::from_str(&response.raw_text).map_err(|_| {
        GenError::ParseError(format!(
            "upstream returned an invalid response format: {}...",
            preview(&response.raw_text, 200)
        ))
    })?;

    if !response.is_success() {
        return Err(application_error(response.status, &value));
    }

    Ok(value)
}

/// Fail a parsed body whose application-level flag says the call failed
/// (`ok: false` or `success: false`), surfacing the nested message.
pub fn ensure_success_flag(value: &Value) -> Result<(), GenError> {
    let failed = matches!(value.get("success"), Some(Value::Bool(false)))
        || matches!(value.get("ok"), Some(Value::Bool(false)));
    if failed {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
            .unwrap_or("upstream reported a failed generation")
            .to_string();
        return Err(GenError::ApiError {
            code: 200,
            message,
            details: value.get("error").cloned(),
        });
    }
    Ok(())
}

fn application_error(status: u16, value: &Value) -> GenError {
    let error = value.get("error");
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.and_then(|e| e.get("type")).and_then(Value::as_str))
        .or_else(|| error.and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"));
    GenError::ApiError {
        code: status,
        message,
        details: error.cloned(),
    }
}

/// Actionable message for an HTML gateway response. These status codes are
/// the common symptoms of a misconfigured reverse proxy in front of the
/// actual API.
pub fn gateway_hint(status: u16) -> String {
    match status {
        504 => "Gateway timeout (504). The upstream proxy took too long to respond. \
                Raise the proxy timeout (300s or more) or call the origin API address directly."
            .to_string(),
        502 => "Bad gateway (502). The API proxy could not reach its backend service.".to_string(),
        401 | 403 => "Authentication failed. Check that the API key is correct.".to_string(),
        _ => format!(
            "Upstream returned an error page (HTTP {status}). Check the API endpoint and key."
        ),
    }
}

/// First `max` characters of a string, safe on multi-byte text.
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
