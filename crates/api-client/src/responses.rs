use serde::Deserialize;
use serde_json::Value;

/// The structured error body the backend sends with 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// Extracts the human-readable message from a failed response body.
///
/// A structured `{"error": ...}` body is forwarded as-is; anything else falls back to
/// the raw body, then to the status reason when the body is empty.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) {
        return parsed.error;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Takes the payload out of the backend's `{"<key>": ...}` envelope.
///
/// Bodies without the envelope are returned whole.
pub(crate) fn unwrap_envelope(mut body: Value, key: &str) -> Value {
    match body.get_mut(key) {
        Some(inner) => inner.take(),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn structured_error_is_forwarded() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"error": "Liga e temporada são obrigatórios."}"#);
        assert_eq!(msg, "Liga e temporada são obrigatórios.");
    }

    #[test]
    fn unstructured_error_falls_back_to_body_then_reason() {
        let msg = error_message(StatusCode::UNAUTHORIZED, r#"{"msg": "Missing Authorization Header"}"#);
        assert_eq!(msg, r#"{"msg": "Missing Authorization Header"}"#);
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  "), "Bad Gateway");
    }

    #[test]
    fn envelopes_are_unwrapped() {
        assert_eq!(unwrap_envelope(json!({"teams": [1, 2]}), "teams"), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!([1, 2]), "teams"), json!([1, 2]));
    }
}
