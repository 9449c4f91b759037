use serde_json::Value;

/// Fallback shown when the API gave no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Message carried by an API error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    /// Extracts a human-readable message from an arbitrary error body.
    ///
    /// Looks at `message`, then `error.message`, then `data.message`, then a
    /// bare string `error`. Returns `None` when none of them is a non-empty
    /// string.
    #[must_use]
    pub fn extract_message(body: &Value) -> Option<String> {
        let candidates = [
            body.get("message"),
            body.get("error").and_then(|error| error.get("message")),
            body.get("data").and_then(|data| data.get("message")),
            body.get("error"),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|message| !message.is_empty())
            .map(ToString::to_string)
    }

    /// Parses a raw response body, falling back to [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| Self::extract_message(&value))
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Self { message }
    }
}
