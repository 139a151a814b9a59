use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The session could not be recovered by a token refresh. Stored
    /// credentials have already been discarded when this is returned.
    #[error("Session expired")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("Request failed ({status}): {detail}")]
    RequestFailed {
        status: u16,
        detail: String,
        data: JsonValue,
    },

    #[cfg(feature = "client")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid cart: {0}")]
    InvalidCart(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Builds a [`Error::RequestFailed`] from a status and the raw error body.
    ///
    /// The message prefers the body's `detail` field, then `error`.
    pub(crate) fn request_failed(status: u16, data: JsonValue) -> Self {
        let detail = ["detail", "error"]
            .iter()
            .find_map(|key| data.get(*key).and_then(JsonValue::as_str))
            .unwrap_or("Request failed")
            .to_owned();
        Self::RequestFailed {
            status,
            detail,
            data,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RequestFailed { status, .. } => Some(*status),
            #[cfg(feature = "client")]
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Field-level validation messages from a failed request.
    ///
    /// Backend validation errors arrive as `{"field": ["message", ...]}`.
    /// Scalar values are wrapped into a single-element list; the `detail`
    /// and `error` keys are not fields and are skipped.
    #[must_use]
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Self::RequestFailed {
            data: JsonValue::Object(map),
            ..
        } = self
        else {
            return BTreeMap::new();
        };

        map.iter()
            .filter(|(key, _)| key.as_str() != "detail" && key.as_str() != "error")
            .filter_map(|(key, value)| {
                let messages: Vec<String> = match value {
                    JsonValue::Array(items) => items.iter().map(message_text).collect(),
                    JsonValue::String(_) => vec![message_text(value)],
                    _ => return None,
                };
                Some((key.clone(), messages))
            })
            .collect()
    }
}

fn message_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
