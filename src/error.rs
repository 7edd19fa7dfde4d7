use thiserror::Error;

/// Failures a transport call can produce, kept apart so callers can
/// render them differently: the network failed, the server said no, or
/// the server answered with something we could not decode.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed response body: {reason}; body: {body}")]
    Decode { reason: String, body: String },
}

impl ApiError {
    pub(crate) fn rejected(status: reqwest::StatusCode, message: Option<String>) -> Self {
        Self::Rejected {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| "no error message".to_string()),
        }
    }

    pub(crate) fn decode(err: serde_json::Error, body: &str) -> Self {
        Self::Decode {
            reason: err.to_string(),
            body: truncate(body),
        }
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 512;
    if s.len() > MAX {
        let mut end = MAX;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}
