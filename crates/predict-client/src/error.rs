use thiserror::Error;

/// Anything that goes wrong between sending a request and holding a parsed
/// response. Callers show one message for all of these; the variants only
/// matter for logs.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned status {status}{}", format_detail(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn format_detail(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl TransportError {
    /// Short tag for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::InvalidEndpoint { .. } => "invalid_endpoint",
            TransportError::Request(err) if err.is_connect() => "connect",
            TransportError::Request(err) if err.is_timeout() => "timeout",
            TransportError::Request(_) => "request",
            TransportError::Status { .. } => "status",
            TransportError::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_detail_when_present() {
        let err = TransportError::Status {
            status: 400,
            detail: Some("Processing error: bad input".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "service returned status 400: Processing error: bad input"
        );
        assert_eq!(err.kind(), "status");

        let err = TransportError::Status {
            status: 502,
            detail: None,
        };
        assert_eq!(err.to_string(), "service returned status 502");
    }

    #[test]
    fn decode_errors_are_tagged() {
        let err: TransportError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), "decode");
    }
}
