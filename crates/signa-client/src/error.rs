//! Client errors

use signa_core::SignaError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network, DNS, TLS or timeout
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Body is not the JSON we expected
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ClientError> for SignaError {
    fn from(err: ClientError) -> Self {
        SignaError::Transport(err.to_string())
    }
}

/// Pass 2xx responses through, turn anything else into `ClientError::Api`.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ClientError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
