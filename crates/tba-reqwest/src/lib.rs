//! `reqwest` adapter for the Bot API transport port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tba_core::{
    errors::{Error, TransportError},
    ports::{Transport, TransportRequest, TransportResponse},
    Result,
};
use tracing::trace;

/// HTTP transport over a shared `reqwest::Client` (connection pool).
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            // 3xx must reach the client's status classification.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {}", e.without_url())))?;
        Ok(Self { http })
    }

    /// Use a caller-owned client; it is only ever used to send requests.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let builder = self.http.post(&request.url);
        let builder = if request.files.is_empty() {
            builder.form(&request.params)
        } else {
            let mut form = Form::new();
            for (name, value) in request.params {
                form = form.text(name, value);
            }
            for file in request.files {
                form = form.part(file.field, Part::bytes(file.bytes).file_name(file.file_name));
            }
            builder.multipart(form)
        };

        let resp = builder.send().await.map_err(map_error)?;

        let status = resp.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();
        let request_url = Some(resp.url().to_string());
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = resp.bytes().await.map_err(map_error)?.to_vec();
        trace!(status = status.as_u16(), len = body.len(), "response received");

        Ok(TransportResponse {
            status: status.as_u16(),
            reason,
            headers,
            body,
            request_url,
        })
    }
}

/// reqwest errors embed the URL, which embeds the token; strip it first.
fn map_error(err: reqwest::Error) -> TransportError {
    let err = err.without_url();
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
