use async_trait::async_trait;

use crate::errors::TransportError;

/// A file sent as a `multipart/form-data` part named `field`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One cleaned, wire-encoded API call.
///
/// Always sent as POST: a url-encoded form when `files` is empty, multipart otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// Full method URL. Contains the bot token; never log it verbatim.
    pub url: String,
    pub params: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl TransportRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .map(|(k, _)| k.as_str())
            .chain(self.files.iter().map(|f| f.field.as_str()))
            .collect()
    }
}

/// Raw HTTP reply as seen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// URL of the request that produced this response (after redirects).
    pub request_url: Option<String>,
}

impl TransportResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Hexagonal port for the HTTP transport.
///
/// The implementation owns connection pooling, TLS and redirects. The client only
/// issues requests through a shared handle and never reconfigures it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}
