//! HTTP status classification.
//!
//! Runs before any attempt to read the response body as a platform payload.

use serde::Deserialize;

use crate::{errors::PlatformStatusError, normalize, ports::TransportResponse};

/// Standard status-class families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFamily {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
    Invalid,
}

impl StatusFamily {
    pub fn of(status: u16) -> Self {
        match status {
            100..=199 => StatusFamily::Informational,
            200..=299 => StatusFamily::Success,
            300..=399 => StatusFamily::Redirect,
            400..=499 => StatusFamily::ClientError,
            500..=599 => StatusFamily::ServerError,
            _ => StatusFamily::Invalid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFamily::Informational => "Informational response",
            StatusFamily::Success => "Success",
            StatusFamily::Redirect => "Redirect response",
            StatusFamily::ClientError => "Client error",
            StatusFamily::ServerError => "Server error",
            StatusFamily::Invalid => "Invalid status code",
        }
    }
}

/// Extra details the platform attaches to failed requests.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResponseParameters {
    pub migrate_to_chat_id: Option<i64>,
    pub retry_after: Option<u64>,
}

/// The `{ok, result?, description?, error_code?, parameters?}` wrapper around every reply.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    pub result: Option<serde_json::Value>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

/// Fail unless `response` carries a 2xx status.
///
/// `url` must already be redacted. When the body happens to be a platform
/// envelope its error details are copied into the error.
pub fn check(response: &TransportResponse, url: &str) -> Result<(), PlatformStatusError> {
    let family = StatusFamily::of(response.status);
    if family == StatusFamily::Success {
        return Ok(());
    }

    let envelope = normalize::from_slice::<Envelope>(&response.body).ok();
    let location = if family == StatusFamily::Redirect {
        response.header("location").map(str::to_string)
    } else {
        None
    };

    let mut err = PlatformStatusError {
        family,
        status: response.status,
        reason: response.reason.clone(),
        url: url.to_string(),
        location,
        error_code: None,
        description: None,
        retry_after: None,
        migrate_to_chat_id: None,
    };
    if let Some(envelope) = envelope {
        attach_envelope(&mut err, envelope);
    }
    Err(err)
}

/// Build the failure for an `ok: false` envelope delivered with a 2xx status.
pub fn rejected(response: &TransportResponse, url: &str, envelope: Envelope) -> PlatformStatusError {
    let code = envelope
        .error_code
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(response.status);
    let mut err = PlatformStatusError {
        family: StatusFamily::of(code),
        status: response.status,
        reason: response.reason.clone(),
        url: url.to_string(),
        location: None,
        error_code: None,
        description: None,
        retry_after: None,
        migrate_to_chat_id: None,
    };
    attach_envelope(&mut err, envelope);
    err
}

fn attach_envelope(err: &mut PlatformStatusError, envelope: Envelope) {
    err.error_code = envelope.error_code;
    err.description = envelope.description;
    if let Some(params) = envelope.parameters {
        err.retry_after = params.retry_after;
        err.migrate_to_chat_id = params.migrate_to_chat_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, reason: &str, headers: &[(&str, &str)], body: &str) -> TransportResponse {
        TransportResponse {
            status,
            reason: reason.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
            request_url: Some("https://api.telegram.org/botX/getMe".to_string()),
        }
    }

    const URL: &str = "https://api.telegram.org/bot<redacted>/getMe";

    #[test]
    fn families_follow_status_classes() {
        assert_eq!(StatusFamily::of(101), StatusFamily::Informational);
        assert_eq!(StatusFamily::of(204), StatusFamily::Success);
        assert_eq!(StatusFamily::of(308), StatusFamily::Redirect);
        assert_eq!(StatusFamily::of(429), StatusFamily::ClientError);
        assert_eq!(StatusFamily::of(502), StatusFamily::ServerError);
        assert_eq!(StatusFamily::of(42), StatusFamily::Invalid);
    }

    #[test]
    fn success_passes() {
        assert!(check(&response(200, "OK", &[], "{}"), URL).is_ok());
    }

    #[test]
    fn redirect_carries_location() {
        let resp = response(301, "Moved Permanently", &[("Location", "https://example.org/")], "");
        let err = check(&resp, URL).unwrap_err();
        assert_eq!(err.family, StatusFamily::Redirect);
        assert_eq!(err.location.as_deref(), Some("https://example.org/"));
        assert_eq!(err.url, URL);
    }

    #[test]
    fn client_and_server_errors_are_named() {
        let err = check(&response(404, "Not Found", &[], "not json"), URL).unwrap_err();
        assert!(err.to_string().contains("Client error"));
        assert_eq!(err.description, None);

        let err = check(&response(500, "Internal Server Error", &[], ""), URL).unwrap_err();
        assert!(err.to_string().contains("Server error"));
    }

    #[test]
    fn platform_envelope_details_are_attached() {
        let body = r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 3","parameters":{"retry_after":3}}"#;
        let err = check(&response(429, "Too Many Requests", &[], body), URL).unwrap_err();
        assert_eq!(err.error_code, Some(429));
        assert_eq!(err.retry_after, Some(3));
        assert!(err.to_string().contains("retry after 3"));
    }

    #[test]
    fn rejected_envelope_uses_error_code_family() {
        let envelope = Envelope {
            ok: false,
            result: None,
            description: Some("Bad Request: chat not found".to_string()),
            error_code: Some(400),
            parameters: None,
        };
        let err = rejected(&response(200, "OK", &[], ""), URL, envelope);
        assert_eq!(err.family, StatusFamily::ClientError);
        assert_eq!(err.status, 200);
    }
}
