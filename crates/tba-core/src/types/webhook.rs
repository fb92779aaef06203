use serde::{Deserialize, Serialize};

/// Current webhook status, as returned by `getWebhookInfo`.
///
/// `url` is empty when the bot uses long polling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookInfo {
    pub url: String,
    pub has_custom_certificate: bool,
    pub pending_update_count: i64,
    pub ip_address: Option<String>,
    pub last_error_date: Option<i64>,
    pub last_error_message: Option<String>,
    pub last_synchronization_error_date: Option<i64>,
    pub max_connections: Option<i64>,
    /// Update type names, kept verbatim so newer types don't break parsing.
    pub allowed_updates: Option<Vec<String>>,
}

impl WebhookInfo {
    pub fn is_set(&self) -> bool {
        !self.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use serde_json::json;

    #[test]
    fn polling_bot_has_no_webhook() {
        let info = WebhookInfo::parse(json!({
            "url": "",
            "has_custom_certificate": false,
            "pending_update_count": 0,
            "ip_address": null
        }))
        .unwrap();
        assert!(!info.is_set());
        assert_eq!(info.ip_address, None);
        assert_eq!(info.allowed_updates, None);
    }

    #[test]
    fn missing_pending_count_is_reported() {
        let err = WebhookInfo::parse(json!({"url": "", "has_custom_certificate": false}))
            .unwrap_err();
        assert!(err.mentions("pending_update_count"));
    }
}
