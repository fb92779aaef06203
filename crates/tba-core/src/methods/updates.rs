//! Bot identity and update delivery: `getMe`, polling and webhooks.

use serde::Serialize;

use super::Method;
use crate::{
    domain::InputFile,
    ports::FilePart,
    types::{Update, UpdateType, User, WebhookInfo},
};

#[derive(Clone, Debug, Default, Serialize)]
pub struct GetMe {}

impl Method for GetMe {
    const NAME: &'static str = "getMe";
    type Output = User;
}

/// Long polling. Pass the last seen `update_id + 1` as `offset` to acknowledge.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GetUpdates {
    pub offset: Option<i64>,
    /// 1-100, defaults to 100.
    pub limit: Option<u32>,
    /// Long-polling timeout in seconds; 0 is short polling.
    pub timeout: Option<u32>,
    pub allowed_updates: Option<Vec<UpdateType>>,
}

impl Method for GetUpdates {
    const NAME: &'static str = "getUpdates";
    type Output = Vec<Update>;
}

#[derive(Clone, Debug, Serialize)]
pub struct SetWebhook {
    /// HTTPS URL; an empty string removes the webhook.
    pub url: String,
    #[serde(flatten)]
    pub options: SetWebhookOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SetWebhookOptions {
    /// Public key certificate; must be an upload.
    pub certificate: Option<InputFile>,
    pub ip_address: Option<String>,
    /// 1-100, defaults to 40.
    pub max_connections: Option<u32>,
    pub allowed_updates: Option<Vec<UpdateType>>,
    pub drop_pending_updates: Option<bool>,
    /// Echoed back in the `X-Telegram-Bot-Api-Secret-Token` header.
    pub secret_token: Option<String>,
}

impl SetWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: SetWebhookOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SetWebhookOptions) -> Self {
        self.options = options;
        self
    }
}

impl Method for SetWebhook {
    const NAME: &'static str = "setWebhook";
    type Output = bool;

    fn uploads(&self) -> Vec<FilePart> {
        self.options
            .certificate
            .as_ref()
            .and_then(|f| f.upload_part("certificate"))
            .into_iter()
            .collect()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DeleteWebhook {
    pub drop_pending_updates: Option<bool>,
}

impl Method for DeleteWebhook {
    const NAME: &'static str = "deleteWebhook";
    type Output = bool;
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct GetWebhookInfo {}

impl Method for GetWebhookInfo {
    const NAME: &'static str = "getWebhookInfo";
    type Output = WebhookInfo;
}
