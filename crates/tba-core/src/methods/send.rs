//! Sending messages.

use serde::Serialize;

use super::Method;
use crate::{
    domain::{ChatId, InputFile, ParseMode},
    ports::FilePart,
    types::{Message, MessageEntity, ReplyMarkup},
};

/// See: <https://core.telegram.org/bots/api#sendmessage>
#[derive(Clone, Debug, Serialize)]
pub struct SendMessage {
    pub chat_id: ChatId,
    pub text: String,
    #[serde(flatten)]
    pub options: SendMessageOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SendMessageOptions {
    /// Forum topic.
    pub message_thread_id: Option<i64>,
    pub parse_mode: Option<ParseMode>,
    /// Used instead of `parse_mode`.
    pub entities: Option<Vec<MessageEntity>>,
    pub disable_web_page_preview: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<i64>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessage {
    pub fn new(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            options: SendMessageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendMessageOptions) -> Self {
        self.options = options;
        self
    }
}

impl Method for SendMessage {
    const NAME: &'static str = "sendMessage";
    type Output = Message;
}

/// See: <https://core.telegram.org/bots/api#sendphoto>
#[derive(Clone, Debug, Serialize)]
pub struct SendPhoto {
    pub chat_id: ChatId,
    pub photo: InputFile,
    #[serde(flatten)]
    pub options: SendPhotoOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SendPhotoOptions {
    pub message_thread_id: Option<i64>,
    /// 0-1024 characters after entity parsing.
    pub caption: Option<String>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub has_spoiler: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<i64>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendPhoto {
    pub fn new(chat_id: impl Into<ChatId>, photo: InputFile) -> Self {
        Self {
            chat_id: chat_id.into(),
            photo,
            options: SendPhotoOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendPhotoOptions) -> Self {
        self.options = options;
        self
    }
}

impl Method for SendPhoto {
    const NAME: &'static str = "sendPhoto";
    type Output = Message;

    fn uploads(&self) -> Vec<FilePart> {
        self.photo.upload_part("photo").into_iter().collect()
    }
}

/// See: <https://core.telegram.org/bots/api#senddocument>
#[derive(Clone, Debug, Serialize)]
pub struct SendDocument {
    pub chat_id: ChatId,
    pub document: InputFile,
    #[serde(flatten)]
    pub options: SendDocumentOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SendDocumentOptions {
    pub message_thread_id: Option<i64>,
    /// JPEG under 200 kB, at most 320x320. Only honoured as an upload.
    pub thumbnail: Option<InputFile>,
    pub caption: Option<String>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub disable_content_type_detection: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<i64>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendDocument {
    pub fn new(chat_id: impl Into<ChatId>, document: InputFile) -> Self {
        Self {
            chat_id: chat_id.into(),
            document,
            options: SendDocumentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendDocumentOptions) -> Self {
        self.options = options;
        self
    }
}

impl Method for SendDocument {
    const NAME: &'static str = "sendDocument";
    type Output = Message;

    fn uploads(&self) -> Vec<FilePart> {
        let thumbnail = self
            .options
            .thumbnail
            .as_ref()
            .and_then(|f| f.upload_part("thumbnail"));
        self.document
            .upload_part("document")
            .into_iter()
            .chain(thumbnail)
            .collect()
    }
}

/// See: <https://core.telegram.org/bots/api#sendlocation>
#[derive(Clone, Debug, Serialize)]
pub struct SendLocation {
    pub chat_id: ChatId,
    #[serde(serialize_with = "super::finite")]
    pub latitude: f64,
    #[serde(serialize_with = "super::finite")]
    pub longitude: f64,
    #[serde(flatten)]
    pub options: SendLocationOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SendLocationOptions {
    pub message_thread_id: Option<i64>,
    #[serde(serialize_with = "super::finite_opt")]
    pub horizontal_accuracy: Option<f64>,
    /// Seconds the live location stays updatable, 60-86400.
    pub live_period: Option<u32>,
    pub heading: Option<u32>,
    pub proximity_alert_radius: Option<u32>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<i64>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendLocation {
    pub fn new(chat_id: impl Into<ChatId>, latitude: f64, longitude: f64) -> Self {
        Self {
            chat_id: chat_id.into(),
            latitude,
            longitude,
            options: SendLocationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendLocationOptions) -> Self {
        self.options = options;
        self
    }
}

impl Method for SendLocation {
    const NAME: &'static str = "sendLocation";
    type Output = Message;
}
