use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    chat::Chat,
    keyboard::InlineKeyboardMarkup,
    media::{
        Animation, Audio, Contact, Dice, Document, Location, PhotoSize, Sticker, Venue, Video,
        VideoNote, Voice,
    },
    payments::{Invoice, SuccessfulPayment},
    poll::Poll,
    service::{
        ChatShared, ForumTopicCreated, ForumTopicEdited, MessageAutoDeleteTimerChanged,
        ProximityAlertTriggered, ServiceMarker, UserShared, VideoChatEnded,
        VideoChatParticipantsInvited, VideoChatScheduled, WebAppData, WriteAccessAllowed,
    },
    user::User,
    Entity, JsonObject,
};
use crate::{errors::SchemaValidationError, normalize};

/// A message.
///
/// Payload fields are independent optionals: a photo message has `photo` and
/// maybe `caption`, a service message has one of the event fields, and so on.
/// `reply_to_message` and `pinned_message` are messages themselves; nesting
/// depth is whatever the payload carries.
///
/// The wire key `from` is exposed as [`Message::from_user`].
///
/// See: <https://core.telegram.org/bots/api#message>
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub message_thread_id: Option<i64>,
    #[serde(rename = "from")]
    pub from_user: Option<User>,
    pub sender_chat: Option<Chat>,
    /// Unix time.
    pub date: i64,
    pub chat: Chat,
    pub forward_from: Option<User>,
    pub forward_from_chat: Option<Chat>,
    pub forward_from_message_id: Option<i64>,
    pub forward_signature: Option<String>,
    pub forward_sender_name: Option<String>,
    pub forward_date: Option<i64>,
    pub is_topic_message: Option<bool>,
    pub is_automatic_forward: Option<bool>,
    pub reply_to_message: Option<Box<Message>>,
    pub via_bot: Option<User>,
    pub edit_date: Option<i64>,
    pub has_protected_content: Option<bool>,
    pub media_group_id: Option<String>,
    pub author_signature: Option<String>,
    pub text: Option<String>,
    pub entities: Option<Vec<MessageEntity>>,
    pub animation: Option<Animation>,
    pub audio: Option<Audio>,
    pub document: Option<Document>,
    pub photo: Option<Vec<PhotoSize>>,
    pub sticker: Option<Sticker>,
    pub video: Option<Video>,
    pub video_note: Option<VideoNote>,
    pub voice: Option<Voice>,
    pub caption: Option<String>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub has_media_spoiler: Option<bool>,
    pub contact: Option<Contact>,
    pub dice: Option<Dice>,
    pub game: Option<JsonObject>,
    pub poll: Option<Poll>,
    pub venue: Option<Venue>,
    pub location: Option<Location>,
    pub new_chat_members: Option<Vec<User>>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: Option<String>,
    pub new_chat_photo: Option<Vec<PhotoSize>>,
    pub delete_chat_photo: Option<bool>,
    pub group_chat_created: Option<bool>,
    pub supergroup_chat_created: Option<bool>,
    pub channel_chat_created: Option<bool>,
    pub message_auto_delete_timer_changed: Option<MessageAutoDeleteTimerChanged>,
    pub migrate_to_chat_id: Option<i64>,
    pub migrate_from_chat_id: Option<i64>,
    pub pinned_message: Option<Box<Message>>,
    pub invoice: Option<Invoice>,
    pub successful_payment: Option<SuccessfulPayment>,
    pub user_shared: Option<UserShared>,
    pub chat_shared: Option<ChatShared>,
    pub connected_website: Option<String>,
    pub write_access_allowed: Option<WriteAccessAllowed>,
    pub passport_data: Option<JsonObject>,
    pub proximity_alert_triggered: Option<ProximityAlertTriggered>,
    pub forum_topic_created: Option<ForumTopicCreated>,
    pub forum_topic_edited: Option<ForumTopicEdited>,
    pub forum_topic_closed: Option<ServiceMarker>,
    pub forum_topic_reopened: Option<ServiceMarker>,
    pub general_forum_topic_hidden: Option<ServiceMarker>,
    pub general_forum_topic_unhidden: Option<ServiceMarker>,
    pub video_chat_scheduled: Option<VideoChatScheduled>,
    pub video_chat_started: Option<ServiceMarker>,
    pub video_chat_ended: Option<VideoChatEnded>,
    pub video_chat_participants_invited: Option<VideoChatParticipantsInvited>,
    pub web_app_data: Option<WebAppData>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl Message {
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    pub fn edit_date_time(&self) -> Option<DateTime<Utc>> {
        self.edit_date.and_then(|d| DateTime::from_timestamp(d, 0))
    }

    /// Text of a text message, caption of a media message.
    pub fn text_or_caption(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    /// Entities matching [`Message::text_or_caption`].
    pub fn text_entities(&self) -> &[MessageEntity] {
        let list = if self.text.is_some() {
            &self.entities
        } else {
            &self.caption_entities
        };
        list.as_deref().unwrap_or(&[])
    }

    /// Length of the `reply_to_message` chain below this message.
    pub fn reply_depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.reply_to_message.as_deref();
        while let Some(m) = cur {
            depth += 1;
            cur = m.reply_to_message.as_deref();
        }
        depth
    }
}

/// One annotated span of message text (mention, hashtag, link, ...).
///
/// `offset` and `length` are in UTF-16 code units, as the platform counts them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageEntity {
    /// `mention`, `bot_command`, `text_link`, ... kept verbatim.
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: u32,
    pub length: u32,
    /// For `text_link`.
    pub url: Option<String>,
    /// For `text_mention`.
    pub user: Option<User>,
    /// For `pre`.
    pub language: Option<String>,
    /// For `custom_emoji`.
    pub custom_emoji_id: Option<String>,
}

impl MessageEntity {
    /// The annotated slice of `text`, or `None` if the span falls outside it
    /// or splits a surrogate pair.
    pub fn extract(&self, text: &str) -> Option<String> {
        let units: Vec<u16> = text.encode_utf16().collect();
        let start = self.offset as usize;
        let end = start.checked_add(self.length as usize)?;
        let span = units.get(start..end)?;
        String::from_utf16(span).ok()
    }
}

/// Result of editing a message: the edited message, or `true` for inline messages.
#[derive(Clone, Debug, PartialEq)]
pub enum EditedMessage {
    Message(Box<Message>),
    Inline(bool),
}

impl Entity for EditedMessage {
    const NAME: &'static str = "Message|Boolean";

    fn parse(raw: Value) -> Result<Self, SchemaValidationError> {
        match raw {
            Value::Bool(done) => Ok(EditedMessage::Inline(done)),
            other => Ok(EditedMessage::Message(Box::new(normalize::parse(
                Self::NAME,
                other,
            )?))),
        }
    }
}
