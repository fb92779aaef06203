//! Schema model: typed mirrors of the platform's objects.
//!
//! Absent fields are `None` (never `Some(null)`); payloads are normalized by
//! [`crate::normalize`] before they reach serde, and serialized output goes
//! through the same rule via [`Entity::to_json`].

use serde::Serialize;
use serde_json::Value;

use crate::{errors::SchemaValidationError, normalize};

pub mod chat;
pub mod chat_member;
pub mod keyboard;
pub mod media;
pub mod message;
pub mod payments;
pub mod poll;
pub mod queries;
pub mod service;
pub mod update;
pub mod user;
pub mod webhook;

pub use chat::*;
pub use chat_member::*;
pub use keyboard::*;
pub use media::*;
pub use message::*;
pub use payments::*;
pub use poll::*;
pub use queries::*;
pub use service::*;
pub use update::*;
pub use user::*;
pub use webhook::*;

/// Untyped object payloads (`game`, `passport_data`).
pub type JsonObject = serde_json::Map<String, Value>;

/// Anything that can be parsed out of a response `result`.
pub trait Entity: Sized {
    const NAME: &'static str;

    fn parse(raw: Value) -> Result<Self, SchemaValidationError>;

    /// Value to use when the envelope has no `result` at all.
    fn from_missing() -> Result<Self, SchemaValidationError> {
        Err(SchemaValidationError::new(
            Self::NAME,
            ".",
            "missing field `result`",
        ))
    }

    /// Normalized JSON form (wire key names, no `null` members).
    fn to_json(&self) -> serde_json::Result<Value>
    where
        Self: Serialize,
    {
        normalize::to_value(self)
    }
}

macro_rules! entity {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Entity for $ty {
                const NAME: &'static str = $name;

                fn parse(raw: Value) -> Result<Self, SchemaValidationError> {
                    normalize::parse(Self::NAME, raw)
                }
            }
        )*
    };
}

entity! {
    User => "User",
    Chat => "Chat",
    ChatPhoto => "ChatPhoto",
    ChatPermissions => "ChatPermissions",
    ChatAdministratorRights => "ChatAdministratorRights",
    Message => "Message",
    MessageEntity => "MessageEntity",
    PhotoSize => "PhotoSize",
    Animation => "Animation",
    Audio => "Audio",
    Document => "Document",
    Video => "Video",
    VideoNote => "VideoNote",
    Voice => "Voice",
    Sticker => "Sticker",
    Contact => "Contact",
    Dice => "Dice",
    Location => "Location",
    Venue => "Venue",
    InlineKeyboardButton => "InlineKeyboardButton",
    InlineKeyboardMarkup => "InlineKeyboardMarkup",
    KeyboardButton => "KeyboardButton",
    ReplyKeyboardMarkup => "ReplyKeyboardMarkup",
    Update => "Update",
    Vec<Update> => "Update[]",
    InlineQuery => "InlineQuery",
    ChosenInlineResult => "ChosenInlineResult",
    CallbackQuery => "CallbackQuery",
    Poll => "Poll",
    PollAnswer => "PollAnswer",
    Invoice => "Invoice",
    SuccessfulPayment => "SuccessfulPayment",
    OrderInfo => "OrderInfo",
    ShippingAddress => "ShippingAddress",
    ShippingQuery => "ShippingQuery",
    PreCheckoutQuery => "PreCheckoutQuery",
    ChatMember => "ChatMember",
    ChatMemberUpdated => "ChatMemberUpdated",
    ChatInviteLink => "ChatInviteLink",
    ChatJoinRequest => "ChatJoinRequest",
    WebhookInfo => "WebhookInfo",
}

/// Boolean-style methods: a missing `result` reads as `false`.
impl Entity for bool {
    const NAME: &'static str = "Boolean";

    fn parse(raw: Value) -> Result<Self, SchemaValidationError> {
        normalize::parse(Self::NAME, raw)
    }

    fn from_missing() -> Result<Self, SchemaValidationError> {
        Ok(false)
    }
}
