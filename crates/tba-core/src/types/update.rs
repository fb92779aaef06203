use serde::{Deserialize, Serialize};

use super::{
    chat_member::{ChatJoinRequest, ChatMemberUpdated},
    message::Message,
    payments::{PreCheckoutQuery, ShippingQuery},
    poll::{Poll, PollAnswer},
    queries::{CallbackQuery, ChosenInlineResult, InlineQuery},
};

/// An incoming event.
///
/// The platform sends at most one payload per update. A payload with more
/// than one known kind is rejected; one with none of them (a kind this crate
/// doesn't model yet) parses as [`UpdateKind::Unsupported`].
///
/// See: <https://core.telegram.org/bots/api#update>
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUpdate", into = "RawUpdate")]
pub struct Update {
    pub update_id: i64,
    pub kind: UpdateKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateKind {
    Message(Box<Message>),
    EditedMessage(Box<Message>),
    ChannelPost(Box<Message>),
    EditedChannelPost(Box<Message>),
    InlineQuery(InlineQuery),
    ChosenInlineResult(ChosenInlineResult),
    CallbackQuery(Box<CallbackQuery>),
    ShippingQuery(ShippingQuery),
    PreCheckoutQuery(PreCheckoutQuery),
    Poll(Poll),
    PollAnswer(PollAnswer),
    MyChatMember(Box<ChatMemberUpdated>),
    ChatMember(Box<ChatMemberUpdated>),
    ChatJoinRequest(Box<ChatJoinRequest>),
    Unsupported,
}

/// Update kind names, as used by `allowed_updates`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
    ChatJoinRequest,
}

impl Update {
    /// `None` for [`UpdateKind::Unsupported`].
    pub fn kind_type(&self) -> Option<UpdateType> {
        let ty = match &self.kind {
            UpdateKind::Message(_) => UpdateType::Message,
            UpdateKind::EditedMessage(_) => UpdateType::EditedMessage,
            UpdateKind::ChannelPost(_) => UpdateType::ChannelPost,
            UpdateKind::EditedChannelPost(_) => UpdateType::EditedChannelPost,
            UpdateKind::InlineQuery(_) => UpdateType::InlineQuery,
            UpdateKind::ChosenInlineResult(_) => UpdateType::ChosenInlineResult,
            UpdateKind::CallbackQuery(_) => UpdateType::CallbackQuery,
            UpdateKind::ShippingQuery(_) => UpdateType::ShippingQuery,
            UpdateKind::PreCheckoutQuery(_) => UpdateType::PreCheckoutQuery,
            UpdateKind::Poll(_) => UpdateType::Poll,
            UpdateKind::PollAnswer(_) => UpdateType::PollAnswer,
            UpdateKind::MyChatMember(_) => UpdateType::MyChatMember,
            UpdateKind::ChatMember(_) => UpdateType::ChatMember,
            UpdateKind::ChatJoinRequest(_) => UpdateType::ChatJoinRequest,
            UpdateKind::Unsupported => return None,
        };
        Some(ty)
    }

    /// The message carried by message-like updates (new or edited, chat or channel).
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(m)
            | UpdateKind::EditedMessage(m)
            | UpdateKind::ChannelPost(m)
            | UpdateKind::EditedChannelPost(m) => Some(&**m),
            UpdateKind::CallbackQuery(q) => q.message.as_deref(),
            _ => None,
        }
    }

    /// Offset to pass to `getUpdates` to acknowledge this update.
    pub fn next_offset(&self) -> i64 {
        self.update_id + 1
    }
}

#[derive(Default, Serialize, Deserialize)]
struct RawUpdate {
    update_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edited_message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_post: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edited_channel_post: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_query: Option<InlineQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chosen_inline_result: Option<ChosenInlineResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_query: Option<Box<CallbackQuery>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shipping_query: Option<ShippingQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pre_checkout_query: Option<PreCheckoutQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    poll: Option<Poll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    poll_answer: Option<PollAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    my_chat_member: Option<Box<ChatMemberUpdated>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_member: Option<Box<ChatMemberUpdated>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_join_request: Option<Box<ChatJoinRequest>>,
}

impl TryFrom<RawUpdate> for Update {
    type Error = String;

    fn try_from(raw: RawUpdate) -> Result<Self, Self::Error> {
        let mut found: Vec<(&'static str, UpdateKind)> = Vec::new();
        if let Some(m) = raw.message {
            found.push(("message", UpdateKind::Message(m)));
        }
        if let Some(m) = raw.edited_message {
            found.push(("edited_message", UpdateKind::EditedMessage(m)));
        }
        if let Some(m) = raw.channel_post {
            found.push(("channel_post", UpdateKind::ChannelPost(m)));
        }
        if let Some(m) = raw.edited_channel_post {
            found.push(("edited_channel_post", UpdateKind::EditedChannelPost(m)));
        }
        if let Some(q) = raw.inline_query {
            found.push(("inline_query", UpdateKind::InlineQuery(q)));
        }
        if let Some(r) = raw.chosen_inline_result {
            found.push(("chosen_inline_result", UpdateKind::ChosenInlineResult(r)));
        }
        if let Some(q) = raw.callback_query {
            found.push(("callback_query", UpdateKind::CallbackQuery(q)));
        }
        if let Some(q) = raw.shipping_query {
            found.push(("shipping_query", UpdateKind::ShippingQuery(q)));
        }
        if let Some(q) = raw.pre_checkout_query {
            found.push(("pre_checkout_query", UpdateKind::PreCheckoutQuery(q)));
        }
        if let Some(p) = raw.poll {
            found.push(("poll", UpdateKind::Poll(p)));
        }
        if let Some(a) = raw.poll_answer {
            found.push(("poll_answer", UpdateKind::PollAnswer(a)));
        }
        if let Some(c) = raw.my_chat_member {
            found.push(("my_chat_member", UpdateKind::MyChatMember(c)));
        }
        if let Some(c) = raw.chat_member {
            found.push(("chat_member", UpdateKind::ChatMember(c)));
        }
        if let Some(r) = raw.chat_join_request {
            found.push(("chat_join_request", UpdateKind::ChatJoinRequest(r)));
        }

        if found.len() > 1 {
            let names: Vec<&str> = found.iter().map(|(name, _)| *name).collect();
            return Err(format!(
                "Update has mutually exclusive fields set together: {}",
                names.join(", ")
            ));
        }
        let kind = found
            .pop()
            .map(|(_, kind)| kind)
            .unwrap_or(UpdateKind::Unsupported);
        Ok(Update {
            update_id: raw.update_id,
            kind,
        })
    }
}

impl From<Update> for RawUpdate {
    fn from(update: Update) -> Self {
        let mut raw = RawUpdate {
            update_id: update.update_id,
            ..RawUpdate::default()
        };
        match update.kind {
            UpdateKind::Message(m) => raw.message = Some(m),
            UpdateKind::EditedMessage(m) => raw.edited_message = Some(m),
            UpdateKind::ChannelPost(m) => raw.channel_post = Some(m),
            UpdateKind::EditedChannelPost(m) => raw.edited_channel_post = Some(m),
            UpdateKind::InlineQuery(q) => raw.inline_query = Some(q),
            UpdateKind::ChosenInlineResult(r) => raw.chosen_inline_result = Some(r),
            UpdateKind::CallbackQuery(q) => raw.callback_query = Some(q),
            UpdateKind::ShippingQuery(q) => raw.shipping_query = Some(q),
            UpdateKind::PreCheckoutQuery(q) => raw.pre_checkout_query = Some(q),
            UpdateKind::Poll(p) => raw.poll = Some(p),
            UpdateKind::PollAnswer(a) => raw.poll_answer = Some(a),
            UpdateKind::MyChatMember(c) => raw.my_chat_member = Some(c),
            UpdateKind::ChatMember(c) => raw.chat_member = Some(c),
            UpdateKind::ChatJoinRequest(r) => raw.chat_join_request = Some(r),
            UpdateKind::Unsupported => {}
        }
        raw
    }
}
