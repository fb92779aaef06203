//! Reacting to callback buttons and editing sent messages.

use serde::Serialize;

use super::Method;
use crate::{
    domain::ChatId,
    types::{EditedMessage, InlineKeyboardMarkup},
};

/// See: <https://core.telegram.org/bots/api#answercallbackquery>
#[derive(Clone, Debug, Serialize)]
pub struct AnswerCallbackQuery {
    pub callback_query_id: String,
    #[serde(flatten)]
    pub options: AnswerCallbackQueryOptions,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AnswerCallbackQueryOptions {
    /// 0-200 characters; nothing is shown when absent.
    pub text: Option<String>,
    pub show_alert: Option<bool>,
    pub url: Option<String>,
    /// Seconds the result may be cached client-side.
    pub cache_time: Option<u32>,
}

impl AnswerCallbackQuery {
    pub fn new(callback_query_id: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            options: AnswerCallbackQueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnswerCallbackQueryOptions) -> Self {
        self.options = options;
        self
    }
}

impl Method for AnswerCallbackQuery {
    const NAME: &'static str = "answerCallbackQuery";
    type Output = bool;
}

/// Which message an edit applies to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageTarget {
    Chat { chat_id: ChatId, message_id: i64 },
    /// A message sent via inline mode.
    Inline { inline_message_id: String },
}

impl MessageTarget {
    pub fn chat(chat_id: impl Into<ChatId>, message_id: i64) -> Self {
        MessageTarget::Chat {
            chat_id: chat_id.into(),
            message_id,
        }
    }

    pub fn inline(inline_message_id: impl Into<String>) -> Self {
        MessageTarget::Inline {
            inline_message_id: inline_message_id.into(),
        }
    }
}

/// Replace (or with `None`, remove) the inline keyboard of a message.
///
/// Resolves to the edited message for chat targets and `true` for inline ones.
///
/// See: <https://core.telegram.org/bots/api#editmessagereplymarkup>
#[derive(Clone, Debug, Serialize)]
pub struct EditMessageReplyMarkup {
    #[serde(flatten)]
    pub target: MessageTarget,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl EditMessageReplyMarkup {
    pub fn new(target: MessageTarget, reply_markup: Option<InlineKeyboardMarkup>) -> Self {
        Self {
            target,
            reply_markup,
        }
    }
}

impl Method for EditMessageReplyMarkup {
    const NAME: &'static str = "editMessageReplyMarkup";
    type Output = EditedMessage;
}
