//! Incoming queries: inline mode and callback buttons.

use serde::{Deserialize, Serialize};

use super::{media::Location, message::Message, user::User};

/// See: <https://core.telegram.org/bots/api#inlinequery>
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    #[serde(rename = "from")]
    pub from_user: User,
    /// Up to 256 characters.
    pub query: String,
    pub offset: String,
    pub chat_type: Option<String>,
    pub location: Option<Location>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChosenInlineResult {
    pub result_id: String,
    #[serde(rename = "from")]
    pub from_user: User,
    pub location: Option<Location>,
    pub inline_message_id: Option<String>,
    pub query: String,
}

/// A press on a callback button of an inline keyboard.
///
/// `message` is set when the button was attached to a message sent by the bot,
/// `inline_message_id` when it was sent in inline mode. Exactly one of `data`
/// and `game_short_name` is present.
///
/// See: <https://core.telegram.org/bots/api#callbackquery>
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(rename = "from")]
    pub from_user: User,
    pub message: Option<Box<Message>>,
    pub inline_message_id: Option<String>,
    pub chat_instance: String,
    pub data: Option<String>,
    pub game_short_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use serde_json::json;

    #[test]
    fn callback_query_renames_from_and_boxes_message() {
        let q = CallbackQuery::parse(json!({
            "id": "cb1",
            "from": {"id": 5, "is_bot": false, "first_name": "U"},
            "chat_instance": "ci",
            "data": "test",
            "message": {
                "message_id": 10,
                "date": 0,
                "chat": {"id": 5, "type": "private"},
                "reply_markup": {"inline_keyboard": [[{"text": "b", "callback_data": "test"}]]}
            }
        }))
        .unwrap();
        assert_eq!(q.from_user.id, 5);
        let markup = q.message.as_ref().unwrap().reply_markup.as_ref().unwrap();
        assert_eq!(markup.buttons().count(), 1);
        assert!(q.to_json().unwrap().get("from").is_some());
    }

    #[test]
    fn inline_query_requires_from() {
        let err = InlineQuery::parse(json!({"id": "1", "query": "", "offset": ""})).unwrap_err();
        assert!(err.mentions("from"));
    }
}
