//! Keyboards and reply markup.
//!
//! Button actions are mutually exclusive on the wire (`url` XOR `callback_data`
//! XOR ...). They are modelled as enums and parsed strictly: a button carrying
//! more than one action is rejected instead of resolved by precedence.

use serde::{Deserialize, Serialize};

use super::chat::ChatAdministratorRights;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppInfo {
    pub url: String,
}

/// HTTPS URL used to authorize the user automatically ("Login with the platform").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginUrl {
    pub url: String,
    pub forward_text: Option<String>,
    pub bot_username: Option<String>,
    pub request_write_access: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchInlineQueryChosenChat {
    pub query: Option<String>,
    pub allow_user_chats: Option<bool>,
    pub allow_bot_chats: Option<bool>,
    pub allow_group_chats: Option<bool>,
    pub allow_channel_chats: Option<bool>,
}

/// Placeholder; holds no information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackGame {}

/// What pressing an inline button does. Exactly one per button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineButtonAction {
    Url(String),
    /// 1-64 bytes sent back in a callback query.
    CallbackData(String),
    WebApp(WebAppInfo),
    LoginUrl(LoginUrl),
    SwitchInlineQuery(String),
    SwitchInlineQueryCurrentChat(String),
    SwitchInlineQueryChosenChat(SwitchInlineQueryChosenChat),
    CallbackGame(CallbackGame),
    /// Pay button; must be the first button of the first row.
    Pay,
}

/// One button of an inline keyboard.
///
/// See: <https://core.telegram.org/bots/api#inlinekeyboardbutton>
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInlineKeyboardButton", into = "RawInlineKeyboardButton")]
pub struct InlineKeyboardButton {
    pub text: String,
    pub action: InlineButtonAction,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, action: InlineButtonAction) -> Self {
        Self {
            text: text.into(),
            action,
        }
    }

    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(text, InlineButtonAction::CallbackData(data.into()))
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(text, InlineButtonAction::Url(url.into()))
    }

    pub fn web_app(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(text, InlineButtonAction::WebApp(WebAppInfo { url: url.into() }))
    }

    pub fn switch_inline_query(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self::new(text, InlineButtonAction::SwitchInlineQuery(query.into()))
    }

    pub fn pay(text: impl Into<String>) -> Self {
        Self::new(text, InlineButtonAction::Pay)
    }
}

#[derive(Default, Serialize, Deserialize)]
struct RawInlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_app: Option<WebAppInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_url: Option<LoginUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    switch_inline_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    switch_inline_query_current_chat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    switch_inline_query_chosen_chat: Option<SwitchInlineQueryChosenChat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_game: Option<CallbackGame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pay: Option<bool>,
}

impl TryFrom<RawInlineKeyboardButton> for InlineKeyboardButton {
    type Error = String;

    fn try_from(raw: RawInlineKeyboardButton) -> Result<Self, Self::Error> {
        let mut actions = Vec::new();
        if let Some(v) = raw.url {
            actions.push(("url", InlineButtonAction::Url(v)));
        }
        if let Some(v) = raw.callback_data {
            actions.push(("callback_data", InlineButtonAction::CallbackData(v)));
        }
        if let Some(v) = raw.web_app {
            actions.push(("web_app", InlineButtonAction::WebApp(v)));
        }
        if let Some(v) = raw.login_url {
            actions.push(("login_url", InlineButtonAction::LoginUrl(v)));
        }
        if let Some(v) = raw.switch_inline_query {
            actions.push(("switch_inline_query", InlineButtonAction::SwitchInlineQuery(v)));
        }
        if let Some(v) = raw.switch_inline_query_current_chat {
            actions.push((
                "switch_inline_query_current_chat",
                InlineButtonAction::SwitchInlineQueryCurrentChat(v),
            ));
        }
        if let Some(v) = raw.switch_inline_query_chosen_chat {
            actions.push((
                "switch_inline_query_chosen_chat",
                InlineButtonAction::SwitchInlineQueryChosenChat(v),
            ));
        }
        if let Some(v) = raw.callback_game {
            actions.push(("callback_game", InlineButtonAction::CallbackGame(v)));
        }
        if raw.pay == Some(true) {
            actions.push(("pay", InlineButtonAction::Pay));
        }

        let action = exactly_one("inline keyboard button", actions)?;
        Ok(Self {
            text: raw.text,
            action,
        })
    }
}

impl From<InlineKeyboardButton> for RawInlineKeyboardButton {
    fn from(button: InlineKeyboardButton) -> Self {
        let mut raw = RawInlineKeyboardButton {
            text: button.text,
            ..Default::default()
        };
        match button.action {
            InlineButtonAction::Url(v) => raw.url = Some(v),
            InlineButtonAction::CallbackData(v) => raw.callback_data = Some(v),
            InlineButtonAction::WebApp(v) => raw.web_app = Some(v),
            InlineButtonAction::LoginUrl(v) => raw.login_url = Some(v),
            InlineButtonAction::SwitchInlineQuery(v) => raw.switch_inline_query = Some(v),
            InlineButtonAction::SwitchInlineQueryCurrentChat(v) => {
                raw.switch_inline_query_current_chat = Some(v)
            }
            InlineButtonAction::SwitchInlineQueryChosenChat(v) => {
                raw.switch_inline_query_chosen_chat = Some(v)
            }
            InlineButtonAction::CallbackGame(v) => raw.callback_game = Some(v),
            InlineButtonAction::Pay => raw.pay = Some(true),
        }
        raw
    }
}

/// Inline keyboard shown right under the message it belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    /// Rows of buttons, top to bottom.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    pub fn append_row(mut self, row: Vec<InlineKeyboardButton>) -> Self {
        self.inline_keyboard.push(row);
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineKeyboardButton> {
        self.inline_keyboard.iter().flatten()
    }
}

impl From<InlineKeyboardButton> for InlineKeyboardMarkup {
    fn from(button: InlineKeyboardButton) -> Self {
        Self::new(vec![vec![button]])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButtonRequestUser {
    pub request_id: i64,
    pub user_is_bot: Option<bool>,
    pub user_is_premium: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButtonRequestChat {
    pub request_id: i64,
    pub chat_is_channel: bool,
    pub chat_is_forum: Option<bool>,
    pub chat_has_username: Option<bool>,
    pub chat_is_created: Option<bool>,
    pub user_administrator_rights: Option<ChatAdministratorRights>,
    pub bot_administrator_rights: Option<ChatAdministratorRights>,
    pub bot_is_member: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButtonPollType {
    /// `quiz`, `regular`, or absent for any.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Optional extra behaviour of a reply-keyboard button. At most one per button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyboardButtonAction {
    RequestUser(KeyboardButtonRequestUser),
    RequestChat(KeyboardButtonRequestChat),
    RequestContact,
    RequestLocation,
    RequestPoll(KeyboardButtonPollType),
    WebApp(WebAppInfo),
}

/// One button of a reply keyboard. Without an action, pressing it sends `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKeyboardButton", into = "RawKeyboardButton")]
pub struct KeyboardButton {
    pub text: String,
    pub action: Option<KeyboardButtonAction>,
}

impl KeyboardButton {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
        }
    }

    pub fn request_contact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Some(KeyboardButtonAction::RequestContact),
        }
    }

    pub fn request_location(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Some(KeyboardButtonAction::RequestLocation),
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct RawKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_user: Option<KeyboardButtonRequestUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_chat: Option<KeyboardButtonRequestChat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_contact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_location: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_poll: Option<KeyboardButtonPollType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_app: Option<WebAppInfo>,
}

impl TryFrom<RawKeyboardButton> for KeyboardButton {
    type Error = String;

    fn try_from(raw: RawKeyboardButton) -> Result<Self, Self::Error> {
        let mut actions = Vec::new();
        if let Some(v) = raw.request_user {
            actions.push(("request_user", KeyboardButtonAction::RequestUser(v)));
        }
        if let Some(v) = raw.request_chat {
            actions.push(("request_chat", KeyboardButtonAction::RequestChat(v)));
        }
        if raw.request_contact == Some(true) {
            actions.push(("request_contact", KeyboardButtonAction::RequestContact));
        }
        if raw.request_location == Some(true) {
            actions.push(("request_location", KeyboardButtonAction::RequestLocation));
        }
        if let Some(v) = raw.request_poll {
            actions.push(("request_poll", KeyboardButtonAction::RequestPoll(v)));
        }
        if let Some(v) = raw.web_app {
            actions.push(("web_app", KeyboardButtonAction::WebApp(v)));
        }

        let action = at_most_one("keyboard button", actions)?;
        Ok(Self {
            text: raw.text,
            action,
        })
    }
}

impl From<KeyboardButton> for RawKeyboardButton {
    fn from(button: KeyboardButton) -> Self {
        let mut raw = RawKeyboardButton {
            text: button.text,
            ..Default::default()
        };
        match button.action {
            None => {}
            Some(KeyboardButtonAction::RequestUser(v)) => raw.request_user = Some(v),
            Some(KeyboardButtonAction::RequestChat(v)) => raw.request_chat = Some(v),
            Some(KeyboardButtonAction::RequestContact) => raw.request_contact = Some(true),
            Some(KeyboardButtonAction::RequestLocation) => raw.request_location = Some(true),
            Some(KeyboardButtonAction::RequestPoll(v)) => raw.request_poll = Some(v),
            Some(KeyboardButtonAction::WebApp(v)) => raw.web_app = Some(v),
        }
        raw
    }
}

/// Custom keyboard replacing the user's letter keyboard.
///
/// See: <https://core.telegram.org/bots/api#replykeyboardmarkup>
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub is_persistent: Option<bool>,
    pub resize_keyboard: Option<bool>,
    pub one_time_keyboard: Option<bool>,
    pub input_field_placeholder: Option<String>,
    pub selective: Option<bool>,
}

impl ReplyKeyboardMarkup {
    pub fn new(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self {
            keyboard: rows,
            ..Default::default()
        }
    }

    pub fn resized(mut self) -> Self {
        self.resize_keyboard = Some(true);
        self
    }

    pub fn one_time(mut self) -> Self {
        self.one_time_keyboard = Some(true);
        self
    }
}

/// Ask clients to hide the current custom keyboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboardRemove {
    /// Always `true`.
    pub remove_keyboard: bool,
    pub selective: Option<bool>,
}

impl Default for ReplyKeyboardRemove {
    fn default() -> Self {
        Self {
            remove_keyboard: true,
            selective: None,
        }
    }
}

/// Ask clients to open a reply interface to the bot's message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceReply {
    /// Always `true`.
    pub force_reply: bool,
    pub input_field_placeholder: Option<String>,
    pub selective: Option<bool>,
}

impl Default for ForceReply {
    fn default() -> Self {
        Self {
            force_reply: true,
            input_field_placeholder: None,
            selective: None,
        }
    }
}

/// Any markup accepted by a `reply_markup` parameter.
///
/// Sent as a compact JSON string, not as structured form fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    InlineKeyboard(InlineKeyboardMarkup),
    ReplyKeyboard(ReplyKeyboardMarkup),
    Remove(ReplyKeyboardRemove),
    ForceReply(ForceReply),
}

impl From<InlineKeyboardMarkup> for ReplyMarkup {
    fn from(m: InlineKeyboardMarkup) -> Self {
        ReplyMarkup::InlineKeyboard(m)
    }
}

impl From<ReplyKeyboardMarkup> for ReplyMarkup {
    fn from(m: ReplyKeyboardMarkup) -> Self {
        ReplyMarkup::ReplyKeyboard(m)
    }
}

impl From<ReplyKeyboardRemove> for ReplyMarkup {
    fn from(m: ReplyKeyboardRemove) -> Self {
        ReplyMarkup::Remove(m)
    }
}

impl From<ForceReply> for ReplyMarkup {
    fn from(m: ForceReply) -> Self {
        ReplyMarkup::ForceReply(m)
    }
}

fn exactly_one<T>(what: &str, mut present: Vec<(&'static str, T)>) -> Result<T, String> {
    match present.len() {
        0 => Err(format!("{what} must carry exactly one action, found none")),
        1 => Ok(present.remove(0).1),
        _ => Err(conflict(what, &present)),
    }
}

fn at_most_one<T>(what: &str, mut present: Vec<(&'static str, T)>) -> Result<Option<T>, String> {
    match present.len() {
        0 => Ok(None),
        1 => Ok(Some(present.remove(0).1)),
        _ => Err(conflict(what, &present)),
    }
}

fn conflict<T>(what: &str, present: &[(&'static str, T)]) -> String {
    let names = present
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{what} has mutually exclusive fields set together: {names}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use serde_json::json;

    #[test]
    fn inline_button_serializes_flat() {
        let markup = InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("button_1", "test"),
            InlineKeyboardButton::url("site", "https://example.org"),
        ]]);
        assert_eq!(
            serde_json::to_value(&markup).unwrap(),
            json!({"inline_keyboard": [[
                {"text": "button_1", "callback_data": "test"},
                {"text": "site", "url": "https://example.org"}
            ]]})
        );
    }

    #[test]
    fn inline_button_round_trips_through_json() {
        let raw = json!({"text": "go", "switch_inline_query_chosen_chat": {"allow_user_chats": true}});
        let button = InlineKeyboardButton::parse(raw.clone()).unwrap();
        assert_eq!(
            button.action,
            InlineButtonAction::SwitchInlineQueryChosenChat(SwitchInlineQueryChosenChat {
                allow_user_chats: Some(true),
                ..Default::default()
            })
        );
        assert_eq!(button.to_json().unwrap(), raw);
    }

    #[test]
    fn inline_button_with_two_actions_is_rejected() {
        let err = InlineKeyboardMarkup::parse(json!({"inline_keyboard": [[
            {"text": "ok", "callback_data": "a"},
            {"text": "bad", "url": "https://x", "callback_data": "b"}
        ]]}))
        .unwrap_err();
        assert_eq!(err.path, "inline_keyboard[0][1]");
        assert!(err.message.contains("url, callback_data"));
    }

    #[test]
    fn inline_button_without_action_is_rejected() {
        let err = InlineKeyboardButton::parse(json!({"text": "nothing"})).unwrap_err();
        assert!(err.message.contains("found none"));
    }

    #[test]
    fn empty_switch_query_counts_as_present() {
        let button = InlineKeyboardButton::parse(json!({"text": "t", "switch_inline_query": ""}))
            .unwrap();
        assert_eq!(button.action, InlineButtonAction::SwitchInlineQuery(String::new()));
    }

    #[test]
    fn reply_button_actions_are_optional_but_exclusive() {
        let plain = KeyboardButton::parse(json!({"text": "hi"})).unwrap();
        assert_eq!(plain, KeyboardButton::text("hi"));

        let contact = KeyboardButton::parse(json!({"text": "c", "request_contact": true})).unwrap();
        assert_eq!(contact.action, Some(KeyboardButtonAction::RequestContact));

        let err = KeyboardButton::parse(json!({
            "text": "x", "request_contact": true, "request_location": true
        }))
        .unwrap_err();
        assert!(err.message.contains("request_contact, request_location"));
    }

    #[test]
    fn reply_keyboard_serialization_skips_absent_flags() {
        let kb = ReplyKeyboardMarkup::new(vec![vec![KeyboardButton::text("a")]]).resized();
        assert_eq!(
            kb.to_json().unwrap(),
            json!({"keyboard": [[{"text": "a"}]], "resize_keyboard": true})
        );
    }

    #[test]
    fn remove_and_force_reply_defaults() {
        assert_eq!(
            crate::normalize::to_value(&ReplyMarkup::from(ReplyKeyboardRemove::default()))
                .unwrap(),
            json!({"remove_keyboard": true})
        );
        assert!(ForceReply::default().force_reply);
    }
}
