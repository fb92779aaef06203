use serde::{Deserialize, Serialize};

/// A platform user or bot.
///
/// See: <https://core.telegram.org/bots/api#user>
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    /// IETF language tag of the user's client.
    pub language_code: Option<String>,
    pub is_premium: Option<bool>,
    pub added_to_attachment_menu: Option<bool>,
    /// Returned only by `getMe`.
    pub can_join_groups: Option<bool>,
    /// Returned only by `getMe`.
    pub can_read_all_group_messages: Option<bool>,
    /// Returned only by `getMe`.
    pub supports_inline_queries: Option<bool>,
}

impl User {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }

    /// `@username`, when the user has one.
    pub fn mention(&self) -> Option<String> {
        self.username.as_ref().map(|u| format!("@{u}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use serde_json::json;

    #[test]
    fn parses_and_drops_nulls() {
        let user = User::parse(json!({
            "id": 7,
            "is_bot": false,
            "first_name": "Ada",
            "last_name": null,
            "username": "ada"
        }))
        .unwrap();
        assert_eq!(user.full_name(), "Ada");
        assert_eq!(user.mention().as_deref(), Some("@ada"));
        assert_eq!(
            user.to_json().unwrap(),
            json!({"id": 7, "is_bot": false, "first_name": "Ada", "username": "ada"})
        );
    }
}
