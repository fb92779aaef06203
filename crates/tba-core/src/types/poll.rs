use serde::{Deserialize, Serialize};

use super::{message::MessageEntity, user::User};

/// See: <https://core.telegram.org/bots/api#poll>
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub total_voter_count: i64,
    pub is_closed: bool,
    pub is_anonymous: bool,
    /// `regular` or `quiz`.
    #[serde(rename = "type")]
    pub kind: String,
    pub allows_multiple_answers: bool,
    /// Quiz only; visible once the poll is closed or answered by the bot.
    pub correct_option_id: Option<i64>,
    pub explanation: Option<String>,
    pub explanation_entities: Option<Vec<MessageEntity>>,
    pub open_period: Option<i64>,
    pub close_date: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voter_count: i64,
}

/// A user's answer in a non-anonymous poll. Empty `option_ids` means the vote was retracted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub poll_id: String,
    pub user: User,
    pub option_ids: Vec<i64>,
}

impl Poll {
    /// Option(s) with the most votes.
    pub fn leaders(&self) -> Vec<&PollOption> {
        let Some(top) = self.options.iter().map(|o| o.voter_count).max() else {
            return Vec::new();
        };
        self.options
            .iter()
            .filter(|o| o.voter_count == top)
            .collect()
    }
}
