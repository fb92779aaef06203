//! Service-event payloads carried by messages.

use serde::{Deserialize, Serialize};

use super::user::User;

/// Events that carry no data (`forum_topic_closed`, `video_chat_started`, ...).
///
/// Unknown members are ignored; the platform may start filling them later.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMarker {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAutoDeleteTimerChanged {
    pub message_auto_delete_time: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProximityAlertTriggered {
    pub traveler: User,
    pub watcher: User,
    pub distance: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserShared {
    pub request_id: i64,
    pub user_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatShared {
    pub request_id: i64,
    pub chat_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAccessAllowed {
    pub web_app_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTopicCreated {
    pub name: String,
    /// RGB color of the topic icon.
    pub icon_color: i64,
    pub icon_custom_emoji_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTopicEdited {
    pub name: Option<String>,
    /// Empty string when the icon was removed.
    pub icon_custom_emoji_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoChatScheduled {
    pub start_date: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoChatEnded {
    pub duration: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoChatParticipantsInvited {
    pub users: Vec<User>,
}

/// Data sent from a Web App to the bot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppData {
    pub data: String,
    pub button_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        normalize,
        types::{Entity, Message},
    };
    use serde_json::json;

    #[test]
    fn marker_accepts_empty_and_extra_members() {
        let marker: ServiceMarker = normalize::parse("ServiceMarker", json!({})).unwrap();
        assert_eq!(marker, ServiceMarker::default());

        let marker: ServiceMarker =
            normalize::parse("ServiceMarker", json!({"added_later": 1})).unwrap();
        assert_eq!(marker, ServiceMarker {});
    }

    #[test]
    fn service_events_ride_on_messages() {
        let msg = Message::parse(json!({
            "message_id": 8,
            "date": 0,
            "chat": {"id": -100, "type": "supergroup", "title": "Team"},
            "video_chat_scheduled": {"start_date": 1_700_000_600},
            "forum_topic_closed": {}
        }))
        .unwrap();
        assert_eq!(
            msg.video_chat_scheduled,
            Some(VideoChatScheduled {
                start_date: 1_700_000_600
            })
        );
        assert_eq!(msg.forum_topic_closed, Some(ServiceMarker {}));
        assert_eq!(msg.video_chat_started, None);
    }

    #[test]
    fn payload_event_requires_its_field() {
        let err = normalize::parse::<VideoChatEnded>("VideoChatEnded", json!({})).unwrap_err();
        assert!(err.mentions("duration"));
    }
}
