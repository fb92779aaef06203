use std::fmt;

use serde::{Serialize, Serializer};

use crate::{errors::Error, Result};

/// Bot credential. Embedded in every request URL; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::ClientUsage("bot token is empty".to_string()));
        }
        if token.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(Error::ClientUsage(
                "bot token must not contain whitespace or '/'".to_string(),
            ));
        }
        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replace every occurrence of the token in `text`.
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.0, "<redacted>")
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(<redacted>)")
    }
}

/// Target chat: a numeric id or an `@channelusername`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        match s.trim().parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Username(s.to_string()),
        }
    }
}

impl From<String> for ChatId {
    fn from(s: String) -> Self {
        ChatId::from(s.as_str())
    }
}

/// Text formatting mode for `parse_mode` parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    MarkdownV2,
    Markdown,
    #[serde(rename = "HTML")]
    Html,
}

/// A file parameter (`photo`, `document`, `thumbnail`, `certificate`).
///
/// Ids and URLs travel as plain string parameters. Uploads travel as multipart
/// parts named after the parameter; see [`InputFile::upload_part`].
#[derive(Clone, PartialEq, Eq)]
pub enum InputFile {
    FileId(String),
    Url(String),
    Upload { file_name: String, bytes: Vec<u8> },
}

impl InputFile {
    pub fn file_id(id: impl Into<String>) -> Self {
        InputFile::FileId(id.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        InputFile::Url(url.into())
    }

    pub fn upload(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        InputFile::Upload {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn upload_part(&self, field: &str) -> Option<crate::ports::FilePart> {
        match self {
            InputFile::Upload { file_name, bytes } => Some(crate::ports::FilePart {
                field: field.to_string(),
                file_name: file_name.clone(),
                bytes: bytes.clone(),
            }),
            InputFile::FileId(_) | InputFile::Url(_) => None,
        }
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFile::FileId(id) => f.debug_tuple("FileId").field(id).finish(),
            InputFile::Url(url) => f.debug_tuple("Url").field(url).finish(),
            InputFile::Upload { file_name, bytes } => f
                .debug_struct("Upload")
                .field("file_name", file_name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl Serialize for InputFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            InputFile::FileId(id) => serializer.serialize_str(id),
            InputFile::Url(url) => serializer.serialize_str(url),
            // Absent from the form; the bytes go out as a multipart part instead.
            InputFile::Upload { .. } => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = BotToken::new("123:secret").unwrap();
        assert_eq!(format!("{token:?}"), "BotToken(<redacted>)");
        assert_eq!(
            token.redact("https://api.telegram.org/bot123:secret/getMe"),
            "https://api.telegram.org/bot<redacted>/getMe"
        );
    }

    #[test]
    fn token_rejects_unusable_values() {
        assert!(matches!(BotToken::new("  "), Err(Error::ClientUsage(_))));
        assert!(matches!(BotToken::new("12/34"), Err(Error::ClientUsage(_))));
        assert!(matches!(BotToken::new("12 34"), Err(Error::ClientUsage(_))));
    }

    #[test]
    fn chat_id_from_strings() {
        assert_eq!(ChatId::from("-100123"), ChatId::Id(-100123));
        assert_eq!(
            ChatId::from("@channel"),
            ChatId::Username("@channel".to_string())
        );
        assert_eq!(serde_json::to_value(ChatId::Id(5)).unwrap(), 5);
    }

    #[test]
    fn input_file_serializes_only_references() {
        assert_eq!(
            serde_json::to_value(InputFile::url("https://x/y.png")).unwrap(),
            "https://x/y.png"
        );
        let upload = InputFile::upload("a.png", vec![1, 2, 3]);
        assert!(serde_json::to_value(&upload).unwrap().is_null());
        let part = upload.upload_part("photo").unwrap();
        assert_eq!(part.field, "photo");
        assert_eq!(part.bytes, vec![1, 2, 3]);
        assert!(InputFile::file_id("abc").upload_part("photo").is_none());
    }
}
