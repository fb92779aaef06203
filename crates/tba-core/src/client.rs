//! The API client.
//!
//! Every call follows the same path: clean the parameters, dispatch one
//! request through the transport, classify the status, then parse `result`.

use std::{fmt, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    domain::{BotToken, ChatId, InputFile},
    errors::{Error, SchemaValidationError, TransportError},
    methods::{
        clean_params, AnswerCallbackQuery, AnswerCallbackQueryOptions, DeleteWebhook,
        EditMessageReplyMarkup, GetMe, GetUpdates, GetWebhookInfo, MessageTarget, Method,
        SendDocument, SendDocumentOptions, SendLocation, SendLocationOptions, SendMessage,
        SendMessageOptions, SendPhoto, SendPhotoOptions, SetWebhook, SetWebhookOptions,
    },
    normalize,
    ports::{Transport, TransportRequest, TransportResponse},
    status::{self, Envelope},
    types::{EditedMessage, Entity, InlineKeyboardMarkup, Message, Update, User, WebhookInfo},
    Result,
};

/// A bot: credential, immutable settings and a shared transport handle.
///
/// Cheap to clone; clones share the transport. Calls on one `Bot` are
/// independent and may run concurrently.
#[derive(Clone)]
pub struct Bot {
    token: BotToken,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    cancel: Option<CancellationToken>,
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("token", &self.token)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Bot {
    pub fn new(token: BotToken, transport: Arc<dyn Transport>) -> Self {
        Self::with_config(token, ClientConfig::default(), transport)
    }

    pub fn with_config(
        token: BotToken,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            token,
            config,
            transport,
            cancel: None,
        }
    }

    /// Abort in-flight and future calls once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn method_url(&self, name: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.token.expose(),
            name
        )
    }

    /// Run any [`Method`].
    pub async fn execute<M: Method>(&self, method: &M) -> Result<M::Output> {
        let request = TransportRequest {
            url: self.method_url(M::NAME),
            params: clean_params(method)?,
            files: method.uploads(),
        };
        debug!(method = M::NAME, params = ?request.param_names(), "dispatching");

        let mut attempts = 0;
        loop {
            let response = self.dispatch(request.clone()).await?;
            let err = match self.decode::<M::Output>(&response) {
                Err(Error::PlatformStatus(err)) => err,
                other => return other,
            };

            let Some(delay) = self.config.retry.delay_for(&err, attempts) else {
                debug!(method = M::NAME, status = err.status, error = %err, "request failed");
                return Err(err.into());
            };
            attempts += 1;
            warn!(
                method = M::NAME,
                attempt = attempts,
                retry_after_secs = delay.as_secs(),
                "flood control, retrying"
            );
            self.pause(delay).await?;
        }
    }

    async fn dispatch(&self, request: TransportRequest) -> Result<TransportResponse> {
        let send = self.transport.send(request);
        let timed = async {
            match self.config.request_timeout {
                Some(limit) => tokio::time::timeout(limit, send)
                    .await
                    .unwrap_or(Err(TransportError::Timeout)),
                None => send.await,
            }
        };

        let outcome = match &self.cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                res = timed => res,
            },
            None => timed.await,
        };
        outcome.map_err(|err| {
            debug!(error = %err, "transport failed");
            Error::Transport(err)
        })
    }

    async fn pause(&self, delay: Duration) -> Result<()> {
        match &self.cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled.into()),
                _ = tokio::time::sleep(delay) => Ok(()),
            },
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    fn decode<T: Entity>(&self, response: &TransportResponse) -> Result<T> {
        let Some(origin) = response.request_url.as_deref() else {
            return Err(Error::ClientUsage(
                "response has no originating request".to_string(),
            ));
        };
        let url = self.token.redact(origin);

        status::check(response, &url)?;

        let envelope: Envelope = normalize::from_slice(&response.body)
            .map_err(|err| SchemaValidationError::new("Response", ".", err.to_string()))?;
        if !envelope.ok {
            return Err(status::rejected(response, &url, envelope).into());
        }

        let parsed = match envelope.result {
            Some(raw) => T::parse(raw),
            None => T::from_missing(),
        };
        parsed.map_err(|err| Error::from(err.within("result")))
    }

    pub async fn get_me(&self) -> Result<User> {
        self.execute(&GetMe::default()).await
    }

    pub async fn get_updates(&self, request: &GetUpdates) -> Result<Vec<Update>> {
        self.execute(request).await
    }

    pub async fn set_webhook(
        &self,
        url: impl Into<String>,
        options: SetWebhookOptions,
    ) -> Result<bool> {
        self.execute(&SetWebhook::new(url).with_options(options))
            .await
    }

    pub async fn delete_webhook(&self, drop_pending_updates: Option<bool>) -> Result<bool> {
        self.execute(&DeleteWebhook {
            drop_pending_updates,
        })
        .await
    }

    pub async fn get_webhook_info(&self) -> Result<WebhookInfo> {
        self.execute(&GetWebhookInfo::default()).await
    }

    pub async fn send_message(
        &self,
        chat_id: impl Into<ChatId>,
        text: impl Into<String>,
        options: SendMessageOptions,
    ) -> Result<Message> {
        self.execute(&SendMessage::new(chat_id, text).with_options(options))
            .await
    }

    pub async fn send_photo(
        &self,
        chat_id: impl Into<ChatId>,
        photo: InputFile,
        options: SendPhotoOptions,
    ) -> Result<Message> {
        self.execute(&SendPhoto::new(chat_id, photo).with_options(options))
            .await
    }

    pub async fn send_document(
        &self,
        chat_id: impl Into<ChatId>,
        document: InputFile,
        options: SendDocumentOptions,
    ) -> Result<Message> {
        self.execute(&SendDocument::new(chat_id, document).with_options(options))
            .await
    }

    pub async fn send_location(
        &self,
        chat_id: impl Into<ChatId>,
        latitude: f64,
        longitude: f64,
        options: SendLocationOptions,
    ) -> Result<Message> {
        self.execute(&SendLocation::new(chat_id, latitude, longitude).with_options(options))
            .await
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: impl Into<String>,
        options: AnswerCallbackQueryOptions,
    ) -> Result<bool> {
        self.execute(&AnswerCallbackQuery::new(callback_query_id).with_options(options))
            .await
    }

    pub async fn edit_message_reply_markup(
        &self,
        target: MessageTarget,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<EditedMessage> {
        self.execute(&EditMessageReplyMarkup::new(target, reply_markup))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        retry::RetryPolicy,
        status::StatusFamily,
        types::InlineKeyboardButton,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::{collections::VecDeque, sync::Mutex};

    const TOKEN: &str = "123456:TEST-secret";

    struct Reply {
        status: u16,
        reason: &'static str,
        headers: Vec<(String, String)>,
        body: String,
        with_origin: bool,
    }

    fn reply(status: u16, reason: &'static str, body: Value) -> Reply {
        Reply {
            status,
            reason,
            headers: Vec::new(),
            body: body.to_string(),
            with_origin: true,
        }
    }

    #[derive(Default)]
    struct FakeTransport {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl FakeTransport {
        fn with(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            })
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            let url = request.url.clone();
            self.requests.lock().unwrap().push(request);
            let Some(r) = self.replies.lock().unwrap().pop_front() else {
                return Err(TransportError::Connect("connection refused".to_string()));
            };
            Ok(TransportResponse {
                status: r.status,
                reason: r.reason.to_string(),
                headers: r.headers,
                body: r.body.into_bytes(),
                request_url: r.with_origin.then_some(url),
            })
        }
    }

    /// Never answers.
    struct StalledTransport;

    #[async_trait]
    impl Transport for StalledTransport {
        async fn send(
            &self,
            _request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(TransportError::Other("unreachable".to_string()))
        }
    }

    fn bot(transport: Arc<dyn Transport>) -> Bot {
        Bot::new(BotToken::new(TOKEN).unwrap(), transport)
    }

    fn message_json(id: i64) -> Value {
        json!({
            "message_id": id,
            "date": 1_700_000_000,
            "chat": {"id": 123, "type": "private", "first_name": "Ada"},
            "from": {"id": 99, "is_bot": true, "first_name": "Bot"},
            "text": "hello"
        })
    }

    #[tokio::test]
    async fn send_with_inline_keyboard() {
        let fake = FakeTransport::with(vec![reply(200, "OK", json!({"ok": true, "result": message_json(1)}))]);
        let markup = InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("button_1", "test"),
            InlineKeyboardButton::callback("button_2", "test"),
        ]]);

        let msg = bot(fake.clone())
            .send_message(
                123i64,
                "hello",
                SendMessageOptions {
                    reply_markup: Some(markup.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(msg.message_id, 1);
        assert_eq!(msg.from_user.unwrap().id, 99);

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.url, format!("https://api.telegram.org/bot{TOKEN}/sendMessage"));
        assert_eq!(req.param("chat_id"), Some("123"));
        assert_eq!(req.param("text"), Some("hello"));
        let markup: Value = serde_json::from_str(req.param("reply_markup").unwrap()).unwrap();
        assert_eq!(
            markup,
            json!({"inline_keyboard": [[
                {"text": "button_1", "callback_data": "test"},
                {"text": "button_2", "callback_data": "test"}
            ]]})
        );
        assert!(req.files.is_empty());
    }

    #[tokio::test]
    async fn status_200_parses_result() {
        let fake = FakeTransport::with(vec![reply(
            200,
            "OK",
            json!({"ok": true, "result": {"id": 99, "is_bot": true, "first_name": "Bot", "username": null}}),
        )]);
        let me = bot(fake).get_me().await.unwrap();
        assert_eq!(me.first_name, "Bot");
        assert_eq!(me.username, None);
    }

    #[tokio::test]
    async fn status_301_carries_location() {
        let mut moved = reply(301, "Moved Permanently", json!({}));
        moved.headers = vec![("Location".to_string(), "https://elsewhere.example/".to_string())];
        let err = bot(FakeTransport::with(vec![moved])).get_me().await.unwrap_err();

        let err = match err {
            Error::PlatformStatus(err) => err,
            other => panic!("expected status error, got {other:?}"),
        };
        assert_eq!(err.family, StatusFamily::Redirect);
        assert_eq!(err.location.as_deref(), Some("https://elsewhere.example/"));
        assert!(err.to_string().contains("Redirect location: 'https://elsewhere.example/'"));
    }

    #[tokio::test]
    async fn status_404_and_500_name_their_family() {
        let fake = FakeTransport::with(vec![
            reply(404, "Not Found", json!({"ok": false, "error_code": 404, "description": "Not Found"})),
            reply(500, "Internal Server Error", json!("oops")),
        ]);
        let b = bot(fake);

        let not_found = b.get_me().await.unwrap_err().to_string();
        assert!(not_found.starts_with("Client error '404 Not Found'"), "{not_found}");
        assert!(!not_found.contains("TEST-secret"));
        assert!(not_found.contains("/bot<redacted>/getMe"));

        let server = b.get_me().await.unwrap_err().to_string();
        assert!(server.starts_with("Server error '500 Internal Server Error'"), "{server}");
    }

    #[tokio::test]
    async fn malformed_result_names_the_field() {
        let mut result = message_json(1);
        result.as_object_mut().unwrap().remove("message_id");
        let fake = FakeTransport::with(vec![reply(200, "OK", json!({"ok": true, "result": result}))]);

        let err = bot(fake)
            .send_message(123i64, "hello", SendMessageOptions::default())
            .await
            .unwrap_err();
        let err = match err {
            Error::SchemaValidation(err) => err,
            other => panic!("expected schema error, got {other:?}"),
        };
        assert!(err.mentions("message_id"));
        assert_eq!(err.path, "result");
        assert_eq!(err.entity, "Message");
    }

    #[tokio::test]
    async fn ok_false_on_200_is_a_status_error() {
        let fake = FakeTransport::with(vec![reply(
            200,
            "OK",
            json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}),
        )]);
        let err = bot(fake)
            .send_message(1i64, "x", SendMessageOptions::default())
            .await
            .unwrap_err();
        let err = match err {
            Error::PlatformStatus(err) => err,
            other => panic!("expected status error, got {other:?}"),
        };
        assert_eq!(err.family, StatusFamily::ClientError);
        assert_eq!(err.status, 200);
        assert_eq!(err.error_code, Some(400));
        assert_eq!(err.description.as_deref(), Some("Bad Request: chat not found"));
    }

    #[tokio::test]
    async fn missing_result_is_false_for_bool_methods() {
        let fake = FakeTransport::with(vec![
            reply(200, "OK", json!({"ok": true})),
            reply(200, "OK", json!({"ok": true})),
        ]);
        let b = bot(fake);
        assert!(!b.delete_webhook(Some(false)).await.unwrap());

        let err = b.get_me().await.unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(e) if e.path == "result"));
    }

    #[tokio::test]
    async fn response_without_origin_is_client_usage() {
        let mut orphan = reply(200, "OK", json!({"ok": true, "result": true}));
        orphan.with_origin = false;
        let err = bot(FakeTransport::with(vec![orphan]))
            .answer_callback_query("q", AnswerCallbackQueryOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ClientUsage(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let err = bot(FakeTransport::with(Vec::new())).get_me().await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Connect(_))));
    }

    #[tokio::test]
    async fn no_retry_by_default() {
        let flood = json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 0",
            "parameters": {"retry_after": 0}
        });
        let fake = FakeTransport::with(vec![reply(429, "Too Many Requests", flood)]);
        let err = bot(fake.clone()).get_me().await.unwrap_err();
        assert!(matches!(err, Error::PlatformStatus(e) if e.retry_after == Some(0)));
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn flood_control_retry_when_configured() {
        let flood = json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 0",
            "parameters": {"retry_after": 0}
        });
        let fake = FakeTransport::with(vec![
            reply(429, "Too Many Requests", flood),
            reply(200, "OK", json!({"ok": true, "result": {"id": 1, "is_bot": true, "first_name": "B"}})),
        ]);
        let config = ClientConfig {
            retry: RetryPolicy::flood_control(1, Duration::from_secs(1)),
            ..ClientConfig::default()
        };
        let b = Bot::with_config(BotToken::new(TOKEN).unwrap(), config, fake.clone());

        assert_eq!(b.get_me().await.unwrap().id, 1);
        assert_eq!(fake.requests().len(), 2);
    }

    #[tokio::test]
    async fn timeout_is_its_own_kind() {
        let config = ClientConfig {
            request_timeout: Some(Duration::from_millis(20)),
            ..ClientConfig::default()
        };
        let b = Bot::with_config(BotToken::new(TOKEN).unwrap(), config, Arc::new(StalledTransport));
        let err = b.get_me().await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn cancellation_is_its_own_kind() {
        let cancel = CancellationToken::new();
        let b = bot(Arc::new(StalledTransport)).with_cancellation(cancel.clone());

        let call = tokio::spawn(async move { b.get_me().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();

        let err = call.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
    }

    #[tokio::test]
    async fn upload_travels_as_file_part() {
        let mut photo_msg = message_json(2);
        photo_msg["photo"] = json!([{"file_id": "f", "file_unique_id": "u", "width": 1, "height": 1}]);
        let fake = FakeTransport::with(vec![reply(200, "OK", json!({"ok": true, "result": photo_msg}))]);

        let msg = bot(fake.clone())
            .send_photo(
                123i64,
                InputFile::upload("cat.png", vec![0x89, 0x50]),
                SendPhotoOptions {
                    caption: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(msg.photo.unwrap()[0].file_id, "f");

        let req = &fake.requests()[0];
        assert_eq!(req.param("photo"), None);
        assert_eq!(req.param("caption"), Some(""));
        assert_eq!(req.files.len(), 1);
        assert_eq!(req.files[0].field, "photo");
        assert_eq!(req.files[0].bytes, vec![0x89, 0x50]);
    }

    #[tokio::test]
    async fn edit_markup_resolves_message_or_true() {
        let fake = FakeTransport::with(vec![
            reply(200, "OK", json!({"ok": true, "result": message_json(7)})),
            reply(200, "OK", json!({"ok": true, "result": true})),
        ]);
        let b = bot(fake.clone());

        let edited = b
            .edit_message_reply_markup(MessageTarget::chat(123i64, 7), None)
            .await
            .unwrap();
        assert!(matches!(edited, EditedMessage::Message(m) if m.message_id == 7));

        let inline = b
            .edit_message_reply_markup(MessageTarget::inline("inl"), None)
            .await
            .unwrap();
        assert_eq!(inline, EditedMessage::Inline(true));
        assert_eq!(fake.requests()[1].param("inline_message_id"), Some("inl"));
    }

    #[tokio::test]
    async fn updates_parse_as_list() {
        let fake = FakeTransport::with(vec![reply(
            200,
            "OK",
            json!({"ok": true, "result": [
                {"update_id": 5, "message": message_json(1)},
                {"update_id": 6, "some_future_kind": {}}
            ]}),
        )]);
        let updates = bot(fake.clone())
            .get_updates(&GetUpdates {
                offset: Some(5),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates[0].message().is_some());
        assert_eq!(updates[1].kind_type(), None);
        assert_eq!(fake.requests()[0].param("offset"), Some("5"));
    }

    #[tokio::test]
    async fn webhook_info_keeps_unknown_update_names() {
        let fake = FakeTransport::with(vec![reply(
            200,
            "OK",
            json!({"ok": true, "result": {
                "url": "https://example.org/hook",
                "has_custom_certificate": false,
                "pending_update_count": 3,
                "last_error_message": null,
                "max_connections": 40,
                "allowed_updates": ["message", "message_reaction"]
            }}),
        )]);
        let info = bot(fake.clone()).get_webhook_info().await.unwrap();

        assert!(info.is_set());
        assert_eq!(info.pending_update_count, 3);
        assert_eq!(info.last_error_message, None);
        assert_eq!(
            info.allowed_updates.as_deref(),
            Some(&["message".to_string(), "message_reaction".to_string()][..])
        );
        let req = &fake.requests()[0];
        assert!(req.url.ends_with("/getWebhookInfo"));
        assert!(req.params.is_empty());
    }

    fn reply_chain(depth: usize) -> String {
        let chat = r#""chat":{"id":123,"type":"private"}"#;
        let mut body = String::from(r#"{"ok":true,"result":"#);
        for id in (1..=depth).rev() {
            body.push_str(&format!(r#"{{"message_id":{id},"date":0,{chat},"reply_to_message":"#));
        }
        body.push_str(&format!(r#"{{"message_id":0,"date":0,{chat},"text":"root"}}"#));
        body.push_str(&"}".repeat(depth + 1));
        body
    }

    #[tokio::test]
    async fn deep_reply_chain_parses() {
        let depth = 1_000;
        let fake = FakeTransport::with(vec![Reply {
            status: 200,
            reason: "OK",
            headers: Vec::new(),
            body: reply_chain(depth),
            with_origin: true,
        }]);

        let msg = bot(fake)
            .send_message(123i64, "hello", SendMessageOptions::default())
            .await
            .unwrap();
        assert_eq!(msg.message_id, depth as i64);
        assert_eq!(msg.reply_depth(), depth);

        let mut root = &msg;
        while let Some(next) = root.reply_to_message.as_deref() {
            root = next;
        }
        assert_eq!(root.text.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn rejected_envelope_names_both_codes() {
        let fake = FakeTransport::with(vec![reply(
            200,
            "OK",
            json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}),
        )]);
        let text = bot(fake)
            .send_message(1i64, "x", SendMessageOptions::default())
            .await
            .unwrap_err()
            .to_string();
        assert!(text.starts_with("Client error '400' (HTTP 200 OK)"), "{text}");
        assert!(text.contains("(Bad Request: chat not found)"));
    }

    #[test]
    fn debug_hides_token() {
        let b = bot(FakeTransport::with(Vec::new()));
        assert!(!format!("{b:?}").contains("TEST-secret"));
    }
}
