use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tba_core::{
    config::Config,
    methods::SendMessageOptions,
    types::{
        InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, Message, ReplyKeyboardMarkup,
    },
    Bot,
};
use tba_reqwest::ReqwestTransport;
use tracing::info;

/// Rotate `items` into a 3x3 grid: each row starts one further along.
fn rotated_rows<T: Clone>(items: [T; 3]) -> Vec<Vec<T>> {
    (0..3)
        .map(|shift| (0..3).map(|i| items[(i + shift) % 3].clone()).collect())
        .collect()
}

fn log_message(label: &str, msg: &Message) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&tba_core::normalize::to_value(msg)?)?;
    info!(label, message_id = msg.message_id, "sent\n{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tba_core::logging::init("tba")?;

    let cfg = Config::load()?;
    let chat_id = cfg
        .chat_id
        .clone()
        .context("TELEGRAM_CHAT_ID environment variable is required for the demo")?;

    let transport = Arc::new(ReqwestTransport::new(cfg.request_timeout)?);
    let bot = Bot::with_config(cfg.telegram_bot_token.clone(), cfg.client_config(), transport);

    let inline = InlineKeyboardMarkup::new(rotated_rows(
        ["button_1", "button_2", "button_3"].map(|t| InlineKeyboardButton::callback(t, "test")),
    ));
    let reply = ReplyKeyboardMarkup::new(rotated_rows(
        ["button_4", "button_5", "button_6"].map(KeyboardButton::text),
    ))
    .resized();

    let first = bot
        .send_message(
            chat_id.clone(),
            "Message 1",
            SendMessageOptions {
                reply_markup: Some(inline.into()),
                ..Default::default()
            },
        )
        .await
        .context("sending message 1")?;

    // The client does not order calls; the caller does.
    tokio::time::sleep(Duration::from_secs(2)).await;

    let second = bot
        .send_message(
            chat_id,
            "Message 2",
            SendMessageOptions {
                reply_markup: Some(reply.into()),
                ..Default::default()
            },
        )
        .await
        .context("sending message 2")?;

    log_message("message 1", &first)?;
    log_message("message 2", &second)?;
    Ok(())
}
