use crate::channels::dispatcher::CommandDispatcher;
use crate::channels::types::{DispatchResult, IncomingMessage, ReplyFormat};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::oneshot;

/// Build the handler-facing view of a Telegram message; `None` for non-text updates
fn normalize(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text()?;
    let user = msg.from()?;

    Some(IncomingMessage {
        chat_id: msg.chat.id.0,
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        text: text.to_string(),
    })
}

/// Send a reply, falling back to plain text when Telegram rejects the markup
async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &DispatchResult) {
    if reply.format == ReplyFormat::Markdown {
        match bot
            .send_message(chat_id, &reply.response)
            .parse_mode(ParseMode::Markdown)
            .await
        {
            Ok(_) => return,
            Err(e) => {
                log::warn!(
                    "[TELEGRAM] Markdown reply to chat {} rejected ({}), resending as plain text",
                    chat_id.0,
                    e
                );
            }
        }
    }

    if let Err(e) = bot.send_message(chat_id, &reply.response).await {
        log::error!("[TELEGRAM] Failed to send reply to chat {}: {}", chat_id.0, e);
    }
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<CommandDispatcher>,
) -> ResponseResult<()> {
    let Some(incoming) = normalize(&msg) else {
        return Ok(());
    };

    if let Some(reply) = dispatcher.dispatch(&incoming).await {
        send_reply(&bot, msg.chat.id, &reply).await;
    }

    Ok(())
}

/// Run the long-polling listener until `shutdown_rx` fires
pub async fn start_telegram_listener(
    bot_token: &str,
    dispatcher: Arc<CommandDispatcher>,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), String> {
    let bot = Bot::new(bot_token);

    let me = bot
        .get_me()
        .await
        .map_err(|e| format!("Failed to connect to Telegram: {}", e))?;
    log::info!("[TELEGRAM] Connected as @{}", me.username());

    let handler = Update::filter_message().endpoint(handle_message);

    let mut telegram_dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text(
            "[TELEGRAM] Error in update handler",
        ))
        .build();

    let shutdown_token = telegram_dispatcher.shutdown_token();
    tokio::spawn(async move {
        if shutdown_rx.await.is_err() {
            return;
        }
        match shutdown_token.shutdown() {
            Ok(done) => {
                done.await;
                log::info!("[TELEGRAM] Listener stopped");
            }
            Err(e) => log::warn!("[TELEGRAM] Listener was not running: {:?}", e),
        }
    });

    telegram_dispatcher.dispatch().await;
    Ok(())
}
