//! Update loop: routes messages and callback queries to a [`ViewBot`] with ready-made contexts.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::{error, info, instrument};
use view_core::Result;

use crate::context::{TelegramCallbackContext, TelegramMessageContext};

/// Application side of the loop. Errors are logged and do not stop the dispatcher.
#[async_trait]
pub trait ViewBot: Send + Sync + 'static {
    async fn on_message(&self, ctx: &TelegramMessageContext, message: &Message) -> Result<()>;

    async fn on_callback_query(&self, ctx: &TelegramCallbackContext) -> Result<()>;
}

/// Runs the dispatcher until Ctrl-C.
#[instrument(skip(bot, app))]
pub async fn run_dispatcher<B: ViewBot>(bot: Bot, app: Arc<B>) -> anyhow::Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Bot identity resolved"),
        Err(e) => error!(error = %e, "get_me failed, continuing"),
    }

    let on_message = {
        let app = app.clone();
        move |bot: Bot, msg: Message| {
            let app = app.clone();
            async move {
                info!(
                    chat_id = msg.chat.id.0,
                    has_text = msg.text().is_some(),
                    "Received message"
                );
                let ctx = TelegramMessageContext::from_message(bot, &msg);
                if let Err(e) = app.on_message(&ctx, &msg).await {
                    error!(error = %e, chat_id = msg.chat.id.0, "Message handling failed");
                }
                respond(())
            }
        }
    };

    let on_callback = move |bot: Bot, query: CallbackQuery| {
        let app = app.clone();
        async move {
            info!(data = ?query.data, "Received callback query");
            let ctx = TelegramCallbackContext::new(bot, query);
            if let Err(e) = app.on_callback_query(&ctx).await {
                error!(error = %e, "Callback query handling failed");
            }
            respond(())
        }
    };

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("Dispatcher starting");
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("Dispatcher stopped");
    Ok(())
}
