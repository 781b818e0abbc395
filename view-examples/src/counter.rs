//! Counter bot: code-defined views, in-place edits on button presses, forced sends for new messages.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use clap::Parser;
use teloxide::types::Message;
use tokio::sync::RwLock;
use tracing::info;
use view_adapters::DefineAdapter;
use view_core::{
    init_tracing, InlineKeyboardButton, InlineKeyboardMarkup, Media, Result, ViewError,
};
use view_render::{AdapterViewsBuilder, ViewContext, ViewsBuilder};
use view_telegram::{
    run_dispatcher, TelegramCallbackContext, TelegramConfig, TelegramMessageContext, ViewBot,
};

#[derive(Parser)]
#[command(name = "counter-bot")]
#[command(about = "Telegram counter bot built from code-defined views", long_about = None)]
struct Cli {
    /// Bot token (overrides BOT_TOKEN).
    #[arg(short, long)]
    token: Option<String>,
}

struct Globals {
    count: i64,
    name: String,
}

fn counter_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::default()
        .row([
            InlineKeyboardButton::callback("-1", "dec"),
            InlineKeyboardButton::callback("+1", "inc"),
        ])
        .row([
            InlineKeyboardButton::callback("Reset", "reset"),
            InlineKeyboardButton::callback("Picture", "picture"),
        ])
        .row([InlineKeyboardButton::callback("New message", "new")])
}

fn views() -> DefineAdapter<Globals, ()> {
    DefineAdapter::new()
        .view_sync("counter", |ctx: &mut ViewContext<Globals>, ()| {
            let text = format!("{}, the counter is at {}", ctx.name, ctx.count);
            ctx.response.text(text).keyboard(counter_keyboard());
            Ok(())
        })
        .view_sync("picture", |ctx: &mut ViewContext<Globals>, ()| {
            let url = format!("https://picsum.photos/seed/counter-{}/600/400", ctx.count);
            let caption = format!("Picture #{}", ctx.count);
            ctx.response
                .text(caption)
                .media(Media::photo(url))
                .keyboard(counter_keyboard());
            Ok(())
        })
        .view_fn("stats", |mut ctx: ViewContext<Globals>, ()| async move {
            let parity = if ctx.count % 2 == 0 { "even" } else { "odd" };
            let text = format!("{} is {}", ctx.count, parity);
            ctx.response.text(text);
            Ok::<_, ViewError>(ctx.into_response())
        })
}

struct App {
    views: AdapterViewsBuilder<Globals, ()>,
    counts: RwLock<HashMap<i64, i64>>,
}

impl App {
    async fn globals(&self, chat_id: i64, name: String) -> Arc<Globals> {
        let count = self.counts.read().await.get(&chat_id).copied().unwrap_or(0);
        Arc::new(Globals { count, name })
    }

    async fn update(&self, chat_id: i64, action: &str) {
        let mut counts = self.counts.write().await;
        let count = counts.entry(chat_id).or_insert(0);
        match action {
            "inc" => *count += 1,
            "dec" => *count -= 1,
            "reset" => *count = 0,
            _ => {}
        }
    }
}

#[async_trait]
impl ViewBot for App {
    async fn on_message(&self, ctx: &TelegramMessageContext, message: &Message) -> Result<()> {
        let key = match message.text() {
            Some("/start") => "counter",
            Some("/stats") => "stats",
            _ => return Ok(()),
        };
        let name = message
            .from
            .as_ref()
            .map(|u| u.first_name.clone())
            .unwrap_or_default();
        let globals = self.globals(ctx.chat_id().0, name).await;
        self.views
            .build_render(ctx.as_context(), globals)
            .render(key, ())
            .await?;
        Ok(())
    }

    async fn on_callback_query(&self, ctx: &TelegramCallbackContext) -> Result<()> {
        let chat_id = ctx.chat_id().0;
        let action = ctx.data().unwrap_or_default().to_string();
        self.update(chat_id, &action).await;

        let globals = self
            .globals(chat_id, ctx.query().from.first_name.clone())
            .await;
        let render = self.views.build_render(ctx.as_context(), globals);
        info!(chat_id = chat_id, action = %action, "Counter action");

        match action.as_str() {
            "new" => render.send("counter", ()).await?,
            "picture" => render.edit("picture", ()).await?,
            _ => render.render("counter", ()).await?,
        };
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = TelegramConfig::load(cli.token)?;

    let log_file = config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from("logs/counter-bot.log"));
    init_tracing(Some(log_file.as_path()))?;
    info!(
        start_time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        log_file = %log_file.display(),
        "Counter bot started"
    );

    let app = Arc::new(App {
        views: ViewsBuilder::new().with_adapter(views()),
        counts: RwLock::new(HashMap::new()),
    });
    run_dispatcher(config.bot()?, app).await
}
