//! JSON views bot: every screen is a JSON view; buttons carry `view:<key>|k=v&k2=v2` callback data.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use teloxide::types::{Message, User};
use tracing::{info, warn};
use view_adapters::{load_json_views_dir, JsonAdapter, JsonParams};
use view_core::{init_tracing, Result};
use view_render::{AdapterViewsBuilder, ViewsBuilder};
use view_telegram::{
    run_dispatcher, TelegramCallbackContext, TelegramConfig, TelegramMessageContext, ViewBot,
};

const DEFAULT_VIEWS_DIR: &str = "view-examples/views";
const START_VIEW: &str = "main.menu";

#[derive(Parser)]
#[command(name = "json-views-bot")]
#[command(about = "Telegram bot whose screens are JSON view files", long_about = None)]
struct Cli {
    /// Directory of JSON view files (overrides VIEWS_DIR).
    #[arg(short, long)]
    views: Option<PathBuf>,
    /// Bot token (overrides BOT_TOKEN).
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Serialize)]
struct Globals {
    user: UserGlobals,
}

#[derive(Serialize)]
struct UserGlobals {
    id: u64,
    first_name: String,
    username: Option<String>,
}

impl Globals {
    fn for_user(user: Option<&User>) -> Arc<Self> {
        let user = match user {
            Some(u) => UserGlobals {
                id: u.id.0,
                first_name: u.first_name.clone(),
                username: u.username.clone(),
            },
            None => UserGlobals {
                id: 0,
                first_name: "there".to_string(),
                username: None,
            },
        };
        Arc::new(Self { user })
    }
}

struct App {
    views: AdapterViewsBuilder<Globals, Option<JsonParams>>,
}

#[async_trait]
impl ViewBot for App {
    async fn on_message(&self, ctx: &TelegramMessageContext, message: &Message) -> Result<()> {
        let key = match message.text() {
            Some("/start") => START_VIEW,
            Some("/keyboard") => "main.keyboard",
            _ => return Ok(()),
        };
        self.views
            .build_render(ctx.as_context(), Globals::for_user(message.from.as_ref()))
            .render(key, None)
            .await?;
        Ok(())
    }

    async fn on_callback_query(&self, ctx: &TelegramCallbackContext) -> Result<()> {
        let render = self
            .views
            .build_render(ctx.as_context(), Globals::for_user(Some(&ctx.query().from)));

        match ctx.data().and_then(parse_route) {
            Some((key, params)) => {
                info!(key = %key, "Routing callback to view");
                render.render(&key, params).await?;
            }
            None => {
                warn!(data = ?ctx.data(), "Unroutable callback data, showing start view");
                render.render(START_VIEW, None).await?;
            }
        }
        Ok(())
    }
}

/// `view:<key>` or `view:<key>|k=v&k2=v2`.
fn parse_route(data: &str) -> Option<(String, Option<JsonParams>)> {
    let route = data.strip_prefix("view:")?;
    let (key, query) = match route.split_once('|') {
        Some((key, query)) => (key, Some(query)),
        None => (route, None),
    };
    if key.is_empty() {
        return None;
    }
    let params = query.map(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect::<JsonParams>()
    });
    Some((key.to_string(), params))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = TelegramConfig::load(cli.token)?;

    let log_file = config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from("logs/json-views-bot.log"));
    init_tracing(Some(log_file.as_path()))?;

    let views_dir = cli
        .views
        .or_else(|| config.views_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VIEWS_DIR));
    let definitions = load_json_views_dir(&views_dir).await?;
    let adapter = JsonAdapter::<Globals>::new(definitions)?;

    info!(
        start_time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        views_dir = %views_dir.display(),
        log_file = %log_file.display(),
        "JSON views bot started"
    );

    let app = Arc::new(App {
        views: ViewsBuilder::new().with_adapter(adapter),
    });
    run_dispatcher(config.bot()?, app).await
}
