//! # view-telegram
//!
//! teloxide implementation of the view layer's conversation contexts, plus env config and a dispatcher
//! loop handing each update a ready [`TelegramMessageContext`] or [`TelegramCallbackContext`].

mod config;
mod context;
pub mod convert;
mod runner;

pub use config::TelegramConfig;
pub use context::{TelegramCallbackContext, TelegramMessageContext};
pub use runner::{run_dispatcher, ViewBot};
