//! # view-core
//!
//! Building blocks of the view layer: the [`ResponseView`] draft, media and reply-markup types,
//! the conversation-context traits the dispatch engine calls into, the shared error type and tracing
//! initialisation. Transport-agnostic; `view-telegram` provides the teloxide implementation.

pub mod context;
pub mod error;
pub mod logger;
pub mod markup;
pub mod media;
pub mod response;
#[cfg(feature = "testing")]
pub mod testing;

pub use context::{CallbackQueryContext, ConversationContext, MessageContext, SentMessage};
pub use error::{Result, ViewError};
pub use logger::init_tracing;
pub use markup::{
    ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup,
    ReplyKeyboardRemove, ReplyMarkup,
};
pub use media::{Media, MediaKind, MediaPayload, MediaSource};
pub use response::{caption_last, ResponseView};
