//! Conversation contexts the dispatch engine talks to.
//!
//! [`MessageContext`] and [`CallbackQueryContext`] are transport-agnostic; `view-telegram` implements them
//! via teloxide and tests can substitute a recording implementation. [`ConversationContext`] is the closed
//! set of context kinds a render call can receive.

use crate::error::Result;
use crate::markup::{InlineKeyboardMarkup, ReplyMarkup};
use crate::media::Media;
use async_trait::async_trait;

/// Handle to a message produced by a send or edit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Context of an incoming message: can only send new messages.
#[async_trait]
pub trait MessageContext: Send + Sync {
    /// Sends a text message.
    async fn send_text(&self, text: &str, markup: Option<&ReplyMarkup>) -> Result<SentMessage>;
    /// Sends one attachment; `media.caption` becomes the message caption.
    async fn send_media(&self, media: &Media, markup: Option<&ReplyMarkup>) -> Result<SentMessage>;
    /// Sends an album. Captions are taken from each item.
    async fn send_media_group(&self, group: &[Media]) -> Result<Vec<SentMessage>>;
}

/// Context of a callback query (button press). Can additionally edit or delete the message the button
/// belongs to, and must acknowledge the query.
#[async_trait]
pub trait CallbackQueryContext: MessageContext {
    /// Whether the query references a message the bot can still touch.
    fn has_message(&self) -> bool;
    /// Whether that message carries a media attachment. False when there is no message.
    fn has_attachment(&self) -> bool;

    async fn delete_message(&self) -> Result<()>;
    async fn edit_text(
        &self,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage>;
    async fn edit_caption(
        &self,
        caption: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage>;
    /// Replaces the attached file. Only called for editable kinds.
    async fn edit_media(
        &self,
        media: &Media,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage>;
    /// Replaces (or with `None`, removes) the inline keyboard.
    async fn edit_reply_markup(&self, markup: Option<&InlineKeyboardMarkup>) -> Result<SentMessage>;
    /// Acknowledges the callback query.
    async fn answer(&self) -> Result<()>;
}

/// The context a render call runs against.
#[derive(Clone, Copy)]
pub enum ConversationContext<'a> {
    Message(&'a dyn MessageContext),
    CallbackQuery(&'a dyn CallbackQueryContext),
}

impl<'a> ConversationContext<'a> {
    pub fn is_callback_query(&self) -> bool {
        matches!(self, ConversationContext::CallbackQuery(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConversationContext::Message(_) => "message",
            ConversationContext::CallbackQuery(_) => "callback_query",
        }
    }
}

impl std::fmt::Debug for ConversationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConversationContext").field(&self.kind()).finish()
    }
}
