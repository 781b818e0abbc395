//! teloxide-backed conversation contexts.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, Message, MessageId};
use tracing::debug;
use view_core::{
    CallbackQueryContext, ConversationContext, InlineKeyboardMarkup, Media, MediaKind,
    MessageContext, ReplyMarkup, Result, SentMessage, ViewError,
};

use crate::convert::{has_attachment, inline_markup, input_file, input_media, reply_markup, sent};

fn platform(e: teloxide::RequestError) -> ViewError {
    ViewError::Platform(e.to_string())
}

async fn send_text_to(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    markup: Option<&ReplyMarkup>,
) -> Result<SentMessage> {
    let mut request = bot.send_message(chat_id, text);
    if let Some(markup) = markup {
        request = request.reply_markup(reply_markup(markup)?);
    }
    let message = request.await.map_err(platform)?;
    Ok(sent(&message))
}

async fn send_media_to(
    bot: &Bot,
    chat_id: ChatId,
    media: &Media,
    markup: Option<&ReplyMarkup>,
) -> Result<SentMessage> {
    let file: InputFile = input_file(&media.source)?;
    let markup = markup.map(reply_markup).transpose()?;
    let caption = media.caption.clone();

    // Each kind is its own request type; sticker and video note take no caption.
    macro_rules! send {
        ($method:ident, caption) => {{
            let mut request = bot.$method(chat_id, file);
            if let Some(caption) = caption {
                request = request.caption(caption);
            }
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await
        }};
        ($method:ident) => {{
            let mut request = bot.$method(chat_id, file);
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await
        }};
    }

    let message = match media.kind {
        MediaKind::Photo => send!(send_photo, caption),
        MediaKind::Video => send!(send_video, caption),
        MediaKind::Animation => send!(send_animation, caption),
        MediaKind::Audio => send!(send_audio, caption),
        MediaKind::Document => send!(send_document, caption),
        MediaKind::Voice => send!(send_voice, caption),
        MediaKind::Sticker => send!(send_sticker),
        MediaKind::VideoNote => send!(send_video_note),
    }
    .map_err(platform)?;
    Ok(sent(&message))
}

async fn send_group_to(bot: &Bot, chat_id: ChatId, group: &[Media]) -> Result<Vec<SentMessage>> {
    let media = group.iter().map(input_media).collect::<Result<Vec<_>>>()?;
    let messages = bot
        .send_media_group(chat_id, media)
        .await
        .map_err(platform)?;
    Ok(messages.iter().map(sent).collect())
}

/// A plain incoming message: everything renders as a new message in its chat.
#[derive(Clone)]
pub struct TelegramMessageContext {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramMessageContext {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub fn from_message(bot: Bot, message: &Message) -> Self {
        Self::new(bot, message.chat.id)
    }

    pub fn as_context(&self) -> ConversationContext<'_> {
        ConversationContext::Message(self)
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

#[async_trait]
impl MessageContext for TelegramMessageContext {
    async fn send_text(&self, text: &str, markup: Option<&ReplyMarkup>) -> Result<SentMessage> {
        send_text_to(&self.bot, self.chat_id, text, markup).await
    }

    async fn send_media(&self, media: &Media, markup: Option<&ReplyMarkup>) -> Result<SentMessage> {
        send_media_to(&self.bot, self.chat_id, media, markup).await
    }

    async fn send_media_group(&self, group: &[Media]) -> Result<Vec<SentMessage>> {
        send_group_to(&self.bot, self.chat_id, group).await
    }
}

/// A button press. Edits target the message the button belongs to, when the bot can still see it.
#[derive(Clone)]
pub struct TelegramCallbackContext {
    bot: Bot,
    query: CallbackQuery,
}

impl TelegramCallbackContext {
    pub fn new(bot: Bot, query: CallbackQuery) -> Self {
        Self { bot, query }
    }

    pub fn as_context(&self) -> ConversationContext<'_> {
        ConversationContext::CallbackQuery(self)
    }

    pub fn query(&self) -> &CallbackQuery {
        &self.query
    }

    pub fn data(&self) -> Option<&str> {
        self.query.data.as_deref()
    }

    fn message(&self) -> Option<&Message> {
        self.query.regular_message()
    }

    /// Chat of the pressed message, or the user's private chat when the message is gone.
    pub fn chat_id(&self) -> ChatId {
        self.message()
            .map(|m| m.chat.id)
            .unwrap_or(ChatId(self.query.from.id.0 as i64))
    }

    fn target(&self) -> Result<(ChatId, MessageId)> {
        self.message()
            .map(|m| (m.chat.id, m.id))
            .ok_or_else(|| ViewError::Platform("callback query has no accessible message".into()))
    }
}

#[async_trait]
impl MessageContext for TelegramCallbackContext {
    async fn send_text(&self, text: &str, markup: Option<&ReplyMarkup>) -> Result<SentMessage> {
        send_text_to(&self.bot, self.chat_id(), text, markup).await
    }

    async fn send_media(&self, media: &Media, markup: Option<&ReplyMarkup>) -> Result<SentMessage> {
        send_media_to(&self.bot, self.chat_id(), media, markup).await
    }

    async fn send_media_group(&self, group: &[Media]) -> Result<Vec<SentMessage>> {
        send_group_to(&self.bot, self.chat_id(), group).await
    }
}

#[async_trait]
impl CallbackQueryContext for TelegramCallbackContext {
    fn has_message(&self) -> bool {
        self.message().is_some()
    }

    fn has_attachment(&self) -> bool {
        self.message().is_some_and(has_attachment)
    }

    async fn delete_message(&self) -> Result<()> {
        let (chat_id, message_id) = self.target()?;
        self.bot
            .delete_message(chat_id, message_id)
            .await
            .map_err(platform)?;
        Ok(())
    }

    async fn edit_text(
        &self,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        let (chat_id, message_id) = self.target()?;
        let mut request = self.bot.edit_message_text(chat_id, message_id, text);
        if let Some(markup) = markup {
            request = request.reply_markup(inline_markup(markup)?);
        }
        let message = request.await.map_err(platform)?;
        Ok(sent(&message))
    }

    async fn edit_caption(
        &self,
        caption: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        let (chat_id, message_id) = self.target()?;
        let mut request = self
            .bot
            .edit_message_caption(chat_id, message_id)
            .caption(caption);
        if let Some(markup) = markup {
            request = request.reply_markup(inline_markup(markup)?);
        }
        let message = request.await.map_err(platform)?;
        Ok(sent(&message))
    }

    async fn edit_media(
        &self,
        media: &Media,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        let (chat_id, message_id) = self.target()?;
        let mut request = self
            .bot
            .edit_message_media(chat_id, message_id, input_media(media)?);
        if let Some(markup) = markup {
            request = request.reply_markup(inline_markup(markup)?);
        }
        let message = request.await.map_err(platform)?;
        Ok(sent(&message))
    }

    async fn edit_reply_markup(
        &self,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        let (chat_id, message_id) = self.target()?;
        let mut request = self.bot.edit_message_reply_markup(chat_id, message_id);
        if let Some(markup) = markup {
            request = request.reply_markup(inline_markup(markup)?);
        }
        let message = request.await.map_err(platform)?;
        Ok(sent(&message))
    }

    async fn answer(&self) -> Result<()> {
        self.bot
            .answer_callback_query(self.query.id.clone())
            .await
            .map_err(platform)?;
        debug!(query_id = ?self.query.id, "callback query answered");
        Ok(())
    }
}
