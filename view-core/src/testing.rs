//! In-memory conversation context that records every platform call. Enabled with the `testing` feature.
//!
//! One [`RecordingContext`] implements both context traits, so a test picks the kind with
//! [`RecordingContext::as_message`] or [`RecordingContext::as_callback_query`].

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::context::{CallbackQueryContext, ConversationContext, MessageContext, SentMessage};
use crate::error::{Result, ViewError};
use crate::markup::{InlineKeyboardMarkup, ReplyMarkup};
use crate::media::Media;

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    SendText {
        text: String,
        markup: Option<ReplyMarkup>,
    },
    SendMedia {
        media: Media,
        markup: Option<ReplyMarkup>,
    },
    SendMediaGroup(Vec<Media>),
    DeleteMessage,
    EditText {
        text: String,
        markup: Option<InlineKeyboardMarkup>,
    },
    EditCaption {
        caption: String,
        markup: Option<InlineKeyboardMarkup>,
    },
    EditMedia {
        media: Media,
        markup: Option<InlineKeyboardMarkup>,
    },
    EditReplyMarkup(Option<InlineKeyboardMarkup>),
    Answer,
}

impl RecordedCall {
    pub fn name(&self) -> &'static str {
        match self {
            RecordedCall::SendText { .. } => "send_text",
            RecordedCall::SendMedia { .. } => "send_media",
            RecordedCall::SendMediaGroup(_) => "send_media_group",
            RecordedCall::DeleteMessage => "delete_message",
            RecordedCall::EditText { .. } => "edit_text",
            RecordedCall::EditCaption { .. } => "edit_caption",
            RecordedCall::EditMedia { .. } => "edit_media",
            RecordedCall::EditReplyMarkup(_) => "edit_reply_markup",
            RecordedCall::Answer => "answer",
        }
    }
}

/// Chat id used for every [`SentMessage`] the recorder returns.
pub const RECORDING_CHAT_ID: i64 = 42;

/// Records calls instead of talking to a platform. Message ids are handed out from 1 upwards.
pub struct RecordingContext {
    has_message: bool,
    has_attachment: bool,
    failing_call: Option<&'static str>,
    next_id: AtomicI32,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingContext {
    /// Context whose callback query references a plain text message.
    pub fn new() -> Self {
        Self {
            has_message: true,
            has_attachment: false,
            failing_call: None,
            next_id: AtomicI32::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The callback query references no accessible message.
    pub fn without_message(mut self) -> Self {
        self.has_message = false;
        self.has_attachment = false;
        self
    }

    /// The referenced message carries a media attachment.
    pub fn with_attachment(mut self) -> Self {
        self.has_attachment = true;
        self
    }

    /// Makes the named call (see [`RecordedCall::name`]) fail with a platform error. The failing call is still recorded.
    pub fn failing_on(mut self, call: &'static str) -> Self {
        self.failing_call = Some(call);
        self
    }

    pub fn as_message(&self) -> ConversationContext<'_> {
        ConversationContext::Message(self)
    }

    pub fn as_callback_query(&self) -> ConversationContext<'_> {
        ConversationContext::CallbackQuery(self)
    }

    /// Snapshot of recorded calls, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Names of recorded calls, in call order.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(RecordedCall::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.name() == name).count()
    }

    fn record(&self, call: RecordedCall) -> Result<()> {
        let name = call.name();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing_call == Some(name) {
            return Err(ViewError::Platform(format!("{} rejected", name)));
        }
        Ok(())
    }

    fn next_message(&self) -> SentMessage {
        SentMessage {
            chat_id: RECORDING_CHAT_ID,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        }
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageContext for RecordingContext {
    async fn send_text(&self, text: &str, markup: Option<&ReplyMarkup>) -> Result<SentMessage> {
        self.record(RecordedCall::SendText {
            text: text.to_string(),
            markup: markup.cloned(),
        })?;
        Ok(self.next_message())
    }

    async fn send_media(&self, media: &Media, markup: Option<&ReplyMarkup>) -> Result<SentMessage> {
        self.record(RecordedCall::SendMedia {
            media: media.clone(),
            markup: markup.cloned(),
        })?;
        Ok(self.next_message())
    }

    async fn send_media_group(&self, group: &[Media]) -> Result<Vec<SentMessage>> {
        self.record(RecordedCall::SendMediaGroup(group.to_vec()))?;
        Ok(group.iter().map(|_| self.next_message()).collect())
    }
}

#[async_trait]
impl CallbackQueryContext for RecordingContext {
    fn has_message(&self) -> bool {
        self.has_message
    }

    fn has_attachment(&self) -> bool {
        self.has_message && self.has_attachment
    }

    async fn delete_message(&self) -> Result<()> {
        self.record(RecordedCall::DeleteMessage)
    }

    async fn edit_text(
        &self,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        self.record(RecordedCall::EditText {
            text: text.to_string(),
            markup: markup.cloned(),
        })?;
        Ok(self.next_message())
    }

    async fn edit_caption(
        &self,
        caption: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        self.record(RecordedCall::EditCaption {
            caption: caption.to_string(),
            markup: markup.cloned(),
        })?;
        Ok(self.next_message())
    }

    async fn edit_media(
        &self,
        media: &Media,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        self.record(RecordedCall::EditMedia {
            media: media.clone(),
            markup: markup.cloned(),
        })?;
        Ok(self.next_message())
    }

    async fn edit_reply_markup(
        &self,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<SentMessage> {
        self.record(RecordedCall::EditReplyMarkup(markup.cloned()))?;
        Ok(self.next_message())
    }

    async fn answer(&self) -> Result<()> {
        self.record(RecordedCall::Answer)
    }
}
