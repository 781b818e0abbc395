//! Response draft: the text, keyboard and media a view wants to show.

use crate::markup::ReplyMarkup;
use crate::media::{Media, MediaPayload};

/// Accumulates one view's desired output. Each setter overwrites the previous value for its field.
///
/// A fresh draft is created for every render call and consumed once by the dispatch engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseView {
    text: Option<String>,
    keyboard: Option<ReplyMarkup>,
    media: Option<MediaPayload>,
}

impl ResponseView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message text (used as caption when media is present).
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the keyboard / reply markup.
    pub fn keyboard(&mut self, keyboard: impl Into<ReplyMarkup>) -> &mut Self {
        self.keyboard = Some(keyboard.into());
        self
    }

    /// Sets a single attachment or a media group.
    pub fn media(&mut self, media: impl Into<MediaPayload>) -> &mut Self {
        self.media = Some(media.into());
        self
    }

    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn get_keyboard(&self) -> Option<&ReplyMarkup> {
        self.keyboard.as_ref()
    }

    pub fn get_media(&self) -> Option<&MediaPayload> {
        self.media.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.keyboard.is_none() && self.media.is_none()
    }

    pub fn into_parts(self) -> (Option<String>, Option<ReplyMarkup>, Option<MediaPayload>) {
        (self.text, self.keyboard, self.media)
    }
}

/// Sets `caption` on the last element of `group` (others untouched). No-op without a caption or for an empty group.
pub fn caption_last(group: &mut [Media], caption: Option<&str>) {
    if let (Some(last), Some(caption)) = (group.last_mut(), caption) {
        last.caption = Some(caption.to_string());
    }
}
