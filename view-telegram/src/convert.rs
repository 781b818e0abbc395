//! Conversions from view-core values to teloxide types.

use teloxide::types::{
    FileId, InputFile, InputMedia, InputMediaAnimation, InputMediaAudio, InputMediaDocument,
    InputMediaPhoto, InputMediaVideo, Message,
};
use view_core::{
    InlineKeyboardMarkup, Media, MediaKind, MediaSource, ReplyMarkup, Result, SentMessage,
    ViewError,
};

/// Core markup and teloxide markup share the Bot API JSON shape, so conversion goes through it.
pub fn reply_markup(markup: &ReplyMarkup) -> Result<teloxide::types::ReplyMarkup> {
    Ok(serde_json::from_value(serde_json::to_value(markup)?)?)
}

pub fn inline_markup(
    markup: &InlineKeyboardMarkup,
) -> Result<teloxide::types::InlineKeyboardMarkup> {
    Ok(serde_json::from_value(serde_json::to_value(markup)?)?)
}

pub fn input_file(source: &MediaSource) -> Result<InputFile> {
    match source {
        MediaSource::Url(url) => {
            let url = reqwest::Url::parse(url)
                .map_err(|e| ViewError::Config(format!("invalid media url {url}: {e}")))?;
            Ok(InputFile::url(url))
        }
        MediaSource::FileId(id) => Ok(InputFile::file_id(FileId(id.clone()))),
        MediaSource::Bytes { file_name, data } => {
            Ok(InputFile::memory(data.clone()).file_name(file_name.clone()))
        }
    }
}

/// `InputMedia` for kinds the platform can put in a group or swap in place.
pub fn input_media(media: &Media) -> Result<InputMedia> {
    let file = input_file(&media.source)?;
    let caption = media.caption.clone();
    let input = match media.kind {
        MediaKind::Photo => {
            let mut m = InputMediaPhoto::new(file);
            m.caption = caption;
            InputMedia::Photo(m)
        }
        MediaKind::Video => {
            let mut m = InputMediaVideo::new(file);
            m.caption = caption;
            InputMedia::Video(m)
        }
        MediaKind::Animation => {
            let mut m = InputMediaAnimation::new(file);
            m.caption = caption;
            InputMedia::Animation(m)
        }
        MediaKind::Audio => {
            let mut m = InputMediaAudio::new(file);
            m.caption = caption;
            InputMedia::Audio(m)
        }
        MediaKind::Document => {
            let mut m = InputMediaDocument::new(file);
            m.caption = caption;
            InputMedia::Document(m)
        }
        kind @ (MediaKind::Voice | MediaKind::Sticker | MediaKind::VideoNote) => {
            return Err(ViewError::Platform(format!(
                "{kind} cannot be sent as input media"
            )));
        }
    };
    Ok(input)
}

pub fn sent(message: &Message) -> SentMessage {
    SentMessage {
        chat_id: message.chat.id.0,
        message_id: message.id.0,
    }
}

/// True when the message carries any attachment the view layer knows about.
pub fn has_attachment(message: &Message) -> bool {
    message.photo().is_some()
        || message.video().is_some()
        || message.animation().is_some()
        || message.audio().is_some()
        || message.document().is_some()
        || message.voice().is_some()
        || message.sticker().is_some()
        || message.video_note().is_some()
}
