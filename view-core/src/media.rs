//! Media descriptors: kind, file locator and optional caption.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media kinds a view can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Animation,
    Audio,
    Document,
    Voice,
    Sticker,
    VideoNote,
}

impl MediaKind {
    pub const ALL: [MediaKind; 8] = [
        MediaKind::Photo,
        MediaKind::Video,
        MediaKind::Animation,
        MediaKind::Audio,
        MediaKind::Document,
        MediaKind::Voice,
        MediaKind::Sticker,
        MediaKind::VideoNote,
    ];

    /// Whether the attached file can be replaced on an existing message.
    /// Voice, sticker and video note files are fixed once sent.
    pub fn is_editable(self) -> bool {
        !matches!(self, MediaKind::Voice | MediaKind::Sticker | MediaKind::VideoNote)
    }

    /// Sticker and video note messages carry no caption.
    pub fn supports_caption(self) -> bool {
        !matches!(self, MediaKind::Sticker | MediaKind::VideoNote)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Animation => "animation",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
            MediaKind::Voice => "voice",
            MediaKind::Sticker => "sticker",
            MediaKind::VideoNote => "video_note",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the media file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Remote file the platform downloads itself.
    Url(String),
    /// File already stored on the platform.
    FileId(String),
    /// In-memory upload.
    Bytes { file_name: String, data: Vec<u8> },
}

impl MediaSource {
    /// Classifies a string locator: `http://` / `https://` are URLs, anything else is a platform file id.
    pub fn from_locator(locator: impl Into<String>) -> Self {
        let locator = locator.into();
        if locator.starts_with("http://") || locator.starts_with("https://") {
            MediaSource::Url(locator)
        } else {
            MediaSource::FileId(locator)
        }
    }

    pub fn bytes(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        MediaSource::Bytes {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// The string locator, if this source has one.
    pub fn locator(&self) -> Option<&str> {
        match self {
            MediaSource::Url(s) | MediaSource::FileId(s) => Some(s),
            MediaSource::Bytes { .. } => None,
        }
    }
}

impl From<&str> for MediaSource {
    fn from(locator: &str) -> Self {
        MediaSource::from_locator(locator)
    }
}

impl From<String> for MediaSource {
    fn from(locator: String) -> Self {
        MediaSource::from_locator(locator)
    }
}

/// A single media attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub kind: MediaKind,
    pub source: MediaSource,
    pub caption: Option<String>,
}

impl Media {
    pub fn new(kind: MediaKind, source: impl Into<MediaSource>) -> Self {
        Self {
            kind,
            source: source.into(),
            caption: None,
        }
    }

    pub fn photo(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Photo, source)
    }

    pub fn video(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Video, source)
    }

    pub fn animation(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Animation, source)
    }

    pub fn audio(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Audio, source)
    }

    pub fn document(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Document, source)
    }

    pub fn voice(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Voice, source)
    }

    pub fn sticker(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::Sticker, source)
    }

    pub fn video_note(source: impl Into<MediaSource>) -> Self {
        Self::new(MediaKind::VideoNote, source)
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Either one attachment or an ordered media group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaPayload {
    Single(Media),
    Group(Vec<Media>),
}

impl MediaPayload {
    /// A one-element group counts as a single attachment; an empty group as none.
    pub fn as_single(&self) -> Option<&Media> {
        match self {
            MediaPayload::Single(media) => Some(media),
            MediaPayload::Group(group) if group.len() == 1 => group.first(),
            MediaPayload::Group(_) => None,
        }
    }

    /// True for a group of two or more items.
    pub fn is_group(&self) -> bool {
        matches!(self, MediaPayload::Group(group) if group.len() > 1)
    }
}

impl From<Media> for MediaPayload {
    fn from(media: Media) -> Self {
        MediaPayload::Single(media)
    }
}

impl From<Vec<Media>> for MediaPayload {
    fn from(group: Vec<Media>) -> Self {
        MediaPayload::Group(group)
    }
}
