//! Reply markup shapes, serialised exactly as the Bot API expects them.

use serde::{Deserialize, Serialize};

/// Keyboard or reply-markup attached to a response. Only [`ReplyMarkup::InlineKeyboard`] survives an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    InlineKeyboard(InlineKeyboardMarkup),
    Keyboard(ReplyKeyboardMarkup),
    RemoveKeyboard(ReplyKeyboardRemove),
    ForceReply(ForceReply),
}

impl ReplyMarkup {
    pub fn is_inline(&self) -> bool {
        matches!(self, ReplyMarkup::InlineKeyboard(_))
    }

    pub fn as_inline(&self) -> Option<&InlineKeyboardMarkup> {
        match self {
            ReplyMarkup::InlineKeyboard(markup) => Some(markup),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            ReplyMarkup::InlineKeyboard(_) => "inline_keyboard",
            ReplyMarkup::Keyboard(_) => "keyboard",
            ReplyMarkup::RemoveKeyboard(_) => "remove_keyboard",
            ReplyMarkup::ForceReply(_) => "force_reply",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn new(rows: impl IntoIterator<Item = Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows.into_iter().collect(),
        }
    }

    /// Appends a row.
    pub fn row(mut self, buttons: impl IntoIterator<Item = InlineKeyboardButton>) -> Self {
        self.inline_keyboard.push(buttons.into_iter().collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

/// Keyboard shown in place of the user's input field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_keyboard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_time_keyboard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_persistent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_field_placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selective: Option<bool>,
}

impl ReplyKeyboardMarkup {
    pub fn new(rows: impl IntoIterator<Item = Vec<KeyboardButton>>) -> Self {
        Self {
            keyboard: rows.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn resized(mut self) -> Self {
        self.resize_keyboard = Some(true);
        self
    }

    pub fn one_time(mut self) -> Self {
        self.one_time_keyboard = Some(true);
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.input_field_placeholder = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_contact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_location: Option<bool>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: None,
            request_location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selective: Option<bool>,
}

impl ReplyKeyboardRemove {
    pub fn new() -> Self {
        Self {
            remove_keyboard: true,
            selective: None,
        }
    }
}

impl Default for ReplyKeyboardRemove {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceReply {
    pub force_reply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_field_placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selective: Option<bool>,
}

impl ForceReply {
    pub fn new() -> Self {
        Self {
            force_reply: true,
            input_field_placeholder: None,
            selective: None,
        }
    }
}

impl Default for ForceReply {
    fn default() -> Self {
        Self::new()
    }
}

impl From<InlineKeyboardMarkup> for ReplyMarkup {
    fn from(markup: InlineKeyboardMarkup) -> Self {
        ReplyMarkup::InlineKeyboard(markup)
    }
}

impl From<ReplyKeyboardMarkup> for ReplyMarkup {
    fn from(markup: ReplyKeyboardMarkup) -> Self {
        ReplyMarkup::Keyboard(markup)
    }
}

impl From<ReplyKeyboardRemove> for ReplyMarkup {
    fn from(markup: ReplyKeyboardRemove) -> Self {
        ReplyMarkup::RemoveKeyboard(markup)
    }
}

impl From<ForceReply> for ReplyMarkup {
    fn from(markup: ForceReply) -> Self {
        ReplyMarkup::ForceReply(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_inline_keyboard_is_inline() {
        let inline: ReplyMarkup = InlineKeyboardMarkup::default()
            .row([InlineKeyboardButton::callback("Go", "go")])
            .into();
        assert!(inline.is_inline());
        assert!(inline.as_inline().is_some());

        let reply: ReplyMarkup = ReplyKeyboardMarkup::new([vec![KeyboardButton::new("A")]]).into();
        assert!(!reply.is_inline());
        assert!(reply.as_inline().is_none());
        assert!(!ReplyMarkup::from(ReplyKeyboardRemove::new()).is_inline());
        assert!(!ReplyMarkup::from(ForceReply::new()).is_inline());
    }

    #[test]
    fn test_serialises_bot_api_shape() {
        let markup: ReplyMarkup = ReplyKeyboardMarkup::new([vec![KeyboardButton::new("Go")]])
            .resized()
            .placeholder("Choose...")
            .into();
        assert_eq!(
            serde_json::to_value(&markup).unwrap(),
            json!({
                "keyboard": [[{ "text": "Go" }]],
                "resize_keyboard": true,
                "input_field_placeholder": "Choose..."
            })
        );
    }

    #[test]
    fn test_deserialises_each_shape() {
        let cases = [
            (json!({ "inline_keyboard": [[{ "text": "a", "url": "https://x.y" }]] }), "inline_keyboard"),
            (json!({ "keyboard": [[{ "text": "a", "request_contact": true }]] }), "keyboard"),
            (json!({ "remove_keyboard": true }), "remove_keyboard"),
            (json!({ "force_reply": true, "input_field_placeholder": "..." }), "force_reply"),
        ];
        for (value, shape) in cases {
            let markup: ReplyMarkup = serde_json::from_value(value).unwrap();
            assert_eq!(markup.shape(), shape);
        }
    }
}
