//! Declarative views: JSON definitions compiled into renderable units.
//!
//! ```json
//! {
//!   "welcome": {
//!     "text": "Hello, {{name}}!",
//!     "reply_markup": { "inline_keyboard": [[{ "text": "Profile", "callback_data": "profile_{{id}}" }]] },
//!     "media": { "type": "photo", "media": "{{photo}}" }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use view_core::{
    ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, Media, MediaKind,
    MediaPayload, ReplyKeyboardMarkup, ReplyKeyboardRemove, ReplyMarkup, ResponseView, Result,
    ViewError,
};
use view_render::{ViewAdapter, ViewContext, ViewRender};

use crate::interpolate::{interpolate, JsonParams, Scope};

/// One declarative view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonViewDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<JsonReplyMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<JsonMedia>,
}

/// `media` is either one descriptor or an ordered group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonMedia {
    Single(JsonMediaDefinition),
    Group(Vec<JsonMediaDefinition>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonMediaDefinition {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// URL or platform file id; may contain placeholders.
    pub media: String,
}

/// Every markup shape flattened into one record, so a definition carrying two shapes is caught at
/// construction instead of being silently resolved by field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonReplyMarkup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_keyboard: Option<Vec<Vec<InlineKeyboardButton>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Vec<Vec<KeyboardButton>>>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_keyboard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_reply: Option<bool>,
}

impl JsonReplyMarkup {
    fn shapes(&self) -> Vec<&'static str> {
        let mut shapes = Vec::new();
        if self.inline_keyboard.is_some() {
            shapes.push("inline_keyboard");
        }
        if self.keyboard.is_some() {
            shapes.push("keyboard");
        }
        if self.remove_keyboard.is_some() {
            shapes.push("remove_keyboard");
        }
        if self.force_reply.is_some() {
            shapes.push("force_reply");
        }
        shapes
    }

    /// Converts to the single markup shape this record describes.
    pub fn to_markup(&self, view: &str) -> Result<ReplyMarkup> {
        for (flag, value) in [
            ("remove_keyboard", self.remove_keyboard),
            ("force_reply", self.force_reply),
        ] {
            if value == Some(false) {
                return Err(ViewError::Config(format!(
                    "view \"{view}\" sets {flag} to false; it only accepts true"
                )));
            }
        }

        let shapes = self.shapes();
        if shapes.len() != 1 {
            let found = if shapes.is_empty() {
                "none".to_string()
            } else {
                shapes.join(", ")
            };
            return Err(ViewError::Config(format!(
                "view \"{view}\" must declare exactly one reply_markup shape, found: {found}"
            )));
        }

        let markup = match shapes[0] {
            "inline_keyboard" => ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup {
                inline_keyboard: self.inline_keyboard.clone().unwrap_or_default(),
            }),
            "keyboard" => ReplyMarkup::Keyboard(ReplyKeyboardMarkup {
                keyboard: self.keyboard.clone().unwrap_or_default(),
                resize_keyboard: self.resize_keyboard,
                one_time_keyboard: self.one_time_keyboard,
                is_persistent: self.is_persistent,
                input_field_placeholder: self.input_field_placeholder.clone(),
                selective: self.selective,
            }),
            "remove_keyboard" => ReplyMarkup::RemoveKeyboard(ReplyKeyboardRemove {
                remove_keyboard: true,
                selective: self.selective,
            }),
            _ => ReplyMarkup::ForceReply(ForceReply {
                force_reply: true,
                input_field_placeholder: self.input_field_placeholder.clone(),
                selective: self.selective,
            }),
        };
        Ok(markup)
    }
}

/// A definition validated once at construction; only string interpolation happens per render.
#[derive(Debug, Clone)]
struct CompiledView {
    text: Option<String>,
    markup: Option<ReplyMarkup>,
    media: Option<JsonMedia>,
}

impl CompiledView {
    fn compile(key: &str, definition: JsonViewDefinition) -> Result<Self> {
        let markup = definition
            .reply_markup
            .as_ref()
            .map(|markup| markup.to_markup(key))
            .transpose()?;
        Ok(Self {
            text: definition.text,
            markup,
            media: definition.media,
        })
    }

    fn apply(&self, response: &mut ResponseView, scope: &Scope<'_>) {
        if let Some(text) = &self.text {
            response.text(interpolate(text, scope));
        }
        if let Some(markup) = &self.markup {
            response.keyboard(interpolate_markup(markup, scope));
        }
        match &self.media {
            Some(JsonMedia::Single(media)) => {
                response.media(interpolate_media(media, scope));
            }
            Some(JsonMedia::Group(group)) => {
                let group: Vec<Media> = group.iter().map(|m| interpolate_media(m, scope)).collect();
                response.media(MediaPayload::Group(group));
            }
            None => {}
        }
    }
}

fn interpolate_media(media: &JsonMediaDefinition, scope: &Scope<'_>) -> Media {
    Media::new(media.kind, interpolate(&media.media, scope))
}

fn interpolate_markup(markup: &ReplyMarkup, scope: &Scope<'_>) -> ReplyMarkup {
    let opt = |value: &Option<String>| value.as_deref().map(|v| interpolate(v, scope));
    match markup {
        ReplyMarkup::InlineKeyboard(inline) => ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup {
            inline_keyboard: inline
                .inline_keyboard
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: interpolate(&button.text, scope),
                            callback_data: opt(&button.callback_data),
                            url: opt(&button.url),
                        })
                        .collect()
                })
                .collect(),
        }),
        ReplyMarkup::Keyboard(reply) => ReplyMarkup::Keyboard(ReplyKeyboardMarkup {
            keyboard: reply
                .keyboard
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| KeyboardButton {
                            text: interpolate(&button.text, scope),
                            ..button.clone()
                        })
                        .collect()
                })
                .collect(),
            input_field_placeholder: opt(&reply.input_field_placeholder),
            ..reply.clone()
        }),
        ReplyMarkup::ForceReply(force) => ReplyMarkup::ForceReply(ForceReply {
            input_field_placeholder: opt(&force.input_field_placeholder),
            ..force.clone()
        }),
        ReplyMarkup::RemoveKeyboard(remove) => ReplyMarkup::RemoveKeyboard(remove.clone()),
    }
}

/// Custom placeholder resolver, consulted for names without a `$` prefix before the params.
pub type Resolver<G> = Arc<dyn Fn(&str, &G) -> Option<String> + Send + Sync>;

/// Adapter over declarative views. Args are optional call-time params.
pub struct JsonAdapter<G> {
    views: HashMap<String, ViewRender<G, Option<JsonParams>>>,
}

impl<G> JsonAdapter<G>
where
    G: Serialize + Send + Sync + 'static,
{
    /// Compiles `views`; fails with [`ViewError::Config`] on a conflicting or empty markup shape.
    pub fn new(views: impl IntoIterator<Item = (String, JsonViewDefinition)>) -> Result<Self> {
        Self::builder().views(views).build()
    }

    pub fn builder() -> JsonAdapterBuilder<G> {
        JsonAdapterBuilder {
            views: BTreeMap::new(),
            resolver: None,
        }
    }

    fn unit(
        view: CompiledView,
        resolver: Option<Resolver<G>>,
    ) -> ViewRender<G, Option<JsonParams>> {
        ViewRender::from_sync_fn(move |ctx: &mut ViewContext<G>, params: Option<JsonParams>| {
            let globals = serde_json::to_value(ctx.globals())?;
            let globals_arc = ctx.globals_arc();
            let bound = resolver
                .as_ref()
                .map(|resolve| move |name: &str| (resolve.as_ref())(name, &*globals_arc));

            let mut scope = Scope::new(&globals).with_params(params.as_ref());
            if let Some(bound) = &bound {
                scope = scope.with_resolver(bound);
            }
            view.apply(&mut ctx.response, &scope);
            Ok(())
        })
    }
}

impl<G> ViewAdapter<G, Option<JsonParams>> for JsonAdapter<G>
where
    G: Send + Sync + 'static,
{
    fn resolve(&self, key: &str) -> Result<ViewRender<G, Option<JsonParams>>> {
        self.views
            .get(key)
            .cloned()
            .ok_or_else(|| ViewError::NotFound(key.to_string()))
    }

    fn keys(&self) -> Option<Vec<String>> {
        let mut keys: Vec<String> = self.views.keys().cloned().collect();
        keys.sort();
        Some(keys)
    }
}

impl<G> fmt::Debug for JsonAdapter<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonAdapter")
            .field("views", &self.views.len())
            .finish()
    }
}

pub struct JsonAdapterBuilder<G> {
    views: BTreeMap<String, JsonViewDefinition>,
    resolver: Option<Resolver<G>>,
}

impl<G> JsonAdapterBuilder<G>
where
    G: Serialize + Send + Sync + 'static,
{
    /// Adds views; a repeated key replaces the earlier definition.
    pub fn views(mut self, views: impl IntoIterator<Item = (String, JsonViewDefinition)>) -> Self {
        self.views.extend(views);
        self
    }

    pub fn view(mut self, key: impl Into<String>, definition: JsonViewDefinition) -> Self {
        self.views.insert(key.into(), definition);
        self
    }

    pub fn resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str, &G) -> Option<String> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn build(self) -> Result<JsonAdapter<G>> {
        let mut views = HashMap::with_capacity(self.views.len());
        for (key, definition) in self.views {
            let compiled = CompiledView::compile(&key, definition)?;
            debug!(key = %key, "step: json view compiled");
            views.insert(key, JsonAdapter::unit(compiled, self.resolver.clone()));
        }
        info!(
            views = views.len(),
            resolver = self.resolver.is_some(),
            "JSON adapter built"
        );
        Ok(JsonAdapter { views })
    }
}

/// Parses a view map from an in-memory JSON value (top level must be an object of objects).
pub fn parse_json_views(value: Value) -> Result<BTreeMap<String, JsonViewDefinition>> {
    let Value::Object(map) = value else {
        return Err(ViewError::Config(
            "JSON views must be an object mapping view names to definitions".to_string(),
        ));
    };
    let mut views = BTreeMap::new();
    for (key, definition) in map {
        if !definition.is_object() {
            return Err(ViewError::Config(format!(
                "view \"{key}\" definition must be an object"
            )));
        }
        views.insert(key, serde_json::from_value(definition)?);
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_markup_shape_conflict_is_config_error() {
        let markup: JsonReplyMarkup = serde_json::from_value(json!({
            "inline_keyboard": [[{"text": "A", "callback_data": "a"}]],
            "keyboard": [[{"text": "B"}]]
        }))
        .unwrap();

        let err = markup.to_markup("menu").unwrap_err();
        assert!(matches!(err, ViewError::Config(_)));
        assert!(err.to_string().contains("menu"));
    }

    #[test]
    fn test_markup_without_shape_is_config_error() {
        let markup: JsonReplyMarkup =
            serde_json::from_value(json!({"selective": true})).unwrap();
        assert!(matches!(markup.to_markup("x"), Err(ViewError::Config(_))));
    }

    #[test]
    fn test_each_shape_converts() {
        let keyboard: JsonReplyMarkup = serde_json::from_value(json!({
            "keyboard": [[{"text": "Share", "request_contact": true}]],
            "resize_keyboard": true,
            "input_field_placeholder": "Type"
        }))
        .unwrap();
        assert!(matches!(
            keyboard.to_markup("k").unwrap(),
            ReplyMarkup::Keyboard(k) if k.resize_keyboard == Some(true)
                && k.keyboard[0][0].request_contact == Some(true)
        ));

        let remove: JsonReplyMarkup =
            serde_json::from_value(json!({"remove_keyboard": true})).unwrap();
        assert_eq!(remove.to_markup("r").unwrap().shape(), "remove_keyboard");

        let force: JsonReplyMarkup =
            serde_json::from_value(json!({"force_reply": true, "selective": true})).unwrap();
        assert!(matches!(
            force.to_markup("f").unwrap(),
            ReplyMarkup::ForceReply(f) if f.selective == Some(true)
        ));
    }

    /// **Test: `false` on a flag-only shape is rejected instead of being read as that shape.**
    #[test]
    fn test_false_flag_shape_is_config_error() {
        let remove: JsonReplyMarkup =
            serde_json::from_value(json!({"remove_keyboard": false})).unwrap();
        let err = remove.to_markup("r").unwrap_err();
        assert!(matches!(err, ViewError::Config(ref m) if m.contains("remove_keyboard")));

        let force: JsonReplyMarkup = serde_json::from_value(json!({
            "inline_keyboard": [[{"text": "A", "callback_data": "a"}]],
            "force_reply": false
        }))
        .unwrap();
        assert!(matches!(force.to_markup("f"), Err(ViewError::Config(_))));
    }

    #[test]
    fn test_media_definition_forms() {
        let single: JsonViewDefinition =
            serde_json::from_value(json!({"media": {"type": "photo", "media": "a"}})).unwrap();
        assert!(matches!(single.media, Some(JsonMedia::Single(_))));

        let group: JsonViewDefinition = serde_json::from_value(json!({
            "media": [{"type": "photo", "media": "a"}, {"type": "video", "media": "b"}]
        }))
        .unwrap();
        assert!(matches!(group.media, Some(JsonMedia::Group(g)) if g[1].kind == MediaKind::Video));
    }

    #[test]
    fn test_parse_json_views_rejects_non_objects() {
        assert!(parse_json_views(json!([1, 2])).is_err());
        assert!(matches!(
            parse_json_views(json!({"bad": "just text"})),
            Err(ViewError::Config(_))
        ));
        let views = parse_json_views(json!({"ok": {"text": "hi"}})).unwrap();
        assert_eq!(views["ok"].text.as_deref(), Some("hi"));
    }
}
