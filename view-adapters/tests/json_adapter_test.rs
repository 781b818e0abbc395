//! Integration tests for [`view_adapters::JsonAdapter`], rendered through the dispatch engine.
//!
//! Covers: resolution and keys, interpolation across text / buttons / placeholders / media, the
//! `$globals` and resolver tiers, markup-shape validation and end-to-end send/edit dispatch.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use view_adapters::{JsonAdapter, JsonParams, JsonViewDefinition};
use view_core::testing::{RecordedCall, RecordingContext};
use view_core::{
    InlineKeyboardButton, InlineKeyboardMarkup, Media, MediaKind, MediaPayload, ReplyMarkup,
    ViewError,
};
use view_render::{ViewAdapter, ViewsBuilder};

#[derive(Serialize, Default)]
struct Globals {
    user: Option<User>,
    locale: String,
}

#[derive(Serialize)]
struct User {
    name: String,
}

fn definitions(value: serde_json::Value) -> Vec<(String, JsonViewDefinition)> {
    view_adapters::parse_json_views(value)
        .unwrap()
        .into_iter()
        .collect()
}

fn params(value: serde_json::Value) -> Option<JsonParams> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

async fn build(
    adapter: &JsonAdapter<Globals>,
    key: &str,
    globals: Globals,
    args: Option<JsonParams>,
) -> view_core::ResponseView {
    adapter
        .resolve(key)
        .unwrap()
        .build(Arc::new(globals), args)
        .await
        .unwrap()
}

/// **Test: Known keys resolve, unknown keys fail with NotFound naming the key.**
#[test]
fn resolve_and_keys() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "welcome": {"text": "Hello!"},
        "goodbye": {"text": "Bye!"}
    })))
    .unwrap();

    assert!(adapter.resolve("welcome").is_ok());
    let err = adapter.resolve("unknown").unwrap_err();
    assert!(matches!(&err, ViewError::NotFound(k) if k == "unknown"));
    assert!(err.to_string().contains("\"unknown\""));
    assert_eq!(adapter.keys().unwrap(), vec!["goodbye", "welcome"]);
}

/// **Test: Text interpolates params; missing params stay verbatim; no params leaves templates alone.**
#[tokio::test]
async fn text_interpolation() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "greet": {"text": "Hello, {{name}}! Age: {{age}}"}
    })))
    .unwrap();

    let draft = build(&adapter, "greet", Globals::default(), params(json!({"name": "Bob"}))).await;
    assert_eq!(draft.get_text(), Some("Hello, Bob! Age: {{age}}"));

    let draft = build(&adapter, "greet", Globals::default(), None).await;
    assert_eq!(draft.get_text(), Some("Hello, {{name}}! Age: {{age}}"));
}

/// **Test: `$` placeholders read dotted paths of the globals and stay verbatim when absent.**
#[tokio::test]
async fn globals_path_interpolation() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "hello": {"text": "Hi {{$user.name}} ({{$locale}})"}
    })))
    .unwrap();

    let with_user = Globals {
        user: Some(User {
            name: "Ann".to_string(),
        }),
        locale: "en".to_string(),
    };
    let draft = build(&adapter, "hello", with_user, None).await;
    assert_eq!(draft.get_text(), Some("Hi Ann (en)"));

    let draft = build(&adapter, "hello", Globals::default(), None).await;
    assert_eq!(draft.get_text(), Some("Hi {{$user.name}} ()"));
}

/// **Test: The custom resolver wins over params and sees the globals.**
#[tokio::test]
async fn resolver_tier() {
    let adapter = JsonAdapter::<Globals>::builder()
        .views(definitions(json!({
            "t": {"text": "{{t:greeting}} / {{name}}"}
        })))
        .resolver(|name, globals: &Globals| {
            let key = name.strip_prefix("t:")?;
            Some(format!("{key}@{}", globals.locale))
        })
        .build()
        .unwrap();

    let globals = Globals {
        locale: "ru".to_string(),
        ..Default::default()
    };
    let draft = build(
        &adapter,
        "t",
        globals,
        params(json!({"name": "Ann", "t:greeting": "p"})),
    )
    .await;
    assert_eq!(draft.get_text(), Some("greeting@ru / Ann"));
}

/// **Test: Inline button text, callback_data and url are interpolated.**
#[tokio::test]
async fn inline_keyboard_interpolation() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "profile": {
            "text": "Hi",
            "reply_markup": {"inline_keyboard": [[
                {"text": "Profile {{name}}", "callback_data": "profile_{{id}}"},
                {"text": "Go", "url": "https://example.com/{{id}}"}
            ]]}
        }
    })))
    .unwrap();

    let draft = build(
        &adapter,
        "profile",
        Globals::default(),
        params(json!({"name": "Alice", "id": 42})),
    )
    .await;

    assert_eq!(
        draft.get_keyboard(),
        Some(&ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new([vec![
            InlineKeyboardButton::callback("Profile Alice", "profile_42"),
            InlineKeyboardButton::url("Go", "https://example.com/42"),
        ]])))
    );
}

/// **Test: Reply keyboard labels and placeholders interpolate; other options survive.**
#[tokio::test]
async fn reply_keyboard_and_force_reply_interpolation() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "ask": {
            "text": "Pick",
            "reply_markup": {
                "keyboard": [[{"text": "{{a}}"}, {"text": "Share", "request_contact": true}]],
                "resize_keyboard": true,
                "input_field_placeholder": "Pick {{a}}"
            }
        },
        "reply": {
            "text": "Answer",
            "reply_markup": {"force_reply": true, "input_field_placeholder": "Hi {{a}}"}
        }
    })))
    .unwrap();

    let draft = build(&adapter, "ask", Globals::default(), params(json!({"a": "Red"}))).await;
    let Some(ReplyMarkup::Keyboard(keyboard)) = draft.get_keyboard() else {
        panic!("expected reply keyboard");
    };
    assert_eq!(keyboard.keyboard[0][0].text, "Red");
    assert_eq!(keyboard.keyboard[0][1].request_contact, Some(true));
    assert_eq!(keyboard.resize_keyboard, Some(true));
    assert_eq!(keyboard.input_field_placeholder.as_deref(), Some("Pick Red"));

    let draft = build(&adapter, "reply", Globals::default(), params(json!({"a": "Red"}))).await;
    let Some(ReplyMarkup::ForceReply(force)) = draft.get_keyboard() else {
        panic!("expected force reply");
    };
    assert_eq!(force.input_field_placeholder.as_deref(), Some("Hi Red"));
}

/// **Test: Single and group media locators are interpolated; http(s) locators become URLs.**
#[tokio::test]
async fn media_interpolation() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "photo": {"media": {"type": "photo", "media": "{{photoUrl}}"}},
        "gallery": {
            "text": "Photos",
            "media": [
                {"type": "photo", "media": "https://example.com/{{a}}.jpg"},
                {"type": "video", "media": "{{b}}"}
            ]
        }
    })))
    .unwrap();

    let draft = build(
        &adapter,
        "photo",
        Globals::default(),
        params(json!({"photoUrl": "https://example.com/x.jpg"})),
    )
    .await;
    assert_eq!(
        draft.get_media(),
        Some(&MediaPayload::Single(Media::photo("https://example.com/x.jpg")))
    );

    let draft = build(
        &adapter,
        "gallery",
        Globals::default(),
        params(json!({"a": "1", "b": "file-id-2"})),
    )
    .await;
    let Some(MediaPayload::Group(group)) = draft.get_media() else {
        panic!("expected media group");
    };
    assert_eq!(group[0], Media::photo("https://example.com/1.jpg"));
    assert_eq!(group[1], Media::new(MediaKind::Video, "file-id-2"));
}

/// **Test: Two markup shapes on one view fail at construction with a config error.**
#[test]
fn conflicting_markup_fails_construction() {
    let result = JsonAdapter::<Globals>::new(definitions(json!({
        "bad": {
            "text": "x",
            "reply_markup": {
                "inline_keyboard": [[{"text": "A", "callback_data": "a"}]],
                "remove_keyboard": true
            }
        }
    })));

    assert!(matches!(result, Err(ViewError::Config(msg)) if msg.contains("bad")));
}

/// **Test: Group view on a message context sends one group with the caption on the last item.**
#[tokio::test]
async fn group_view_sends_caption_on_last() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "album": {
            "text": "cap",
            "media": [{"type": "photo", "media": "a"}, {"type": "photo", "media": "b"}]
        }
    })))
    .unwrap();
    let views = ViewsBuilder::<Globals>::new().with_adapter(adapter);
    let ctx = RecordingContext::new();

    views
        .build_render(ctx.as_message(), Arc::new(Globals::default()))
        .render("album", None)
        .await
        .unwrap();

    assert_eq!(
        ctx.calls(),
        vec![RecordedCall::SendMediaGroup(vec![
            Media::photo("a"),
            Media::photo("b").with_caption("cap"),
        ])]
    );
}

/// **Test: Keyboard-only view on a callback query edits only the reply markup.**
#[tokio::test]
async fn keyboard_only_view_edits_markup() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "menu": {"reply_markup": {"inline_keyboard": [[{"text": "{{label}}", "callback_data": "x"}]]}}
    })))
    .unwrap();
    let views = ViewsBuilder::<Globals>::new().with_adapter(adapter);
    let ctx = RecordingContext::new();

    views
        .build_render(ctx.as_callback_query(), Arc::new(Globals::default()))
        .render("menu", params(json!({"label": "Next"})))
        .await
        .unwrap();

    assert_eq!(
        ctx.calls(),
        vec![
            RecordedCall::EditReplyMarkup(Some(InlineKeyboardMarkup::new([vec![
                InlineKeyboardButton::callback("Next", "x")
            ]]))),
            RecordedCall::Answer,
        ]
    );
}

/// **Test: An empty definition renders nothing on a message context.**
#[tokio::test]
async fn empty_view_sends_nothing() {
    let adapter: JsonAdapter<Globals> =
        JsonAdapter::new(definitions(json!({"empty": {}}))).unwrap();
    let views = ViewsBuilder::<Globals>::new().with_adapter(adapter);
    let ctx = RecordingContext::new();

    let outcome = views
        .build_render(ctx.as_message(), Arc::new(Globals::default()))
        .render("empty", None)
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert!(ctx.calls().is_empty());
}

/// **Test: Resolving the same key twice yields units with identical output.**
#[tokio::test]
async fn resolution_is_idempotent() {
    let adapter: JsonAdapter<Globals> = JsonAdapter::new(definitions(json!({
        "greet": {"text": "Hello, {{name}}"}
    })))
    .unwrap();

    let first = build(&adapter, "greet", Globals::default(), params(json!({"name": "A"}))).await;
    let second = build(&adapter, "greet", Globals::default(), params(json!({"name": "A"}))).await;
    assert_eq!(first, second);
}
