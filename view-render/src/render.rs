//! Render dispatch: runs a view and turns its draft into send / edit calls on the conversation context.
//!
//! Strategy: `send` unless the context is a callback query (then `edit`), and a forced `send` always wins.
//! A forced `edit` on a message context still sends, since there is nothing to edit. Callback queries are
//! acknowledged exactly once after dispatch, whichever branch ran.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use view_core::{
    caption_last, CallbackQueryContext, ConversationContext, InlineKeyboardMarkup, Media,
    MediaKind, MediaPayload, MessageContext, ReplyMarkup, ResponseView, Result, SentMessage,
};

use crate::view::ViewRender;

/// Delivery mode for a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Always produce a new message.
    Send,
    /// Mutate the message a callback query belongs to.
    Edit,
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Send => f.write_str("send"),
            RenderStrategy::Edit => f.write_str("edit"),
        }
    }
}

/// What a render call produced on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Sent(SentMessage),
    SentGroup(Vec<SentMessage>),
    Edited(SentMessage),
}

/// Picks the strategy for a context. `forced` is the caller's `.send()` / `.edit()` choice.
pub fn select_strategy(
    forced: Option<RenderStrategy>,
    context: &ConversationContext<'_>,
) -> RenderStrategy {
    match (forced, context) {
        (Some(RenderStrategy::Send), _) => RenderStrategy::Send,
        (_, ConversationContext::Message(_)) => RenderStrategy::Send,
        (_, ConversationContext::CallbackQuery(_)) => RenderStrategy::Edit,
    }
}

impl<G, A> ViewRender<G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Runs the view against a fresh draft and realises it on `context`.
    ///
    /// Returns `None` when nothing was sent or edited. Platform failures propagate unchanged; when
    /// dispatch fails the callback query is left unanswered.
    #[instrument(skip(self, context, globals, args), fields(context = context.kind()))]
    pub async fn render_with_context(
        &self,
        context: ConversationContext<'_>,
        globals: Arc<G>,
        args: A,
        strategy: Option<RenderStrategy>,
    ) -> Result<Option<RenderOutcome>> {
        let response = self.build(globals, args).await?;
        let strategy = select_strategy(strategy, &context);
        info!(
            strategy = %strategy,
            has_text = response.get_text().is_some(),
            has_keyboard = response.get_keyboard().is_some(),
            has_media = response.get_media().is_some(),
            "step: render strategy selected"
        );

        let outcome = match (strategy, context) {
            (RenderStrategy::Edit, ConversationContext::CallbackQuery(ctx)) => {
                perform_edit(ctx, response).await?
            }
            (RenderStrategy::Send, ConversationContext::CallbackQuery(ctx)) => {
                perform_send(ctx, response).await?
            }
            (_, ConversationContext::Message(ctx)) => perform_send(ctx, response).await?,
        };

        if let ConversationContext::CallbackQuery(ctx) = context {
            ctx.answer().await?;
            debug!("step: callback query answered");
        }

        Ok(outcome)
    }
}

/// Desired media after normalisation: a one-element group is a single item, an empty group is nothing.
enum DesiredMedia {
    None,
    Single(Media),
    Group(Vec<Media>),
}

impl From<Option<MediaPayload>> for DesiredMedia {
    fn from(media: Option<MediaPayload>) -> Self {
        match media {
            None => DesiredMedia::None,
            Some(MediaPayload::Single(media)) => DesiredMedia::Single(media),
            // A one-element group is edited in place like single media, not deleted and resent.
            Some(MediaPayload::Group(mut group)) => match group.len() {
                0 => DesiredMedia::None,
                1 => DesiredMedia::Single(group.remove(0)),
                _ => DesiredMedia::Group(group),
            },
        }
    }
}

/// Edit calls only accept inline keyboards; any other markup is dropped.
fn inline_only(keyboard: Option<&ReplyMarkup>) -> Option<&InlineKeyboardMarkup> {
    let markup = keyboard?;
    if !markup.is_inline() {
        debug!(shape = markup.shape(), "step: non-inline markup dropped for edit");
    }
    markup.as_inline()
}

async fn perform_send<C>(ctx: &C, response: ResponseView) -> Result<Option<RenderOutcome>>
where
    C: MessageContext + ?Sized,
{
    let (text, keyboard, media) = response.into_parts();

    match DesiredMedia::from(media) {
        DesiredMedia::Group(mut group) => {
            caption_last(&mut group, text.as_deref());
            info!(items = group.len(), "step: send_media_group");
            let sent = ctx.send_media_group(&group).await?;
            Ok(Some(RenderOutcome::SentGroup(sent)))
        }
        DesiredMedia::Single(mut media) => {
            media.caption = text;
            info!(kind = %media.kind, "step: send_media");
            let sent = ctx.send_media(&media, keyboard.as_ref()).await?;
            Ok(Some(RenderOutcome::Sent(sent)))
        }
        DesiredMedia::None => match text {
            Some(text) => {
                info!("step: send_text");
                let sent = ctx.send_text(&text, keyboard.as_ref()).await?;
                Ok(Some(RenderOutcome::Sent(sent)))
            }
            None => {
                debug!("step: nothing to send");
                Ok(None)
            }
        },
    }
}

async fn perform_edit(
    ctx: &dyn CallbackQueryContext,
    response: ResponseView,
) -> Result<Option<RenderOutcome>> {
    if !ctx.has_message() {
        info!("step: edit skipped, callback query has no message");
        return Ok(None);
    }

    let (text, keyboard, media) = response.into_parts();
    let has_current_media = ctx.has_attachment();

    match DesiredMedia::from(media) {
        // Albums cannot be edited in place.
        DesiredMedia::Group(mut group) => {
            caption_last(&mut group, text.as_deref());
            info!(items = group.len(), "step: delete and send_media_group");
            let (deleted, sent) =
                futures::join!(ctx.delete_message(), ctx.send_media_group(&group));
            deleted?;
            Ok(Some(RenderOutcome::SentGroup(sent?)))
        }
        DesiredMedia::Single(media) if !media.kind.is_editable() => {
            let inline = inline_only(keyboard.as_ref());
            match (media.kind, text) {
                (MediaKind::Voice, Some(text)) => {
                    info!("step: edit_caption (voice)");
                    let edited = ctx.edit_caption(&text, inline).await?;
                    Ok(Some(RenderOutcome::Edited(edited)))
                }
                _ if keyboard.is_some() => {
                    info!(kind = %media.kind, "step: edit_reply_markup (file not editable)");
                    let edited = ctx.edit_reply_markup(inline).await?;
                    Ok(Some(RenderOutcome::Edited(edited)))
                }
                _ => {
                    debug!(kind = %media.kind, "step: nothing editable");
                    Ok(None)
                }
            }
        }
        DesiredMedia::Single(mut media) => {
            media.caption = text;
            info!(kind = %media.kind, "step: edit_media");
            let edited = ctx
                .edit_media(&media, inline_only(keyboard.as_ref()))
                .await?;
            Ok(Some(RenderOutcome::Edited(edited)))
        }
        // A media message cannot become a plain text message in place.
        DesiredMedia::None if has_current_media && text.is_some() => {
            let text = text.unwrap_or_default();
            info!("step: delete and send_text");
            let (deleted, sent) = futures::join!(
                ctx.delete_message(),
                ctx.send_text(&text, keyboard.as_ref())
            );
            deleted?;
            Ok(Some(RenderOutcome::Sent(sent?)))
        }
        DesiredMedia::None => match text {
            Some(text) => {
                info!("step: edit_text");
                let edited = ctx.edit_text(&text, inline_only(keyboard.as_ref())).await?;
                Ok(Some(RenderOutcome::Edited(edited)))
            }
            None if keyboard.is_some() => {
                info!("step: edit_reply_markup");
                let edited = ctx.edit_reply_markup(inline_only(keyboard.as_ref())).await?;
                Ok(Some(RenderOutcome::Edited(edited)))
            }
            None => {
                debug!("step: nothing to edit");
                Ok(None)
            }
        },
    }
}
