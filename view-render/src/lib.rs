//! # view-render
//!
//! Renderable views and the dispatch engine. A [`ViewRender`] runs its definition against a fresh
//! [`view_core::ResponseView`]; [`ViewRender::render_with_context`] then decides, from the draft and the
//! [`view_core::ConversationContext`], which send / edit / delete calls realise it. [`ViewsBuilder`] is the
//! thin facade handing out per-update renderers, optionally resolving string keys through a [`ViewAdapter`].

pub mod adapter;
pub mod builder;
pub mod render;
pub mod view;

pub use adapter::ViewAdapter;
pub use builder::{AdapterRenderer, AdapterViewsBuilder, Renderer, ViewTarget, ViewsBuilder};
pub use render::{select_strategy, RenderOutcome, RenderStrategy};
pub use view::{ViewContext, ViewDefinition, ViewRender};
