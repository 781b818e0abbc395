//! View definitions and the renderable unit wrapping them.

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use view_core::{ResponseView, Result};

/// What a view sees while it runs: the shared globals plus the fresh draft it fills.
///
/// Derefs to the globals, so `ctx.locale` reads a field of `G` directly.
pub struct ViewContext<G> {
    globals: Arc<G>,
    pub response: ResponseView,
}

impl<G> ViewContext<G> {
    pub fn new(globals: Arc<G>) -> Self {
        Self {
            globals,
            response: ResponseView::new(),
        }
    }

    pub fn globals(&self) -> &G {
        &self.globals
    }

    /// Shared handle to the globals, for moving into spawned work.
    pub fn globals_arc(&self) -> Arc<G> {
        self.globals.clone()
    }

    pub fn into_response(self) -> ResponseView {
        self.response
    }
}

impl<G> Deref for ViewContext<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.globals
    }
}

/// Populates a draft from globals and per-call arguments. May suspend (e.g. to fetch data first).
#[async_trait]
pub trait ViewDefinition<G, A>: Send + Sync {
    async fn render(&self, ctx: ViewContext<G>, args: A) -> Result<ResponseView>;
}

#[async_trait]
impl<G, A, F, Fut> ViewDefinition<G, A> for F
where
    G: Send + Sync + 'static,
    A: Send + 'static,
    F: Fn(ViewContext<G>, A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseView>> + Send + 'static,
{
    async fn render(&self, ctx: ViewContext<G>, args: A) -> Result<ResponseView> {
        (self)(ctx, args).await
    }
}

/// Adapts a synchronous `Fn(&mut ViewContext<G>, A) -> Result<()>` into a [`ViewDefinition`].
struct SyncView<F>(F);

#[async_trait]
impl<G, A, F> ViewDefinition<G, A> for SyncView<F>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
    F: Fn(&mut ViewContext<G>, A) -> Result<()> + Send + Sync,
{
    async fn render(&self, mut ctx: ViewContext<G>, args: A) -> Result<ResponseView> {
        (self.0)(&mut ctx, args)?;
        Ok(ctx.into_response())
    }
}

/// Renderable unit: a stateless, shareable view. Every call builds its own draft.
pub struct ViewRender<G, A> {
    definition: Arc<dyn ViewDefinition<G, A>>,
}

impl<G, A> Clone for ViewRender<G, A> {
    fn clone(&self) -> Self {
        Self {
            definition: self.definition.clone(),
        }
    }
}

impl<G, A> ViewRender<G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Wraps an async view function.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(ViewContext<G>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseView>> + Send + 'static,
    {
        Self::from_definition(f)
    }

    /// Wraps a synchronous view function that fills the draft in place.
    pub fn from_sync_fn<F>(f: F) -> Self
    where
        F: Fn(&mut ViewContext<G>, A) -> Result<()> + Send + Sync + 'static,
    {
        Self::from_definition(SyncView(f))
    }

    pub fn from_definition(definition: impl ViewDefinition<G, A> + 'static) -> Self {
        Self {
            definition: Arc::new(definition),
        }
    }

    /// Runs the view against a fresh draft and returns it, without dispatching anything.
    pub async fn build(&self, globals: Arc<G>, args: A) -> Result<ResponseView> {
        self.definition.render(ViewContext::new(globals), args).await
    }
}

impl<G, A> ViewRender<G, A> {
    /// True when both handles wrap the same view definition.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl<G, A> std::fmt::Debug for ViewRender<G, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRender").finish_non_exhaustive()
    }
}
