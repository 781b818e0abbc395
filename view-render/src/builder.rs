//! Builder facade: binds globals (and optionally an adapter) to a context and hands out `render`.
//!
//! ```ignore
//! let views = ViewsBuilder::<Globals>::new();
//! let greet = views.render_sync(|ctx, name: String| {
//!     ctx.response.text(format!("Hello, {name}"));
//!     Ok(())
//! });
//! let render = views.build_render(context, globals);
//! render.render(&greet, "Ann".into()).await?;
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;
use view_core::{ConversationContext, ResponseView, Result};

use crate::adapter::ViewAdapter;
use crate::render::{RenderOutcome, RenderStrategy};
use crate::view::{ViewContext, ViewRender};

/// Entry point: creates views and per-update renderers for globals of type `G`.
pub struct ViewsBuilder<G> {
    _globals: PhantomData<fn() -> G>,
}

impl<G> ViewsBuilder<G>
where
    G: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            _globals: PhantomData,
        }
    }

    /// Defines an async view.
    pub fn render<A, F, Fut>(&self, f: F) -> ViewRender<G, A>
    where
        A: Send + 'static,
        F: Fn(ViewContext<G>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseView>> + Send + 'static,
    {
        ViewRender::from_fn(f)
    }

    /// Defines a synchronous view.
    pub fn render_sync<A, F>(&self, f: F) -> ViewRender<G, A>
    where
        A: Send + 'static,
        F: Fn(&mut ViewContext<G>, A) -> Result<()> + Send + Sync + 'static,
    {
        ViewRender::from_sync_fn(f)
    }

    /// Binds a context and globals for one incoming update.
    pub fn build_render<'a>(
        &self,
        context: ConversationContext<'a>,
        globals: Arc<G>,
    ) -> Renderer<'a, G> {
        Renderer { context, globals }
    }

    /// Attaches an adapter so renderers also accept string keys.
    pub fn with_adapter<A, V>(self, adapter: V) -> AdapterViewsBuilder<G, A>
    where
        V: ViewAdapter<G, A> + 'static,
    {
        AdapterViewsBuilder {
            source: AdapterSource::Shared(Arc::new(adapter)),
        }
    }

    /// Attaches an adapter chosen per update from the globals (e.g. one adapter per locale).
    pub fn with_adapter_factory<A, F>(self, factory: F) -> AdapterViewsBuilder<G, A>
    where
        F: Fn(&G) -> Arc<dyn ViewAdapter<G, A>> + Send + Sync + 'static,
    {
        AdapterViewsBuilder {
            source: AdapterSource::Factory(Arc::new(factory)),
        }
    }
}

impl<G> Default for ViewsBuilder<G>
where
    G: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// `render` bound to one context and one globals value.
pub struct Renderer<'a, G> {
    context: ConversationContext<'a>,
    globals: Arc<G>,
}

impl<'a, G> Renderer<'a, G>
where
    G: Send + Sync + 'static,
{
    /// Renders with the strategy picked from the context.
    pub async fn render<A: Send + 'static>(
        &self,
        view: &ViewRender<G, A>,
        args: A,
    ) -> Result<Option<RenderOutcome>> {
        self.dispatch(view, args, None).await
    }

    /// Always sends a new message.
    pub async fn send<A: Send + 'static>(
        &self,
        view: &ViewRender<G, A>,
        args: A,
    ) -> Result<Option<RenderOutcome>> {
        self.dispatch(view, args, Some(RenderStrategy::Send)).await
    }

    /// Edits in place; sends when the context cannot edit.
    pub async fn edit<A: Send + 'static>(
        &self,
        view: &ViewRender<G, A>,
        args: A,
    ) -> Result<Option<RenderOutcome>> {
        self.dispatch(view, args, Some(RenderStrategy::Edit)).await
    }

    pub fn context(&self) -> ConversationContext<'a> {
        self.context
    }

    pub fn globals(&self) -> &Arc<G> {
        &self.globals
    }

    async fn dispatch<A: Send + 'static>(
        &self,
        view: &ViewRender<G, A>,
        args: A,
        strategy: Option<RenderStrategy>,
    ) -> Result<Option<RenderOutcome>> {
        view.render_with_context(self.context, self.globals.clone(), args, strategy)
            .await
    }
}

type AdapterFactory<G, A> = dyn Fn(&G) -> Arc<dyn ViewAdapter<G, A>> + Send + Sync;

enum AdapterSource<G, A> {
    Shared(Arc<dyn ViewAdapter<G, A>>),
    Factory(Arc<AdapterFactory<G, A>>),
}

impl<G, A> Clone for AdapterSource<G, A> {
    fn clone(&self) -> Self {
        match self {
            AdapterSource::Shared(adapter) => AdapterSource::Shared(adapter.clone()),
            AdapterSource::Factory(factory) => AdapterSource::Factory(factory.clone()),
        }
    }
}

/// [`ViewsBuilder`] with an adapter attached.
pub struct AdapterViewsBuilder<G, A> {
    source: AdapterSource<G, A>,
}

impl<G, A> Clone for AdapterViewsBuilder<G, A> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<G, A> AdapterViewsBuilder<G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Defines an async view outside the adapter.
    pub fn render<B, F, Fut>(&self, f: F) -> ViewRender<G, B>
    where
        B: Send + 'static,
        F: Fn(ViewContext<G>, B) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseView>> + Send + 'static,
    {
        ViewRender::from_fn(f)
    }

    /// Defines a synchronous view outside the adapter.
    pub fn render_sync<B, F>(&self, f: F) -> ViewRender<G, B>
    where
        B: Send + 'static,
        F: Fn(&mut ViewContext<G>, B) -> Result<()> + Send + Sync + 'static,
    {
        ViewRender::from_sync_fn(f)
    }

    /// The adapter used for `globals`.
    pub fn adapter(&self, globals: &G) -> Arc<dyn ViewAdapter<G, A>> {
        match &self.source {
            AdapterSource::Shared(adapter) => adapter.clone(),
            AdapterSource::Factory(factory) => (factory.as_ref())(globals),
        }
    }

    pub fn build_render<'a>(
        &self,
        context: ConversationContext<'a>,
        globals: Arc<G>,
    ) -> AdapterRenderer<'a, G, A> {
        let adapter = self.adapter(&globals);
        AdapterRenderer {
            views: Renderer { context, globals },
            adapter,
        }
    }
}

/// What to render: a view value or an adapter key.
pub enum ViewTarget<'t, G, A> {
    View(&'t ViewRender<G, A>),
    Key(&'t str),
}

impl<'t, G, A> From<&'t ViewRender<G, A>> for ViewTarget<'t, G, A> {
    fn from(view: &'t ViewRender<G, A>) -> Self {
        ViewTarget::View(view)
    }
}

impl<'t, G, A> From<&'t str> for ViewTarget<'t, G, A> {
    fn from(key: &'t str) -> Self {
        ViewTarget::Key(key)
    }
}

impl<'t, G, A> From<&'t String> for ViewTarget<'t, G, A> {
    fn from(key: &'t String) -> Self {
        ViewTarget::Key(key.as_str())
    }
}

/// Renderer that also resolves string keys through an adapter.
pub struct AdapterRenderer<'a, G, A> {
    views: Renderer<'a, G>,
    adapter: Arc<dyn ViewAdapter<G, A>>,
}

impl<'a, G, A> AdapterRenderer<'a, G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    pub async fn render<'t>(
        &self,
        target: impl Into<ViewTarget<'t, G, A>>,
        args: A,
    ) -> Result<Option<RenderOutcome>> {
        self.dispatch(target.into(), args, None).await
    }

    pub async fn send<'t>(
        &self,
        target: impl Into<ViewTarget<'t, G, A>>,
        args: A,
    ) -> Result<Option<RenderOutcome>> {
        self.dispatch(target.into(), args, Some(RenderStrategy::Send))
            .await
    }

    pub async fn edit<'t>(
        &self,
        target: impl Into<ViewTarget<'t, G, A>>,
        args: A,
    ) -> Result<Option<RenderOutcome>> {
        self.dispatch(target.into(), args, Some(RenderStrategy::Edit))
            .await
    }

    /// Plain renderer for views whose argument type differs from the adapter's.
    pub fn views(&self) -> &Renderer<'a, G> {
        &self.views
    }

    pub fn adapter(&self) -> &Arc<dyn ViewAdapter<G, A>> {
        &self.adapter
    }

    async fn dispatch(
        &self,
        target: ViewTarget<'_, G, A>,
        args: A,
        strategy: Option<RenderStrategy>,
    ) -> Result<Option<RenderOutcome>> {
        match target {
            ViewTarget::View(view) => self.views.dispatch(view, args, strategy).await,
            ViewTarget::Key(key) => {
                debug!(key = %key, "step: resolving view key");
                let view = self.adapter.resolve(key)?;
                self.views.dispatch(&view, args, strategy).await
            }
        }
    }
}
