//! Code-defined adapter: a fixed map of keys to views.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use view_core::{ResponseView, Result, ViewError};
use view_render::{ViewAdapter, ViewContext, ViewRender};

/// Adapter over views written in code. `resolve` hands out the same shared unit every time.
pub struct DefineAdapter<G, A> {
    views: BTreeMap<String, ViewRender<G, A>>,
}

/// Builds a [`DefineAdapter`] from `(key, view)` pairs; a repeated key replaces the earlier view.
///
/// ```ignore
/// let adapter = define_adapter([
///     ("welcome", ViewRender::from_sync_fn(|ctx, (): ()| { ctx.response.text("Hi"); Ok(()) })),
/// ]);
/// ```
pub fn define_adapter<G, A, K>(
    definitions: impl IntoIterator<Item = (K, ViewRender<G, A>)>,
) -> DefineAdapter<G, A>
where
    K: Into<String>,
{
    DefineAdapter {
        views: definitions
            .into_iter()
            .map(|(key, view)| (key.into(), view))
            .collect(),
    }
}

impl<G, A> DefineAdapter<G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            views: BTreeMap::new(),
        }
    }

    pub fn view(mut self, key: impl Into<String>, view: ViewRender<G, A>) -> Self {
        self.views.insert(key.into(), view);
        self
    }

    /// Registers an async view function.
    pub fn view_fn<F, Fut>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(ViewContext<G>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResponseView>> + Send + 'static,
    {
        self.view(key, ViewRender::from_fn(f))
    }

    /// Registers a synchronous view function.
    pub fn view_sync<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut ViewContext<G>, A) -> Result<()> + Send + Sync + 'static,
    {
        self.view(key, ViewRender::from_sync_fn(f))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<G, A> Default for DefineAdapter<G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, A> ViewAdapter<G, A> for DefineAdapter<G, A>
where
    G: Send + Sync + 'static,
    A: Send + 'static,
{
    fn resolve(&self, key: &str) -> Result<ViewRender<G, A>> {
        self.views
            .get(key)
            .cloned()
            .ok_or_else(|| ViewError::NotFound(key.to_string()))
    }

    fn keys(&self) -> Option<Vec<String>> {
        Some(self.views.keys().cloned().collect())
    }
}

impl<G, A> fmt::Debug for DefineAdapter<G, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefineAdapter")
            .field("keys", &self.views.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_view(text: &'static str) -> ViewRender<(), ()> {
        ViewRender::from_sync_fn(move |ctx: &mut ViewContext<()>, _: ()| {
            ctx.response.text(text);
            Ok(())
        })
    }

    #[test]
    fn test_resolve_returns_shared_unit() {
        let adapter = define_adapter([("welcome", text_view("Hi"))]);
        let first = adapter.resolve("welcome").unwrap();
        let second = adapter.resolve("welcome").unwrap();
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn test_unknown_key() {
        let adapter = define_adapter([("welcome", text_view("Hi"))]);
        let err = adapter.resolve("unknown").unwrap_err();
        assert_eq!(err.to_string(), "View \"unknown\" not found in adapter");
    }

    #[test]
    fn test_keys_sorted() {
        let adapter = DefineAdapter::new()
            .view("b", text_view("b"))
            .view("a", text_view("a"))
            .view_sync("c", |ctx: &mut ViewContext<()>, _: ()| {
                ctx.response.text("c");
                Ok(())
            });
        assert_eq!(adapter.keys().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(adapter.len(), 3);
    }

    #[test]
    fn test_repeated_key_replaces() {
        let adapter = define_adapter([("k", text_view("old")), ("k", text_view("new"))]);
        assert_eq!(adapter.len(), 1);
    }
}
