//! Adapter: resolves string keys to renderable units.

use view_core::Result;

use crate::view::ViewRender;

/// Registry of views addressed by key. Built once, read-only afterwards.
///
/// `resolve` must be deterministic: the same key always yields a unit that behaves the same.
pub trait ViewAdapter<G, A>: Send + Sync {
    /// Returns the view registered under `key`, or [`view_core::ViewError::NotFound`].
    fn resolve(&self, key: &str) -> Result<ViewRender<G, A>>;

    /// Registered keys, for adapters that support enumeration.
    fn keys(&self) -> Option<Vec<String>> {
        None
    }
}
