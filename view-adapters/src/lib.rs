//! # view-adapters
//!
//! Adapters resolving string keys to views:
//!
//! - [`define_adapter`]: views written in code.
//! - [`JsonAdapter`]: declarative JSON views with `{{name}}` interpolation against globals, an optional
//!   custom resolver and call-time params.
//!
//! Plus [`load_json_views`] / [`load_json_views_dir`] to read JSON view maps from disk.

pub mod define;
pub mod fs;
pub mod interpolate;
pub mod json;

pub use define::{define_adapter, DefineAdapter};
pub use fs::{load_json_views, load_json_views_dir};
pub use interpolate::{interpolate, JsonParams, Scope};
pub use json::{
    parse_json_views, JsonAdapter, JsonAdapterBuilder, JsonMedia, JsonMediaDefinition,
    JsonReplyMarkup, JsonViewDefinition, Resolver,
};
