#![doc(html_root_url = "https://docs.rs/reprise-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Template parts and keyed list reconciliation over a DOM-like host tree.
//!
//! Each [`NodePart`] owns the nodes between two empty comment markers.
//! Rendering a [`repeat`] into one moves, updates, creates and removes item ranges in place,
//! so the nodes of an item keep their identity (and with that focus, selection and running transitions) across renders.
//!
//! The host tree is abstracted by [`Dom`]. [`WebDom`] drives the browser, [`MemoryDom`] is a plain in-memory tree.
//!
//! # Logging
//!
//! Reconciliation steps are traced with [`tracing`].
//! Item keys are redacted from all messages unless the `"dangerous-logging"` feature is enabled.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod dom;
mod error;
mod key;
mod part;
pub mod range;
mod render;
mod repeat;
mod scratch;
mod template;
mod template_cache;
mod value;

pub use dom::{Dom, MemoryDom, NodeId, NodeKind, WebDom};
pub use error::Error;
pub use key::Key;
pub use part::{AttributePart, NodePart, Part};
pub use range::{Removal, RemovalEvent};
pub use render::{RenderContext, Root};
pub use repeat::RepeatStats;
pub use template::{html, svg, Template, TemplateInstance, TemplateKind, TemplatePart, TemplateProcessor, TemplateResult, TemplateStrings};
pub use template_cache::TemplateCache;
pub use value::{repeat, repeat_indexed, Repeat, Value};
