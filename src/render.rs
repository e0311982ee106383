//! Shared rendering state and the entry point for rendering into a container.

use crate::{
	range::{self, Removal, RemovalEvent},
	Dom, Error, NodePart, Template, TemplateCache, TemplateProcessor, TemplateResult, Value,
};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::{info, instrument};

type RemovalHook<D> = Box<dyn Fn(RemovalEvent<'_, D>) -> Removal>;

/// What every part of one render tree shares: the host tree, compiled templates and an optional removal hook.
pub struct RenderContext<D: Dom> {
	dom: D,
	templates: TemplateCache<D>,
	processor: Box<dyn TemplateProcessor<D>>,
	removal_hook: Option<RemovalHook<D>>,
}

impl<D: Dom> Debug for RenderContext<D> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderContext")
			.field("dom", &self.dom)
			.field("templates", &self.templates.len())
			.field("removal_hook", &self.removal_hook.is_some())
			.finish()
	}
}

impl<D: Dom> RenderContext<D> {
	#[must_use]
	pub fn new(dom: D, processor: impl TemplateProcessor<D> + 'static) -> Self {
		Self {
			dom,
			templates: TemplateCache::new(),
			processor: Box::new(processor),
			removal_hook: None,
		}
	}

	/// Consults `hook` before removing any non-marker node of a removed [`repeat`](`crate::repeat()`) item.
	///
	/// A hook that returns [`Removal::Skip`] takes over that node and must remove it itself eventually,
	/// for example after an exit animation. It must not remove anything synchronously.
	#[must_use]
	pub fn with_removal_hook(mut self, hook: impl Fn(RemovalEvent<'_, D>) -> Removal + 'static) -> Self {
		self.removal_hook = Some(Box::new(hook));
		self
	}

	#[must_use]
	pub fn dom(&self) -> &D {
		&self.dom
	}

	#[must_use]
	pub fn templates(&self) -> &TemplateCache<D> {
		&self.templates
	}

	pub(crate) fn template(&self, result: &TemplateResult<D>) -> Result<Rc<Template<D>>, Error> {
		self.templates.get_or_compile(&self.dom, &*self.processor, result.kind(), result.strings())
	}

	/// Removes `[start, end)` from `container`, through the removal hook if there is one.
	pub(crate) fn remove_range(&self, container: &D::Node, start: &D::Node, end: Option<&D::Node>) -> Result<usize, Error> {
		match &self.removal_hook {
			Some(hook) => range::remove_range_with_callback(&self.dom, container, start, end, |event| hook(event)),
			None => range::remove_range(&self.dom, container, start, end),
		}
	}
}

/// A value rendered into a container, after any existing children.
#[derive(Debug)]
pub struct Root<D: Dom> {
	part: NodePart<D>,
}

impl<D: Dom> Root<D> {
	/// Appends the root's markers to `container`.
	///
	/// # Errors
	///
	/// Iff the host refuses the insertion.
	#[instrument(skip(context, container))]
	pub fn new(context: Rc<RenderContext<D>>, container: &D::Node) -> Result<Self, Error> {
		let part = NodePart::append_into(context, container)?;
		info!("Created render root.");
		Ok(Self { part })
	}

	/// Renders `value`, reusing what was rendered before wherever possible.
	///
	/// # Errors
	///
	/// Whatever failed while committing. The root is poisoned afterwards and must be [cleared](`Root::clear`) before reuse.
	pub fn render(&mut self, value: impl Into<Value<D>>) -> Result<(), Error> {
		self.part.set_value(value.into());
		self.part.commit()
	}

	/// Removes everything rendered so far and clears a poisoned state.
	///
	/// # Errors
	///
	/// Iff the root's markers were detached or the host refuses a removal.
	pub fn clear(&mut self) -> Result<(), Error> {
		self.part.clear()
	}

	#[must_use]
	pub fn part(&self) -> &NodePart<D> {
		&self.part
	}
}
