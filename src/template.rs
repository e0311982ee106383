//! Compiled templates and their instances.
//!
//! Parsing template strings into a fragment is up to a [`TemplateProcessor`].
//! This module only clones the compiled fragment and binds parts to the positions the processor recorded.

use crate::{AttributePart, Dom, Error, NodePart, Part, RenderContext, Value};
use std::rc::Rc;
use tracing::{instrument, trace};

/// The static strings of a template, identified by address for the fast cache path.
pub type TemplateStrings = &'static [&'static str];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
	Html,
	Svg,
}

/// The static strings of a template together with the values for one render.
#[derive(Debug)]
pub struct TemplateResult<D: Dom> {
	strings: TemplateStrings,
	values: Vec<Value<D>>,
	kind: TemplateKind,
}

impl<D: Dom> TemplateResult<D> {
	#[must_use]
	pub fn new(kind: TemplateKind, strings: TemplateStrings, values: Vec<Value<D>>) -> Self {
		Self { strings, values, kind }
	}

	#[must_use]
	pub fn strings(&self) -> TemplateStrings {
		self.strings
	}

	#[must_use]
	pub fn values(&self) -> &[Value<D>] {
		&self.values
	}

	#[must_use]
	pub fn kind(&self) -> TemplateKind {
		self.kind
	}

	pub(crate) fn into_values(self) -> Vec<Value<D>> {
		self.values
	}
}

/// An HTML [`TemplateResult`].
#[must_use]
pub fn html<D: Dom>(strings: TemplateStrings, values: Vec<Value<D>>) -> TemplateResult<D> {
	TemplateResult::new(TemplateKind::Html, strings, values)
}

/// An SVG [`TemplateResult`].
#[must_use]
pub fn svg<D: Dom>(strings: TemplateStrings, values: Vec<Value<D>>) -> TemplateResult<D> {
	TemplateResult::new(TemplateKind::Svg, strings, values)
}

/// Where a template value goes.
///
/// `index` counts the nodes of the template fragment in depth-first pre-order, starting with its first child at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
	/// Child content. The node at `index` must be a marker, which becomes the part's start marker.
	Node { index: usize },
	/// An attribute of the element at `index`.
	Attribute { index: usize, name: String },
}

impl TemplatePart {
	fn index(&self) -> usize {
		match *self {
			TemplatePart::Node { index } | TemplatePart::Attribute { index, .. } => index,
		}
	}
}

/// A compiled template: a prepared fragment and the positions of its parts, one per value.
///
/// Templates are shared by every instance rendered from equivalent strings and can't be changed after creation.
#[derive(Debug)]
pub struct Template<D: Dom> {
	fragment: D::Node,
	parts: Vec<TemplatePart>,
}

impl<D: Dom> Template<D> {
	#[must_use]
	pub fn new(fragment: D::Node, parts: Vec<TemplatePart>) -> Self {
		Self { fragment, parts }
	}

	#[must_use]
	pub fn fragment(&self) -> &D::Node {
		&self.fragment
	}

	#[must_use]
	pub fn parts(&self) -> &[TemplatePart] {
		&self.parts
	}
}

/// Compiles template strings into a [`Template`].
pub trait TemplateProcessor<D: Dom> {
	/// # Errors
	///
	/// If `strings` can't be compiled.
	fn compile(&self, dom: &D, strings: TemplateStrings, kind: TemplateKind) -> Result<Template<D>, Error>;
}

impl<D: Dom, F> TemplateProcessor<D> for F
where
	F: Fn(&D, TemplateStrings, TemplateKind) -> Result<Template<D>, Error>,
{
	fn compile(&self, dom: &D, strings: TemplateStrings, kind: TemplateKind) -> Result<Template<D>, Error> {
		self(dom, strings, kind)
	}
}

/// The live parts of one cloned [`Template`].
#[derive(Debug)]
pub struct TemplateInstance<D: Dom> {
	template: Rc<Template<D>>,
	parts: Vec<Part<D>>,
}

impl<D: Dom> TemplateInstance<D> {
	/// Clones `template`'s fragment and binds parts into the clone.
	///
	/// Returns the instance and the still detached fragment.
	///
	/// # Errors
	///
	/// [`Error::Template`] if a part index is out of range or a node part doesn't point at a marker.
	#[instrument(skip(context, template), fields(parts = template.parts().len()))]
	pub fn create(context: &Rc<RenderContext<D>>, template: Rc<Template<D>>) -> Result<(Self, D::Node), Error> {
		let dom = context.dom();
		let fragment = dom.clone_deep(template.fragment())?;

		let needed = template.parts().iter().map(|part| part.index() + 1).max().unwrap_or(0);
		let nodes = preorder(dom, &fragment, needed);

		let mut parts = Vec::with_capacity(template.parts().len());
		for template_part in template.parts() {
			let index = template_part.index();
			let node = nodes
				.get(index)
				.ok_or_else(|| Error::Template(format!("part index {} is out of range for a fragment of {} node(s)", index, nodes.len())))?;
			parts.push(match template_part {
				TemplatePart::Node { .. } => {
					if !dom.is_marker(node) {
						return Err(Error::Template(format!("node part at index {} doesn't point at a marker", index)));
					}
					let parent = dom.parent_node(node).ok_or_else(|| Error::Template(format!("marker at index {} has no parent", index)))?;
					let end = dom.create_marker();
					dom.insert_before(&parent, &end, dom.next_sibling(node).as_ref())?;
					Part::Node(NodePart::between(Rc::clone(context), node.clone(), end))
				}
				TemplatePart::Attribute { name, .. } => Part::Attribute(AttributePart::new(Rc::clone(context), node.clone(), name.clone())),
			});
		}
		trace!("Bound {} part(s).", parts.len());

		Ok((Self { template, parts }, fragment))
	}

	#[must_use]
	pub fn template(&self) -> &Rc<Template<D>> {
		&self.template
	}

	#[must_use]
	pub fn parts(&self) -> &[Part<D>] {
		&self.parts
	}

	/// Stages one value per part, then commits them all in order.
	///
	/// # Errors
	///
	/// [`Error::Template`] if the number of values doesn't match the number of parts,
	/// otherwise the first error of any part's commit.
	pub fn update(&mut self, values: Vec<Value<D>>) -> Result<(), Error> {
		if values.len() != self.parts.len() {
			return Err(Error::Template(format!("expected {} value(s) but got {}", self.parts.len(), values.len())));
		}
		for (part, value) in self.parts.iter_mut().zip(values) {
			part.set_value(value);
		}
		for part in &mut self.parts {
			part.commit()?;
		}
		Ok(())
	}
}

/// The first `limit` descendants of `root` in depth-first pre-order.
fn preorder<D: Dom>(dom: &D, root: &D::Node, limit: usize) -> Vec<D::Node> {
	let mut nodes = Vec::with_capacity(limit);
	let mut pending_siblings = Vec::new();
	let mut current = dom.first_child(root);
	while let Some(node) = current {
		if nodes.len() == limit {
			break;
		}
		current = match dom.first_child(&node) {
			Some(child) => {
				if let Some(sibling) = dom.next_sibling(&node) {
					pending_siblings.push(sibling);
				}
				Some(child)
			}
			None => dom.next_sibling(&node).or_else(|| pending_siblings.pop()),
		};
		nodes.push(node);
	}
	nodes
}
