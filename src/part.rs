//! Binding positions and their two-phase "set value, then commit" protocol.

use crate::{
	range,
	repeat::{RepeatState, RepeatStats},
	Dom, Error, RenderContext, Repeat, TemplateInstance, TemplateResult, Value,
};
use core::mem;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span};

/// What a [`NodePart`] currently renders.
#[derive(Debug)]
enum Content<D: Dom> {
	Nothing,
	Text(String),
	Node(D::Node),
	Template(TemplateInstance<D>),
	List(Vec<NodePart<D>>),
	Repeat(RepeatState<D>),
	Poisoned,
}

/// A binding position in a template instance.
#[derive(Debug)]
pub enum Part<D: Dom> {
	Node(NodePart<D>),
	Attribute(AttributePart<D>),
}

impl<D: Dom> Part<D> {
	pub fn set_value(&mut self, value: Value<D>) {
		match self {
			Part::Node(part) => part.set_value(value),
			Part::Attribute(part) => part.set_value(value),
		}
	}

	/// # Errors
	///
	/// See [`NodePart::commit`] and [`AttributePart::commit`].
	pub fn commit(&mut self) -> Result<(), Error> {
		match self {
			Part::Node(part) => part.commit(),
			Part::Attribute(part) => part.commit(),
		}
	}
}

/// Child content between two markers.
///
/// The part owns every node strictly between `start` and `end`. Both markers stay in place for the part's whole life,
/// unless the part itself is moved or removed as a whole by its container.
#[derive(Debug)]
pub struct NodePart<D: Dom> {
	context: Rc<RenderContext<D>>,
	start: D::Node,
	end: D::Node,
	pending: Option<Value<D>>,
	content: Content<D>,
}

impl<D: Dom> NodePart<D> {
	/// Binds a part to existing markers. `end` must follow `start` in the same parent.
	pub(crate) fn between(context: Rc<RenderContext<D>>, start: D::Node, end: D::Node) -> Self {
		Self {
			context,
			start,
			end,
			pending: None,
			content: Content::Nothing,
		}
	}

	/// Appends a new, empty part to `container`.
	///
	/// # Errors
	///
	/// Iff the host refuses the insertion.
	pub fn append_into(context: Rc<RenderContext<D>>, container: &D::Node) -> Result<Self, Error> {
		let dom = context.dom();
		let start = dom.create_marker();
		let end = dom.create_marker();
		dom.insert_before(container, &start, None)?;
		dom.insert_before(container, &end, None)?;
		Ok(Self::between(context, start, end))
	}

	/// Inserts a new, empty part into `container` right before `before`.
	pub(crate) fn insert_before(context: &Rc<RenderContext<D>>, container: &D::Node, before: &D::Node) -> Result<Self, Error> {
		let dom = context.dom();
		let start = dom.create_marker();
		let end = dom.create_marker();
		dom.insert_before(container, &start, Some(before))?;
		dom.insert_before(container, &end, Some(before))?;
		Ok(Self::between(Rc::clone(context), start, end))
	}

	#[must_use]
	pub fn start(&self) -> &D::Node {
		&self.start
	}

	#[must_use]
	pub fn end(&self) -> &D::Node {
		&self.end
	}

	/// The node containing this part's markers.
	///
	/// # Errors
	///
	/// [`Error::IllegalMutation`] iff the start marker was detached.
	pub fn container(&self) -> Result<D::Node, Error> {
		self.context
			.dom()
			.parent_node(&self.start)
			.ok_or(Error::IllegalMutation("a part's start marker was detached"))
	}

	#[must_use]
	pub fn is_poisoned(&self) -> bool {
		matches!(self.content, Content::Poisoned)
	}

	/// Statistics of the most recent [`repeat`](`crate::repeat()`) pass, if this part currently renders one.
	#[must_use]
	pub fn repeat_stats(&self) -> Option<RepeatStats> {
		match &self.content {
			Content::Repeat(state) => Some(state.last_stats()),
			_ => None,
		}
	}

	/// The item parts of the current [`repeat`](`crate::repeat()`) or [list](`Value::List`), in order.
	#[must_use]
	pub fn child_parts(&self) -> &[NodePart<D>] {
		match &self.content {
			Content::Repeat(state) => state.parts(),
			Content::List(parts) => parts,
			_ => &[],
		}
	}

	/// Stages `value` for the next [`commit`](`NodePart::commit`). Staging twice discards the first value.
	pub fn set_value(&mut self, value: Value<D>) {
		self.pending = Some(value);
	}

	/// Renders the staged value, if any, reusing the current content where possible.
	///
	/// # Errors
	///
	/// [`Error::Poisoned`] if an earlier commit failed, otherwise whatever failed while rendering.
	/// Any error leaves the part poisoned.
	#[instrument(skip(self), fields(pending = ?self.pending.as_ref().map(crate::Value::kind_name)))]
	pub fn commit(&mut self) -> Result<(), Error> {
		let value = match self.pending.take() {
			Some(value) => value,
			None => return Ok(()),
		};
		if self.is_poisoned() {
			return Err(Error::Poisoned);
		}

		let result = match value {
			Value::Nothing => self.clear(),
			Value::Text(text) => self.commit_text(text),
			Value::Node(node) => self.commit_node(node),
			Value::Template(result) => self.commit_template(result),
			Value::List(items) => self.commit_list(items),
			Value::Repeat(repeat) => self.commit_repeat(repeat),
		};
		if let Err(error) = &result {
			error!("Commit failed, poisoning the part: {}", error);
			self.content = Content::Poisoned;
		}
		result
	}

	/// Removes all content between the markers. This also resets a poisoned part.
	///
	/// # Errors
	///
	/// Iff the markers were detached or the host refuses a removal.
	pub fn clear(&mut self) -> Result<(), Error> {
		self.content = Content::Nothing;
		let dom = self.context.dom();
		match dom.next_sibling(&self.start) {
			Some(first) => {
				range::remove_range(dom, &self.container()?, &first, Some(&self.end))?;
				Ok(())
			}
			None => Err(Error::IllegalMutation("a part's end marker was detached")),
		}
	}

	fn insert(&self, node: &D::Node) -> Result<(), Error> {
		self.context.dom().insert_before(&self.container()?, node, Some(&self.end))
	}

	fn commit_text(&mut self, text: String) -> Result<(), Error> {
		if let Content::Text(current) = &self.content {
			if *current == text {
				return Ok(());
			}
		}

		let dom = self.context.dom();
		let only_child = dom
			.next_sibling(&self.start)
			.filter(|first| dom.is_text(first) && dom.next_sibling(first).as_ref() == Some(&self.end));
		match only_child {
			Some(text_node) => {
				trace!("Updating text in place.");
				dom.set_text(&text_node, &text)?;
			}
			None => {
				let text_node = dom.create_text(&text);
				self.clear()?;
				self.insert(&text_node)?;
			}
		}
		self.content = Content::Text(text);
		Ok(())
	}

	fn commit_node(&mut self, node: D::Node) -> Result<(), Error> {
		if let Content::Node(current) = &self.content {
			if *current == node {
				return Ok(());
			}
		}
		self.clear()?;
		self.insert(&node)?;
		self.content = Content::Node(node);
		Ok(())
	}

	fn commit_template(&mut self, result: TemplateResult<D>) -> Result<(), Error> {
		let template = self.context.template(&result)?;
		if let Content::Template(instance) = &mut self.content {
			if Rc::ptr_eq(instance.template(), &template) {
				trace!("Updating template instance.");
				return instance.update(result.into_values());
			}
		}

		let span = trace_span!("Creating template instance");
		let _enter = span.enter();
		let (mut instance, fragment) = TemplateInstance::create(&self.context, template)?;
		instance.update(result.into_values())?;
		self.clear()?;
		self.insert(&fragment)?;
		self.content = Content::Template(instance);
		Ok(())
	}

	/// Reuses item parts by position. There's no reordering here, see [`repeat`](`crate::repeat()`) for that.
	fn commit_list(&mut self, items: Vec<Value<D>>) -> Result<(), Error> {
		let mut parts = match mem::replace(&mut self.content, Content::Nothing) {
			Content::List(parts) => parts,
			_ => {
				self.clear()?;
				Vec::new()
			}
		};

		let container = self.container()?;
		let count = items.len();
		for (index, item) in items.into_iter().enumerate() {
			if index == parts.len() {
				parts.push(Self::insert_before(&self.context, &container, &self.end)?);
			}
			let part = &mut parts[index];
			part.set_value(item);
			part.commit()?;
		}

		if count < parts.len() {
			trace!("Truncating list from {} to {} item(s).", parts.len(), count);
			let first_stale = parts[count].start.clone();
			parts.truncate(count);
			range::remove_range(self.context.dom(), &container, &first_stale, Some(&self.end))?;
		}

		self.content = Content::List(parts);
		Ok(())
	}

	fn commit_repeat(&mut self, repeat: Repeat<D>) -> Result<(), Error> {
		let mut state = match mem::replace(&mut self.content, Content::Nothing) {
			Content::Repeat(state) => state,
			_ => {
				self.clear()?;
				RepeatState::default()
			}
		};
		let container = self.container()?;
		state.reconcile(&self.context, &container, &self.end, repeat.into_items())?;
		self.content = Content::Repeat(state);
		Ok(())
	}
}

/// An attribute of one element. Holds text only.
///
/// A value already present on the element when the part is bound (for example a static one from the template) counts as committed,
/// so committing [`Value::Nothing`] first removes it.
#[derive(Debug)]
pub struct AttributePart<D: Dom> {
	context: Rc<RenderContext<D>>,
	element: D::Node,
	name: String,
	pending: Option<Value<D>>,
	committed: Option<String>,
}

impl<D: Dom> AttributePart<D> {
	#[must_use]
	pub fn new(context: Rc<RenderContext<D>>, element: D::Node, name: String) -> Self {
		let committed = context.dom().get_attribute(&element, &name);
		Self {
			context,
			element,
			name,
			pending: None,
			committed,
		}
	}

	#[must_use]
	pub fn element(&self) -> &D::Node {
		&self.element
	}

	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn set_value(&mut self, value: Value<D>) {
		self.pending = Some(value);
	}

	/// Sets the attribute to staged [`Value::Text`] or removes it for [`Value::Nothing`].
	///
	/// # Errors
	///
	/// [`Error::Usage`] for any other value, or if the host refuses the change.
	#[instrument(skip(self), fields(name = %self.name))]
	pub fn commit(&mut self) -> Result<(), Error> {
		let value = match self.pending.take() {
			Some(value) => value,
			None => return Ok(()),
		};
		let dom = self.context.dom();
		match value {
			Value::Text(text) => {
				if self.committed.as_ref() != Some(&text) {
					dom.set_attribute(&self.element, &self.name, &text)?;
					self.committed = Some(text);
				}
				Ok(())
			}
			Value::Nothing => {
				if self.committed.take().is_some() {
					dom.remove_attribute(&self.element, &self.name)?;
				}
				Ok(())
			}
			other => {
				error!("Can't commit {} into attribute {:?}.", other.kind_name(), self.name);
				Err(Error::Usage(other.kind_name()))
			}
		}
	}
}
