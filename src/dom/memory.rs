use super::Dom;
use crate::Error;
use core::{cell::RefCell, fmt::Write as _};
use std::rc::Rc;

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Element { name: String, attributes: Vec<(String, String)> },
	Text(String),
	Comment(String),
	Fragment,
}

#[derive(Debug, Clone)]
struct NodeData {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// An arena-backed in-memory [`Dom`], meant for tests and small trees.
///
/// Clones are handles to the same tree. Nodes are never freed while any handle is alive,
/// so removed nodes stay inspectable and memory grows with every node ever created.
///
/// Sibling lookups scan the parent's child list, which makes [`Dom::next_sibling`] and [`Dom::insert_before`] linear
/// in the number of siblings and a reconciliation pass quadratic in the number of items.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
	nodes: Rc<RefCell<Vec<NodeData>>>,
}

impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	fn create(&self, kind: NodeKind) -> NodeId {
		let mut nodes = self.nodes.borrow_mut();
		nodes.push(NodeData { kind, parent: None, children: Vec::new() });
		NodeId(nodes.len() - 1)
	}

	#[must_use]
	pub fn create_element(&self, name: &str) -> NodeId {
		self.create(NodeKind::Element { name: name.to_string(), attributes: Vec::new() })
	}

	#[must_use]
	pub fn create_comment(&self, data: &str) -> NodeId {
		self.create(NodeKind::Comment(data.to_string()))
	}

	/// # Errors
	///
	/// See [`Dom::insert_before`].
	pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), Error> {
		self.insert_before(&parent, &child, None)
	}

	#[must_use]
	pub fn kind(&self, node: NodeId) -> NodeKind {
		self.nodes.borrow()[node.0].kind.clone()
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.nodes.borrow()[node.0].children.clone()
	}

	/// Concatenated text of all descendant text nodes, in document order.
	#[must_use]
	pub fn text_content(&self, node: NodeId) -> String {
		let nodes = self.nodes.borrow();
		let mut text = String::new();
		let mut stack = vec![node];
		while let Some(current) = stack.pop() {
			let data = &nodes[current.0];
			if let NodeKind::Text(data) = &data.kind {
				text.push_str(data);
			}
			stack.extend(data.children.iter().rev());
		}
		text
	}

	/// Serializes the children of `node` as HTML-ish markup, with markers shown as `<!---->`.
	#[must_use]
	pub fn markup(&self, node: NodeId) -> String {
		let mut markup = String::new();
		for child in self.children(node) {
			self.write_markup(child, &mut markup);
		}
		markup
	}

	fn write_markup(&self, node: NodeId, markup: &mut String) {
		match self.kind(node) {
			NodeKind::Element { name, attributes } => {
				markup.push('<');
				markup.push_str(&name);
				for (name, value) in attributes {
					let _ = write!(markup, " {}={:?}", name, value);
				}
				markup.push('>');
				for child in self.children(node) {
					self.write_markup(child, markup);
				}
				let _ = write!(markup, "</{}>", name);
			}
			NodeKind::Text(data) => markup.push_str(&data),
			NodeKind::Comment(data) => {
				let _ = write!(markup, "<!--{}-->", data);
			}
			NodeKind::Fragment => {
				for child in self.children(node) {
					self.write_markup(child, markup);
				}
			}
		}
	}

	fn detach(nodes: &mut [NodeData], node: NodeId) {
		if let Some(parent) = nodes[node.0].parent.take() {
			nodes[parent.0].children.retain(|child| *child != node);
		}
	}

	fn is_inclusive_ancestor(nodes: &[NodeData], ancestor: NodeId, mut node: NodeId) -> bool {
		loop {
			if node == ancestor {
				return true;
			}
			match nodes[node.0].parent {
				Some(parent) => node = parent,
				None => return false,
			}
		}
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;

	fn create_marker(&self) -> NodeId {
		self.create_comment("")
	}

	fn create_text(&self, data: &str) -> NodeId {
		self.create(NodeKind::Text(data.to_string()))
	}

	fn create_fragment(&self) -> NodeId {
		self.create(NodeKind::Fragment)
	}

	fn is_marker(&self, node: &NodeId) -> bool {
		matches!(&self.nodes.borrow()[node.0].kind, NodeKind::Comment(data) if data.is_empty())
	}

	fn is_text(&self, node: &NodeId) -> bool {
		matches!(self.nodes.borrow()[node.0].kind, NodeKind::Text(_))
	}

	fn set_text(&self, node: &NodeId, data: &str) -> Result<(), Error> {
		match &mut self.nodes.borrow_mut()[node.0].kind {
			NodeKind::Text(text) => {
				text.clear();
				text.push_str(data);
				Ok(())
			}
			other => Err(Error::Host(format!("Expected text but found {:?}.", other))),
		}
	}

	fn parent_node(&self, node: &NodeId) -> Option<NodeId> {
		self.nodes.borrow()[node.0].parent
	}

	fn first_child(&self, node: &NodeId) -> Option<NodeId> {
		self.nodes.borrow()[node.0].children.first().copied()
	}

	fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
		let nodes = self.nodes.borrow();
		let parent = nodes[node.0].parent?;
		let siblings = &nodes[parent.0].children;
		let index = siblings.iter().position(|sibling| sibling == node)?;
		siblings.get(index + 1).copied()
	}

	fn insert_before(&self, parent: &NodeId, node: &NodeId, reference: Option<&NodeId>) -> Result<(), Error> {
		let mut nodes = self.nodes.borrow_mut();
		if let Some(reference) = reference {
			if nodes[reference.0].parent != Some(*parent) {
				return Err(Error::Host(format!("{:?} is not a child of {:?}.", reference, parent)));
			}
		}
		if Self::is_inclusive_ancestor(&nodes, *node, *parent) {
			return Err(Error::Host(format!("Can't insert {:?} into its own subtree.", node)));
		}

		let moved = if nodes[node.0].kind == NodeKind::Fragment {
			let children = core::mem::take(&mut nodes[node.0].children);
			for child in &children {
				nodes[child.0].parent = None;
			}
			children
		} else {
			vec![*node]
		};

		// Inserting a node before itself means inserting it before its next sibling.
		let mut reference = reference.copied();
		while let Some(current) = reference {
			if !moved.contains(&current) {
				break;
			}
			let siblings = &nodes[parent.0].children;
			reference = siblings.iter().position(|sibling| *sibling == current).and_then(|index| siblings.get(index + 1).copied());
		}

		for child in &moved {
			Self::detach(&mut nodes, *child);
		}
		let index = match reference {
			Some(reference) => nodes[parent.0].children.iter().position(|sibling| *sibling == reference).unwrap_or(0),
			None => nodes[parent.0].children.len(),
		};
		for child in &moved {
			nodes[child.0].parent = Some(*parent);
		}
		let children = &mut nodes[parent.0].children;
		let tail = children.split_off(index);
		children.extend(moved);
		children.extend(tail);
		Ok(())
	}

	fn remove_child(&self, parent: &NodeId, node: &NodeId) -> Result<(), Error> {
		let mut nodes = self.nodes.borrow_mut();
		if nodes[node.0].parent != Some(*parent) {
			return Err(Error::Host(format!("{:?} is not a child of {:?}.", node, parent)));
		}
		Self::detach(&mut nodes, *node);
		Ok(())
	}

	fn clone_deep(&self, node: &NodeId) -> Result<NodeId, Error> {
		let copy = self.create(self.kind(*node));
		for child in self.children(*node) {
			let child_copy = self.clone_deep(&child)?;
			let mut nodes = self.nodes.borrow_mut();
			nodes[child_copy.0].parent = Some(copy);
			nodes[copy.0].children.push(child_copy);
		}
		Ok(copy)
	}

	fn get_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
		match &self.nodes.borrow()[element.0].kind {
			NodeKind::Element { attributes, .. } => attributes.iter().find(|(existing, _)| existing == name).map(|(_, value)| value.clone()),
			_ => None,
		}
	}

	fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), Error> {
		match &mut self.nodes.borrow_mut()[element.0].kind {
			NodeKind::Element { attributes, .. } => {
				match attributes.iter_mut().find(|(existing, _)| existing == name) {
					Some((_, existing)) => *existing = value.to_string(),
					None => attributes.push((name.to_string(), value.to_string())),
				}
				Ok(())
			}
			other => Err(Error::Host(format!("Expected element but found {:?}.", other))),
		}
	}

	fn remove_attribute(&self, element: &NodeId, name: &str) -> Result<(), Error> {
		match &mut self.nodes.borrow_mut()[element.0].kind {
			NodeKind::Element { attributes, .. } => {
				attributes.retain(|(existing, _)| existing != name);
				Ok(())
			}
			other => Err(Error::Host(format!("Expected element but found {:?}.", other))),
		}
	}
}
