//! The host tree that parts render into.
//!
//! Everything in this crate goes through [`Dom`], so the same reconciler runs against the browser DOM ([`WebDom`])
//! and against an in-memory tree ([`MemoryDom`]).

use crate::Error;
use core::fmt::Debug;

mod memory;
mod web;

pub use memory::{MemoryDom, NodeId, NodeKind};
pub use web::WebDom;

/// Operations on a ***Node*** tree, modelled after the DOM methods of the same names.
///
/// Node handles are cheap to clone and compare by identity.
pub trait Dom: Debug {
	type Node: Clone + Debug + PartialEq;

	/// Creates an empty comment, which serves as zero-width position boundary.
	fn create_marker(&self) -> Self::Node;
	fn create_text(&self, data: &str) -> Self::Node;
	fn create_fragment(&self) -> Self::Node;

	/// Whether `node` is an empty comment.
	fn is_marker(&self, node: &Self::Node) -> bool;
	fn is_text(&self, node: &Self::Node) -> bool;

	/// # Errors
	///
	/// Iff `node` is not a text node.
	fn set_text(&self, node: &Self::Node, data: &str) -> Result<(), Error>;

	fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;
	fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;
	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

	/// Inserts `node` into `parent` before `reference`, or appends it if `reference` is [`None`].
	///
	/// A `node` that is already attached is moved. Inserting a fragment inserts its children instead, emptying it.
	///
	/// # Errors
	///
	/// If `reference` is not a child of `parent` or the host refuses the insertion.
	fn insert_before(&self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>) -> Result<(), Error>;

	/// # Errors
	///
	/// If `node` is not a child of `parent`.
	fn remove_child(&self, parent: &Self::Node, node: &Self::Node) -> Result<(), Error>;

	/// Deeply clones `node` into a new detached tree.
	///
	/// # Errors
	///
	/// If the host can't clone `node`.
	fn clone_deep(&self, node: &Self::Node) -> Result<Self::Node, Error>;

	/// The current value of attribute `name`, or [`None`] if it's absent or `element` is not an element.
	fn get_attribute(&self, element: &Self::Node, name: &str) -> Option<String>;

	/// # Errors
	///
	/// If `element` is not an element or `name` is not a valid attribute name.
	fn set_attribute(&self, element: &Self::Node, name: &str, value: &str) -> Result<(), Error>;

	/// # Errors
	///
	/// If `element` is not an element.
	fn remove_attribute(&self, element: &Self::Node, name: &str) -> Result<(), Error>;
}
