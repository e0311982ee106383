//! Moving and removing runs of sibling nodes.
//!
//! A run starts at `start` (inclusive) and ends right before `end`, or at the last sibling if `end` is [`None`].
//! `start == end` is an empty run. Each traversal reads the next sibling before touching the current node.

use crate::{Dom, Error};
use tracing::{error, trace};

/// What a removal hook decided for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
	/// Remove the node now.
	Proceed,
	/// Leave the node where it is. The hook becomes responsible for removing it later.
	Skip,
}

/// Passed to a removal hook for each non-marker node that is about to be removed.
#[derive(Debug)]
pub struct RemovalEvent<'a, D: Dom> {
	pub target: &'a D::Node,
	pub container: &'a D::Node,
}

/// Moves the run `[start, end)` into `container` before `before`, or to its end if `before` is [`None`].
///
/// # Errors
///
/// Iff the host refuses an insertion. Nodes moved up to that point stay moved.
pub fn move_range<D: Dom>(dom: &D, container: &D::Node, start: &D::Node, end: Option<&D::Node>, before: Option<&D::Node>) -> Result<usize, Error> {
	let mut moved = 0;
	let mut current = Some(start.clone());
	while let Some(node) = current {
		if Some(&node) == end {
			break;
		}
		current = dom.next_sibling(&node);
		dom.insert_before(container, &node, before)?;
		moved += 1;
	}
	trace!("Moved {} node(s).", moved);
	Ok(moved)
}

/// Removes the run `[start, end)` from `container`.
///
/// # Errors
///
/// Iff the host refuses a removal.
pub fn remove_range<D: Dom>(dom: &D, container: &D::Node, start: &D::Node, end: Option<&D::Node>) -> Result<usize, Error> {
	let mut removed = 0;
	let mut current = Some(start.clone());
	while let Some(node) = current {
		if Some(&node) == end {
			break;
		}
		current = dom.next_sibling(&node);
		dom.remove_child(container, &node)?;
		removed += 1;
	}
	trace!("Removed {} node(s).", removed);
	Ok(removed)
}

/// Like [`remove_range`], but asks `on_remove` before removing each node that isn't a marker.
///
/// Markers are always removed.
///
/// # Errors
///
/// [`Error::IllegalMutation`] if a node of the run is no longer a child of `container` when it's reached,
/// which happens if it was removed out of band (for example by `on_remove` itself).
pub fn remove_range_with_callback<D: Dom>(
	dom: &D,
	container: &D::Node,
	start: &D::Node,
	end: Option<&D::Node>,
	mut on_remove: impl FnMut(RemovalEvent<'_, D>) -> Removal,
) -> Result<usize, Error> {
	let mut removed = 0;
	let mut current = Some(start.clone());
	while let Some(node) = current {
		if Some(&node) == end {
			break;
		}
		current = dom.next_sibling(&node);

		if dom.parent_node(&node).as_ref() != Some(container) {
			error!("Node to remove was detached out of band: {:?}", node);
			return Err(Error::IllegalMutation("a node in a removed range is no longer attached to its container"));
		}

		if !dom.is_marker(&node) {
			match on_remove(RemovalEvent { target: &node, container }) {
				Removal::Proceed => (),
				Removal::Skip => {
					trace!("Removal skipped by hook: {:?}", node);
					continue;
				}
			}
		}

		dom.remove_child(container, &node)?;
		removed += 1;
	}
	trace!("Removed {} node(s) with callback.", removed);
	Ok(removed)
}
