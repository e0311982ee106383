//! Keyed list reconciliation.
//!
//! Old and new items are walked from both ends at once. Matching heads and tails are updated in place,
//! an old head that belongs at the new tail (or the reverse) is moved across, and only when none of that applies
//! are key lookups built, once per pass and only over what's left in between.
//! That keeps appends, prepends, removals, swaps and reversals linear without ever hashing a key,
//! at the price of not finding the minimal number of moves for arbitrary shuffles.

use crate::{
	key::loggable,
	range,
	scratch::KeyIndexMaps,
	Dom, Error, Key, NodePart, RenderContext, Value,
};
use core::{iter, mem};
use hashbrown::HashSet;
use std::rc::Rc;
use tracing::{info, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepeatStats {
	/// Parts created for keys that weren't rendered before.
	pub created: usize,
	/// Existing parts that received their item's new value.
	pub updated: usize,
	/// Existing parts whose nodes had to be moved.
	pub moved: usize,
	/// Parts removed for keys that are gone.
	pub removed: usize,
}

/// The item parts and keys of the previous pass, owned by the container part.
#[derive(Debug)]
pub(crate) struct RepeatState<D: Dom> {
	parts: Vec<NodePart<D>>,
	keys: Vec<Key>,
	lookups: KeyIndexMaps,
	last_stats: RepeatStats,
}

impl<D: Dom> Default for RepeatState<D> {
	fn default() -> Self {
		Self {
			parts: Vec::new(),
			keys: Vec::new(),
			lookups: KeyIndexMaps::default(),
			last_stats: RepeatStats::default(),
		}
	}
}

fn update<D: Dom>(part: &mut NodePart<D>, value: Value<D>) -> Result<(), Error> {
	part.set_value(value);
	part.commit()
}

/// Moves `part` before `before`, or before the container's `end` marker. Returns whether anything moved.
fn move_part<D: Dom>(dom: &D, container: &D::Node, part: &NodePart<D>, before: Option<&D::Node>, end: &D::Node) -> Result<bool, Error> {
	let before = before.unwrap_or(end);
	let after_part = dom.next_sibling(part.end());
	if after_part.as_ref() == Some(before) {
		return Ok(false);
	}
	range::move_range(dom, container, part.start(), after_part.as_ref(), Some(before))?;
	Ok(true)
}

fn remove_part<D: Dom>(context: &RenderContext<D>, container: &D::Node, part: &NodePart<D>) -> Result<(), Error> {
	let after_part = context.dom().next_sibling(part.end());
	context.remove_range(container, part.start(), after_part.as_ref()).map(drop)
}

fn start_of<D: Dom>(part: Option<&Option<NodePart<D>>>) -> Option<D::Node> {
	part.and_then(Option::as_ref).map(|part| part.start().clone())
}

impl<D: Dom> RepeatState<D> {
	pub(crate) fn parts(&self) -> &[NodePart<D>] {
		&self.parts
	}

	pub(crate) fn last_stats(&self) -> RepeatStats {
		self.last_stats
	}

	/// Renders `items` between the container's markers, reusing the parts of the previous pass by key.
	///
	/// New parts are inserted before `end`, the container part's end marker, at the latest.
	///
	/// On error, the previous parts are dropped without touching their nodes, and the caller should discard this state.
	#[allow(clippy::too_many_lines)]
	#[instrument(skip(self, context, container, end, items), fields(old = self.keys.len(), new = items.len()))]
	pub(crate) fn reconcile(&mut self, context: &Rc<RenderContext<D>>, container: &D::Node, end: &D::Node, items: Vec<(Key, Value<D>)>) -> Result<RepeatStats, Error> {
		let dom = context.dom();
		let mut stats = RepeatStats::default();

		let (new_keys, mut new_values): (Vec<Key>, Vec<Value<D>>) = items.into_iter().unzip();
		if cfg!(debug_assertions) && STATIC_MAX_LEVEL >= Level::WARN {
			let unique = new_keys.iter().collect::<HashSet<_>>().len();
			if unique != new_keys.len() {
				warn!(
					"{} duplicate key(s) in one pass. Only the first occurrence of a key is matched to an existing item.",
					new_keys.len() - unique
				);
			}
		}

		let mut old_parts: Vec<Option<NodePart<D>>> = mem::take(&mut self.parts).into_iter().map(Some).collect();
		let old_keys = mem::take(&mut self.keys);
		let mut new_parts: Vec<Option<NodePart<D>>> = iter::repeat_with(|| None).take(new_keys.len()).collect();

		// `*_end` are exclusive, so the tails are at `*_end - 1`.
		let mut old_head = 0;
		let mut old_end = old_parts.len();
		let mut new_head = 0;
		let mut new_end = new_keys.len();
		let mut lookups_filled = false;

		while old_head < old_end && new_head < new_end {
			if old_parts[old_head].is_none() {
				old_head += 1;
			} else if old_parts[old_end - 1].is_none() {
				old_end -= 1;
			} else if old_keys[old_head] == new_keys[new_head] {
				let span = trace_span!("Head match", key = %loggable(&new_keys[new_head]));
				let _enter = span.enter();
				if let Some(mut part) = old_parts[old_head].take() {
					update(&mut part, mem::take(&mut new_values[new_head]))?;
					stats.updated += 1;
					new_parts[new_head] = Some(part);
				}
				old_head += 1;
				new_head += 1;
			} else if old_keys[old_end - 1] == new_keys[new_end - 1] {
				let span = trace_span!("Tail match", key = %loggable(&new_keys[new_end - 1]));
				let _enter = span.enter();
				if let Some(mut part) = old_parts[old_end - 1].take() {
					update(&mut part, mem::take(&mut new_values[new_end - 1]))?;
					stats.updated += 1;
					new_parts[new_end - 1] = Some(part);
				}
				old_end -= 1;
				new_end -= 1;
			} else if old_keys[old_head] == new_keys[new_end - 1] {
				let span = trace_span!("Old head to new tail", key = %loggable(&old_keys[old_head]));
				let _enter = span.enter();
				if let Some(mut part) = old_parts[old_head].take() {
					update(&mut part, mem::take(&mut new_values[new_end - 1]))?;
					stats.updated += 1;
					if move_part(dom, container, &part, start_of(new_parts.get(new_end)).as_ref(), end)? {
						stats.moved += 1;
					}
					new_parts[new_end - 1] = Some(part);
				}
				old_head += 1;
				new_end -= 1;
			} else if old_keys[old_end - 1] == new_keys[new_head] {
				let span = trace_span!("Old tail to new head", key = %loggable(&old_keys[old_end - 1]));
				let _enter = span.enter();
				let before = start_of(old_parts.get(old_head));
				if let Some(mut part) = old_parts[old_end - 1].take() {
					update(&mut part, mem::take(&mut new_values[new_head]))?;
					stats.updated += 1;
					if move_part(dom, container, &part, before.as_ref(), end)? {
						stats.moved += 1;
					}
					new_parts[new_head] = Some(part);
				}
				old_end -= 1;
				new_head += 1;
			} else {
				if !lookups_filled {
					let span = trace_span!("Filling key lookups", new = new_end - new_head, old = old_end - old_head);
					let _enter = span.enter();
					let duplicates = self.lookups.fill(&new_keys[new_head..new_end], new_head, &old_keys[old_head..old_end], old_head);
					if duplicates > 0 {
						trace!("Ignored {} duplicate key(s) while filling lookups.", duplicates);
					}
					lookups_filled = true;
				}

				if !self.lookups.has_new(&old_keys[old_head]) {
					let span = trace_span!("Removing old head", key = %loggable(&old_keys[old_head]));
					let _enter = span.enter();
					if let Some(part) = old_parts[old_head].take() {
						remove_part(context, container, &part)?;
						stats.removed += 1;
					}
					old_head += 1;
				} else if !self.lookups.has_new(&old_keys[old_end - 1]) {
					let span = trace_span!("Removing old tail", key = %loggable(&old_keys[old_end - 1]));
					let _enter = span.enter();
					if let Some(part) = old_parts[old_end - 1].take() {
						remove_part(context, container, &part)?;
						stats.removed += 1;
					}
					old_end -= 1;
				} else {
					let span = trace_span!("Placing new head", key = %loggable(&new_keys[new_head]));
					let _enter = span.enter();
					let before = start_of(old_parts.get(old_head));
					let reused = self.lookups.old_index(&new_keys[new_head]).and_then(|index| old_parts[index].take());
					let part = match reused {
						Some(mut part) => {
							update(&mut part, mem::take(&mut new_values[new_head]))?;
							stats.updated += 1;
							if move_part(dom, container, &part, before.as_ref(), end)? {
								stats.moved += 1;
							}
							part
						}
						None => {
							let mut part = NodePart::insert_before(context, container, before.as_ref().unwrap_or(end))?;
							update(&mut part, mem::take(&mut new_values[new_head]))?;
							stats.created += 1;
							part
						}
					};
					new_parts[new_head] = Some(part);
					new_head += 1;
				}
			}
		}

		while new_head < new_end {
			let span = trace_span!("Inserting", key = %loggable(&new_keys[new_head]));
			let _enter = span.enter();
			let before = start_of(new_parts.get(new_end));
			let mut part = NodePart::insert_before(context, container, before.as_ref().unwrap_or(end))?;
			update(&mut part, mem::take(&mut new_values[new_head]))?;
			stats.created += 1;
			new_parts[new_head] = Some(part);
			new_head += 1;
		}

		for part in old_parts[old_head..old_end].iter_mut().filter_map(Option::take) {
			remove_part(context, container, &part)?;
			stats.removed += 1;
		}

		self.parts = new_parts.into_iter().flatten().collect();
		self.keys = new_keys;
		debug_assert_eq!(self.parts.len(), self.keys.len());

		info!(
			"Repeat pass: {} created, {} updated, {} moved, {} removed.",
			stats.created, stats.updated, stats.moved, stats.removed
		);
		info!("Key lookup capacity: {}", self.lookups.capacity());
		self.last_stats = stats;
		Ok(stats)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{MemoryDom, Template, TemplateKind, TemplateStrings};

	fn no_templates(_: &MemoryDom, _: TemplateStrings, _: TemplateKind) -> Result<Template<MemoryDom>, Error> {
		Err(Error::Template("not used".to_string()))
	}

	fn items(keys: &[i64]) -> Vec<(Key, Value<MemoryDom>)> {
		keys.iter().map(|key| (Key::Int(*key), Value::Text(key.to_string()))).collect()
	}

	#[test]
	fn lookups_are_filled_once_per_pass() {
		let dom = MemoryDom::new();
		let body = dom.create_element("body");
		let end = dom.create_marker();
		dom.append_child(body, end).unwrap();
		let context = Rc::new(RenderContext::new(dom.clone(), no_templates));
		let mut state = RepeatState::default();

		state.reconcile(&context, &body, &end, items(&[1, 2, 3, 4, 5, 6, 7, 8])).unwrap();
		assert_eq!(state.lookups.fills, 0);

		// Both the 2 and the 3 get stuck at the front, the 6 is resolved from the ends.
		let stats = state.reconcile(&context, &body, &end, items(&[2, 3, 1, 4, 5, 7, 8, 6])).unwrap();
		assert_eq!(dom.text_content(body), "23145786");
		assert_eq!(state.lookups.fills, 1);
		assert_eq!(
			stats,
			RepeatStats {
				created: 0,
				updated: 8,
				moved: 3,
				removed: 0
			}
		);

		state.reconcile(&context, &body, &end, items(&[3, 1, 2, 8, 7, 6, 5, 4])).unwrap();
		assert_eq!(dom.text_content(body), "31287654");
		assert_eq!(state.lookups.fills, 2);
	}
}
