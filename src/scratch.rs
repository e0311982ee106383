use crate::Key;
use hashbrown::{hash_map::Entry, HashMap};

/// Key-to-index lookups for the non-contiguous part of a reconciliation pass.
///
/// Kept between passes so that the allocation is reused. Filling clears the previous contents first.
#[derive(Debug, Default)]
pub struct KeyIndexMaps {
	new_indices: HashMap<Key, usize>,
	old_indices: HashMap<Key, usize>,
	#[cfg(test)]
	pub(crate) fills: usize,
}

impl KeyIndexMaps {
	/// Indexes `new_keys` and `old_keys`, which start at `new_offset` and `old_offset` in their full sequences.
	///
	/// Only the first occurrence of a duplicate key is recorded. Returns the number of duplicates that were ignored.
	pub fn fill(&mut self, new_keys: &[Key], new_offset: usize, old_keys: &[Key], old_offset: usize) -> usize {
		#[cfg(test)]
		{
			self.fills += 1;
		}

		fn index(map: &mut HashMap<Key, usize>, keys: &[Key], offset: usize) -> usize {
			map.clear();
			let mut duplicates = 0;
			for (i, key) in keys.iter().enumerate() {
				match map.entry(key.clone()) {
					Entry::Occupied(_) => duplicates += 1,
					Entry::Vacant(vacant) => {
						vacant.insert(offset + i);
					}
				}
			}
			duplicates
		}

		index(&mut self.new_indices, new_keys, new_offset) + index(&mut self.old_indices, old_keys, old_offset)
	}

	pub fn has_new(&self, key: &Key) -> bool {
		self.new_indices.contains_key(key)
	}

	pub fn old_index(&self, key: &Key) -> Option<usize> {
		self.old_indices.get(key).copied()
	}

	/// Retrieves the combined capacity without clearing first.
	pub fn capacity(&self) -> usize {
		self.new_indices.capacity() + self.old_indices.capacity()
	}
}
