#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use std::collections::HashMap;

mod memory_support_;
use memory_support_::{strings, Fixture};

fn unique(keys: Vec<i64>) -> Vec<i64> {
	let mut seen = std::collections::HashSet::new();
	keys.into_iter().filter(|key| seen.insert(*key)).collect()
}

fn keys() -> impl Strategy<Value = Vec<i64>> {
	prop::collection::vec(0..24_i64, 0..16)
}

proptest! {
	#[test]
	fn renders_new_order_and_keeps_nodes(old in keys().prop_map(unique), new in keys().prop_map(unique)) {
		let mut fixture = Fixture::new();
		fixture.render_keys(&old);
		let before: HashMap<i64, _> = old.iter().copied().zip(fixture.item_nodes()).collect();

		let stats = fixture.render_keys(&new);

		prop_assert_eq!(fixture.texts(), strings(&new));
		fixture.assert_well_formed();
		for (key, node) in new.iter().zip(fixture.item_nodes()) {
			if let Some(old_node) = before.get(key) {
				prop_assert_eq!(*old_node, node);
			}
		}
		let kept = new.iter().filter(|key| before.contains_key(key)).count();
		prop_assert_eq!(stats.updated, kept);
		prop_assert_eq!(stats.created, new.len() - kept);
		prop_assert_eq!(stats.removed, old.len() - kept);
		prop_assert!(stats.moved <= kept);
	}

	#[test]
	fn rerender_changes_nothing(keys in keys().prop_map(unique)) {
		let mut fixture = Fixture::new();
		fixture.render_keys(&keys);
		let markup = fixture.dom.markup(fixture.body);

		let stats = fixture.render_keys(&keys);

		prop_assert_eq!(stats.updated, keys.len());
		prop_assert_eq!((stats.created, stats.moved, stats.removed), (0, 0, 0));
		prop_assert_eq!(fixture.dom.markup(fixture.body), markup);
	}

	#[test]
	fn duplicate_keys_keep_order(old in keys(), new in keys()) {
		let mut fixture = Fixture::new();
		fixture.render_keys(&old);
		fixture.render_keys(&new);

		prop_assert_eq!(fixture.texts(), strings(&new));
		prop_assert_eq!(fixture.root.part().child_parts().len(), new.len());
		fixture.assert_well_formed();
	}
}
