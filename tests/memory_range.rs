#![cfg(not(target_arch = "wasm32"))]

use reprise_dom::{
	range::{move_range, remove_range, remove_range_with_callback},
	Dom, Error, MemoryDom, NodeId, Removal,
};

fn container_with(dom: &MemoryDom, texts: &[&str]) -> (NodeId, Vec<NodeId>) {
	let container = dom.create_element("ul");
	let children = texts
		.iter()
		.map(|text| {
			let node = if text.is_empty() { dom.create_marker() } else { dom.create_text(text) };
			dom.append_child(container, node).unwrap();
			node
		})
		.collect();
	(container, children)
}

#[test]
fn move_run_before_reference() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["a", "b", "c", "d"]);

	assert_eq!(move_range(&dom, &container, &nodes[2], None, Some(&nodes[0])).unwrap(), 2);
	assert_eq!(dom.text_content(container), "cdab");
}

#[test]
fn move_run_to_end() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["a", "b", "c", "d"]);

	assert_eq!(move_range(&dom, &container, &nodes[0], Some(&nodes[2]), None).unwrap(), 2);
	assert_eq!(dom.text_content(container), "cdab");
}

#[test]
fn empty_runs_do_nothing() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["a", "b"]);

	assert_eq!(move_range(&dom, &container, &nodes[1], Some(&nodes[1]), Some(&nodes[0])).unwrap(), 0);
	assert_eq!(remove_range(&dom, &container, &nodes[0], Some(&nodes[0])).unwrap(), 0);
	assert_eq!(dom.text_content(container), "ab");
}

#[test]
fn remove_run() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["a", "b", "c", "d"]);

	assert_eq!(remove_range(&dom, &container, &nodes[1], Some(&nodes[3])).unwrap(), 2);
	assert_eq!(dom.children(container), vec![nodes[0], nodes[3]]);
	assert_eq!(dom.parent_node(&nodes[1]), None);
}

#[test]
fn callback_can_skip_content_but_not_markers() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["", "a", "b", ""]);
	let mut asked = Vec::new();

	let removed = remove_range_with_callback(&dom, &container, &nodes[0], None, |event| {
		asked.push(*event.target);
		if *event.target == nodes[1] {
			Removal::Skip
		} else {
			Removal::Proceed
		}
	})
	.unwrap();

	assert_eq!(removed, 3);
	assert_eq!(asked, vec![nodes[1], nodes[2]]);
	assert_eq!(dom.children(container), vec![nodes[1]]);
}

#[test]
fn callback_removing_the_next_node_is_an_illegal_mutation() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["a", "b", "c"]);

	let error = remove_range_with_callback(&dom, &container, &nodes[0], None, |event| {
		if let Some(next) = dom.next_sibling(event.target) {
			dom.remove_child(event.container, &next).unwrap();
		}
		Removal::Proceed
	})
	.unwrap_err();

	assert!(matches!(error, Error::IllegalMutation(_)));
}

#[test]
fn removed_nodes_stay_inspectable() {
	let dom = MemoryDom::new();
	let (container, nodes) = container_with(&dom, &["a", "b"]);

	remove_range(&dom, &container, &nodes[0], None).unwrap();

	assert!(dom.children(container).is_empty());
	assert_eq!(dom.parent_node(&nodes[1]), None);
	assert_eq!(dom.text_content(nodes[1]), "b");
}
