#![cfg(not(target_arch = "wasm32"))]
#![allow(dead_code)]

use reprise_dom::{repeat, Dom, Error, MemoryDom, NodeId, NodeKind, RenderContext, Repeat, RepeatStats, Root, Template, TemplateKind, TemplatePart, TemplateStrings};
use std::rc::Rc;

pub fn init_logging() {
	let _ = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::TRACE)
		.with_test_writer()
		.try_init();
}

/// Treats each template string as a text node, with a node part between consecutive strings.
pub fn text_template(dom: &MemoryDom, strings: TemplateStrings, _: TemplateKind) -> Result<Template<MemoryDom>, Error> {
	let fragment = dom.create_fragment();
	let mut index = 0;
	let mut parts = Vec::new();
	for (i, text) in strings.iter().enumerate() {
		if i > 0 {
			parts.push(TemplatePart::Node { index });
			dom.append_child(fragment, dom.create_marker())?;
			index += 1;
		}
		if !text.is_empty() {
			dom.append_child(fragment, dom.create_text(text))?;
			index += 1;
		}
	}
	Ok(Template::new(fragment, parts))
}

/// `<div class=${0}>${1}</div>`, regardless of the strings.
pub fn div_template(dom: &MemoryDom, _: TemplateStrings, _: TemplateKind) -> Result<Template<MemoryDom>, Error> {
	let fragment = dom.create_fragment();
	let div = dom.create_element("div");
	dom.append_child(fragment, div)?;
	dom.append_child(div, dom.create_marker())?;
	Ok(Template::new(
		fragment,
		vec![
			TemplatePart::Attribute {
				index: 0,
				name: "class".to_string(),
			},
			TemplatePart::Node { index: 1 },
		],
	))
}

/// Items keyed by their number, each rendering that number as text.
pub fn keyed(keys: &[i64]) -> Repeat<MemoryDom> {
	repeat(keys.iter().copied(), |key, _| *key, |key, _| key.to_string())
}

pub struct Fixture {
	pub dom: MemoryDom,
	pub body: NodeId,
	pub root: Root<MemoryDom>,
}

impl Fixture {
	pub fn new() -> Self {
		Self::with_context(|context| context)
	}

	pub fn with_context(configure: impl FnOnce(RenderContext<MemoryDom>) -> RenderContext<MemoryDom>) -> Self {
		init_logging();
		let dom = MemoryDom::new();
		let body = dom.create_element("body");
		let context = Rc::new(configure(RenderContext::new(dom.clone(), text_template)));
		let root = Root::new(context, &body).unwrap();
		Self { dom, body, root }
	}

	pub fn render_keys(&mut self, keys: &[i64]) -> RepeatStats {
		self.root.render(keyed(keys)).unwrap();
		self.root.part().repeat_stats().unwrap()
	}

	/// The first node of each item, in item order.
	pub fn item_nodes(&self) -> Vec<NodeId> {
		self.root
			.part()
			.child_parts()
			.iter()
			.map(|part| self.dom.next_sibling(part.start()).unwrap())
			.collect()
	}

	/// The text nodes in the container, in document order.
	pub fn texts(&self) -> Vec<String> {
		self.dom
			.children(self.body)
			.into_iter()
			.filter_map(|child| match self.dom.kind(child) {
				NodeKind::Text(text) => Some(text),
				_ => None,
			})
			.collect()
	}

	/// Asserts that the container holds exactly the root's markers around its items' ranges, in item order.
	pub fn assert_well_formed(&self) {
		let part = self.root.part();
		let mut expected = vec![*part.start()];
		for item in part.child_parts() {
			let mut node = Some(*item.start());
			while let Some(current) = node {
				expected.push(current);
				if current == *item.end() {
					break;
				}
				node = self.dom.next_sibling(&current);
			}
		}
		expected.push(*part.end());
		assert_eq!(self.dom.children(self.body), expected);
	}
}

pub fn strings(keys: &[i64]) -> Vec<String> {
	keys.iter().map(ToString::to_string).collect()
}
