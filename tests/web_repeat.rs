#![cfg(target_arch = "wasm32")]

use reprise_dom::{repeat, Dom, Error, Removal, RemovalEvent, RenderContext, Repeat, RepeatStats, Root, Template, TemplateKind, TemplatePart, TemplateStrings, WebDom};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlBodyElement;

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn init_logging() {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
}

fn text_template(dom: &WebDom, strings: TemplateStrings, _: TemplateKind) -> Result<Template<WebDom>, Error> {
	let fragment = dom.create_fragment();
	let mut index = 0;
	let mut parts = Vec::new();
	for (i, text) in strings.iter().enumerate() {
		if i > 0 {
			parts.push(TemplatePart::Node { index });
			dom.insert_before(&fragment, &dom.create_marker(), None)?;
			index += 1;
		}
		if !text.is_empty() {
			dom.insert_before(&fragment, &dom.create_text(text), None)?;
			index += 1;
		}
	}
	Ok(Template::new(fragment, parts))
}

fn keyed(keys: &[i64]) -> Repeat<WebDom> {
	repeat(keys.iter().copied(), |key, _| *key, |key, _| key.to_string())
}

fn container() -> (WebDom, web_sys::Node) {
	let dom = WebDom::from_window().unwrap();
	let body = dom.document().body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let container: web_sys::Node = dom.document().create_element("div").unwrap().into();
	body.append_child(&container).unwrap();
	(dom, container)
}

fn item_nodes(root: &Root<WebDom>, dom: &WebDom) -> Vec<web_sys::Node> {
	root.part().child_parts().iter().map(|part| dom.next_sibling(part.start()).unwrap()).collect()
}

#[wasm_bindgen_test]
fn reorder_keeps_nodes() {
	init_logging();
	let (dom, container) = container();
	let mut root = Root::new(Rc::new(RenderContext::new(dom.clone(), text_template)), &container).unwrap();

	root.render(keyed(&[1, 2, 3, 4])).unwrap();
	assert_eq!(container.text_content().unwrap(), "1234");
	let before = item_nodes(&root, &dom);

	root.render(keyed(&[4, 3, 2, 1])).unwrap();
	assert_eq!(container.text_content().unwrap(), "4321");
	assert_eq!(
		root.part().repeat_stats(),
		Some(RepeatStats {
			created: 0,
			updated: 4,
			moved: 3,
			removed: 0
		})
	);
	let after = item_nodes(&root, &dom);
	assert_eq!(after, before.into_iter().rev().collect::<Vec<_>>());
}

#[wasm_bindgen_test]
fn insert_and_remove() {
	init_logging();
	let (dom, container) = container();
	let mut root = Root::new(Rc::new(RenderContext::new(dom.clone(), text_template)), &container).unwrap();

	root.render(keyed(&[1, 2, 3])).unwrap();
	root.render(keyed(&[4, 2, 5])).unwrap();

	assert_eq!(container.text_content().unwrap(), "425");
	assert_eq!(
		root.part().repeat_stats(),
		Some(RepeatStats {
			created: 2,
			updated: 1,
			moved: 0,
			removed: 2
		})
	);
}

#[wasm_bindgen_test]
fn removal_hook_defers_removal() {
	init_logging();
	let (dom, container) = container();
	let deferred = Rc::new(RefCell::new(Vec::new()));
	let context = RenderContext::new(dom.clone(), text_template).with_removal_hook({
		let deferred = Rc::clone(&deferred);
		move |event: RemovalEvent<'_, WebDom>| {
			deferred.borrow_mut().push(event.target.clone());
			Removal::Skip
		}
	});
	let mut root = Root::new(Rc::new(context), &container).unwrap();

	root.render(keyed(&[1, 2, 3])).unwrap();
	root.render(keyed(&[1, 3])).unwrap();
	assert_eq!(container.text_content().unwrap(), "123");

	for node in deferred.borrow_mut().drain(..) {
		container.remove_child(&node).unwrap();
	}
	assert_eq!(container.text_content().unwrap(), "13");
}
