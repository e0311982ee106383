use super::Dom;
use crate::Error;
use tracing::{error, instrument};
use wasm_bindgen::{JsCast, JsValue};

/// [`Dom`] over the browser's [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
#[derive(Debug, Clone)]
pub struct WebDom {
	document: web_sys::Document,
}

impl WebDom {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	/// Uses the [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document) of the global [***Window***](https://developer.mozilla.org/en-US/docs/Web/API/Window).
	///
	/// # Errors
	///
	/// Iff there is no global window or it has no document, for example in a worker.
	#[instrument]
	pub fn from_window() -> Result<Self, Error> {
		let window = web_sys::window().ok_or_else(|| Error::Host("No global `Window` found.".to_string()))?;
		let document = window.document().ok_or_else(|| Error::Host("No document found for the global `Window`.".to_string()))?;
		Ok(Self::new(document))
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn host_error(operation: &'static str, error: &JsValue) -> Error {
	let message = match error.dyn_ref::<js_sys::Error>() {
		Some(error) => String::from(error.message()),
		None => format!("{:?}", error),
	};
	error!("{} failed: {}", operation, message);
	Error::Host(message)
}

impl Dom for WebDom {
	type Node = web_sys::Node;

	fn create_marker(&self) -> Self::Node {
		self.document.create_comment("").into()
	}

	fn create_text(&self, data: &str) -> Self::Node {
		self.document.create_text_node(data).into()
	}

	fn create_fragment(&self) -> Self::Node {
		self.document.create_document_fragment().into()
	}

	fn is_marker(&self, node: &Self::Node) -> bool {
		node.dyn_ref::<web_sys::Comment>().map_or(false, |comment| comment.data().is_empty())
	}

	fn is_text(&self, node: &Self::Node) -> bool {
		node.node_type() == web_sys::Node::TEXT_NODE
	}

	fn set_text(&self, node: &Self::Node, data: &str) -> Result<(), Error> {
		match node.dyn_ref::<web_sys::Text>() {
			Some(text) => {
				text.set_data(data);
				Ok(())
			}
			None => Err(Error::Host(format!("Expected `web_sys::Text` but found {:?}.", node))),
		}
	}

	fn parent_node(&self, node: &Self::Node) -> Option<Self::Node> {
		node.parent_node()
	}

	fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
		node.first_child()
	}

	fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node> {
		node.next_sibling()
	}

	fn insert_before(&self, parent: &Self::Node, node: &Self::Node, reference: Option<&Self::Node>) -> Result<(), Error> {
		parent.insert_before(node, reference).map(drop).map_err(|error| host_error("insertBefore", &error))
	}

	fn remove_child(&self, parent: &Self::Node, node: &Self::Node) -> Result<(), Error> {
		parent.remove_child(node).map(drop).map_err(|error| host_error("removeChild", &error))
	}

	fn clone_deep(&self, node: &Self::Node) -> Result<Self::Node, Error> {
		// Unlike `cloneNode`, this upgrades custom elements.
		self.document.import_node_with_deep(node, true).map_err(|error| host_error("importNode", &error))
	}

	fn get_attribute(&self, element: &Self::Node, name: &str) -> Option<String> {
		element.dyn_ref::<web_sys::Element>()?.get_attribute(name)
	}

	fn set_attribute(&self, element: &Self::Node, name: &str, value: &str) -> Result<(), Error> {
		let element = element
			.dyn_ref::<web_sys::Element>()
			.ok_or_else(|| Error::Host(format!("Expected `web_sys::Element` but found {:?}.", element)))?;
		element.set_attribute(name, value).map_err(|error| host_error("setAttribute", &error))
	}

	fn remove_attribute(&self, element: &Self::Node, name: &str) -> Result<(), Error> {
		let element = element
			.dyn_ref::<web_sys::Element>()
			.ok_or_else(|| Error::Host(format!("Expected `web_sys::Element` but found {:?}.", element)))?;
		element.remove_attribute(name).map_err(|error| host_error("removeAttribute", &error))
	}
}
