use crate::{Dom, Error, Template, TemplateKind, TemplateProcessor, TemplateStrings};
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{info, instrument, trace};

/// Joins static strings into the content key. Can't appear in markup.
const CONTENT_KEY_MARKER: &str = "\u{0}reprise-part\u{0}";

/// Identity of a [`TemplateStrings`] slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StringsId {
	address: usize,
	len: usize,
}

impl StringsId {
	fn of(strings: TemplateStrings) -> Self {
		Self {
			address: strings.as_ptr() as usize,
			len: strings.len(),
		}
	}
}

/// Compiled [`Template`]s by the static strings they were compiled from.
///
/// Lookups first go by the address of the strings slice, which is stable for repeated evaluation of the same literal.
/// Equal literals at different sites may or may not share an address, so misses fall back to the strings' joined content.
/// Both paths are filled on a compile, so the next lookup of the same slice takes the fast path.
#[derive(Debug)]
pub struct TemplateCache<D: Dom> {
	by_identity: RefCell<HashMap<(TemplateKind, StringsId), Rc<Template<D>>>>,
	by_content: RefCell<HashMap<(TemplateKind, String), Rc<Template<D>>>>,
}

impl<D: Dom> Default for TemplateCache<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: Dom> TemplateCache<D> {
	#[must_use]
	pub fn new() -> Self {
		Self {
			by_identity: RefCell::default(),
			by_content: RefCell::default(),
		}
	}

	/// Returns the cached template for `strings`, compiling it with `processor` on a miss.
	///
	/// # Errors
	///
	/// Iff compilation fails. Nothing is cached in that case.
	#[instrument(skip(self, dom, processor, strings), fields(strings = strings.len()))]
	pub fn get_or_compile(&self, dom: &D, processor: &dyn TemplateProcessor<D>, kind: TemplateKind, strings: TemplateStrings) -> Result<Rc<Template<D>>, Error> {
		let identity = (kind, StringsId::of(strings));
		if let Some(template) = self.by_identity.borrow().get(&identity) {
			trace!("Hit by identity.");
			return Ok(Rc::clone(template));
		}

		let content = (kind, strings.join(CONTENT_KEY_MARKER));
		let cached = self.by_content.borrow().get(&content).cloned();
		let template = match cached {
			Some(template) => {
				trace!("Hit by content.");
				template
			}
			None => {
				let template = Rc::new(processor.compile(dom, strings, kind)?);
				info!("Compiled a template with {} part(s).", template.parts().len());
				self.by_content.borrow_mut().insert(content, Rc::clone(&template));
				template
			}
		};
		self.by_identity.borrow_mut().insert(identity, Rc::clone(&template));
		Ok(template)
	}

	/// The number of distinct compiled templates.
	#[must_use]
	pub fn len(&self) -> usize {
		self.by_content.borrow().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.by_content.borrow().is_empty()
	}
}
