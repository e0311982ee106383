use crate::{Dom, Key, TemplateResult};
use core::iter::FromIterator;

/// Anything a [`NodePart`](`crate::NodePart`) can render.
#[derive(Debug)]
pub enum Value<D: Dom> {
	/// Renders no content.
	Nothing,
	/// A single text node.
	Text(String),
	/// A host node, inserted as-is.
	Node(D::Node),
	/// An instance of a template.
	Template(TemplateResult<D>),
	/// Items reused by position only.
	List(Vec<Value<D>>),
	/// Keyed items. See [`repeat`].
	Repeat(Repeat<D>),
}

impl<D: Dom> Default for Value<D> {
	fn default() -> Self {
		Self::Nothing
	}
}

impl<D: Dom> Value<D> {
	/// A short description for error and log messages.
	pub(crate) fn kind_name(&self) -> &'static str {
		match self {
			Value::Nothing => "nothing",
			Value::Text(_) => "text",
			Value::Node(_) => "a node",
			Value::Template(_) => "a template",
			Value::List(_) => "a list",
			Value::Repeat(_) => "`repeat`",
		}
	}
}

impl<D: Dom> From<&str> for Value<D> {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl<D: Dom> From<String> for Value<D> {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl<D: Dom> From<TemplateResult<D>> for Value<D> {
	fn from(result: TemplateResult<D>) -> Self {
		Self::Template(result)
	}
}

impl<D: Dom> From<Repeat<D>> for Value<D> {
	fn from(repeat: Repeat<D>) -> Self {
		Self::Repeat(repeat)
	}
}

impl<D: Dom> From<Vec<Value<D>>> for Value<D> {
	fn from(items: Vec<Value<D>>) -> Self {
		Self::List(items)
	}
}

/// A keyed list of values, reconciled against the previous render of the same part.
///
/// Keys should be unique. Of duplicates, only the first occurrence can be matched to an existing item
/// and later ones are rendered into fresh parts.
#[derive(Debug)]
pub struct Repeat<D: Dom> {
	items: Vec<(Key, Value<D>)>,
}

impl<D: Dom> Repeat<D> {
	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub(crate) fn into_items(self) -> Vec<(Key, Value<D>)> {
		self.items
	}
}

impl<D: Dom> FromIterator<(Key, Value<D>)> for Repeat<D> {
	fn from_iter<T: IntoIterator<Item = (Key, Value<D>)>>(iter: T) -> Self {
		Self { items: iter.into_iter().collect() }
	}
}

/// Renders `items` keyed by `key`, moving existing item content along when items are reordered.
///
/// Both closures receive each item's index and are called eagerly, in order.
pub fn repeat<D, T, K, V>(items: impl IntoIterator<Item = T>, mut key: impl FnMut(&T, usize) -> K, mut template: impl FnMut(T, usize) -> V) -> Repeat<D>
where
	D: Dom,
	K: Into<Key>,
	V: Into<Value<D>>,
{
	items
		.into_iter()
		.enumerate()
		.map(|(index, item)| (key(&item, index).into(), template(item, index).into()))
		.collect()
}

/// Like [`repeat`], but keyed by position.
///
/// Inserting at the front then updates every existing item in place instead of moving it.
pub fn repeat_indexed<D, T, V>(items: impl IntoIterator<Item = T>, mut template: impl FnMut(T, usize) -> V) -> Repeat<D>
where
	D: Dom,
	V: Into<Value<D>>,
{
	items.into_iter().enumerate().map(|(index, item)| (Key::Index(index), template(item, index).into())).collect()
}
