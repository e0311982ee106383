use core::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Identifies one item of a [`repeat`](`crate::repeat()`) across renders.
///
/// Keys compare by exact value. [`Key::Index`] is what [`repeat_indexed`](`crate::repeat_indexed`) assigns and never equals an [`Key::Int`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Index(usize),
	Int(i64),
	Str(Rc<str>),
}

impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Key {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<u32> for Key {
	fn from(value: u32) -> Self {
		Self::Int(value.into())
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Self::Str(value.into())
	}
}

impl From<String> for Key {
	fn from(value: String) -> Self {
		Self::Str(value.into())
	}
}

impl From<Rc<str>> for Key {
	fn from(value: Rc<str>) -> Self {
		Self::Str(value)
	}
}

impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Key::Index(index) => write!(f, "#{}", index),
			Key::Int(value) => write!(f, "{}", value),
			Key::Str(value) => write!(f, "{:?}", value),
		}
	}
}

/// Keys can carry personal data, so they're only logged with the `dangerous-logging` feature.
pub(crate) fn loggable(key: &Key) -> &dyn Display {
	if cfg!(feature = "dangerous-logging") {
		key
	} else {
		&"<key>"
	}
}
