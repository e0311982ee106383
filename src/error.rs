use thiserror::Error;

/// Everything that can go wrong while committing values into parts.
///
/// None of these are retried. An error that escapes a commit midway leaves the affected [`NodePart`](`crate::NodePart`) [poisoned](`Error::Poisoned`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// A value was committed into a binding position that can't hold it,
	/// for example a [`repeat`](`crate::repeat()`) into an attribute.
	#[error("{0} can only be used for list/child content")]
	Usage(&'static str),

	/// The managed region was changed behind this crate's back.
	#[error("illegal mutation: {0}")]
	IllegalMutation(&'static str),

	/// A compiled template doesn't fit its result or its own fragment.
	#[error("malformed template: {0}")]
	Template(String),

	/// The host tree rejected an operation.
	#[error("host DOM operation failed: {0}")]
	Host(String),

	/// A previous commit into this part failed.
	#[error("the part is poisoned by an earlier failed commit; clear it before reuse")]
	Poisoned,
}
