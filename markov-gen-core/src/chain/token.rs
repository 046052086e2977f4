use std::io;

use crate::error::Result;

/// Capability set required from a token domain.
///
/// The chain is polymorphic over any token type implementing this trait and
/// never looks inside a token itself. Note that equality goes through
/// `matches` (value comparison), never through identity or addresses.
///
/// ## Responsibilities
/// - Decide equality between two tokens (store lookup, transition matching)
/// - Produce independent owned copies for the chain to store
/// - Write one token to an output sink during generation
/// - Flag terminal tokens, which never receive outgoing transitions
///
/// Releasing a stored copy is not part of the trait: the chain owns its
/// copies and drops them when it is itself dropped.
pub trait Token: Sized {
	/// Equality test used for store lookup and transition matching.
	fn matches(&self, other: &Self) -> bool;

	/// Deep, independent duplication of the token.
	///
	/// The chain stores the returned copy for its whole lifetime; later
	/// mutation or destruction of `self` must not affect it.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the copy cannot be produced.
	fn duplicate(&self) -> Result<Self>;

	/// Writes this token to `out`.
	///
	/// The token domain owns the formatting (separators included); the
	/// chain only sequences the calls.
	fn emit(&self, out: &mut dyn io::Write) -> io::Result<()>;

	/// True if this token ends a unit and must never have successors.
	fn is_terminal(&self) -> bool;
}
