//! Error types for chain construction and generation.

use thiserror::Error;

/// Main error type for chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// A token copy or a transition-list growth could not obtain memory.
	/// The chain is left valid and destroyable; construction should abort.
	#[error("allocation failure: failed to allocate new memory")]
	Allocation,

	/// No state in the store has any outgoing transition, so there is
	/// nothing to start a random walk from.
	#[error("no state with outgoing transitions to start from")]
	NoStartCandidate,

	/// The emission sink failed during generation.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
