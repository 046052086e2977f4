use rand::Rng;

use crate::error::{ChainError, Result};

/// Stable handle to a state in the chain's arena.
///
/// A `NodeId` stays valid for the whole lifetime of the chain that issued
/// it; states are never individually removed. Handles from one chain must
/// not be used with another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
	/// Position of the state in first-seen order.
	pub fn index(&self) -> usize {
		self.0
	}
}

/// One weighted outgoing edge of a state.
#[derive(Clone, Copy, Debug)]
pub struct Transition {
	/// The successor state.
	target: NodeId,
	/// How many times this transition was observed. Always >= 1.
	frequency: u64,
}

impl Transition {
	pub fn target(&self) -> NodeId {
		self.target
	}

	pub fn frequency(&self) -> u64 {
		self.frequency
	}
}

/// Represents a state in the chain.
///
/// A `MarkovNode` wraps one distinct token (an owned copy, independent of
/// whatever buffer the token was first read from) and stores all observed
/// transitions from this token to its successors, in first-seen order.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during construction
/// - Sample the next state using weighted random selection
///
/// ## Invariants
/// - At most one transition per distinct target token
/// - Each transition frequency is strictly positive
/// - For non-terminal tokens, `total_count` equals the sum of all
///   transition frequencies; terminal tokens keep an empty transition
///   list while `total_count` still counts their observed occurrences
#[derive(Debug)]
pub struct MarkovNode<T> {
	/// The owned token copy wrapped by this state.
	token: T,
	/// Outgoing transitions in first-seen order.
	transitions: Vec<Transition>,
	/// Number of observed occurrences of this token followed by something.
	total_count: u64,
}

impl<T> MarkovNode<T> {
	/// Creates a new state with no transitions and a zero counter.
	pub(crate) fn new(token: T) -> Self {
		Self {
			token,
			transitions: Vec::new(),
			total_count: 0,
		}
	}

	/// The token wrapped by this state.
	pub fn token(&self) -> &T {
		&self.token
	}

	/// Outgoing transitions in first-seen order.
	pub fn transitions(&self) -> &[Transition] {
		&self.transitions
	}

	/// Number of distinct successors.
	pub fn successor_count(&self) -> usize {
		self.transitions.len()
	}

	/// Number of observed occurrences of this token followed by something.
	pub fn total_count(&self) -> u64 {
		self.total_count
	}

	/// Frequency of the transition toward `target`, if one exists.
	pub fn frequency_of(&self, target: NodeId) -> Option<u64> {
		self.transitions
			.iter()
			.find(|transition| transition.target == target)
			.map(|transition| transition.frequency)
	}

	/// Records an occurrence of the already-known transition at `index`.
	pub(crate) fn bump(&mut self, index: usize) {
		self.transitions[index].frequency += 1;
		self.total_count += 1;
	}

	/// Appends a new transition toward `target` with an initial frequency
	/// of 1, growing the list by one slot.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the slot cannot be obtained;
	/// the state is left untouched in that case.
	pub(crate) fn push_transition(&mut self, target: NodeId) -> Result<()> {
		self.transitions
			.try_reserve(1)
			.map_err(|_| ChainError::Allocation)?;
		self.transitions.push(Transition { target, frequency: 1 });
		self.total_count += 1;
		Ok(())
	}

	/// Records an occurrence without touching the transition list.
	/// Used for terminal tokens, which never grow successors.
	pub(crate) fn count_occurrence(&mut self) {
		self.total_count += 1;
	}

	/// Samples the next state using weighted random selection.
	///
	/// The probability of selecting a successor is proportional to its
	/// transition frequency. Conceptually the transitions form contiguous
	/// frequency-weighted buckets in list order; the draw walks them,
	/// subtracting each frequency in turn, without ever materializing the
	/// expanded bucket list.
	///
	/// Returns `None` if the state has no transitions (terminal token or
	/// dead end).
	pub fn sample_next<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
		if self.transitions.is_empty() {
			return None;
		}
		if self.total_count == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		let mut r = rng.random_range(0..self.total_count);
		for transition in &self.transitions {
			if r < transition.frequency {
				return Some(transition.target);
			}
			r -= transition.frequency;
		}

		// Fallback: should not happen, but kept for safety.
		self.transitions.last().map(|transition| transition.target)
	}
}
