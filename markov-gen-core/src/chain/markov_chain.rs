use std::io;

use rand::Rng;
use tracing::{debug, trace};

use crate::chain::node::{MarkovNode, NodeId, Transition};
use crate::chain::token::Token;
use crate::error::{ChainError, Result};

/// Weighted successor graph over a stream of discrete tokens.
///
/// The `MarkovChain` owns every distinct token's state in an append-only
/// arena, in first-seen order. States reference each other through stable
/// `NodeId` handles, so the graph may freely contain self-loops and cycles;
/// dropping the chain drops every stored token copy and transition list in
/// one pass.
///
/// # Responsibilities
/// - Deduplicate tokens into states (`find`, `ensure`)
/// - Accumulate transition frequencies from ordered pairs (`link`)
/// - Sample random walks weighted by observed frequency (`pick_start`,
///   `sample_next`, `generate`)
///
/// # Invariants
/// - At most one state per distinct token under `Token::matches`
/// - At most one transition per (source, target token) pair
/// - Transition frequencies only ever grow; states are never removed
///
/// The chain is single-threaded: construction must fully complete before
/// generation begins, and any cross-thread reuse needs external locking.
#[derive(Debug)]
pub struct MarkovChain<T> {
	/// Every distinct token's state, in first-seen order.
	nodes: Vec<MarkovNode<T>>,
}

impl<T: Token> MarkovChain<T> {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self { nodes: Vec::new() }
	}

	/// Number of distinct states in the store.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// The state behind `id`, if `id` was issued by this chain.
	pub fn node(&self, id: NodeId) -> Option<&MarkovNode<T>> {
		self.nodes.get(id.0)
	}

	/// All states with their handles, in first-seen order.
	pub fn states(&self) -> impl Iterator<Item = (NodeId, &MarkovNode<T>)> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(index, node)| (NodeId(index), node))
	}

	/// Looks a token up in the store.
	///
	/// Linear scan using `Token::matches`; no side effect.
	pub fn find(&self, token: &T) -> Option<NodeId> {
		self.nodes
			.iter()
			.position(|node| node.token().matches(token))
			.map(NodeId)
	}

	/// Returns the state for `token`, creating it if it does not exist yet.
	///
	/// On creation the token is duplicated through its own capability and
	/// the new state is appended at the tail of the store with an empty
	/// transition list and a zero counter. The stored copy is fully
	/// independent of the caller's value.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the copy or the store slot
	/// cannot be obtained; the chain is left unchanged.
	pub fn ensure(&mut self, token: &T) -> Result<NodeId> {
		if let Some(id) = self.find(token) {
			return Ok(id);
		}

		let copy = token.duplicate()?;
		self.nodes
			.try_reserve(1)
			.map_err(|_| ChainError::Allocation)?;
		let id = NodeId(self.nodes.len());
		self.nodes.push(MarkovNode::new(copy));
		trace!(index = id.0, "new state");
		Ok(id)
	}

	/// Records one observed `source -> target` pair.
	///
	/// - If the source token is terminal, only its occurrence counter is
	///   incremented; terminal states never grow successors.
	/// - If a transition toward the target's token already exists, its
	///   frequency is incremented.
	/// - Otherwise a new transition with frequency 1 is appended.
	///
	/// # Errors
	/// Returns `ChainError::Allocation` if the transition list cannot
	/// grow. The chain stays valid and destroyable; callers should abort
	/// construction and drop it.
	pub fn link(&mut self, source: NodeId, target: NodeId) -> Result<()> {
		if self.nodes[source.0].token().is_terminal() {
			self.nodes[source.0].count_occurrence();
			return Ok(());
		}

		// Match on token equality, not handle identity.
		let target_token = self.nodes[target.0].token();
		let matched = self.nodes[source.0]
			.transitions()
			.iter()
			.position(|transition| {
				self.nodes[transition.target().0]
					.token()
					.matches(target_token)
			});

		match matched {
			Some(index) => self.nodes[source.0].bump(index),
			None => self.nodes[source.0].push_transition(target)?,
		}
		Ok(())
	}

	/// Selects a random start state for a walk.
	///
	/// Draws uniformly random store indices until one lands on a state
	/// with at least one outgoing transition; dead ends (terminal tokens
	/// included) are rejected and redrawn.
	///
	/// # Errors
	/// Returns `ChainError::NoStartCandidate` if no state in the store has
	/// any outgoing transition (empty store included); the retry loop would
	/// otherwise never terminate, so the degenerate corpus is rejected up
	/// front.
	pub fn pick_start<R: Rng>(&self, rng: &mut R) -> Result<NodeId> {
		if !self.nodes.iter().any(|node| node.successor_count() > 0) {
			debug!(states = self.nodes.len(), "no state has outgoing transitions");
			return Err(ChainError::NoStartCandidate);
		}

		loop {
			let index = rng.random_range(0..self.nodes.len());
			if self.nodes[index].successor_count() > 0 {
				return Ok(NodeId(index));
			}
		}
	}

	/// Samples the successor of `id` weighted by transition frequency.
	///
	/// Returns `None` on a state with no outgoing transitions.
	pub fn sample_next<R: Rng>(&self, id: NodeId, rng: &mut R) -> Option<NodeId> {
		self.nodes[id.0].sample_next(rng)
	}

	/// Generates one random walk and emits every visited token.
	///
	/// Starting from `start` (or a `pick_start` draw when absent), the walk
	/// emits the current token and advances through `sample_next`, for at
	/// most `max_length` steps or until it reaches a state with no
	/// successors. The final state's token is emitted once more after the
	/// loop, so a walk emits between 1 and `max_length + 1` tokens;
	/// `max_length == 0` emits exactly the start token.
	///
	/// # Errors
	/// - `ChainError::NoStartCandidate` if no start was given and none can
	///   be drawn.
	/// - `ChainError::Io` if the emission sink fails.
	pub fn generate<R: Rng>(
		&self,
		rng: &mut R,
		start: Option<NodeId>,
		max_length: usize,
		out: &mut dyn io::Write,
	) -> Result<()> {
		let mut current = match start {
			Some(id) => id,
			None => self.pick_start(rng)?,
		};

		let mut steps = 0;
		while steps < max_length && self.nodes[current.0].successor_count() > 0 {
			self.nodes[current.0].token().emit(out)?;
			match self.sample_next(current, rng) {
				Some(next) => current = next,
				None => break,
			}
			steps += 1;
		}
		self.nodes[current.0].token().emit(out)?;
		Ok(())
	}

	/// Transitions of the state behind `id`, in first-seen order.
	pub fn transitions_of(&self, id: NodeId) -> &[Transition] {
		self.nodes[id.0].transitions()
	}
}

impl<T: Token> Default for MarkovChain<T> {
	fn default() -> Self {
		Self::new()
	}
}
