//! Top-level module for the Markov chain system.
//!
//! This module provides a weighted successor graph over discrete tokens:
//! - The graph manager and its algorithms (`MarkovChain`)
//! - Per-state storage and weighted sampling (`MarkovNode`)
//! - The token capability set (`Token`)

/// Graph manager owning the state store.
///
/// Exposes construction (`ensure`, `link`), lookup (`find`) and random-walk
/// generation (`pick_start`, `sample_next`, `generate`).
pub mod markov_chain;

/// A single chain state: one distinct token plus its weighted transitions.
///
/// Tracks outgoing transitions and supports weighted random sampling.
pub mod node;

/// Capability trait required from the token domain.
pub mod token;
