//! Weighted Markov-chain sequence generation library.
//!
//! This crate provides a frequency-weighted successor graph over a generic
//! token stream, including:
//! - Incremental graph construction from ordered token pairs
//! - Weighted random sampling of start states and successors
//! - Bounded random-walk sequence generation
//! - A capability trait decoupling the chain from the token domain
//!
//! The chain never interprets token contents; anything token-specific
//! (equality, duplication, terminal detection, output) is supplied by the
//! token type through the `Token` trait.

/// Chain data structure, construction and sampling algorithms.
///
/// This module exposes the graph manager interface while keeping
/// arena internals private.
pub mod chain;

/// Error types shared by construction and generation.
pub mod error;
