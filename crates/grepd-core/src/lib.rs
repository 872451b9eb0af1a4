#![deny(unsafe_code)]

//! grepd core runtime.
//!
//! Provides the line-search engine with context windows, the library
//! resolver that maps dictionary names to on-disk sources, the shutdown
//! gate that drives graceful draining, and the axum HTTP adapter that
//! exposes all of it as a JSON API.

/// Context-aware line search and result truncation.
pub mod engine;
/// HTTP adapter — routes, wire types, and the server loop.
pub mod http;
/// Library root and source-name resolution.
pub mod library;
/// Draining state machine for graceful shutdown.
pub mod shutdown;

pub use engine::{
    GROUP_SEPARATOR, MatchGroup, Pattern, SearchEngine, SearchQuery, flatten, truncate,
};
pub use library::Library;
pub use shutdown::{GateState, ShutdownGate};
