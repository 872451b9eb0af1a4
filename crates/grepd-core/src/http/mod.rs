//! HTTP adapter — axum routes over the search engine and shutdown gate.
//!
//! The adapter owns everything wire-shaped: JSON decoding, status-code
//! mapping, and flattening match groups into the legacy string results.
//! The engine and gate never see HTTP types.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐      HTTP/1.1 + JSON      ┌──────────────┐
//! │  Client  │──────────────────────────▶│   Adapter    │
//! └──────────┘                           │   (axum)     │
//!                                        └──────┬───────┘
//!                                 is_draining?  │  search
//!                                   ┌───────────┴───────────┐
//!                            ┌──────▼───────┐       ┌───────▼──────┐
//!                            │ ShutdownGate │       │ SearchEngine │
//!                            └──────────────┘       └──────────────┘
//! ```

pub mod server;
pub mod types;

pub use server::{ApiState, router, serve};
pub use types::*;
