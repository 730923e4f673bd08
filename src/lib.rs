//! # mcprobe
//!
//! A protocol-conformance test client for memcache-style text caches:
//! - Request builders for `get`, `set` and `delete`
//! - One `call` contract over TCP and UDP
//! - UDP reply reassembly with duplicate, total and request-id checks
//! - A scenario suite asserting exact reply bytes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Runner                               │
//! │              (Config → Transport + Scenarios)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Conformance Suite                         │
//! │            (universal + stream-only scenarios)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Transport::call(&Request)
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Stream    │          │  Datagram   │
//!   │   (TCP)     │          │   (UDP)     │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Reassembly  │
//!                           │   Buffer    │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod suite;
pub mod runner;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ProbeError, Result};
pub use config::{Config, TransportKind};
pub use network::Transport;
pub use runner::{Report, Runner};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mcprobe
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
