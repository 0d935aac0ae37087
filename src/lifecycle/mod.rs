//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config (already validated) → Metrics → Relay clients → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → In-flight requests finish → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Listeners start last (traffic only when ready)
//! - No drain deadline beyond the per-hop timeouts

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{prepare, Prepared, StartupError};
