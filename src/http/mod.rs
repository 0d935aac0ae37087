//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, bounded body read)
//!     → handlers.rs (/health, /relay, fallback)
//!     → relay subsystem
//!     → response.rs (JSON envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::RelayReply;
pub use server::{AppState, HttpServer};
