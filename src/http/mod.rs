//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs, classified by method and path:
//!         GET  /        → form display (cookie.rs greeting, form.rs page)
//!         GET  /<name>  → redirect lookup
//!         POST /...     → registration (validator, then registry, then cookie.rs)
//!     → Send to client
//! ```

pub mod cookie;
pub mod form;
pub mod handlers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{build_router, AppState, BookmarkServer};
