//! Bookmark server library: a short-link registry that only admits live URIs.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod validator;

pub use config::ServerConfig;
pub use http::BookmarkServer;
pub use lifecycle::Shutdown;
pub use registry::{MemoryRegistry, Registry};
pub use validator::{HttpUriValidator, Liveness, UriValidator};
