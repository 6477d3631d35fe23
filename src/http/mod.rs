//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, surface routing)
//!     → request.rs (borrowed view handed to filters)
//!     → [filter pipeline decides: forward or reject]
//!     → response.rs (rejection bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::RequestContext;
pub use response::Rejection;
pub use server::{HttpServer, X_REQUEST_ID};
