//! API middleware components

pub mod identity;
pub mod logging;

pub use identity::{parse_bearer, require_identity, AuthenticatedIdentity, CurrentUser};
pub use logging::logging_middleware;
