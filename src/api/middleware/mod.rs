//! API middleware components

pub mod cors;
pub mod security;

pub use cors::cors_middleware;
pub use security::security_headers_middleware;
