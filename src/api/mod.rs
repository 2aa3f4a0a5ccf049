//! API Module
//!
//! Admin HTTP surface over a shared cache handle: inspection, invalidation and
//! statistics. The request-path services that consume the cache call it as a
//! library and are not part of this surface.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
