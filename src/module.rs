//! Module trait for route groups.
//!
//! A module registers its routes with the router. Each entity's
//! [`Resource`](crate::resource::Resource) descriptor is one module.
//!
//! # Example
//!
//! ```ignore
//! use secretaria::{Module, Router};
//!
//! pub struct Health;
//!
//! impl Module for Health {
//!     fn name(&self) -> &'static str {
//!         "health"
//!     }
//!
//!     fn routes(&'static self, router: &mut Router) {
//!         router.get("/health", |_ctx| async move {
//!             secretaria::response::ok(&serde_json::json!({ "status": "ok" }))
//!         });
//!     }
//! }
//! ```

use crate::router::Router;

/// A group of routes registered together.
pub trait Module: Send + Sync {
    /// Module name for identification and logging.
    fn name(&self) -> &'static str;

    /// Register routes with the router.
    ///
    /// Modules live for the whole process, so handlers can borrow `self`.
    fn routes(&'static self, router: &mut Router);
}
