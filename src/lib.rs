//! Secretaria - REST endpoints over a school's administrative records.
//!
//! Students, teachers, classes, subjects, activities, attendance, grades,
//! payments and users each live in one table and are served through the same
//! generic handlers:
//!
//! - **Config**: Layered configuration (file → env → CLI)
//! - **Database**: libsql/Turso connection provider, one connection per request
//! - **Resource**: Per-entity descriptor (table, identity, fields, messages)
//! - **Crud**: List / Get / Create / Update / Delete driven by a descriptor
//! - **Router**: HTTP routing with path parameters under a common prefix
//! - **Server**: Hyper-based HTTP server
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use secretaria::{Loader, Router, Store, config::Overrides};
//!
//! #[tokio::main]
//! async fn main() -> secretaria::Result<()> {
//!     let config = Loader::default().load(None, &Overrides::default())?;
//!     let store = Arc::new(Store::open(&config.database).await?);
//!
//!     let mut router = Router::with_prefix(config.server.prefix.clone());
//!     secretaria::school::register(&mut router);
//!
//!     secretaria::server::run(&config.server, store, router.into_handle()).await
//! }
//! ```

pub mod config;
pub mod crud;
pub mod db;
pub mod error;
pub mod module;
pub mod resource;
pub mod response;
pub mod router;
pub mod school;
pub mod server;
pub mod telemetry;

// Re-export main types at crate root
pub use config::{Config, Loader};
pub use db::{Provider, Store};
pub use error::{Error, Result};
pub use module::Module;
pub use resource::Resource;
pub use router::{Context, Router};
