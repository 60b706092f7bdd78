//! Lost & found server - HTTP REST API for reporting and matching items
//!
//! This crate exposes the [`lostfound`] service over HTTP:
//!
//! - **Reporting**: lost and found reports are validated, assigned an id and persisted
//! - **Browsing**: per-collection listing with optional filters, item details, stats
//! - **Matching**: rank found items against a lost-item description
//! - **Health**: liveness and readiness probes
//!
//! All store work runs on the blocking thread pool. Errors are returned as
//! `{"error": {"code", "message"}}` with a status derived from the error kind.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API status
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `POST /api/report-lost` - Report a lost item
//! - `POST /api/report-found` - Report a found item
//! - `GET /api/items/{lost|found}` - List items (`category`, `color`, `location`, `search`)
//! - `GET /api/items/{lost|found}/{id}` - Item details
//! - `POST /api/match-items` - Match found items
//! - `POST /api/parse-detections` - Normalize image-analysis output
//! - `GET /api/stats` - Collection sizes

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
