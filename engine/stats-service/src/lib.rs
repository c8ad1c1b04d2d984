//! # Stats Service
//!
//! HTTP front end for the [`stats_store`] crate. Owns one [`stats_store::SymbolStore`]
//! behind an `Arc` and exposes batch ingestion, statistics, listing, deletion and reset
//! as JSON endpoints served by `warp`.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod service;
pub mod signals;
pub mod timing;

pub use config::{load_config, validate_config, LoggingConfig, ServerConfig, ServiceConfig};
pub use error::{ErrorResponse, ServiceError, ServiceResult};
pub use logging::initialize_logging;
pub use routes::create_routes;
pub use service::{run_service, start_server, RunningServer};
pub use signals::{graceful_shutdown, setup_signal_handlers};
pub use timing::OperationTimer;
