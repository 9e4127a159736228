//! Writing-stability backend: derives tremor, jerk and smoothness from
//! motion-sensor samples, stores them in DuckDB and serves them over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod mqtt;
pub mod service;
pub mod types;
pub mod utils;

pub use cache::LastSampleCache;
pub use config::AppConfig;
pub use database::{SampleStore, StoreClient};
pub use error::{IngestError, StoreError};
pub use metrics::compute_metrics;
pub use service::StabilityService;
