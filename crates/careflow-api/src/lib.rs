//! HTTP record service client for CareFlow.
//!
//! Implements [`careflow_core::RecordService`] against a JSON `/patients`
//! collection:
//!
//! | Operation | Method | Path             |
//! |-----------|--------|------------------|
//! | list      | GET    | `/patients`      |
//! | create    | POST   | `/patients`      |
//! | update    | PUT    | `/patients/{id}` |
//! | delete    | DELETE | `/patients/{id}` |

pub mod config;
pub mod http;

pub use config::{ApiConfig, ConfigError, API_URL_ENV, DEFAULT_API_URL};
pub use http::HttpRecordService;
