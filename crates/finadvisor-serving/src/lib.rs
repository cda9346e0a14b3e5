//! Request handling for the finance advisor.
//!
//! This crate is the boundary between a transport (HTTP server, CLI, test
//! harness) and the training pipeline. It parses the request body, obtains a
//! trained model according to the configured [`ModelPolicy`], and shapes the
//! result into a JSON payload with a status.
//!
//! # Overview
//!
//! - **AdvisorService**: admission control, train-once caching, request counters
//! - **TrainRequest / TrainResponse**: request parsing and the success payload
//! - **TrainingOutcome**: status plus JSON body for any transport
//! - **ServingConfig**: policy, admission limit and trainer settings
//!
//! # Quick Start
//!
//! ```no_run
//! use finadvisor_serving::{AdvisorService, ServingConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = AdvisorService::new(ServingConfig::default())?;
//! let outcome = service.handle(&json!({ "income": 5000 })).await;
//!
//! assert_eq!(outcome.status.code(), 200);
//! println!("{}", outcome.body);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod service;

pub use config::{ConfigError, ModelPolicy, ServingConfig, ServingConfigBuilder};
pub use error::{ServingError, ServingResult};
pub use handler::{
    ErrorPayload, ResponseStatus, TrainRequest, TrainResponse, TrainingOutcome, SUCCESS_MESSAGE,
};
pub use service::{AdvisorService, ServiceStats};
