//! Intel Response Core
//!
//! Intelligence validation and adaptive response orchestration.
//! Signals about a monitored entity are validated, classified and
//! aggregated into patterns; patterns drive strategy recommendation,
//! generation, prediction and optimization; strategies are executed
//! alone or as a cross-platform plan, and their outcomes feed back into
//! the next recommendation.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logic;
pub mod storage;

pub use config::EngineConfig;
pub use engine::{CycleOptions, CycleReport, Engine, IngestSummary};
pub use error::{ActionError, EngineError, EngineResult, ValidationError};
pub use storage::{JsonlAuditLog, MemoryPersistence, Persistence};
