//! Response Module - Strategy Execution
//!
//! # Components
//! - `dispatch.rs`: `ActionDispatcher` seam and the per-kind dispatch table
//! - `executor.rs`: pending -> executing -> terminal state machine
//! - `types.rs`: execution policy and result

pub mod dispatch;
pub mod executor;
pub mod types;


pub use dispatch::{ActionDispatcher, ActionHandler, DispatchTable, RecordOnlyHandler};
pub use executor::{build_record, terminal_status, StrategyExecutor};
pub use types::{ExecutionPolicy, StrategyExecutionResult};
