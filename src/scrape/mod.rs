pub mod errors;
pub mod orchestrator;
pub mod run_log;

pub use errors::ScrapeError;
pub use orchestrator::ScrapeOrchestrator;
pub use run_log::{
    FanoutRunLog, JsonlRunLog, MemoryRunLog, PgRunLog, RunLogError, RunLogSink, TracingRunLog,
};
