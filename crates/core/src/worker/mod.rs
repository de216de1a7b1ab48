//! Job worker.
//!
//! Subscribes to the job channel and drives the outbound dispatcher under a
//! bounded concurrency budget. Processing is best-effort: a job that fails
//! to parse or dispatch is logged and discarded; there is no retry and no
//! dead-letter sink, and nothing is reported back to the producer.

mod service;

pub use service::{Worker, WorkerError, WorkerSettings};
