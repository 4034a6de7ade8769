// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod digest;
pub mod error;
pub mod ingest;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::digest::{run_digest, DigestSection};
pub use crate::error::DigestError;
pub use crate::ingest::{Aggregator, SourceContents};
pub use crate::summarize::{ContentType, Summarizer};
