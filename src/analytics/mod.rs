//! Visit ingestion pipeline
//!
//! Handlers hash the client address and drop bot traffic, then hand the
//! event to a bounded in-memory queue. A single background worker drains
//! the queue and applies the find-or-create/increment rule against storage,
//! so the worker is the only writer at runtime.

pub mod bot_filter;
pub mod ip_hash;
pub mod queue;
pub mod service;

pub use bot_filter::is_bot;
pub use ip_hash::hash_ip;
pub use queue::{run_worker, IngestQueue, QueueFull, QueueMessage, VisitJob};
pub use service::VisitService;
