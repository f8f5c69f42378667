use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NewVisit, VisitCounters, VisitRecord};

/// Persistence contract for visit counters.
///
/// A missing row is `Ok(None)`, not an error; "not found" is an internal
/// signal for the aggregator and never surfaces to clients.
#[async_trait]
pub trait VisitStorage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Look up the record for an (ip_hash, source) pair.
    async fn find_by_hash_and_source(
        &self,
        ip_hash: &str,
        source: &str,
    ) -> Result<Option<VisitRecord>>;

    /// Insert a record with the given initial counters, or return the
    /// existing row unchanged when the (ip_hash, source) pair already
    /// exists. Idempotence covers the race between the aggregator's
    /// lookup and its create call.
    async fn create_or_get(&self, visit: &NewVisit, counters: VisitCounters)
        -> Result<VisitRecord>;

    /// Persist all mutable fields of an existing record, keyed by id.
    async fn update(&self, record: &VisitRecord) -> Result<()>;
}
