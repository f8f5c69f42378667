use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::models::{NewVisit, VisitCounters, VisitKind};
use crate::storage::VisitStorage;

/// Business rule mapping one visit event to a store mutation.
///
/// Never touches storage directly beyond the [`VisitStorage`] contract;
/// called only from the queue worker, so mutations are serialized.
pub struct VisitService {
    storage: Arc<dyn VisitStorage>,
}

impl VisitService {
    pub fn new(storage: Arc<dyn VisitStorage>) -> Self {
        Self { storage }
    }

    /// Record one visit event.
    ///
    /// First event for an (ip_hash, source) pair creates the record with
    /// visit_count 1, seeding the kind-specific counter to 1 for non-page
    /// kinds. Later events increment exactly one counter: visit_count for
    /// page visits, the kind counter for the rest (visit_count untouched).
    pub async fn record(&self, visit: NewVisit, kind: VisitKind) -> Result<()> {
        let existing = self
            .storage
            .find_by_hash_and_source(&visit.ip_hash, &visit.source)
            .await?;

        match existing {
            None => {
                let mut counters = VisitCounters {
                    visits: 1,
                    ..VisitCounters::default()
                };
                match kind {
                    VisitKind::Page => {}
                    VisitKind::Github => counters.github = 1,
                    VisitKind::Linkedin => counters.linkedin = 1,
                    VisitKind::Resume => counters.resume = 1,
                }
                debug!(source = %visit.source, kind = kind.as_str(), "creating visit record");
                self.storage.create_or_get(&visit, counters).await?;
                Ok(())
            }
            Some(mut record) => {
                match kind {
                    VisitKind::Page => record.visit_count += 1,
                    VisitKind::Github => record.github_visit_count += 1,
                    VisitKind::Linkedin => record.linkedin_visit_count += 1,
                    VisitKind::Resume => record.resume_download_count += 1,
                }
                debug!(source = %visit.source, kind = kind.as_str(), "incrementing visit record");
                self.storage.update(&record).await
            }
        }
    }
}
