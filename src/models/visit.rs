use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted row per unique (ip_hash, source) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VisitRecord {
    pub id: i64,
    pub ip_hash: String,
    pub source: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub visit_count: i64,
    pub github_visit_count: i64,
    pub linkedin_visit_count: i64,
    pub resume_download_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// An incoming visit event before it has been matched against storage.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub ip_hash: String,
    pub source: String,
    pub referrer: Option<String>,
    pub user_agent: String,
}

/// Initial counter values used when a visit creates a new record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitCounters {
    pub visits: i64,
    pub github: i64,
    pub linkedin: i64,
    pub resume: i64,
}

/// Which counter a visit event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    Page,
    Github,
    Linkedin,
    Resume,
}

impl VisitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitKind::Page => "page",
            VisitKind::Github => "github",
            VisitKind::Linkedin => "linkedin",
            VisitKind::Resume => "resume",
        }
    }
}
