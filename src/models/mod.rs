pub mod visit;

pub use visit::{NewVisit, VisitCounters, VisitKind, VisitRecord};
