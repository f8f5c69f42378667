pub mod postgres;
pub mod sqlite;
pub mod trait_def;

pub use postgres::PostgresVisitStorage;
pub use sqlite::SqliteVisitStorage;
pub use trait_def::VisitStorage;
