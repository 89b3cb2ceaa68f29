pub mod collate;
pub mod filter;
pub mod record;
pub mod session;
pub mod sort;
pub mod store;

pub use collate::{Collation, CollationError};
pub use filter::filter_by_country;
pub use record::{Location, Name, Picture, UserRecord};
pub use session::{DirectorySession, UiState};
pub use sort::{sort_records, SortKey};
pub use store::RecordStore;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
