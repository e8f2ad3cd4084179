//! Local collaborator implementations: filesystem object store, analysis
//! response directory and SQLite repository.

mod analysis;
mod local;
mod sqlite;

pub use analysis::AnalysisDirectory;
pub use local::LocalObjectStore;
pub use sqlite::SqliteInvoiceRepository;
