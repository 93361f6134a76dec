//! Price history access and ingestion

pub mod csv_import;
pub mod daily;
pub mod memory;
pub mod provider;

pub use csv_import::{load_price_csv, read_price_csv, CsvImportError, ImportSummary};
pub use daily::resample_daily;
pub use memory::InMemoryHistoryStore;
pub use provider::{HistoryError, PriceHistoryStore};
