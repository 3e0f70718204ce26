//! kharcha-store: record-store adapters behind the `ExpenseStore` trait.

pub mod csv_store;
pub mod memory;
pub mod sheets;
pub mod store;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;
pub use sheets::SheetsStore;
pub use store::{rows_to_maps, ExpenseStore};
