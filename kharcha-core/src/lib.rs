//! kharcha-core: expense records, date-range filtering, and category summaries.

pub mod filter;
pub mod input;
pub mod record;
pub mod summary;
pub mod window;

pub use filter::filter_expenses;
pub use input::{parse_free_text, FreeTextError, FreeTextExpense, USAGE_HINT};
pub use record::{ExpenseRecord, RawRow, DEFAULT_CATEGORY, EXPECTED_HEADERS};
pub use summary::{summarize, CategoryShare, Summary, NO_EXPENSES};
pub use window::{Period, Window};
