//! Pure computations behind each view. Inputs are transactions already
//! fetched from the backend; nothing here performs I/O.

pub mod calendar;
pub mod stats;
pub mod table;

pub use calendar::{CalendarDay, CalendarMonth, YearMonth};
pub use stats::{Summary, recent, summarize};
pub use table::{SortKey, SortOrder, TransactionFilter};
