//! tally-finance: receipt CSV import, local period summaries, and dashboard assembly

pub mod dashboard;
pub mod receipts_csv;
pub mod summary;

pub use dashboard::{Dashboard, DashboardConfig, DashboardInput, merchant_stats};
pub use receipts_csv::{parse_receipts_csv, parse_receipts_csv_str};
pub use summary::{SummaryView, summarize};
