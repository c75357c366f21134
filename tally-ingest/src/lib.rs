//! tally-ingest: lenient decoding of the receipts, budgets, goals, summary and
//! merchants payloads into core types.

pub mod decode;
pub mod parsers;
pub mod types;

pub use decode::Decoder;
pub use parsers::budgets::parse_budgets_json;
pub use parsers::goals::parse_goals_json;
pub use parsers::merchants::parse_merchants_json;
pub use parsers::receipts::{ReceiptPage, parse_receipts_json, receipt_date_bounds};
pub use parsers::summary::parse_summary_json;
