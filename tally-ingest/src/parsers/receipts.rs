//! Receipt list endpoint.
//!
//! Body is either the paged envelope
//!   {"receipts": [...], "total_pages": 3}
//! or a bare array of receipt objects.

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::{Receipt, UNCATEGORIZED};
use tracing::{debug, warn};

use super::decode_body;
use crate::decode::Decoder;
use crate::types::{RawReceipt, ReceiptsPayload};

/// One page of receipts
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptPage {
    pub receipts: Vec<Receipt>,
    /// None for a bare array
    pub total_pages: Option<u32>,
}

/// Parse a receipts payload. Rows without a readable date are skipped.
pub fn parse_receipts_json(json: &str) -> Result<ReceiptPage> {
    let dec = Decoder::new()?;
    let (raw, total_pages) = match decode_body::<ReceiptsPayload>(json, "receipts")? {
        ReceiptsPayload::Page { receipts, total_pages } => (receipts, Some(dec.count(&total_pages))),
        ReceiptsPayload::List(receipts) => (receipts, None),
    };

    let mut receipts = Vec::with_capacity(raw.len());
    for (idx, row) in raw.iter().enumerate() {
        match receipt_from_raw(&dec, row, idx) {
            Some(r) => receipts.push(r),
            None => warn!(row = idx, date = %row.date, "skipping receipt with unreadable date"),
        }
    }
    debug!(count = receipts.len(), skipped = raw.len() - receipts.len(), "parsed receipts");

    Ok(ReceiptPage { receipts, total_pages })
}

fn receipt_from_raw(dec: &Decoder, row: &RawReceipt, idx: usize) -> Option<Receipt> {
    let date = dec.date(&row.date)?;
    // Rows without an id get a negative placeholder so they stay distinct.
    let id = dec.id(&row.id).unwrap_or(-(idx as i64) - 1);
    let category = dec.text(&row.category_name).unwrap_or_else(|| UNCATEGORIZED.to_string());
    let mut receipt = Receipt::new(id, date, dec.amount(&row.total_amount), dec.text(&row.store_name), category);
    receipt.store_id = dec.id(&row.store_id);
    Some(receipt)
}

/// Oldest and newest receipt dates; both None for an empty list.
pub fn receipt_date_bounds(receipts: &[Receipt]) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let oldest = receipts.iter().map(|r| r.date).min();
    let newest = receipts.iter().map(|r| r.date).max();
    (oldest, newest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_page_envelope() {
        let json = r#"{
            "receipts": [
                {"receipt_id": 11, "date": "Mon, 15 Jan 2024 00:00:00 GMT", "total_amount": "42.10",
                 "store_name": "Trader Joe's", "category_name": "Food & Drink", "store_id": 4},
                {"receipt_id": 12, "date": "2024-01-20", "total_amount": 8, "store_name": null,
                 "category_name": null}
            ],
            "total_pages": 3
        }"#;
        let page = parse_receipts_json(json).unwrap();
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(page.receipts.len(), 2);

        let first = &page.receipts[0];
        assert_eq!(first.id, 11);
        assert_eq!(first.date, d(2024, 1, 15));
        assert_eq!(first.total_amount, 42.10);
        assert_eq!(first.store_id, Some(4));

        let second = &page.receipts[1];
        assert_eq!(second.category_name, UNCATEGORIZED);
        assert_eq!(second.store_name, None);
    }

    #[test]
    fn test_bare_array_skips_bad_dates() {
        let json = r#"[
            {"id": 1, "date": "2024-03-01", "total_amount": 5},
            {"id": 2, "date": "sometime", "total_amount": 7},
            {"id": 3, "date": null, "total_amount": 9},
            {"id": 4, "date": "2024-03-04T18:22:00", "total_amount": "NaN"}
        ]"#;
        let page = parse_receipts_json(json).unwrap();
        assert_eq!(page.total_pages, None);
        let ids: Vec<i64> = page.receipts.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(page.receipts[1].total_amount, 0.0);
    }

    #[test]
    fn test_error_payload() {
        assert!(parse_receipts_json(r#"{"error": "Token expired"}"#).is_err());
    }

    #[test]
    fn test_date_bounds() {
        let rs = vec![
            Receipt::new(1, d(2024, 5, 3), 1.0, None, "Travel"),
            Receipt::new(2, d(2023, 11, 20), 1.0, None, "Travel"),
            Receipt::new(3, d(2024, 2, 1), 1.0, None, "Travel"),
        ];
        assert_eq!(receipt_date_bounds(&rs), (Some(d(2023, 11, 20)), Some(d(2024, 5, 3))));
        assert_eq!(receipt_date_bounds(&[]), (None, None));
    }
}
