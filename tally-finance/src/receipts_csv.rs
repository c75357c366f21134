//! Parse receipt CSV exports into core receipts.
//!
//! Export header:
//! id,date,total_amount,store_name,category_name,store_id
//!
//! Columns are looked up by header name, so extra or reordered columns are
//! fine. `date` accepts the same shapes as the API payloads.

use anyhow::{Context, Result, bail};
use csv::StringRecord;
use std::path::Path;
use tally_core::{Receipt, categorize_store};
use tally_ingest::Decoder;
use tracing::{debug, warn};

struct Columns {
    id: Option<usize>,
    date: usize,
    total_amount: usize,
    store_name: Option<usize>,
    category_name: Option<usize>,
    store_id: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let Some(date) = find("date") else {
            bail!("receipt CSV has no `date` column");
        };
        let Some(total_amount) = find("total_amount").or_else(|| find("amount")) else {
            bail!("receipt CSV has no `total_amount` column");
        };
        Ok(Self {
            id: find("id").or_else(|| find("receipt_id")),
            date,
            total_amount,
            store_name: find("store_name"),
            category_name: find("category_name"),
            store_id: find("store_id"),
        })
    }
}

fn field(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    cleaned.parse::<f64>().ok().filter(|x| x.is_finite()).unwrap_or(0.0)
}

/// Parse a receipts CSV file. Rows whose date does not parse are skipped;
/// rows without a category are categorized from the store name.
pub fn parse_receipts_csv(path: impl AsRef<Path>) -> Result<Vec<Receipt>> {
    let rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    read_receipts(rdr).with_context(|| format!("reading {}", path.as_ref().display()))
}

/// Same as `parse_receipts_csv`, from an in-memory export.
pub fn parse_receipts_csv_str(data: &str) -> Result<Vec<Receipt>> {
    let rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    read_receipts(rdr)
}

fn read_receipts<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Receipt>> {
    let cols = Columns::from_header(rdr.headers()?)?;
    let dec = Decoder::new()?;

    let mut receipts = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let Some(date) = field(&record, Some(cols.date)).and_then(|s| dec.parse_date(s)) else {
            warn!(row = row + 1, "skipping receipt row with unreadable date");
            continue;
        };

        let store_name = field(&record, cols.store_name).map(str::to_string);
        let category = match field(&record, cols.category_name) {
            Some(c) => c.to_string(),
            None => categorize_store(store_name.as_deref().unwrap_or("")).category.to_string(),
        };
        let id = field(&record, cols.id)
            .and_then(|s| s.parse().ok())
            .unwrap_or(row as i64 + 1);
        let amount = field(&record, Some(cols.total_amount)).map_or(0.0, parse_amount);

        let mut receipt = Receipt::new(id, date, amount, store_name, category);
        receipt.store_id = field(&record, cols.store_id).and_then(|s| s.parse().ok());
        receipts.push(receipt);
    }

    debug!(count = receipts.len(), "parsed receipts csv");
    Ok(receipts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_export() {
        let data = "\
id,date,total_amount,store_name,category_name,store_id
1,2024-01-03,42.10,Trader Joe's,Food & Drink,4
2,01/05/2024,\"$1,200.00\",Harbor View Hotel,,
3,not a date,9.99,CVS,Health,
4,2024-01-09,,,,
";
        let rs = parse_receipts_csv_str(data).unwrap();
        assert_eq!(rs.len(), 3);

        assert_eq!(rs[0].store_id, Some(4));
        assert_eq!(rs[0].total_amount, 42.10);

        assert_eq!(rs[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(rs[1].total_amount, 1200.0);
        assert_eq!(rs[1].category_name, "Travel");

        assert_eq!(rs[2].id, 4);
        assert_eq!(rs[2].total_amount, 0.0);
        assert_eq!(rs[2].category_name, "Shopping");
    }

    #[test]
    fn test_reordered_columns() {
        let data = "store_name,total_amount,date\nNetflix,15.49,2024-02-01\n";
        let rs = parse_receipts_csv_str(data).unwrap();
        assert_eq!(rs[0].id, 1);
        assert_eq!(rs[0].category_name, "Entertainment");
    }

    #[test]
    fn test_missing_date_column() {
        assert!(parse_receipts_csv_str("id,total_amount\n1,5\n").is_err());
    }
}
