//! Top merchants endpoint, ordered by total spent.

use anyhow::Result;
use tally_core::{MerchantStat, is_subscription_merchant};
use tracing::debug;

use super::decode_body;
use crate::decode::Decoder;
use crate::types::MerchantsPayload;

/// Unnamed merchants are dropped. The subscription flag falls back to the
/// local merchant list when the API leaves it out.
pub fn parse_merchants_json(json: &str) -> Result<Vec<MerchantStat>> {
    let dec = Decoder::new()?;
    let raw = match decode_body::<MerchantsPayload>(json, "merchants")? {
        MerchantsPayload::Wrapped { merchants } => merchants,
        MerchantsPayload::List(merchants) => merchants,
    };

    let mut merchants: Vec<MerchantStat> = raw
        .iter()
        .filter_map(|row| {
            let store_name = dec.text(&row.store_name)?;
            let is_subscription = if row.is_subscription.is_null() {
                is_subscription_merchant(&store_name)
            } else {
                dec.flag(&row.is_subscription)
            };
            Some(MerchantStat {
                total_spent: dec.amount(&row.total_spent),
                visit_count: dec.count(&row.visit_count),
                is_subscription,
                store_name,
            })
        })
        .collect();
    merchants.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));

    debug!(count = merchants.len(), "parsed merchants");
    Ok(merchants)
}
