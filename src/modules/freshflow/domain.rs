use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::{rollup, Band, BandTable, BoundDirection, Money, TierRollup};

/// Storage window used by the expiry report when the caller does not override it.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;

/// Batches at or under this many days left are the most severe tier.
pub const CRITICAL_DAYS: i64 = 2;

/// Inventory batch as supplied by the record source, already deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBatch {
    pub batch_code: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub cost_price: Money,
    pub current_price: Money,
    /// `None` when the source has no expiry on record; such batches classify
    /// into the unknown band instead of failing the whole report.
    pub expiry_date: Option<NaiveDate>,
}

/// Discount band over days until expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryBand {
    WithinTwoDays,
    WithinFiveDays,
    WithinTenDays,
    Healthy,
    Unknown,
}

impl ExpiryBand {
    pub const fn discount_pct(self) -> u8 {
        match self {
            ExpiryBand::WithinTwoDays => 50,
            ExpiryBand::WithinFiveDays => 30,
            ExpiryBand::WithinTenDays => 10,
            ExpiryBand::Healthy | ExpiryBand::Unknown => 0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExpiryBand::WithinTwoDays => "critical",
            ExpiryBand::WithinFiveDays => "high",
            ExpiryBand::WithinTenDays => "moderate",
            ExpiryBand::Healthy => "healthy",
            ExpiryBand::Unknown => "unknown",
        }
    }
}

/// Discount ladder over days left: <=2 -> 50%, <=5 -> 30%, <=10 -> 10%, else none.
/// Bounds are inclusive and evaluated in severity order, so exactly two days
/// left earns the 50% band.
fn expiry_bands() -> &'static BandTable<ExpiryBand> {
    static TABLE: OnceLock<BandTable<ExpiryBand>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BandTable::new(
            BoundDirection::UpperInclusive,
            vec![
                Band::new(CRITICAL_DAYS as f64, ExpiryBand::WithinTwoDays),
                Band::new(5.0, ExpiryBand::WithinFiveDays),
                Band::new(10.0, ExpiryBand::WithinTenDays),
            ],
            ExpiryBand::Healthy,
        )
        .expect("expiry discount table is statically ordered")
    })
}

/// A batch plus its computed band and derived pricing fields. Derived fields
/// are pure functions of the batch and the evaluation date; nothing here is
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiringBatch {
    pub batch: ProductBatch,
    pub days_left: Option<i64>,
    pub band: ExpiryBand,
    pub suggested_discount: u8,
    pub new_price: Money,
    /// Spoilage exposure (quantity x unit cost); `None` for unknown-expiry
    /// batches so they never contribute to value-at-risk sums.
    pub exposure: Option<Money>,
}

/// Classify one batch against the discount ladder for the given evaluation date.
pub fn classify_batch(batch: ProductBatch, today: NaiveDate) -> ExpiringBatch {
    let days_left = batch
        .expiry_date
        .map(|expiry| (expiry - today).num_days());

    let band = match days_left {
        Some(days) => *expiry_bands().classify(days as f64),
        None => ExpiryBand::Unknown,
    };

    let suggested_discount = band.discount_pct();
    let new_price = batch.current_price.discounted(suggested_discount);
    let exposure = match band {
        ExpiryBand::Unknown => None,
        _ => Some(batch.cost_price.times(batch.quantity)),
    };

    ExpiringBatch {
        batch,
        days_left,
        band,
        suggested_discount,
        new_price,
        exposure,
    }
}

/// Summary over the batches inside the storage window.
pub type ExpiryReport = TierRollup<ExpiringBatch>;

/// Classify every batch and roll the window up into exposure metrics.
///
/// The window keeps batches with `days_left <= lookahead_days`; batches with
/// no expiry on record stay in the window (they still need operator attention)
/// but are excluded from the exposure total.
pub fn expiry_report(
    batches: Vec<ProductBatch>,
    today: NaiveDate,
    lookahead_days: i64,
) -> ExpiryReport {
    let classified = batches
        .into_iter()
        .map(|batch| classify_batch(batch, today));

    rollup(
        classified,
        |record| record.days_left.map_or(true, |days| days <= lookahead_days),
        |record| record.exposure,
        |record| record.band.label(),
        ExpiryBand::WithinTwoDays.label(),
    )
}
