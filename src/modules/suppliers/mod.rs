//! Supplier scorecards: delivery reliability and quality risk.
//!
//! Risk is an OR short-circuit of two independent single-metric
//! classifications (on-time rate, average quality), deliberately not a
//! weighted blend: either metric falling below its threshold pulls the
//! supplier into the worse tier.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// On-time rate below this is high risk; average quality below 3.0 likewise.
pub const HIGH_RISK_ON_TIME_PCT: f64 = 70.0;
pub const HIGH_RISK_QUALITY: f64 = 3.0;
pub const MEDIUM_RISK_ON_TIME_PCT: f64 = 90.0;
pub const MEDIUM_RISK_QUALITY: f64 = 4.0;

/// A supplier known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Placed,
    Received,
    Cancelled,
}

/// Delivery record; only received orders feed the scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_id: String,
    pub supplier_id: String,
    pub status: PurchaseOrderStatus,
    pub expected_date: NaiveDate,
    pub received_date: Option<NaiveDate>,
    /// 1.0 to 5.0 star rating captured at receiving; missing ratings count as
    /// zero, matching the legacy scorecard.
    pub quality_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierRisk {
    High,
    Medium,
    Low,
}

impl SupplierRisk {
    pub const fn label(self) -> &'static str {
        match self {
            SupplierRisk::High => "high",
            SupplierRisk::Medium => "medium",
            SupplierRisk::Low => "low",
        }
    }

    const fn severity(self) -> u8 {
        match self {
            SupplierRisk::High => 2,
            SupplierRisk::Medium => 1,
            SupplierRisk::Low => 0,
        }
    }

    fn more_severe(self, other: SupplierRisk) -> SupplierRisk {
        if self.severity() >= other.severity() {
            self
        } else {
            other
        }
    }
}

/// Computed reliability metrics and the combined risk tier for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierScorecard {
    pub supplier_id: String,
    pub name: String,
    pub completed_orders: usize,
    pub on_time_rate: f64,
    pub avg_quality: f64,
    pub risk: SupplierRisk,
}

fn single_metric_risk(value: f64, high_below: f64, medium_below: f64) -> SupplierRisk {
    if value < high_below {
        SupplierRisk::High
    } else if value < medium_below {
        SupplierRisk::Medium
    } else {
        SupplierRisk::Low
    }
}

/// Score one supplier over its received purchase orders.
///
/// A supplier with no completed orders scores the favorable default
/// (100% on-time, 5.0 quality, low risk): insufficient data is explicitly
/// "assume favorable", never a division error.
pub fn vendor_scorecard(supplier: &Supplier, orders: &[PurchaseOrder]) -> SupplierScorecard {
    let completed: Vec<&PurchaseOrder> = orders
        .iter()
        .filter(|order| {
            order.supplier_id == supplier.supplier_id
                && order.status == PurchaseOrderStatus::Received
        })
        .collect();

    if completed.is_empty() {
        return SupplierScorecard {
            supplier_id: supplier.supplier_id.clone(),
            name: supplier.name.clone(),
            completed_orders: 0,
            on_time_rate: 100.0,
            avg_quality: 5.0,
            risk: SupplierRisk::Low,
        };
    }

    let on_time_count = completed
        .iter()
        .filter(|order| {
            order
                .received_date
                .map(|received| received <= order.expected_date)
                .unwrap_or(false)
        })
        .count();
    let total_quality: f64 = completed
        .iter()
        .map(|order| order.quality_rating.unwrap_or(0.0))
        .sum();

    let on_time_rate = (on_time_count as f64 / completed.len() as f64) * 100.0;
    let avg_quality = total_quality / completed.len() as f64;

    let risk = single_metric_risk(on_time_rate, HIGH_RISK_ON_TIME_PCT, MEDIUM_RISK_ON_TIME_PCT)
        .more_severe(single_metric_risk(
            avg_quality,
            HIGH_RISK_QUALITY,
            MEDIUM_RISK_QUALITY,
        ));

    SupplierScorecard {
        supplier_id: supplier.supplier_id.clone(),
        name: supplier.name.clone(),
        completed_orders: completed.len(),
        on_time_rate,
        avg_quality,
        risk,
    }
}

/// Scorecards for the whole supplier base plus per-tier counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub scorecards: Vec<SupplierScorecard>,
    pub count_by_risk: BTreeMap<&'static str, usize>,
    pub high_risk_count: usize,
}

/// Score every supplier, preserving the supplied order for display.
pub fn fleet_summary(suppliers: &[Supplier], orders: &[PurchaseOrder]) -> FleetSummary {
    let scorecards: Vec<SupplierScorecard> = suppliers
        .iter()
        .map(|supplier| vendor_scorecard(supplier, orders))
        .collect();

    let mut count_by_risk: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut high_risk_count = 0;
    for scorecard in &scorecards {
        *count_by_risk.entry(scorecard.risk.label()).or_insert(0) += 1;
        if scorecard.risk == SupplierRisk::High {
            high_risk_count += 1;
        }
    }

    FleetSummary {
        scorecards,
        count_by_risk,
        high_risk_count,
    }
}
