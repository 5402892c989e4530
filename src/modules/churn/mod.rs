//! ChurnGuard: customer inactivity tiers and revenue at risk.
//!
//! Customers are bucketed by days since their last visit. A customer with no
//! recorded visit carries the reserved sentinel and always lands in the
//! terminal "never" tier, regardless of the numeric thresholds.

use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::{rollup, Band, BandTable, BoundDirection, Money, TierRollup};

/// Reserved days-since value for customers with no recorded visit.
pub const NEVER_SENTINEL: i64 = 999;

/// Customers inactive for at least this many days enter the at-risk window.
pub const DEFAULT_AT_RISK_AFTER_DAYS: i64 = 30;

/// Customer visit history as supplied by the record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerActivity {
    pub customer_id: String,
    pub name: String,
    pub last_seen: Option<NaiveDate>,
    pub total_spend: Money,
}

/// Inactivity tier, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnTier {
    Critical,
    High,
    Medium,
    Low,
    Never,
}

impl ChurnTier {
    pub const fn label(self) -> &'static str {
        match self {
            ChurnTier::Critical => "critical",
            ChurnTier::High => "high",
            ChurnTier::Medium => "medium",
            ChurnTier::Low => "low",
            ChurnTier::Never => "never",
        }
    }
}

/// Inactivity ladder: >=90 critical, >=60 high, >=45 medium, else low, with
/// the 999 sentinel reserved for the never-seen tier.
fn churn_bands() -> &'static BandTable<ChurnTier> {
    static TABLE: OnceLock<BandTable<ChurnTier>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BandTable::new(
            BoundDirection::LowerInclusive,
            vec![
                Band::new(90.0, ChurnTier::Critical),
                Band::new(60.0, ChurnTier::High),
                Band::new(45.0, ChurnTier::Medium),
            ],
            ChurnTier::Low,
        )
        .and_then(|table| table.with_sentinel(NEVER_SENTINEL as f64, ChurnTier::Never))
        .expect("churn tier table is statically ordered")
    })
}

/// A customer plus the computed inactivity tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRiskCustomer {
    pub customer: CustomerActivity,
    pub days_since: i64,
    pub tier: ChurnTier,
}

/// Classify one customer for the given evaluation date.
pub fn classify_customer(customer: CustomerActivity, today: NaiveDate) -> AtRiskCustomer {
    let days_since = customer
        .last_seen
        .map(|seen| (today - seen).num_days())
        .unwrap_or(NEVER_SENTINEL);

    let tier = *churn_bands().classify(days_since as f64);

    AtRiskCustomer {
        customer,
        days_since,
        tier,
    }
}

/// Revenue-at-risk summary over inactive customers.
pub type ChurnReport = TierRollup<AtRiskCustomer>;

/// Classify every customer and roll up the ones inside the at-risk window.
pub fn churn_report(
    customers: Vec<CustomerActivity>,
    today: NaiveDate,
    at_risk_after_days: i64,
) -> ChurnReport {
    let classified = customers
        .into_iter()
        .map(|customer| classify_customer(customer, today));

    rollup(
        classified,
        |record| record.days_since >= at_risk_after_days,
        |record| Some(record.customer.total_spend),
        |record| record.tier.label(),
        ChurnTier::Critical.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    fn customer(id: &str, days_ago: Option<i64>, spend: i64) -> CustomerActivity {
        CustomerActivity {
            customer_id: id.to_string(),
            name: format!("Customer {id}"),
            last_seen: days_ago.map(|days| evaluation_date() - chrono::Duration::days(days)),
            total_spend: Money::from_major(spend),
        }
    }

    #[test]
    fn tiers_follow_the_inactivity_ladder() {
        let cases = [
            (120, ChurnTier::Critical),
            (90, ChurnTier::Critical),
            (89, ChurnTier::High),
            (60, ChurnTier::High),
            (59, ChurnTier::Medium),
            (45, ChurnTier::Medium),
            (44, ChurnTier::Low),
            (5, ChurnTier::Low),
        ];
        for (days, expected) in cases {
            let classified = classify_customer(customer("c", Some(days), 100), evaluation_date());
            assert_eq!(classified.tier, expected, "{days} days since last visit");
        }
    }

    #[test]
    fn never_seen_customers_map_to_the_terminal_tier() {
        let classified = classify_customer(customer("ghost", None, 0), evaluation_date());
        assert_eq!(classified.days_since, NEVER_SENTINEL);
        assert_eq!(classified.tier, ChurnTier::Never);
    }

    #[test]
    fn the_sentinel_bypasses_the_numeric_ladder() {
        // 999 would satisfy the critical threshold numerically; the sentinel wins.
        let classified =
            classify_customer(customer("c", Some(NEVER_SENTINEL), 10), evaluation_date());
        assert_eq!(classified.tier, ChurnTier::Never);
    }

    #[test]
    fn report_sums_revenue_at_risk_inside_the_window() {
        let customers = vec![
            customer("a", Some(100), 5_000), // critical
            customer("b", Some(50), 1_200),  // medium
            customer("c", Some(10), 9_999),  // recent, outside window
            customer("d", None, 0),          // never seen
        ];

        let report = churn_report(customers, evaluation_date(), DEFAULT_AT_RISK_AFTER_DAYS);

        assert_eq!(report.filtered.len(), 3);
        assert_eq!(report.total_value, Money::from_major(6_200));
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.count_by_tier.get("never"), Some(&1));
        assert!(report.count_by_tier.get("low").is_none());
    }

    #[test]
    fn report_is_pure_over_unchanged_input() {
        let build = || {
            churn_report(
                vec![customer("a", Some(70), 300), customer("b", None, 0)],
                evaluation_date(),
                DEFAULT_AT_RISK_AFTER_DAYS,
            )
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn no_customers_means_empty_report() {
        let report = churn_report(Vec::new(), evaluation_date(), DEFAULT_AT_RISK_AFTER_DAYS);
        assert!(report.filtered.is_empty());
        assert_eq!(report.total_value, Money::ZERO);
    }
}
