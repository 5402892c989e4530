use std::collections::BTreeMap;

use serde::Serialize;

use super::money::Money;

/// Aggregates over the classified records that pass a caller-supplied window
/// predicate. `filtered` preserves the input order for display; the numeric
/// aggregates do not depend on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRollup<R> {
    pub filtered: Vec<R>,
    pub total_value: Money,
    pub count_by_tier: BTreeMap<&'static str, usize>,
    pub critical_count: usize,
    pub unclassified_count: usize,
}

/// Reduce a classified collection into summary statistics.
///
/// `value` returns `None` for records that cannot contribute a numeric value
/// (e.g. a batch with no expiry date); such records stay in `filtered` and in
/// the tier counts but are excluded from `total_value`. An empty window yields
/// zeroed aggregates, never an error.
pub fn rollup<R, W, V, L>(
    records: impl IntoIterator<Item = R>,
    window: W,
    value: V,
    tier_label: L,
    critical_label: &'static str,
) -> TierRollup<R>
where
    W: Fn(&R) -> bool,
    V: Fn(&R) -> Option<Money>,
    L: Fn(&R) -> &'static str,
{
    let mut filtered = Vec::new();
    let mut total_value = Money::ZERO;
    let mut count_by_tier: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut critical_count = 0;
    let mut unclassified_count = 0;

    for record in records {
        if !window(&record) {
            continue;
        }

        match value(&record) {
            Some(amount) => total_value = total_value.saturating_add(amount),
            None => unclassified_count += 1,
        }

        let tier = tier_label(&record);
        *count_by_tier.entry(tier).or_insert(0) += 1;
        if tier == critical_label {
            critical_count += 1;
        }

        filtered.push(record);
    }

    TierRollup {
        filtered,
        total_value,
        count_by_tier,
        critical_count,
        unclassified_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Sample {
        id: u32,
        tier: &'static str,
        in_window: bool,
        value: Option<Money>,
    }

    fn samples() -> Vec<Sample> {
        vec![
            Sample {
                id: 1,
                tier: "critical",
                in_window: true,
                value: Some(Money::from_major(120)),
            },
            Sample {
                id: 2,
                tier: "watch",
                in_window: true,
                value: Some(Money::from_major(30)),
            },
            Sample {
                id: 3,
                tier: "watch",
                in_window: false,
                value: Some(Money::from_major(999)),
            },
            Sample {
                id: 4,
                tier: "unknown",
                in_window: true,
                value: None,
            },
        ]
    }

    fn run(records: Vec<Sample>) -> TierRollup<Sample> {
        rollup(
            records,
            |record| record.in_window,
            |record| record.value,
            |record| record.tier,
            "critical",
        )
    }

    #[test]
    fn filters_sums_and_counts_by_tier() {
        let result = run(samples());

        assert_eq!(
            result.filtered.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 4],
            "window filter preserves input order"
        );
        assert_eq!(result.total_value, Money::from_major(150));
        assert_eq!(result.count_by_tier.get("critical"), Some(&1));
        assert_eq!(result.count_by_tier.get("watch"), Some(&1));
        assert_eq!(result.count_by_tier.get("unknown"), Some(&1));
        assert_eq!(result.critical_count, 1);
        assert_eq!(result.unclassified_count, 1);
    }

    #[test]
    fn unclassified_records_are_counted_but_not_summed() {
        let result = run(samples());
        // id 4 has no value; the total only reflects ids 1 and 2
        assert_eq!(result.total_value, Money::from_major(150));
        assert_eq!(result.count_by_tier.values().sum::<usize>(), 3);
    }

    #[test]
    fn rollup_is_idempotent_over_unchanged_input() {
        let first = run(samples());
        let second = run(samples());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_zeroed_aggregates() {
        let result = run(Vec::new());
        assert!(result.filtered.is_empty());
        assert_eq!(result.total_value, Money::ZERO);
        assert!(result.count_by_tier.is_empty());
        assert_eq!(result.critical_count, 0);
        assert_eq!(result.unclassified_count, 0);
    }
}
