//! Aggregates over a filtered view: KPIs plus per-key sums.
//!
//! All groupings use ordered maps so the same view always produces the same
//! summary, down to iteration order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::filter::FilteredView;
use crate::domain::PeriodLabel;

/// Amount summed per distinct key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupSums(BTreeMap<String, f64>);

impl GroupSums {
    fn add(&mut self, key: &str, amount: f64) {
        match self.0.get_mut(key) {
            Some(sum) => *sum += amount,
            None => {
                self.0.insert(key.to_string(), amount);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Key with the largest sum. Ties go to the lexicographically smallest key.
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (key, value) in self.iter() {
            match best {
                Some((_, v)) if value <= v => {}
                _ => best = Some((key, value)),
            }
        }
        best
    }

    /// Entries sorted ascending by sum (ties by key).
    pub fn ascending(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self.iter().collect();
        out.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(b.0)));
        out
    }

    /// Percentage of the grouping total held by each key.
    ///
    /// `None` when the total is zero (shares are undefined).
    pub fn shares(&self) -> Option<Vec<(&str, f64)>> {
        let total = self.total();
        if total == 0.0 || !total.is_finite() {
            return None;
        }
        Some(self.iter().map(|(k, v)| (k, v / total * 100.0)).collect())
    }
}

/// A winning key and its summed amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopKey {
    pub key: String,
    pub amount: f64,
}

/// Everything the presentation layer needs from one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of present amounts; 0 for an empty view.
    pub total: f64,
    /// `None` when no record in the view carries an amount.
    pub mean: Option<f64>,
    pub count: usize,
    /// Records whose amount cell was blank or not numeric.
    pub missing_amounts: usize,
    pub by_region: GroupSums,
    pub by_category: GroupSums,
    pub by_period: BTreeMap<PeriodLabel, f64>,
    pub orders_by_period: BTreeMap<PeriodLabel, usize>,
    /// Period x region sums; every region seen in the view is present in
    /// every period (zero when it had no sales that month).
    pub region_trend: BTreeMap<PeriodLabel, BTreeMap<String, f64>>,
    pub top_region: Option<TopKey>,
    pub top_category: Option<TopKey>,
}

/// Compute the summary for a view.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut total = 0.0;
    let mut n_amounts = 0usize;
    let mut by_region = GroupSums::default();
    let mut by_category = GroupSums::default();
    let mut by_period: BTreeMap<PeriodLabel, f64> = BTreeMap::new();
    let mut orders_by_period: BTreeMap<PeriodLabel, usize> = BTreeMap::new();
    let mut region_trend: BTreeMap<PeriodLabel, BTreeMap<String, f64>> = BTreeMap::new();

    for record in view.iter() {
        let amount = match record.amount {
            Some(v) => {
                total += v;
                n_amounts += 1;
                v
            }
            None => 0.0,
        };

        by_region.add(&record.region, amount);
        by_category.add(&record.category, amount);
        *by_period.entry(record.period).or_insert(0.0) += amount;
        *orders_by_period.entry(record.period).or_insert(0) += 1;
        *region_trend
            .entry(record.period)
            .or_default()
            .entry(record.region.clone())
            .or_insert(0.0) += amount;
    }

    for row in region_trend.values_mut() {
        for (region, _) in by_region.iter() {
            row.entry(region.to_string()).or_insert(0.0);
        }
    }

    let mean = (n_amounts > 0).then(|| total / n_amounts as f64);
    let top_region = by_region.top().map(to_top_key);
    let top_category = by_category.top().map(to_top_key);

    Summary {
        total,
        mean,
        count: view.len(),
        missing_amounts: view.len() - n_amounts,
        by_region,
        by_category,
        by_period,
        orders_by_period,
        region_trend,
        top_region,
        top_category,
    }
}

fn to_top_key((key, amount): (&str, f64)) -> TopKey {
    TopKey {
        key: key.to_string(),
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::analytics::filter::apply;
    use crate::analytics::testing::{day, record, sample_dataset};
    use crate::domain::{DateRange, FilterSpec};

    fn period(year: i32, month: u32) -> PeriodLabel {
        PeriodLabel { year, month }
    }

    #[test]
    fn full_range_scenario() {
        let ds = sample_dataset();
        let view = apply(&ds, &FilterSpec::unfiltered(&ds));
        let s = summarize(&view);

        assert_relative_eq!(s.total, 350.0);
        assert!((s.mean.unwrap() - 116.67).abs() < 0.01);
        assert_eq!(s.count, 3);
        assert_eq!(s.by_region.get("North"), Some(300.0));
        assert_eq!(s.by_region.get("South"), Some(50.0));
        assert_eq!(s.by_region.len(), 2);
        assert_eq!(s.by_period.get(&period(2024, 1)), Some(&150.0));
        assert_eq!(s.by_period.get(&period(2024, 2)), Some(&200.0));
        assert_eq!(s.orders_by_period.get(&period(2024, 1)), Some(&2));
        assert_eq!(s.orders_by_period.get(&period(2024, 2)), Some(&1));
        assert_eq!(s.top_region.as_ref().map(|t| t.key.as_str()), Some("North"));
        assert_eq!(s.top_category.as_ref().map(|t| t.key.as_str()), Some("Tech"));
    }

    #[test]
    fn single_day_scenario() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds)
            .with_range(DateRange::new(day(2024, 2, 1), day(2024, 2, 1)));
        let s = summarize(&apply(&ds, &spec));

        assert_eq!(s.count, 1);
        assert_relative_eq!(s.total, 200.0);
        assert_eq!(s.mean, Some(200.0));
        assert_eq!(s.by_region.iter().collect::<Vec<_>>(), vec![("North", 200.0)]);
    }

    #[test]
    fn group_sums_reconcile_with_total() {
        let ds = sample_dataset();
        for spec in [
            FilterSpec::unfiltered(&ds),
            FilterSpec::unfiltered(&ds).with_regions(["North"]),
            FilterSpec::unfiltered(&ds).with_categories(["Food"]),
        ] {
            let s = summarize(&apply(&ds, &spec));
            assert_relative_eq!(s.total, s.by_region.total(), epsilon = 1e-9);
            assert_relative_eq!(s.total, s.by_category.total(), epsilon = 1e-9);
            assert_relative_eq!(s.total, s.by_period.values().sum::<f64>(), epsilon = 1e-9);
        }
    }

    #[test]
    fn same_spec_same_summary() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds).with_regions(["North", "South"]);
        let a = apply(&ds, &spec);
        let b = apply(&ds, &spec);
        assert_eq!(a, b);

        let (sa, sb) = (summarize(&a), summarize(&b));
        assert_eq!(sa, sb);
        assert_eq!(sa.total.to_bits(), sb.total.to_bits());
        assert_eq!(sa.mean.map(f64::to_bits), sb.mean.map(f64::to_bits));
    }

    #[test]
    fn empty_view_has_no_mean_or_top() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds).with_regions(Vec::<String>::new());
        let s = summarize(&apply(&ds, &spec));
        assert_eq!(s.total, 0.0);
        assert_eq!(s.mean, None);
        assert_eq!(s.count, 0);
        assert!(s.top_region.is_none());
        assert!(s.top_category.is_none());
        assert!(s.by_period.is_empty());
    }

    #[test]
    fn missing_amounts_are_skipped_but_counted() {
        let records = vec![
            record(2, day(2024, 3, 1), Some(10.0), "East", "Toys"),
            record(3, day(2024, 3, 2), None, "West", "Toys"),
        ];
        let view = FilteredView::from_records(records.iter().collect());
        let s = summarize(&view);
        assert_eq!(s.count, 2);
        assert_eq!(s.missing_amounts, 1);
        assert_eq!(s.mean, Some(10.0));
        assert_eq!(s.by_region.get("West"), Some(0.0));
    }

    #[test]
    fn top_tie_goes_to_smallest_key() {
        let records = vec![
            record(2, day(2024, 3, 1), Some(50.0), "West", "B"),
            record(3, day(2024, 3, 2), Some(50.0), "East", "A"),
        ];
        let s = summarize(&FilteredView::from_records(records.iter().collect()));
        assert_eq!(
            s.top_region,
            Some(TopKey {
                key: "East".to_string(),
                amount: 50.0
            })
        );
    }

    #[test]
    fn region_trend_is_zero_filled() {
        let ds = sample_dataset();
        let s = summarize(&apply(&ds, &FilterSpec::unfiltered(&ds)));
        let feb = &s.region_trend[&period(2024, 2)];
        assert_eq!(feb.get("North"), Some(&200.0));
        assert_eq!(feb.get("South"), Some(&0.0));
    }

    #[test]
    fn ascending_and_shares() {
        let ds = sample_dataset();
        let s = summarize(&apply(&ds, &FilterSpec::unfiltered(&ds)));
        assert_eq!(s.by_category.ascending(), vec![("Food", 50.0), ("Tech", 300.0)]);

        let shares = s.by_category.shares().unwrap();
        assert_relative_eq!(shares[0].1, 50.0 / 350.0 * 100.0);
        assert!(GroupSums::default().shares().is_none());
    }
}
