//! Filter engine: `FilterSpec` -> `FilteredView`.

use crate::domain::{Dataset, FilterSpec, Record};

/// Records of a dataset that satisfy a `FilterSpec`, in dataset order.
///
/// The view borrows from the dataset; it is rebuilt from scratch whenever the
/// filter changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn from_records(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }
}

/// Keep records with `start <= day <= end`, an allowed region and an allowed
/// category. Empty allow-sets select nothing.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let records = dataset
        .records
        .iter()
        .filter(|r| matches(r, spec))
        .collect();
    FilteredView { records }
}

fn matches(record: &Record, spec: &FilterSpec) -> bool {
    spec.range.contains(record.day())
        && spec.regions.contains(&record.region)
        && spec.categories.contains(&record.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{day, sample_dataset};
    use crate::domain::DateRange;

    #[test]
    fn unfiltered_keeps_everything() {
        let ds = sample_dataset();
        let view = apply(&ds, &FilterSpec::unfiltered(&ds));
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn empty_regions_select_nothing() {
        let ds = sample_dataset();
        let wide = DateRange::new(day(2000, 1, 1), day(2100, 1, 1));
        let spec = FilterSpec::unfiltered(&ds)
            .with_range(wide)
            .with_regions(Vec::<String>::new());
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn empty_categories_select_nothing() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds).with_categories(Vec::<String>::new());
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn both_endpoints_are_inclusive() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds)
            .with_range(DateRange::new(day(2024, 1, 5), day(2024, 2, 1)));
        let lines: Vec<usize> = apply(&ds, &spec).iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);

        // A start one day past the first record excludes it.
        let spec = FilterSpec::unfiltered(&ds)
            .with_range(DateRange::new(day(2024, 1, 6), day(2024, 2, 1)));
        let lines: Vec<usize> = apply(&ds, &spec).iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn single_day_range() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds)
            .with_range(DateRange::new(day(2024, 2, 1), day(2024, 2, 1)));
        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].amount, Some(200.0));
    }

    #[test]
    fn inverted_range_is_empty() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds)
            .with_range(DateRange::new(day(2024, 2, 1), day(2024, 1, 1)));
        assert!(apply(&ds, &spec).is_empty());
    }

    #[test]
    fn region_and_category_sets() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds).with_regions(["North"]);
        assert_eq!(apply(&ds, &spec).len(), 2);

        let spec = FilterSpec::unfiltered(&ds).with_categories(["Food"]);
        let view = apply(&ds, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].region, "South");
    }
}
