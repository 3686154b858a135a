//! Group-by aggregation.

use std::collections::BTreeMap;

use call_center_analytics_models::CountRow;
use call_center_incident_models::{CanonicalRecord, Flag};

use crate::view::{ColumnValue, GroupColumn, Measure, RecordView};

/// Records sharing one column value.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    /// The shared value.
    pub key: ColumnValue,
    /// Members in view order.
    pub records: Vec<&'a CanonicalRecord>,
}

impl Group<'_> {
    /// Number of records in the group.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Records with `flag` set.
    #[must_use]
    pub fn count_flag(&self, flag: Flag) -> usize {
        self.records.iter().filter(|r| r.flags.get(flag)).count()
    }

    /// Records with a reporter identity.
    #[must_use]
    pub fn count_identified(&self) -> usize {
        self.records.iter().filter(|r| r.identity.is_some()).count()
    }

    /// Sum of `measure`, skipping absent values.
    #[must_use]
    pub fn sum(&self, measure: Measure) -> f64 {
        self.records.iter().filter_map(|r| measure.value(r)).sum()
    }

    /// Mean of `measure` over records where it is present.
    #[must_use]
    pub fn mean(&self, measure: Measure) -> Option<f64> {
        let (sum, n) = self
            .records
            .iter()
            .filter_map(|r| measure.value(r))
            .fold((0.0, 0_u32), |(sum, n), v| (sum + v, n + 1));
        (n > 0).then(|| sum / f64::from(n))
    }

    /// Display label for the key.
    #[must_use]
    pub fn label(&self) -> String {
        self.key.to_string()
    }

    /// The group as a labelled count.
    #[must_use]
    pub fn count_row(&self) -> CountRow {
        CountRow {
            key: self.label(),
            count: self.count(),
        }
    }
}

/// Groups `view` by `column` in ascending key order. Records with an absent
/// value are skipped.
#[must_use]
pub fn group_by<'a>(view: &RecordView<'a>, column: GroupColumn) -> Vec<Group<'a>> {
    let mut groups: BTreeMap<ColumnValue, Vec<&'a CanonicalRecord>> = BTreeMap::new();
    for &record in view.records() {
        if let Some(key) = column.value(record) {
            groups.entry(key).or_default().push(record);
        }
    }
    groups
        .into_iter()
        .map(|(key, records)| Group { key, records })
        .collect()
}

/// The `n` largest groups by count. Ties are broken by ascending key.
#[must_use]
pub fn top_n(groups: Vec<Group<'_>>, n: usize) -> Vec<Group<'_>> {
    top_n_by(groups, n, Group::count)
}

/// The `n` largest groups by `size`. Ties are broken by ascending key.
#[must_use]
pub fn top_n_by<'a>(
    mut groups: Vec<Group<'a>>,
    n: usize,
    size: impl Fn(&Group<'a>) -> usize,
) -> Vec<Group<'a>> {
    groups.sort_by(|a, b| size(b).cmp(&size(a)).then_with(|| a.key.cmp(&b.key)));
    groups.truncate(n);
    groups
}

/// Labelled counts for `groups`, in order.
#[must_use]
pub fn count_rows(groups: &[Group<'_>]) -> Vec<CountRow> {
    groups.iter().map(Group::count_row).collect()
}
