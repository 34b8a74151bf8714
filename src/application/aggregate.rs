// Aggregator - Summary statistics over a record collection
use crate::domain::record::Record;
use crate::domain::view::Breakdown;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Count occurrences of each value in first-seen order.
pub fn tally<'a, I>(values: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|c| c.category == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: value.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// Count records per observed value of `field`. Set-valued fields count
/// every member once per record.
pub fn count_by<R: Record>(records: &[R], field: &str) -> Vec<CategoryCount> {
    tally(records.iter().flat_map(|r| {
        let mut values = r.category_values(field);
        let mut seen = HashSet::new();
        values.retain(|v| seen.insert(*v));
        values
    }))
}

pub fn counts_to_breakdown(counts: &[CategoryCount]) -> Breakdown {
    let mut breakdown = Breakdown::new();
    for c in counts {
        breakdown.push(c.category.clone(), c.count as f64);
    }
    breakdown
}

pub fn count_matching<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|i| predicate(i)).count()
}

pub fn sum_by<T>(items: &[T], value: impl Fn(&T) -> f64) -> f64 {
    items.iter().map(value).sum()
}

/// Mean over items whose value applies. `None` values are left out of the
/// divisor; yields 0 when nothing qualifies.
pub fn average_by<T>(items: &[T], value: impl Fn(&T) -> Option<f64>) -> f64 {
    let (sum, n) = items
        .iter()
        .filter_map(value)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Share of a total; keeps the unrounded value for chained computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage {
    pub raw: f64,
}

impl Percentage {
    pub fn of(count: usize, total: usize) -> Self {
        let raw = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        Self { raw }
    }

    /// Rounded to one decimal place.
    pub fn display(&self) -> f64 {
        round_to(self.raw, 1)
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// First `k` items by `key`, descending. Ties keep their input order.
pub fn top_k<T: Clone>(items: &[T], k: usize, key: impl Fn(&T) -> f64) -> Vec<T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked.into_iter().take(k).cloned().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub flagged: Vec<T>,
    pub not_flagged: Vec<T>,
}

pub fn partition_by<T: Clone>(items: &[T], flag: impl Fn(&T) -> bool) -> Partition<T> {
    let (flagged, not_flagged): (Vec<T>, Vec<T>) = items.iter().cloned().partition(|i| flag(i));
    Partition {
        flagged,
        not_flagged,
    }
}
