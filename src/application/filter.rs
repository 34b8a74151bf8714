// Filter predicate set - Name search AND categorical matches
use crate::domain::record::Record;
use chrono::NaiveDate;
use std::collections::HashMap;

const ALL_SENTINEL: &str = "all";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// `"all"` and the empty string mean no constraint.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL_SENTINEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(raw.to_string())
        }
    }

    pub fn matches(&self, values: &[&str]) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(wanted) => values.iter().any(|v| v == wanted),
        }
    }
}

/// Inclusive date bounds; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// `from` and `to` as `YYYY-MM-DD`. A value that does not parse leaves
    /// that bound open.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            from: parse_date(params, "from"),
            to: parse_date(params, "to"),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

fn parse_date(params: &HashMap<String, String>, key: &str) -> Option<NaiveDate> {
    let raw = params.get(key).filter(|raw| !raw.is_empty())?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!("Ignoring {}={}: {}", key, raw, e);
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub categories: Vec<(String, CategoryFilter)>,
    /// Only consulted by pages that scope records by date.
    pub dates: DateRange,
}

static NO_FILTER: CategoryFilter = CategoryFilter::All;

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = dates;
        self
    }

    /// Set the filter for `field`, replacing any earlier one.
    pub fn with_category(mut self, field: impl Into<String>, filter: CategoryFilter) -> Self {
        let field = field.into();
        match self.categories.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = filter,
            None => self.categories.push((field, filter)),
        }
        self
    }

    pub fn category(&self, field: &str) -> &CategoryFilter {
        self.categories
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, filter)| filter)
            .unwrap_or(&NO_FILTER)
    }

    /// Lift `search` and the listed fields out of query parameters; other
    /// keys are ignored.
    pub fn from_params(params: &HashMap<String, String>, fields: &[&str]) -> Self {
        let mut criteria = FilterCriteria::new();
        if let Some(search) = params.get("search") {
            criteria = criteria.with_search(search.as_str());
        }
        for field in fields {
            if let Some(raw) = params.get(*field) {
                criteria = criteria.with_category(*field, CategoryFilter::parse(raw));
            }
        }
        criteria
    }

    pub fn for_record<R: Record>(params: &HashMap<String, String>) -> Self {
        Self::from_params(params, R::CATEGORICAL_FIELDS)
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_search(record.name())
            && self
                .categories
                .iter()
                .all(|(field, filter)| filter.matches(&record.category_values(field)))
    }

    fn matches_search(&self, name: &str) -> bool {
        self.search.is_empty() || name.to_lowercase().contains(&self.search.to_lowercase())
    }
}

/// Subset of `records` satisfying every active predicate, in source order.
pub fn apply<R: Record>(records: &[R], criteria: &FilterCriteria) -> Vec<R> {
    records
        .iter()
        .filter(|r| criteria.matches(*r))
        .cloned()
        .collect()
}
