// Render-ready page output consumed by the presentation layer
use super::record::RecordId;
use serde::ser::Serializer;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Ordered label -> number mapping. Serializes as a JSON object whose keys
/// keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown(Vec<ChartPoint>);

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.0.push(ChartPoint::new(label, value));
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|p| p.label == label).map(|p| p.value)
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.0
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|p| (&p.label, p.value)))
    }
}

/// One place in a leaderboard. Names may repeat, so entries carry the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub id: RecordId,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Count(u64),
    Number(f64),
    Breakdown(Breakdown),
    Ranking(Vec<Ranked>),
}

impl SummaryValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SummaryValue::Count(n) => Some(*n as f64),
            SummaryValue::Number(v) => Some(*v),
            SummaryValue::Breakdown(_) | SummaryValue::Ranking(_) => None,
        }
    }

    pub fn as_breakdown(&self) -> Option<&Breakdown> {
        match self {
            SummaryValue::Breakdown(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_ranking(&self) -> Option<&[Ranked]> {
        match self {
            SummaryValue::Ranking(r) => Some(r.as_slice()),
            _ => None,
        }
    }
}

/// Named page metrics in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary(Vec<(&'static str, SummaryValue)>);

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, name: &'static str, value: usize) -> Self {
        self.0.push((name, SummaryValue::Count(value as u64)));
        self
    }

    pub fn number(mut self, name: &'static str, value: f64) -> Self {
        self.0.push((name, SummaryValue::Number(value)));
        self
    }

    pub fn breakdown(mut self, name: &'static str, value: Breakdown) -> Self {
        self.0.push((name, SummaryValue::Breakdown(value)));
        self
    }

    pub fn ranking(mut self, name: &'static str, value: Vec<Ranked>) -> Self {
        self.0.push((name, SummaryValue::Ranking(value)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&SummaryValue> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SummaryValue::as_f64)
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, value)| (*name, value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Urgent,
    Warning,
    Info,
    Success,
}

/// An alert banner or insight chip with the number of records behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub label: String,
    pub count: usize,
}

impl Notice {
    pub fn new(level: NoticeLevel, label: impl Into<String>, count: usize) -> Self {
        Self {
            level,
            label: label.into(),
            count,
        }
    }
}

/// A record left out of rows and aggregates because it failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordWarning {
    pub id: RecordId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<T> {
    pub filtered_rows: Vec<T>,
    pub summary: Summary,
    pub chart_series: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RecordWarning>,
}

impl<T> PageView<T> {
    pub fn new(filtered_rows: Vec<T>, summary: Summary, chart_series: Vec<ChartPoint>) -> Self {
        Self {
            filtered_rows,
            summary,
            chart_series,
            notices: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_notices(mut self, notices: Vec<Notice>) -> Self {
        self.notices = notices;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<RecordWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn from_engagement(engagement: f64) -> Self {
        if engagement > 0.7 {
            ImpactLevel::High
        } else if engagement > 0.4 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }
}

/// Engagement tile for one area on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaImpact {
    pub area: String,
    pub level: ImpactLevel,
    pub engagement: f64,
    pub records: usize,
}
