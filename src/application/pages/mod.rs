// Per-page view models
pub mod dashboard;
pub mod families;
pub mod reports;
pub mod students;
pub mod tutors;
pub mod volunteers;
pub mod women;

use crate::application::filter::FilterCriteria;
use crate::application::view_model::ViewContext;
use crate::domain::record::{Record, RecordId};
use crate::domain::view::PageView;
use serde::Serialize;

/// A domain whose page is a filtered table with summary cards and a chart.
///
/// Summaries and charts are computed over the filtered rows, so every
/// filter change re-derives the whole page.
pub trait DomainPage: Record {
    type Row: Serialize + Send + Sync;

    fn build_view(
        records: &[Self],
        flagged: &[RecordId],
        criteria: &FilterCriteria,
        ctx: &ViewContext,
    ) -> PageView<Self::Row>;
}
