use super::DomainPage;
use crate::application::aggregate::{average_by, count_matching, partition_by, tally};
use crate::application::filter::{apply, FilterCriteria};
use crate::application::view_model::ViewContext;
use crate::domain::record::RecordId;
use crate::domain::student::{AttendanceBand, Performance, Student};
use crate::domain::view::{Breakdown, ChartPoint, Notice, NoticeLevel, PageView, Summary};

impl DomainPage for Student {
    type Row = Self;

    fn build_view(
        records: &[Self],
        _flagged: &[RecordId],
        criteria: &FilterCriteria,
        ctx: &ViewContext,
    ) -> PageView<Self::Row> {
        let rows = apply(records, criteria);
        let low = partition_by(&rows, |s| s.attendance < ctx.thresholds.low_attendance);

        let average_attendance = average_by(&rows, |s| Some(f64::from(s.attendance))).round();

        let mut bands = Breakdown::new();
        for band in AttendanceBand::ALL {
            let count = count_matching(&rows, |s| s.attendance_band() == band);
            bands.push(band.as_str(), count as f64);
        }

        let summary = Summary::new()
            .count("total_students", rows.len())
            .count(
                "at_risk",
                count_matching(&rows, |s| s.performance == Performance::AtRisk),
            )
            .count(
                "excellent",
                count_matching(&rows, |s| s.performance == Performance::Excellent),
            )
            .number("average_attendance", average_attendance)
            .count("low_attendance", low.flagged.len())
            .breakdown("attendance_bands", bands);

        let mut notices = Vec::new();
        if !low.flagged.is_empty() {
            notices.push(Notice::new(
                NoticeLevel::Urgent,
                format!(
                    "{} students have attendance below {}% and need immediate attention",
                    low.flagged.len(),
                    ctx.thresholds.low_attendance
                ),
                low.flagged.len(),
            ));
        }

        let chart = subject_averages(&rows);
        PageView::new(rows, summary, chart).with_notices(notices)
    }
}

/// Mean score per subject over the students that have one, ordered by
/// subject name.
fn subject_averages(students: &[Student]) -> Vec<ChartPoint> {
    let mut subjects: Vec<String> = tally(
        students
            .iter()
            .flat_map(|s| s.subjects.keys().map(String::as_str)),
    )
    .into_iter()
    .map(|c| c.category)
    .collect();
    subjects.sort();

    subjects
        .into_iter()
        .map(|subject| {
            let avg = average_by(students, |s| s.subjects.get(&subject).map(|v| f64::from(*v)));
            ChartPoint::new(subject, avg)
        })
        .collect()
}
