use super::DomainPage;
use crate::application::aggregate::{count_matching, partition_by, sum_by};
use crate::application::filter::{apply, FilterCriteria};
use crate::application::view_model::ViewContext;
use crate::domain::record::RecordId;
use crate::domain::tutor::Tutor;
use crate::domain::view::{ChartPoint, Notice, NoticeLevel, PageView, Summary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorRow {
    #[serde(flatten)]
    pub tutor: Tutor,
    pub days_since_active: i64,
}

impl DomainPage for Tutor {
    type Row = TutorRow;

    fn build_view(
        records: &[Self],
        _flagged: &[RecordId],
        criteria: &FilterCriteria,
        ctx: &ViewContext,
    ) -> PageView<Self::Row> {
        let tutors = apply(records, criteria);
        let idle = partition_by(&tutors, |t| {
            t.days_since_active(ctx.today) > ctx.thresholds.inactive_days
        });

        let total_sessions = sum_by(&tutors, |t| f64::from(t.sessions));
        let average_sessions = if tutors.is_empty() {
            0.0
        } else {
            (total_sessions / tutors.len() as f64).round()
        };

        let summary = Summary::new()
            .count("active_tutors", count_matching(&tutors, Tutor::is_active))
            .count("inactive_tutors", count_matching(&tutors, |t| !t.is_active()))
            .count("total_sessions", total_sessions as usize)
            .number("average_sessions", average_sessions)
            .count("inactive_beyond_threshold", idle.flagged.len());

        let mut notices = Vec::new();
        if !idle.flagged.is_empty() {
            notices.push(Notice::new(
                NoticeLevel::Warning,
                format!(
                    "{} tutors have been inactive for more than {} days and may need follow-up",
                    idle.flagged.len(),
                    ctx.thresholds.inactive_days
                ),
                idle.flagged.len(),
            ));
        }

        let chart = tutors
            .iter()
            .map(|t| ChartPoint::new(t.name.clone(), f64::from(t.sessions)))
            .collect();

        let rows = tutors
            .into_iter()
            .map(|tutor| TutorRow {
                days_since_active: tutor.days_since_active(ctx.today),
                tutor,
            })
            .collect();

        PageView::new(rows, summary, chart).with_notices(notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::filter::CategoryFilter;
    use crate::application::view_model::Thresholds;
    use crate::infrastructure::fixtures;
    use chrono::NaiveDate;

    fn ctx_on(y: i32, m: u32, d: u32) -> ViewContext {
        ViewContext::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), Thresholds::default())
    }

    #[test]
    fn test_summary() {
        let view = Tutor::build_view(&fixtures::tutors(), &[], &FilterCriteria::new(), &ctx_on(2024, 6, 21));
        assert_eq!(view.summary.value("active_tutors"), Some(3.0));
        assert_eq!(view.summary.value("inactive_tutors"), Some(2.0));
        assert_eq!(view.summary.value("total_sessions"), Some(195.0));
        assert_eq!(view.summary.value("average_sessions"), Some(39.0));
    }

    #[test]
    fn test_inactivity_is_measured_from_evaluation_date() {
        // 2024-06-12 and 2024-06-10 are 9 and 11 days before the 21st.
        let view = Tutor::build_view(&fixtures::tutors(), &[], &FilterCriteria::new(), &ctx_on(2024, 6, 21));
        assert_eq!(view.summary.value("inactive_beyond_threshold"), Some(2.0));
        assert_eq!(view.notices[0].level, NoticeLevel::Warning);

        let view = Tutor::build_view(&fixtures::tutors(), &[], &FilterCriteria::new(), &ctx_on(2024, 6, 18));
        // 6 and 8 days: only the second is beyond 7.
        assert_eq!(view.summary.value("inactive_beyond_threshold"), Some(1.0));
    }

    #[test]
    fn test_rows_carry_days_since_active() {
        let criteria = FilterCriteria::new().with_category("status", CategoryFilter::parse("Inactive"));
        let view = Tutor::build_view(&fixtures::tutors(), &[], &criteria, &ctx_on(2024, 6, 21));
        let days: Vec<_> = view.filtered_rows.iter().map(|r| r.days_since_active).collect();
        assert_eq!(days, vec![9, 11]);

        let json = serde_json::to_value(&view.filtered_rows[0]).unwrap();
        assert_eq!(json["name"], "Priya Sharma");
        assert_eq!(json["days_since_active"], 9);
    }

    #[test]
    fn test_empty_average_is_zero() {
        let criteria = FilterCriteria::new().with_search("zzz");
        let view = Tutor::build_view(&fixtures::tutors(), &[], &criteria, &ctx_on(2024, 6, 21));
        assert_eq!(view.summary.value("average_sessions"), Some(0.0));
        assert!(view.notices.is_empty());
    }
}
