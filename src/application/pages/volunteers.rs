use super::DomainPage;
use crate::application::aggregate::{
    average_by, count_by, count_matching, counts_to_breakdown, round_to, top_k,
};
use crate::application::filter::{apply, FilterCriteria};
use crate::application::view_model::ViewContext;
use crate::domain::record::RecordId;
use crate::domain::view::{Breakdown, ChartPoint, PageView, Ranked, Summary};
use crate::domain::volunteer::{FeedbackBand, Volunteer};

impl DomainPage for Volunteer {
    type Row = Self;

    fn build_view(
        records: &[Self],
        _flagged: &[RecordId],
        criteria: &FilterCriteria,
        ctx: &ViewContext,
    ) -> PageView<Self::Row> {
        let rows = apply(records, criteria);

        let top = top_k(&rows, ctx.thresholds.top_volunteers, |v| v.feedback_score);
        let leaderboard: Vec<Ranked> = top
            .iter()
            .map(|v| Ranked {
                id: v.id,
                name: v.name.clone(),
                score: v.feedback_score,
            })
            .collect();

        let mut bands = Breakdown::new();
        for band in FeedbackBand::ALL {
            let count = count_matching(&rows, |v| v.feedback_band() == band);
            bands.push(band.as_str(), count as f64);
        }

        let summary = Summary::new()
            .count("total_volunteers", rows.len())
            .count(
                "repeat_volunteers",
                count_matching(&rows, |v| v.events_attended >= ctx.thresholds.repeat_events),
            )
            .number(
                "average_feedback",
                round_to(average_by(&rows, |v| Some(v.feedback_score)), 1),
            )
            .count(
                "total_events",
                rows.iter().map(|v| v.events_attended as usize).sum(),
            )
            .ranking("top_volunteers", leaderboard)
            .breakdown("badges", counts_to_breakdown(&count_by(&rows, "badge")))
            .breakdown("feedback_bands", bands);

        let chart: Vec<ChartPoint> = top
            .iter()
            .map(|v| ChartPoint::new(v.name.clone(), v.feedback_score))
            .collect();
        PageView::new(rows, summary, chart)
    }
}
