use super::DomainPage;
use crate::application::aggregate::{average_by, count_by, count_matching, Percentage};
use crate::application::filter::{apply, FilterCriteria};
use crate::application::view_model::ViewContext;
use crate::domain::record::RecordId;
use crate::domain::view::{Breakdown, ChartPoint, PageView, Summary};
use crate::domain::woman::{Stage, WomanInProgram};

impl DomainPage for WomanInProgram {
    type Row = Self;

    fn build_view(
        records: &[Self],
        _flagged: &[RecordId],
        criteria: &FilterCriteria,
        _ctx: &ViewContext,
    ) -> PageView<Self::Row> {
        let rows = apply(records, criteria);
        let skills = count_by(&rows, "skill");

        let mut stage_counts = Breakdown::new();
        let mut stage_percentages = Breakdown::new();
        for stage in Stage::ALL {
            let count = count_matching(&rows, |w| w.stage == stage);
            stage_counts.push(stage.as_str(), count as f64);
            stage_percentages.push(stage.as_str(), Percentage::of(count, rows.len()).display());
        }

        let summary = Summary::new()
            .count("total_enrolled", rows.len())
            .number(
                "average_income",
                average_by(&rows, WomanInProgram::earning).round(),
            )
            .count(
                "business_stage",
                count_matching(&rows, |w| w.stage == Stage::Business),
            )
            .count("skills_offered", skills.len())
            .breakdown("stage_counts", stage_counts)
            .breakdown("stage_percentages", stage_percentages);

        let chart = skills
            .iter()
            .map(|skill| {
                let avg = average_by(&rows, |w| {
                    if w.skill == skill.category {
                        w.earning()
                    } else {
                        None
                    }
                });
                ChartPoint::new(skill.category.clone(), avg.round())
            })
            .collect();

        PageView::new(rows, summary, chart)
    }
}
