use super::DomainPage;
use crate::application::aggregate::{count_by, count_matching, counts_to_breakdown};
use crate::application::filter::{apply, FilterCriteria};
use crate::application::view_model::ViewContext;
use crate::domain::family::{Family, FamilyTag};
use crate::domain::record::RecordId;
use crate::domain::view::{PageView, Summary};

impl DomainPage for Family {
    type Row = Self;

    fn build_view(
        records: &[Self],
        flagged: &[RecordId],
        criteria: &FilterCriteria,
        _ctx: &ViewContext,
    ) -> PageView<Self::Row> {
        let rows = apply(records, criteria);

        let summary = Summary::new()
            .count("total_families", rows.len())
            .count("at_risk", count_matching(&rows, Family::is_at_risk))
            .count(
                "high_potential",
                count_matching(&rows, |f| f.tag == FamilyTag::HighPotential),
            )
            .count(
                "total_members",
                rows.iter().map(|f| f.members as usize).sum(),
            )
            .count(
                "flagged_for_follow_up",
                count_matching(&rows, |f| flagged.contains(&f.id)),
            );

        let chart = counts_to_breakdown(&count_by(&rows, "tag"))
            .points()
            .to_vec();

        PageView::new(rows, summary, chart)
    }
}
