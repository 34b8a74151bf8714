// Overview page - KPIs, alerts and area impact across every domain
use crate::application::aggregate::{average_by, count_matching, tally};
use crate::application::view_model::ViewContext;
use crate::domain::family::Family;
use crate::domain::record::RecordId;
use crate::domain::student::Student;
use crate::domain::tutor::Tutor;
use crate::domain::view::{
    AreaImpact, ChartPoint, ImpactLevel, Notice, NoticeLevel, PageView, RecordWarning, Summary,
};
use crate::domain::volunteer::Volunteer;
use crate::domain::woman::{Stage, WomanInProgram};

/// Validated collections the overview is computed from.
#[derive(Debug, Clone, Default)]
pub struct DashboardInput {
    pub families: Vec<Family>,
    pub flagged_families: Vec<RecordId>,
    pub students: Vec<Student>,
    pub tutors: Vec<Tutor>,
    pub volunteers: Vec<Volunteer>,
    pub women: Vec<WomanInProgram>,
    pub warnings: Vec<RecordWarning>,
}

pub fn build(input: &DashboardInput, ctx: &ViewContext) -> PageView<AreaImpact> {
    let t = &ctx.thresholds;
    let low_attendance = count_matching(&input.students, |s| s.attendance < t.low_attendance);
    let idle_tutors = count_matching(&input.tutors, |tu| {
        tu.days_since_active(ctx.today) > t.inactive_days
    });
    let flagged_families = count_matching(&input.families, |f| {
        input.flagged_families.contains(&f.id)
    });
    let trained_women = count_matching(&input.women, |w| w.stage > Stage::Training);

    let summary = Summary::new()
        .count("total_students", input.students.len())
        .count("women_in_programs", input.women.len())
        .count("active_tutors", count_matching(&input.tutors, Tutor::is_active))
        .count("volunteers", input.volunteers.len())
        .count("at_risk_families", count_matching(&input.families, Family::is_at_risk));

    let notices = vec![
        Notice::new(
            NoticeLevel::Urgent,
            format!("{} students with <{}% attendance", low_attendance, t.low_attendance),
            low_attendance,
        ),
        Notice::new(
            NoticeLevel::Warning,
            format!("{} tutors inactive for more than {} days", idle_tutors, t.inactive_days),
            idle_tutors,
        ),
        Notice::new(
            NoticeLevel::Info,
            format!("{} families flagged for follow-up", flagged_families),
            flagged_families,
        ),
        Notice::new(
            NoticeLevel::Success,
            format!("{} women completed skill training", trained_women),
            trained_women,
        ),
    ];

    let areas = observed_areas(input);
    let chart = areas
        .iter()
        .filter(|area| input.students.iter().any(|s| &s.area == *area))
        .map(|area| {
            let avg = average_by(&input.students, |s| {
                (&s.area == area).then(|| f64::from(s.attendance))
            });
            ChartPoint::new(area.clone(), avg.round())
        })
        .collect();

    let impact = areas
        .iter()
        .map(|area| area_impact(area, input, ctx))
        .collect();

    PageView::new(impact, summary, chart)
        .with_notices(notices)
        .with_warnings(input.warnings.clone())
}

/// Areas in first-seen order across families, students, tutors and women.
fn observed_areas(input: &DashboardInput) -> Vec<String> {
    let values = input
        .families
        .iter()
        .map(|f| f.area.as_str())
        .chain(input.students.iter().map(|s| s.area.as_str()))
        .chain(input.tutors.iter().map(|t| t.area.as_str()))
        .chain(input.women.iter().map(|w| w.area.as_str()));
    tally(values).into_iter().map(|c| c.category).collect()
}

/// Share of records in `area` that are in good standing: families not at
/// risk, students at or above the attendance threshold, tutors within the
/// inactivity window and women past the training stage.
fn area_impact(area: &str, input: &DashboardInput, ctx: &ViewContext) -> AreaImpact {
    let t = &ctx.thresholds;
    let mut total = 0usize;
    let mut healthy = 0usize;

    let mut observe = |in_area: bool, good: bool| {
        if in_area {
            total += 1;
            if good {
                healthy += 1;
            }
        }
    };

    for f in &input.families {
        observe(f.area == area, !f.is_at_risk());
    }
    for s in &input.students {
        observe(s.area == area, s.attendance >= t.low_attendance);
    }
    for tu in &input.tutors {
        observe(
            tu.area == area,
            tu.days_since_active(ctx.today) <= t.inactive_days,
        );
    }
    for w in &input.women {
        observe(w.area == area, w.stage > Stage::Training);
    }

    let engagement = if total == 0 {
        0.0
    } else {
        healthy as f64 / total as f64
    };

    AreaImpact {
        area: area.to_string(),
        level: ImpactLevel::from_engagement(engagement),
        engagement: (engagement * 100.0).round() / 100.0,
        records: total,
    }
}
