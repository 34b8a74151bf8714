// Reports page - templates, smart insights and a per-area quick summary
use super::dashboard::DashboardInput;
use crate::application::aggregate::{average_by, count_matching};
use crate::application::filter::{CategoryFilter, FilterCriteria};
use crate::application::view_model::ViewContext;
use crate::domain::family::Family;
use crate::domain::report::{catalog, ReportModule, ReportTemplate};
use crate::domain::student::{Performance, Student};
use crate::domain::tutor::Tutor;
use crate::domain::view::{Notice, NoticeLevel, PageView, Summary};
use crate::domain::woman::{Stage, WomanInProgram};

pub const PAGE: &str = "reports";

pub const FILTER_FIELDS: &[&str] = &["area", "module"];

pub fn build(input: &DashboardInput, criteria: &FilterCriteria, ctx: &ViewContext) -> PageView<ReportTemplate> {
    let t = &ctx.thresholds;
    let area = criteria.category("area");

    let templates: Vec<ReportTemplate> = match criteria.category("module") {
        CategoryFilter::All => catalog(),
        CategoryFilter::Exact(key) => match ReportModule::from_key(key) {
            Some(module) => catalog().into_iter().filter(|r| r.covers(module)).collect(),
            None => Vec::new(),
        },
    };

    let dates = &criteria.dates;

    let mut families = in_area(&input.families, area, |f: &Family| f.area.as_str());
    families.retain(|f| dates.contains(f.last_contact));
    let students = in_area(&input.students, area, |s: &Student| s.area.as_str());
    let mut tutors = in_area(&input.tutors, area, |tu: &Tutor| tu.area.as_str());
    tutors.retain(|tu| dates.contains(tu.last_active));
    let women = in_area(&input.women, area, |w: &WomanInProgram| w.area.as_str());
    let volunteers: Vec<_> = input
        .volunteers
        .iter()
        .filter(|v| dates.contains(v.last_event))
        .collect();

    let dropout_risk = count_matching(&students, |s| s.performance == Performance::AtRisk);
    let low_income = count_matching(&women, |w| {
        w.stage >= Stage::Income && w.income < t.low_income
    });
    let poor_attendance = count_matching(&students, |s| s.attendance < t.low_attendance);
    let inactive_tutors = count_matching(&tutors, |tu| {
        tu.days_since_active(ctx.today) > t.inactive_days
    });
    let high_performers = count_matching(&students, |s| s.performance == Performance::Excellent);
    let new_enrollments = count_matching(&women, |w| w.stage == Stage::Training);

    let insights = vec![
        Notice::new(NoticeLevel::Urgent, "Dropout Risk", dropout_risk),
        Notice::new(NoticeLevel::Warning, "Low Income Growth", low_income),
        Notice::new(NoticeLevel::Warning, "Poor Attendance", poor_attendance),
        Notice::new(NoticeLevel::Info, "Inactive Tutors", inactive_tutors),
        Notice::new(NoticeLevel::Success, "High Performers", high_performers),
        Notice::new(NoticeLevel::Success, "New Enrollments", new_enrollments),
    ];

    // Volunteers have no home area, so only the date range scopes them.
    // Students and women carry no dates and ignore it.
    let summary = Summary::new()
        .count("total_students", students.len())
        .count("women_enrolled", women.len())
        .count("active_tutors", count_matching(&tutors, Tutor::is_active))
        .count("volunteers", volunteers.len())
        .count("at_risk_families", count_matching(&families, Family::is_at_risk))
        .number(
            "average_attendance",
            average_by(&students, |s| Some(f64::from(s.attendance))).round(),
        );

    PageView::new(templates, summary, Vec::new())
        .with_notices(insights)
        .with_warnings(input.warnings.clone())
}

fn in_area<T: Clone>(items: &[T], area: &CategoryFilter, area_of: impl Fn(&T) -> &str) -> Vec<T> {
    items
        .iter()
        .filter(|i| area.matches(&[area_of(i)]))
        .cloned()
        .collect()
}
