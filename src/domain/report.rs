// Report templates offered on the reports page
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportModule {
    All,
    Families,
    Students,
    Women,
    Tutors,
    Volunteers,
}

impl ReportModule {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "families" => Some(ReportModule::Families),
            "students" => Some(ReportModule::Students),
            "women" => Some(ReportModule::Women),
            "tutors" => Some(ReportModule::Tutors),
            "volunteers" => Some(ReportModule::Volunteers),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTemplate {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub modules: &'static [ReportModule],
}

impl ReportTemplate {
    /// Whether the template covers `module`; the all-module template covers every one.
    pub fn covers(&self, module: ReportModule) -> bool {
        self.modules
            .iter()
            .any(|m| *m == ReportModule::All || *m == module)
    }
}

pub fn catalog() -> Vec<ReportTemplate> {
    vec![
        ReportTemplate {
            id: 1,
            name: "Monthly Impact Report",
            description: "Comprehensive overview of all programs",
            modules: &[ReportModule::All],
        },
        ReportTemplate {
            id: 2,
            name: "Student Performance Report",
            description: "Academic progress and attendance",
            modules: &[ReportModule::Students],
        },
        ReportTemplate {
            id: 3,
            name: "Women Empowerment Progress",
            description: "Income and skill development tracking",
            modules: &[ReportModule::Women],
        },
        ReportTemplate {
            id: 4,
            name: "Tutor Activity Report",
            description: "Teaching hours and engagement",
            modules: &[ReportModule::Tutors],
        },
        ReportTemplate {
            id: 5,
            name: "Volunteer Engagement Report",
            description: "Event participation and feedback",
            modules: &[ReportModule::Volunteers],
        },
        ReportTemplate {
            id: 6,
            name: "Family Support Analysis",
            description: "Family status and intervention needs",
            modules: &[ReportModule::Families],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_template_covers_every_module() {
        let templates = catalog();
        let monthly = &templates[0];
        assert!(monthly.covers(ReportModule::Tutors));
        assert!(monthly.covers(ReportModule::Families));

        let students = &templates[1];
        assert!(students.covers(ReportModule::Students));
        assert!(!students.covers(ReportModule::Women));
    }

    #[test]
    fn test_module_keys() {
        assert_eq!(ReportModule::from_key("women"), Some(ReportModule::Women));
        assert_eq!(ReportModule::from_key("all"), None);
    }
}
