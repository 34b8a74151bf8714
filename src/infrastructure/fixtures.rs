// Built-in program records used to seed the fixture store
use crate::domain::family::{Family, FamilyTag};
use crate::domain::student::{Grade, Performance, Student};
use crate::domain::tutor::{Tutor, TutorStatus};
use crate::domain::volunteer::Volunteer;
use crate::domain::woman::{Stage, WomanInProgram};
use chrono::NaiveDate;
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn families() -> Vec<Family> {
    let family = |id, name: &str, area: &str, tag, members, last_contact| Family {
        id,
        name: name.to_string(),
        area: area.to_string(),
        tag,
        members,
        last_contact,
    };
    vec![
        family(1, "Sharma Family", "Malviya Nagar", FamilyTag::HighPotential, 5, date(2024, 6, 15)),
        family(2, "Kumar Family", "Saket", FamilyTag::AtRisk, 4, date(2024, 6, 10)),
        family(3, "Singh Family", "Lajpat Nagar", FamilyTag::Stable, 6, date(2024, 6, 18)),
        family(4, "Gupta Family", "Greater Kailash", FamilyTag::AtRisk, 3, date(2024, 6, 5)),
        family(5, "Verma Family", "Nehru Place", FamilyTag::HighPotential, 4, date(2024, 6, 20)),
    ]
}

pub fn students() -> Vec<Student> {
    let student = |id, name: &str, grade, area: &str, attendance, performance, scores: [u8; 3]| {
        let subjects: BTreeMap<String, u8> = ["math", "science", "english"]
            .iter()
            .map(|s| s.to_string())
            .zip(scores)
            .collect();
        Student {
            id,
            name: name.to_string(),
            grade,
            area: area.to_string(),
            attendance,
            performance,
            subjects,
        }
    };
    vec![
        student(1, "Rahul Sharma", Grade::Tenth, "Malviya Nagar", 95, Performance::Excellent, [85, 90, 88]),
        student(2, "Priya Kumar", Grade::Eighth, "Saket", 45, Performance::AtRisk, [55, 60, 65]),
        student(3, "Amit Singh", Grade::Ninth, "Lajpat Nagar", 88, Performance::Good, [78, 82, 75]),
        student(4, "Sneha Gupta", Grade::Seventh, "Greater Kailash", 35, Performance::AtRisk, [45, 50, 55]),
        student(5, "Vikash Verma", Grade::Tenth, "Nehru Place", 92, Performance::Excellent, [95, 88, 90]),
    ]
}

pub fn tutors() -> Vec<Tutor> {
    let tutor = |id, name: &str, area: &str, sessions, last_active, status, subjects: &[&str]| Tutor {
        id,
        name: name.to_string(),
        area: area.to_string(),
        sessions,
        last_active,
        status,
        subjects: strings(subjects),
    };
    vec![
        tutor(1, "Dr. Rajesh Kumar", "Malviya Nagar", 45, date(2024, 6, 20), TutorStatus::Active, &["Math", "Science"]),
        tutor(2, "Priya Sharma", "Saket", 32, date(2024, 6, 12), TutorStatus::Inactive, &["English", "Hindi"]),
        tutor(3, "Amit Singh", "Lajpat Nagar", 38, date(2024, 6, 19), TutorStatus::Active, &["Math", "Physics"]),
        tutor(4, "Sneha Gupta", "Greater Kailash", 28, date(2024, 6, 10), TutorStatus::Inactive, &["English", "Social Studies"]),
        tutor(5, "Vikram Verma", "Nehru Place", 52, date(2024, 6, 21), TutorStatus::Active, &["Science", "Math"]),
    ]
}

pub fn volunteers() -> Vec<Volunteer> {
    let volunteer = |id, name: &str, interest: &str, score, last_event, events, badges: &[&str]| Volunteer {
        id,
        name: name.to_string(),
        interest_area: interest.to_string(),
        feedback_score: score,
        last_event,
        events_attended: events,
        badges: strings(badges),
    };
    vec![
        volunteer(1, "Anjali Mehta", "Education", 4.8, date(2024, 6, 18), 12, &["Consistent", "Educator"]),
        volunteer(2, "Rohit Sharma", "Community Outreach", 4.5, date(2024, 6, 15), 8, &["Helper"]),
        volunteer(3, "Kavita Singh", "Women Empowerment", 4.9, date(2024, 6, 20), 15, &["Mentor", "Star Volunteer"]),
        volunteer(4, "Arjun Gupta", "Technology", 4.2, date(2024, 6, 12), 5, &["Tech Helper"]),
        volunteer(5, "Deepika Verma", "Health & Wellness", 4.7, date(2024, 6, 19), 10, &["Health Advocate", "Consistent"]),
    ]
}

pub fn women() -> Vec<WomanInProgram> {
    let woman = |id, name: &str, skill: &str, area: &str, stage: Stage, income| WomanInProgram {
        id,
        name: name.to_string(),
        skill: skill.to_string(),
        area: area.to_string(),
        stage,
        income,
        progress: stage.nominal_progress(),
    };
    vec![
        woman(1, "Sunita Devi", "Tailoring", "Malviya Nagar", Stage::Business, 15000),
        woman(2, "Meera Sharma", "Handicrafts", "Saket", Stage::Income, 8000),
        woman(3, "Asha Singh", "Cooking", "Lajpat Nagar", Stage::Tool, 0),
        woman(4, "Rekha Gupta", "Beauty Services", "Greater Kailash", Stage::Training, 0),
        woman(5, "Kamala Verma", "Tailoring", "Nehru Place", Stage::Income, 12000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;

    #[test]
    fn test_fixtures_are_valid() {
        assert!(families().iter().all(|r| r.validate().is_ok()));
        assert!(students().iter().all(|r| r.validate().is_ok()));
        assert!(tutors().iter().all(|r| r.validate().is_ok()));
        assert!(volunteers().iter().all(|r| r.validate().is_ok()));
        assert!(women().iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_student_subject_scores() {
        let rahul = &students()[0];
        assert_eq!(rahul.subjects.get("science"), Some(&90));
        assert_eq!(rahul.subjects.len(), 3);
    }
}
