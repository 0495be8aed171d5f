//! Seed data for the in-memory catalog.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    AcademicBackground, DegreeLevel, EntryRequirements, LanguageRequirements, Location, Program,
    Ranking, ShortlistItem, TestScores, University, User, UserProfile,
};

/// Password accepted for every seeded account.
pub const SEED_PASSWORD: &str = "password";

pub const SEED_EMAIL: &str = "john.doe@example.com";

fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn universities() -> Vec<University> {
    vec![
        University {
            id: "1".to_string(),
            name: "Harvard University".to_string(),
            slug: "harvard-university".to_string(),
            country: "United States".to_string(),
            city: "Cambridge".to_string(),
            logo: Some("https://picsum.photos/100/100?random=1".to_string()),
            images: strings(&[
                "https://images.unsplash.com/photo-1562774053-701939374585?w=800",
                "https://images.unsplash.com/photo-1541339907198-e08756dedf3f?w=800",
            ]),
            ranking: Some(Ranking {
                world: Some(1),
                national: Some(1),
                source: Some("QS World University Rankings".to_string()),
            }),
            website: "https://harvard.edu".to_string(),
            established: Some(1636),
            description: "Harvard University is a private Ivy League research university in Cambridge, Massachusetts.".to_string(),
        },
        University {
            id: "2".to_string(),
            name: "University of Oxford".to_string(),
            slug: "university-of-oxford".to_string(),
            country: "United Kingdom".to_string(),
            city: "Oxford".to_string(),
            logo: Some("https://picsum.photos/100/100?random=2".to_string()),
            images: strings(&[
                "https://images.unsplash.com/photo-1520637836862-4d197d17c13a?w=800",
                "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=800",
            ]),
            ranking: Some(Ranking {
                world: Some(2),
                national: Some(1),
                source: Some("QS World University Rankings".to_string()),
            }),
            website: "https://ox.ac.uk".to_string(),
            established: Some(1096),
            description: "The University of Oxford is a collegiate research university in Oxford, England.".to_string(),
        },
        University {
            id: "3".to_string(),
            name: "Stanford University".to_string(),
            slug: "stanford-university".to_string(),
            country: "United States".to_string(),
            city: "Stanford".to_string(),
            logo: Some("https://picsum.photos/100/100?random=3".to_string()),
            images: strings(&[
                "https://images.unsplash.com/photo-1564981797816-1043664bf78d?w=800",
                "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800",
            ]),
            ranking: Some(Ranking {
                world: Some(3),
                national: Some(2),
                source: Some("QS World University Rankings".to_string()),
            }),
            website: "https://stanford.edu".to_string(),
            established: Some(1885),
            description: "Stanford University is a private research university in Stanford, California.".to_string(),
        },
    ]
}

pub fn programs() -> Vec<Program> {
    let mut unis = universities().into_iter();
    let (harvard, oxford, stanford) = match (unis.next(), unis.next(), unis.next()) {
        (Some(h), Some(o), Some(s)) => (h, o, s),
        _ => return Vec::new(),
    };
    let created = day(2024, 1, 1);

    vec![
        Program {
            id: "1".to_string(),
            title: "Master of Science in Computer Science".to_string(),
            slug: "ms-computer-science".to_string(),
            university: harvard,
            degree_level: DegreeLevel::Master,
            discipline: "Computer Science".to_string(),
            duration_months: 24,
            tuition_usd: 55000,
            currency: "USD".to_string(),
            location: Location {
                city: "Cambridge".to_string(),
                country: "United States".to_string(),
                campus: Some("Main Campus".to_string()),
            },
            intakes: strings(&["Fall", "Spring"]),
            entry_requirements: EntryRequirements {
                academic: strings(&[
                    "Bachelor's degree in Computer Science or related field",
                    "GPA 3.5 or higher",
                ]),
                language: LanguageRequirements {
                    ielts_min: Some(7.0),
                    toefl_min: Some(100),
                    other: Vec::new(),
                },
                other: strings(&[
                    "GRE required",
                    "3 letters of recommendation",
                    "Statement of purpose",
                ]),
            },
            application_deadline: NaiveDate::from_ymd_opt(2024, 12, 15),
            scholarships_available: true,
            acceptance_rate: Some(8.0),
            description: "A comprehensive graduate program in computer science covering algorithms, systems, AI, and more.".to_string(),
            highlights: strings(&[
                "World-class faculty",
                "State-of-the-art research facilities",
                "Strong industry connections",
                "Excellent career outcomes",
            ]),
            similar_programs: Some(strings(&["2", "3"])),
            created_at: created,
            updated_at: created,
        },
        Program {
            id: "2".to_string(),
            title: "DPhil in Computer Science".to_string(),
            slug: "dphil-computer-science".to_string(),
            university: oxford,
            degree_level: DegreeLevel::Phd,
            discipline: "Computer Science".to_string(),
            duration_months: 48,
            tuition_usd: 45000,
            currency: "GBP".to_string(),
            location: Location {
                city: "Oxford".to_string(),
                country: "United Kingdom".to_string(),
                campus: Some("Main Campus".to_string()),
            },
            intakes: strings(&["Michaelmas", "Hilary", "Trinity"]),
            entry_requirements: EntryRequirements {
                academic: strings(&[
                    "Master's degree in Computer Science or related field",
                    "First-class honours or equivalent",
                ]),
                language: LanguageRequirements {
                    ielts_min: Some(7.5),
                    toefl_min: Some(110),
                    other: Vec::new(),
                },
                other: strings(&[
                    "Research proposal",
                    "3 academic references",
                    "Interview required",
                ]),
            },
            application_deadline: NaiveDate::from_ymd_opt(2024, 11, 30),
            scholarships_available: true,
            acceptance_rate: Some(15.0),
            description: "A research-intensive doctoral program with world-leading supervision and facilities.".to_string(),
            highlights: strings(&[
                "Cutting-edge research opportunities",
                "Tutorial system",
                "Access to Bodleian Libraries",
                "Strong alumni network",
            ]),
            similar_programs: Some(strings(&["1", "3"])),
            created_at: created,
            updated_at: created,
        },
        Program {
            id: "3".to_string(),
            title: "MS in Artificial Intelligence".to_string(),
            slug: "ms-artificial-intelligence".to_string(),
            university: stanford,
            degree_level: DegreeLevel::Master,
            discipline: "Computer Science".to_string(),
            duration_months: 18,
            tuition_usd: 58000,
            currency: "USD".to_string(),
            location: Location {
                city: "Stanford".to_string(),
                country: "United States".to_string(),
                campus: Some("Main Campus".to_string()),
            },
            intakes: strings(&["Fall"]),
            entry_requirements: EntryRequirements {
                academic: strings(&[
                    "Bachelor's degree in CS, Math, or related field",
                    "Strong mathematical background",
                ]),
                language: LanguageRequirements {
                    ielts_min: Some(7.0),
                    toefl_min: Some(100),
                    other: Vec::new(),
                },
                other: strings(&[
                    "GRE recommended",
                    "Programming experience",
                    "Statement of purpose",
                ]),
            },
            application_deadline: NaiveDate::from_ymd_opt(2024, 12, 1),
            scholarships_available: true,
            acceptance_rate: Some(12.0),
            description: "Specialized master's program focusing on artificial intelligence and machine learning.".to_string(),
            highlights: strings(&[
                "AI research labs",
                "Industry partnerships",
                "Silicon Valley location",
                "Career placement support",
            ]),
            similar_programs: Some(strings(&["1", "2"])),
            created_at: created,
            updated_at: created,
        },
    ]
}

pub fn seed_user() -> User {
    User {
        id: "user-1".to_string(),
        email: SEED_EMAIL.to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        profile: Some(UserProfile {
            interests: strings(&["Computer Science", "Artificial Intelligence"]),
            budget_usd: Some(60000),
            preferred_countries: strings(&["United States", "United Kingdom"]),
            tests_taken: TestScores {
                ielts_score: Some(7.5),
                gre_score: Some(325),
                ..Default::default()
            },
            academic_background: AcademicBackground {
                highest_degree: "Bachelor".to_string(),
                field_of_study: "Computer Science".to_string(),
                gpa: Some(3.8),
            },
            target_intake: Some("Fall 2024".to_string()),
        }),
        created_at: day(2024, 1, 1),
    }
}

/// Shortlist of the seeded user: programs 1 and 3.
pub fn seed_shortlist(programs: &[Program]) -> Vec<ShortlistItem> {
    let mut items = Vec::new();
    if let Some(program) = programs.iter().find(|p| p.id == "1") {
        items.push(ShortlistItem {
            id: "shortlist-1".to_string(),
            program: program.clone(),
            notes: "Great program, excellent faculty".to_string(),
            tags: strings(&["top-choice", "cs"]),
            created_at: day(2024, 1, 1),
        });
    }
    if let Some(program) = programs.iter().find(|p| p.id == "3") {
        items.push(ShortlistItem {
            id: "shortlist-2".to_string(),
            program: program.clone(),
            notes: "Strong AI focus".to_string(),
            tags: strings(&["ai", "machine-learning"]),
            created_at: day(2024, 1, 2),
        });
    }
    items
}

pub fn countries() -> Vec<String> {
    strings(&[
        "United States",
        "United Kingdom",
        "Canada",
        "Australia",
        "Germany",
        "France",
        "Netherlands",
        "Switzerland",
        "Sweden",
        "Singapore",
        "Japan",
        "South Korea",
    ])
}

pub fn disciplines() -> Vec<String> {
    strings(&[
        "Computer Science",
        "Engineering",
        "Business Administration",
        "Medicine",
        "Law",
        "Psychology",
        "Economics",
        "Physics",
        "Chemistry",
        "Biology",
        "Mathematics",
        "Art & Design",
        "Literature",
        "History",
        "Philosophy",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let programs = programs();
        assert_eq!(programs.len(), 3);
        assert_eq!(universities().len(), 3);
        assert_eq!(countries().len(), 12);
        assert_eq!(disciplines().len(), 15);
        assert_eq!(programs[0].created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_seed_shortlist_references_catalog() {
        let items = seed_shortlist(&programs());
        let ids: Vec<&str> = items.iter().map(|i| i.program.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
