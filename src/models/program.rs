//! Catalog models: universities and the programs they offer.
//!
//! Programs are read-only projections of backend state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

/// Rank assumed for universities without a world ranking when sorting.
pub const UNRANKED: u32 = 999;

/// Published rankings of a university.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// University snapshot embedded in every program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub country: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ranking>,
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established: Option<i32>,
    pub description: String,
}

impl University {
    /// World rank, or [`UNRANKED`] when none is published.
    pub fn world_rank(&self) -> u32 {
        self.ranking
            .as_ref()
            .and_then(|r| r.world)
            .unwrap_or(UNRANKED)
    }
}

/// Name and slug pair returned by the university metadata listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversitySummary {
    pub name: String,
    pub slug: String,
}

impl From<&University> for UniversitySummary {
    fn from(university: &University) -> Self {
        Self {
            name: university.name.clone(),
            slug: university.slug.clone(),
        }
    }
}

// == Degree Level ==
/// Level of the awarded degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    Bachelor,
    Master,
    Phd,
    Diploma,
    Certificate,
}

impl DegreeLevel {
    pub const ALL: [DegreeLevel; 5] = [
        DegreeLevel::Bachelor,
        DegreeLevel::Master,
        DegreeLevel::Phd,
        DegreeLevel::Diploma,
        DegreeLevel::Certificate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeLevel::Bachelor => "bachelor",
            DegreeLevel::Master => "master",
            DegreeLevel::Phd => "phd",
            DegreeLevel::Diploma => "diploma",
            DegreeLevel::Certificate => "certificate",
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DegreeLevel {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DegreeLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| DiscoveryError::Validation(format!("Unknown degree level '{}'", s)))
    }
}

/// Where a program is taught.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
}

/// Minimum language test scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toefl_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
}

/// Admission criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryRequirements {
    #[serde(default)]
    pub academic: Vec<String>,
    #[serde(default)]
    pub language: LanguageRequirements,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
}

// == Program ==
/// A study program offered by a university.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub university: University,
    pub degree_level: DegreeLevel,
    pub discipline: String,
    pub duration_months: u32,
    pub tuition_usd: u32,
    pub currency: String,
    pub location: Location,
    #[serde(default)]
    pub intakes: Vec<String>,
    #[serde(default)]
    pub entry_requirements: EntryRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    pub scholarships_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<f64>,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_programs: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// Case-insensitive substring match against title, university name or discipline.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.university.name.to_lowercase().contains(needle)
            || self.discipline.to_lowercase().contains(needle)
    }

    /// Public page path: `/program/{country}/{university}/{slug}-{id}`.
    pub fn page_path(&self) -> String {
        format!(
            "/program/{}/{}/{}-{}",
            self.university.country.to_lowercase().replace(' ', "-"),
            self.university.slug,
            self.slug,
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fixtures;

    #[test]
    fn test_degree_level_parse() {
        assert_eq!("master".parse::<DegreeLevel>().unwrap(), DegreeLevel::Master);
        assert_eq!("phd".parse::<DegreeLevel>().unwrap(), DegreeLevel::Phd);
        assert!("masters".parse::<DegreeLevel>().is_err());
    }

    #[test]
    fn test_degree_level_serializes_lowercase() {
        let json = serde_json::to_string(&DegreeLevel::Certificate).unwrap();
        assert_eq!(json, "\"certificate\"");
    }

    #[test]
    fn test_world_rank_defaults_to_unranked() {
        let mut university = fixtures::universities().remove(0);
        assert_eq!(university.world_rank(), 1);
        university.ranking = None;
        assert_eq!(university.world_rank(), UNRANKED);
    }

    #[test]
    fn test_matches_text_fields() {
        let program = fixtures::programs().remove(0);
        assert!(program.matches_text("computer"));
        assert!(program.matches_text("harvard"));
        assert!(!program.matches_text("medicine"));
    }

    #[test]
    fn test_page_path() {
        let program = fixtures::programs().remove(0);
        assert_eq!(
            program.page_path(),
            "/program/united-states/harvard-university/ms-computer-science-1"
        );
    }

    #[test]
    fn test_program_deserializes_backend_shape() {
        let json = r#"{
            "id": "9",
            "title": "BSc Physics",
            "slug": "bsc-physics",
            "university": {
                "id": "u9", "name": "Test University", "slug": "test-university",
                "country": "Canada", "city": "Toronto", "website": "https://t.ca",
                "description": "d"
            },
            "degree_level": "bachelor",
            "discipline": "Physics",
            "duration_months": 36,
            "tuition_usd": 30000,
            "currency": "CAD",
            "location": {"city": "Toronto", "country": "Canada"},
            "application_deadline": "2025-01-15",
            "scholarships_available": false,
            "description": "d",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let program: Program = serde_json::from_str(json).unwrap();
        assert_eq!(program.degree_level, DegreeLevel::Bachelor);
        assert_eq!(
            program.application_deadline,
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert!(program.similar_programs.is_none());
        assert_eq!(program.university.world_rank(), UNRANKED);
    }
}
