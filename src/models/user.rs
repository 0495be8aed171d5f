//! User accounts, profiles and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standardised test results reported by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toefl_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gre_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmat_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat_score: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicBackground {
    pub highest_degree: String,
    pub field_of_study: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
}

/// Preferences used for recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<u32>,
    #[serde(default)]
    pub preferred_countries: Vec<String>,
    #[serde(default)]
    pub tests_taken: TestScores,
    #[serde(default)]
    pub academic_background: AcademicBackground,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_intake: Option<String>,
}

/// Partial profile update; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_taken: Option<TestScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_background: Option<AcademicBackground>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_intake: Option<String>,
}

impl UserProfile {
    /// Applies every field set in `update`.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(interests) = update.interests {
            self.interests = interests;
        }
        if update.budget_usd.is_some() {
            self.budget_usd = update.budget_usd;
        }
        if let Some(countries) = update.preferred_countries {
            self.preferred_countries = countries;
        }
        if let Some(tests) = update.tests_taken {
            self.tests_taken = tests;
        }
        if let Some(background) = update.academic_background {
            self.academic_background = background;
        }
        if update.target_intake.is_some() {
            self.target_intake = update.target_intake;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    pub created_at: DateTime<Utc>,
}

/// Successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if !self.email.contains('@') {
            return Some("Email address is invalid".to_string());
        }
        if self.password.is_empty() {
            return Some("Password cannot be empty".to_string());
        }
        None
    }
}

/// Enquiry submitted to admissions counsellors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub country: String,
    #[serde(default)]
    pub interested_programs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_intake: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LeadForm {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        if !self.email.contains('@') {
            return Some("Email address is invalid".to_string());
        }
        None
    }
}
