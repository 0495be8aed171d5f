//! Search request and result models.
//!
//! Filters are sparse: an absent facet means "no constraint". List facets are
//! never kept present-and-empty; [`SearchFilters::normalize`] removes them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};
use crate::models::program::{DegreeLevel, Program};

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

// == Value Range ==
/// Inclusive range with optional bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl ValueRange {
    pub fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

// == Facet ==
/// A single filterable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Country,
    DegreeLevel,
    Discipline,
    TuitionRange,
    IeltsMin,
    ToeflMin,
    ScholarshipsAvailable,
    DurationMonths,
}

// == Search Filters ==
/// Sparse set of facet constraints, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_level: Option<Vec<DegreeLevel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_range: Option<ValueRange>,
    /// Applicant's IELTS score; programs requiring more are excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ielts_min: Option<f64>,
    /// Applicant's TOEFL score; programs requiring more are excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toefl_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarships_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<ValueRange>,
}

impl SearchFilters {
    /// Drops empty list facets and unbounded ranges.
    pub fn normalize(&mut self) {
        if self.country.as_ref().is_some_and(Vec::is_empty) {
            self.country = None;
        }
        if self.degree_level.as_ref().is_some_and(Vec::is_empty) {
            self.degree_level = None;
        }
        if self.discipline.as_ref().is_some_and(Vec::is_empty) {
            self.discipline = None;
        }
        if self.tuition_range.is_some_and(|r| r.is_unbounded()) {
            self.tuition_range = None;
        }
        if self.duration_months.is_some_and(|r| r.is_unbounded()) {
            self.duration_months = None;
        }
    }

    /// Consuming variant of [`SearchFilters::normalize`].
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Overlays every facet set in `partial`, then normalizes.
    ///
    /// An empty list in `partial` clears that facet.
    pub fn merge(&mut self, partial: SearchFilters) {
        if partial.country.is_some() {
            self.country = partial.country;
        }
        if partial.degree_level.is_some() {
            self.degree_level = partial.degree_level;
        }
        if partial.discipline.is_some() {
            self.discipline = partial.discipline;
        }
        if partial.tuition_range.is_some() {
            self.tuition_range = partial.tuition_range;
        }
        if partial.ielts_min.is_some() {
            self.ielts_min = partial.ielts_min;
        }
        if partial.toefl_min.is_some() {
            self.toefl_min = partial.toefl_min;
        }
        if partial.scholarships_available.is_some() {
            self.scholarships_available = partial.scholarships_available;
        }
        if partial.duration_months.is_some() {
            self.duration_months = partial.duration_months;
        }
        self.normalize();
    }

    /// Removes a single facet constraint.
    pub fn remove(&mut self, facet: Facet) {
        match facet {
            Facet::Country => self.country = None,
            Facet::DegreeLevel => self.degree_level = None,
            Facet::Discipline => self.discipline = None,
            Facet::TuitionRange => self.tuition_range = None,
            Facet::IeltsMin => self.ielts_min = None,
            Facet::ToeflMin => self.toefl_min = None,
            Facet::ScholarshipsAvailable => self.scholarships_available = None,
            Facet::DurationMonths => self.duration_months = None,
        }
    }

    /// Number of facets currently constraining results.
    pub fn active_count(&self) -> usize {
        let normalized = self.clone().normalized();
        [
            normalized.country.is_some(),
            normalized.degree_level.is_some(),
            normalized.discipline.is_some(),
            normalized.tuition_range.is_some(),
            normalized.ielts_min.is_some(),
            normalized.toefl_min.is_some(),
            normalized.scholarships_available.is_some(),
            normalized.duration_months.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// True when `program` satisfies every set facet.
    ///
    /// Empty lists are treated as absent.
    pub fn matches(&self, program: &Program) -> bool {
        fn in_list<T: PartialEq>(list: &Option<Vec<T>>, value: &T) -> bool {
            match list {
                Some(values) if !values.is_empty() => values.contains(value),
                _ => true,
            }
        }

        let language = &program.entry_requirements.language;

        in_list(&self.country, &program.university.country)
            && in_list(&self.degree_level, &program.degree_level)
            && in_list(&self.discipline, &program.discipline)
            && self
                .tuition_range
                .map_or(true, |r| r.contains(program.tuition_usd))
            && self.ielts_min.map_or(true, |score| {
                language.ielts_min.map_or(true, |required| required <= score)
            })
            && self.toefl_min.map_or(true, |score| {
                language.toefl_min.map_or(true, |required| required <= score)
            })
            && self
                .scholarships_available
                .map_or(true, |wanted| program.scholarships_available == wanted)
            && self
                .duration_months
                .map_or(true, |r| r.contains(program.duration_months))
    }
}

// == Sort Order ==
/// Result ordering requested from the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    TuitionAsc,
    TuitionDesc,
    Ranking,
    Deadline,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::TuitionAsc => "tuition_asc",
            SortBy::TuitionDesc => "tuition_desc",
            SortBy::Ranking => "ranking",
            SortBy::Deadline => "deadline",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "tuition_asc" => Ok(SortBy::TuitionAsc),
            "tuition_desc" => Ok(SortBy::TuitionDesc),
            "ranking" => Ok(SortBy::Ranking),
            "deadline" => Ok(SortBy::Deadline),
            other => Err(DiscoveryError::Validation(format!(
                "Unknown sort order '{}'",
                other
            ))),
        }
    }
}

// == Search Params ==
/// Everything needed to fetch one page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub sort_by: SortBy,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: None,
            filters: SearchFilters::default(),
            sort_by: SortBy::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchParams {
    /// Rejects `page == 0` and `limit == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(DiscoveryError::Validation(
                "Page must be 1 or greater".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(DiscoveryError::Validation(
                "Limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Lowercased, trimmed text query; `None` when blank.
    pub fn text_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    // == Query String Encoding ==
    /// Encodes the params as query-string pairs.
    ///
    /// List facets use repeated keys; everything else is a scalar key.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let filters = self.filters.clone().normalized();

        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", query.to_string()));
        }
        pairs.push(("sort_by", self.sort_by.to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));

        for country in filters.country.iter().flatten() {
            pairs.push(("country", country.clone()));
        }
        for level in filters.degree_level.iter().flatten() {
            pairs.push(("degree_level", level.to_string()));
        }
        for discipline in filters.discipline.iter().flatten() {
            pairs.push(("discipline", discipline.clone()));
        }
        if let Some(range) = filters.tuition_range {
            if let Some(min) = range.min {
                pairs.push(("tuition_min", min.to_string()));
            }
            if let Some(max) = range.max {
                pairs.push(("tuition_max", max.to_string()));
            }
        }
        if let Some(ielts) = filters.ielts_min {
            pairs.push(("ielts_min", ielts.to_string()));
        }
        if let Some(toefl) = filters.toefl_min {
            pairs.push(("toefl_min", toefl.to_string()));
        }
        if let Some(scholarships) = filters.scholarships_available {
            pairs.push(("scholarships_available", scholarships.to_string()));
        }
        if let Some(range) = filters.duration_months {
            if let Some(min) = range.min {
                pairs.push(("duration_min", min.to_string()));
            }
            if let Some(max) = range.max {
                pairs.push(("duration_max", max.to_string()));
            }
        }

        pairs
    }

    /// Decodes query-string pairs produced by [`SearchParams::to_query_pairs`].
    ///
    /// Unknown keys are ignored. Malformed values are a validation error.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut params = SearchParams::default();
        let mut tuition = ValueRange::default();
        let mut duration = ValueRange::default();

        for (key, value) in pairs {
            match key.as_str() {
                "q" => params.query = Some(value.clone()),
                "sort_by" => params.sort_by = value.parse()?,
                "page" => params.page = parse_number(key, value)?,
                "limit" => params.limit = parse_number(key, value)?,
                "country" => params
                    .filters
                    .country
                    .get_or_insert_with(Vec::new)
                    .push(value.clone()),
                "degree_level" => params
                    .filters
                    .degree_level
                    .get_or_insert_with(Vec::new)
                    .push(value.parse()?),
                "discipline" => params
                    .filters
                    .discipline
                    .get_or_insert_with(Vec::new)
                    .push(value.clone()),
                "tuition_min" => tuition.min = Some(parse_number(key, value)?),
                "tuition_max" => tuition.max = Some(parse_number(key, value)?),
                "ielts_min" => params.filters.ielts_min = Some(parse_number(key, value)?),
                "toefl_min" => params.filters.toefl_min = Some(parse_number(key, value)?),
                "scholarships_available" => {
                    params.filters.scholarships_available = Some(parse_number(key, value)?)
                }
                "duration_min" => duration.min = Some(parse_number(key, value)?),
                "duration_max" => duration.max = Some(parse_number(key, value)?),
                _ => {}
            }
        }

        params.filters.tuition_range = Some(tuition);
        params.filters.duration_months = Some(duration);
        params.filters.normalize();
        Ok(params)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| DiscoveryError::Validation(format!("Invalid value '{}' for {}", value, key)))
}

// == Search Result ==
/// One page of matching programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub programs: Vec<Program>,
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
    pub has_next: bool,
}

impl SearchResult {
    pub fn empty(page: u32) -> Self {
        Self {
            programs: Vec::new(),
            total: 0,
            page,
            total_pages: 0,
            has_next: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fixtures;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_drops_empty_lists() {
        let mut filters = SearchFilters {
            country: Some(vec![]),
            degree_level: Some(vec![]),
            discipline: Some(vec!["Law".to_string()]),
            tuition_range: Some(ValueRange::new(None, None)),
            ..Default::default()
        };
        filters.normalize();
        assert!(filters.country.is_none());
        assert!(filters.degree_level.is_none());
        assert!(filters.tuition_range.is_none());
        assert_eq!(filters.discipline, Some(vec!["Law".to_string()]));
    }

    #[test]
    fn test_empty_list_matches_everything() {
        let filters = SearchFilters {
            country: Some(vec![]),
            ..Default::default()
        };
        for program in fixtures::programs() {
            assert!(filters.matches(&program));
        }
    }

    #[test]
    fn test_merge_overlays_and_clears() {
        let mut filters = SearchFilters {
            country: Some(vec!["United States".to_string()]),
            ielts_min: Some(7.0),
            ..Default::default()
        };
        filters.merge(SearchFilters {
            degree_level: Some(vec![DegreeLevel::Master]),
            country: Some(vec![]),
            ..Default::default()
        });

        assert!(filters.country.is_none());
        assert_eq!(filters.degree_level, Some(vec![DegreeLevel::Master]));
        assert_eq!(filters.ielts_min, Some(7.0));
    }

    #[test]
    fn test_remove_facet() {
        let mut filters = SearchFilters {
            toefl_min: Some(100),
            scholarships_available: Some(true),
            ..Default::default()
        };
        filters.remove(Facet::ToeflMin);
        assert!(filters.toefl_min.is_none());
        assert_eq!(filters.active_count(), 1);
    }

    #[test]
    fn test_active_count_counts_range_once() {
        let filters = SearchFilters {
            tuition_range: Some(ValueRange::new(Some(1000), Some(50000))),
            country: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(filters.active_count(), 1);
        assert!(SearchFilters::default().is_empty());
    }

    #[test]
    fn test_language_filters_use_applicant_score() {
        // Program 2 requires IELTS 7.5, the others 7.0
        let programs = fixtures::programs();
        let filters = SearchFilters {
            ielts_min: Some(7.0),
            ..Default::default()
        };
        let ids: Vec<&str> = programs
            .iter()
            .filter(|p| filters.matches(p))
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_validate_rejects_zero_page_and_limit() {
        let mut params = SearchParams::default();
        assert!(params.validate().is_ok());
        params.page = 0;
        assert!(params.validate().is_err());
        params.page = 1;
        params.limit = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_text_query_blank_is_none() {
        let params = SearchParams {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(params.text_query().is_none());
    }

    #[test]
    fn test_query_pairs_repeat_list_keys() {
        let params = SearchParams {
            query: Some("data".to_string()),
            filters: SearchFilters {
                country: Some(vec!["Canada".to_string(), "Germany".to_string()]),
                degree_level: Some(vec![DegreeLevel::Master, DegreeLevel::Phd]),
                tuition_range: Some(ValueRange::new(None, Some(40000))),
                scholarships_available: Some(true),
                ..Default::default()
            },
            sort_by: SortBy::TuitionAsc,
            page: 2,
            limit: 6,
        };
        let encoded = params.to_query_pairs();

        let countries: Vec<&str> = encoded
            .iter()
            .filter(|(k, _)| *k == "country")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(countries, vec!["Canada", "Germany"]);
        assert!(encoded.contains(&("tuition_max", "40000".to_string())));
        assert!(!encoded.iter().any(|(k, _)| *k == "tuition_min"));
        assert!(encoded.contains(&("sort_by", "tuition_asc".to_string())));

        let owned: Vec<(String, String)> = encoded
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(SearchParams::from_query_pairs(&owned).unwrap(), params);
    }

    #[test]
    fn test_from_query_pairs_defaults_and_errors() {
        let params = SearchParams::from_query_pairs(&[]).unwrap();
        assert_eq!(params, SearchParams::default());

        let err = SearchParams::from_query_pairs(&pairs(&[("page", "two")])).unwrap_err();
        assert!(matches!(err, DiscoveryError::Validation(_)));

        let err =
            SearchParams::from_query_pairs(&pairs(&[("degree_level", "masters")])).unwrap_err();
        assert!(matches!(err, DiscoveryError::Validation(_)));

        let params =
            SearchParams::from_query_pairs(&pairs(&[("unknown", "x"), ("ielts_min", "6.5")]))
                .unwrap();
        assert_eq!(params.filters.ielts_min, Some(6.5));
    }
}
