//! Catalog Query Module
//!
//! Filters, sorts and paginates an in-memory program list. Used by the mock
//! gateway and by the development backend.

use crate::error::Result;
use crate::models::{Program, SearchFilters, SearchParams, SearchResult, SortBy};

// == Search ==
/// Runs a full search: text query, facet filters, sort, then pagination.
///
/// # Arguments
/// * `programs` - The catalog to search
/// * `params` - Query, filters, sort order and page window
pub fn search(programs: &[Program], params: &SearchParams) -> Result<SearchResult> {
    params.validate()?;

    let mut matched = filter_programs(programs, params.text_query().as_deref(), &params.filters);
    sort_programs(&mut matched, params.sort_by);

    Ok(paginate(matched, params.page, params.limit))
}

// == Filter ==
/// Keeps programs matching the lowercase `query` and every set facet.
pub fn filter_programs(
    programs: &[Program],
    query: Option<&str>,
    filters: &SearchFilters,
) -> Vec<Program> {
    programs
        .iter()
        .filter(|program| query.map_or(true, |q| program.matches_text(q)))
        .filter(|program| filters.matches(program))
        .cloned()
        .collect()
}

// == Sort ==
/// Stable sort by the requested order.
///
/// `Relevance` and `Deadline` keep the catalog order.
pub fn sort_programs(programs: &mut [Program], sort_by: SortBy) {
    match sort_by {
        SortBy::TuitionAsc => programs.sort_by_key(|p| p.tuition_usd),
        SortBy::TuitionDesc => programs.sort_by(|a, b| b.tuition_usd.cmp(&a.tuition_usd)),
        SortBy::Ranking => programs.sort_by_key(|p| p.university.world_rank()),
        SortBy::Relevance | SortBy::Deadline => {}
    }
}

// == Paginate ==
/// Slices `[(page - 1) * limit, page * limit)` out of the matched set.
///
/// `page` and `limit` must already be validated as non-zero.
pub fn paginate(programs: Vec<Program>, page: u32, limit: u32) -> SearchResult {
    let total = programs.len();
    let limit = limit.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(limit);
    let end = start.saturating_add(limit);

    let page_programs = programs
        .into_iter()
        .skip(start)
        .take(limit)
        .collect();

    SearchResult {
        programs: page_programs,
        total,
        page,
        total_pages: total.div_ceil(limit) as u32,
        has_next: end < total,
    }
}
