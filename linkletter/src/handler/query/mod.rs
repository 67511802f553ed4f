mod facets;

use facets::tag_facets;

use crate::errors::{Error, Result};
use crate::structs::{LinkQuery, QueryResult, ScoredLink, SearchResult, SortBy};

use store::structs::Link;

/// Dashboard list request: filter, sort, facet and paginate one owner's
/// links. Pure over the snapshot; degenerate inputs yield empty results,
/// never errors.
pub fn run_query(links: &[Link], owner: i64, query: &LinkQuery) -> QueryResult {
    let filtered = filter_links(
        links,
        owner,
        query.text.as_deref(),
        query.tag.as_deref(),
        query.archived,
    );
    let facets = tag_facets(&filtered);
    let total = filtered.len();

    let mut ordered: Vec<Link> = filtered.into_iter().cloned().collect();
    sort_links(&mut ordered, query.sort_by);

    QueryResult {
        links: page_slice(&ordered, query.page, query.limit),
        total,
        facets,
    }
}

/// Dedicated free-text search: same filters, plus relevance scoring.
/// Empty or whitespace-only text is a caller error.
pub fn run_search(
    links: &[Link],
    owner: i64,
    text: &str,
    page: usize,
    limit: usize,
) -> Result<SearchResult> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let filtered = filter_links(links, owner, Some(text), None, None);
    let facets = tag_facets(&filtered);
    let total = filtered.len();

    let mut scored: Vec<ScoredLink> = filtered
        .into_iter()
        .map(|link| ScoredLink {
            score: relevance(link, text),
            link: link.clone(),
        })
        .collect();
    // stable, so equal scores keep snapshot order
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(SearchResult {
        links: page_slice(&scored, page, limit),
        total,
        facets,
    })
}

/// Full-query relevance: 3 for a title hit, 2 for a url hit, 1 for a
/// notes hit, all case-insensitive substring matches.
fn relevance(link: &Link, query: &str) -> u32 {
    let query = query.to_lowercase();
    let mut score = 0;
    if link.title.to_lowercase().contains(&query) {
        score += 3;
    }
    if link.url.to_lowercase().contains(&query) {
        score += 2;
    }
    if link.notes.to_lowercase().contains(&query) {
        score += 1;
    }
    score
}

fn searchable_text(link: &Link) -> String {
    format!(
        "{} {} {} {}",
        link.title, link.url, link.notes, link.tags
    )
    .to_lowercase()
}

fn filter_links<'a>(
    links: &'a [Link],
    owner: i64,
    text: Option<&str>,
    tag: Option<&str>,
    archived: Option<bool>,
) -> Vec<&'a Link> {
    // every whitespace-separated term must match somewhere (AND semantics)
    let terms: Vec<String> = text
        .map(|t| t.to_lowercase().split_whitespace().map(String::from).collect())
        .unwrap_or_default();
    let tag = tag
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty());

    links
        .iter()
        .filter(|link| link.owner == owner)
        .filter(|link| {
            terms.is_empty() || {
                let haystack = searchable_text(link);
                terms.iter().all(|term| haystack.contains(term))
            }
        })
        .filter(|link| {
            tag.as_ref()
                .map_or(true, |t| link.tags.to_lowercase().contains(t))
        })
        .filter(|link| archived.map_or(true, |a| link.archived == a))
        .collect()
}

fn sort_links(links: &mut [Link], sort_by: SortBy) {
    match sort_by {
        SortBy::Date => links.sort_by(|a, b| b.date_saved.cmp(&a.date_saved)),
        SortBy::Title => links.sort_by(|a, b| a.title.cmp(&b.title)),
        SortBy::Clicks => links.sort_by(|a, b| b.click_count.cmp(&a.click_count)),
    }
}

/// 1-based pagination; pages past the end are empty slices, not errors.
fn page_slice<T: Clone>(items: &[T], page: usize, limit: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(limit);
    if start >= items.len() {
        return Vec::new();
    }
    let end = (start + limit).min(items.len());
    items[start..end].to_vec()
}
