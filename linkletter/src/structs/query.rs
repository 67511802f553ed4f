use store::structs::Link;

pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Sort orders offered by the dashboard list view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortBy {
    /// Newest saved first
    Date,
    /// Lexicographic by title
    Title,
    /// Most clicked first
    Clicks,
}

impl Default for SortBy {
    fn default() -> SortBy {
        SortBy::Date
    }
}

impl SortBy {
    /// Lenient query-string parsing; anything unknown falls back to the
    /// date order rather than erroring.
    pub fn parse(value: &str) -> SortBy {
        match value {
            "title" => SortBy::Title,
            "clicks" => SortBy::Clicks,
            _ => SortBy::Date,
        }
    }
}

/// A dashboard list/filter request. Everything is optional; an empty
/// query lists all of the owner's links newest first.
#[derive(Debug, Clone)]
pub struct LinkQuery {
    pub text: Option<String>,
    pub tag: Option<String>,
    pub sort_by: SortBy,
    pub archived: Option<bool>,
    /// 1-based
    pub page: usize,
    pub limit: usize,
}

impl Default for LinkQuery {
    fn default() -> LinkQuery {
        LinkQuery {
            text: None,
            tag: None,
            sort_by: SortBy::Date,
            archived: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One tag with its occurrence count over a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFacet {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug)]
pub struct QueryResult {
    /// The requested page of the filtered, sorted set
    pub links: Vec<Link>,
    /// Size of the filtered set before pagination
    pub total: usize,
    pub facets: Vec<TagFacet>,
}

/// A link with its relevance score for a free-text search.
#[derive(Debug, Clone)]
pub struct ScoredLink {
    pub link: Link,
    pub score: u32,
}

#[derive(Debug)]
pub struct SearchResult {
    pub links: Vec<ScoredLink>,
    pub total: usize,
    pub facets: Vec<TagFacet>,
}
