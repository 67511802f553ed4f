mod candidate;
mod query;
mod report;

pub use candidate::DigestCandidate;
pub use query::{
    LinkQuery, QueryResult, ScoredLink, SearchResult, SortBy, TagFacet, DEFAULT_PAGE_LIMIT,
};
pub use report::{
    BulkReport, DispatchFailure, DispatchOutcome, DispatchReport, ImportReport, ImportSkip,
};
