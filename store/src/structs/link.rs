use chrono::{DateTime, Utc};

/// A saved link as it lives in the `link` table.
///
/// `year` and `week` are stamped once at insert time from the save date
/// (see [`crate::week::week_of`]) and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    /// Canonical owner id. Payloads that carry the owner as an embedded
    /// object are resolved to this bare id before they reach the store.
    pub owner: i64,
    pub url: String,
    pub title: String,
    pub notes: String,
    /// Comma-delimited tag string, e.g. "rust, async"
    pub tags: String,
    pub date_saved: DateTime<Utc>,
    pub year: i32,
    pub week: u32,
    pub archived: bool,
    pub click_count: i64,
}

impl Link {
    /// The comma-split, trimmed tags of this link, empty entries dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn link_with_tags(tags: &str) -> Link {
        Link {
            id: 1,
            owner: 1,
            url: "https://example.org".to_string(),
            title: "example".to_string(),
            notes: String::new(),
            tags: tags.to_string(),
            date_saved: Utc.with_ymd_and_hms(2023, 6, 15, 9, 0, 0).unwrap(),
            year: 2023,
            week: 24,
            archived: false,
            click_count: 0,
        }
    }

    #[test]
    fn test_tag_list_trims_and_drops_empty() {
        assert_eq!(
            link_with_tags(" rust,  async , ,tokio").tag_list(),
            vec!["rust", "async", "tokio"]
        );
        assert!(link_with_tags("").tag_list().is_empty());
        assert!(link_with_tags(" , ").tag_list().is_empty());
    }
}
