pub mod analytics;
pub mod digest;
pub mod query;

use crate::errors::{Error, Result};
use crate::ingest::{self, ImportSource};
use crate::mailer::Mailer;
use crate::structs::{
    BulkReport, DispatchReport, ImportReport, ImportSkip, LinkQuery, QueryResult, SearchResult,
};
use crate::validate;

use chrono::{DateTime, Utc};
use log::{info, warn};
use store::structs::Link;
use store::week::week_of;
use store::{DbConfig, ReadOnlyDb, WriteableDb};

/// One full digest pass: snapshot users and links, group them into
/// per-user candidates for the week containing `now`, then deliver.
pub async fn run_weekly_digest(
    db_cfg: &DbConfig,
    mailer: &dyn Mailer,
    now: DateTime<Utc>,
) -> Result<DispatchReport> {
    let db = store::get_writeable_db(db_cfg)?;
    let users = db.list_users()?;
    let links = db.list_links(None)?;

    let (year, week) = week_of(now.date_naive());
    let candidates = digest::build_candidates(&users, &links, year, week);
    info!(
        "digest pass for week {} of {}: {} candidates from {} users / {} links",
        week,
        year,
        candidates.len(),
        users.len(),
        links.len()
    );

    Ok(digest::dispatch(&db, mailer, &candidates).await)
}

/// Validate and save one link for `owner`.
pub fn save_link(
    db: &impl WriteableDb,
    owner: i64,
    url: &str,
    title: &str,
    notes: &str,
    tags: &str,
    now: DateTime<Utc>,
) -> Result<Link> {
    if !validate::is_url(url) {
        return Err(Error::ConstStr("not a valid url"));
    }
    if db.get_user(owner)?.is_none() {
        return Err(Error::ConstStr("no such user"));
    }
    let title = if title.trim().is_empty() { url } else { title };
    Ok(db.insert_link(owner, url, title, notes, tags, now)?)
}

pub fn query_links(db: &impl ReadOnlyDb, owner: i64, q: &LinkQuery) -> Result<QueryResult> {
    let links = db.list_links(None)?;
    Ok(query::run_query(&links, owner, q))
}

pub fn search_links(
    db: &impl ReadOnlyDb,
    owner: i64,
    text: &str,
    page: usize,
    limit: usize,
) -> Result<SearchResult> {
    let links = db.list_links(None)?;
    query::run_search(&links, owner, text, page, limit)
}

/// Count a click-through and hand back the target url.
pub fn record_click(db: &impl WriteableDb, owner: i64, link_id: i64) -> Result<String> {
    match db.get_link(link_id)? {
        Some(link) if link.owner == owner => {
            db.increment_click(link_id)?;
            Ok(link.url)
        }
        _ => Err(Error::ConstStr("no such link")),
    }
}

/// Record that the digest for (owner, year, week) was opened, e.g. from
/// a tracking-pixel hit.
pub fn record_open(db: &impl WriteableDb, owner: i64, year: i32, week: u32) -> Result<()> {
    match db.get_digest(owner, year, week)? {
        Some(digest) => Ok(db.mark_digest_opened(digest.id)?),
        None => Err(Error::ConstStr("no such digest")),
    }
}

/// Toggle the weekly digest opt-in for one account.
pub fn set_notifications(db: &impl WriteableDb, owner: i64, enabled: bool) -> Result<()> {
    if db.get_user(owner)?.is_none() {
        return Err(Error::ConstStr("no such user"));
    }
    Ok(db.set_email_notifications(owner, enabled)?)
}

pub fn collect_analytics(db: &impl ReadOnlyDb, now: DateTime<Utc>) -> Result<analytics::Analytics> {
    let users = db.list_users()?;
    let links = db.list_links(None)?;
    let digests = db.list_digests()?;
    Ok(analytics::collect(&users, &links, &digests, now))
}

/// Import a payload of links (and, for native snapshots, users) for
/// `owner`. Each item stands alone: a bad url or unknown owner skips
/// that item and the rest of the payload still lands.
pub fn import_links(
    db: &impl WriteableDb,
    owner: i64,
    source: ImportSource,
    payload: &str,
    now: DateTime<Utc>,
) -> Result<ImportReport> {
    let parsed = ingest::parse(source, payload)?;
    let mut report = ImportReport::default();

    for (index, user) in parsed.users.iter().enumerate() {
        if !validate::is_email(&user.email) {
            report.skipped.push(ImportSkip {
                index,
                reason: format!("user {}: invalid email \"{}\"", user.id, user.email),
            });
            continue;
        }
        match db.upsert_user(user) {
            Ok(()) => report.users_upserted += 1,
            Err(e) => report.skipped.push(ImportSkip {
                index,
                reason: format!("user {}: {}", user.id, e),
            }),
        }
    }

    // skip indices are per section; the reason prefix tells the two apart
    for (index, item) in parsed.links.iter().enumerate() {
        if !validate::is_url(&item.url) {
            report.skipped.push(ImportSkip {
                index,
                reason: format!("link \"{}\": not a valid url", item.url),
            });
            continue;
        }
        let link_owner = item.owner.unwrap_or(owner);
        if db.get_user(link_owner)?.is_none() {
            report.skipped.push(ImportSkip {
                index,
                reason: format!("link \"{}\": unknown owner {link_owner}", item.url),
            });
            continue;
        }
        let date_saved = item.date_saved.unwrap_or(now);
        match db.insert_link(
            link_owner,
            &item.url,
            &item.title,
            &item.notes,
            &item.tags,
            date_saved,
        ) {
            Ok(_) => report.imported += 1,
            Err(e) => {
                warn!("import of {} failed: {}", item.url, e);
                report.skipped.push(ImportSkip {
                    index,
                    reason: format!("link \"{}\": {}", item.url, e),
                });
            }
        }
    }

    info!(
        "import: {} links, {} users, {} skipped",
        report.imported,
        report.users_upserted,
        report.skipped.len()
    );
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Archive,
    Unarchive,
    /// Append a tag to each selected link
    Tag(String),
}

/// Apply one action to a selection of the owner's links. Ids that do
/// not exist or belong to someone else are skipped, never touched.
pub fn bulk_action(
    db: &impl WriteableDb,
    owner: i64,
    ids: &[i64],
    action: &BulkAction,
) -> Result<BulkReport> {
    if ids.is_empty() {
        return Err(Error::ConstStr("no links selected"));
    }

    let mut report = BulkReport::default();
    for &id in ids {
        let link = match db.get_link(id)? {
            Some(link) if link.owner == owner => link,
            _ => {
                report.skipped.push(id);
                continue;
            }
        };

        let res = match action {
            BulkAction::Delete => db.delete_link(id),
            BulkAction::Archive => db.set_archived(id, true),
            BulkAction::Unarchive => db.set_archived(id, false),
            BulkAction::Tag(tag) => {
                if link.tag_list().contains(&tag.as_str()) {
                    Ok(())
                } else {
                    let tags = if link.tags.trim().is_empty() {
                        tag.clone()
                    } else {
                        format!("{}, {}", link.tags, tag)
                    };
                    db.update_link(id, &link.title, &link.notes, &tags)
                }
            }
        };

        match res {
            Ok(()) => report.affected += 1,
            Err(e) => {
                warn!("bulk action on link {} failed: {}", id, e);
                report.skipped.push(id);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use store::structs::{User, TIER_FREE};

    fn test_db() -> impl WriteableDb {
        store::get_writeable_db(&DbConfig::in_memory()).unwrap()
    }

    fn seed_user(db: &impl WriteableDb, id: i64) {
        db.upsert_user(&User {
            id,
            email: format!("user{id}@example.org"),
            first_name: format!("User{id}"),
            last_name: String::new(),
            tier: TIER_FREE.to_string(),
            email_verified: true,
            email_notifications: true,
            account_created: Utc::now(),
        })
        .unwrap();
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_save_link() {
        let db = test_db();
        seed_user(&db, 1);

        let link = save_link(
            &db,
            1,
            "https://example.org/a",
            "A",
            "notes",
            "rust",
            now(),
        )
        .unwrap();
        assert_eq!(link.owner, 1);
        assert_eq!((link.year, link.week), (2023, 24));

        assert!(save_link(&db, 1, "not a url", "t", "", "", now()).is_err());
        assert!(save_link(&db, 99, "https://example.org/b", "t", "", "", now()).is_err());
    }

    #[test]
    fn test_save_link_defaults_title_to_url() {
        let db = test_db();
        seed_user(&db, 1);

        let link = save_link(&db, 1, "https://example.org/a", "  ", "", "", now()).unwrap();
        assert_eq!(link.title, "https://example.org/a");
    }

    #[test]
    fn test_record_click() {
        let db = test_db();
        seed_user(&db, 1);
        let link = save_link(&db, 1, "https://example.org/a", "A", "", "", now()).unwrap();

        let url = record_click(&db, 1, link.id).unwrap();
        assert_eq!(url, "https://example.org/a");
        assert_eq!(db.get_link(link.id).unwrap().unwrap().click_count, 1);

        // someone else's link is invisible
        assert!(record_click(&db, 2, link.id).is_err());
        assert_eq!(db.get_link(link.id).unwrap().unwrap().click_count, 1);
    }

    #[test]
    fn test_import_native_snapshot() {
        let db = test_db();
        seed_user(&db, 1);

        let payload = r#"{
            "users": [
                {"id": 5, "email": "five@example.org", "subscription_tier": "paid"},
                {"id": 6, "email": "not-an-email"}
            ],
            "links": [
                {"url": "https://a.example", "title": "a", "user": 5,
                 "date_saved": "2023-06-15T09:00:00Z"},
                {"url": "https://b.example", "title": "b", "user": {"id": 1}},
                {"url": "nope", "title": "bad", "user": 1},
                {"url": "https://c.example", "title": "c", "user": 42}
            ]
        }"#;

        let report = import_links(&db, 1, ImportSource::Native, payload, now()).unwrap();
        assert_eq!(report.users_upserted, 1);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped.len(), 3);

        // user and link skips are told apart by the reason prefix
        assert!(report.skipped[0].reason.starts_with("user 6:"));
        assert!(report.skipped[1].reason.starts_with("link \"nope\":"));
        assert!(report.skipped[2].reason.starts_with("link \"https://c.example\":"));

        let five = db.get_user(5).unwrap().unwrap();
        assert!(five.is_paid());

        let theirs = db.list_links(Some(5)).unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!((theirs[0].year, theirs[0].week), (2023, 24));
    }

    #[test]
    fn test_import_pocket_inherits_importer() {
        let db = test_db();
        seed_user(&db, 1);

        let payload = r#"[{"resolved_title": "t", "resolved_url": "https://p.example"}]"#;
        let report = import_links(&db, 1, ImportSource::Pocket, payload, now()).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(db.list_links(Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_bulk_action_requires_selection() {
        let db = test_db();
        assert!(bulk_action(&db, 1, &[], &BulkAction::Delete).is_err());
    }

    #[test]
    fn test_bulk_archive_skips_foreign_links() {
        let db = test_db();
        seed_user(&db, 1);
        seed_user(&db, 2);
        let mine = save_link(&db, 1, "https://a.example", "a", "", "", now()).unwrap();
        let theirs = save_link(&db, 2, "https://b.example", "b", "", "", now()).unwrap();

        let report =
            bulk_action(&db, 1, &[mine.id, theirs.id, 999], &BulkAction::Archive).unwrap();
        assert_eq!(report.affected, 1);
        assert_eq!(report.skipped, vec![theirs.id, 999]);

        assert!(db.get_link(mine.id).unwrap().unwrap().archived);
        assert!(!db.get_link(theirs.id).unwrap().unwrap().archived);
    }

    #[test]
    fn test_bulk_tag_appends_once() {
        let db = test_db();
        seed_user(&db, 1);
        let a = save_link(&db, 1, "https://a.example", "a", "", "rust", now()).unwrap();
        let b = save_link(&db, 1, "https://b.example", "b", "", "", now()).unwrap();

        let action = BulkAction::Tag("weekly".to_string());
        bulk_action(&db, 1, &[a.id, b.id], &action).unwrap();
        bulk_action(&db, 1, &[a.id, b.id], &action).unwrap();

        assert_eq!(db.get_link(a.id).unwrap().unwrap().tags, "rust, weekly");
        assert_eq!(db.get_link(b.id).unwrap().unwrap().tags, "weekly");
    }

    #[test]
    fn test_bulk_delete() {
        let db = test_db();
        seed_user(&db, 1);
        let a = save_link(&db, 1, "https://a.example", "a", "", "", now()).unwrap();

        let report = bulk_action(&db, 1, &[a.id], &BulkAction::Delete).unwrap();
        assert_eq!(report.affected, 1);
        assert!(db.get_link(a.id).unwrap().is_none());
    }

    #[test]
    fn test_query_and_search_over_store() {
        let db = test_db();
        seed_user(&db, 1);
        save_link(&db, 1, "https://a.example", "Rust async", "", "rust", now()).unwrap();
        save_link(&db, 1, "https://b.example", "Gardening", "", "", now()).unwrap();

        let result = query_links(&db, 1, &LinkQuery::default()).unwrap();
        assert_eq!(result.total, 2);

        let result = search_links(&db, 1, "rust", 1, 20).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.links[0].link.title, "Rust async");
    }

    #[test]
    fn test_record_open() {
        let db = test_db();
        seed_user(&db, 1);
        let link = save_link(&db, 1, "https://a.example", "a", "", "", now()).unwrap();
        db.create_digest(1, 2023, 24, &[link.id]).unwrap();

        record_open(&db, 1, 2023, 24).unwrap();
        assert!(db.get_digest(1, 2023, 24).unwrap().unwrap().email_opened);

        // no digest exists for that week
        assert!(record_open(&db, 1, 2023, 30).is_err());
    }

    #[test]
    fn test_set_notifications() {
        let db = test_db();
        seed_user(&db, 1);

        set_notifications(&db, 1, false).unwrap();
        assert!(!db.get_user(1).unwrap().unwrap().email_notifications);
        set_notifications(&db, 1, true).unwrap();
        assert!(db.get_user(1).unwrap().unwrap().email_notifications);

        assert!(set_notifications(&db, 99, false).is_err());
    }

    #[test]
    fn test_collect_analytics_over_store() {
        let db = test_db();
        seed_user(&db, 1);
        let link = save_link(&db, 1, "https://a.example", "a", "", "", now()).unwrap();
        record_click(&db, 1, link.id).unwrap();

        let stats = collect_analytics(&db, now()).unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_links, 1);
        assert_eq!(stats.links_this_week, 1);
        assert_eq!(stats.total_clicks, 1);
    }
}
