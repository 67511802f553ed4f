use crate::errors::Result;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use store::structs::{User, TIER_FREE};

/// Supported import payload formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Pocket API export
    Pocket,
    /// Browser bookmark export
    Browser,
    /// Rows of a csv-to-json conversion
    Csv,
    /// A LinkLetter snapshot export (users + links)
    Native,
}

impl ImportSource {
    pub fn parse(value: &str) -> Option<ImportSource> {
        match value {
            "pocket" => Some(ImportSource::Pocket),
            "browser" => Some(ImportSource::Browser),
            "csv" => Some(ImportSource::Csv),
            "native" => Some(ImportSource::Native),
            _ => None,
        }
    }
}

/// A link in canonical shape, ready for validation and insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLink {
    pub url: String,
    pub title: String,
    pub notes: String,
    pub tags: String,
    pub date_saved: Option<DateTime<Utc>>,
    /// Native payloads carry their own owner; other sources inherit the
    /// importing user.
    pub owner: Option<i64>,
}

/// Everything a payload resolved to. The dual wire representations
/// (bare owner id vs. embedded object, tier string vs. keyed object) are
/// gone by the time this struct exists; nothing downstream branches on
/// them again.
#[derive(Debug, Default)]
pub struct ImportPayload {
    pub users: Vec<User>,
    pub links: Vec<ParsedLink>,
}

pub fn parse(source: ImportSource, payload: &str) -> Result<ImportPayload> {
    match source {
        ImportSource::Pocket => parse_pocket(payload),
        ImportSource::Browser => parse_browser(payload),
        ImportSource::Csv => parse_csv(payload),
        ImportSource::Native => parse_native(payload),
    }
}

/// Link owner as it appears on the wire: either a bare id or an embedded
/// user object. Resolved to the bare id and never looked at again.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(i64),
    Embedded(EmbeddedOwner),
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedOwner {
    pub id: i64,
}

impl OwnerRef {
    pub fn resolve(&self) -> i64 {
        match self {
            OwnerRef::Id(id) => *id,
            OwnerRef::Embedded(owner) => owner.id,
        }
    }
}

/// Subscription tier on the wire: a bare key or a {key, value} object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TierRef {
    Name(String),
    Keyed { key: String, value: String },
}

impl TierRef {
    /// The canonical lowercase tier key ("free" / "paid").
    pub fn canonical(&self) -> String {
        match self {
            TierRef::Name(name) => name.to_lowercase(),
            TierRef::Keyed { key, .. } => key.to_lowercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PocketItem {
    resolved_title: Option<String>,
    given_title: Option<String>,
    resolved_url: Option<String>,
    given_url: Option<String>,
    excerpt: Option<String>,
    /// Pocket reports tags as a map keyed by tag name
    tags: Option<BTreeMap<String, serde_json::Value>>,
    /// Unix epoch seconds, as a string
    time_added: Option<String>,
}

fn parse_pocket(payload: &str) -> Result<ImportPayload> {
    let items: Vec<PocketItem> = serde_json::from_str(payload)?;

    let links = items
        .into_iter()
        .map(|item| {
            let url = item
                .resolved_url
                .or(item.given_url)
                .unwrap_or_default();
            let title = item
                .resolved_title
                .filter(|t| !t.is_empty())
                .or(item.given_title)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| url.clone());
            let tags = item
                .tags
                .map(|map| map.into_keys().collect::<Vec<String>>().join(", "))
                .unwrap_or_default();
            let date_saved = item
                .time_added
                .and_then(|raw| raw.parse::<i64>().ok())
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

            ParsedLink {
                url,
                title,
                notes: item.excerpt.unwrap_or_default(),
                tags,
                date_saved,
                owner: None,
            }
        })
        .collect();

    Ok(ImportPayload {
        users: Vec::new(),
        links,
    })
}

#[derive(Debug, Deserialize)]
struct BrowserItem {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    tags: Option<String>,
    date_added: Option<String>,
}

fn parse_browser(payload: &str) -> Result<ImportPayload> {
    let items: Vec<BrowserItem> = serde_json::from_str(payload)?;

    let links = items
        .into_iter()
        .map(|item| {
            let url = item.url.unwrap_or_default();
            ParsedLink {
                title: item
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| url.clone()),
                url,
                notes: item.description.unwrap_or_default(),
                tags: item.tags.unwrap_or_default(),
                date_saved: item.date_added.as_deref().and_then(parse_date),
                owner: None,
            }
        })
        .collect();

    Ok(ImportPayload {
        users: Vec::new(),
        links,
    })
}

#[derive(Debug, Deserialize)]
struct CsvItem {
    title: Option<String>,
    url: Option<String>,
    notes: Option<String>,
    description: Option<String>,
    tags: Option<String>,
    date_saved: Option<String>,
}

fn parse_csv(payload: &str) -> Result<ImportPayload> {
    let items: Vec<CsvItem> = serde_json::from_str(payload)?;

    let links = items
        .into_iter()
        .map(|item| {
            let url = item.url.unwrap_or_default();
            ParsedLink {
                title: item
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| url.clone()),
                url,
                notes: item.notes.or(item.description).unwrap_or_default(),
                tags: item.tags.unwrap_or_default(),
                date_saved: item.date_saved.as_deref().and_then(parse_date),
                owner: None,
            }
        })
        .collect();

    Ok(ImportPayload {
        users: Vec::new(),
        links,
    })
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<SnapshotUser>,
    #[serde(default)]
    links: Vec<SnapshotLink>,
}

#[derive(Debug, Deserialize)]
struct SnapshotUser {
    id: i64,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    subscription_tier: Option<TierRef>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default = "default_true")]
    email_notifications: bool,
    account_created: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotLink {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    tags: String,
    user: OwnerRef,
    date_saved: Option<String>,
}

const fn default_true() -> bool {
    true
}

fn parse_native(payload: &str) -> Result<ImportPayload> {
    let snapshot: Snapshot = serde_json::from_str(payload)?;

    let users = snapshot
        .users
        .into_iter()
        .map(|raw| User {
            id: raw.id,
            email: raw.email,
            first_name: raw.first_name,
            last_name: raw.last_name,
            tier: raw
                .subscription_tier
                .map(|t| t.canonical())
                .unwrap_or_else(|| TIER_FREE.to_string()),
            email_verified: raw.email_verified,
            email_notifications: raw.email_notifications,
            account_created: raw
                .account_created
                .as_deref()
                .and_then(parse_date)
                .unwrap_or_else(Utc::now),
        })
        .collect();

    let links = snapshot
        .links
        .into_iter()
        .map(|raw| ParsedLink {
            title: if raw.title.is_empty() {
                raw.url.clone()
            } else {
                raw.title
            },
            url: raw.url,
            notes: raw.notes,
            tags: raw.tags,
            date_saved: raw.date_saved.as_deref().and_then(parse_date),
            owner: Some(raw.user.resolve()),
        })
        .collect();

    Ok(ImportPayload { users, links })
}

/// Accepts RFC 3339 timestamps and bare YYYY-MM-DD dates.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}
