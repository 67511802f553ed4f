#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod config;
mod errors;
mod handler;
mod ingest;
mod mailer;
mod structs;
mod validate;

use chrono::Utc;
use log::LevelFilter;
use log::{error, info};
use simple_logger::SimpleLogger;
use time::UtcOffset;

use std::env;
use std::fs;
use std::process;

use config::Config;
use errors::Result;
use handler::BulkAction;
use ingest::ImportSource;
use mailer::{Mailer, MailgunMailer, NoopMailer};
use store::DbConfig;
use structs::{LinkQuery, SortBy};

const USAGE: &str = "usage:
  linkletter                                   run the digest daemon
  linkletter once                              run one digest pass and exit
  linkletter save <owner> <url> [title] [tags]
  linkletter list <owner> [tag] [sort]
  linkletter search <owner> <text...>
  linkletter import <owner> <source> <file>    source: pocket|browser|csv|native
  linkletter bulk <owner> <action> <id...>     action: archive|unarchive|delete|tag:NAME
  linkletter click <owner> <id>
  linkletter opened <owner> <year> <week>
  linkletter notify <owner> <on|off>
  linkletter stats";

fn migrate_db(db_cfg: &DbConfig) {
    match store::migrate(db_cfg) {
        Ok(_) => info!("sucessfully loaded and migrated db"),
        Err(why) => {
            error!("Failed to migrate, exiting {why:?}");
            process::exit(-1);
        }
    };
}

fn usage_exit() -> ! {
    eprintln!("{USAGE}");
    process::exit(-1);
}

fn parse_id(raw: &str) -> i64 {
    match raw.parse() {
        Ok(id) => id,
        Err(_) => {
            error!("not a numeric id: {raw}");
            usage_exit();
        }
    }
}

fn exit_on_err<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(why) => {
            error!("{why}");
            process::exit(-1);
        }
    }
}

async fn run_daemon(config: &Config, once: bool) {
    let mailer: Box<dyn Mailer> = if config.dry_run {
        Box::new(NoopMailer)
    } else {
        match MailgunMailer::new(config) {
            Ok(mailer) => Box::new(mailer),
            Err(why) => {
                error!("Failed to build mail client, exiting {why:?}");
                process::exit(-1);
            }
        }
    };

    let mut interval = tokio::time::interval(config.digest_interval);
    loop {
        interval.tick().await;
        match handler::run_weekly_digest(&config.db, mailer.as_ref(), Utc::now()).await {
            Ok(report) => info!("{}", report.summary()),
            Err(why) => error!("digest pass failed: {why:?}"),
        }
        if once {
            break;
        }
    }
}

fn cmd_save(config: &Config, args: &[String]) {
    let (owner, url) = match args {
        [owner, url, ..] => (parse_id(owner), url.as_str()),
        _ => usage_exit(),
    };
    let title = args.get(2).map(String::as_str).unwrap_or("");
    let tags = args.get(3).map(String::as_str).unwrap_or("");

    let db = exit_on_err(store::get_writeable_db(&config.db).map_err(Into::into));
    let link = exit_on_err(handler::save_link(
        &db,
        owner,
        url,
        title,
        "",
        tags,
        Utc::now(),
    ));
    println!(
        "saved link {} ({}) into week {} of {}",
        link.id, link.title, link.week, link.year
    );
}

fn cmd_list(config: &Config, args: &[String]) {
    let owner = match args {
        [owner, ..] => parse_id(owner),
        _ => usage_exit(),
    };
    let query = LinkQuery {
        tag: args.get(1).cloned().filter(|t| !t.is_empty()),
        sort_by: args.get(2).map_or(SortBy::Date, |s| SortBy::parse(s)),
        ..LinkQuery::default()
    };

    let db = exit_on_err(store::get_read_only_db(&config.db).map_err(Into::into));
    let result = exit_on_err(handler::query_links(&db, owner, &query));

    for link in &result.links {
        println!("{:>6}  {}  {}  [{}]", link.id, link.title, link.url, link.tags);
    }
    println!("{} of {} links", result.links.len(), result.total);
}

fn cmd_search(config: &Config, args: &[String]) {
    let owner = match args {
        [owner, rest @ ..] if !rest.is_empty() => parse_id(owner),
        _ => usage_exit(),
    };
    let text = args[1..].join(" ");

    let db = exit_on_err(store::get_read_only_db(&config.db).map_err(Into::into));
    let result = exit_on_err(handler::search_links(
        &db,
        owner,
        &text,
        1,
        structs::DEFAULT_PAGE_LIMIT,
    ));

    for scored in &result.links {
        println!(
            "{:>3}  {:>6}  {}  {}",
            scored.score, scored.link.id, scored.link.title, scored.link.url
        );
    }
    for facet in &result.facets {
        println!("  tag {} ({})", facet.tag, facet.count);
    }
    println!("{} matches", result.total);
}

fn cmd_import(config: &Config, args: &[String]) {
    let (owner, source, path) = match args {
        [owner, source, path] => (parse_id(owner), source.as_str(), path.as_str()),
        _ => usage_exit(),
    };
    let source = match ImportSource::parse(source) {
        Some(source) => source,
        None => {
            error!("unknown import source: {source}");
            usage_exit();
        }
    };
    let payload = exit_on_err(fs::read_to_string(path).map_err(Into::into));

    let db = exit_on_err(store::get_writeable_db(&config.db).map_err(Into::into));
    let report = exit_on_err(handler::import_links(&db, owner, source, &payload, Utc::now()));

    println!(
        "imported {} links, {} users",
        report.imported, report.users_upserted
    );
    for skip in &report.skipped {
        println!("  skipped item {}: {}", skip.index, skip.reason);
    }
}

fn cmd_bulk(config: &Config, args: &[String]) {
    let (owner, action, raw_ids) = match args {
        [owner, action, ids @ ..] if !ids.is_empty() => (parse_id(owner), action.as_str(), ids),
        _ => usage_exit(),
    };
    let action = match action {
        "archive" => BulkAction::Archive,
        "unarchive" => BulkAction::Unarchive,
        "delete" => BulkAction::Delete,
        _ => match action.strip_prefix("tag:") {
            Some(tag) if !tag.is_empty() => BulkAction::Tag(tag.to_string()),
            _ => {
                error!("unknown bulk action: {action}");
                usage_exit();
            }
        },
    };
    let ids: Vec<i64> = raw_ids.iter().map(|raw| parse_id(raw)).collect();

    let db = exit_on_err(store::get_writeable_db(&config.db).map_err(Into::into));
    let report = exit_on_err(handler::bulk_action(&db, owner, &ids, &action));

    println!("{} links affected, {} skipped", report.affected, report.skipped.len());
    for id in &report.skipped {
        println!("  skipped link {id}");
    }
}

fn cmd_click(config: &Config, args: &[String]) {
    let (owner, link_id) = match args {
        [owner, link_id] => (parse_id(owner), parse_id(link_id)),
        _ => usage_exit(),
    };

    let db = exit_on_err(store::get_writeable_db(&config.db).map_err(Into::into));
    let url = exit_on_err(handler::record_click(&db, owner, link_id));
    println!("{url}");
}

fn cmd_opened(config: &Config, args: &[String]) {
    let (owner, year, week) = match args {
        [owner, year, week] => (parse_id(owner), year.as_str(), week.as_str()),
        _ => usage_exit(),
    };
    let (year, week) = match (year.parse(), week.parse()) {
        (Ok(year), Ok(week)) => (year, week),
        _ => {
            error!("year and week must be numeric");
            usage_exit();
        }
    };

    let db = exit_on_err(store::get_writeable_db(&config.db).map_err(Into::into));
    exit_on_err(handler::record_open(&db, owner, year, week));
    println!("digest for week {week} of {year} marked opened");
}

fn cmd_notify(config: &Config, args: &[String]) {
    let (owner, enabled) = match args {
        [owner, toggle] => match toggle.as_str() {
            "on" => (parse_id(owner), true),
            "off" => (parse_id(owner), false),
            _ => usage_exit(),
        },
        _ => usage_exit(),
    };

    let db = exit_on_err(store::get_writeable_db(&config.db).map_err(Into::into));
    exit_on_err(handler::set_notifications(&db, owner, enabled));
    println!(
        "weekly digest {} for user {owner}",
        if enabled { "enabled" } else { "disabled" }
    );
}

fn cmd_stats(config: &Config) {
    let db = exit_on_err(store::get_read_only_db(&config.db).map_err(Into::into));
    let stats = exit_on_err(handler::collect_analytics(&db, Utc::now()));

    println!(
        "users: {} ({} free, {} paid, {} verified)",
        stats.total_users, stats.free_users, stats.paid_users, stats.verified_users
    );
    println!(
        "links: {} ({} this week, {} clicks)",
        stats.total_links, stats.links_this_week, stats.total_clicks
    );
    println!(
        "digests: {} sent, {} opened",
        stats.digests_sent, stats.digests_opened
    );
}

#[tokio::main]
async fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("linkletter", LevelFilter::Debug)
        .with_module_level("store", LevelFilter::Debug)
        // EST offset, will be incorrect if it runs over DST
        // Could we please abolish DST
        .with_utc_offset(UtcOffset::from_hms(-4, 0, 0).unwrap())
        .init()
        .unwrap();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            error!("Bad configuration, exiting {why:?}");
            process::exit(-1);
        }
    };

    migrate_db(&config.db);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => run_daemon(&config, false).await,
        Some("once") => run_daemon(&config, true).await,
        Some("save") => cmd_save(&config, &args[1..]),
        Some("list") => cmd_list(&config, &args[1..]),
        Some("search") => cmd_search(&config, &args[1..]),
        Some("import") => cmd_import(&config, &args[1..]),
        Some("bulk") => cmd_bulk(&config, &args[1..]),
        Some("click") => cmd_click(&config, &args[1..]),
        Some("opened") => cmd_opened(&config, &args[1..]),
        Some("notify") => cmd_notify(&config, &args[1..]),
        Some("stats") => cmd_stats(&config),
        Some(other) => {
            error!("unknown command: {other}");
            usage_exit();
        }
    }
}
