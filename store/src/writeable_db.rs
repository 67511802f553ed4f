use crate::connections::GetConnectionMutable;
use crate::queries;
use crate::structs::{Digest, Link, User};
use crate::week::week_of;
use crate::ReadOnlyDb;

use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::{Error, Result};

pub trait WriteableDb: GetConnectionMutable + ReadOnlyDb {
    /// Insert or refresh an account. Used by the ingest/bootstrap paths;
    /// the core itself never mutates users.
    #[inline]
    fn upsert_user(&self, user: &User) -> Result<()> {
        let mut stmt = self.get_connection().prepare(
            "INSERT INTO user
                (id, email, first_name, last_name, tier, email_verified,
                 email_notifications, account_created)
            VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8 )
            ON CONFLICT(id) DO UPDATE SET
                email=excluded.email,
                first_name=excluded.first_name,
                last_name=excluded.last_name,
                tier=excluded.tier,
                email_verified=excluded.email_verified,
                email_notifications=excluded.email_notifications",
        )?;

        let count = stmt.execute((
            user.id,
            &user.email,
            &user.first_name,
            &user.last_name,
            &user.tier,
            user.email_verified,
            user.email_notifications,
            user.account_created,
        ))?;

        if count > 0 {
            info!("upserted user {} ({})", user.id, user.email);
        }

        Ok(())
    }

    #[inline]
    fn set_email_notifications(&self, user_id: i64, enabled: bool) -> Result<()> {
        self.execute(
            "UPDATE user SET email_notifications=(?1) WHERE id=(?2)",
            (enabled, user_id),
        )
    }

    /// Save a link. The (year, week) pair is computed here, once, from the
    /// save date and never recomputed afterwards.
    #[inline]
    fn insert_link(
        &self,
        owner: i64,
        url: &str,
        title: &str,
        notes: &str,
        tags: &str,
        date_saved: DateTime<Utc>,
    ) -> Result<Link> {
        let (year, week) = week_of(date_saved.date_naive());
        let conn = self.get_connection();
        let mut stmt = conn.prepare(
            "INSERT INTO link (user, url, title, notes, tags, date_saved, year, week)
            VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8 )",
        )?;

        stmt.execute((owner, url, title, notes, tags, date_saved, year, week))?;

        match queries::get_link(conn, conn.last_insert_rowid())? {
            Some(link) => Ok(link),
            None => {
                warn!("no link with input id found despite being just added");
                Err(Error::QueryReturnedNoRows)
            }
        }
    }

    #[inline]
    fn update_link(&self, link_id: i64, title: &str, notes: &str, tags: &str) -> Result<()> {
        self.execute(
            "UPDATE link SET title=(?1), notes=(?2), tags=(?3) WHERE id=(?4)",
            (title, notes, tags, link_id),
        )
    }

    #[inline]
    fn set_archived(&self, link_id: i64, archived: bool) -> Result<()> {
        self.execute(
            "UPDATE link SET archived=(?1) WHERE id=(?2)",
            (archived, link_id),
        )
    }

    #[inline]
    fn increment_click(&self, link_id: i64) -> Result<()> {
        self.execute(
            "UPDATE link SET click_count=click_count+1 WHERE id=(?1)",
            [link_id],
        )
    }

    #[inline]
    fn delete_link(&self, link_id: i64) -> Result<()> {
        self.execute("DELETE FROM link WHERE id=(?1)", [link_id])
    }

    /// Create the digest record for one (user, year, week) with its link
    /// membership. Fails on the unique index if a record already exists;
    /// callers gate on [`ReadOnlyDb::get_digest`] first.
    #[inline]
    fn create_digest(&self, user_id: i64, year: i32, week: u32, link_ids: &[i64]) -> Result<Digest> {
        let conn = self.get_connection();
        conn.execute(
            "INSERT INTO digest (user, year, week) VALUES ( ?1, ?2, ?3 )",
            (user_id, year, week),
        )?;
        let digest_id = conn.last_insert_rowid();

        let mut stmt = conn.prepare(
            "INSERT INTO digest_link (digest, link, position) VALUES ( ?1, ?2, ?3 )",
        )?;
        for (position, link_id) in link_ids.iter().enumerate() {
            stmt.execute((digest_id, link_id, position as i64))?;
        }

        match self.get_digest(user_id, year, week)? {
            Some(digest) => Ok(digest),
            None => {
                warn!("no digest with input id found despite being just added");
                Err(Error::QueryReturnedNoRows)
            }
        }
    }

    /// Only called after a confirmed gateway success.
    #[inline]
    fn mark_digest_sent(&self, digest_id: i64) -> Result<()> {
        self.execute(
            "UPDATE digest
            SET email_sent=TRUE, send_failed=FALSE, send_date=datetime('now')
            WHERE id=(?1)",
            [digest_id],
        )
    }

    #[inline]
    fn mark_digest_failed(&self, digest_id: i64) -> Result<()> {
        self.execute(
            "UPDATE digest SET send_failed=TRUE WHERE id=(?1)",
            [digest_id],
        )
    }

    #[inline]
    fn mark_digest_opened(&self, digest_id: i64) -> Result<()> {
        self.execute(
            "UPDATE digest SET email_opened=TRUE WHERE id=(?1)",
            [digest_id],
        )
    }
}
