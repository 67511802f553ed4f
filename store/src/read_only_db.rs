use crate::connections::GetConnectionImmutable;
use crate::queries;
use crate::structs::{Digest, Link, User};

use rusqlite::{Connection, OptionalExtension, Result, Row};

const DIGEST_COLUMNS: &str = "id, user, year, week, email_sent, send_failed, email_opened, send_date";

fn digest_from_row(row: &Row<'_>) -> Result<Digest> {
    Ok(Digest {
        id: row.get(0)?,
        user: row.get(1)?,
        year: row.get(2)?,
        week: row.get(3)?,
        email_sent: row.get(4)?,
        send_failed: row.get(5)?,
        email_opened: row.get(6)?,
        send_date: row.get(7)?,
        link_ids: Vec::new(),
    })
}

fn digest_link_ids(conn: &Connection, digest_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT link FROM digest_link
        WHERE digest=(?1)
        ORDER BY position",
    )?;
    let rows = stmt.query_map([digest_id], |row| row.get(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?)
    }
    Ok(ids)
}

pub trait ReadOnlyDb: GetConnectionImmutable {
    #[inline]
    fn get_link(&self, link_id: i64) -> Result<Option<Link>> {
        queries::get_link(self.get_connection(), link_id)
    }

    /// Snapshot of saved links, newest first, optionally narrowed to one
    /// owner. The engines re-sort as needed; this order is the stable
    /// "original order" that scoring ties fall back to.
    #[inline]
    fn list_links(&self, owner: Option<i64>) -> Result<Vec<Link>> {
        let conn = self.get_connection();
        let columns = queries::LINK_COLUMNS;
        let mut links = Vec::new();

        match owner {
            Some(owner_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {columns} FROM link
                    WHERE user=(?1)
                    ORDER BY date_saved DESC, id ASC"
                ))?;
                let rows = stmt.query_map([owner_id], queries::link_from_row)?;
                for row in rows {
                    links.push(row?)
                }
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {columns} FROM link
                    ORDER BY date_saved DESC, id ASC"
                ))?;
                let rows = stmt.query_map([], queries::link_from_row)?;
                for row in rows {
                    links.push(row?)
                }
            }
        }

        Ok(links)
    }

    #[inline]
    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        queries::get_user(self.get_connection(), user_id)
    }

    #[inline]
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let columns = queries::USER_COLUMNS;
        self.get_connection()
            .query_row(
                &format!("SELECT {columns} FROM user WHERE email=(?1)"),
                [email],
                queries::user_from_row,
            )
            .optional()
    }

    #[inline]
    fn list_users(&self) -> Result<Vec<User>> {
        let columns = queries::USER_COLUMNS;
        let mut stmt = self
            .get_connection()
            .prepare(&format!("SELECT {columns} FROM user ORDER BY id"))?;
        let rows = stmt.query_map([], queries::user_from_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?)
        }
        Ok(users)
    }

    /// The digest for one (user, year, week), link ids included. At most
    /// one can exist thanks to the unique index.
    #[inline]
    fn get_digest(&self, user_id: i64, year: i32, week: u32) -> Result<Option<Digest>> {
        let conn = self.get_connection();
        let digest = conn
            .query_row(
                &format!(
                    "SELECT {DIGEST_COLUMNS} FROM digest
                    WHERE user=(?1) AND year=(?2) AND week=(?3)"
                ),
                (user_id, year, week),
                digest_from_row,
            )
            .optional()?;

        match digest {
            Some(mut d) => {
                d.link_ids = digest_link_ids(conn, d.id)?;
                Ok(Some(d))
            }
            None => Ok(None),
        }
    }

    #[inline]
    fn list_digests(&self) -> Result<Vec<Digest>> {
        let conn = self.get_connection();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DIGEST_COLUMNS} FROM digest ORDER BY year, week, user"
        ))?;
        let rows = stmt.query_map([], digest_from_row)?;

        let mut digests = Vec::new();
        for row in rows {
            digests.push(row?)
        }
        for digest in &mut digests {
            digest.link_ids = digest_link_ids(conn, digest.id)?;
        }
        Ok(digests)
    }
}
