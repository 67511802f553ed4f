use crate::structs::{Link, User};
use rusqlite::{Connection, OptionalExtension, Result, Row};

#[inline(always)]
pub fn get_version(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT user_version FROM pragma_user_version;", [], |row| {
        row.get(0)
    })
}

#[inline(always)]
pub fn set_version(conn: &Connection, version: u32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}

// Column lists shared by every link/user query so the row mappers below
// stay in sync with a single SELECT shape.
pub(crate) const LINK_COLUMNS: &str =
    "id, user, url, title, notes, tags, date_saved, year, week, archived, click_count";

pub(crate) const USER_COLUMNS: &str =
    "id, email, first_name, last_name, tier, email_verified, email_notifications, account_created";

pub(crate) fn link_from_row(row: &Row<'_>) -> Result<Link> {
    Ok(Link {
        id: row.get(0)?,
        owner: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        notes: row.get(4)?,
        tags: row.get(5)?,
        date_saved: row.get(6)?,
        year: row.get(7)?,
        week: row.get(8)?,
        archived: row.get(9)?,
        click_count: row.get(10)?,
    })
}

pub(crate) fn user_from_row(row: &Row<'_>) -> Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        tier: row.get(4)?,
        email_verified: row.get(5)?,
        email_notifications: row.get(6)?,
        account_created: row.get(7)?,
    })
}

#[inline(always)]
pub fn get_link(conn: &Connection, link_id: i64) -> Result<Option<Link>> {
    conn.query_row(
        &format!("SELECT {LINK_COLUMNS} FROM link WHERE id=(?1)"),
        [link_id],
        link_from_row,
    )
    .optional()
}

#[inline(always)]
pub fn get_user(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM user WHERE id=(?1)"),
        [user_id],
        user_from_row,
    )
    .optional()
}
