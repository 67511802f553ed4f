use super::queries;
use log::{info, trace};

use rusqlite::{Connection, Result};

macro_rules! migration {
    ( $n:literal, $( $x:literal ),* ) => {
        paste::item! {
            fn [< migration_$n >] (conn: &Connection) -> Result<()> {
                trace!("running migration {}", $n);

                $(
                    conn.execute($x, [])?;
                )*
                queries::set_version(conn, $n)?;
                trace!("finished migration {}", $n);
                Ok(())
            }
        }
    };
}

migration![
    1,
    "CREATE TABLE user (
        id INTEGER PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        tier TEXT NOT NULL DEFAULT 'free',
        email_verified BOOLEAN NOT NULL DEFAULT FALSE,
        email_notifications BOOLEAN NOT NULL DEFAULT TRUE,
        account_created NUMERIC NOT NULL
    );",
    "CREATE TABLE link (
        id INTEGER PRIMARY KEY,
        user INTEGER NOT NULL,
        url TEXT NOT NULL,
        title TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        tags TEXT NOT NULL DEFAULT '',
        date_saved NUMERIC NOT NULL,
        year INTEGER NOT NULL,
        week INTEGER NOT NULL,
        archived BOOLEAN NOT NULL DEFAULT FALSE,
        click_count INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(user) REFERENCES user(id) ON DELETE CASCADE
    );",
    // one digest per user and week, link membership kept in a join table
    // so the bundled order survives
    "CREATE TABLE digest (
        id INTEGER PRIMARY KEY,
        user INTEGER NOT NULL,
        year INTEGER NOT NULL,
        week INTEGER NOT NULL,
        email_sent BOOLEAN NOT NULL DEFAULT FALSE,
        email_opened BOOLEAN NOT NULL DEFAULT FALSE,
        send_date NUMERIC DEFAULT NULL,
        FOREIGN KEY(user) REFERENCES user(id) ON DELETE CASCADE
    );",
    "CREATE TABLE digest_link (
        id INTEGER PRIMARY KEY,
        digest INTEGER NOT NULL,
        link INTEGER NOT NULL,
        position INTEGER NOT NULL,
        FOREIGN KEY(digest) REFERENCES digest(id) ON DELETE CASCADE,
        FOREIGN KEY(link) REFERENCES link(id) ON DELETE CASCADE
    );",
    "CREATE INDEX idx_link_week ON link (user, year, week);",
    "CREATE INDEX idx_link_saved ON link (user, date_saved);",
    "CREATE UNIQUE INDEX idx_digest_week ON digest (user, year, week);",
    "CREATE UNIQUE INDEX idx_digest_link ON digest_link (digest, position);"
];

migration![
    2,
    // distinguishes "attempted and failed" from "never attempted" so a
    // later run can retry failed digests without creating duplicates
    "ALTER TABLE digest ADD COLUMN send_failed BOOLEAN NOT NULL DEFAULT FALSE;"
];

pub fn migrate(conn: &mut Connection) -> Result<()> {
    // be sure to increment this everytime a new migration is added
    const FINAL_VER: u32 = 2;

    let ver = queries::get_version(conn)?;
    info!("database version is currently: {ver} with target ver {FINAL_VER}");
    if ver == FINAL_VER {
        return Ok(());
    }

    trace!("disabling foreign keys pre-migration");
    conn.pragma_update(None, "foreign_keys", "OFF")?;

    let tx = conn.transaction()?;

    trace!("starting migration transaction");

    if ver < 1 {
        migration_1(&tx)?;
    }
    if ver < 2 {
        migration_2(&tx)?;
    }

    tx.commit()?;
    trace!("committed migration transaction");

    conn.pragma_update(None, "foreign_keys", "ON")?;
    trace!("re-enabled foreign keys post-migration");

    Ok(())
}
