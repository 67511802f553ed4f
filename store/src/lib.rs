mod migrations;
mod queries;
mod read_only_db;
pub mod structs;
pub mod week;
mod writeable_db;

pub use read_only_db::ReadOnlyDb;
pub use writeable_db::WriteableDb;

use rusqlite::{Connection, OpenFlags, Result};
use std::path::{Path, PathBuf};

pub(crate) mod connections {
    use rusqlite::{Connection, Params, Result};

    pub trait GetConnectionImmutable {
        fn get_connection(&self) -> &Connection;

        #[inline(always)]
        fn execute<P: Params>(&self, sql: &str, params: P) -> Result<()> {
            self.get_connection().execute(sql, params)?;
            Ok(())
        }
    }

    pub trait GetConnectionMutable {
        fn get_mutable_connection(&mut self) -> &mut Connection;
    }
}

/// Where the store lives. Constructed once at startup and passed down
/// explicitly; nothing in here is a global.
#[derive(Debug, Clone)]
pub struct DbConfig {
    path: PathBuf,
    in_memory: bool,
}

impl DbConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> DbConfig {
        DbConfig {
            path: path.as_ref().to_path_buf(),
            in_memory: false,
        }
    }

    /// A private in-memory database, mostly for tests. Note that every
    /// connection opened from an in-memory config is its own database.
    pub fn in_memory() -> DbConfig {
        DbConfig {
            path: PathBuf::new(),
            in_memory: true,
        }
    }
}

pub struct ReadOnlyConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for ReadOnlyConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReadOnlyDb for ReadOnlyConn {}

pub struct WriteableConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for WriteableConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl connections::GetConnectionMutable for WriteableConn {
    #[inline]
    fn get_mutable_connection(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl ReadOnlyDb for WriteableConn {}

impl WriteableDb for WriteableConn {}

#[inline(always)]
fn open_database(config: &DbConfig, read_only: bool) -> Result<Connection> {
    if config.in_memory {
        if read_only {
            Connection::open_in_memory_with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY)
        } else {
            Connection::open_in_memory()
        }
    } else if read_only {
        Connection::open_with_flags(&config.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
    } else {
        Connection::open(&config.path)
    }
}

impl ReadOnlyConn {
    #[inline(always)]
    fn new(config: &DbConfig) -> Result<ReadOnlyConn> {
        Ok(ReadOnlyConn {
            conn: open_database(config, true)?,
        })
    }
}

impl WriteableConn {
    #[inline(always)]
    fn new(config: &DbConfig) -> Result<WriteableConn> {
        let mut conn = open_database(config, false)?;
        // a fresh in-memory database has no schema yet
        if config.in_memory {
            migrations::migrate(&mut conn)?;
        }
        Ok(WriteableConn { conn })
    }
}

#[inline]
pub fn get_read_only_db(config: &DbConfig) -> Result<impl ReadOnlyDb> {
    ReadOnlyConn::new(config)
}

#[inline]
pub fn get_writeable_db(config: &DbConfig) -> Result<impl WriteableDb> {
    WriteableConn::new(config)
}

#[inline]
pub fn migrate(config: &DbConfig) -> Result<()> {
    migrations::migrate(&mut open_database(config, false)?)
}

#[inline]
pub fn writable_db_call<F, T>(config: &DbConfig, f: F) -> Result<T>
where
    F: FnOnce(WriteableConn) -> Result<T>,
{
    f(WriteableConn::new(config)?)
}

#[inline]
pub fn read_only_db_call<F, T>(config: &DbConfig, f: F) -> Result<T>
where
    F: FnOnce(ReadOnlyConn) -> Result<T>,
{
    f(ReadOnlyConn::new(config)?)
}
