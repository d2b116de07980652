use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tokio::task;
use crate::error::{Result, RoadGexfError};

mod source;

pub use source::{RowSource, SqliteSource};

/// Database connection wrapper
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Open a read-only connection to the routing database
    ///
    /// Fails with a connection error if the file is missing or is not a
    /// database, before any query is attempted.
    pub fn open_connection(&self) -> Result<Connection> {
        let connection_error = |source: rusqlite::Error| RoadGexfError::Connection {
            path: self.path.clone(),
            source,
        };

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connection_error)?;

        // Opening is lazy; touch the schema so a non-database file fails here
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(connection_error)?;

        log::debug!("Opened {} read-only", self.path.display());
        Ok(conn)
    }

    /// Execute a closure with a database connection in a blocking task
    ///
    /// The connection lives for the duration of the closure and is closed when
    /// it returns, on success and error alike.
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Db::new(&self.path);
        task::spawn_blocking(move || {
            let conn = db.open_connection()?;
            f(&conn)
        })
        .await
        .map_err(|e| RoadGexfError::Task(e.to_string()))?
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! osm2po-shaped tables for tests.

    use rusqlite::{params, Connection};
    use std::path::Path;

    pub const CREATE_EDGE_TABLE: &str = "CREATE TABLE basel_2po_4pgr (
            id INTEGER PRIMARY KEY,
            osm_id INTEGER,
            osm_name TEXT,
            osm_meta TEXT,
            osm_source_id INTEGER,
            osm_target_id INTEGER,
            clazz INTEGER NOT NULL,
            flags INTEGER,
            source INTEGER,
            target INTEGER,
            km REAL NOT NULL,
            kmh INTEGER NOT NULL,
            cost REAL NOT NULL,
            reverse_cost REAL NOT NULL,
            x1 REAL,
            y1 REAL,
            x2 REAL,
            y2 REAL
        )";

    /// (id, clazz, source, target, km, kmh, cost, reverse_cost, name, x1, y1, x2, y2)
    pub type Row<'a> = (
        i64,
        i64,
        Option<i64>,
        Option<i64>,
        f64,
        i64,
        f64,
        f64,
        Option<&'a str>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
    );

    pub fn create(path: &Path, rows: &[Row<'_>]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(CREATE_EDGE_TABLE, []).unwrap();
        for r in rows {
            conn.execute(
                "INSERT INTO basel_2po_4pgr
                    (id, clazz, osm_source_id, osm_target_id, km, kmh, cost, reverse_cost,
                     osm_name, x1, y1, x2, y2)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, r.9, r.10, r.11, r.12],
            )
            .unwrap();
        }
    }

    /// The single-edge Basel sample: 100 -> 200, clazz 3, zero cost.
    pub fn basel_sample() -> Vec<Row<'static>> {
        vec![(
            1,
            3,
            Some(100),
            Some(200),
            1.2,
            50,
            0.0,
            0.5,
            Some("Street A"),
            Some(7.58),
            Some(47.55),
            Some(7.60),
            Some(47.56),
        )]
    }
}
